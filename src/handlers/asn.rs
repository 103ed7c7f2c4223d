//! ASN ingestion handler
//!
//! POST /api/asn runs every item of a shipment notice through the turnover
//! pipeline and reports what happened to each product.

use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, warn};

use crate::models::asn::{AdvanceShippingNotice, AsnSummary};
use crate::models::error::ErrorResponse;
use crate::AppState;

/// POST /api/asn
///
/// # Response
/// - 200: Per-outcome counts for the batch
/// - 400: ASN has no items
pub async fn ingest_asn(
    State(state): State<AppState>,
    Json(payload): Json<AdvanceShippingNotice>,
) -> Result<Json<AsnSummary>, (StatusCode, Json<ErrorResponse>)> {
    if payload.items.is_empty() {
        warn!(asn_id = ?payload.asn_id, "Rejecting ASN with no items");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "ASN must contain at least one item".to_string(),
                code: Some("EMPTY_ASN".to_string()),
            }),
        ));
    }

    info!(asn_id = ?payload.asn_id, items = payload.items.len(), "Received ASN");

    let summary = state.turnover.process_asn(&payload).await;

    Ok(Json(summary))
}
