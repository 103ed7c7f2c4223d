//! Turnover history handler
//!
//! GET /api/turnover/{product_id}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, warn};

use crate::models::error::ErrorResponse;
use crate::models::turnover::History;
use crate::AppState;

/// GET /api/turnover/{product_id}
///
/// # Response
/// - 200: Turnover history for the product
/// - 404: No ASN has referenced this product yet
/// - 500: Store error
pub async fn get_turnover_history(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<History>, (StatusCode, Json<ErrorResponse>)> {
    let history = state.turnover.history(&product_id).await.map_err(|e| {
        error!(product_id = %product_id, error = %e, "Failed to read turnover history");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Store error: {}", e),
                code: Some("STORE_ERROR".to_string()),
            }),
        )
    })?;

    match history {
        Some(history) => Ok(Json(history)),
        None => {
            warn!(product_id = %product_id, "Turnover history not found");
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Turnover history not found".to_string(),
                    code: Some("HISTORY_NOT_FOUND".to_string()),
                }),
            ))
        }
    }
}
