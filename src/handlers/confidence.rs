use axum::{extract::State, Json};

use crate::models::confidence::{ConfidenceRequest, ConfidenceResponse};
use crate::AppState;

/// POST /api/confidence
pub async fn estimate_confidence(
    State(state): State<AppState>,
    Json(payload): Json<ConfidenceRequest>,
) -> Json<ConfidenceResponse> {
    let confidence = state
        .turnover
        .estimate_confidence(payload.last_read, payload.is_contra_reading);

    Json(ConfidenceResponse { confidence })
}
