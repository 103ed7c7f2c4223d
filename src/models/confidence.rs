use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceRequest {
    /// Last read time (ms since epoch)
    pub last_read: i64,
    #[serde(default)]
    pub is_contra_reading: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceResponse {
    pub confidence: f64,
}
