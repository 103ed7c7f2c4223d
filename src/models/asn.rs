//! Advance Shipping Notice request/response models

use serde::{Deserialize, Serialize};

/// A batch of expected incoming items
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceShippingNotice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<String>,
    pub items: Vec<AsnItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsnItem {
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item_epcs: Vec<String>,
}

/// Outcome counts for one processed ASN
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsnSummary {
    pub processed: usize,
    pub bootstrapped: usize,
    pub recorded: usize,
    pub skipped: usize,
    pub failed: usize,
}
