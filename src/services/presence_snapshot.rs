//! Present/departed counting over tag states
//!
//! A tag is counted when it has been read at least once and either has not
//! departed, or departed after `since_ms`. Storage backends only need to
//! narrow the candidate set; the counting rule lives here.

use serde::{Deserialize, Serialize};

use crate::entities::tags;
use crate::models::turnover::PresenceCounts;

pub const DEPARTED_EVENT: &str = "departed";

/// Latest known state of one tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagState {
    pub epc: String,
    pub product_id: String,
    pub event: String,
    /// Last read time (ms since epoch, 0 = never read)
    pub last_read: i64,
}

impl TagState {
    pub fn is_departed(&self) -> bool {
        self.event == DEPARTED_EVENT
    }

    /// Whether this tag contributes to a snapshot taken since `since_ms`
    pub fn counts_since(&self, since_ms: i64) -> bool {
        self.last_read > 0 && (!self.is_departed() || self.last_read > since_ms)
    }
}

impl From<tags::Model> for TagState {
    fn from(model: tags::Model) -> Self {
        Self {
            epc: model.epc,
            product_id: model.product_id,
            event: model.event,
            last_read: model.last_read,
        }
    }
}

pub fn count_presence<'a, I>(tags: I, since_ms: i64) -> PresenceCounts
where
    I: IntoIterator<Item = &'a TagState>,
{
    tags.into_iter()
        .filter(|tag| tag.counts_since(since_ms))
        .fold(PresenceCounts::default(), |mut counts, tag| {
            if tag.is_departed() {
                counts.departed_count += 1;
            } else {
                counts.present_count += 1;
            }
            counts
        })
}
