//! A page selection waiting to be turned into a host by the next add form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSelection {
    pub ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub captured_at: DateTime<Utc>,
}

impl PendingSelection {
    pub fn new(ip: String, source_url: Option<&str>) -> Self {
        Self {
            ip,
            source_url: source_url.map(|s| s.to_string()),
            captured_at: Utc::now(),
        }
    }
}
