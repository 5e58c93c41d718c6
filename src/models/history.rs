use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One past full-resolution generation.
///
/// Serialized with camelCase keys so history written by the web client
/// loads unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub url: String,
    pub timestamp: i64,
    pub business_name: String,
    pub style: String,
}

impl HistoryEntry {
    pub fn new(
        url: impl Into<String>,
        business_name: impl Into<String>,
        style: impl Into<String>,
    ) -> Self {
        let timestamp = Utc::now().timestamp_millis();
        Self::at(timestamp, url, business_name, style)
    }

    pub fn at(
        timestamp: i64,
        url: impl Into<String>,
        business_name: impl Into<String>,
        style: impl Into<String>,
    ) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self {
            id: format!("{}-{}", timestamp, &suffix[..8]),
            url: url.into(),
            timestamp,
            business_name: business_name.into(),
            style: style.into(),
        }
    }
}
