use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EndpointRecord;

/// Snapshot of the studio's endpoint collection and current selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectState {
    pub endpoints: Vec<EndpointRecord>,
    pub selected_endpoint_id: Option<Uuid>,
}

impl ProjectState {
    pub fn find(&self, id: Uuid) -> Option<&EndpointRecord> {
        self.endpoints.iter().find(|ep| ep.id == id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub is_syncing: bool,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_synced_at: Option<DateTime<Utc>>,
}
