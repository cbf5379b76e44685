pub mod simulated;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{EndpointDraft, EndpointRecord};
use crate::validation;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("sync backend failed: {0}")]
    Backend(String),
    #[error("sync timed out after {0:?}")]
    Timeout(Duration),
    #[error("remote returned malformed records: {0}")]
    Malformed(String),
}

/// Bulk fetch/submit of endpoint collections against a remote repository.
#[async_trait]
pub trait SyncBackend: Send + Sync {
    fn id(&self) -> &str;
    async fn fetch(&self, locator: &str) -> Result<Vec<EndpointDraft>, SyncError>;
    async fn submit(&self, locator: &str, records: &[EndpointRecord]) -> Result<bool, SyncError>;
}

pub struct SyncGateway {
    backend: Arc<dyn SyncBackend>,
    timeout: Duration,
}

impl SyncGateway {
    pub fn new(backend: Arc<dyn SyncBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn backend_id(&self) -> &str {
        self.backend.id()
    }

    /// Fetch the remote collection. Every record gets a fresh id and the
    /// receipt time as its creation time; nothing is carried over from the remote.
    pub async fn pull(&self, locator: &str) -> Result<Vec<EndpointRecord>, SyncError> {
        let drafts = tokio::time::timeout(self.timeout, self.backend.fetch(locator))
            .await
            .map_err(|_| SyncError::Timeout(self.timeout))??;

        for (i, draft) in drafts.iter().enumerate() {
            validation::validate_draft(draft)
                .map_err(|e| SyncError::Malformed(format!("record {i}: {e}")))?;
        }

        let received_at = Utc::now();
        let mut records: Vec<EndpointRecord> = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = loop {
                let id = Uuid::now_v7();
                if records.iter().all(|r| r.id != id) {
                    break id;
                }
            };
            records.push(draft.into_record(id, received_at));
        }

        Ok(records)
    }

    /// Submit the full collection. All-or-nothing: there is no partial success.
    pub async fn push(&self, locator: &str, records: &[EndpointRecord]) -> Result<bool, SyncError> {
        tokio::time::timeout(self.timeout, self.backend.submit(locator, records))
            .await
            .map_err(|_| SyncError::Timeout(self.timeout))?
    }
}
