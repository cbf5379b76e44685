use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::json;

use super::{SyncBackend, SyncError};
use crate::models::{EndpointDraft, EndpointRecord, HttpMethod};

/// In-process stand-in for a remote repository host.
///
/// Locators that were never pushed to serve the seed collection; a push
/// replaces what later pulls of the same locator return.
pub struct SimulatedRepository {
    pull_latency: Duration,
    push_latency: Duration,
    repositories: DashMap<String, Vec<EndpointDraft>>,
}

impl SimulatedRepository {
    pub fn new(pull_latency: Duration, push_latency: Duration) -> Self {
        Self {
            pull_latency,
            push_latency,
            repositories: DashMap::new(),
        }
    }
}

fn check_locator(locator: &str) -> Result<&str, SyncError> {
    let locator = locator.trim();
    if locator.is_empty() {
        return Err(SyncError::Backend("repository locator is empty".to_string()));
    }
    Ok(locator)
}

#[async_trait]
impl SyncBackend for SimulatedRepository {
    fn id(&self) -> &str {
        "simulated"
    }

    async fn fetch(&self, locator: &str) -> Result<Vec<EndpointDraft>, SyncError> {
        let locator = check_locator(locator)?;
        tokio::time::sleep(self.pull_latency).await;

        Ok(self
            .repositories
            .get(locator)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(seed_endpoints))
    }

    async fn submit(&self, locator: &str, records: &[EndpointRecord]) -> Result<bool, SyncError> {
        let locator = check_locator(locator)?;
        tokio::time::sleep(self.push_latency).await;

        let drafts = records.iter().map(EndpointDraft::from).collect();
        self.repositories.insert(locator.to_string(), drafts);
        tracing::debug!("Simulated repository {locator} now holds {} endpoints", records.len());
        Ok(true)
    }
}

/// Collection served for repositories that have not been pushed to.
pub fn seed_endpoints() -> Vec<EndpointDraft> {
    vec![
        EndpointDraft {
            name: "User Authentication".to_string(),
            method: HttpMethod::Post,
            path: "/auth/login".to_string(),
            description: "Authenticates a user and returns a JWT token.".to_string(),
            request_schema: None,
            response_schema: json!({
                "type": "object",
                "properties": {
                    "token": { "type": "string" },
                    "user": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "email": { "type": "string" }
                        }
                    }
                }
            })
            .to_string(),
            example_response: json!({
                "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
                "user": { "id": "usr_123", "email": "jane.doe@example.com" }
            }),
        },
        EndpointDraft {
            name: "System Health".to_string(),
            method: HttpMethod::Get,
            path: "/health".to_string(),
            description: "Returns the current status of the API services.".to_string(),
            request_schema: None,
            response_schema: json!({
                "type": "object",
                "properties": {
                    "status": { "type": "string" },
                    "uptime": { "type": "number" },
                    "version": { "type": "string" }
                }
            })
            .to_string(),
            example_response: json!({
                "status": "healthy",
                "uptime": 86400,
                "version": "2.4.1"
            }),
        },
    ]
}
