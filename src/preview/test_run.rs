use serde::Serialize;
use serde_json::Value;

use crate::models::{EndpointRecord, HttpMethod};

pub const MOCK_BASE_URL: &str = "https://api.forge.ai";
const MOCK_LATENCY_MS: u64 = 245;

/// Result of a simulated request against the mock server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockTestRun {
    pub method: HttpMethod,
    pub url: String,
    pub status: u16,
    pub status_text: String,
    pub latency_ms: u64,
    pub body: Value,
}

pub fn mock_test_run(record: &EndpointRecord) -> MockTestRun {
    MockTestRun {
        method: record.method,
        url: format!("{MOCK_BASE_URL}{}", record.path),
        status: 200,
        status_text: "OK".to_string(),
        latency_ms: MOCK_LATENCY_MS,
        body: record.example_response.clone(),
    }
}
