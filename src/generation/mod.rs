pub mod fence;
pub mod gemini;
pub mod prompt;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{EndpointDraft, EndpointRecord};
use crate::validation;

/// Shown in place of client code when generation fails.
pub const CODE_PLACEHOLDER: &str = "// Failed to generate code. Please try again.";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation backend is not configured")]
    NotConfigured,
    #[error("generation backend failed: {0}")]
    Backend(String),
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
    #[error("generation returned malformed output: {0}")]
    Malformed(String),
    #[error("generated endpoint is missing required field: {0}")]
    MissingField(&'static str),
}

/// A single prompt sent to a completion backend.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    /// When set, the backend must answer with JSON matching this schema.
    pub response_schema: Option<Value>,
}

#[async_trait]
pub trait GenerationBackend: Send + Sync {
    fn id(&self) -> &str;
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError>;
}

pub struct GenerationGateway {
    backend: Arc<dyn GenerationBackend>,
    endpoint_model: String,
    code_model: String,
    timeout: Duration,
}

impl GenerationGateway {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        endpoint_model: impl Into<String>,
        code_model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            backend,
            endpoint_model: endpoint_model.into(),
            code_model: code_model.into(),
            timeout,
        }
    }

    pub fn backend_id(&self) -> &str {
        self.backend.id()
    }

    /// Ask the backend to design an endpoint from a free-text requirement.
    pub async fn generate_endpoint(&self, requirement: &str) -> Result<EndpointDraft, GenerationError> {
        let text = self
            .complete(CompletionRequest {
                model: self.endpoint_model.clone(),
                prompt: prompt::endpoint_prompt(requirement),
                response_schema: Some(prompt::endpoint_schema()),
            })
            .await?;

        parse_endpoint(&text)
    }

    /// Generate a client for `record` in `language`, with code fences stripped.
    pub async fn generate_client_code(
        &self,
        record: &EndpointRecord,
        language: &str,
    ) -> Result<String, GenerationError> {
        let text = self
            .complete(CompletionRequest {
                model: self.code_model.clone(),
                prompt: prompt::client_code_prompt(record, language),
                response_schema: None,
            })
            .await?;

        Ok(fence::strip_code_fences(&text))
    }

    /// Like [`generate_client_code`](Self::generate_client_code), but never fails.
    pub async fn client_code_or_placeholder(&self, record: &EndpointRecord, language: &str) -> String {
        match self.generate_client_code(record, language).await {
            Ok(code) => code,
            Err(e) => {
                tracing::warn!("Client code generation for {} ({language}) failed: {e}", record.id);
                CODE_PLACEHOLDER.to_string()
            }
        }
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        tracing::debug!(
            "Sending completion to {} (model={})",
            self.backend.id(),
            request.model
        );

        match tokio::time::timeout(self.timeout, self.backend.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(self.timeout)),
        }
    }
}

/// Parse the backend's JSON answer into a draft endpoint.
pub fn parse_endpoint(text: &str) -> Result<EndpointDraft, GenerationError> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|e| GenerationError::Malformed(format!("invalid JSON: {e}")))?;
    let obj = value
        .as_object()
        .ok_or_else(|| GenerationError::Malformed("expected a JSON object".to_string()))?;

    let method = match obj.get("method") {
        None | Some(Value::Null) => return Err(GenerationError::MissingField("method")),
        Some(Value::String(s)) => {
            validation::validate_method(s).map_err(|e| GenerationError::Malformed(e.to_string()))?
        }
        Some(_) => return Err(GenerationError::Malformed("method must be a string".to_string())),
    };

    let response_schema = match obj.get("responseSchema") {
        None | Some(Value::Null) => return Err(GenerationError::MissingField("responseSchema")),
        Some(Value::String(s)) => s.clone(),
        Some(_) => {
            return Err(GenerationError::Malformed(
                "responseSchema must be JSON text".to_string(),
            ));
        }
    };
    validation::validate_json_text("responseSchema", &response_schema)
        .map_err(|e| GenerationError::Malformed(e.to_string()))?;

    let request_schema = obj
        .get("requestSchema")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string);

    Ok(EndpointDraft {
        name: string_field(obj, "name"),
        method,
        path: string_field(obj, "path"),
        description: string_field(obj, "description"),
        request_schema,
        response_schema,
        example_response: obj
            .get("exampleResponse")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new())),
    })
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
