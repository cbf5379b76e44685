use serde_json::Value;
use thiserror::Error;

use crate::models::{EndpointDraft, EndpointRecord, HttpMethod};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("unsupported HTTP method: {0}")]
    UnknownMethod(String),
    #[error("{field} is not valid JSON: {reason}")]
    InvalidJson { field: &'static str, reason: String },
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// True when the record can be handed to consumers that parse its schema.
pub fn is_valid(record: &EndpointRecord) -> bool {
    validate_record(record).is_ok()
}

pub fn validate_record(record: &EndpointRecord) -> Result<(), ValidationError> {
    validate_json_text("responseSchema", &record.response_schema)
}

pub fn validate_draft(draft: &EndpointDraft) -> Result<(), ValidationError> {
    validate_json_text("responseSchema", &draft.response_schema)
}

/// Validate a record-shaped JSON object received from outside the process,
/// before it is deserialized into a typed record.
pub fn validate_value(value: &Value) -> Result<(), ValidationError> {
    let method = value
        .get("method")
        .and_then(Value::as_str)
        .ok_or(ValidationError::MissingField("method"))?;
    validate_method(method)?;

    let schema = value
        .get("responseSchema")
        .and_then(Value::as_str)
        .ok_or(ValidationError::MissingField("responseSchema"))?;
    validate_json_text("responseSchema", schema)
}

pub fn validate_method(method: &str) -> Result<HttpMethod, ValidationError> {
    method
        .parse()
        .map_err(|_| ValidationError::UnknownMethod(method.to_string()))
}

pub fn validate_json_text(field: &'static str, text: &str) -> Result<(), ValidationError> {
    serde_json::from_str::<Value>(text)
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidJson {
            field,
            reason: e.to_string(),
        })
}
