use serde_json::{Value, json};

use crate::models::{EndpointRecord, HttpMethod};

/// Language used when the caller does not pick one.
pub const DEFAULT_LANGUAGE: &str = "TypeScript";

/// Languages offered as shortcuts. Any other language name is accepted too.
pub const SUGGESTED_LANGUAGES: [&str; 4] = ["TypeScript", "JavaScript", "Python", "Go"];

pub fn endpoint_prompt(requirement: &str) -> String {
    format!(
        "Design a REST API endpoint based on this requirement: \"{requirement}\". \
         Return the response in strict JSON format."
    )
}

/// Output schema declared to the backend for endpoint generation.
pub fn endpoint_schema() -> Value {
    let methods: Vec<&str> = HttpMethod::ALL.iter().map(HttpMethod::as_str).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "method": { "type": "STRING", "enum": methods },
            "path": { "type": "STRING" },
            "description": { "type": "STRING" },
            "requestSchema": { "type": "STRING", "description": "JSON schema as string" },
            "responseSchema": { "type": "STRING", "description": "JSON schema as string" },
            "exampleResponse": { "type": "OBJECT", "description": "A realistic example JSON response" }
        },
        "required": ["name", "method", "path", "description", "responseSchema", "exampleResponse"]
    })
}

pub fn client_code_prompt(record: &EndpointRecord, language: &str) -> String {
    let request_schema = record
        .request_schema
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("None");

    format!(
        "Generate a production-ready {language} client function to call this API endpoint:\n\
         Method: {method}\n\
         Path: {path}\n\
         Request Schema: {request_schema}\n\
         Response Schema: {response_schema}\n\
         \n\
         Include comments and type definitions if appropriate. Only return the code.",
        method = record.method,
        path = record.path,
        response_schema = record.response_schema,
    )
}
