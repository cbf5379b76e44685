use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

/// The closed set of HTTP methods an endpoint can be designed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unsupported HTTP method: {s}"))
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A single documented REST operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRecord {
    pub id: Uuid,
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_schema: Option<String>,
    pub response_schema: String,
    pub example_response: Value,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// An endpoint record that has not been assigned an id or creation time yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDraft {
    #[serde(default)]
    pub name: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_schema: Option<String>,
    pub response_schema: String,
    #[serde(default = "empty_object")]
    pub example_response: Value,
}

impl EndpointDraft {
    /// The placeholder inserted by the "new endpoint" action.
    pub fn blank() -> Self {
        Self {
            name: "New Endpoint".to_string(),
            method: HttpMethod::Get,
            path: "/new-endpoint".to_string(),
            description: "Describe what this endpoint does.".to_string(),
            request_schema: None,
            response_schema: r#"{"type":"object","properties":{}}"#.to_string(),
            example_response: empty_object(),
        }
    }

    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> EndpointRecord {
        EndpointRecord {
            id,
            name: self.name,
            method: self.method,
            path: self.path,
            description: self.description,
            request_schema: self.request_schema,
            response_schema: self.response_schema,
            example_response: self.example_response,
            created_at,
        }
    }
}

impl From<&EndpointRecord> for EndpointDraft {
    fn from(record: &EndpointRecord) -> Self {
        Self {
            name: record.name.clone(),
            method: record.method,
            path: record.path.clone(),
            description: record.description.clone(),
            request_schema: record.request_schema.clone(),
            response_schema: record.response_schema.clone(),
            example_response: record.example_response.clone(),
        }
    }
}

/// Field-wise update of an existing record. Absent fields are left untouched.
///
/// `id` and `created_at` must stay absent: both are immutable once assigned,
/// and the store rejects a patch carrying either of them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointPatch {
    #[serde(default, deserialize_with = "explicit_null")]
    pub id: Option<Option<Value>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub created_at: Option<Option<Value>>,
    pub name: Option<String>,
    pub method: Option<HttpMethod>,
    pub path: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` clears the request schema.
    #[serde(default, deserialize_with = "explicit_null")]
    pub request_schema: Option<Option<String>>,
    pub response_schema: Option<String>,
    pub example_response: Option<Value>,
}

impl EndpointPatch {
    pub fn method(method: HttpMethod) -> Self {
        Self {
            method: Some(method),
            ..Default::default()
        }
    }

    /// Name of the first immutable field present in the patch, if any.
    pub fn immutable_field(&self) -> Option<&'static str> {
        if self.id.is_some() {
            Some("id")
        } else if self.created_at.is_some() {
            Some("createdAt")
        } else {
            None
        }
    }

    /// Merge the patch into a copy of `record`.
    pub fn apply(&self, record: &EndpointRecord) -> EndpointRecord {
        let mut updated = record.clone();
        if let Some(name) = &self.name {
            updated.name = name.clone();
        }
        if let Some(method) = self.method {
            updated.method = method;
        }
        if let Some(path) = &self.path {
            updated.path = path.clone();
        }
        if let Some(description) = &self.description {
            updated.description = description.clone();
        }
        if let Some(request_schema) = &self.request_schema {
            updated.request_schema = request_schema.clone();
        }
        if let Some(response_schema) = &self.response_schema {
            updated.response_schema = response_schema.clone();
        }
        if let Some(example) = &self.example_response {
            updated.example_response = example.clone();
        }
        updated
    }
}

/// Distinguishes a key sent as `null` (`Some(None)`) from an absent key (`None`).
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn empty_object() -> Value {
    json!({})
}
