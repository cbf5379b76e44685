use std::fmt::Write;

use serde_json::Value;

use crate::models::EndpointRecord;

/// Render a Markdown API reference page for one endpoint.
pub fn render_docs(record: &EndpointRecord) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# {}\n", heading(&record.name));
    let _ = writeln!(out, "`{} {}`\n", record.method, record.path);
    if !record.description.trim().is_empty() {
        let _ = writeln!(out, "{}\n", record.description.trim());
    }

    out.push_str("## Headers\n\n");
    out.push_str("| Name | Type | Description |\n");
    out.push_str("|------|------|-------------|\n");
    out.push_str("| `Authorization` | string | Bearer token required for authentication |\n");
    out.push_str("| `Content-Type` | string | application/json |\n\n");

    if let Some(schema) = record.request_schema.as_deref().filter(|s| !s.trim().is_empty()) {
        out.push_str("## Request Body\n\n");
        let _ = writeln!(out, "```json\n{}\n```\n", pretty_json(schema));
    }

    out.push_str("## Response Codes\n\n");
    let _ = writeln!(out, "- **200** Success - returns {} resource", heading(&record.name));
    out.push_str("- **401** Unauthorized - missing or invalid token\n\n");

    out.push_str("## Response Schema\n\n");
    let _ = writeln!(out, "```json\n{}\n```", pretty_json(&record.response_schema));

    out
}

fn heading(name: &str) -> &str {
    let name = name.trim();
    if name.is_empty() { "Untitled endpoint" } else { name }
}

/// Pretty-print JSON text, falling back to the text as-is if it does not parse.
pub fn pretty_json(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| text.to_string())
}
