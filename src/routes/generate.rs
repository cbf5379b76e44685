use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::AppError;
use crate::generation::prompt::DEFAULT_LANGUAGE;
use crate::models::EndpointRecord;
use crate::preview::code::EMPTY_CODE_HINT;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct GenerateEndpoint {
    pub prompt: String,
}

#[derive(Deserialize)]
pub struct GenerateCode {
    pub language: Option<String>,
}

/// Design an endpoint from a natural-language requirement and add it.
pub async fn endpoint(
    State(state): State<SharedState>,
    Json(req): Json<GenerateEndpoint>,
) -> Result<Json<EndpointRecord>, AppError> {
    if req.prompt.trim().is_empty() {
        return Err(AppError::BadRequest("prompt is required".to_string()));
    }

    let draft = state.generator.generate_endpoint(&req.prompt).await?;
    let id = state.store.add_endpoint(draft)?;
    Ok(Json(state.store.get(id)?))
}

/// Generate client code. Failures degrade to placeholder code, never an error.
pub async fn client_code(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<GenerateCode>,
) -> Result<Json<Value>, AppError> {
    let record = state.store.get(id)?;
    let language = req
        .language
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_string();

    // Detached: the slot must resolve even if the client disconnects.
    let ticket = state.previews.begin(id, &language);
    let task = {
        let state = state.clone();
        tokio::spawn(async move {
            state
                .previews
                .fulfil(ticket, &state.generator, &record, &language)
                .await
        })
    };
    let applied = task
        .await
        .map_err(|e| AppError::Internal(format!("Code generation task failed: {e}")))?;

    Ok(Json(json!({
        "applied": applied,
        "preview": state.previews.current(id),
    })))
}

pub async fn current_code(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.store.get(id)?;
    let body = match state.previews.current(id) {
        Some(slot) => json!(slot),
        None => json!({ "code": EMPTY_CODE_HINT, "pending": false }),
    };
    Ok(Json(body))
}
