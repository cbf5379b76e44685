use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{EndpointDraft, EndpointPatch, EndpointRecord};
use crate::state::SharedState;
use crate::validation;

pub async fn list(State(state): State<SharedState>) -> Json<Vec<EndpointRecord>> {
    Json(state.store.endpoints())
}

/// An empty body adds the blank "New Endpoint" record.
pub async fn create(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<EndpointRecord>, AppError> {
    let id = if body.iter().all(u8::is_ascii_whitespace) {
        state.store.add_blank_endpoint()
    } else {
        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON: {e}")))?;
        validation::validate_value(&value)?;
        let draft: EndpointDraft = serde_json::from_value(value)
            .map_err(|e| AppError::BadRequest(format!("Invalid endpoint: {e}")))?;
        state.store.add_endpoint(draft)?
    };

    Ok(Json(state.store.get(id)?))
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EndpointRecord>, AppError> {
    Ok(Json(state.store.get(id)?))
}

pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Result<Json<EndpointRecord>, AppError> {
    let patch: EndpointPatch = serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid update: {e}")))?;

    let endpoint = state.store.update_endpoint(id, &patch)?;
    Ok(Json(endpoint))
}

pub async fn delete(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.store.delete_endpoint(id)?;
    state.previews.forget(id);
    Ok(Json(json!({ "message": "Deleted" })))
}

pub async fn select(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.store.select_endpoint(id)?;
    Ok(Json(json!({ "selectedEndpointId": id })))
}
