use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::AppError;
use crate::models::SyncStatus;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct SyncRequest {
    pub repository: String,
}

pub async fn status(State(state): State<SharedState>) -> Json<SyncStatus> {
    Json(state.store.sync_status())
}

/// Replace the local collection with the remote one.
pub async fn pull(
    State(state): State<SharedState>,
    Json(req): Json<SyncRequest>,
) -> Result<Json<Value>, AppError> {
    let count = state
        .store
        .pull_from_remote(&state.sync, &req.repository)
        .await?;

    let live: Vec<_> = state.store.endpoints().iter().map(|ep| ep.id).collect();
    state.previews.retain_endpoints(&live);

    Ok(Json(json!({
        "pulled": count,
        "status": state.store.sync_status(),
    })))
}

pub async fn push(
    State(state): State<SharedState>,
    Json(req): Json<SyncRequest>,
) -> Result<Json<Value>, AppError> {
    let success = state
        .store
        .push_to_remote(&state.sync, &req.repository)
        .await?;

    Ok(Json(json!({
        "success": success,
        "status": state.store.sync_status(),
    })))
}
