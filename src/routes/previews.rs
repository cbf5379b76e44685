use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::AppError;
use crate::generation::prompt::{DEFAULT_LANGUAGE, SUGGESTED_LANGUAGES};
use crate::models::ViewMode;
use crate::preview::code::EMPTY_CODE_HINT;
use crate::preview::docs::pretty_json;
use crate::preview::{MockTestRun, mock_test_run, render_docs};
use crate::state::SharedState;

pub async fn docs(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<String, AppError> {
    let record = state.store.get(id)?;
    Ok(render_docs(&record))
}

pub async fn test_run(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MockTestRun>, AppError> {
    let record = state.store.get(id)?;
    Ok(Json(mock_test_run(&record)))
}

/// Everything one editor tab shows for an endpoint.
pub async fn view(
    State(state): State<SharedState>,
    Path((id, view)): Path<(Uuid, ViewMode)>,
) -> Result<Json<Value>, AppError> {
    let record = state.store.get(id)?;

    let body = match view {
        ViewMode::Design => {
            let schema: Value = serde_json::from_str(&record.response_schema)
                .map_err(|e| AppError::Internal(format!("Stored schema for {id} is invalid: {e}")))?;
            json!({
                "view": view,
                "endpoint": record,
                "responseSchema": schema,
            })
        }
        ViewMode::Docs => json!({
            "view": view,
            "markdown": render_docs(&record),
            "responseSchema": pretty_json(&record.response_schema),
        }),
        ViewMode::Test => json!({
            "view": view,
            "run": mock_test_run(&record),
        }),
        ViewMode::Code => {
            let preview = match state.previews.current(id) {
                Some(slot) => json!(slot),
                None => json!({ "code": EMPTY_CODE_HINT, "pending": false }),
            };
            json!({
                "view": view,
                "preview": preview,
                "languages": SUGGESTED_LANGUAGES,
                "defaultLanguage": DEFAULT_LANGUAGE,
            })
        }
    };

    Ok(Json(body))
}
