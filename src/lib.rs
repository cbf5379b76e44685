pub mod config;
pub mod error;
pub mod generation;
pub mod models;
pub mod preview;
pub mod routes;
pub mod state;
pub mod store;
pub mod sync;
pub mod validation;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::generation::gemini::GeminiBackend;
use crate::generation::{GenerationBackend, GenerationError, GenerationGateway};
use crate::preview::CodePreviews;
use crate::state::{AppState, SharedState};
use crate::store::ProjectStore;
use crate::sync::simulated::SimulatedRepository;
use crate::sync::{SyncBackend, SyncGateway};

/// Build the app with the Gemini generation backend and the simulated repository.
pub fn build_app(config: Config) -> Result<(Router, SharedState), GenerationError> {
    let generation: Arc<dyn GenerationBackend> = Arc::new(GeminiBackend::new(
        config.generation.base_url.clone(),
        config.generation.api_key.clone(),
    )?);
    if config.generation.api_key.is_none() {
        tracing::warn!("No generation API key configured; AI generation will fail");
    }

    let sync: Arc<dyn SyncBackend> = Arc::new(SimulatedRepository::new(
        config.sync.pull_latency,
        config.sync.push_latency,
    ));

    Ok(build_app_with(config, generation, sync))
}

/// Build the app around caller-provided backends.
pub fn build_app_with(
    config: Config,
    generation: Arc<dyn GenerationBackend>,
    sync: Arc<dyn SyncBackend>,
) -> (Router, SharedState) {
    let generator = GenerationGateway::new(
        generation,
        config.generation.endpoint_model.clone(),
        config.generation.code_model.clone(),
        config.generation.timeout,
    );
    let sync = SyncGateway::new(sync, config.sync.timeout);

    tracing::info!(
        "Using generation backend '{}' and sync backend '{}'",
        generator.backend_id(),
        sync.backend_id()
    );

    let max_body_size = config.max_body_size;
    let state: SharedState = Arc::new(AppState {
        config,
        store: ProjectStore::new(),
        generator,
        sync,
        previews: CodePreviews::new(),
    });

    let app = Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(max_body_size))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                )),
        )
        .with_state(state.clone());

    (app, state)
}

async fn health() -> &'static str {
    "ok"
}
