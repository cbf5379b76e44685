pub mod endpoints;
pub mod generate;
pub mod previews;
pub mod project;
pub mod sync;

use axum::Router;
use axum::routing::{get, post};

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Project
        .route("/api/v1/project", get(project::get_state))
        .route("/api/v1/events", get(project::events))
        // Endpoints
        .route(
            "/api/v1/endpoints",
            get(endpoints::list).post(endpoints::create),
        )
        .route(
            "/api/v1/endpoints/{id}",
            get(endpoints::get)
                .put(endpoints::update)
                .delete(endpoints::delete),
        )
        .route("/api/v1/endpoints/{id}/select", post(endpoints::select))
        // Generation
        .route("/api/v1/generate/endpoint", post(generate::endpoint))
        .route(
            "/api/v1/endpoints/{id}/code",
            get(generate::current_code).post(generate::client_code),
        )
        // Previews
        .route("/api/v1/endpoints/{id}/docs", get(previews::docs))
        .route("/api/v1/endpoints/{id}/test", get(previews::test_run))
        .route("/api/v1/endpoints/{id}/preview/{view}", get(previews::view))
        // Sync
        .route("/api/v1/sync/status", get(sync::status))
        .route("/api/v1/sync/pull", post(sync::pull))
        .route("/api/v1/sync/push", post(sync::push))
}
