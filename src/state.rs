use std::sync::Arc;

use crate::config::Config;
use crate::generation::GenerationGateway;
use crate::preview::CodePreviews;
use crate::store::ProjectStore;
use crate::sync::SyncGateway;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub store: ProjectStore,
    pub generator: GenerationGateway,
    pub sync: SyncGateway,
    pub previews: CodePreviews,
}
