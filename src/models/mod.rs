mod endpoint;
mod project;
mod view_mode;

pub use endpoint::{EndpointDraft, EndpointPatch, EndpointRecord, HttpMethod};
pub use project::{ProjectState, SyncStatus};
pub use view_mode::ViewMode;
