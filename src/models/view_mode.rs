use serde::{Deserialize, Serialize};

/// Editor tabs an endpoint can be previewed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Design,
    Docs,
    Test,
    Code,
}
