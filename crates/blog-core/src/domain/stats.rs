use serde::{Deserialize, Serialize};

/// Live row counts reported by the root endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub posts: u64,
    #[serde(rename = "comentarios")]
    pub comments: u64,
}
