use serde::{Deserialize, Serialize};

/// Search tunables. Every field has a default, so a partial JSON document
/// only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ply depth used when the caller does not pick one per search.
    pub search_depth: u8,
    /// Memoization table size in megabytes.
    pub tt_size_mb: usize,
    /// Optional node budget; the search aborts with its best value so far
    /// once exceeded.
    pub max_nodes: Option<u64>,
    /// Switch for the memoization table. Disabling it changes performance
    /// only, never the verdict.
    pub use_memo: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_depth: 3,
            tt_size_mb: 1,
            max_nodes: None,
            use_memo: true,
        }
    }
}

impl EngineConfig {
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }
}
