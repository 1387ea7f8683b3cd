use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScopeConfig {
    /// Reuse one scope object per declaration, so sibling declarations share
    /// their ancestor scopes. When off, every request builds a fresh chain.
    pub share_scopes: bool,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self { share_scopes: true }
    }
}
