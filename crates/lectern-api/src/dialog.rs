//! Search dialog binding for the docs UI.

use serde::{Deserialize, Serialize};

/// Path the search dialog queries.
pub const SEARCH_API_PATH: &str = "/api/vector-store";

/// Settings the docs UI uses to wire its search modal to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDialogConfig {
    /// Gateway path.
    pub api: String,
    /// Input debounce in milliseconds.
    pub delay_ms: u64,
}

impl SearchDialogConfig {
    /// Binding to the gateway's search path with the given debounce delay.
    pub fn new(delay_ms: u64) -> Self {
        Self {
            api: SEARCH_API_PATH.to_string(),
            delay_ms,
        }
    }
}

impl Default for SearchDialogConfig {
    fn default() -> Self {
        Self::new(200)
    }
}
