//! Core domain types for Scout.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod path;
pub use path::{ChildKind, StatePath, UnknownPathError};

use serde::{Deserialize, Serialize};

// ============================================================================
// History Options
// ============================================================================

/// Options passed to the history collaborator when tracking starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartOptions {
    /// `false` means hash-based navigation; `true` would rewrite the full location.
    pub push_state: bool,
    pub root: String,
}

impl StartOptions {
    /// Hash-based navigation rooted at the application root.
    #[must_use]
    pub fn hash_root() -> Self {
        Self {
            push_state: false,
            root: "/".to_string(),
        }
    }
}

/// Options for a single history navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryNavigateOptions {
    /// Run the route callback for the new fragment.
    pub trigger: bool,
}

impl HistoryNavigateOptions {
    #[must_use]
    pub const fn new(trigger: bool) -> Self {
        Self { trigger }
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Insertion-ordered query parameters for a navigation.
///
/// The workspace enables `serde_json/preserve_order`, so iteration order is the
/// order keys were inserted in.
pub type QueryParams = serde_json::Map<String, serde_json::Value>;

/// The connection string used when nothing else supplies one.
pub const DEFAULT_CONNECTION_URI: &str = "mongodb://localhost:27017";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hash_root_disables_push_state() {
        let options = StartOptions::hash_root();
        assert!(!options.push_state);
        assert_eq!(options.root, "/");
    }

    #[test]
    fn start_options_serialize_camel_case() {
        let value = serde_json::to_value(StartOptions::hash_root()).unwrap();
        assert_eq!(value, json!({"pushState": false, "root": "/"}));
    }

    #[test]
    fn query_params_keep_insertion_order() {
        let mut params = QueryParams::new();
        params.insert("zeta".into(), json!(1));
        params.insert("alpha".into(), json!(2));
        let keys: Vec<&str> = params.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }
}
