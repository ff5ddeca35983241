//! Dependency paths into the application's child states.
//!
//! Derived properties declare what they read as a set of [`StatePath`]s. The
//! enum is closed, so a misspelled dependency is a compile error rather than a
//! derived value that silently never invalidates. Paths that arrive as text
//! (config, debugging tools) go through [`StatePath::from_str`], which rejects
//! anything not in [`StatePath::ALL`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The child states owned by the application root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChildKind {
    Router,
    QueryOptions,
    Statusbar,
    Connection,
}

impl ChildKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ChildKind::Router => "router",
            ChildKind::QueryOptions => "queryOptions",
            ChildKind::Statusbar => "statusbar",
            ChildKind::Connection => "connection",
        }
    }
}

impl fmt::Display for ChildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dotted reference to a single child state field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatePath {
    ConnectionUri,
    ConnectionHostname,
    ConnectionPort,
    QueryOptionsQuery,
    QueryOptionsSort,
    QueryOptionsLimit,
    QueryOptionsSkip,
    StatusbarVisible,
    StatusbarMessage,
    StatusbarProgress,
    RouterFragment,
}

impl StatePath {
    pub const ALL: [StatePath; 11] = [
        StatePath::ConnectionUri,
        StatePath::ConnectionHostname,
        StatePath::ConnectionPort,
        StatePath::QueryOptionsQuery,
        StatePath::QueryOptionsSort,
        StatePath::QueryOptionsLimit,
        StatePath::QueryOptionsSkip,
        StatePath::StatusbarVisible,
        StatePath::StatusbarMessage,
        StatePath::StatusbarProgress,
        StatePath::RouterFragment,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StatePath::ConnectionUri => "connection.uri",
            StatePath::ConnectionHostname => "connection.hostname",
            StatePath::ConnectionPort => "connection.port",
            StatePath::QueryOptionsQuery => "queryOptions.query",
            StatePath::QueryOptionsSort => "queryOptions.sort",
            StatePath::QueryOptionsLimit => "queryOptions.limit",
            StatePath::QueryOptionsSkip => "queryOptions.skip",
            StatePath::StatusbarVisible => "statusbar.visible",
            StatePath::StatusbarMessage => "statusbar.message",
            StatePath::StatusbarProgress => "statusbar.progress",
            StatePath::RouterFragment => "router.fragment",
        }
    }

    /// The child state this path points into.
    #[must_use]
    pub const fn child(self) -> ChildKind {
        match self {
            StatePath::ConnectionUri | StatePath::ConnectionHostname | StatePath::ConnectionPort => {
                ChildKind::Connection
            }
            StatePath::QueryOptionsQuery
            | StatePath::QueryOptionsSort
            | StatePath::QueryOptionsLimit
            | StatePath::QueryOptionsSkip => ChildKind::QueryOptions,
            StatePath::StatusbarVisible
            | StatePath::StatusbarMessage
            | StatePath::StatusbarProgress => ChildKind::Statusbar,
            StatePath::RouterFragment => ChildKind::Router,
        }
    }
}

impl fmt::Display for StatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown state path: {0:?}")]
pub struct UnknownPathError(pub String);

impl FromStr for StatePath {
    type Err = UnknownPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatePath::ALL
            .into_iter()
            .find(|path| path.as_str() == s)
            .ok_or_else(|| UnknownPathError(s.to_string()))
    }
}

impl TryFrom<String> for StatePath {
    type Error = UnknownPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StatePath> for String {
    fn from(value: StatePath) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_path_round_trips_through_text() {
        for path in StatePath::ALL {
            assert_eq!(path.as_str().parse::<StatePath>(), Ok(path));
        }
    }

    #[test]
    fn unknown_path_is_rejected() {
        let err = "connection.url".parse::<StatePath>().unwrap_err();
        assert_eq!(err, UnknownPathError("connection.url".to_string()));
    }

    #[test]
    fn path_prefix_names_its_child() {
        for path in StatePath::ALL {
            let (prefix, _) = path.as_str().split_once('.').unwrap();
            assert_eq!(prefix, path.child().as_str());
        }
    }

    #[test]
    fn deserialize_validates_path() {
        let ok: StatePath = serde_json::from_str("\"connection.uri\"").unwrap();
        assert_eq!(ok, StatePath::ConnectionUri);
        assert!(serde_json::from_str::<StatePath>("\"connection.nope\"").is_err());
    }
}
