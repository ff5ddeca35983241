//! The connection the application is pointed at.

use scout_types::{DEFAULT_CONNECTION_URI, StatePath};
use thiserror::Error;
use url::Url;

use super::{ChangeLog, ChildState, assign};

pub const DEFAULT_PORT: u16 = 27017;
const MONGODB_SCHEME: &str = "mongodb";
const SCHEMES: [&str; 2] = [MONGODB_SCHEME, "mongodb+srv"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("connection string is blank")]
    Blank,
    #[error("connection string {uri:?} has no scheme; expected mongodb:// or mongodb+srv://")]
    MissingScheme { uri: String },
    #[error("unsupported scheme {scheme:?} in {uri:?}; expected mongodb:// or mongodb+srv://")]
    UnsupportedScheme { uri: String, scheme: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    uri: String,
    hostname: String,
    port: u16,
    changes: ChangeLog,
}

impl Default for Connection {
    fn default() -> Self {
        Self {
            uri: DEFAULT_CONNECTION_URI.to_string(),
            hostname: "localhost".to_string(),
            port: DEFAULT_PORT,
            changes: ChangeLog::default(),
        }
    }
}

impl Connection {
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// First host of the seed list.
    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Point the connection at `uri`.
    ///
    /// The string is kept exactly as given. Only the scheme is checked;
    /// hostname and port come from the first seed host on a best-effort basis.
    /// Nothing changes when the scheme is rejected.
    pub fn use_uri(&mut self, uri: &str) -> Result<(), ConnectionError> {
        let (hostname, port) = seed_address(uri)?;
        assign(&mut self.uri, uri.to_string(), StatePath::ConnectionUri, &mut self.changes);
        assign(&mut self.hostname, hostname, StatePath::ConnectionHostname, &mut self.changes);
        assign(&mut self.port, port, StatePath::ConnectionPort, &mut self.changes);
        Ok(())
    }
}

/// Host and port of the first entry in the seed list of `uri`.
fn seed_address(uri: &str) -> Result<(String, u16), ConnectionError> {
    let trimmed = uri.trim();
    if trimmed.is_empty() {
        return Err(ConnectionError::Blank);
    }
    let (scheme, rest) = trimmed
        .split_once("://")
        .ok_or_else(|| ConnectionError::MissingScheme {
            uri: uri.to_string(),
        })?;
    if !SCHEMES.contains(&scheme) {
        return Err(ConnectionError::UnsupportedScheme {
            uri: uri.to_string(),
            scheme: scheme.to_string(),
        });
    }

    let authority = rest.split(['/', '?']).next().unwrap_or_default();
    let hosts = authority.rsplit_once('@').map_or(authority, |(_, hosts)| hosts);
    let first = hosts.split(',').next().unwrap_or_default();
    Ok(host_and_port(first))
}

fn host_and_port(host: &str) -> (String, u16) {
    match Url::parse(&format!("{MONGODB_SCHEME}://{host}")) {
        Ok(parsed) => (
            parsed.host_str().unwrap_or_default().to_string(),
            parsed.port().unwrap_or(DEFAULT_PORT),
        ),
        Err(err) => {
            tracing::debug!(host, %err, "keeping unparseable seed host verbatim");
            (host.to_string(), DEFAULT_PORT)
        }
    }
}

impl ChildState for Connection {
    fn drain_changes(&mut self) -> Vec<StatePath> {
        self.changes.drain()
    }
}
