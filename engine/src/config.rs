use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// `~/.scout/config.toml`.
///
/// ```toml
/// [connection]
/// uri = "mongodb://${MONGO_HOST}:27017"
///
/// [query]
/// limit = 100
///
/// [app]
/// ascii_only = false
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ScoutConfig {
    pub app: Option<AppConfig>,
    pub connection: Option<ConnectionConfig>,
    pub query: Option<QueryConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs in the terminal UI.
    #[serde(default)]
    pub ascii_only: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConnectionConfig {
    /// Default connection string. `${VAR}` references are expanded.
    pub uri: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryConfig {
    /// Default document limit for queries.
    pub limit: Option<u64>,
}

/// Replace `${VAR}` with the value of `VAR` (empty when unset).
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) if end > 0 => {
                out.push_str(&env::var(&after[..end]).unwrap_or_default());
                rest = &after[end + 1..];
            }
            _ => {
                // Not a reference; keep the `${` literally and continue after it.
                out.push_str("${");
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

impl ScoutConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    /// Load from an explicit path. A missing file is `Ok(None)`.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// The configured default connection string, with env references expanded.
    #[must_use]
    pub fn connection_uri(&self) -> Option<String> {
        let raw = self.connection.as_ref()?.uri.as_deref()?;
        let expanded = expand_env_vars(raw);
        let trimmed = expanded.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    #[must_use]
    pub fn query_limit(&self) -> Option<u64> {
        self.query.as_ref().and_then(|query| query.limit)
    }

    #[must_use]
    pub fn ascii_only(&self) -> bool {
        self.app.as_ref().is_some_and(|app| app.ascii_only)
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".scout").join("config.toml"))
}
