//! The API client seam.
//!
//! The application never talks to a database itself. It hands the current
//! connection seed to a [`ClientFactory`] and keeps whatever opaque
//! [`ClientHandle`] comes back as its `client` derived property.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("client seed must not be empty")]
    EmptySeed,
    #[error("client rejected seed {seed}: {reason}")]
    Rejected { seed: String, reason: String },
}

/// Opaque capability for talking to the server behind a connection seed.
///
/// Cloning is cheap; clones compare equal to the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHandle {
    id: u64,
    seed: Arc<str>,
}

impl ClientHandle {
    /// Allocates a handle with a process-unique id.
    #[must_use]
    pub fn new(seed: &str) -> Self {
        Self {
            id: NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed),
            seed: Arc::from(seed),
        }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn seed(&self) -> &str {
        &self.seed
    }
}

pub trait ClientFactory {
    fn create_client(&self, seed: &str) -> Result<ClientHandle, ClientError>;
}

impl<F> ClientFactory for F
where
    F: Fn(&str) -> Result<ClientHandle, ClientError>,
{
    fn create_client(&self, seed: &str) -> Result<ClientHandle, ClientError> {
        self(seed)
    }
}

/// Default factory: any non-empty seed yields a fresh handle.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeedClientFactory;

impl ClientFactory for SeedClientFactory {
    fn create_client(&self, seed: &str) -> Result<ClientHandle, ClientError> {
        if seed.trim().is_empty() {
            return Err(ClientError::EmptySeed);
        }
        let client = ClientHandle::new(seed);
        tracing::debug!(id = client.id(), seed, "created scout client");
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_factory_rejects_blank_seed() {
        assert_eq!(
            SeedClientFactory.create_client("  "),
            Err(ClientError::EmptySeed)
        );
    }

    #[test]
    fn handles_get_distinct_ids() {
        let a = SeedClientFactory.create_client("mongodb://a:1").unwrap();
        let b = SeedClientFactory.create_client("mongodb://a:1").unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.seed(), b.seed());
        assert_eq!(a.clone(), a);
    }

    #[test]
    fn closures_are_factories() {
        let factory = |seed: &str| -> Result<ClientHandle, ClientError> {
            Err(ClientError::Rejected {
                seed: seed.to_string(),
                reason: "offline".to_string(),
            })
        };
        let err = factory.create_client("mongodb://x:1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "client rejected seed mongodb://x:1: offline"
        );
    }
}
