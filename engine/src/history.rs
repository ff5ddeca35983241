//! History tracking behind the router.
//!
//! The router only ever talks to a [`History`]: `start` once, then `navigate`
//! with already-normalized fragments. [`HashHistory`] is the in-process
//! implementation used by the binary.

use std::fmt;

use scout_types::{HistoryNavigateOptions, StartOptions};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("history has already been started")]
    AlreadyStarted,
    #[error("history has not been started")]
    NotStarted,
}

/// The history collaborator used by [`crate::Router`].
pub trait History: fmt::Debug {
    fn start(&mut self, options: StartOptions) -> Result<(), HistoryError>;

    /// Move to `fragment`. Returns `true` when the current fragment changed.
    fn navigate(
        &mut self,
        fragment: &str,
        options: HistoryNavigateOptions,
    ) -> Result<bool, HistoryError>;

    fn fragment(&self) -> &str;

    fn is_started(&self) -> bool;
}

/// One recorded navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub fragment: String,
    pub trigger: bool,
}

/// Hash-style history kept in memory.
#[derive(Debug, Default)]
pub struct HashHistory {
    options: Option<StartOptions>,
    fragment: String,
    entries: Vec<HistoryEntry>,
}

impl HashHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The most recent entry that asked for its route callback to run.
    #[must_use]
    pub fn last_triggered(&self) -> Option<&HistoryEntry> {
        self.entries.iter().rev().find(|entry| entry.trigger)
    }
}

impl History for HashHistory {
    fn start(&mut self, options: StartOptions) -> Result<(), HistoryError> {
        if self.options.is_some() {
            return Err(HistoryError::AlreadyStarted);
        }
        tracing::debug!(push_state = options.push_state, root = %options.root, "history started");
        self.options = Some(options);
        Ok(())
    }

    fn navigate(
        &mut self,
        fragment: &str,
        options: HistoryNavigateOptions,
    ) -> Result<bool, HistoryError> {
        if self.options.is_none() {
            return Err(HistoryError::NotStarted);
        }
        if self.fragment == fragment {
            return Ok(false);
        }
        self.fragment = fragment.to_string();
        self.entries.push(HistoryEntry {
            fragment: fragment.to_string(),
            trigger: options.trigger,
        });
        Ok(true)
    }

    fn fragment(&self) -> &str {
        &self.fragment
    }

    fn is_started(&self) -> bool {
        self.options.is_some()
    }
}
