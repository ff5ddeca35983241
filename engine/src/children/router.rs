//! The router child: a thin owner of the history collaborator.

use scout_types::{HistoryNavigateOptions, StartOptions, StatePath};

use super::{ChangeLog, ChildState};
use crate::history::{HashHistory, History, HistoryError};

#[derive(Debug)]
pub struct Router {
    history: Box<dyn History>,
    changes: ChangeLog,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Box::new(HashHistory::new()))
    }
}

impl Router {
    #[must_use]
    pub fn new(history: Box<dyn History>) -> Self {
        Self {
            history,
            changes: ChangeLog::default(),
        }
    }

    #[must_use]
    pub fn history(&self) -> &dyn History {
        self.history.as_ref()
    }

    #[must_use]
    pub fn fragment(&self) -> &str {
        self.history.fragment()
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.history.is_started()
    }

    pub fn start(&mut self, options: StartOptions) -> Result<(), HistoryError> {
        self.history.start(options)
    }

    pub fn navigate(
        &mut self,
        fragment: &str,
        options: HistoryNavigateOptions,
    ) -> Result<(), HistoryError> {
        if self.history.navigate(fragment, options)? {
            self.changes.record(StatePath::RouterFragment);
        }
        Ok(())
    }
}

impl ChildState for Router {
    fn drain_changes(&mut self) -> Vec<StatePath> {
        self.changes.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_change_is_recorded() {
        let mut router = Router::default();
        router.start(StartOptions::hash_root()).unwrap();
        router
            .navigate("schema", HistoryNavigateOptions::new(true))
            .unwrap();
        assert_eq!(router.fragment(), "schema");
        assert_eq!(router.drain_changes(), vec![StatePath::RouterFragment]);

        router
            .navigate("schema", HistoryNavigateOptions::new(true))
            .unwrap();
        assert!(router.drain_changes().is_empty());
    }

    #[test]
    fn history_errors_pass_through() {
        let mut router = Router::default();
        assert_eq!(
            router.navigate("x", HistoryNavigateOptions::new(true)),
            Err(HistoryError::NotStarted)
        );
        assert!(!router.is_started());
    }
}
