//! Child states owned by the application root.
//!
//! Children never notify anyone directly. Each setter records the
//! [`StatePath`] it changed in a [`ChangeLog`]; the root drains the log after
//! every mutation it hands out and forwards the paths to the derived engine.

mod connection;
mod query_options;
mod router;
mod statusbar;

pub use connection::{Connection, ConnectionError, DEFAULT_PORT};
pub use query_options::{DEFAULT_LIMIT, QueryOptions, QueryOptionsError};
pub use router::Router;
pub use statusbar::Statusbar;

use scout_types::StatePath;

/// A sub-state of the application root.
pub trait ChildState {
    /// Paths changed since the last drain, in first-change order.
    fn drain_changes(&mut self) -> Vec<StatePath>;
}

/// Paths written since the last drain.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ChangeLog(Vec<StatePath>);

impl ChangeLog {
    pub(crate) fn record(&mut self, path: StatePath) {
        if !self.0.contains(&path) {
            self.0.push(path);
        }
    }

    pub(crate) fn drain(&mut self) -> Vec<StatePath> {
        std::mem::take(&mut self.0)
    }
}

/// Assign `value` to `slot`, recording `path` when the value actually changed.
pub(crate) fn assign<T: PartialEq>(
    slot: &mut T,
    value: T,
    path: StatePath,
    changes: &mut ChangeLog,
) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    changes.record(path);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_log_deduplicates_in_order() {
        let mut log = ChangeLog::default();
        log.record(StatePath::StatusbarMessage);
        log.record(StatePath::ConnectionUri);
        log.record(StatePath::StatusbarMessage);
        assert_eq!(
            log.drain(),
            vec![StatePath::StatusbarMessage, StatePath::ConnectionUri]
        );
        assert!(log.drain().is_empty());
    }

    #[test]
    fn assign_skips_equal_values() {
        let mut log = ChangeLog::default();
        let mut slot = 3_u64;
        assert!(!assign(&mut slot, 3, StatePath::QueryOptionsLimit, &mut log));
        assert!(log.drain().is_empty());
        assert!(assign(&mut slot, 4, StatePath::QueryOptionsLimit, &mut log));
        assert_eq!(log.drain(), vec![StatePath::QueryOptionsLimit]);
        assert_eq!(slot, 4);
    }
}
