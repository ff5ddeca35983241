//! The status line shown below the page.

use scout_types::StatePath;

use super::{ChangeLog, ChildState, assign};

const MAX_PROGRESS: u8 = 100;

/// The bottom status line: a message plus a progress value in percent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statusbar {
    visible: bool,
    message: String,
    progress: u8,
    changes: ChangeLog,
}

impl Statusbar {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn show(&mut self, message: impl Into<String>) {
        assign(&mut self.message, message.into(), StatePath::StatusbarMessage, &mut self.changes);
        assign(&mut self.visible, true, StatePath::StatusbarVisible, &mut self.changes);
    }

    pub fn hide(&mut self) {
        assign(&mut self.visible, false, StatePath::StatusbarVisible, &mut self.changes);
        assign(&mut self.message, String::new(), StatePath::StatusbarMessage, &mut self.changes);
        assign(&mut self.progress, 0, StatePath::StatusbarProgress, &mut self.changes);
    }

    /// Clamped to 100.
    pub fn set_progress(&mut self, progress: u8) {
        assign(
            &mut self.progress,
            progress.min(MAX_PROGRESS),
            StatePath::StatusbarProgress,
            &mut self.changes,
        );
    }
}

impl ChildState for Statusbar {
    fn drain_changes(&mut self) -> Vec<StatePath> {
        self.changes.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_then_hide() {
        let mut bar = Statusbar::default();
        bar.show("Loading");
        bar.set_progress(40);
        assert!(bar.is_visible());
        assert_eq!(bar.message(), "Loading");
        bar.drain_changes();

        bar.hide();
        assert!(!bar.is_visible());
        assert_eq!(bar.message(), "");
        assert_eq!(bar.progress(), 0);
        assert_eq!(bar.drain_changes().len(), 3);
    }

    #[test]
    fn progress_is_clamped() {
        let mut bar = Statusbar::default();
        bar.set_progress(250);
        assert_eq!(bar.progress(), 100);
    }
}
