//! A root that fails to build does not use up the process slot.

use scout_engine::{AppError, AppOptions, AppSlot, ApplicationState};

#[test]
fn failed_construction_leaves_slot_free() {
    let err = ApplicationState::for_process(AppOptions::default().with_uri("postgres://x:1"))
        .unwrap_err();
    assert!(matches!(err, AppError::Connection(_)));
    assert!(!AppSlot::is_claimed());

    let app = ApplicationState::for_process(AppOptions::default()).expect("slot still free");
    assert!(app.is_process_root());
    assert!(AppSlot::is_claimed());
}
