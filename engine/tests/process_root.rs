//! The process-wide root can be claimed once; later claims fail.

use scout_engine::{AppError, AppOptions, AppSlot, ApplicationState};

#[test]
fn second_process_root_is_rejected() {
    let app = ApplicationState::for_process(AppOptions::default().with_uri("mongodb://host:1"))
        .expect("first root");
    assert!(app.is_process_root());
    assert!(AppSlot::is_claimed());

    let err = ApplicationState::for_process(AppOptions::default()).unwrap_err();
    assert!(matches!(err, AppError::AlreadyInitialized));
    assert!(matches!(AppSlot::claim(), Err(AppError::AlreadyInitialized)));

    // Unguarded roots stay available for embedding and tests.
    let scratch = ApplicationState::new(AppOptions::default()).expect("scratch root");
    assert!(!scratch.is_process_root());
    assert_eq!(app.connection().uri(), "mongodb://host:1");
}
