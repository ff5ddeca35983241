//! Once-per-process guard for the application root.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::AppError;

static CLAIMED: AtomicBool = AtomicBool::new(false);

/// Proof that this process has claimed its single application root.
///
/// The slot is never released; the root lives until the process exits.
#[derive(Debug)]
pub struct AppSlot {
    _private: (),
}

impl AppSlot {
    pub fn claim() -> Result<Self, AppError> {
        if CLAIMED.swap(true, Ordering::SeqCst) {
            return Err(AppError::AlreadyInitialized);
        }
        Ok(Self { _private: () })
    }

    #[must_use]
    pub fn is_claimed() -> bool {
        CLAIMED.load(Ordering::SeqCst)
    }
}
