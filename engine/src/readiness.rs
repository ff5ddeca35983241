//! One-shot readiness gate.
//!
//! Bootstrap work (mounting the renderer, starting history) waits until the
//! environment says it is ready. The gate moves `Unarmed -> Armed -> Fired` and
//! never goes back; the callback runs at most once however often the signal
//! arrives.

use std::fmt;
use std::mem;

use thiserror::Error;

use crate::history::HistoryError;

/// Work deferred until the environment is ready.
pub type BootstrapFn<A> = Box<dyn FnOnce(&mut A) -> Result<(), BootstrapError>>;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to start history: {0}")]
    History(#[from] HistoryError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("readiness gate is already armed")]
    AlreadyArmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unarmed,
    Armed,
    Fired,
}

/// What a ready signal did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// The bootstrap callback ran.
    Fired,
    AlreadyFired,
    /// Nothing was armed; the signal is dropped.
    NotArmed,
}

/// Result of taking the callback out of the gate.
pub enum Trigger<A> {
    Run(BootstrapFn<A>),
    Skip(FireOutcome),
}

enum Phase<A> {
    Unarmed,
    Armed(BootstrapFn<A>),
    Fired,
}

pub struct ReadinessGate<A> {
    phase: Phase<A>,
}

impl<A> Default for ReadinessGate<A> {
    fn default() -> Self {
        Self {
            phase: Phase::Unarmed,
        }
    }
}

impl<A> fmt::Debug for ReadinessGate<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadinessGate")
            .field("state", &self.state())
            .finish()
    }
}

impl<A> ReadinessGate<A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> GateState {
        match self.phase {
            Phase::Unarmed => GateState::Unarmed,
            Phase::Armed(_) => GateState::Armed,
            Phase::Fired => GateState::Fired,
        }
    }

    pub fn arm(&mut self, callback: BootstrapFn<A>) -> Result<(), GateError> {
        match self.phase {
            Phase::Unarmed => {
                self.phase = Phase::Armed(callback);
                Ok(())
            }
            Phase::Armed(_) | Phase::Fired => Err(GateError::AlreadyArmed),
        }
    }

    /// Take the armed callback, moving the gate to `Fired`.
    ///
    /// Used when the callback's target owns the gate and cannot be borrowed
    /// while the gate is.
    pub fn trigger(&mut self) -> Trigger<A> {
        match mem::replace(&mut self.phase, Phase::Fired) {
            Phase::Armed(callback) => Trigger::Run(callback),
            Phase::Fired => Trigger::Skip(FireOutcome::AlreadyFired),
            Phase::Unarmed => {
                self.phase = Phase::Unarmed;
                Trigger::Skip(FireOutcome::NotArmed)
            }
        }
    }

    /// Run the armed callback against `target`.
    ///
    /// The gate is `Fired` even if the callback fails.
    pub fn fire(&mut self, target: &mut A) -> Result<FireOutcome, BootstrapError> {
        match self.trigger() {
            Trigger::Run(callback) => {
                callback(target)?;
                Ok(FireOutcome::Fired)
            }
            Trigger::Skip(outcome) => Ok(outcome),
        }
    }
}
