//! The application root.
//!
//! [`ApplicationState`] owns every child state, the derived-property engine
//! computed over them, and the readiness gate that defers bootstrap. Children
//! are only reachable mutably through the `update_*` closures, which drain each
//! child's change log into the derived engine before returning.
//!
//! ```text
//! new(options) -> connection.use_uri(seed) -> define `client` -> arm gate
//!                                                                  |
//! mark_ready() ------------------------------------------------> bootstrap:
//!                                                     mount #application
//!                                                     router.start(hash root)
//! ```

mod init;

pub use init::{APPLICATION_CONTAINER, AppOptions, CLIENT};

use std::fmt;

use thiserror::Error;

use scout_types::ChildKind;

use crate::children::{
    ChildState, Connection, ConnectionError, QueryOptions, Router, Statusbar,
};
use crate::client::ClientHandle;
use crate::derived::{DerivedEngine, DerivedError};
use crate::navigation::{NavigateError, NavigateOptions, NavigationRequest};
use crate::readiness::{BootstrapError, FireOutcome, GateError, GateState, ReadinessGate, Trigger};
use crate::singleton::AppSlot;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("an application state already exists in this process")]
    AlreadyInitialized,
    #[error("initial connection rejected: {0}")]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Derived(#[from] DerivedError),
    #[error(transparent)]
    Gate(#[from] GateError),
}

/// The children, grouped so derived properties can borrow them while the
/// engine itself is borrowed separately.
#[derive(Debug)]
pub struct Children {
    pub(crate) router: Router,
    pub(crate) query_options: QueryOptions,
    pub(crate) statusbar: Statusbar,
    pub(crate) connection: Connection,
}

impl Children {
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn query_options(&self) -> &QueryOptions {
        &self.query_options
    }

    #[must_use]
    pub fn statusbar(&self) -> &Statusbar {
        &self.statusbar
    }

    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

/// Where the render tree was mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    container: String,
}

impl Mount {
    #[must_use]
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
        }
    }

    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }
}

pub struct ApplicationState {
    children: Children,
    derived: DerivedEngine<Children>,
    gate: ReadinessGate<ApplicationState>,
    mount: Option<Mount>,
    slot: Option<AppSlot>,
}

impl fmt::Debug for ApplicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationState")
            .field("children", &self.children)
            .field("derived", &self.derived)
            .field("gate", &self.gate)
            .field("mount", &self.mount)
            .field("process_root", &self.slot.is_some())
            .finish()
    }
}

impl ApplicationState {
    // ========================================================================
    // Read access
    // ========================================================================

    #[must_use]
    pub fn children(&self) -> &Children {
        &self.children
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.children.router
    }

    #[must_use]
    pub fn query_options(&self) -> &QueryOptions {
        &self.children.query_options
    }

    #[must_use]
    pub fn statusbar(&self) -> &Statusbar {
        &self.children.statusbar
    }

    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.children.connection
    }

    /// The API client for the current connection, built on first read and
    /// rebuilt after `connection.uri` changes.
    pub fn client(&self) -> Result<ClientHandle, DerivedError> {
        self.derived
            .get::<ClientHandle>(CLIENT, &self.children)
            .map(|client| ClientHandle::clone(&client))
    }

    #[must_use]
    pub fn derived(&self) -> &DerivedEngine<Children> {
        &self.derived
    }

    #[must_use]
    pub fn mount(&self) -> Option<&Mount> {
        self.mount.as_ref()
    }

    #[must_use]
    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.gate.state() == GateState::Fired
    }

    /// Whether this instance holds the process slot.
    #[must_use]
    pub fn is_process_root(&self) -> bool {
        self.slot.is_some()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    pub fn update_connection<R>(&mut self, f: impl FnOnce(&mut Connection) -> R) -> R {
        let result = f(&mut self.children.connection);
        self.flush_changes(ChildKind::Connection);
        result
    }

    pub fn update_query_options<R>(&mut self, f: impl FnOnce(&mut QueryOptions) -> R) -> R {
        let result = f(&mut self.children.query_options);
        self.flush_changes(ChildKind::QueryOptions);
        result
    }

    pub fn update_statusbar<R>(&mut self, f: impl FnOnce(&mut Statusbar) -> R) -> R {
        let result = f(&mut self.children.statusbar);
        self.flush_changes(ChildKind::Statusbar);
        result
    }

    /// Switch to a different server.
    pub fn use_connection(&mut self, uri: &str) -> Result<(), ConnectionError> {
        self.update_connection(|connection| connection.use_uri(uri))
    }

    /// Go to a different page, or just record state in the location.
    ///
    /// Parameters are serialized onto the fragment before the router sees it;
    /// a malformed parameter fails before history is touched.
    pub fn navigate(&mut self, fragment: &str, options: NavigateOptions) -> Result<(), NavigateError> {
        let encoded = NavigationRequest::new(fragment, options).encode()?;
        tracing::debug!(path = %encoded.path, trigger = encoded.options.trigger, "navigate");
        let result = self.children.router.navigate(&encoded.path, encoded.options);
        self.flush_changes(ChildKind::Router);
        result.map_err(NavigateError::from)
    }

    // ========================================================================
    // Readiness
    // ========================================================================

    /// Deliver the environment-ready signal.
    ///
    /// The first call runs the bootstrap; later calls report
    /// [`FireOutcome::AlreadyFired`].
    pub fn mark_ready(&mut self) -> Result<FireOutcome, BootstrapError> {
        match self.gate.trigger() {
            Trigger::Run(bootstrap) => {
                bootstrap(self)?;
                Ok(FireOutcome::Fired)
            }
            Trigger::Skip(outcome) => {
                tracing::debug!(?outcome, "ready signal ignored");
                Ok(outcome)
            }
        }
    }

    fn flush_changes(&mut self, kind: ChildKind) {
        let changes = match kind {
            ChildKind::Router => self.children.router.drain_changes(),
            ChildKind::QueryOptions => self.children.query_options.drain_changes(),
            ChildKind::Statusbar => self.children.statusbar.drain_changes(),
            ChildKind::Connection => self.children.connection.drain_changes(),
        };
        for path in changes {
            self.derived.notify_changed(path);
        }
    }
}
