//! Construction and bootstrap of the application root.

use std::fmt;
use std::rc::Rc;

use scout_types::{StartOptions, StatePath};

use super::{AppError, ApplicationState, Children, Mount};
use crate::children::{ChildState, Connection, QueryOptions, Router, Statusbar};
use crate::client::{ClientFactory, SeedClientFactory};
use crate::derived::DerivedEngine;
use crate::history::{HashHistory, History};
use crate::readiness::{BootstrapError, ReadinessGate};
use crate::singleton::AppSlot;

/// Name of the derived API client property.
pub const CLIENT: &str = "client";

/// Container the render tree is mounted at.
pub const APPLICATION_CONTAINER: &str = "#application";

/// Everything the root needs from its caller.
#[derive(Default)]
pub struct AppOptions {
    /// Initial connection seed, applied before anything is derived.
    pub uri: Option<String>,
    pub query_limit: Option<u64>,
    pub history: Option<Box<dyn History>>,
    pub client_factory: Option<Rc<dyn ClientFactory>>,
}

impl fmt::Debug for AppOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppOptions")
            .field("uri", &self.uri)
            .field("query_limit", &self.query_limit)
            .field("history", &self.history)
            .field("client_factory", &self.client_factory.as_ref().map(|_| "<factory>"))
            .finish()
    }
}

impl AppOptions {
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    #[must_use]
    pub fn with_query_limit(mut self, limit: u64) -> Self {
        self.query_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_history(mut self, history: Box<dyn History>) -> Self {
        self.history = Some(history);
        self
    }

    #[must_use]
    pub fn with_client_factory(mut self, factory: Rc<dyn ClientFactory>) -> Self {
        self.client_factory = Some(factory);
        self
    }
}

impl ApplicationState {
    /// Build a root without claiming the process slot.
    ///
    /// The initial `uri` is applied synchronously, so the first read of
    /// `client` already reflects it. Bootstrap waits for [`Self::mark_ready`].
    pub fn new(options: AppOptions) -> Result<Self, AppError> {
        tracing::debug!(?options, "initializing application state");
        let AppOptions {
            uri,
            query_limit,
            history,
            client_factory,
        } = options;

        let mut connection = Connection::default();
        if let Some(uri) = uri.as_deref() {
            connection.use_uri(uri)?;
            // Nothing is derived yet, so there is nobody to notify.
            connection.drain_changes();
        }
        let children = Children {
            router: Router::new(history.unwrap_or_else(|| Box::new(HashHistory::new()))),
            query_options: query_limit.map_or_else(QueryOptions::default, QueryOptions::with_default_limit),
            statusbar: Statusbar::default(),
            connection,
        };

        let factory = client_factory.unwrap_or_else(|| Rc::new(SeedClientFactory));
        let mut derived = DerivedEngine::new();
        derived.define(CLIENT, &[StatePath::ConnectionUri], move |children: &Children| {
            factory.create_client(children.connection.uri())
        })?;

        let mut gate = ReadinessGate::new();
        gate.arm(Box::new(bootstrap))?;

        Ok(Self {
            children,
            derived,
            gate,
            mount: None,
            slot: None,
        })
    }

    /// Build the one root this process is allowed.
    ///
    /// The slot is claimed only once construction has succeeded, so a
    /// rejected seed leaves it free for another attempt.
    pub fn for_process(options: AppOptions) -> Result<Self, AppError> {
        let mut app = Self::new(options)?;
        app.slot = Some(AppSlot::claim()?);
        tracing::info!(uri = app.connection().uri(), "application state created");
        Ok(app)
    }
}

/// Mount the render tree, then start hash-based history at the root.
fn bootstrap(app: &mut ApplicationState) -> Result<(), BootstrapError> {
    app.mount = Some(Mount::new(APPLICATION_CONTAINER));
    app.children.router.start(StartOptions::hash_root())?;
    tracing::info!(
        container = APPLICATION_CONTAINER,
        fragment = app.router().fragment(),
        "application bootstrapped"
    );
    Ok(())
}
