//! Core engine for Scout - the reactive application state.
//!
//! This crate contains the application root without TUI dependencies:
//! child states, derived properties, navigation encoding and the readiness
//! gate that defers bootstrap.

mod app;
mod children;
mod client;
mod config;
mod derived;
mod history;
mod location;
mod navigation;
mod readiness;
mod singleton;

pub use app::{
    APPLICATION_CONTAINER, AppError, AppOptions, ApplicationState, CLIENT, Children, Mount,
};
pub use children::{
    ChildState, Connection, ConnectionError, DEFAULT_LIMIT, DEFAULT_PORT, QueryOptions,
    QueryOptionsError, Router, Statusbar,
};
pub use client::{ClientError, ClientFactory, ClientHandle, SeedClientFactory};
pub use config::{
    AppConfig, ConfigError, ConnectionConfig, QueryConfig, ScoutConfig, config_path,
    expand_env_vars,
};
pub use derived::{DerivedEngine, DerivedError};
pub use history::{HashHistory, History, HistoryEntry, HistoryError};
pub use location::{initial_seed, uri_from_location};
pub use navigation::{
    EncodedNavigation, NavigateError, NavigateOptions, NavigationRequest, encode_fragment,
    stringify_params, strip_leading_slash,
};
pub use readiness::{
    BootstrapError, BootstrapFn, FireOutcome, GateError, GateState, ReadinessGate, Trigger,
};
pub use singleton::AppSlot;

pub use scout_types::{
    ChildKind, DEFAULT_CONNECTION_URI, HistoryNavigateOptions, QueryParams, StartOptions,
    StatePath,
};
