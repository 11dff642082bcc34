//! # Texnouz CSMS Mobile Core
//!
//! Screen lifecycle core of the EV charging mobile client: authorized,
//! auto-refreshing data screens backed by the central server.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Resources read from the central server and the user session
//! - **application**: Screen lifecycle, error classification, projections
//!   and the ports the host app implements
//! - **infrastructure**: In-memory central server, log-backed host adapters
//! - **config**: TOML configuration (refresh cadence, error codes, copy)

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{default_config_path, AppConfig};

// Re-export the screen core
pub use application::{
    ErrorClassifier, ErrorKind, RefreshOutcome, ScreenContext, ScreenController, ScreenRegistry,
    ScreenState,
};
pub use shared::{ConfigError, TransportError};
