//! Outbound ports — contracts the screen core consumes from the host app
//!
//! The core never talks to HTTP, the OS notification layer or the
//! navigation stack directly. Everything goes through these traits so
//! each screen can be driven by in-memory doubles in tests.

use async_trait::async_trait;

use crate::application::security::Capabilities;
use crate::domain::{ChargingStation, ErrorReport, Resource, Session, Transaction};
use crate::shared::TransportError;

// ── Remote reads ───────────────────────────────────────────────

/// Uniform async read of one resource by identity.
#[async_trait]
pub trait DataFetcher<R: Resource>: Send + Sync {
    async fn fetch(&self, id: &R::Id) -> Result<R, TransportError>;
}

/// Remote data-access client of the central server.
#[async_trait]
pub trait CentralServerProvider: Send + Sync {
    async fn get_transaction(&self, transaction_id: i64) -> Result<Transaction, TransportError>;

    /// Site image as a data URI.
    async fn get_site_image(&self, site_id: &str) -> Result<String, TransportError>;

    async fn get_charger(&self, charger_id: &str) -> Result<ChargingStation, TransportError>;

    async fn send_error_report(&self, report: &ErrorReport) -> Result<(), TransportError>;
}

// ── Authorization ──────────────────────────────────────────────

/// Resolves what the viewer may see for a resource scope.
///
/// Implementations may round-trip to the server, hence async.
#[async_trait]
pub trait SecurityContext: Send + Sync {
    async fn resolve(&self, session: Option<&Session>, scope_id: Option<&str>) -> Capabilities;
}

// ── User feedback ──────────────────────────────────────────────

/// Fire-and-forget toast notifications.
pub trait Notifier: Send + Sync {
    fn show_error(&self, message: &str);
    fn show_success(&self, message: &str);
}

/// Navigation targets used for error recovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Home,
    ChargingStations,
    TransactionsHistory,
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login => write!(f, "Login"),
            Self::Home => write!(f, "Home"),
            Self::ChargingStations => write!(f, "ChargingStations"),
            Self::TransactionsHistory => write!(f, "TransactionsHistory"),
        }
    }
}

/// Navigation performed as an error-recovery side effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Navigation {
    Back,
    To(Route),
}

impl std::fmt::Display for Navigation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Back => write!(f, "back"),
            Self::To(route) => write!(f, "{}", route),
        }
    }
}

/// Navigation stack, only driven as an error-recovery side effect.
pub trait Navigator: Send + Sync {
    fn back(&self);
    fn force_to(&self, route: Route);

    fn navigate(&self, navigation: Navigation) {
        match navigation {
            Navigation::Back => self.back(),
            Navigation::To(route) => self.force_to(route),
        }
    }
}
