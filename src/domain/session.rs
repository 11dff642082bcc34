//! Authenticated session as seen by the screens
//!
//! The host app owns the session and publishes it through a
//! [`SessionWatch`]; the core only ever reads it.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Optional components enabled per tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureFlag {
    Pricing,
}

/// A permission granted to a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Capability {
    Admin,
    /// Administrator of a single site
    SiteAdmin(String),
    Feature(FeatureFlag),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub authenticated: bool,
    pub capabilities: HashSet<Capability>,
}

impl Session {
    pub fn authenticated(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            authenticated: true,
            capabilities: capabilities.into_iter().collect(),
        }
    }
}

/// Read-only view of the host's current session
pub type SessionWatch = watch::Receiver<Option<Arc<Session>>>;

/// Create a session channel; the sender stays with the host app.
pub fn session_channel(
    initial: Option<Session>,
) -> (watch::Sender<Option<Arc<Session>>>, SessionWatch) {
    watch::channel(initial.map(Arc::new))
}
