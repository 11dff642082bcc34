//! Pure derivation of display state from fetched resources
//!
//! Projections never perform I/O and have no failure modes: the same
//! resource snapshot and capabilities always produce the same view.

mod charger;
pub mod format;
mod transaction;

use std::fmt::Debug;

use crate::application::security::Capabilities;
use crate::domain::Resource;

pub use charger::{ChargerProjector, ChargerView};
pub use transaction::{TransactionProjector, TransactionView};

/// Derives the view model of a screen from its resource.
pub trait ViewProjection<R: Resource>: Send + Sync + 'static {
    type View: Clone + Debug + PartialEq + Send + Sync + 'static;

    fn project(&self, resource: &R, capabilities: &Capabilities) -> Self::View;
}
