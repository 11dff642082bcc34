use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A remotely fetched aggregate displayed by a screen.
///
/// Snapshots are immutable: every successful fetch replaces the previous
/// one wholesale.
pub trait Resource: Clone + Debug + Send + Sync + 'static {
    type Id: Clone + Debug + Display + Eq + Hash + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;

    /// Owning scope (site) used for scoped capability checks.
    fn scope_id(&self) -> Option<&str> {
        None
    }
}
