//! Published state of a data-bound screen

use crate::application::errors::ClassifiedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Mounting,
    Loading,
    Ready,
    Error,
}

/// Snapshot rendered by the view layer.
///
/// `resource` and `derived` always come from the same successful fetch
/// and survive later failures and in-progress refreshes.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenState<R, V> {
    pub phase: Phase,
    pub resource: Option<R>,
    pub derived: Option<V>,
    pub last_error: Option<ClassifiedError>,
    /// Generation of the request that produced the current content
    pub generation: u64,
}

impl<R, V> ScreenState<R, V> {
    pub fn new() -> Self {
        Self {
            phase: Phase::Mounting,
            resource: None,
            derived: None,
            last_error: None,
            generation: 0,
        }
    }

    /// Loading while still showing the previous content
    pub fn is_revalidating(&self) -> bool {
        self.phase == Phase::Loading && self.resource.is_some()
    }

    pub(crate) fn begin_loading(&mut self) {
        self.phase = Phase::Loading;
    }

    pub(crate) fn apply_success(&mut self, generation: u64, resource: R, derived: V) {
        self.phase = Phase::Ready;
        self.resource = Some(resource);
        self.derived = Some(derived);
        self.last_error = None;
        self.generation = generation;
    }

    pub(crate) fn apply_failure(&mut self, generation: u64, error: ClassifiedError) {
        self.phase = Phase::Error;
        self.last_error = Some(error);
        self.generation = generation;
    }
}

impl<R, V> Default for ScreenState<R, V> {
    fn default() -> Self {
        Self::new()
    }
}
