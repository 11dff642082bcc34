//! Screen registry — live screens of the running app

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};
use uuid::Uuid;

use super::controller::ScreenController;
use crate::application::projection::ViewProjection;
use crate::domain::Resource;

/// Object-safe view of a screen controller for app-wide broadcasts
pub trait LiveScreen: Send + Sync {
    fn id(&self) -> Uuid;
    fn name(&self) -> &'static str;
    fn is_mounted(&self) -> bool;
    fn set_app_foreground(&self, foreground: bool);
}

impl<R: Resource, P: ViewProjection<R>> LiveScreen for ScreenController<R, P> {
    fn id(&self) -> Uuid {
        ScreenController::id(self)
    }

    fn name(&self) -> &'static str {
        ScreenController::name(self)
    }

    fn is_mounted(&self) -> bool {
        ScreenController::is_mounted(self)
    }

    fn set_app_foreground(&self, foreground: bool) {
        drop(ScreenController::set_app_foreground(self, foreground));
    }
}

/// Thread-safe registry of mounted screens
pub struct ScreenRegistry {
    screens: DashMap<Uuid, Arc<dyn LiveScreen>>,
}

/// Shared, reference-counted screen registry
pub type SharedScreenRegistry = Arc<ScreenRegistry>;

impl ScreenRegistry {
    pub fn new() -> Self {
        Self {
            screens: DashMap::new(),
        }
    }

    /// Wrap in `Arc` for shared ownership
    pub fn shared() -> SharedScreenRegistry {
        Arc::new(Self::new())
    }

    /// Track a screen; call after `on_mount`.
    pub fn register(&self, screen: Arc<dyn LiveScreen>) {
        debug!(screen = screen.name(), instance = %screen.id(), "Registering screen");
        self.screens.insert(screen.id(), screen);
    }

    pub fn unregister(&self, id: &Uuid) {
        self.screens.remove(id);
    }

    /// Forward an app foreground/background transition to every live
    /// screen and forget the ones that have been unmounted meanwhile.
    pub fn set_foreground(&self, foreground: bool) {
        self.screens.retain(|_, screen| screen.is_mounted());
        info!(foreground, screens = self.screens.len(), "App visibility changed");
        for entry in self.screens.iter() {
            entry.set_app_foreground(foreground);
        }
    }

    /// Number of tracked screens
    pub fn count(&self) -> usize {
        self.screens.len()
    }
}

impl Default for ScreenRegistry {
    fn default() -> Self {
        Self::new()
    }
}
