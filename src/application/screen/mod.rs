//! Auto-refreshing screen lifecycle

mod controller;
mod registry;
mod state;
mod ticker;


pub use controller::{RefreshHandle, RefreshOutcome, ScreenContext, ScreenController};
pub use registry::{LiveScreen, ScreenRegistry, SharedScreenRegistry};
pub use state::{Phase, ScreenState};
