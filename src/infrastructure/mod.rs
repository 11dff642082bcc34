//! Infrastructure layer - host adapters and test doubles

pub mod logging;
pub mod memory;

pub use logging::{init_tracing, LogNavigator, LogNotifier};
pub use memory::{Endpoint, InMemoryCentralServer};
