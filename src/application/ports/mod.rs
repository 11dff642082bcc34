//! Application ports (hexagonal architecture boundaries)

pub mod outbound;

pub use outbound::{
    CentralServerProvider, DataFetcher, Navigation, Navigator, Notifier, Route, SecurityContext,
};
