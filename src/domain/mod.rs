pub mod charging_station;
pub mod error_report;
pub mod resource;
pub mod session;
pub mod transaction;

// Re-export commonly used types
pub use charging_station::{ChargingStation, Connector, ConnectorStatus, SiteArea};
pub use error_report::ErrorReport;
pub use resource::Resource;
pub use session::{session_channel, Capability, FeatureFlag, Session, SessionWatch};
pub use transaction::{InactivityStatus, Transaction, TransactionDetails, TransactionStop, UserRef};
