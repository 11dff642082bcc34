//! Transaction aggregate

pub mod model;

pub use model::{InactivityStatus, Transaction, TransactionDetails, TransactionStop, UserRef};
