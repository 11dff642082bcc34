//! Centralised failure handling for screens

mod classifier;
mod recovery;

pub use classifier::{ClassifiedError, ErrorClassifier, ErrorKind, ErrorRules, Recovery};
pub use recovery::ErrorRecovery;
