//! Error report submitted from the report-error screen

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Problem report about a charging station, sent to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ErrorReport {
    #[validate(length(min = 1, message = "Phone number is mandatory"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Title is mandatory"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is mandatory"))]
    pub description: String,
}

impl ErrorReport {
    /// Build a report from raw form input; surrounding whitespace is dropped
    /// so blank fields fail validation.
    pub fn new(
        phone: impl AsRef<str>,
        title: impl AsRef<str>,
        description: impl AsRef<str>,
    ) -> Self {
        Self {
            phone: phone.as_ref().trim().to_string(),
            title: title.as_ref().trim().to_string(),
            description: description.as_ref().trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_rejected() {
        let report = ErrorReport::new("  ", "Broken plug", "");
        let errors = report.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("phone"));
        assert!(fields.contains_key("description"));
        assert!(!fields.contains_key("title"));
    }

    #[test]
    fn complete_report_is_valid() {
        let report = ErrorReport::new("+33 6 00 00 00 00", "Broken plug", "Connector A is stuck");
        assert!(report.validate().is_ok());
    }
}
