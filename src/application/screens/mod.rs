//! Concrete screens of the mobile client

pub mod report_error;
pub mod transaction_details;

pub use report_error::{
    charger_error_rules, report_error_screen, ChargerFetcher, ErrorReportService, ReportErrorScreen,
    SubmitError,
};
pub use transaction_details::{
    transaction_details_screen, transaction_error_rules, TransactionDetailsFetcher,
    TransactionDetailsScreen,
};
