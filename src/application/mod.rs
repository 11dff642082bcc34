pub mod errors;
pub mod ports;
pub mod projection;
pub mod screen;
pub mod screens;
pub mod security;

// Re-export key types for convenience
pub use errors::{ClassifiedError, ErrorClassifier, ErrorKind, ErrorRecovery, ErrorRules, Recovery};
pub use ports::{
    CentralServerProvider, DataFetcher, Navigation, Navigator, Notifier, Route, SecurityContext,
};
pub use projection::{ChargerProjector, ChargerView, TransactionProjector, TransactionView, ViewProjection};
pub use screen::{
    LiveScreen, Phase, RefreshHandle, RefreshOutcome, ScreenContext, ScreenController,
    ScreenRegistry, ScreenState, SharedScreenRegistry,
};
pub use screens::{
    report_error_screen, transaction_details_screen, ErrorReportService, ReportErrorScreen,
    SubmitError, TransactionDetailsScreen,
};
pub use security::{Capabilities, SessionSecurityContext};
