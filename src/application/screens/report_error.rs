//! Report-error screen: charger header plus the report form submission

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

use crate::application::errors::{ClassifiedError, ErrorClassifier, ErrorRecovery, ErrorRules, Recovery};
use crate::application::ports::{CentralServerProvider, DataFetcher};
use crate::application::projection::ChargerProjector;
use crate::application::screen::{ScreenContext, ScreenController};
use crate::config::AppConfig;
use crate::domain::{ChargingStation, ErrorReport};
use crate::shared::TransportError;

pub type ReportErrorScreen = ScreenController<ChargingStation, ChargerProjector>;

pub struct ChargerFetcher {
    provider: Arc<dyn CentralServerProvider>,
}

impl ChargerFetcher {
    pub fn new(provider: Arc<dyn CentralServerProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DataFetcher<ChargingStation> for ChargerFetcher {
    async fn fetch(&self, id: &String) -> Result<ChargingStation, TransportError> {
        self.provider.get_charger(id).await
    }
}

/// Every charger failure other than 404 and the identity code is reported
/// with the charger copy.
pub fn charger_error_rules(config: &AppConfig) -> ErrorRules {
    ErrorRules::from_config(config).with_unexpected_message(config.messages.charger_unexpected.clone())
}

/// Screen showing `charger_id`, focused on `connector_id` (1-based) when given.
pub fn report_error_screen(
    charger_id: impl Into<String>,
    connector_id: Option<u32>,
    provider: Arc<dyn CentralServerProvider>,
    config: &AppConfig,
    context: ScreenContext,
) -> ReportErrorScreen {
    ScreenController::new(
        "report_error",
        charger_id.into(),
        Arc::new(ChargerFetcher::new(provider)),
        ChargerProjector::new(connector_id),
        ErrorClassifier::new(charger_error_rules(config)),
        context,
    )
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("invalid report: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error("report not sent: {0}")]
    Failed(ClassifiedError),
}

/// Sends error reports to the operator.
pub struct ErrorReportService {
    provider: Arc<dyn CentralServerProvider>,
    classifier: ErrorClassifier,
    recovery: ErrorRecovery,
    sent_message: String,
}

impl ErrorReportService {
    pub fn new(
        provider: Arc<dyn CentralServerProvider>,
        recovery: ErrorRecovery,
        config: &AppConfig,
    ) -> Self {
        // The report endpoint answers the identity code when the sender's
        // e-mail is unknown.
        let mut rules = ErrorRules::from_config(config);
        rules.unknown_identity_message = config.messages.wrong_email.clone();

        Self {
            provider,
            classifier: ErrorClassifier::new(rules),
            recovery,
            sent_message: config.messages.report_sent.clone(),
        }
    }

    /// Validate and send. Invalid reports never reach the server.
    pub async fn submit(&self, report: &ErrorReport) -> Result<(), SubmitError> {
        report.validate()?;

        match self.provider.send_error_report(report).await {
            Ok(()) => {
                info!(title = %report.title, "Error report sent");
                metrics::counter!("error_reports_total", "outcome" => "sent").increment(1);
                self.recovery.notifier().show_success(&self.sent_message);
                Ok(())
            }
            Err(error) => {
                let mut classified = self.classifier.classify(&error);
                // a form has nowhere to render errors inline
                if classified.recovery == Recovery::Inline {
                    classified.recovery = Recovery::Notify;
                }
                warn!(%error, kind = %classified.kind, "Error report failed");
                metrics::counter!("error_reports_total", "outcome" => classified.kind.as_str())
                    .increment(1);
                self.recovery.apply(&classified);
                Err(SubmitError::Failed(classified))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::ErrorKind;
    use crate::application::ports::{Navigation, Route};
    use crate::application::screen::RefreshOutcome;
    use crate::config::RefreshConfig;
    use crate::domain::{Capability, Session};
    use crate::infrastructure::{Endpoint, InMemoryCentralServer};
    use crate::test_support::{sample_station, test_host, TestHost};

    fn service(server: &Arc<InMemoryCentralServer>, host: &TestHost) -> ErrorReportService {
        ErrorReportService::new(server.clone(), host.context.recovery.clone(), &AppConfig::default())
    }

    fn report() -> ErrorReport {
        ErrorReport::new("+33 6 00 00 00 00", "Broken plug", "Connector B is stuck")
    }

    #[tokio::test]
    async fn test_invalid_report_is_not_sent() {
        let server = Arc::new(InMemoryCentralServer::new());
        let host = test_host(RefreshConfig::default(), None);

        let result = service(&server, &host).submit(&ErrorReport::new("", "", "x")).await;
        match result {
            Err(SubmitError::Invalid(errors)) => {
                assert!(errors.field_errors().contains_key("phone"));
                assert!(errors.field_errors().contains_key("title"));
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(server.request_count(), 0);
        assert!(host.notifier.errors().is_empty());
    }

    #[tokio::test]
    async fn test_sent_report_notifies_success_once() {
        let server = Arc::new(InMemoryCentralServer::new());
        let host = test_host(RefreshConfig::default(), None);

        service(&server, &host).submit(&report()).await.unwrap();
        assert_eq!(server.reports(), vec![report()]);
        assert_eq!(
            host.notifier.successes(),
            vec![AppConfig::default().messages.report_sent]
        );
    }

    #[tokio::test]
    async fn test_unknown_identity_reports_wrong_email() {
        let server = Arc::new(InMemoryCentralServer::new());
        server.fail_next(Endpoint::ErrorReport, TransportError::status(550));
        let host = test_host(RefreshConfig::default(), None);

        let err = service(&server, &host).submit(&report()).await.unwrap_err();
        assert!(matches!(err, SubmitError::Failed(ref e) if e.kind == ErrorKind::PermissionDenied));
        assert_eq!(host.notifier.errors(), vec!["Unknown email".to_string()]);
        assert!(host.notifier.successes().is_empty());
    }

    #[tokio::test]
    async fn test_expired_session_during_submit() {
        let server = Arc::new(InMemoryCentralServer::new());
        server.fail_next(Endpoint::ErrorReport, TransportError::status(401));
        let host = test_host(RefreshConfig::default(), None);

        assert!(service(&server, &host).submit(&report()).await.is_err());
        assert_eq!(host.navigator.routes(), vec![Navigation::To(Route::Login)]);
    }

    #[tokio::test]
    async fn test_no_response_shows_generic_error() {
        let server = Arc::new(InMemoryCentralServer::new());
        server.fail_next(Endpoint::ErrorReport, TransportError::no_response("offline"));
        let host = test_host(RefreshConfig::default(), None);

        assert!(service(&server, &host).submit(&report()).await.is_err());
        assert_eq!(
            host.notifier.errors(),
            vec![AppConfig::default().messages.unexpected]
        );
        assert!(server.reports().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_screen_focuses_connector() {
        let server = Arc::new(InMemoryCentralServer::new());
        server.upsert_charger(sample_station("CS-1"));
        let host = test_host(
            RefreshConfig::default(),
            Some(Session::authenticated([Capability::SiteAdmin("site-1".into())])),
        );
        let screen = report_error_screen("CS-1", Some(2), server, &AppConfig::default(), host.context.clone());

        assert_eq!(screen.on_mount().await, RefreshOutcome::Ready);
        let view = screen.state().derived.expect("projected view");
        assert_eq!(view.station_id, "CS-1");
        assert_eq!(view.connector_letter, Some('B'));
        assert!(view.is_site_admin);
        screen.on_unmount();
    }

    #[tokio::test(start_paused = true)]
    async fn test_charger_failure_shows_charger_copy() {
        let config = AppConfig::default();
        let server = Arc::new(InMemoryCentralServer::new());
        server.upsert_charger(sample_station("CS-1"));
        server.fail_next(Endpoint::Charger, TransportError::status(500));
        let host = test_host(RefreshConfig::default(), None);
        let screen = report_error_screen("CS-1", None, server, &config, host.context.clone());

        match screen.on_mount().await {
            RefreshOutcome::Failed(err) => {
                assert_eq!(err.kind, ErrorKind::Unknown);
                assert_eq!(err.message, config.messages.charger_unexpected);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(host.notifier.errors(), vec![config.messages.charger_unexpected.clone()]);
        screen.on_unmount();
    }

    #[test]
    fn test_charger_rules_have_no_object_missing_code() {
        let config = AppConfig::default();
        let rules = charger_error_rules(&config);
        assert_eq!(rules.object_missing, None);

        let err = ErrorClassifier::new(rules).classify(&TransportError::status(550));
        assert_eq!(err.kind, ErrorKind::PermissionDenied);
        assert_eq!(err.message, config.messages.unknown_identity);
    }
}
