//! Transaction details screen

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::application::errors::{ErrorClassifier, ErrorRecovery, ErrorRules, Recovery};
use crate::application::ports::{CentralServerProvider, DataFetcher};
use crate::application::projection::TransactionProjector;
use crate::application::screen::{ScreenContext, ScreenController};
use crate::config::AppConfig;
use crate::domain::TransactionDetails;
use crate::shared::TransportError;

pub type TransactionDetailsScreen = ScreenController<TransactionDetails, TransactionProjector>;

/// Loads a transaction together with the image of its site.
pub struct TransactionDetailsFetcher {
    provider: Arc<dyn CentralServerProvider>,
    site_errors: ErrorClassifier,
    recovery: ErrorRecovery,
}

impl TransactionDetailsFetcher {
    pub fn new(
        provider: Arc<dyn CentralServerProvider>,
        recovery: ErrorRecovery,
        config: &AppConfig,
    ) -> Self {
        Self {
            provider,
            site_errors: ErrorClassifier::new(site_error_rules(config)),
            recovery,
        }
    }

    /// The image never fails the fetch. A missing image is left out
    /// quietly, any other failure is reported once and left out too.
    async fn site_image(&self, site_id: &str) -> Option<String> {
        match self.provider.get_site_image(site_id).await {
            Ok(image) => Some(image),
            Err(error) if error.status_code() == Some(404) => None,
            Err(error) => {
                let mut classified = self.site_errors.classify(&error);
                // the screen has no inline slot for the image
                if classified.recovery == Recovery::Inline {
                    classified.recovery = Recovery::Notify;
                }
                warn!(site_id, %error, kind = %classified.kind, "Site image unavailable");
                self.recovery.apply(&classified);
                None
            }
        }
    }
}

#[async_trait]
impl DataFetcher<TransactionDetails> for TransactionDetailsFetcher {
    async fn fetch(&self, id: &i64) -> Result<TransactionDetails, TransportError> {
        let transaction = self.provider.get_transaction(*id).await?;
        let site_image = match transaction.site_id.as_deref() {
            Some(site_id) => self.site_image(site_id).await,
            None => None,
        };
        Ok(TransactionDetails {
            transaction,
            site_image,
        })
    }
}

/// On this endpoint the server's "object does not exist" code means the
/// transaction is gone.
pub fn transaction_error_rules(config: &AppConfig) -> ErrorRules {
    ErrorRules::from_config(config)
        .with_object_missing(
            config.errors.object_does_not_exist,
            config.messages.transaction_not_exist.clone(),
        )
        .with_unexpected_message(config.messages.transaction_unexpected.clone())
}

pub fn site_error_rules(config: &AppConfig) -> ErrorRules {
    ErrorRules::from_config(config).with_unexpected_message(config.messages.site_unexpected.clone())
}

pub fn transaction_details_screen(
    transaction_id: i64,
    provider: Arc<dyn CentralServerProvider>,
    config: &AppConfig,
    context: ScreenContext,
) -> TransactionDetailsScreen {
    ScreenController::new(
        "transaction_details",
        transaction_id,
        Arc::new(TransactionDetailsFetcher::new(
            provider,
            context.recovery.clone(),
            config,
        )),
        TransactionProjector::new(config.projection.clone()),
        ErrorClassifier::new(transaction_error_rules(config)),
        context,
    )
}
