//! Applies the side effect chosen for a classified failure

use std::sync::Arc;

use tracing::{debug, warn};

use super::classifier::{ClassifiedError, Recovery};
use crate::application::ports::{Navigator, Notifier};

/// Runs recovery side effects: at most one notification and one
/// navigation per failed attempt.
#[derive(Clone)]
pub struct ErrorRecovery {
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl ErrorRecovery {
    pub fn new(notifier: Arc<dyn Notifier>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            notifier,
            navigator,
        }
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn apply(&self, error: &ClassifiedError) {
        match error.recovery {
            Recovery::Inline => {
                debug!(kind = %error.kind, status = ?error.status, "Error shown inline");
            }
            Recovery::Notify | Recovery::Retry => {
                warn!(kind = %error.kind, status = ?error.status, "{}", error.message);
                self.notifier.show_error(&error.message);
            }
            Recovery::NotifyAndNavigate(navigation) => {
                warn!(
                    kind = %error.kind,
                    status = ?error.status,
                    %navigation,
                    "{}", error.message
                );
                self.notifier.show_error(&error.message);
                self.navigator.navigate(navigation);
            }
        }
    }
}
