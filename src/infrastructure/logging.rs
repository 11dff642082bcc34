//! Tracing setup and log-backed host adapters

use tracing::{error, info};

use crate::application::ports::{Navigator, Notifier, Route};
use crate::config::LoggingConfig;

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(config: &LoggingConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Notifier that writes toasts to the log, for headless hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show_error(&self, message: &str) {
        error!(target: "toast", "{}", message);
    }

    fn show_success(&self, message: &str) {
        info!(target: "toast", "{}", message);
    }
}

/// Navigator that only records navigation requests in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn back(&self) {
        info!(target: "navigation", "back");
    }

    fn force_to(&self, route: Route) {
        info!(target: "navigation", %route, "force navigate");
    }
}
