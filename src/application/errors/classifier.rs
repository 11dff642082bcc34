//! Transport failure classification
//!
//! Every screen funnels its fetch failures through [`ErrorClassifier`];
//! screens and projections only ever see [`ClassifiedError`].

use std::fmt;

use crate::application::ports::{Navigation, Route};
use crate::config::AppConfig;
use crate::shared::TransportError;

const NOT_FOUND: u16 = 404;
const UNAUTHORIZED: u16 = 401;
const FORBIDDEN: u16 = 403;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    Transient,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::PermissionDenied => "permission_denied",
            Self::Transient => "transient",
            Self::Unknown => "unknown",
        }
    }

    /// Terminal kinds never auto-retry on the owning screen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::NotFound | Self::PermissionDenied)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side effect selected for a classified failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Message rendered inline from `last_error`, nothing else.
    Inline,
    /// One error notification.
    Notify,
    /// One error notification, then forced navigation.
    NotifyAndNavigate(Navigation),
    /// One error notification; auto-refresh keeps retrying.
    Retry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub message: String,
    /// Whether the screen retries on its own (auto-refresh keeps running)
    pub recoverable: bool,
    pub status: Option<u16>,
    pub recovery: Recovery,
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({}): {}", self.kind, status, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// Per-screen classification rules and copy.
///
/// The central server reuses its domain codes with different meanings per
/// endpoint, so each screen decides which of them apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRules {
    /// Domain code meaning "object does not exist"
    pub object_missing: Option<u16>,
    /// Domain code meaning "unknown identity"
    pub unknown_identity: Option<u16>,
    pub not_found_message: String,
    pub unknown_identity_message: String,
    /// Screen-specific copy for unclassified server errors
    pub unexpected_message: String,
    /// Copy when no response was received at all
    pub no_response_message: String,
    pub session_expired_message: String,
    /// Where to send the user after an unclassified server error
    pub fallback: Option<Navigation>,
}

impl ErrorRules {
    /// Generic rules: only the unknown-identity code is recognised.
    pub fn from_config(config: &AppConfig) -> Self {
        let messages = &config.messages;
        Self {
            object_missing: None,
            unknown_identity: Some(config.errors.unknown_identity),
            not_found_message: messages.unexpected.clone(),
            unknown_identity_message: messages.unknown_identity.clone(),
            unexpected_message: messages.unexpected.clone(),
            no_response_message: messages.unexpected.clone(),
            session_expired_message: messages.session_expired.clone(),
            fallback: None,
        }
    }

    /// Treat `code` as "object does not exist" instead of "unknown identity".
    pub fn with_object_missing(mut self, code: u16, message: impl Into<String>) -> Self {
        if self.unknown_identity == Some(code) {
            self.unknown_identity = None;
        }
        self.object_missing = Some(code);
        self.not_found_message = message.into();
        self
    }

    pub fn with_unexpected_message(mut self, message: impl Into<String>) -> Self {
        self.unexpected_message = message.into();
        self
    }

    pub fn with_fallback(mut self, navigation: Navigation) -> Self {
        self.fallback = Some(navigation);
        self
    }
}

impl Default for ErrorRules {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ErrorClassifier {
    rules: ErrorRules,
}

impl ErrorClassifier {
    pub fn new(rules: ErrorRules) -> Self {
        Self { rules }
    }

    /// Ordered policy, first match wins.
    pub fn classify(&self, error: &TransportError) -> ClassifiedError {
        let rules = &self.rules;
        let status = match error {
            TransportError::NoResponse(_) => {
                return ClassifiedError {
                    kind: ErrorKind::Unknown,
                    message: rules.no_response_message.clone(),
                    recoverable: false,
                    status: None,
                    recovery: Recovery::Notify,
                };
            }
            TransportError::Timeout(_) => {
                return ClassifiedError {
                    kind: ErrorKind::Transient,
                    message: rules.no_response_message.clone(),
                    recoverable: true,
                    status: None,
                    recovery: Recovery::Retry,
                };
            }
            TransportError::Status { status, .. } => *status,
        };

        let (kind, message, recovery) = match status {
            NOT_FOUND => (ErrorKind::NotFound, &rules.not_found_message, Recovery::Inline),
            s if rules.object_missing == Some(s) => {
                (ErrorKind::NotFound, &rules.not_found_message, Recovery::Inline)
            }
            s if rules.unknown_identity == Some(s) => (
                ErrorKind::PermissionDenied,
                &rules.unknown_identity_message,
                Recovery::Inline,
            ),
            UNAUTHORIZED | FORBIDDEN => (
                ErrorKind::Unknown,
                &rules.session_expired_message,
                Recovery::NotifyAndNavigate(Navigation::To(Route::Login)),
            ),
            _ => {
                let recovery = match rules.fallback {
                    Some(navigation) => Recovery::NotifyAndNavigate(navigation),
                    None => Recovery::Notify,
                };
                (ErrorKind::Unknown, &rules.unexpected_message, recovery)
            }
        };

        ClassifiedError {
            kind,
            message: message.clone(),
            recoverable: false,
            status: Some(status),
            recovery,
        }
    }
}
