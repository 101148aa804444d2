//! Structured error handling for taskdesk client operations.

use std::sync::Arc;

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Type alias for shared dynamic errors that can be sent across threads.
///
/// The source is reference-counted so that an [`Error`] can be recorded in the
/// session state and returned to the caller at the same time.
pub type SourceError = Arc<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur in taskdesk operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Login was rejected, or the identity provider could not be reached.
    AuthenticationFailure,
    /// A valid session lacks the role required by a policy.
    AuthorizationDenied,
    /// The remote call did not complete (transport or server failure).
    NetworkError,
    /// The remote resource does not exist.
    NotFound,
    /// The remote service rejected the attached credential.
    Unauthorized,
    /// The payload was rejected locally or by the remote service.
    Validation,
    /// The persisted session entry could not be decoded.
    PersistenceCorruption,
    /// The persisted session entry could not be read or written.
    Storage,
    /// Serialization/deserialization error.
    Serialization,
    /// Configuration error.
    Configuration,
}

impl ErrorKind {
    /// Returns true for the failures of a task repository call.
    #[must_use]
    pub const fn is_repository_failure(self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::NotFound | Self::Unauthorized | Self::Validation
        )
    }

    /// Returns true if this kind produces a dismissible notification.
    ///
    /// Authorization denial is a redirect and persistence corruption is
    /// silently treated as an absent session, so neither is shown.
    #[must_use]
    pub const fn is_notified(self) -> bool {
        !matches!(
            self,
            Self::AuthorizationDenied | Self::PersistenceCorruption
        )
    }

    /// Creates an [`Error`] of this kind with the given message.
    pub fn with_message(self, message: impl Into<String>) -> Error {
        Error::new(self).with_message(message)
    }
}

/// Structured error type with classification and an optional cause.
#[must_use]
#[derive(Debug, Clone, Error)]
#[error("[{kind}]{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Primary error message.
    pub message: Option<String>,
    /// Underlying source error, if any.
    #[source]
    pub source: Option<SourceError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Creates a new error from a source error.
    pub fn from_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::new(kind).with_source(source)
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the source of the error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Creates a new authentication failure.
    pub fn authentication() -> Self {
        Self::new(ErrorKind::AuthenticationFailure)
    }

    /// Creates a new authorization denial.
    pub fn authorization() -> Self {
        Self::new(ErrorKind::AuthorizationDenied)
    }

    /// Creates a new network error.
    pub fn network_error() -> Self {
        Self::new(ErrorKind::NetworkError)
    }

    /// Creates a new not found error.
    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    /// Creates a new unauthorized error.
    pub fn unauthorized() -> Self {
        Self::new(ErrorKind::Unauthorized)
    }

    /// Creates a new validation error.
    pub fn validation() -> Self {
        Self::new(ErrorKind::Validation)
    }

    /// Creates a new persistence corruption error.
    pub fn persistence_corruption() -> Self {
        Self::new(ErrorKind::PersistenceCorruption)
    }

    /// Creates a new serialization error.
    pub fn serialization() -> Self {
        Self::new(ErrorKind::Serialization)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }

    /// Returns the message shown to the user for this error.
    pub fn user_message(&self) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => match self.kind {
                ErrorKind::AuthenticationFailure => "Sign in failed".to_owned(),
                ErrorKind::AuthorizationDenied => "Access denied".to_owned(),
                ErrorKind::NetworkError => "The server could not be reached".to_owned(),
                ErrorKind::NotFound => "The task no longer exists".to_owned(),
                ErrorKind::Unauthorized => "Your session is no longer valid".to_owned(),
                ErrorKind::Validation => "The request was rejected".to_owned(),
                _ => self.kind.to_string(),
            },
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::from_source(ErrorKind::Storage, error).with_message("I/O operation failed")
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::from_source(ErrorKind::Serialization, error)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_error_builder_pattern() {
        let error = ErrorKind::Validation.with_message("title must not be empty");

        assert_eq!(error.kind, ErrorKind::Validation);
        assert_eq!(error.message.as_deref(), Some("title must not be empty"));
        assert!(error.source.is_none());
    }

    #[test]
    fn test_error_display() {
        let error = Error::not_found().with_message("task 7");
        let display = error.to_string();

        assert!(display.contains("not_found"));
        assert!(display.contains("task 7"));
        assert_eq!(Error::unauthorized().to_string(), "[unauthorized]");
    }

    #[test]
    fn test_error_clone_keeps_source() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = Error::from(io_error);
        let cloned = error.clone();

        assert_eq!(cloned.kind, ErrorKind::Storage);
        assert!(cloned.source().is_some());
    }

    #[test]
    fn test_repository_failures() {
        assert!(ErrorKind::NetworkError.is_repository_failure());
        assert!(ErrorKind::NotFound.is_repository_failure());
        assert!(ErrorKind::Unauthorized.is_repository_failure());
        assert!(ErrorKind::Validation.is_repository_failure());

        assert!(!ErrorKind::AuthenticationFailure.is_repository_failure());
        assert!(!ErrorKind::PersistenceCorruption.is_repository_failure());
    }

    #[test]
    fn test_notified_kinds() {
        assert!(ErrorKind::AuthenticationFailure.is_notified());
        assert!(ErrorKind::NetworkError.is_notified());
        assert!(!ErrorKind::AuthorizationDenied.is_notified());
        assert!(!ErrorKind::PersistenceCorruption.is_notified());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            ErrorKind::from_str("authorization_denied").unwrap(),
            ErrorKind::AuthorizationDenied
        );
        assert!(ErrorKind::from_str("teapot").is_err());
    }

    #[test]
    fn test_user_message_prefers_explicit_message() {
        assert_eq!(
            Error::authentication().with_message("Invalid password").user_message(),
            "Invalid password"
        );
        assert_eq!(Error::authentication().user_message(), "Sign in failed");
    }
}
