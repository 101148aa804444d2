//! Internal error types for taskdesk-reqwest.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for taskdesk-reqwest operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Internal error type for taskdesk-reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Response body could not be decoded.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Base URL or endpoint could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    /// Base URL cannot carry path segments.
    #[error("Base URL '{0}' cannot be used as a base")]
    CannotBeABase(String),
    /// Server answered with a non-success status.
    #[error("Server returned {status}")]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    /// Response decoded but holds values outside the domain.
    #[error("Unexpected response: {0}")]
    Wire(String),
    /// No credential is available for an authenticated call.
    #[error("Not signed in")]
    MissingCredential,
}

impl From<Error> for taskdesk_core::Error {
    fn from(err: Error) -> Self {
        use taskdesk_core::Error as CoreError;

        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    CoreError::network_error()
                        .with_message("Request timed out")
                        .with_source(e)
                } else if e.is_connect() {
                    CoreError::network_error()
                        .with_message("Connection failed")
                        .with_source(e)
                } else {
                    CoreError::network_error()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            Error::Serde(e) => CoreError::serialization()
                .with_message(e.to_string())
                .with_source(e),
            Error::Url(e) => CoreError::configuration()
                .with_message(e.to_string())
                .with_source(e),
            Error::CannotBeABase(base) => CoreError::configuration()
                .with_message(format!("Base URL '{base}' cannot be used as a base")),
            Error::Status { status, message } => {
                let error = match status {
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CoreError::unauthorized(),
                    StatusCode::NOT_FOUND => CoreError::not_found(),
                    StatusCode::BAD_REQUEST
                    | StatusCode::CONFLICT
                    | StatusCode::UNPROCESSABLE_ENTITY => CoreError::validation(),
                    _ => CoreError::network_error(),
                };
                match message {
                    Some(message) => error.with_message(message),
                    None => error.with_message(format!("Server returned {status}")),
                }
            }
            Error::Wire(message) => CoreError::validation().with_message(message),
            Error::MissingCredential => CoreError::unauthorized().with_message("Not signed in"),
        }
    }
}

#[cfg(test)]
mod tests {
    use taskdesk_core::ErrorKind;

    use super::*;

    fn kind_of(status: StatusCode) -> ErrorKind {
        taskdesk_core::Error::from(Error::Status {
            status,
            message: None,
        })
        .kind
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(kind_of(StatusCode::UNAUTHORIZED), ErrorKind::Unauthorized);
        assert_eq!(kind_of(StatusCode::FORBIDDEN), ErrorKind::Unauthorized);
        assert_eq!(kind_of(StatusCode::NOT_FOUND), ErrorKind::NotFound);
        assert_eq!(kind_of(StatusCode::BAD_REQUEST), ErrorKind::Validation);
        assert_eq!(kind_of(StatusCode::CONFLICT), ErrorKind::Validation);
        assert_eq!(kind_of(StatusCode::UNPROCESSABLE_ENTITY), ErrorKind::Validation);
        assert_eq!(kind_of(StatusCode::INTERNAL_SERVER_ERROR), ErrorKind::NetworkError);
        assert_eq!(kind_of(StatusCode::BAD_GATEWAY), ErrorKind::NetworkError);
    }

    #[test]
    fn test_server_message_is_kept() {
        let error = taskdesk_core::Error::from(Error::Status {
            status: StatusCode::NOT_FOUND,
            message: Some("Task 9 not found".into()),
        });

        assert_eq!(error.message.as_deref(), Some("Task 9 not found"));
    }

    #[test]
    fn test_wire_errors_are_validation() {
        let error = taskdesk_core::Error::from(Error::Wire("unknown task status 'x'".into()));
        assert_eq!(error.kind, ErrorKind::Validation);
    }
}
