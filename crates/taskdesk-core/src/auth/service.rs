//! Authentication service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use super::{AuthProvider, LoginRequest, LoginResponse};
use crate::{Error, ErrorKind, Result, TRACING_TARGET_AUTH};

/// Authentication service wrapper with observability.
///
/// Adds structured logging to any [`AuthProvider`] and normalizes every failure
/// into an [`ErrorKind::AuthenticationFailure`]. The inner provider is wrapped
/// in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct AuthService {
    inner: Arc<dyn AuthProvider>,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}

impl AuthService {
    /// Create a new authentication service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: AuthProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Exchanges credentials for a session.
    pub async fn authenticate(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET_AUTH,
            username = %request.username,
            "Authenticating"
        );

        let result = self
            .inner
            .authenticate(request)
            .await
            .map_err(into_authentication_failure)
            .and_then(check_response);
        let elapsed = started_at.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    target: TRACING_TARGET_AUTH,
                    identity_id = response.identity.id,
                    roles = response.identity.roles.len(),
                    elapsed_ms = elapsed.as_millis(),
                    "Authentication succeeded"
                );
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_AUTH,
                    username = %request.username,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Authentication failed"
                );
            }
        }

        result
    }
}

fn into_authentication_failure(error: Error) -> Error {
    if error.kind == ErrorKind::AuthenticationFailure {
        return error;
    }

    let message = error.user_message();
    Error::authentication()
        .with_message(message)
        .with_source(error)
}

fn check_response(response: LoginResponse) -> Result<LoginResponse> {
    if response.credential.is_blank() {
        return Err(Error::authentication().with_message("Server returned an empty access token"));
    }
    if !response.identity.is_active {
        return Err(Error::authentication().with_message("Account is inactive"));
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Credential, Identity};

    struct StaticProvider(Result<LoginResponse>);

    #[async_trait::async_trait]
    impl AuthProvider for StaticProvider {
        async fn authenticate(&self, _request: &LoginRequest) -> Result<LoginResponse> {
            self.0.clone()
        }
    }

    fn request() -> LoginRequest {
        LoginRequest::new("a@x.com", "p")
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let response = LoginResponse::new(Credential::new("t1"), Identity::new(1, "a@x.com"));
        let service = AuthService::new(StaticProvider(Ok(response.clone())));

        assert_eq!(service.authenticate(&request()).await.unwrap(), response);
    }

    #[tokio::test]
    async fn test_other_kinds_become_authentication_failures() {
        let service = AuthService::new(StaticProvider(Err(
            Error::network_error().with_message("Connection failed")
        )));

        let error = service.authenticate(&request()).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::AuthenticationFailure);
        assert_eq!(error.message.as_deref(), Some("Connection failed"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[tokio::test]
    async fn test_inactive_identity_is_rejected() {
        let mut identity = Identity::new(1, "a@x.com");
        identity.is_active = false;
        let response = LoginResponse::new(Credential::new("t1"), identity);
        let service = AuthService::new(StaticProvider(Ok(response)));

        let error = service.authenticate(&request()).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::AuthenticationFailure);
    }

    #[tokio::test]
    async fn test_blank_token_is_rejected() {
        let response = LoginResponse::new(Credential::new(" "), Identity::new(1, "a@x.com"));
        let service = AuthService::new(StaticProvider(Ok(response)));

        assert!(service.authenticate(&request()).await.is_err());
    }
}
