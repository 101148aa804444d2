//! Authentication collaborator contract.
//!
//! [`AuthProvider`] is implemented by transports (see `taskdesk-reqwest`);
//! [`AuthService`] is the clonable wrapper the session store is built with.

mod service;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::service::AuthService;
use crate::Result;
use crate::types::{Credential, Identity};

/// Credentials submitted to the remote authentication endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login name (an email address for the task service).
    pub username: String,
    /// Plain-text password; never logged.
    pub password: String,
}

impl LoginRequest {
    /// Creates a new login request.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Successful authentication result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer tokens issued for the session.
    pub credential: Credential,
    /// The authenticated principal.
    pub identity: Identity,
}

impl LoginResponse {
    /// Creates a new login response.
    pub fn new(credential: Credential, identity: Identity) -> Self {
        Self {
            credential,
            identity,
        }
    }
}

/// Core trait for remote authentication.
///
/// Every failure, whatever its cause, must be reported as
/// [`ErrorKind::AuthenticationFailure`](crate::ErrorKind::AuthenticationFailure)
/// with the raw cause attached as the error source.
#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    /// Exchanges credentials for a bearer token and the matching identity.
    async fn authenticate(&self, request: &LoginRequest) -> Result<LoginResponse>;
}
