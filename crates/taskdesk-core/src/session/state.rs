//! Session snapshot and its persisted form.

use serde::{Deserialize, Serialize};

use crate::auth::LoginResponse;
use crate::types::{Credential, Identity};
use crate::{Error, Result};

/// Name of the single storage entry holding the persisted session.
pub const SESSION_STORAGE_KEY: &str = "auth-storage";

/// Version written into every persisted entry.
const PERSISTED_VERSION: u32 = 1;

/// The aggregate authentication state of the running client.
///
/// A credential and its identity are stored together, so one is present
/// exactly when the other is.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub(crate) authenticated: Option<LoginResponse>,
    pub(crate) in_flight: u32,
    pub(crate) error: Option<Error>,
}

impl Session {
    /// Returns the current credential.
    pub fn credential(&self) -> Option<&Credential> {
        self.authenticated.as_ref().map(|auth| &auth.credential)
    }

    /// Returns the current identity.
    pub fn identity(&self) -> Option<&Identity> {
        self.authenticated.as_ref().map(|auth| &auth.identity)
    }

    /// Returns true if a credential and identity are present.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.is_some()
    }

    /// Returns true while at least one login is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Returns the error recorded by the last failed login or expiry.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub(crate) fn clear(&mut self) {
        self.authenticated = None;
        self.error = None;
    }
}

/// On-disk representation of an authenticated session.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    version: u32,
    credential: Credential,
    identity: Identity,
}

/// Serializes an authenticated session for storage.
pub(crate) fn encode(authenticated: &LoginResponse) -> Result<String> {
    let persisted = PersistedSession {
        version: PERSISTED_VERSION,
        credential: authenticated.credential.clone(),
        identity: authenticated.identity.clone(),
    };
    Ok(serde_json::to_string(&persisted)?)
}

/// Decodes a stored entry, reporting any malformation as persistence corruption.
pub(crate) fn decode(raw: &str) -> Result<LoginResponse> {
    let persisted: PersistedSession = serde_json::from_str(raw).map_err(|error| {
        Error::persistence_corruption()
            .with_message("Persisted session is not valid JSON for this version")
            .with_source(error)
    })?;

    if persisted.version != PERSISTED_VERSION {
        return Err(Error::persistence_corruption().with_message(format!(
            "Unsupported persisted session version {}",
            persisted.version
        )));
    }

    if persisted.credential.is_blank() {
        return Err(Error::persistence_corruption().with_message("Persisted access token is empty"));
    }

    Ok(LoginResponse::new(persisted.credential, persisted.identity))
}
