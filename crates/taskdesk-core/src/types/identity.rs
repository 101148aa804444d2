//! Credential and identity of the authenticated principal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned identifier of an identity (also used as task assignee).
pub type IdentityId = u64;

/// Bearer tokens proving an authenticated session.
///
/// The access token is attached to every outgoing request. The refresh token is
/// kept alongside it but never used by this crate.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Short-lived access token sent as `Authorization: Bearer <token>`.
    pub access_token: String,
    /// Optional refresh token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Credential {
    /// Creates a credential holding only an access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
        }
    }

    /// Sets the refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Returns true if the access token is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.access_token.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// A role membership of an identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    /// Server-assigned role identifier, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Role name, matched exactly by policies.
    pub name: String,
}

impl Role {
    /// Creates a role with the given name and no identifier.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Sets the role identifier.
    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }
}

/// The authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Unique identifier.
    pub id: IdentityId,
    /// Login email address.
    #[serde(default)]
    pub email: String,
    /// Whether the account is active.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Role memberships in server order.
    #[serde(default)]
    pub roles: Vec<Role>,
}

fn default_active() -> bool {
    true
}

impl Identity {
    /// Creates an active identity without roles.
    pub fn new(id: IdentityId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            is_active: true,
            roles: Vec::new(),
        }
    }

    /// Appends a role membership.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    /// Returns true if the identity is a member of the named role.
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|role| role.name == name)
    }

    /// Iterates over the role names in order.
    pub fn role_names(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(|role| role.name.as_str())
    }
}
