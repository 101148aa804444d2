//! Role policies and the actions they protect.

use std::fmt;
use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::types::Identity;
use crate::{Error, Result};

/// Role granting administrative actions.
pub const ADMINISTRATOR_ROLE: &str = "Administrators";

/// Named predicate over an identity's role memberships.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Any signed-in identity.
    Authenticated,
    /// Identities holding [`ADMINISTRATOR_ROLE`].
    IsAdministrator,
    /// Identities holding the named role.
    Role(String),
}

impl Policy {
    /// Creates a policy requiring the named role.
    pub fn role(name: impl Into<String>) -> Self {
        Self::Role(name.into())
    }

    /// Returns true if `identity` satisfies this policy.
    ///
    /// Role names are compared exactly.
    pub fn is_satisfied_by(&self, identity: &Identity) -> bool {
        match self {
            Self::Authenticated => true,
            Self::IsAdministrator => identity.has_role(ADMINISTRATOR_ROLE),
            Self::Role(name) => identity.has_role(name),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authenticated => f.write_str("authenticated"),
            Self::IsAdministrator => f.write_str("is-administrator"),
            Self::Role(name) => write!(f, "role:{name}"),
        }
    }
}

impl FromStr for Policy {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "authenticated" => Ok(Self::Authenticated),
            "is-administrator" => Ok(Self::IsAdministrator),
            _ => match value.strip_prefix("role:") {
                Some(name) if !name.is_empty() => Ok(Self::role(name)),
                _ => Err(Error::configuration().with_message(format!("Unknown policy '{value}'"))),
            },
        }
    }
}

/// Returns true if `identity` is present and satisfies `policy`.
pub fn is_permitted(identity: Option<&Identity>, policy: &Policy) -> bool {
    identity.is_some_and(|identity| policy.is_satisfied_by(identity))
}

/// Task operations that are re-checked when performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    ViewTasks,
    CreateTask,
    UpdateTask,
    DeleteTask,
}

impl Action {
    /// Returns the policy guarding this action.
    pub fn policy(self) -> Policy {
        match self {
            Self::ViewTasks | Self::CreateTask | Self::UpdateTask => Policy::Authenticated,
            Self::DeleteTask => Policy::IsAdministrator,
        }
    }
}

/// Checks that `identity` may perform `action`.
///
/// Fails with an authentication failure when nobody is signed in and with an
/// authorization denial when the policy is not satisfied.
pub fn authorize(identity: Option<&Identity>, action: Action) -> Result<&Identity> {
    let Some(identity) = identity else {
        return Err(Error::authentication().with_message("Sign in to continue"));
    };

    let policy = action.policy();
    if policy.is_satisfied_by(identity) {
        Ok(identity)
    } else {
        Err(Error::authorization().with_message(format!("'{action}' requires {policy}")))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::ErrorKind;
    use crate::types::Role;

    fn with_roles(roles: &[&str]) -> Identity {
        roles.iter().fold(Identity::new(1, "a@x.com"), |identity, role| {
            identity.with_role(Role::named(*role))
        })
    }

    #[test]
    fn test_administrator_policy() {
        let admin = with_roles(&["Administrators"]);
        let member = with_roles(&["Member"]);

        assert!(is_permitted(Some(&admin), &Policy::IsAdministrator));
        assert!(!is_permitted(Some(&member), &Policy::IsAdministrator));
    }

    #[test]
    fn test_role_names_match_exactly() {
        let identity = with_roles(&["administrators", "Administrator"]);

        assert!(!is_permitted(Some(&identity), &Policy::IsAdministrator));
        assert!(is_permitted(Some(&identity), &Policy::role("Administrator")));
    }

    #[test]
    fn test_no_identity_is_never_permitted() {
        assert!(!is_permitted(None, &Policy::Authenticated));
        assert!(!is_permitted(None, &Policy::IsAdministrator));
    }

    #[test]
    fn test_authenticated_policy_ignores_roles() {
        assert!(is_permitted(Some(&with_roles(&[])), &Policy::Authenticated));
    }

    #[test]
    fn test_policy_parse_and_display() {
        for raw in ["authenticated", "is-administrator", "role:Member"] {
            let policy: Policy = raw.parse().unwrap();
            assert_eq!(policy.to_string(), raw);
        }

        assert!("role:".parse::<Policy>().is_err());
        assert!("admin".parse::<Policy>().is_err());
    }

    #[test]
    fn test_authorize_without_identity() {
        for action in Action::iter() {
            let error = authorize(None, action).unwrap_err();
            assert_eq!(error.kind, ErrorKind::AuthenticationFailure);
        }
    }

    #[test]
    fn test_delete_requires_administrator() {
        let member = with_roles(&["Member"]);
        let admin = with_roles(&["Member", "Administrators"]);

        assert!(authorize(Some(&member), Action::UpdateTask).is_ok());
        assert_eq!(
            authorize(Some(&member), Action::DeleteTask).unwrap_err().kind,
            ErrorKind::AuthorizationDenied
        );
        assert!(authorize(Some(&admin), Action::DeleteTask).is_ok());
    }
}
