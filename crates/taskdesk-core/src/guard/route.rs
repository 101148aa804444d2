//! Navigation targets and the route access state machine.

use std::fmt;

use super::policy::{Policy, is_permitted};
use crate::TRACING_TARGET_GUARD;
use crate::types::{Identity, TaskId};

/// A screen of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    AccessDenied,
    Tasks,
    MyTasks,
    ViewTask(TaskId),
    CreateTask,
    UpdateTask(TaskId),
}

impl Route {
    /// Resolves a path to a route.
    ///
    /// `/` is the login screen; any unknown path resolves to the access-denied
    /// screen. A single trailing slash is ignored.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let trimmed = trimmed.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(trimmed);
        let segments: Vec<&str> = trimmed.trim_start_matches('/').split('/').collect();

        match segments.as_slice() {
            [""] | ["login"] => Self::Login,
            ["access-denied"] => Self::AccessDenied,
            ["tasks"] => Self::Tasks,
            ["my-tasks"] => Self::MyTasks,
            ["create-task"] => Self::CreateTask,
            ["view-task", id] => id.parse().map_or(Self::AccessDenied, Self::ViewTask),
            ["update-task", id] => id.parse().map_or(Self::AccessDenied, Self::UpdateTask),
            _ => Self::AccessDenied,
        }
    }

    /// Returns the canonical path of this route.
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_owned(),
            Self::AccessDenied => "/access-denied".to_owned(),
            Self::Tasks => "/tasks".to_owned(),
            Self::MyTasks => "/my-tasks".to_owned(),
            Self::ViewTask(id) => format!("/view-task/{id}"),
            Self::CreateTask => "/create-task".to_owned(),
            Self::UpdateTask(id) => format!("/update-task/{id}"),
        }
    }

    /// Returns true for routes reachable without signing in.
    pub const fn is_public(&self) -> bool {
        matches!(self, Self::Login | Self::AccessDenied)
    }

    /// Returns the policy guarding this route, or `None` for public routes.
    pub fn policy(&self) -> Option<Policy> {
        if self.is_public() {
            None
        } else {
            Some(Policy::Authenticated)
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where a denied navigation is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Redirect {
    Login,
    AccessDenied,
}

impl Redirect {
    /// Returns the route this redirect targets.
    pub const fn route(self) -> Route {
        match self {
            Self::Login => Route::Login,
            Self::AccessDenied => Route::AccessDenied,
        }
    }
}

/// Outcome of evaluating a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Allow,
    Redirect(Redirect),
}

impl Decision {
    /// Returns true if the navigation is allowed.
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Returns the route actually shown for a navigation to `requested`.
    pub const fn destination(self, requested: Route) -> Route {
        match self {
            Self::Allow => requested,
            Self::Redirect(redirect) => redirect.route(),
        }
    }
}

/// Decides whether `identity` may enter `route`.
pub fn evaluate(identity: Option<&Identity>, route: &Route) -> Decision {
    let decision = match (route.policy(), identity) {
        (None, _) => Decision::Allow,
        (Some(_), None) => Decision::Redirect(Redirect::Login),
        (Some(policy), identity) if is_permitted(identity, &policy) => Decision::Allow,
        (Some(_), Some(_)) => Decision::Redirect(Redirect::AccessDenied),
    };

    tracing::debug!(
        target: TRACING_TARGET_GUARD,
        route = %route,
        authenticated = identity.is_some(),
        decision = ?decision,
        "Route evaluated"
    );

    decision
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(Route::parse("/"), Route::Login);
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/tasks"), Route::Tasks);
        assert_eq!(Route::parse("/tasks/"), Route::Tasks);
        assert_eq!(Route::parse("/my-tasks"), Route::MyTasks);
        assert_eq!(Route::parse("/view-task/7"), Route::ViewTask(7));
        assert_eq!(Route::parse("/create-task"), Route::CreateTask);
        assert_eq!(Route::parse("/update-task/12"), Route::UpdateTask(12));
    }

    #[test]
    fn test_parse_unknown_paths_deny_access() {
        for path in ["/nope", "/view-task/abc", "/view-task", "/tasks/1/2"] {
            assert_eq!(Route::parse(path), Route::AccessDenied, "{path}");
        }
    }

    #[test]
    fn test_path_round_trips() {
        for route in [Route::Tasks, Route::ViewTask(3), Route::UpdateTask(4), Route::Login] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_unauthenticated_protected_route_redirects_to_login() {
        assert_eq!(
            evaluate(None, &Route::Tasks),
            Decision::Redirect(Redirect::Login)
        );
        assert_eq!(
            evaluate(None, &Route::ViewTask(1)).destination(Route::ViewTask(1)),
            Route::Login
        );
    }

    #[test]
    fn test_public_routes_always_allowed() {
        assert!(evaluate(None, &Route::Login).is_allowed());
        assert!(evaluate(None, &Route::AccessDenied).is_allowed());
    }

    #[test]
    fn test_authenticated_routes_allowed() {
        let identity = Identity::new(1, "a@x.com");

        for route in [Route::Tasks, Route::MyTasks, Route::CreateTask, Route::UpdateTask(1)] {
            assert!(evaluate(Some(&identity), &route).is_allowed());
        }
    }
}
