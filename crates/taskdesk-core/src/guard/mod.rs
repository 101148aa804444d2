//! Authorization guard.
//!
//! Pure functions over the current [`Identity`](crate::types::Identity):
//! [`is_permitted`] for affordances, [`evaluate`] for navigation and
//! [`authorize`] at the point an action is performed. Nothing here caches a
//! decision; callers re-evaluate on every navigation and every action.

mod policy;
mod route;

pub use self::policy::{ADMINISTRATOR_ROLE, Action, Policy, authorize, is_permitted};
pub use self::route::{Decision, Redirect, Route, evaluate};
