#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod auth;
mod error;
pub mod filter;
pub mod guard;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;
#[doc(hidden)]
pub mod prelude;
pub mod repository;
pub mod session;
pub mod types;
pub mod view;

pub use auth::{AuthProvider, AuthService, LoginRequest, LoginResponse};
pub use error::{Error, ErrorKind, Result, SourceError};
pub use filter::{FilterCriteria, FilterState};
pub use guard::{Action, Decision, Policy, Redirect, Route};
pub use repository::{TaskProvider, TaskService};
pub use session::{Session, SessionStorage, SessionStore};
pub use view::{AppContext, Notice, TaskListView, TaskScope};

/// Tracing target for authentication.
pub const TRACING_TARGET_AUTH: &str = "taskdesk_core::auth";

/// Tracing target for the session store and its storage.
pub const TRACING_TARGET_SESSION: &str = "taskdesk_core::session";

/// Tracing target for route and action authorization.
pub const TRACING_TARGET_GUARD: &str = "taskdesk_core::guard";

/// Tracing target for filter state changes.
pub const TRACING_TARGET_FILTER: &str = "taskdesk_core::filter";

/// Tracing target for task repository calls.
pub const TRACING_TARGET_REPOSITORY: &str = "taskdesk_core::repository";

/// Tracing target for list views and navigation.
pub const TRACING_TARGET_VIEW: &str = "taskdesk_core::view";
