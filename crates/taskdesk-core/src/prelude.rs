//! Commonly used items from taskdesk-core.
//!
//! ```rust,ignore
//! use taskdesk_core::prelude::*;
//! ```

pub use crate::auth::{AuthProvider, AuthService, LoginRequest, LoginResponse};
pub use crate::filter::{FilterCriteria, FilterState};
pub use crate::guard::{Action, Decision, Policy, Redirect, Route};
#[cfg(feature = "test-utils")]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use crate::mock::{MockAuthProvider, MockTaskProvider};
pub use crate::repository::{TaskProvider, TaskService};
pub use crate::session::{FileStorage, MemoryStorage, Session, SessionStorage, SessionStore};
pub use crate::types::{
    Credential, Identity, IdentityId, NewTask, Role, Task, TaskId, TaskPatch, TaskPriority,
    TaskStatus,
};
pub use crate::view::{AppContext, Notice, TaskListView, TaskScope};
pub use crate::{Error, ErrorKind, Result};
