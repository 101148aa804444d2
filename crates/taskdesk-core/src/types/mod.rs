//! Domain types shared by the session store, the guard and the repository.

mod identity;
mod task;

pub use identity::{Credential, Identity, IdentityId, Role};
pub use task::{NewTask, Task, TaskId, TaskPatch, TaskPriority, TaskStatus};
