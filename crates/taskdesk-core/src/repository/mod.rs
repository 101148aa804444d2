//! Task repository contract.
//!
//! [`TaskProvider`] is implemented by transports that talk to the remote task
//! service and attach the current credential to every call. [`TaskService`]
//! wraps a provider for injection into views.

mod service;

pub use self::service::TaskService;
use crate::Result;
use crate::types::{IdentityId, NewTask, Task, TaskId, TaskPatch};

/// Core trait for task storage.
///
/// Failures are reported with a repository kind: network error, not found,
/// unauthorized or validation. Implementations never retry.
#[async_trait::async_trait]
pub trait TaskProvider: Send + Sync {
    /// Lists every task.
    async fn list_tasks(&self) -> Result<Vec<Task>>;

    /// Lists the tasks assigned to `assignee`.
    async fn list_tasks_by_assignee(&self, assignee: IdentityId) -> Result<Vec<Task>>;

    /// Fetches a single task.
    async fn get_task(&self, id: TaskId) -> Result<Task>;

    /// Creates a task and returns it as stored.
    async fn create_task(&self, task: &NewTask) -> Result<Task>;

    /// Applies a partial update and returns the updated task.
    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task>;

    /// Deletes a task.
    async fn delete_task(&self, id: TaskId) -> Result<()>;
}
