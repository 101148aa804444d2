//! Task repository wrapper with validation and observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use super::TaskProvider;
use crate::types::{IdentityId, NewTask, Task, TaskId, TaskPatch};
use crate::{Error, Result, TRACING_TARGET_REPOSITORY};

/// Task repository wrapper with observability.
///
/// Validates payloads before they reach the provider and logs every call with
/// its duration. The inner provider is wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct TaskService {
    inner: Arc<dyn TaskProvider>,
}

impl fmt::Debug for TaskService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskService").finish_non_exhaustive()
    }
}

impl TaskService {
    /// Create a new task service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: TaskProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Lists every task.
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let result = observe("list_tasks", self.inner.list_tasks()).await;
        if let Ok(tasks) = &result {
            tracing::debug!(target: TRACING_TARGET_REPOSITORY, count = tasks.len(), "Tasks listed");
        }
        result
    }

    /// Lists the tasks assigned to `assignee`.
    pub async fn list_tasks_by_assignee(&self, assignee: IdentityId) -> Result<Vec<Task>> {
        let result = observe(
            "list_tasks_by_assignee",
            self.inner.list_tasks_by_assignee(assignee),
        )
        .await;
        if let Ok(tasks) = &result {
            tracing::debug!(
                target: TRACING_TARGET_REPOSITORY,
                assignee,
                count = tasks.len(),
                "Assigned tasks listed"
            );
        }
        result
    }

    /// Fetches a single task.
    pub async fn get_task(&self, id: TaskId) -> Result<Task> {
        observe("get_task", self.inner.get_task(id)).await
    }

    /// Validates and creates a task.
    pub async fn create_task(&self, task: &NewTask) -> Result<Task> {
        task.validate()?;
        let created = observe("create_task", self.inner.create_task(task)).await?;

        tracing::info!(target: TRACING_TARGET_REPOSITORY, task_id = created.id, "Task created");
        Ok(created)
    }

    /// Validates and applies a partial update.
    pub async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        if patch.is_empty() {
            return Err(Error::validation().with_message("Nothing to update"));
        }
        patch.validate()?;
        let updated = observe("update_task", self.inner.update_task(id, patch)).await?;

        tracing::info!(target: TRACING_TARGET_REPOSITORY, task_id = id, "Task updated");
        Ok(updated)
    }

    /// Deletes a task.
    pub async fn delete_task(&self, id: TaskId) -> Result<()> {
        observe("delete_task", self.inner.delete_task(id)).await?;

        tracing::info!(target: TRACING_TARGET_REPOSITORY, task_id = id, "Task deleted");
        Ok(())
    }
}

async fn observe<T>(
    operation: &'static str,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    let started_at = Instant::now();
    let result = future.await;
    let elapsed = started_at.elapsed();

    match &result {
        Ok(_) => tracing::debug!(
            target: TRACING_TARGET_REPOSITORY,
            operation,
            elapsed_ms = elapsed.as_millis(),
            "Repository call succeeded"
        ),
        Err(error) => tracing::warn!(
            target: TRACING_TARGET_REPOSITORY,
            operation,
            kind = error.kind_str(),
            error = %error,
            elapsed_ms = elapsed.as_millis(),
            "Repository call failed"
        ),
    }

    result
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::ErrorKind;
    use crate::mock::MockTaskProvider;
    use crate::types::{TaskPriority, TaskStatus};

    fn task(id: TaskId, assignee: IdentityId) -> Task {
        Task {
            id,
            title: format!("Task {id}"),
            description: None,
            status: TaskStatus::ToDo,
            priority: TaskPriority::Low,
            start_date: date(2025, 1, 1),
            due_date: None,
            assignee_id: Some(assignee),
        }
    }

    #[tokio::test]
    async fn test_list_by_assignee() {
        let provider = MockTaskProvider::with_tasks([task(1, 1), task(2, 2), task(3, 1)]);
        let service = TaskService::new(provider);

        let ids: Vec<TaskId> = service
            .list_tasks_by_assignee(1)
            .await
            .unwrap()
            .into_iter()
            .map(|task| task.id)
            .collect();
        assert_eq!(ids, [1, 3]);
    }

    #[tokio::test]
    async fn test_invalid_payload_never_reaches_provider() {
        let provider = MockTaskProvider::new();
        let service = TaskService::new(provider.clone());

        let invalid = NewTask::new("  ", date(2025, 1, 2));
        assert_eq!(
            service.create_task(&invalid).await.unwrap_err().kind,
            ErrorKind::Validation
        );

        let inverted = NewTask::new("Plan", date(2025, 1, 2)).with_due_date(date(2025, 1, 1));
        assert!(service.create_task(&inverted).await.is_err());

        assert!(service.update_task(1, &TaskPatch::default()).await.is_err());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = TaskService::new(MockTaskProvider::new());

        let created = service
            .create_task(&NewTask::new("Plan", date(2025, 1, 2)).with_assignee(7))
            .await
            .unwrap();
        let fetched = service.get_task(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.assignee_id, Some(7));
    }

    #[tokio::test]
    async fn test_missing_task_is_not_found() {
        let service = TaskService::new(MockTaskProvider::new());

        assert_eq!(service.get_task(9).await.unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(service.delete_task(9).await.unwrap_err().kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_applies_patch() {
        let service = TaskService::new(MockTaskProvider::with_tasks([task(1, 1)]));
        let patch = TaskPatch {
            status: Some(TaskStatus::Done),
            ..Default::default()
        };

        let updated = service.update_task(1, &patch).await.unwrap();
        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.title, "Task 1");
    }
}
