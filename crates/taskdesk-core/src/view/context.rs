//! Application context injected into every screen.

use super::list::{TaskListView, TaskScope};
use crate::filter::FilterState;
use crate::guard::{self, Action, Decision, Route};
use crate::repository::TaskService;
use crate::session::SessionStore;
use crate::types::{Identity, NewTask, Task, TaskId, TaskPatch};
use crate::{Result, TRACING_TARGET_VIEW};

/// The collaborators shared by every screen for the lifetime of the process.
///
/// Cloning is cheap; clones share the same session and filter state.
#[derive(Debug, Clone)]
pub struct AppContext {
    session: SessionStore,
    filters: FilterState,
    tasks: TaskService,
}

impl AppContext {
    /// Creates a context from its collaborators.
    pub fn new(session: SessionStore, filters: FilterState, tasks: TaskService) -> Self {
        Self {
            session,
            filters,
            tasks,
        }
    }

    /// Returns the session store.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Returns the shared filter state.
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Returns the task repository.
    pub fn tasks(&self) -> &TaskService {
        &self.tasks
    }

    /// Returns the signed-in identity.
    pub fn identity(&self) -> Option<Identity> {
        self.session.current_identity()
    }

    /// Evaluates a navigation against the current session.
    pub fn navigate(&self, route: Route) -> Decision {
        let identity = self.identity();
        let decision = guard::evaluate(identity.as_ref(), &route);

        tracing::info!(
            target: TRACING_TARGET_VIEW,
            route = %route,
            destination = %decision.destination(route),
            "Navigated"
        );
        decision
    }

    /// Checks that the signed-in identity may perform `action`.
    pub fn authorize(&self, action: Action) -> Result<Identity> {
        let identity = self.identity();
        guard::authorize(identity.as_ref(), action).cloned()
    }

    /// Creates a list view over the given scope.
    pub fn list_view(&self, scope: TaskScope) -> TaskListView {
        TaskListView::new(self.clone(), scope)
    }

    /// Fetches a single task for display.
    pub async fn view_task(&self, id: TaskId) -> Result<Task> {
        self.authorize(Action::ViewTasks)?;
        self.tasks.get_task(id).await
    }

    /// Creates a task.
    pub async fn create_task(&self, task: &NewTask) -> Result<Task> {
        self.authorize(Action::CreateTask)?;
        self.tasks.create_task(task).await
    }

    /// Updates a task.
    pub async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        self.authorize(Action::UpdateTask)?;
        self.tasks.update_task(id, patch).await
    }

    /// Deletes a task.
    pub async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.authorize(Action::DeleteTask)?;
        self.tasks.delete_task(id).await
    }
}
