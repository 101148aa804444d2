//! Task list view model.

use strum::{Display, EnumString};

use super::context::AppContext;
use super::derive::visible;
use crate::guard::{Action, Decision, Redirect, Route};
use crate::types::{Task, TaskId};
use crate::{Error, ErrorKind, Result, TRACING_TARGET_VIEW};

/// Which tasks a list view fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TaskScope {
    /// Every task.
    All,
    /// Tasks assigned to the signed-in identity.
    Mine,
}

impl TaskScope {
    /// Returns the route showing this scope.
    pub const fn route(self) -> Route {
        match self {
            Self::All => Route::Tasks,
            Self::Mine => Route::MyTasks,
        }
    }
}

/// A dismissible notification raised by a failed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Kind of the failure that raised the notice.
    pub kind: ErrorKind,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    /// Creates a notice for `error`, unless its kind is never shown.
    pub fn from_error(error: &Error) -> Option<Self> {
        error.kind.is_notified().then(|| Self {
            kind: error.kind,
            message: error.user_message(),
        })
    }
}

/// A task list screen: the fetched collection plus its visible subset.
///
/// The raw collection is owned by the view; the visible subset is derived from
/// it and the shared filter state on every call to [`TaskListView::visible`].
#[derive(Debug)]
pub struct TaskListView {
    context: AppContext,
    scope: TaskScope,
    tasks: Vec<Task>,
    notice: Option<Notice>,
}

impl TaskListView {
    pub(crate) fn new(context: AppContext, scope: TaskScope) -> Self {
        Self {
            context,
            scope,
            tasks: Vec::new(),
            notice: None,
        }
    }

    /// Returns the scope of this view.
    pub fn scope(&self) -> TaskScope {
        self.scope
    }

    /// Fetches the collection for this scope.
    ///
    /// Without a signed-in identity nothing is requested, the local collection
    /// is dropped and the view redirects to login. A failed fetch keeps the
    /// previous collection and raises a notice.
    pub async fn load(&mut self) -> Result<Decision> {
        let decision = self.context.navigate(self.scope.route());
        let identity = match self.context.authorize(Action::ViewTasks) {
            Ok(identity) if decision.is_allowed() => identity,
            Ok(_) => return Ok(self.redirect(decision)),
            Err(error) if error.kind == ErrorKind::AuthenticationFailure => {
                return Ok(self.redirect(Decision::Redirect(Redirect::Login)));
            }
            Err(_) => return Ok(self.redirect(Decision::Redirect(Redirect::AccessDenied))),
        };

        let fetched = match self.scope {
            TaskScope::All => self.context.tasks().list_tasks().await,
            TaskScope::Mine => self.context.tasks().list_tasks_by_assignee(identity.id).await,
        };

        match fetched {
            Ok(tasks) => {
                tracing::debug!(
                    target: TRACING_TARGET_VIEW,
                    scope = %self.scope,
                    count = tasks.len(),
                    "Task list loaded"
                );
                self.tasks = tasks;
                self.notice = None;
                Ok(Decision::Allow)
            }
            Err(error) => Err(self.raise(error)),
        }
    }

    /// Returns the fetched collection.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the tasks matching the current shared filter criteria.
    pub fn visible(&self) -> Vec<&Task> {
        visible(&self.tasks, &self.context.filters().filters())
    }

    /// Deletes a task after re-checking the delete policy.
    ///
    /// The task is removed locally only once the repository confirms.
    pub async fn delete(&mut self, id: TaskId) -> Result<()> {
        self.context.authorize(Action::DeleteTask)?;

        match self.context.tasks().delete_task(id).await {
            Ok(()) => {
                self.tasks.retain(|task| task.id != id);
                Ok(())
            }
            Err(error) => Err(self.raise(error)),
        }
    }

    /// Returns the pending notification.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Dismisses the pending notification.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn redirect(&mut self, decision: Decision) -> Decision {
        self.tasks.clear();
        self.notice = None;
        decision
    }

    fn raise(&mut self, error: Error) -> Error {
        if let Some(notice) = Notice::from_error(&error) {
            self.notice = Some(notice);
        }
        error
    }
}
