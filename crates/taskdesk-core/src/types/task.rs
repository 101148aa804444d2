//! Task entities and the create/update payloads.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::IdentityId;
use crate::{Error, Result};

/// Server-assigned identifier of a task.
pub type TaskId = u64;

/// Workflow status of a task.
///
/// Parsing is ASCII case-insensitive and accepts `pending` as an alias of
/// [`TaskStatus::ToDo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    #[strum(to_string = "to_do", serialize = "pending", serialize = "todo")]
    #[serde(alias = "pending")]
    ToDo,
    /// Being worked on.
    #[strum(to_string = "in_progress", serialize = "in-progress")]
    #[serde(alias = "in-progress")]
    InProgress,
    /// Finished.
    Done,
}

/// Priority of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority.
    Medium,
    /// High priority.
    High,
}

/// A read-through copy of a server-owned task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable, server-assigned identifier.
    pub id: TaskId,
    /// Non-empty title.
    pub title: String,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Workflow status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Day the task starts.
    pub start_date: Date,
    /// Day the task is due; never before `start_date`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
    /// Identity the task is assigned to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<IdentityId>,
}

impl Task {
    /// Checks the task invariants.
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_dates(Some(self.start_date), self.due_date)
    }

    /// Returns true if the task is assigned to the given identity.
    pub fn is_assigned_to(&self, identity: IdentityId) -> bool {
        self.assignee_id == Some(identity)
    }
}

/// Payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Non-empty title.
    pub title: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Initial status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Start date.
    pub start_date: Date,
    /// Optional due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
    /// Optional assignee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<IdentityId>,
}

impl NewTask {
    /// Creates a payload with the form defaults: `to_do`, `medium`, unassigned.
    pub fn new(title: impl Into<String>, start_date: Date) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TaskStatus::ToDo,
            priority: TaskPriority::Medium,
            start_date,
            due_date: None,
            assignee_id: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: Date) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee_id: IdentityId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Checks the task invariants before the payload is sent.
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_dates(Some(self.start_date), self.due_date)
    }
}

/// Partial update of a task; only fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// New priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    /// New start date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,
    /// New due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
    /// New assignee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<IdentityId>,
}

impl TaskPatch {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Checks the invariants that can be decided from the patch alone.
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        validate_dates(self.start_date, self.due_date)
    }

    /// Checks the invariants of the task that would result from applying the patch.
    pub fn validate_against(&self, task: &Task) -> Result<()> {
        self.validate()?;
        validate_dates(
            Some(self.start_date.unwrap_or(task.start_date)),
            self.due_date.or(task.due_date),
        )
    }

    /// Applies the patch to a local copy of a task.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(start_date) = self.start_date {
            task.start_date = start_date;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(assignee_id) = self.assignee_id {
            task.assignee_id = Some(assignee_id);
        }
    }
}

impl From<Task> for TaskPatch {
    fn from(task: Task) -> Self {
        Self {
            title: Some(task.title),
            description: task.description,
            status: Some(task.status),
            priority: Some(task.priority),
            start_date: Some(task.start_date),
            due_date: task.due_date,
            assignee_id: task.assignee_id,
        }
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::validation().with_message("Title must not be empty"));
    }
    Ok(())
}

fn validate_dates(start_date: Option<Date>, due_date: Option<Date>) -> Result<()> {
    if let (Some(start), Some(due)) = (start_date, due_date)
        && due < start
    {
        return Err(Error::validation()
            .with_message(format!("Due date {due} must not precede start date {start}")));
    }
    Ok(())
}
