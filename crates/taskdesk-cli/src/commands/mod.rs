//! Screen commands shared by one-shot invocations and the interactive shell.

use clap::{Args, Subcommand};
use jiff::civil::Date;
use taskdesk_core::types::{IdentityId, NewTask, TaskId, TaskPatch, TaskPriority, TaskStatus};
use taskdesk_core::{FilterCriteria, Route};

/// A screen or action of the client.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Sign in and open the task list
    Login {
        /// Login email address
        username: String,
        /// Password
        #[arg(short, long, env = "TASKDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// List every task
    Tasks(FilterArgs),
    /// List the tasks assigned to you
    Mine(FilterArgs),
    /// Show a single task
    Show {
        /// Task identifier
        id: TaskId,
    },
    /// Create a task
    Create(CreateArgs),
    /// Update fields of a task
    Update(UpdateArgs),
    /// Delete a task (administrators only)
    Delete {
        /// Task identifier
        id: TaskId,
    },
    /// Replace the shared status/priority filters
    Filter(FilterArgs),
    /// Open a path, as a browser would
    Open {
        /// Path such as /tasks or /view-task/3
        path: String,
    },
    /// Start an interactive session
    Shell,
}

impl Command {
    /// Returns the route this command shows.
    pub fn route(&self) -> Route {
        match self {
            Self::Login { .. } | Self::Logout => Route::Login,
            Self::Whoami | Self::Tasks(_) | Self::Filter(_) | Self::Shell => Route::Tasks,
            Self::Mine(_) => Route::MyTasks,
            Self::Show { id } => Route::ViewTask(*id),
            Self::Create(_) => Route::CreateTask,
            Self::Update(args) => Route::UpdateTask(args.id),
            Self::Delete { .. } => Route::Tasks,
            Self::Open { path } => Route::parse(path),
        }
    }
}

/// Status and priority filter values.
///
/// Values are matched case-insensitively; unknown values leave the filter unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct FilterArgs {
    /// Status to show (to_do, in_progress, done)
    #[arg(short, long)]
    pub status: Option<String>,
    /// Priority to show (low, medium, high)
    #[arg(short, long)]
    pub priority: Option<String>,
}

impl FilterArgs {
    /// Returns true if no filter value was given.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none()
    }

    /// Converts the raw values into criteria.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::parse(
            self.status.as_deref().unwrap_or_default(),
            self.priority.as_deref().unwrap_or_default(),
        )
    }
}

/// Fields of a new task.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct CreateArgs {
    /// Title
    pub title: String,
    /// Description
    #[arg(short, long)]
    pub description: Option<String>,
    /// Initial status
    #[arg(short, long, value_parser = parse_status, default_value = "to_do")]
    pub status: TaskStatus,
    /// Priority
    #[arg(short, long, value_parser = parse_priority, default_value = "medium")]
    pub priority: TaskPriority,
    /// Start date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub start: Option<Date>,
    /// Due date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub due: Option<Date>,
    /// Assignee identifier
    #[arg(short, long)]
    pub assignee: Option<IdentityId>,
}

impl CreateArgs {
    /// Builds the create payload, starting today unless a start date is given.
    pub fn into_new_task(self, today: Date) -> NewTask {
        let mut task = NewTask::new(self.title, self.start.unwrap_or(today))
            .with_status(self.status)
            .with_priority(self.priority);
        task.description = self.description;
        task.due_date = self.due;
        task.assignee_id = self.assignee;
        task
    }
}

/// Fields to change on an existing task.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct UpdateArgs {
    /// Task identifier
    pub id: TaskId,
    /// New title
    #[arg(short, long)]
    pub title: Option<String>,
    /// New description
    #[arg(short, long)]
    pub description: Option<String>,
    /// New status
    #[arg(short, long, value_parser = parse_status)]
    pub status: Option<TaskStatus>,
    /// New priority
    #[arg(short, long, value_parser = parse_priority)]
    pub priority: Option<TaskPriority>,
    /// New start date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub start: Option<Date>,
    /// New due date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub due: Option<Date>,
    /// New assignee identifier
    #[arg(short, long)]
    pub assignee: Option<IdentityId>,
}

impl UpdateArgs {
    /// Builds the partial update.
    pub fn patch(&self) -> TaskPatch {
        TaskPatch {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority,
            start_date: self.start,
            due_date: self.due,
            assignee_id: self.assignee,
        }
    }
}

fn parse_status(raw: &str) -> Result<TaskStatus, String> {
    raw.parse()
        .map_err(|_| format!("unknown status '{raw}' (to_do, in_progress, done)"))
}

fn parse_priority(raw: &str) -> Result<TaskPriority, String> {
    raw.parse()
        .map_err(|_| format!("unknown priority '{raw}' (low, medium, high)"))
}

fn parse_date(raw: &str) -> Result<Date, String> {
    raw.parse()
        .map_err(|error| format!("invalid date '{raw}': {error}"))
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use jiff::civil::date;

    use super::*;

    #[derive(Debug, Parser)]
    #[command(no_binary_name = true)]
    struct Line {
        #[command(subcommand)]
        command: Command,
    }

    fn parse(line: &str) -> Command {
        Line::try_parse_from(line.split_whitespace()).unwrap().command
    }

    #[test]
    fn test_parse_create_with_defaults() {
        let Command::Create(args) = parse("create Plan --due 2025-04-02 -a 3") else {
            panic!("expected create");
        };
        let task = args.into_new_task(date(2025, 4, 1));

        assert_eq!(task.title, "Plan");
        assert_eq!(task.status, TaskStatus::ToDo);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.start_date, date(2025, 4, 1));
        assert_eq!(task.due_date, Some(date(2025, 4, 2)));
        assert_eq!(task.assignee_id, Some(3));
    }

    #[test]
    fn test_parse_update_builds_patch() {
        let Command::Update(args) = parse("update 7 --status DONE -p high") else {
            panic!("expected update");
        };
        let patch = args.patch();

        assert_eq!(args.id, 7);
        assert_eq!(patch.status, Some(TaskStatus::Done));
        assert_eq!(patch.priority, Some(TaskPriority::High));
        assert!(patch.title.is_none());
    }

    #[test]
    fn test_invalid_status_is_rejected() {
        assert!(Line::try_parse_from(["update", "7", "--status", "archived"]).is_err());
        assert!(Line::try_parse_from(["create", "x", "--start", "tomorrow"]).is_err());
    }

    #[test]
    fn test_filter_args_are_permissive() {
        let Command::Tasks(args) = parse("tasks --status Done --priority urgent") else {
            panic!("expected tasks");
        };

        assert_eq!(
            args.criteria(),
            FilterCriteria::new().with_status(TaskStatus::Done)
        );
    }

    #[test]
    fn test_routes() {
        assert_eq!(parse("show 4").route(), Route::ViewTask(4));
        assert_eq!(parse("mine").route(), Route::MyTasks);
        assert_eq!(parse("open /update-task/2").route(), Route::UpdateTask(2));
        assert_eq!(parse("open /nowhere").route(), Route::AccessDenied);
    }
}
