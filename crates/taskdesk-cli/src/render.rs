//! Plain-text rendering of screens.

use taskdesk_core::types::{Identity, Task};
use taskdesk_core::{FilterCriteria, Notice, Route};

const TITLE_WIDTH: usize = 48;

/// Renders tasks as a fixed-width table.
pub fn task_table(tasks: &[&Task]) -> String {
    if tasks.is_empty() {
        return "No tasks match the current filters.".to_owned();
    }

    let header = format!(
        "{:>5}  {:<11}  {:<8}  {:<10}  {:<10}  {:>8}  TITLE",
        "ID", "STATUS", "PRIORITY", "START", "DUE", "ASSIGNEE"
    );
    let rows = tasks.iter().map(|task| {
        format!(
            "{:>5}  {:<11}  {:<8}  {:<10}  {:<10}  {:>8}  {}",
            task.id,
            task.status.to_string(),
            task.priority.to_string(),
            task.start_date.to_string(),
            task.due_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
            task.assignee_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".into()),
            truncate(&task.title, TITLE_WIDTH),
        )
    });
    std::iter::once(header).chain(rows).collect::<Vec<_>>().join("\n")
}

/// Renders every field of a task.
pub fn task_detail(task: &Task) -> String {
    let mut lines = vec![
        format!("#{} {}", task.id, task.title),
        format!("  status:      {}", task.status),
        format!("  priority:    {}", task.priority),
        format!("  start date:  {}", task.start_date),
    ];
    if let Some(due) = task.due_date {
        lines.push(format!("  due date:    {due}"));
    }
    if let Some(assignee) = task.assignee_id {
        lines.push(format!("  assignee:    {assignee}"));
    }
    if let Some(description) = &task.description {
        lines.push(String::new());
        lines.push(description.clone());
    }
    lines.join("\n")
}

/// Renders the signed-in identity.
pub fn identity(identity: &Identity) -> String {
    let roles: Vec<&str> = identity.role_names().collect();
    let roles = if roles.is_empty() {
        "none".to_owned()
    } else {
        roles.join(", ")
    };
    format!(
        "Signed in as {} (#{}), roles: {roles}",
        identity.email, identity.id
    )
}

/// Renders the active filters.
pub fn filters(criteria: &FilterCriteria) -> String {
    let status = criteria.status.map(|s| s.to_string());
    let priority = criteria.priority.map(|p| p.to_string());
    format!(
        "Filters: status={}, priority={}",
        status.as_deref().unwrap_or("all"),
        priority.as_deref().unwrap_or("all")
    )
}

/// Renders a dismissible notification.
pub fn notice(notice: &Notice) -> String {
    format!("! {}", notice.message)
}

/// Renders the heading of a screen.
pub fn heading(route: Route) -> String {
    let title = match route {
        Route::Login => "Sign in",
        Route::AccessDenied => "Access denied",
        Route::Tasks => "Tasks",
        Route::MyTasks => "My tasks",
        Route::ViewTask(_) => "Task",
        Route::CreateTask => "Create task",
        Route::UpdateTask(_) => "Update task",
    };
    format!("== {title} ({route}) ==")
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
