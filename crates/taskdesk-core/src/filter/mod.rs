//! Shared filter criteria applied by every task list.
//!
//! [`FilterState`] is created once per process and injected into each view.
//! Writes replace the criteria wholesale; nothing is persisted.

use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_FILTER;
use crate::types::{Task, TaskPriority, TaskStatus};

/// Active status and priority constraints. `None` means unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Required status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Required priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
}

impl FilterCriteria {
    /// Creates unconstrained criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrains the status.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Constrains the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Builds criteria from raw select values.
    ///
    /// Values are matched case-insensitively against the fixed enumerations.
    /// Empty, `all` and unknown values leave the field unconstrained.
    pub fn parse(status: &str, priority: &str) -> Self {
        Self {
            status: parse_or_unset(status, "status"),
            priority: parse_or_unset(priority, "priority"),
        }
    }

    /// Returns true if neither field is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self.status.is_none() && self.priority.is_none()
    }

    /// Returns true if `task` satisfies every set constraint.
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|status| task.status == status)
            && self.priority.is_none_or(|priority| task.priority == priority)
    }
}

fn parse_or_unset<T: FromStr>(raw: &str, field: &'static str) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
        return None;
    }

    let parsed = raw.parse().ok();
    if parsed.is_none() {
        tracing::debug!(
            target: TRACING_TARGET_FILTER,
            field,
            value = raw,
            "Ignoring unknown filter value"
        );
    }
    parsed
}

/// Process-wide, shared filter criteria.
///
/// Clones observe the same criteria.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    criteria: Arc<RwLock<FilterCriteria>>,
}

impl FilterState {
    /// Creates a state with unconstrained criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the criteria. Fields not set in `criteria` become unconstrained.
    pub fn set_filters(&self, criteria: FilterCriteria) {
        *self.criteria.write() = criteria;

        tracing::debug!(
            target: TRACING_TARGET_FILTER,
            status = ?criteria.status,
            priority = ?criteria.priority,
            "Filters replaced"
        );
    }

    /// Returns the current criteria.
    pub fn filters(&self) -> FilterCriteria {
        *self.criteria.read()
    }

    /// Removes every constraint.
    pub fn reset(&self) {
        self.set_filters(FilterCriteria::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_filters_replaces() {
        let state = FilterState::new();

        state.set_filters(FilterCriteria::new().with_status(TaskStatus::Done));
        state.set_filters(FilterCriteria::new().with_priority(TaskPriority::High));

        assert_eq!(
            state.filters(),
            FilterCriteria {
                status: None,
                priority: Some(TaskPriority::High),
            }
        );
    }

    #[test]
    fn test_clones_share_criteria() {
        let state = FilterState::new();
        let other = state.clone();

        other.set_filters(FilterCriteria::new().with_status(TaskStatus::InProgress));
        assert_eq!(state.filters().status, Some(TaskStatus::InProgress));

        state.reset();
        assert!(other.filters().is_unconstrained());
    }

    #[test]
    fn test_parse_is_permissive() {
        let criteria = FilterCriteria::parse("DONE", "urgent");
        assert_eq!(criteria.status, Some(TaskStatus::Done));
        assert_eq!(criteria.priority, None);

        assert!(FilterCriteria::parse("", "all").is_unconstrained());
        assert_eq!(
            FilterCriteria::parse(" pending ", "Low"),
            FilterCriteria::new()
                .with_status(TaskStatus::ToDo)
                .with_priority(TaskPriority::Low)
        );
    }
}
