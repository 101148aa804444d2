//! Derivation of the visible task subset.

use crate::filter::FilterCriteria;
use crate::types::Task;

/// Returns the tasks matching `criteria`, in their original order.
///
/// Unset criteria match every task, so unconstrained criteria return the
/// whole collection.
pub fn visible<'a>(tasks: &'a [Task], criteria: &FilterCriteria) -> Vec<&'a Task> {
    tasks.iter().filter(|task| criteria.matches(task)).collect()
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use proptest::prelude::*;

    use super::*;
    use crate::types::{TaskId, TaskPriority, TaskStatus};

    fn task(id: TaskId, status: TaskStatus, priority: TaskPriority) -> Task {
        Task {
            id,
            title: format!("Task {id}"),
            description: None,
            status,
            priority,
            start_date: date(2025, 1, 1),
            due_date: None,
            assignee_id: None,
        }
    }

    fn ids(tasks: &[&Task]) -> Vec<TaskId> {
        tasks.iter().map(|task| task.id).collect()
    }

    #[test]
    fn test_status_filter_keeps_order() {
        let tasks = [
            task(1, TaskStatus::Done, TaskPriority::Low),
            task(2, TaskStatus::ToDo, TaskPriority::High),
            task(3, TaskStatus::Done, TaskPriority::High),
            task(4, TaskStatus::InProgress, TaskPriority::Medium),
        ];

        let done = visible(&tasks, &FilterCriteria::new().with_status(TaskStatus::Done));
        assert_eq!(ids(&done), [1, 3]);

        let everything = visible(&tasks, &FilterCriteria::new());
        assert_eq!(ids(&everything), [1, 2, 3, 4]);
    }

    #[test]
    fn test_both_criteria_must_match() {
        let tasks = [
            task(1, TaskStatus::Done, TaskPriority::Low),
            task(2, TaskStatus::Done, TaskPriority::High),
            task(3, TaskStatus::ToDo, TaskPriority::High),
        ];
        let criteria = FilterCriteria::parse("done", "HIGH");

        assert_eq!(ids(&visible(&tasks, &criteria)), [2]);
    }

    #[test]
    fn test_empty_collection() {
        let criteria = FilterCriteria::new().with_priority(TaskPriority::Low);
        assert!(visible(&[], &criteria).is_empty());
    }

    fn status() -> impl Strategy<Value = TaskStatus> {
        prop_oneof![
            Just(TaskStatus::ToDo),
            Just(TaskStatus::InProgress),
            Just(TaskStatus::Done),
        ]
    }

    fn priority() -> impl Strategy<Value = TaskPriority> {
        prop_oneof![
            Just(TaskPriority::Low),
            Just(TaskPriority::Medium),
            Just(TaskPriority::High),
        ]
    }

    fn tasks() -> impl Strategy<Value = Vec<Task>> {
        proptest::collection::vec((status(), priority()), 0..32).prop_map(|fields| {
            fields
                .into_iter()
                .zip(1..)
                .map(|((status, priority), id)| task(id, status, priority))
                .collect()
        })
    }

    fn criteria() -> impl Strategy<Value = FilterCriteria> {
        (proptest::option::of(status()), proptest::option::of(priority()))
            .prop_map(|(status, priority)| FilterCriteria { status, priority })
    }

    proptest! {
        #[test]
        fn test_visible_is_ordered_matching_subset(tasks in tasks(), criteria in criteria()) {
            let shown = ids(&visible(&tasks, &criteria));
            let expected: Vec<TaskId> = tasks
                .iter()
                .filter(|task| {
                    criteria.status.is_none_or(|status| task.status == status)
                        && criteria.priority.is_none_or(|priority| task.priority == priority)
                })
                .map(|task| task.id)
                .collect();

            prop_assert_eq!(shown, expected);
        }

        #[test]
        fn test_visible_is_deterministic(tasks in tasks(), criteria in criteria()) {
            prop_assert_eq!(visible(&tasks, &criteria), visible(&tasks, &criteria));
        }

        #[test]
        fn test_unconstrained_returns_all(tasks in tasks()) {
            let shown = visible(&tasks, &FilterCriteria::new());
            prop_assert_eq!(shown.len(), tasks.len());
            prop_assert!(shown.iter().zip(&tasks).all(|(shown, task)| std::ptr::eq(*shown, task)));
        }
    }
}
