//! In-memory providers for testing.
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! taskdesk-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use taskdesk_core::auth::{AuthService, LoginResponse};
//! use taskdesk_core::mock::{MockAuthProvider, MockTaskProvider};
//!
//! let auth = MockAuthProvider::new().with_account("a@x.com", "p", response);
//! let auth = AuthService::new(auth);
//! let tasks = TaskService::new(MockTaskProvider::with_tasks(seed));
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::auth::{AuthProvider, LoginRequest, LoginResponse};
use crate::repository::TaskProvider;
use crate::types::{IdentityId, NewTask, Task, TaskId, TaskPatch};
use crate::{Error, Result};

/// Authenticates against a fixed set of accounts.
#[derive(Debug, Clone, Default)]
pub struct MockAuthProvider {
    accounts: HashMap<String, (String, LoginResponse)>,
    latency: Option<Duration>,
}

impl MockAuthProvider {
    /// Creates a provider that rejects every login.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `username`/`password` and answers with `response`.
    #[must_use]
    pub fn with_account(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        response: LoginResponse,
    ) -> Self {
        self.accounts
            .insert(username.into(), (password.into(), response));
        self
    }

    /// Delays every answer.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[async_trait::async_trait]
impl AuthProvider for MockAuthProvider {
    async fn authenticate(&self, request: &LoginRequest) -> Result<LoginResponse> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match self.accounts.get(&request.username) {
            Some((password, response)) if *password == request.password => Ok(response.clone()),
            _ => Err(Error::authentication().with_message("Invalid username or password")),
        }
    }
}

#[derive(Debug, Default)]
struct MockTaskState {
    tasks: Vec<Task>,
    calls: usize,
    failure: Option<Error>,
}

/// Keeps tasks in memory. Clones share the same tasks.
#[derive(Debug, Clone, Default)]
pub struct MockTaskProvider {
    state: Arc<Mutex<MockTaskState>>,
}

impl MockTaskProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider seeded with `tasks`.
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let provider = Self::new();
        provider.state.lock().tasks = tasks.into_iter().collect();
        provider
    }

    /// Fails the next call with `error`.
    pub fn fail_next(&self, error: Error) {
        self.state.lock().failure = Some(error);
    }

    /// Returns the number of calls received.
    pub fn calls(&self) -> usize {
        self.state.lock().calls
    }

    /// Returns a copy of the stored tasks.
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks.clone()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MockTaskState) -> Result<T>) -> Result<T> {
        let mut state = self.state.lock();
        state.calls += 1;
        if let Some(error) = state.failure.take() {
            return Err(error);
        }
        f(&mut state)
    }
}

fn not_found(id: TaskId) -> Error {
    Error::not_found().with_message(format!("Task {id} not found"))
}

#[async_trait::async_trait]
impl TaskProvider for MockTaskProvider {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.with_state(|state| Ok(state.tasks.clone()))
    }

    async fn list_tasks_by_assignee(&self, assignee: IdentityId) -> Result<Vec<Task>> {
        self.with_state(|state| {
            Ok(state
                .tasks
                .iter()
                .filter(|task| task.is_assigned_to(assignee))
                .cloned()
                .collect())
        })
    }

    async fn get_task(&self, id: TaskId) -> Result<Task> {
        self.with_state(|state| {
            state
                .tasks
                .iter()
                .find(|task| task.id == id)
                .cloned()
                .ok_or_else(|| not_found(id))
        })
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task> {
        self.with_state(|state| {
            let id = state.tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1;
            let created = Task {
                id,
                title: task.title.clone(),
                description: task.description.clone(),
                status: task.status,
                priority: task.priority,
                start_date: task.start_date,
                due_date: task.due_date,
                assignee_id: task.assignee_id,
            };
            state.tasks.push(created.clone());
            Ok(created)
        })
    }

    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        self.with_state(|state| {
            let task = state
                .tasks
                .iter_mut()
                .find(|task| task.id == id)
                .ok_or_else(|| not_found(id))?;
            patch.validate_against(task)?;
            patch.apply_to(task);
            Ok(task.clone())
        })
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.with_state(|state| {
            let position = state
                .tasks
                .iter()
                .position(|task| task.id == id)
                .ok_or_else(|| not_found(id))?;
            state.tasks.remove(position);
            Ok(())
        })
    }
}
