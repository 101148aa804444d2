//! Task provider implementation with bearer authentication.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use taskdesk_core::types::{IdentityId, NewTask, Task, TaskId, TaskPatch};
use taskdesk_core::{ErrorKind, SessionStore, TaskProvider};

use crate::client::{ReqwestClient, TRACING_TARGET};
use crate::error::{Error, Result};
use crate::wire::TaskRecord;

/// Task repository over HTTP, bound to a session store.
///
/// Every request carries `Authorization: Bearer <access_token>` from the
/// session. A `401 Unauthorized` answer expires the session when the rejected
/// token is still the current one.
#[derive(Debug, Clone)]
pub struct TaskClient {
    client: ReqwestClient,
    session: SessionStore,
}

impl TaskClient {
    /// Creates a task client sending requests through `client`.
    pub fn new(client: ReqwestClient, session: SessionStore) -> Self {
        Self { client, session }
    }

    /// Sends an authenticated request and decodes the JSON answer.
    async fn call<T, B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> taskdesk_core::Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let (request, token) = self.request(method, segments, body).map_err(repository_error)?;
        let result = self.client.send_json(request).await;
        self.check_rejection(&token, result).map_err(repository_error)
    }

    /// Sends an authenticated request whose answer carries no useful body.
    async fn call_empty(&self, method: Method, segments: &[&str]) -> taskdesk_core::Result<()> {
        let (request, token) = self
            .request::<()>(method, segments, None)
            .map_err(repository_error)?;
        let result = self.client.send_empty(request).await;
        self.check_rejection(&token, result).map_err(repository_error)
    }

    fn request<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<(RequestBuilder, String)>
    where
        B: Serialize + ?Sized,
    {
        let token = self.session.access_token().ok_or(Error::MissingCredential)?;
        let url = self.client.endpoint(segments)?;

        tracing::debug!(
            target: TRACING_TARGET,
            method = %method,
            path = url.path(),
            "Sending task request"
        );

        let mut request = self.client.http().request(method, url).bearer_auth(&token);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok((request, token))
    }

    fn check_rejection<T>(&self, token: &str, result: Result<T>) -> Result<T> {
        if let Err(Error::Status { status, message }) = &result
            && *status == StatusCode::UNAUTHORIZED
        {
            let reason = taskdesk_core::Error::unauthorized().with_message(
                message
                    .clone()
                    .unwrap_or_else(|| "Your session is no longer valid".to_owned()),
            );
            let expired = self.session.expire(token, reason);
            tracing::debug!(target: TRACING_TARGET, expired, "Access token rejected");
        }
        result
    }
}

/// Converts an adapter error into one of the repository failure kinds.
///
/// Undecodable bodies and unusable endpoint URLs mean the server could not be
/// talked to, so they surface as network errors with the cause kept.
fn repository_error(error: Error) -> taskdesk_core::Error {
    let converted = taskdesk_core::Error::from(error);
    if converted.kind.is_repository_failure() {
        return converted;
    }

    let message = match converted.kind {
        ErrorKind::Serialization => "Unexpected response from the server",
        _ => "The server address is not usable",
    };
    taskdesk_core::Error::network_error()
        .with_message(message)
        .with_source(converted)
}

fn into_tasks(records: Vec<TaskRecord>) -> taskdesk_core::Result<Vec<Task>> {
    records
        .into_iter()
        .map(|record| record.into_task().map_err(repository_error))
        .collect()
}

#[async_trait::async_trait]
impl TaskProvider for TaskClient {
    async fn list_tasks(&self) -> taskdesk_core::Result<Vec<Task>> {
        let records: Vec<TaskRecord> = self
            .call::<_, ()>(Method::GET, &["workspaces", "tasks"], None)
            .await?;
        into_tasks(records)
    }

    async fn list_tasks_by_assignee(
        &self,
        assignee: IdentityId,
    ) -> taskdesk_core::Result<Vec<Task>> {
        let assignee = assignee.to_string();
        let records: Vec<TaskRecord> = self
            .call::<_, ()>(
                Method::GET,
                &["workspaces", "tasks", "assignee", assignee.as_str()],
                None,
            )
            .await?;
        into_tasks(records)
    }

    async fn get_task(&self, id: TaskId) -> taskdesk_core::Result<Task> {
        let id = id.to_string();
        let record: TaskRecord = self
            .call::<_, ()>(Method::GET, &["workspaces", "tasks", id.as_str()], None)
            .await?;
        record.into_task().map_err(repository_error)
    }

    async fn create_task(&self, task: &NewTask) -> taskdesk_core::Result<Task> {
        let record: TaskRecord = self
            .call(Method::POST, &["workspaces", "tasks"], Some(task))
            .await?;
        record.into_task().map_err(repository_error)
    }

    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> taskdesk_core::Result<Task> {
        let id = id.to_string();
        let record: TaskRecord = self
            .call(Method::PATCH, &["workspaces", "tasks", id.as_str()], Some(patch))
            .await?;
        record.into_task().map_err(repository_error)
    }

    async fn delete_task(&self, id: TaskId) -> taskdesk_core::Result<()> {
        let id = id.to_string();
        self.call_empty(Method::DELETE, &["workspaces", "tasks", id.as_str()])
            .await
    }
}
