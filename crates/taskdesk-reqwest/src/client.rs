//! Reqwest-based HTTP client for the task service.

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use taskdesk_core::{AuthService, SessionStore, TaskService};
use url::Url;

use crate::config::ReqwestConfig;
use crate::error::{Error, Result};
use crate::tasks::TaskClient;
use crate::wire::{Envelope, error_message};

/// Tracing target for reqwest client operations.
pub const TRACING_TARGET: &str = "taskdesk_reqwest::client";

/// Inner client that holds the HTTP client and configuration.
struct ReqwestClientInner {
    http: Client,
    base_url: Url,
    config: ReqwestConfig,
}

/// Reqwest-based HTTP client for the remote task service.
///
/// Implements [`AuthProvider`](taskdesk_core::AuthProvider) directly; task
/// calls go through a [`TaskClient`] bound to a session store, which attaches
/// the bearer token.
///
/// # Examples
///
/// ```rust,ignore
/// use taskdesk_reqwest::{ReqwestClient, ReqwestConfig};
///
/// let client = ReqwestClient::new(ReqwestConfig::default())?;
/// let session = SessionStore::new(client.auth_service(), storage);
/// let tasks = client.task_service(session.clone());
/// ```
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be created.
    pub fn new(config: ReqwestConfig) -> Result<Self> {
        let base_url = config.parsed_base_url()?;
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %base_url,
            timeout_ms = timeout.as_millis(),
            "Creating reqwest client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()?;

        let inner = ReqwestClientInner {
            http,
            base_url,
            config,
        };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Gets the parsed base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Converts this client into an [`AuthService`] for the session store.
    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.clone())
    }

    /// Binds this client to `session` for authenticated task calls.
    pub fn task_client(&self, session: SessionStore) -> TaskClient {
        TaskClient::new(self.clone(), session)
    }

    /// Converts this client into a [`TaskService`] bound to `session`.
    pub fn task_service(&self, session: SessionStore) -> TaskService {
        TaskService::new(self.task_client(session))
    }

    /// Builds the URL of an endpoint below the base URL.
    pub fn endpoint<I>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::CannotBeABase(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Gets the underlying HTTP client.
    pub(crate) fn http(&self) -> &Client {
        &self.inner.http
    }

    /// Sends `request` and decodes a JSON body, bare or wrapped in `data`.
    pub(crate) async fn send_json<T>(&self, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = check_status(request.send().await?).await?;
        let body = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&body)?;
        Ok(envelope.into_inner())
    }

    /// Sends `request` and discards the body.
    pub(crate) async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        check_status(request.send().await?).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);

    tracing::debug!(
        target: TRACING_TARGET,
        status = status.as_u16(),
        message = message.as_deref().unwrap_or_default(),
        "Server returned an error status"
    );

    Err(Error::Status { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ReqwestClient::new(ReqwestConfig::default()).unwrap();
        assert_eq!(client.base_url().as_str(), "https://server.aptech.io/");
        assert!(client.config().user_agent.is_none());
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let client = ReqwestClient::new(ReqwestConfig::new("http://localhost:8080/api/")).unwrap();

        let url = client.endpoint(["workspaces", "tasks", "7"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/workspaces/tasks/7");

        let root = ReqwestClient::new(ReqwestConfig::new("http://localhost:8080")).unwrap();
        let url = root.endpoint(["auth", "login"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/auth/login");
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let client = ReqwestClient::new(ReqwestConfig::default()).unwrap();
        let url = client.endpoint(["workspaces", "a/b"]).unwrap();
        assert_eq!(url.path(), "/workspaces/a%2Fb");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(ReqwestClient::new(ReqwestConfig::new("::nope")).is_err());
    }
}
