//! Configuration for the reqwest client.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Default base URL of the task service.
pub const DEFAULT_BASE_URL: &str = "https://server.aptech.io";

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the task service HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ReqwestConfig {
    /// Base URL of the task service API
    #[cfg_attr(
        feature = "config",
        arg(long = "api-url", env = "TASKDESK_API_URL", default_value = DEFAULT_BASE_URL)
    )]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (0 uses the default)
    #[cfg_attr(
        feature = "config",
        arg(long = "api-timeout", env = "TASKDESK_API_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[cfg_attr(
        feature = "config",
        arg(long = "api-user-agent", env = "TASKDESK_API_USER_AGENT")
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for ReqwestConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

impl ReqwestConfig {
    /// Creates a configuration targeting `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the request timeout, rounded down to whole seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Returns the effective timeout, using the default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout_secs == 0 {
            DEFAULT_TIMEOUT
        } else {
            Duration::from_secs(self.timeout_secs)
        }
    }

    /// Returns the effective user agent, using the default if unset or empty.
    pub fn effective_user_agent(&self) -> String {
        match self.user_agent.as_deref().map(str::trim) {
            Some(user_agent) if !user_agent.is_empty() => user_agent.to_owned(),
            _ => format!("taskdesk/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Parses and checks the base URL.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(self.base_url.trim())?;
        if url.cannot_be_a_base() {
            return Err(Error::CannotBeABase(self.base_url.clone()));
        }
        Ok(url)
    }
}
