//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── api: ReqwestConfig         # Task service URL, timeout, user agent
//! ├── session: SessionConfig     # Where the signed-in session is kept
//! └── command: Option<Command>   # Screen to open (default: interactive shell)
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//!
//! # Example
//!
//! ```bash
//! taskdesk --api-url http://localhost:9000 login someone@example.com -p secret
//! TASKDESK_API_URL=http://localhost:9000 taskdesk tasks --status done
//! ```

mod session;

use std::process;

use anyhow::Context;
use clap::Parser;
pub use session::SessionConfig;
use taskdesk_core::{AppContext, FilterState, SessionStore};
use taskdesk_reqwest::{ReqwestClient, ReqwestConfig};

use crate::TRACING_TARGET_CONFIG;
use crate::commands::Command;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "taskdesk")]
#[command(about = "Terminal client for the taskdesk task service")]
#[command(version)]
pub struct Cli {
    /// Task service connection.
    #[clap(flatten)]
    pub api: ReqwestConfig,

    /// Session persistence.
    #[clap(flatten)]
    pub session: SessionConfig,

    /// Screen to open; starts the interactive shell when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments so its values act
    /// as defaults for the `env` backed options.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Builds the application context and restores any persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or the session storage cannot be
    /// created.
    pub fn create_context(&self) -> anyhow::Result<AppContext> {
        let client = ReqwestClient::new(self.api.clone()).context("invalid API configuration")?;
        let storage = self
            .session
            .create_storage()
            .context("failed to open session storage")?;

        let session = SessionStore::new(client.auth_service(), storage);
        let tasks = client.task_service(session.clone());
        let context = AppContext::new(session, FilterState::new(), tasks);

        if let Some(identity) = context.session().rehydrate() {
            tracing::debug!(
                target: TRACING_TARGET_CONFIG,
                identity_id = identity.id,
                "Restored previous session"
            );
        }

        Ok(context)
    }

    /// Logs configuration at debug level (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.session.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            base_url = %self.api.base_url,
            timeout_ms = self.api.effective_timeout().as_millis(),
            user_agent = %self.api.effective_user_agent(),
            "API configuration"
        );
    }

    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_options_and_command() {
        let cli = Cli::try_parse_from([
            "taskdesk",
            "--api-url",
            "http://localhost:9000",
            "--ephemeral",
            "mine",
            "--status",
            "done",
        ])
        .unwrap();

        assert_eq!(cli.api.base_url, "http://localhost:9000");
        assert!(cli.session.ephemeral);
        assert!(matches!(cli.command, Some(Command::Mine(_))));
    }

    #[test]
    fn test_no_command_means_shell() {
        let cli = Cli::try_parse_from(["taskdesk", "--ephemeral"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_create_context_with_ephemeral_session() {
        let cli = Cli::try_parse_from(["taskdesk", "--ephemeral"]).unwrap();
        let context = cli.create_context().unwrap();
        assert!(context.identity().is_none());
    }
}
