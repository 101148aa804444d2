#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod commands;
mod config;
mod render;
mod screen;
mod shell;
mod telemetry;

use std::process;

use anyhow::Context;

use crate::commands::Command;
use crate::config::Cli;
use crate::screen::Screen;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "taskdesk_cli::startup";
pub const TRACING_TARGET_CONFIG: &str = "taskdesk_cli::config";
pub const TRACING_TARGET_SCREEN: &str = "taskdesk_cli::screen";
pub const TRACING_TARGET_SHELL: &str = "taskdesk_cli::shell";

/// Exit code of a command that ran but failed.
const EXIT_FAILED: i32 = 1;

/// Exit code of a configuration or startup error.
const EXIT_ERROR: i32 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let code = match run().await {
        Ok(code) => code,
        Err(error) => {
            if tracing::enabled!(tracing::Level::ERROR) {
                tracing::error!(
                    target: TRACING_TARGET_STARTUP,
                    error = %error,
                    "taskdesk terminated with error"
                );
            }
            eprintln!("Error: {error:#}");
            EXIT_ERROR
        }
    };

    process::exit(code);
}

/// Main application entry point; returns the process exit code.
async fn run() -> anyhow::Result<i32> {
    let cli = Cli::init();

    telemetry::init_tracing()?;
    cli.log();

    let context = cli
        .create_context()
        .context("failed to start the client")?;
    let mut screen = Screen::new(context);

    match cli.command.clone() {
        None | Some(Command::Shell) => {
            shell::run(&mut screen).await?;
            Ok(0)
        }
        Some(command) => {
            let outcome = screen.run(command).await;
            println!("{}", outcome.text);
            Ok(if outcome.failed { EXIT_FAILED } else { 0 })
        }
    }
}
