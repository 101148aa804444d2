//! Session persistence configuration.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde::{Deserialize, Serialize};
use taskdesk_core::SessionStorage;
use taskdesk_core::session::{FileStorage, MemoryStorage};

use crate::TRACING_TARGET_CONFIG;

/// Where the signed-in session is kept between runs.
///
/// # Environment Variables
///
/// - `TASKDESK_SESSION_DIR` - Directory holding the session file
///   (default: `$XDG_CONFIG_HOME/taskdesk`, then `$HOME/.config/taskdesk`)
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct SessionConfig {
    /// Directory holding the persisted session.
    #[arg(long, env = "TASKDESK_SESSION_DIR")]
    #[serde(default)]
    pub session_dir: Option<PathBuf>,

    /// Keep the session in memory only; nothing is written to disk.
    #[arg(long, env = "TASKDESK_EPHEMERAL", default_value_t = false)]
    #[serde(default)]
    pub ephemeral: bool,
}

impl SessionConfig {
    /// Returns the directory the session file lives in.
    pub fn effective_session_dir(&self) -> PathBuf {
        if let Some(dir) = &self.session_dir {
            return dir.clone();
        }

        std::env::var_os("XDG_CONFIG_HOME")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME")
                    .filter(|value| !value.is_empty())
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|base| base.join("taskdesk"))
            .unwrap_or_else(|| PathBuf::from(".taskdesk"))
    }

    /// Creates the session storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn create_storage(&self) -> anyhow::Result<Arc<dyn SessionStorage>> {
        if self.ephemeral {
            return Ok(Arc::new(MemoryStorage::new()));
        }

        let storage = FileStorage::new(self.effective_session_dir())?;
        Ok(Arc::new(storage))
    }

    /// Logs the session configuration.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            session_dir = %self.effective_session_dir().display(),
            ephemeral = self.ephemeral,
            "Session configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_directory_wins() {
        let config = SessionConfig {
            session_dir: Some(PathBuf::from("/tmp/taskdesk-test")),
            ephemeral: false,
        };
        assert_eq!(
            config.effective_session_dir(),
            PathBuf::from("/tmp/taskdesk-test")
        );
    }

    #[test]
    fn test_file_storage_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig {
            session_dir: Some(dir.path().join("nested")),
            ephemeral: false,
        };

        let storage = config.create_storage().unwrap();
        storage.write("session", "{}").unwrap();

        assert!(dir.path().join("nested").is_dir());
        assert_eq!(storage.read("session").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_ephemeral_storage_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig {
            session_dir: Some(dir.path().join("unused")),
            ephemeral: true,
        };

        let storage = config.create_storage().unwrap();
        storage.write("session", "{}").unwrap();

        assert!(!dir.path().join("unused").exists());
    }
}
