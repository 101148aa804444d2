//! Durable client storage for the persisted session.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::{Error, ErrorKind, Result, TRACING_TARGET_SESSION};

/// Key/value storage that survives process restarts.
///
/// Every method completes synchronously. The session store calls `write` and
/// `remove` while holding its state lock, so implementations must not call
/// back into the store.
pub trait SessionStorage: Send + Sync {
    /// Reads the entry stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the entry stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the entry stored under `key`. Removing a missing entry succeeds.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Stores each entry as `<directory>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    /// Creates a storage rooted at `directory`, creating it if needed.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|error| {
            Error::from_source(ErrorKind::Storage, error).with_message(format!(
                "Failed to create session directory {}",
                directory.display()
            ))
        })?;

        tracing::debug!(
            target: TRACING_TARGET_SESSION,
            directory = %directory.display(),
            "Session storage ready"
        );

        Ok(Self { directory })
    }

    /// Returns the path of the file holding `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }
}

impl SessionStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.entry_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.entry_path(key);
        let staging = self.directory.join(format!(".{key}.json.tmp"));

        let mut file = open_private(&staging)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&staging, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

/// Creates or truncates `path`, readable and writable by the owner only.
///
/// The entry holds bearer tokens.
fn open_private(path: &Path) -> io::Result<fs::File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let file = options.open(path)?;

    // `mode` only applies on creation; a stale staging file keeps its old bits.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    Ok(file)
}

/// In-process storage; entries are lost when the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage holding a single entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.entries.lock().insert(key.into(), value.into());
        storage
    }

    /// Returns a copy of the entry stored under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

impl<S> SessionStorage for std::sync::Arc<S>
where
    S: SessionStorage + ?Sized,
{
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
