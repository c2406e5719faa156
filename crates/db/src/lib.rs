//! Persisted session storage.
//!
//! Holds the single externally-owned record that survives a restart: the
//! identity of the signed-in user.

use std::path::{Path, PathBuf};

use libris_kernel::settings::{SessionBackend, SessionSettings};
use libris_kernel::CoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of the signed-in user as written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to access session file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed session document: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StorageError> for CoreError {
    fn from(error: StorageError) -> Self {
        CoreError::storage(error.to_string())
    }
}

/// Backend that restores, saves, and clears the current session.
pub trait SessionStorage: Send {
    fn load(&self) -> Result<Option<StoredSession>, StorageError>;
    fn save(&mut self, session: &StoredSession) -> Result<(), StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// Process-lifetime storage; nothing survives a restart.
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStorage {
    session: Option<StoredSession>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: StoredSession) -> Self {
        Self {
            session: Some(session),
        }
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        Ok(self.session.clone())
    }

    fn save(&mut self, session: &StoredSession) -> Result<(), StorageError> {
        self.session = Some(session.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.session = None;
        Ok(())
    }
}

/// Stores the session as a JSON document at a fixed path.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let session = serde_json::from_str(&raw)?;
        Ok(Some(session))
    }

    fn save(&mut self, session: &StoredSession) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let document = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, document).map_err(|e| self.io_error(e))?;

        tracing::debug!(target: "libris-db", path = %self.path.display(), "session saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(
                    target: "libris-db",
                    path = %self.path.display(),
                    "session cleared"
                );
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Build the storage backend selected by configuration.
pub fn from_settings(settings: &SessionSettings) -> Box<dyn SessionStorage> {
    match settings.backend {
        SessionBackend::Memory => Box::new(MemorySessionStorage::new()),
        SessionBackend::File => Box::new(FileSessionStorage::new(settings.path.clone())),
    }
}
