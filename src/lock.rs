//! Persisted panic lock.
//!
//! The lock is a single boolean stored as `{"locked": true}`. Reads fail open:
//! an unreadable or corrupt store is treated as unlocked so a damaged file can
//! never lock the operator out for good. Writes are best-effort and only
//! logged on failure.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the lock store. Callers normally go through the fail-open
/// [`LockStore::load`] / [`LockStore::save`] wrappers instead.
#[derive(Debug, Error, Diagnostic)]
pub enum LockError {
    #[error("failed to read lock file: {path}")]
    #[diagnostic(
        code(gideon::lock::read),
        help("Check that the state directory is readable. The system is treated as unlocked.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write lock file: {path}")]
    #[diagnostic(
        code(gideon::lock::write),
        help("Check that the state directory exists and is writable.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt lock file {path}: {message}")]
    #[diagnostic(
        code(gideon::lock::corrupt),
        help("The file must contain {{\"locked\": true}} or {{\"locked\": false}}. Delete it to reset.")
    )]
    Corrupt { path: String, message: String },
}

pub type LockResult<T> = std::result::Result<T, LockError>;

/// The persisted lock flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockState {
    #[serde(default)]
    pub locked: bool,
}

impl LockState {
    pub const LOCKED: Self = Self { locked: true };
    pub const UNLOCKED: Self = Self { locked: false };
}

/// Backing store for the lock flag.
pub trait LockStore {
    /// Read the stored state.
    fn try_load(&self) -> LockResult<LockState>;

    /// Replace the stored state.
    fn try_save(&self, state: LockState) -> LockResult<()>;

    /// Read the state, treating any failure as unlocked.
    fn load(&self) -> LockState {
        match self.try_load() {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(error = %e, "lock store unreadable, treating as unlocked");
                LockState::UNLOCKED
            }
        }
    }

    /// Write the state, ignoring failures.
    fn save(&self, state: LockState) {
        if let Err(e) = self.try_save(state) {
            tracing::warn!(error = %e, locked = state.locked, "failed to persist lock state");
        }
    }
}

/// JSON file store. Writes go to a sibling temp file that is renamed over the
/// target, so readers see either the old or the new state.
#[derive(Debug, Clone)]
pub struct FileLockStore {
    path: PathBuf,
}

impl FileLockStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }
}

impl LockStore for FileLockStore {
    fn try_load(&self) -> LockResult<LockState> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(LockState::UNLOCKED),
            Err(source) => {
                return Err(LockError::Read {
                    path: self.display(),
                    source,
                });
            }
        };
        serde_json::from_str(&content).map_err(|e| LockError::Corrupt {
            path: self.display(),
            message: e.to_string(),
        })
    }

    fn try_save(&self, state: LockState) -> LockResult<()> {
        let write_err = |source| LockError::Write {
            path: self.display(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string(&state).map_err(|e| LockError::Corrupt {
            path: self.display(),
            message: e.to_string(),
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, json).map_err(write_err)?;
        std::fs::rename(&tmp, &self.path).map_err(write_err)?;

        tracing::debug!(path = %self.display(), locked = state.locked, "lock state persisted");
        Ok(())
    }
}

/// In-process store, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryLockStore {
    locked: AtomicBool,
}

impl MemoryLockStore {
    pub fn new(state: LockState) -> Self {
        Self {
            locked: AtomicBool::new(state.locked),
        }
    }
}

impl LockStore for MemoryLockStore {
    fn try_load(&self) -> LockResult<LockState> {
        Ok(LockState {
            locked: self.locked.load(Ordering::SeqCst),
        })
    }

    fn try_save(&self, state: LockState) -> LockResult<()> {
        self.locked.store(state.locked, Ordering::SeqCst);
        Ok(())
    }
}
