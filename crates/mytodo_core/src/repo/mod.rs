//! Repository layer over key-value storage.
//!
//! # Responsibility
//! - Map whole JSON documents to and from their storage keys.
//! - Isolate serialization details from service orchestration.
//!
//! # Invariants
//! - Each repository reads and writes exactly one key.
//! - A present but unparseable blob is reported as `InvalidData`, never
//!   treated as absent.

use crate::storage::{KeyValueStore, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod document_repo;
pub mod profile_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for document persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Storage(StorageError),
    InvalidData {
        key: &'static str,
        source: serde_json::Error,
    },
    /// The service writer lock was poisoned by a panicking caller.
    LockPoisoned,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::InvalidData { key, source } => {
                write!(f, "invalid persisted data under `{key}`: {source}")
            }
            Self::LockPoisoned => write!(f, "document writer lock poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::InvalidData { source, .. } => Some(source),
            Self::LockPoisoned => None,
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl RepoError {
    /// Stable short code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Storage(_) => "storage_io_failed",
            Self::InvalidData { .. } => "invalid_data",
            Self::LockPoisoned => "lock_poisoned",
        }
    }
}

fn load_json<T, S>(store: &S, key: &'static str) -> RepoResult<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore,
{
    match store.get_item(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| RepoError::InvalidData { key, source }),
        None => Ok(None),
    }
}

fn save_json<T, S>(store: &S, key: &'static str, value: &T) -> RepoResult<()>
where
    T: Serialize,
    S: KeyValueStore,
{
    let raw =
        serde_json::to_string(value).map_err(|source| RepoError::InvalidData { key, source })?;
    store.set_item(key, &raw)?;
    Ok(())
}
