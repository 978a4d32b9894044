//! Todo document repository.
//!
//! # Responsibility
//! - Load and save the whole `TodoDocument` under one storage key.
//!
//! # Invariants
//! - Writes always replace the full document.
//! - `load_document` returns `None` only when the key is absent.
//! - `back_up_document` copies the raw blob as stored, without parsing it.

use super::{load_json, save_json, RepoResult};
use crate::model::todo::TodoDocument;
use crate::storage::KeyValueStore;

/// Storage key holding the todo document.
pub const TODO_DOCUMENT_KEY: &str = "@mytodo_data";

/// Storage key receiving the raw document when the store is reset.
pub const TODO_DOCUMENT_BACKUP_KEY: &str = "@mytodo_data_backup";

/// Repository interface for whole-document persistence.
pub trait DocumentRepository {
    fn load_document(&self) -> RepoResult<Option<TodoDocument>>;
    fn save_document(&self, document: &TodoDocument) -> RepoResult<()>;
    /// Copies the stored blob, parseable or not, to the backup key.
    ///
    /// Returns `false` when there was nothing to copy.
    fn back_up_document(&self) -> RepoResult<bool>;
}

/// Document repository backed by any key-value store.
pub struct KvDocumentRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvDocumentRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> DocumentRepository for KvDocumentRepository<S> {
    fn load_document(&self) -> RepoResult<Option<TodoDocument>> {
        load_json(&self.store, TODO_DOCUMENT_KEY)
    }

    fn save_document(&self, document: &TodoDocument) -> RepoResult<()> {
        save_json(&self.store, TODO_DOCUMENT_KEY, document)
    }

    fn back_up_document(&self) -> RepoResult<bool> {
        let Some(raw) = self.store.get_item(TODO_DOCUMENT_KEY)? else {
            return Ok(false);
        };
        self.store.set_item(TODO_DOCUMENT_BACKUP_KEY, &raw)?;
        Ok(true)
    }
}
