use mytodo_core::db::DbError;
use mytodo_core::{
    KeyValueStore, KvDocumentRepository, Priority, RepoError, SqliteKvStore, StorageError,
    StorageResult, TodoService, TODO_DOCUMENT_BACKUP_KEY, TODO_DOCUMENT_KEY,
};
use std::cell::Cell;

/// Store whose reads or writes fail on demand.
struct FlakyStore {
    inner: SqliteKvStore,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: SqliteKvStore::open_in_memory().unwrap(),
            fail_reads: Cell::new(false),
            fail_writes: Cell::new(false),
        }
    }
}

fn io_failure() -> StorageError {
    StorageError::Db(DbError::Sqlite(rusqlite::Error::InvalidQuery))
}

impl KeyValueStore for FlakyStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        if self.fail_reads.get() {
            return Err(io_failure());
        }
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes.get() {
            return Err(io_failure());
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.inner.remove_item(key)
    }
}

#[test]
fn read_failure_is_an_error_not_an_empty_list() {
    let service = TodoService::new(KvDocumentRepository::new(FlakyStore::new()));
    service.initialize().unwrap();
    service.create_project("Home").unwrap();

    service.repository().store().fail_reads.set(true);
    let err = service.list_projects().unwrap_err();
    assert!(matches!(err, RepoError::Storage(_)));
    assert_eq!(err.code(), "storage_io_failed");
    assert!(service.task_stats().is_err());
    assert!(service.get_task("any").is_err());

    service.repository().store().fail_reads.set(false);
    assert_eq!(service.list_projects().unwrap().len(), 1);
}

#[test]
fn write_failure_leaves_previous_document_in_place() {
    let service = TodoService::new(KvDocumentRepository::new(FlakyStore::new()));
    service.initialize().unwrap();
    let project = service.create_project("Home").unwrap();

    service.repository().store().fail_writes.set(true);
    let err = service
        .create_task(&project.id, "Lost", Priority::Normal, None)
        .unwrap_err();
    assert!(matches!(err, RepoError::Storage(_)));

    service.repository().store().fail_writes.set(false);
    assert!(service.list_tasks_by_project(&project.id).unwrap().is_empty());
}

#[test]
fn noop_mutations_do_not_touch_storage() {
    let service = TodoService::new(KvDocumentRepository::new(FlakyStore::new()));
    service.initialize().unwrap();

    service.repository().store().fail_writes.set(true);
    service.delete_task("missing").unwrap();
    service.set_task_completed("missing", true).unwrap();
    service.set_subtask_completed("missing", true).unwrap();
}

#[test]
fn corrupt_document_is_reported_and_never_overwritten() {
    let store = SqliteKvStore::open_in_memory().unwrap();
    store.set_item(TODO_DOCUMENT_KEY, "{not json").unwrap();
    let service = TodoService::new(KvDocumentRepository::new(store));

    let err = service.initialize().unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidData {
            key: TODO_DOCUMENT_KEY,
            ..
        }
    ));
    assert!(service.create_project("Home").is_err());

    let raw = service
        .repository()
        .store()
        .get_item(TODO_DOCUMENT_KEY)
        .unwrap();
    assert_eq!(raw.as_deref(), Some("{not json"));
}

#[test]
fn reset_recovers_a_corrupt_store_and_keeps_the_raw_blob() {
    let store = SqliteKvStore::open_in_memory().unwrap();
    store.set_item(TODO_DOCUMENT_KEY, "{not json").unwrap();
    let service = TodoService::new(KvDocumentRepository::new(store));
    assert!(service.initialize().is_err());
    assert!(service.list_projects().is_err());

    service.reset().unwrap();

    service.initialize().unwrap();
    let project = service.create_project("Home").unwrap();
    assert_eq!(service.list_projects().unwrap(), vec![project]);

    let backup = service
        .repository()
        .store()
        .get_item(TODO_DOCUMENT_BACKUP_KEY)
        .unwrap();
    assert_eq!(backup.as_deref(), Some("{not json"));
}

#[test]
fn reset_on_an_empty_store_writes_the_empty_document() {
    let service = TodoService::new(KvDocumentRepository::new(
        SqliteKvStore::open_in_memory().unwrap(),
    ));

    service.reset().unwrap();

    assert!(service.list_projects().unwrap().is_empty());
    let store = service.repository().store();
    assert!(store.get_item(TODO_DOCUMENT_KEY).unwrap().is_some());
    assert!(store.get_item(TODO_DOCUMENT_BACKUP_KEY).unwrap().is_none());
}
