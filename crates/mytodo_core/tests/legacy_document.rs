use mytodo_core::{
    KeyValueStore, KvDocumentRepository, Priority, SqliteKvStore, TodoService, TODO_DOCUMENT_KEY,
};

const LEGACY_DOCUMENT: &str = r#"{
  "projects": [
    {"id": "1700000000000", "name": "Old"},
    {"id": "1700000005000", "name": "Newer", "createdAt": 1700000005000}
  ],
  "tasks": [
    {"id": "1700000001000", "projectId": "1700000000000", "title": "a",
     "completed": false, "priority": "medium", "createdAt": 1700000001000},
    {"id": "1700000002000", "projectId": "1700000000000", "title": "b",
     "completed": true, "priority": "High",
     "dueDate": "2023-11-20T10:00:00.000Z", "createdAt": 1700000002000}
  ],
  "subTasks": [
    {"id": "1700000003000", "taskId": "1700000001000", "title": "s",
     "completed": false, "createdAt": 1700000003000}
  ]
}"#;

fn service_with(raw: &str) -> TodoService<KvDocumentRepository<SqliteKvStore>> {
    let store = SqliteKvStore::open_in_memory().unwrap();
    store.set_item(TODO_DOCUMENT_KEY, raw).unwrap();
    let service = TodoService::new(KvDocumentRepository::new(store));
    service.initialize().unwrap();
    service
}

#[test]
fn documents_from_earlier_builds_load() {
    let service = service_with(LEGACY_DOCUMENT);

    let projects = service.list_projects().unwrap();
    assert_eq!(projects[0].name, "Newer");
    assert_eq!(projects[1].name, "Old");
    assert_eq!(projects[1].created_at, 0);

    let tasks = service.list_tasks_by_project("1700000000000").unwrap();
    assert_eq!(tasks[0].priority, Priority::High);
    assert_eq!(tasks[1].priority, Priority::Normal);
    assert_eq!(tasks[1].due_date, None);

    assert_eq!(service.list_subtasks("1700000001000").unwrap().len(), 1);
}

#[test]
fn timestamp_ids_still_resolve_for_mutations() {
    let service = service_with(LEGACY_DOCUMENT);

    service.set_task_completed("1700000001000", true).unwrap();
    assert_eq!(service.task_stats().unwrap().completed, 2);

    service.delete_task("1700000001000").unwrap();
    assert!(service.list_subtasks("1700000001000").unwrap().is_empty());
}

#[test]
fn missing_arrays_read_as_empty() {
    let service = service_with(r#"{"projects": []}"#);

    assert!(service.list_tasks_by_project("any").unwrap().is_empty());
    let task = service
        .create_task("p", "first", Priority::Low, None)
        .unwrap();
    assert_eq!(service.get_task(&task.id).unwrap(), Some(task));
}

#[test]
fn rewritten_documents_use_canonical_priorities() {
    let service = service_with(LEGACY_DOCUMENT);
    service.set_task_completed("1700000001000", true).unwrap();

    let raw = service
        .repository()
        .store()
        .get_item(TODO_DOCUMENT_KEY)
        .unwrap()
        .unwrap();
    assert!(raw.contains(r#""priority":"Normal""#));
    assert!(!raw.contains("medium"));
}

#[test]
fn unexpected_priority_labels_load_as_normal() {
    let service = service_with(
        r#"{"projects": [{"id": "p", "name": "Home", "createdAt": 1}],
            "tasks": [
              {"id": "t1", "projectId": "p", "title": "a", "completed": false,
               "priority": "Medium", "createdAt": 2},
              {"id": "t2", "projectId": "p", "title": "b", "completed": false,
               "priority": "", "createdAt": 3},
              {"id": "t3", "projectId": "p", "title": "c", "completed": false,
               "priority": "HIGH", "createdAt": 4}
            ]}"#,
    );

    let priorities: Vec<_> = service
        .list_tasks_by_project("p")
        .unwrap()
        .into_iter()
        .map(|task| task.priority)
        .collect();
    assert_eq!(
        priorities,
        vec![Priority::High, Priority::Normal, Priority::Normal]
    );

    let task = service
        .create_task("p", "d", Priority::Low, None)
        .unwrap();
    assert_eq!(service.get_task(&task.id).unwrap(), Some(task));
}
