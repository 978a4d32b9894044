//! Todo document model.
//!
//! # Responsibility
//! - Define `Project`, `Task`, `SubTask` and the `TodoDocument` container.
//! - Provide in-memory queries and mutations over one loaded document.
//!
//! # Invariants
//! - `Task::project_id` and `SubTask::task_id` are foreign keys that are not
//!   checked on write.
//! - Removing a task removes its subtasks in the same mutation.
//! - Newest-first listings order by `created_at` descending; records with an
//!   equal timestamp keep reverse insertion order.

use super::{new_record_id, now_epoch_ms};
use serde::{Deserialize, Serialize};

pub type ProjectId = String;
pub type TaskId = String;
pub type SubTaskId = String;

/// Task priority.
///
/// Serialized as `Low | Normal | High`. Reads go through [`Priority::parse`],
/// so older UI spellings (`low | medium | normal | high`) load, and a label
/// nothing recognizes loads as `Normal` instead of failing the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Self::parse(&value).unwrap_or_default()
    }
}

impl Priority {
    /// Parses a priority label, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "normal" | "medium" => Some(Self::Normal),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Canonical label, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
        }
    }

    /// Display rank; lower sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Normal => 1,
            Self::Low => 2,
        }
    }
}

/// Top-level container for tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Older documents may omit it; those read as `0`.
    #[serde(default)]
    pub created_at: i64,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_record_id(),
            name: name.into(),
            created_at: now_epoch_ms(),
        }
    }
}

/// Actionable item inside one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    /// RFC 3339 timestamp string chosen by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub created_at: i64,
}

impl Task {
    /// Creates an incomplete task with a fresh id and timestamp.
    pub fn new(
        project_id: impl Into<ProjectId>,
        title: impl Into<String>,
        priority: Priority,
        due_date: Option<String>,
    ) -> Self {
        Self {
            id: new_record_id(),
            project_id: project_id.into(),
            title: title.into(),
            completed: false,
            priority,
            due_date,
            created_at: now_epoch_ms(),
        }
    }
}

/// Checklist step inside one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTask {
    pub id: SubTaskId,
    pub task_id: TaskId,
    pub title: String,
    pub completed: bool,
    pub created_at: i64,
}

impl SubTask {
    /// Creates an incomplete subtask with a fresh id and timestamp.
    pub fn new(task_id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: new_record_id(),
            task_id: task_id.into(),
            title: title.into(),
            completed: false,
            created_at: now_epoch_ms(),
        }
    }
}

/// The single persisted document holding every project, task and subtask.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoDocument {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub sub_tasks: Vec<SubTask>,
}

impl TodoDocument {
    pub fn projects_newest_first(&self) -> Vec<Project> {
        newest_first(self.projects.iter(), |project| project.created_at)
    }

    pub fn find_project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == project_id)
    }

    pub fn tasks_for_project(&self, project_id: &str) -> Vec<Task> {
        newest_first(
            self.tasks
                .iter()
                .filter(|task| task.project_id == project_id),
            |task| task.created_at,
        )
    }

    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn subtasks_for_task(&self, task_id: &str) -> Vec<SubTask> {
        newest_first(
            self.sub_tasks
                .iter()
                .filter(|sub_task| sub_task.task_id == task_id),
            |sub_task| sub_task.created_at,
        )
    }

    /// Removes one task and every subtask pointing at it.
    ///
    /// Returns `false` when nothing matched, so callers can skip the write.
    pub fn remove_task_cascade(&mut self, task_id: &str) -> bool {
        let tasks_before = self.tasks.len();
        let sub_tasks_before = self.sub_tasks.len();
        self.tasks.retain(|task| task.id != task_id);
        self.sub_tasks.retain(|sub_task| sub_task.task_id != task_id);
        self.tasks.len() != tasks_before || self.sub_tasks.len() != sub_tasks_before
    }

    /// Sets `completed` on the task with `task_id`.
    ///
    /// Returns `false` when the id is unknown.
    pub fn set_task_completed(&mut self, task_id: &str, completed: bool) -> bool {
        match self.tasks.iter_mut().find(|task| task.id == task_id) {
            Some(task) => {
                task.completed = completed;
                true
            }
            None => false,
        }
    }

    /// Sets `completed` on the subtask with `sub_task_id`.
    ///
    /// Returns `false` when the id is unknown.
    pub fn set_subtask_completed(&mut self, sub_task_id: &str, completed: bool) -> bool {
        match self
            .sub_tasks
            .iter_mut()
            .find(|sub_task| sub_task.id == sub_task_id)
        {
            Some(sub_task) => {
                sub_task.completed = completed;
                true
            }
            None => false,
        }
    }
}

fn newest_first<'a, T, I>(items: I, created_at: impl Fn(&T) -> i64) -> Vec<T>
where
    T: Clone + 'a,
    I: DoubleEndedIterator<Item = &'a T>,
{
    // Reverse first so the stable sort leaves later inserts ahead on ties.
    let mut sorted: Vec<T> = items.rev().cloned().collect();
    sorted.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    sorted
}

#[cfg(test)]
mod tests {
    use super::{Priority, Project, SubTask, Task, TodoDocument};

    fn task_at(id: &str, project_id: &str, created_at: i64) -> Task {
        let mut task = Task::new(project_id, id, Priority::Normal, None);
        task.id = id.to_string();
        task.created_at = created_at;
        task
    }

    #[test]
    fn priority_parse_accepts_ui_spellings() {
        assert_eq!(Priority::parse("medium"), Some(Priority::Normal));
        assert_eq!(Priority::parse(" HIGH "), Some(Priority::High));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn priority_reads_leniently_and_writes_canonically() {
        let read = |raw: &str| serde_json::from_str::<Priority>(raw).unwrap();
        assert_eq!(read(r#""Medium""#), Priority::Normal);
        assert_eq!(read(r#""HIGH""#), Priority::High);
        assert_eq!(read(r#""""#), Priority::Normal);
        assert_eq!(read(r#""urgent""#), Priority::Normal);
        assert_eq!(serde_json::to_string(&Priority::Low).unwrap(), r#""Low""#);
    }

    #[test]
    fn equal_timestamps_list_latest_insert_first() {
        let mut document = TodoDocument::default();
        document.tasks.push(task_at("a", "p", 10));
        document.tasks.push(task_at("b", "p", 10));
        document.tasks.push(task_at("c", "p", 5));

        let ids: Vec<_> = document
            .tasks_for_project("p")
            .into_iter()
            .map(|task| task.id)
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn remove_task_cascade_reports_unknown_ids() {
        let mut document = TodoDocument::default();
        document.tasks.push(task_at("t1", "p", 1));
        document.sub_tasks.push(SubTask::new("t1", "step"));

        assert!(!document.remove_task_cascade("missing"));
        assert!(document.remove_task_cascade("t1"));
        assert!(document.tasks.is_empty());
        assert!(document.sub_tasks.is_empty());
    }

    #[test]
    fn document_uses_camel_case_field_names() {
        let mut document = TodoDocument::default();
        document.projects.push(Project::new("Home"));
        let json = serde_json::to_value(&document).unwrap();
        assert!(json.get("subTasks").is_some());
        assert!(json["projects"][0].get("createdAt").is_some());
    }
}
