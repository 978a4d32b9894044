//! Todo data service.
//!
//! # Responsibility
//! - Own every read and write of the todo document.
//! - Enforce cascade delete and newest-first ordering.
//! - Log failures at the service boundary and return them to callers.
//!
//! # Invariants
//! - Each operation is one whole-document read, in-memory change and
//!   whole-document write, done while holding the writer lock.
//! - Unknown ids in delete/complete operations are no-ops and skip the write.
//! - `initialize` never overwrites an existing document; only `reset` does,
//!   after copying it to the backup key.

use crate::model::todo::{Priority, Project, SubTask, Task, TodoDocument};
use crate::repo::document_repo::DocumentRepository;
use crate::repo::{RepoError, RepoResult};
use crate::view::stats::TaskStats;
use log::{debug, error, info, warn};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

/// Use-case service over the persisted todo document.
///
/// Share one instance (for example behind `Arc`) between all callers of a
/// process; two instances over the same storage do not exclude each other.
pub struct TodoService<R: DocumentRepository> {
    repo: R,
    writer: Mutex<()>,
}

impl<R: DocumentRepository> TodoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            writer: Mutex::new(()),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Writes the empty document when none is stored yet.
    ///
    /// Safe to call on every app start.
    pub fn initialize(&self) -> RepoResult<()> {
        self.observe("store_init", || {
            let _guard = self.lock()?;
            if self.repo.load_document()?.is_some() {
                debug!("event=store_init module=service status=skip reason=present");
                return Ok(());
            }
            self.repo.save_document(&TodoDocument::default())?;
            info!("event=store_init module=service status=created");
            Ok(())
        })
    }

    /// Copies the stored document to the backup key and starts over empty.
    ///
    /// This is the way back from a document that no longer parses: every
    /// other operation keeps failing with `InvalidData` until it runs.
    pub fn reset(&self) -> RepoResult<()> {
        self.observe("store_reset", || {
            let _guard = self.lock()?;
            let backed_up = self.repo.back_up_document()?;
            self.repo.save_document(&TodoDocument::default())?;
            warn!("event=store_reset module=service status=ok backed_up={backed_up}");
            Ok(())
        })
    }

    /// Appends a project and returns it.
    pub fn create_project(&self, name: impl Into<String>) -> RepoResult<Project> {
        let project = Project::new(name);
        self.mutate("project_create", |document| {
            document.projects.push(project.clone());
            true
        })?;
        info!(
            "event=project_create module=service status=ok project_id={}",
            project.id
        );
        Ok(project)
    }

    /// Lists all projects, newest first.
    pub fn list_projects(&self) -> RepoResult<Vec<Project>> {
        self.read("project_list", TodoDocument::projects_newest_first)
    }

    pub fn get_project(&self, project_id: &str) -> RepoResult<Option<Project>> {
        self.read("project_get", |document| {
            document.find_project(project_id).cloned()
        })
    }

    /// Appends an incomplete task and returns it.
    ///
    /// `project_id` is stored as given; it is not checked against projects.
    pub fn create_task(
        &self,
        project_id: &str,
        title: impl Into<String>,
        priority: Priority,
        due_date: Option<String>,
    ) -> RepoResult<Task> {
        let task = Task::new(project_id, title, priority, due_date);
        self.mutate("task_create", |document| {
            document.tasks.push(task.clone());
            true
        })?;
        info!(
            "event=task_create module=service status=ok task_id={} project_id={} priority={}",
            task.id,
            task.project_id,
            task.priority.as_str()
        );
        Ok(task)
    }

    /// Lists the tasks of one project, newest first.
    pub fn list_tasks_by_project(&self, project_id: &str) -> RepoResult<Vec<Task>> {
        self.read("task_list", |document| document.tasks_for_project(project_id))
    }

    pub fn get_task(&self, task_id: &str) -> RepoResult<Option<Task>> {
        self.read("task_get", |document| document.find_task(task_id).cloned())
    }

    /// Deletes a task together with its subtasks.
    pub fn delete_task(&self, task_id: &str) -> RepoResult<()> {
        let changed = self.mutate("task_delete", |document| {
            document.remove_task_cascade(task_id)
        })?;
        info!("event=task_delete module=service status=ok task_id={task_id} changed={changed}");
        Ok(())
    }

    /// Sets the completed flag of a task to `completed`.
    pub fn set_task_completed(&self, task_id: &str, completed: bool) -> RepoResult<()> {
        let changed = self.mutate("task_complete", |document| {
            document.set_task_completed(task_id, completed)
        })?;
        debug!(
            "event=task_complete module=service status=ok task_id={task_id} completed={completed} changed={changed}"
        );
        Ok(())
    }

    /// Appends an incomplete subtask and returns it.
    pub fn create_subtask(&self, task_id: &str, title: impl Into<String>) -> RepoResult<SubTask> {
        let sub_task = SubTask::new(task_id, title);
        self.mutate("subtask_create", |document| {
            document.sub_tasks.push(sub_task.clone());
            true
        })?;
        info!(
            "event=subtask_create module=service status=ok subtask_id={} task_id={}",
            sub_task.id, sub_task.task_id
        );
        Ok(sub_task)
    }

    /// Lists the subtasks of one task, newest first.
    pub fn list_subtasks(&self, task_id: &str) -> RepoResult<Vec<SubTask>> {
        self.read("subtask_list", |document| document.subtasks_for_task(task_id))
    }

    /// Sets the completed flag of a subtask to `completed`.
    pub fn set_subtask_completed(&self, sub_task_id: &str, completed: bool) -> RepoResult<()> {
        let changed = self.mutate("subtask_complete", |document| {
            document.set_subtask_completed(sub_task_id, completed)
        })?;
        debug!(
            "event=subtask_complete module=service status=ok subtask_id={sub_task_id} completed={completed} changed={changed}"
        );
        Ok(())
    }

    /// Counts tasks across every project.
    pub fn task_stats(&self) -> RepoResult<TaskStats> {
        self.read("task_stats", |document| TaskStats::from_tasks(&document.tasks))
    }

    /// Counts the tasks of one project.
    pub fn project_stats(&self, project_id: &str) -> RepoResult<TaskStats> {
        self.read("project_stats", |document| {
            TaskStats::from_tasks(
                document
                    .tasks
                    .iter()
                    .filter(|task| task.project_id == project_id),
            )
        })
    }

    fn read<T>(&self, event: &'static str, f: impl FnOnce(&TodoDocument) -> T) -> RepoResult<T> {
        self.observe(event, || {
            let _guard = self.lock()?;
            let document = self.repo.load_document()?.unwrap_or_default();
            Ok(f(&document))
        })
    }

    /// Runs one read-modify-write cycle; `f` reports whether it changed anything.
    fn mutate(
        &self,
        event: &'static str,
        f: impl FnOnce(&mut TodoDocument) -> bool,
    ) -> RepoResult<bool> {
        self.observe(event, || {
            let _guard = self.lock()?;
            let mut document = self.repo.load_document()?.unwrap_or_default();
            let changed = f(&mut document);
            if changed {
                self.repo.save_document(&document)?;
            }
            Ok(changed)
        })
    }

    fn observe<T>(&self, event: &'static str, f: impl FnOnce() -> RepoResult<T>) -> RepoResult<T> {
        let started_at = Instant::now();
        let result = f();
        if let Err(err) = &result {
            error!(
                "event={} module=service status=error duration_ms={} error_code={} error={}",
                event,
                started_at.elapsed().as_millis(),
                err.code(),
                err
            );
        }
        result
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, ()>> {
        self.writer.lock().map_err(|_| RepoError::LockPoisoned)
    }
}
