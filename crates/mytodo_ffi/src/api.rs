//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, screen-level functions to Dart via FRB.
//! - Validate user input (blank names and titles) before it reaches core.
//! - Own the single per-process service instance so every call shares one
//!   writer.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures come back as `ok=false` envelopes with a message, never as an
//!   empty list that looks like "no data".

use chrono::Local;
use log::{error, warn};
use mytodo_core::{
    core_version as core_version_inner, filter_by_title, init_logging as init_logging_inner,
    is_overdue, ping as ping_inner, sort_for_display, KvDocumentRepository, KvProfileRepository,
    Priority, Profile, ProfileService, Project, RepoError, SqliteKvStore, SubTask, Task,
    TaskStats, TodoService,
};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DB_FILE_NAME: &str = "mytodo.sqlite3";
const DB_PATH_ENV: &str = "MYTODO_DB_PATH";

static APP_CORE: OnceCell<AppCore> = OnceCell::new();
static DEFAULT_DB_PATH: OnceCell<PathBuf> = OnceCell::new();

type SharedStore = Arc<SqliteKvStore>;

struct AppCore {
    db_path: PathBuf,
    todos: TodoService<KvDocumentRepository<SharedStore>>,
    profile: ProfileService<KvProfileRepository<SharedStore>>,
}

impl AppCore {
    fn open(db_path: &Path) -> Result<Self, String> {
        let store = SqliteKvStore::open(db_path)
            .map(Arc::new)
            .map_err(|err| format!("store open failed: {err}"))?;
        let todos = TodoService::new(KvDocumentRepository::new(Arc::clone(&store)));
        match todos.initialize() {
            Ok(()) => {}
            // Stay open so `reset_store` can still reach the document.
            Err(err @ RepoError::InvalidData { .. }) => {
                warn!(
                    "event=store_open module=ffi status=degraded error_code={} error={err}",
                    err.code()
                );
            }
            Err(err) => return Err(format!("store initialize failed: {err}")),
        }
        Ok(Self {
            db_path: db_path.to_path_buf(),
            todos,
            profile: ProfileService::new(KvProfileRepository::new(store)),
        })
    }
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive); blank
///   picks the build default (`debug` in debug builds, `info` in release).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Opens the store at `db_path` and writes the empty document if needed.
///
/// Call once at app start, before any other data call. Without it the first
/// data call opens `$MYTODO_DB_PATH` or `<temp>/mytodo.sqlite3`.
///
/// # FFI contract
/// - Idempotent for the same path.
/// - Returns empty string on success and error message on failure,
///   including an attempt to switch to another path.
#[flutter_rust_bridge::frb(sync)]
pub fn init_store(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    match APP_CORE.get_or_try_init(|| AppCore::open(&requested)) {
        Ok(core) if core.db_path == requested => String::new(),
        Ok(core) => format!(
            "store already initialized at `{}`; refusing to switch to `{}`",
            core.db_path.display(),
            requested.display()
        ),
        Err(err) => err,
    }
}

/// Discards the todo document and starts over empty.
///
/// Offered by the UI when data calls keep failing because the stored
/// document no longer parses. The old blob is kept under a backup key.
#[flutter_rust_bridge::frb(sync)]
pub fn reset_store() -> ActionResponse {
    match with_core(|core| core.todos.reset().map_err(|err| err.to_string())) {
        Ok(()) => ActionResponse::success("Store reset.", None),
        Err(err) => ActionResponse::failure(format!("reset_store failed: {err}")),
    }
}

/// Project row for the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    pub id: String,
    pub name: String,
    pub created_at: i64,
}

/// Task row for the project screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub completed: bool,
    /// `Low | Normal | High`.
    pub priority: String,
    pub due_date: Option<String>,
    pub created_at: i64,
    /// Incomplete and due on an earlier local calendar day.
    pub overdue: bool,
}

/// Subtask row for the subtask screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTaskItem {
    pub id: String,
    pub task_id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: i64,
}

/// Completion numbers for stats cards and progress bars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsItem {
    pub total: u32,
    pub completed: u32,
    pub pending: u32,
    /// Rounded whole percent.
    pub completion_rate: u32,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Created record id, for create calls.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectListResponse {
    pub ok: bool,
    pub items: Vec<ProjectItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    /// Filtered by the search text and in display order.
    pub items: Vec<TaskItem>,
    /// Numbers over every task of the project, ignoring the search text.
    pub stats: StatsItem,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTaskListResponse {
    pub ok: bool,
    pub items: Vec<SubTaskItem>,
    pub stats: StatsItem,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResponse {
    pub ok: bool,
    /// `None` with `ok=true` means the task does not exist.
    pub item: Option<TaskItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsResponse {
    pub ok: bool,
    pub stats: StatsItem,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileItem {
    pub name: String,
    pub email: String,
    pub bio: String,
    /// `YYYY-MM-DD`.
    pub joined: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileResponse {
    pub ok: bool,
    pub profile: Option<ProfileItem>,
    pub message: String,
}

/// Creates a project.
///
/// # FFI contract
/// - Rejects names that are blank after trim.
/// - Returns the created project id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn create_project(name: String) -> ActionResponse {
    let name = name.trim();
    if name.is_empty() {
        return ActionResponse::failure("Please enter a project name.");
    }
    match with_core(|core| core.todos.create_project(name).map_err(|err| err.to_string())) {
        Ok(project) => ActionResponse::success("Project created.", Some(project.id)),
        Err(err) => ActionResponse::failure(format!("create_project failed: {err}")),
    }
}

/// Lists projects newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn list_projects() -> ProjectListResponse {
    match with_core(|core| core.todos.list_projects().map_err(|err| err.to_string())) {
        Ok(projects) => ProjectListResponse {
            ok: true,
            message: count_message(projects.len()),
            items: projects.into_iter().map(to_project_item).collect(),
        },
        Err(err) => ProjectListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("list_projects failed: {err}"),
        },
    }
}

/// Creates a task in a project.
///
/// Input semantics:
/// - `priority`: `low|medium|normal|high`, case-insensitive.
/// - `due_date`: optional RFC 3339 timestamp; blank counts as absent.
#[flutter_rust_bridge::frb(sync)]
pub fn create_task(
    project_id: String,
    title: String,
    priority: String,
    due_date: Option<String>,
) -> ActionResponse {
    let title = title.trim();
    if title.is_empty() {
        return ActionResponse::failure("Please enter a task title.");
    }
    let Some(priority) = Priority::parse(&priority) else {
        return ActionResponse::failure(format!("unknown priority `{}`", priority.trim()));
    };
    let due_date = due_date
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    match with_core(|core| {
        core.todos
            .create_task(project_id.as_str(), title, priority, due_date)
            .map_err(|err| err.to_string())
    }) {
        Ok(task) => ActionResponse::success("Task created.", Some(task.id)),
        Err(err) => ActionResponse::failure(format!("create_task failed: {err}")),
    }
}

/// Lists one project's tasks for display.
///
/// Tasks matching `search` (case-insensitive title substring) are returned
/// incomplete first, then by priority.
#[flutter_rust_bridge::frb(sync)]
pub fn list_tasks(project_id: String, search: Option<String>) -> TaskListResponse {
    let listed = with_core(|core| {
        core.todos
            .list_tasks_by_project(project_id.as_str())
            .map_err(|err| err.to_string())
    });
    let tasks = match listed {
        Ok(tasks) => tasks,
        Err(err) => {
            return TaskListResponse {
                ok: false,
                items: Vec::new(),
                stats: StatsItem::default(),
                message: format!("list_tasks failed: {err}"),
            };
        }
    };

    let stats = to_stats_item(TaskStats::from_tasks(&tasks));
    let mut visible = filter_by_title(tasks, search.as_deref().unwrap_or_default());
    sort_for_display(&mut visible);
    TaskListResponse {
        ok: true,
        message: count_message(visible.len()),
        items: visible.into_iter().map(to_task_item).collect(),
        stats,
    }
}

/// Deletes a task and its subtasks. Unknown ids succeed without effect.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_task(task_id: String) -> ActionResponse {
    match with_core(|core| {
        core.todos
            .delete_task(task_id.as_str())
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => ActionResponse::success("Task deleted.", None),
        Err(err) => ActionResponse::failure(format!("delete_task failed: {err}")),
    }
}

/// Sets a task's completed flag to `completed`.
#[flutter_rust_bridge::frb(sync)]
pub fn set_task_completed(task_id: String, completed: bool) -> ActionResponse {
    match with_core(|core| {
        core.todos
            .set_task_completed(task_id.as_str(), completed)
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => ActionResponse::success("Task updated.", None),
        Err(err) => ActionResponse::failure(format!("set_task_completed failed: {err}")),
    }
}

/// Fetches one task, for the subtask screen header.
#[flutter_rust_bridge::frb(sync)]
pub fn get_task(task_id: String) -> TaskResponse {
    match with_core(|core| {
        core.todos
            .get_task(task_id.as_str())
            .map_err(|err| err.to_string())
    }) {
        Ok(Some(task)) => TaskResponse {
            ok: true,
            item: Some(to_task_item(task)),
            message: "Task found.".to_string(),
        },
        Ok(None) => {
            warn!("event=task_get module=ffi status=not_found task_id={task_id}");
            TaskResponse {
                ok: true,
                item: None,
                message: "Task not found.".to_string(),
            }
        }
        Err(err) => TaskResponse {
            ok: false,
            item: None,
            message: format!("get_task failed: {err}"),
        },
    }
}

/// Creates a subtask under a task.
#[flutter_rust_bridge::frb(sync)]
pub fn create_subtask(task_id: String, title: String) -> ActionResponse {
    let title = title.trim();
    if title.is_empty() {
        return ActionResponse::failure("Please enter a subtask title.");
    }
    match with_core(|core| {
        core.todos
            .create_subtask(task_id.as_str(), title)
            .map_err(|err| err.to_string())
    }) {
        Ok(sub_task) => ActionResponse::success("Subtask created.", Some(sub_task.id)),
        Err(err) => ActionResponse::failure(format!("create_subtask failed: {err}")),
    }
}

/// Lists a task's subtasks newest first, with their completion numbers.
#[flutter_rust_bridge::frb(sync)]
pub fn list_subtasks(task_id: String) -> SubTaskListResponse {
    match with_core(|core| {
        core.todos
            .list_subtasks(task_id.as_str())
            .map_err(|err| err.to_string())
    }) {
        Ok(sub_tasks) => SubTaskListResponse {
            ok: true,
            stats: to_stats_item(TaskStats::from_subtasks(&sub_tasks)),
            message: count_message(sub_tasks.len()),
            items: sub_tasks.into_iter().map(to_subtask_item).collect(),
        },
        Err(err) => SubTaskListResponse {
            ok: false,
            items: Vec::new(),
            stats: StatsItem::default(),
            message: format!("list_subtasks failed: {err}"),
        },
    }
}

/// Sets a subtask's completed flag to `completed`.
#[flutter_rust_bridge::frb(sync)]
pub fn set_subtask_completed(sub_task_id: String, completed: bool) -> ActionResponse {
    match with_core(|core| {
        core.todos
            .set_subtask_completed(sub_task_id.as_str(), completed)
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => ActionResponse::success("Subtask updated.", None),
        Err(err) => ActionResponse::failure(format!("set_subtask_completed failed: {err}")),
    }
}

/// Completion numbers over every task in every project.
#[flutter_rust_bridge::frb(sync)]
pub fn task_stats() -> StatsResponse {
    match with_core(|core| core.todos.task_stats().map_err(|err| err.to_string())) {
        Ok(stats) => StatsResponse {
            ok: true,
            stats: to_stats_item(stats),
            message: String::new(),
        },
        Err(err) => StatsResponse {
            ok: false,
            stats: StatsItem::default(),
            message: format!("task_stats failed: {err}"),
        },
    }
}

/// Loads the profile; `joined` defaults to today when never saved.
#[flutter_rust_bridge::frb(sync)]
pub fn load_profile() -> ProfileResponse {
    match with_core(|core| core.profile.load_profile().map_err(|err| err.to_string())) {
        Ok(profile) => ProfileResponse {
            ok: true,
            profile: Some(to_profile_item(profile)),
            message: String::new(),
        },
        Err(err) => ProfileResponse {
            ok: false,
            profile: None,
            message: format!("load_profile failed: {err}"),
        },
    }
}

/// Saves profile edits.
///
/// # FFI contract
/// - Keeps the stored `joined` date (or today's, on first save).
/// - Validation failures return `ok=false` with a user-facing message.
#[flutter_rust_bridge::frb(sync)]
pub fn save_profile(name: String, email: String, bio: String) -> ActionResponse {
    let saved = with_core(|core| {
        let current = core
            .profile
            .load_profile()
            .map_err(|err| err.to_string())?;
        let bio = bio.trim();
        let profile = Profile {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            bio: (!bio.is_empty()).then(|| bio.to_string()),
            joined: current.joined,
        };
        core.profile
            .save_profile(&profile)
            .map_err(|err| err.to_string())
    });
    match saved {
        Ok(()) => ActionResponse::success("Profile saved.", None),
        Err(err) => ActionResponse::failure(format!("save_profile failed: {err}")),
    }
}

fn with_core<T>(f: impl FnOnce(&AppCore) -> Result<T, String>) -> Result<T, String> {
    let core = APP_CORE
        .get_or_try_init(|| AppCore::open(resolve_default_db_path()))
        .map_err(|err| {
            error!("event=store_open module=ffi status=error error={err}");
            err
        })?;
    f(core)
}

fn resolve_default_db_path() -> &'static Path {
    DEFAULT_DB_PATH.get_or_init(|| {
        if let Ok(raw) = std::env::var(DB_PATH_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }
        std::env::temp_dir().join(DB_FILE_NAME)
    })
}

fn count_message(count: usize) -> String {
    if count == 0 {
        "No items.".to_string()
    } else {
        format!("Found {count} item(s).")
    }
}

fn to_count(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn to_stats_item(stats: TaskStats) -> StatsItem {
    StatsItem {
        total: to_count(stats.total),
        completed: to_count(stats.completed),
        pending: to_count(stats.pending()),
        completion_rate: stats.completion_rate(),
    }
}

fn to_project_item(project: Project) -> ProjectItem {
    ProjectItem {
        id: project.id,
        name: project.name,
        created_at: project.created_at,
    }
}

fn to_task_item(task: Task) -> TaskItem {
    let overdue = is_overdue(&task, &Local::now());
    TaskItem {
        id: task.id,
        project_id: task.project_id,
        title: task.title,
        completed: task.completed,
        priority: task.priority.as_str().to_string(),
        due_date: task.due_date,
        created_at: task.created_at,
        overdue,
    }
}

fn to_subtask_item(sub_task: SubTask) -> SubTaskItem {
    SubTaskItem {
        id: sub_task.id,
        task_id: sub_task.task_id,
        title: sub_task.title,
        completed: sub_task.completed,
        created_at: sub_task.created_at,
    }
}

fn to_profile_item(profile: Profile) -> ProfileItem {
    ProfileItem {
        name: profile.name,
        email: profile.email,
        bio: profile.bio.unwrap_or_default(),
        joined: profile.joined.unwrap_or_default(),
    }
}
