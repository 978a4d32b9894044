//! Task list projections for the project screen.
//!
//! # Invariants
//! - Display order: incomplete before completed, then High, Normal, Low.
//! - Title search is a case-insensitive substring match.

use crate::model::todo::Task;
use chrono::{DateTime, Days, TimeZone};

/// Calendar position of a task's due date relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Overdue,
    Today,
    Tomorrow,
    Upcoming,
}

/// Keeps tasks whose title contains `query`, ignoring case.
///
/// The query is used as typed, surrounding spaces included. An empty query
/// keeps every task.
pub fn filter_by_title(tasks: Vec<Task>, query: &str) -> Vec<Task> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return tasks;
    }
    tasks
        .into_iter()
        .filter(|task| task.title.to_lowercase().contains(&needle))
        .collect()
}

/// Sorts tasks into display order. Stable for equal keys.
pub fn sort_for_display(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| (task.completed, task.priority.rank()));
}

/// Classifies an RFC 3339 due date against `now`, in `now`'s time zone.
///
/// Returns `None` for strings that do not parse.
pub fn due_status<Tz: TimeZone>(due_date: &str, now: &DateTime<Tz>) -> Option<DueStatus> {
    let due = DateTime::parse_from_rfc3339(due_date.trim()).ok()?;
    let due_day = due.with_timezone(&now.timezone()).date_naive();
    let today = now.date_naive();

    if due_day < today {
        Some(DueStatus::Overdue)
    } else if due_day == today {
        Some(DueStatus::Today)
    } else if today.checked_add_days(Days::new(1)) == Some(due_day) {
        Some(DueStatus::Tomorrow)
    } else {
        Some(DueStatus::Upcoming)
    }
}

/// `true` when an incomplete task's due day is already past.
pub fn is_overdue<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>) -> bool {
    !task.completed
        && task
            .due_date
            .as_deref()
            .and_then(|due_date| due_status(due_date, now))
            == Some(DueStatus::Overdue)
}
