//! Domain model for projects, tasks, subtasks and the local profile.
//!
//! # Responsibility
//! - Define the records persisted inside the todo document.
//! - Keep the JSON shape compatible with documents written by earlier builds.
//!
//! # Invariants
//! - Every record carries a unique string id generated at creation.
//! - `created_at` is Unix epoch milliseconds.

pub mod profile;
pub mod todo;

use chrono::Utc;
use uuid::Uuid;

/// Generates a fresh record id.
///
/// Random v4 ids keep two records created in the same millisecond distinct.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}
