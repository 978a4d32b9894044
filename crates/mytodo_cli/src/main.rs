//! CLI smoke and inspection entry point.
//!
//! # Responsibility
//! - Verify `mytodo_core` linkage with deterministic output.
//! - Print a read-only summary of a store: projects and completion numbers.
//!
//! Usage: `mytodo_cli [DB_PATH]` (falls back to `$MYTODO_DB_PATH`).

use mytodo_core::{KvDocumentRepository, SqliteKvStore, TodoService};
use std::process::ExitCode;

const DB_PATH_ENV: &str = "MYTODO_DB_PATH";

fn main() -> ExitCode {
    println!("mytodo_core ping={}", mytodo_core::ping());
    println!("mytodo_core version={}", mytodo_core::core_version());

    let Some(db_path) = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(DB_PATH_ENV).ok())
        .filter(|value| !value.trim().is_empty())
    else {
        return ExitCode::SUCCESS;
    };

    match print_summary(db_path.trim()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_summary(db_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteKvStore::open(db_path)?;
    let service = TodoService::new(KvDocumentRepository::new(store));

    let stats = service.task_stats()?;
    println!(
        "tasks total={} completed={} pending={} completion_rate={}%",
        stats.total,
        stats.completed,
        stats.pending(),
        stats.completion_rate()
    );

    for project in service.list_projects()? {
        let project_stats = service.project_stats(&project.id)?;
        println!(
            "project id={} name={:?} tasks={} completed={}",
            project.id, project.name, project_stats.total, project_stats.completed
        );
    }
    Ok(())
}
