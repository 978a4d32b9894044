//! Presentation projections over loaded records.
//!
//! # Responsibility
//! - Provide the filtering, ordering and summary numbers screens render.
//! - Stay pure: nothing here reads or writes storage.

pub mod stats;
pub mod task_view;
