//! Completion statistics.

use crate::model::todo::{SubTask, Task};
use serde::Serialize;

/// Completed/total counts over a set of tasks or subtasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
}

impl TaskStats {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        Self::from_flags(tasks.into_iter().map(|task| task.completed))
    }

    pub fn from_subtasks<'a>(sub_tasks: impl IntoIterator<Item = &'a SubTask>) -> Self {
        Self::from_flags(sub_tasks.into_iter().map(|sub_task| sub_task.completed))
    }

    fn from_flags(flags: impl Iterator<Item = bool>) -> Self {
        flags.fold(Self::default(), |mut stats, completed| {
            stats.total += 1;
            if completed {
                stats.completed += 1;
            }
            stats
        })
    }

    pub fn pending(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }

    /// Completed share as a rounded whole percent; `0` when there is nothing.
    pub fn completion_rate(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::TaskStats;

    #[test]
    fn completion_rate_rounds_to_whole_percent() {
        let stats = TaskStats {
            total: 3,
            completed: 2,
        };
        assert_eq!(stats.completion_rate(), 67);
        assert_eq!(stats.pending(), 1);
    }

    #[test]
    fn empty_stats_have_zero_rate() {
        assert_eq!(TaskStats::default().completion_rate(), 0);
    }
}
