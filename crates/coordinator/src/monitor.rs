//! Progress monitor - a counting barrier over one task's results.
//!
//! Each accepted write wakes the monitor, which re-checks whether every
//! expected agent has reported. Otherwise it keeps waiting until the task
//! deadline or until the task is cancelled.

use crate::registry::ActiveTask;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// How a task's wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every expected agent reported
    Completed,
    /// The deadline passed first
    TimedOut,
    /// The task was cancelled (coordinator shutdown)
    Cancelled,
}

impl Outcome {
    pub fn timed_out(&self) -> bool {
        !matches!(self, Self::Completed)
    }
}

/// Wait until the task is complete, its deadline passes, or it is cancelled.
pub async fn watch(task: &ActiveTask, timeout: Duration) -> Outcome {
    let deadline = Instant::now() + timeout;

    loop {
        if task.is_complete() {
            return Outcome::Completed;
        }

        tokio::select! {
            _ = task.arrival() => {
                debug!(task_id = %task.id(), "Result arrived");
            }
            _ = tokio::time::sleep_until(deadline) => {
                // A write may have landed together with the deadline
                return if task.is_complete() {
                    Outcome::Completed
                } else {
                    Outcome::TimedOut
                };
            }
            _ = task.cancel_token().cancelled() => {
                return Outcome::Cancelled;
            }
        }
    }
}
