//! Task model for command orchestration.

use crate::{MaestroError, Result};
use serde::{Deserialize, Serialize};

/// Kind of work a command asks for. Selects the agent set and the response template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Development,
    Research,
    Optimization,
    Learning,
    General,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Research => "research",
            Self::Optimization => "optimization",
            Self::Learning => "learning",
            Self::General => "general",
        }
    }
}

/// Priority level for tasks.
///
/// Recorded on every task but not used to reorder the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Current status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Queued,
    Processing,
    Completed,
    TimedOut,
}

impl TaskStatus {
    /// Terminal states never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::TimedOut)
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Queued => 0,
            Self::Processing => 1,
            Self::Completed | Self::TimedOut => 2,
        }
    }

    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }
}

/// One orchestration request derived from a non-trivial command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task ID
    pub id: String,

    /// The command as the caller typed it
    pub command: String,

    #[serde(rename = "type")]
    pub task_type: TaskType,

    pub priority: TaskPriority,

    /// Creation timestamp (Unix millis)
    pub created_at: u64,

    pub status: TaskStatus,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        command: impl Into<String>,
        task_type: TaskType,
        priority: TaskPriority,
    ) -> Self {
        Self {
            id: id.into(),
            command: command.into(),
            task_type,
            priority,
            created_at: crate::now_millis(),
            status: TaskStatus::Queued,
        }
    }

    /// Move the task forward. Regressions and moves out of a terminal state are rejected.
    pub fn advance(&mut self, next: TaskStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(MaestroError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}
