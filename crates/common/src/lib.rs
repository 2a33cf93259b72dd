//! Common types and traits shared across Maestro crates.
//!
//! This crate provides the task model, the closed set of agents and
//! capabilities, the partial-result types and the error type that every
//! other crate builds on.

pub mod error;
pub mod result;
pub mod task;
pub mod traits;

pub use error::{MaestroError, Result};
pub use result::{AgentResult, AgentResults, CompletionRecord, Synthesis};
pub use task::{Task, TaskPriority, TaskStatus, TaskType};
pub use traits::{Agent, AgentContext, AgentKind, AgentTask, Capability, KnowledgeLookup};

/// Current Unix time in milliseconds.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
