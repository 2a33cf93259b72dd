//! Error types for Maestro.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaestroError {
    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Routing error: {0}")]
    Routing(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Task {0} is already active")]
    DuplicateTask(String),

    #[error("Speech output failed: {0}")]
    Speech(String),

    #[error("Invalid task transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: crate::TaskStatus,
        to: crate::TaskStatus,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MaestroError>;
