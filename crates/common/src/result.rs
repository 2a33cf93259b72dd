//! Partial agent results and the artifacts built from them.

use crate::{AgentKind, Capability, Task};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One agent's contribution to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub capability: Capability,

    /// Opaque structured payload produced by the agent
    pub value: serde_json::Value,

    /// Completion timestamp (Unix millis)
    pub completed_at: u64,
}

impl AgentResult {
    pub fn new(capability: Capability, value: serde_json::Value) -> Self {
        Self {
            capability,
            value,
            completed_at: crate::now_millis(),
        }
    }
}

/// Results keyed by agent, in arrival order.
pub type AgentResults = IndexMap<AgentKind, AgentResult>;

/// Merged view of whatever partial results were present at finalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    pub recommendations: Vec<String>,
    pub examples: Vec<serde_json::Value>,
    pub innovations: Vec<String>,
}

impl Synthesis {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty() && self.examples.is_empty() && self.innovations.is_empty()
    }

    pub fn insight_count(&self) -> usize {
        self.recommendations.len() + self.examples.len() + self.innovations.len()
    }
}

/// The durable, write-once outcome of one task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub task: Task,
    pub results: AgentResults,
    pub synthesis: Synthesis,
    pub response: String,
    /// Completion timestamp (Unix millis)
    pub completed_at: u64,
    pub timed_out: bool,
}
