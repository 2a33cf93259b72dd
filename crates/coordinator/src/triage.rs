//! Keyword triage: maps raw command text to a task type and priority.
//!
//! Matching is substring containment on the lowercased text. Keyword sets
//! are tested in a fixed order and the first hit wins.

use maestro_common::{TaskPriority, TaskType};
use serde::{Deserialize, Serialize};

const DEVELOPMENT_KEYWORDS: &[&str] = &["code", "implement", "build", "create"];
const RESEARCH_KEYWORDS: &[&str] = &["research", "find", "analyze", "compare"];
const OPTIMIZATION_KEYWORDS: &[&str] = &["optimize", "improve", "fix", "debug"];
const LEARNING_KEYWORDS: &[&str] = &["learn", "understand", "explain"];

const HIGH_PRIORITY_KEYWORDS: &[&str] = &["urgent", "critical", "immediately", "now"];
const LOW_PRIORITY_KEYWORDS: &[&str] = &["when possible", "later", "eventually"];

/// Result of classifying a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub task_type: TaskType,
    pub priority: TaskPriority,
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Classify a command into a task type. Never fails; no match is `General`.
pub fn classify(command: &str) -> TaskType {
    let lower = command.to_lowercase();

    if contains_any(&lower, DEVELOPMENT_KEYWORDS) {
        TaskType::Development
    } else if contains_any(&lower, RESEARCH_KEYWORDS) {
        TaskType::Research
    } else if contains_any(&lower, OPTIMIZATION_KEYWORDS) {
        TaskType::Optimization
    } else if contains_any(&lower, LEARNING_KEYWORDS) {
        TaskType::Learning
    } else {
        TaskType::General
    }
}

/// Derive a priority from urgency words in the command.
pub fn determine_priority(command: &str) -> TaskPriority {
    let lower = command.to_lowercase();

    if contains_any(&lower, HIGH_PRIORITY_KEYWORDS) {
        TaskPriority::High
    } else if contains_any(&lower, LOW_PRIORITY_KEYWORDS) {
        TaskPriority::Low
    } else {
        TaskPriority::Medium
    }
}

pub fn classify_command(command: &str) -> Classification {
    Classification {
        task_type: classify(command),
        priority: determine_priority(command),
    }
}
