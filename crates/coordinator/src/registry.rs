//! Active task registry - in-flight tasks and their partial results.
//!
//! The outer map lock is only held to insert, look up or remove an entry.
//! Each entry guards its own record, so writes for unrelated tasks never
//! contend. Workers never see the map; they get a [`ResultSink`] bound to
//! their own entry.

use maestro_common::{
    AgentKind, AgentResult, AgentResults, AgentTask, MaestroError, Result, Task,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// The in-flight state of one task.
#[derive(Debug, Clone)]
pub struct ActiveTaskRecord {
    pub task: Task,
    pub expected: Vec<AgentTask>,
    pub results: AgentResults,
    /// Dispatch timestamp (Unix millis)
    pub started_at: u64,
}

impl ActiveTaskRecord {
    pub fn is_complete(&self) -> bool {
        self.results.len() >= self.expected.len()
    }

    /// Agents that have not reported yet.
    pub fn missing(&self) -> Vec<AgentKind> {
        self.expected
            .iter()
            .map(|t| t.agent)
            .filter(|a| !self.results.contains_key(a))
            .collect()
    }
}

/// What happened to a submitted result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded,
    /// The agent already reported for this task
    Duplicate,
    /// The (agent, capability) pair is not part of the expected set
    Unexpected,
    /// The record was already sealed by the monitor
    Late,
}

struct Entry {
    record: ActiveTaskRecord,
    sealed: bool,
}

/// A registered task: its record, a wakeup for the monitor and the
/// cancellation token shared by its workers.
pub struct ActiveTask {
    id: String,
    state: Mutex<Entry>,
    arrived: Notify,
    cancel: CancellationToken,
}

impl ActiveTask {
    pub fn new(task: Task, expected: Vec<AgentTask>, cancel: CancellationToken) -> Self {
        Self {
            id: task.id.clone(),
            state: Mutex::new(Entry {
                record: ActiveTaskRecord {
                    task,
                    expected,
                    results: AgentResults::new(),
                    started_at: maestro_common::now_millis(),
                },
                sealed: false,
            }),
            arrived: Notify::new(),
            cancel,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Record one agent's result and wake the monitor.
    pub fn record(&self, agent_task: AgentTask, value: serde_json::Value) -> RecordOutcome {
        let mut entry = self.state.lock();
        if entry.sealed {
            return RecordOutcome::Late;
        }
        if !entry.record.expected.contains(&agent_task) {
            return RecordOutcome::Unexpected;
        }
        if entry.record.results.contains_key(&agent_task.agent) {
            return RecordOutcome::Duplicate;
        }

        entry.record.results.insert(
            agent_task.agent,
            AgentResult::new(agent_task.capability, value),
        );
        drop(entry);

        self.arrived.notify_one();
        RecordOutcome::Recorded
    }

    pub fn is_complete(&self) -> bool {
        self.state.lock().record.is_complete()
    }

    pub fn is_sealed(&self) -> bool {
        self.state.lock().sealed
    }

    /// Stop accepting results and return the final record.
    pub fn seal(&self) -> ActiveTaskRecord {
        let mut entry = self.state.lock();
        entry.sealed = true;
        entry.record.clone()
    }

    pub fn snapshot(&self) -> ActiveTaskRecord {
        self.state.lock().record.clone()
    }

    /// Resolves after the next accepted write (or immediately if one is pending).
    pub async fn arrival(&self) {
        self.arrived.notified().await
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for ActiveTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveTask")
            .field("id", &self.id)
            .field("sealed", &self.is_sealed())
            .finish()
    }
}

/// Write handle given to a single worker.
#[derive(Debug, Clone)]
pub struct ResultSink {
    task: Arc<ActiveTask>,
    agent_task: AgentTask,
}

impl ResultSink {
    pub fn new(task: Arc<ActiveTask>, agent_task: AgentTask) -> Self {
        Self { task, agent_task }
    }

    pub fn agent_task(&self) -> AgentTask {
        self.agent_task
    }

    pub fn submit(&self, value: serde_json::Value) -> RecordOutcome {
        let outcome = self.task.record(self.agent_task, value);
        match outcome {
            RecordOutcome::Recorded => debug!(
                task_id = %self.task.id(),
                agent = %self.agent_task.agent,
                capability = %self.agent_task.capability,
                "Recorded agent result"
            ),
            RecordOutcome::Late => debug!(
                task_id = %self.task.id(),
                agent = %self.agent_task.agent,
                "Dropping late agent result"
            ),
            RecordOutcome::Duplicate | RecordOutcome::Unexpected => warn!(
                task_id = %self.task.id(),
                agent = %self.agent_task.agent,
                capability = %self.agent_task.capability,
                outcome = ?outcome,
                "Rejected agent result"
            ),
        }
        outcome
    }
}

/// All tasks currently in flight, keyed by task id.
#[derive(Default)]
pub struct ActiveTaskRegistry {
    tasks: RwLock<HashMap<String, Arc<ActiveTask>>>,
}

impl ActiveTaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, task: Arc<ActiveTask>) -> Result<()> {
        let mut tasks = self.tasks.write();
        if tasks.contains_key(task.id()) {
            return Err(MaestroError::DuplicateTask(task.id().to_string()));
        }
        tasks.insert(task.id().to_string(), task);
        Ok(())
    }

    pub fn get(&self, task_id: &str) -> Option<Arc<ActiveTask>> {
        self.tasks.read().get(task_id).cloned()
    }

    pub fn remove(&self, task_id: &str) -> Option<Arc<ActiveTask>> {
        self.tasks.write().remove(task_id)
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.tasks.read().contains_key(task_id)
    }

    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.read().is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.tasks.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}
