//! Task dispatcher - drains the queue and fans each task out to its agents.
//!
//! ```text
//!  queue ──► dispatch ──► register record ──► spawn workers (JoinSet)
//!                                       └──► spawn monitor
//!                                                 │ Completed / TimedOut / Cancelled
//!                                                 ▼
//!                      seal ─► cancel workers ─► synthesize ─► persist ─► remove
//!                                                               └─► speak ─► broadcast
//! ```

use crate::monitor::{self, Outcome};
use crate::registry::{ActiveTask, ActiveTaskRegistry, ResultSink};
use crate::routing::RoutingTable;
use crate::speech::Speaker;
use crate::store::{persist_with_retry, CompletionStore, RetryConfig};
use crate::synthesis::{generate_response, synthesize};
use crate::worker::{run_worker, WorkerExit};
use maestro_agents::AgentRegistry;
use maestro_common::{
    Agent, AgentContext, AgentResults, AgentTask, CompletionRecord, KnowledgeLookup, Result, Task,
    TaskStatus,
};
use maestro_knowledge::KnowledgeCache;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

/// Everything the dispatch loop and the per-task monitors share.
pub struct Dispatcher {
    pub(crate) routing: RoutingTable,
    pub(crate) agents: AgentRegistry,
    pub(crate) registry: Arc<ActiveTaskRegistry>,
    pub(crate) store: Arc<dyn CompletionStore>,
    pub(crate) speaker: Arc<dyn Speaker>,
    pub(crate) speech_max_chars: usize,
    pub(crate) knowledge: Arc<KnowledgeCache>,
    pub(crate) completions: broadcast::Sender<CompletionRecord>,
    pub(crate) failed: Mutex<Vec<CompletionRecord>>,
    pub(crate) queued: AtomicUsize,
    pub(crate) monitors: Mutex<JoinSet<()>>,
    pub(crate) task_timeout: Duration,
    pub(crate) poll_interval: Duration,
    pub(crate) retry: RetryConfig,
}

impl Dispatcher {
    /// Start the dispatch loop. It stops when `cancel` fires or every
    /// queue sender is dropped.
    pub fn spawn(
        self: &Arc<Self>,
        mut queue: mpsc::UnboundedReceiver<Task>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            info!("Dispatcher started");
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    next = tokio::time::timeout(this.poll_interval, queue.recv()) => match next {
                        Ok(Some(task)) => {
                            this.queued.fetch_sub(1, Ordering::SeqCst);
                            this.dispatch(task, &cancel).await;
                        }
                        Ok(None) => break,
                        Err(_) => trace!("Queue idle"),
                    }
                }
            }
            info!("Dispatcher stopped");
        })
    }

    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }

    /// Route, register and fan out one task.
    pub async fn dispatch(self: &Arc<Self>, mut task: Task, root: &CancellationToken) {
        self.reap_monitors();

        let expected = self.routing.route(task.task_type).to_vec();
        let executors = match self.resolve(&expected) {
            Ok(executors) => executors,
            Err(e) => {
                error!(
                    task_id = %task.id,
                    task_type = task.task_type.as_str(),
                    error = %e,
                    "Routing misconfiguration, finalizing without agents"
                );
                self.finalize(task, AgentResults::new(), false).await;
                return;
            }
        };

        if let Err(e) = task.advance(TaskStatus::Processing) {
            warn!(task_id = %task.id, error = %e, "Unexpected task state at dispatch");
        }

        let cancel = root.child_token();
        let active = Arc::new(ActiveTask::new(task.clone(), expected, cancel.clone()));
        if let Err(e) = self.registry.register(Arc::clone(&active)) {
            error!(task_id = %task.id, error = %e, "Failed to register task");
            return;
        }

        info!(
            task_id = %task.id,
            task_type = task.task_type.as_str(),
            priority = ?task.priority,
            agents = executors.len(),
            "Dispatching task"
        );

        let knowledge: Arc<dyn KnowledgeLookup> = self.knowledge.clone();
        let ctx = AgentContext::new(task.id.clone(), task.command.clone()).with_knowledge(knowledge);

        let mut workers = JoinSet::new();
        for (agent_task, agent) in executors {
            let sink = ResultSink::new(Arc::clone(&active), agent_task);
            workers.spawn(run_worker(agent, ctx.clone(), sink, cancel.child_token()));
        }

        let this = Arc::clone(self);
        self.monitors
            .lock()
            .spawn(async move { this.monitor_and_finalize(active, workers).await });
    }

    fn resolve(&self, expected: &[AgentTask]) -> Result<Vec<(AgentTask, Arc<dyn Agent>)>> {
        expected
            .iter()
            .map(|t| Ok((*t, self.agents.resolve(t.agent)?)))
            .collect()
    }

    fn reap_monitors(&self) {
        let mut monitors = self.monitors.lock();
        while let Some(joined) = monitors.try_join_next() {
            if let Err(e) = joined {
                error!(error = %e, "Monitor task panicked");
            }
        }
    }

    async fn monitor_and_finalize(&self, active: Arc<ActiveTask>, mut workers: JoinSet<WorkerExit>) {
        let outcome = monitor::watch(&active, self.task_timeout).await;
        let record = active.seal();
        active.cancel();
        workers.shutdown().await;

        match outcome {
            Outcome::Completed => debug!(task_id = %active.id(), "All agents reported"),
            Outcome::TimedOut => warn!(
                task_id = %active.id(),
                missing = ?record.missing(),
                timeout_ms = self.task_timeout.as_millis() as u64,
                "Task timed out with partial results"
            ),
            Outcome::Cancelled => info!(
                task_id = %active.id(),
                missing = ?record.missing(),
                "Task cancelled, finalizing with partial results"
            ),
        }

        self.finalize(record.task, record.results, outcome.timed_out())
            .await;
    }

    /// Build, persist and publish the completion record, then drop the
    /// registry entry. Runs exactly once per task.
    async fn finalize(&self, mut task: Task, results: AgentResults, timed_out: bool) {
        let status = if timed_out {
            TaskStatus::TimedOut
        } else {
            TaskStatus::Completed
        };
        if let Err(e) = task.advance(status) {
            warn!(task_id = %task.id, error = %e, "Unexpected task state at finalization");
        }

        let synthesis = synthesize(&results);
        let response = generate_response(&task, &synthesis);
        let record = CompletionRecord {
            task,
            results,
            synthesis,
            response,
            completed_at: maestro_common::now_millis(),
            timed_out,
        };
        let task_id = record.task.id.clone();

        if let Err(e) = persist_with_retry(self.store.as_ref(), &record, &self.retry).await {
            error!(task_id = %task_id, error = %e, "Giving up on completion record");
            self.failed.lock().push(record.clone());
        }
        self.registry.remove(&task_id);

        info!(
            task_id = %task_id,
            timed_out,
            results = record.results.len(),
            insights = record.synthesis.insight_count(),
            "Task finalized"
        );

        if record.response.chars().count() < self.speech_max_chars {
            if let Err(e) = self.speaker.speak(&record.response).await {
                warn!(task_id = %task_id, error = %e, "Speech output failed");
            }
        }

        // No subscribers is fine
        let _ = self.completions.send(record);
    }
}
