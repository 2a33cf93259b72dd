//! Agent worker - runs one (agent, capability) pair for one task.

use crate::registry::{RecordOutcome, ResultSink};
use maestro_common::{Agent, AgentContext};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// How a worker ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The agent returned a value; carries what the sink did with it
    Reported(RecordOutcome),
    /// The agent returned an error; nothing was recorded
    Failed,
    /// The task was cancelled before the agent returned
    Cancelled,
}

/// Invoke the agent and write its result through the sink.
///
/// Agent failures record nothing. The monitor only notices them as a
/// missing result at the deadline.
pub async fn run_worker(
    agent: Arc<dyn Agent>,
    ctx: AgentContext,
    sink: ResultSink,
    cancel: CancellationToken,
) -> WorkerExit {
    let agent_task = sink.agent_task();

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(
                task_id = %ctx.task_id,
                agent = %agent_task.agent,
                "Worker cancelled"
            );
            WorkerExit::Cancelled
        }
        result = agent.invoke(agent_task.capability, &ctx) => match result {
            Ok(value) => WorkerExit::Reported(sink.submit(value)),
            Err(e) => {
                warn!(
                    task_id = %ctx.task_id,
                    agent = %agent_task.agent,
                    capability = %agent_task.capability,
                    error = %e,
                    "Agent failed"
                );
                WorkerExit::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ActiveTask;
    use async_trait::async_trait;
    use maestro_common::{
        AgentKind, AgentTask, Capability, MaestroError, Result, Task, TaskPriority, TaskType,
    };
    use serde_json::{json, Value};
    use std::time::Duration;

    struct Slow {
        fail: bool,
    }

    #[async_trait]
    impl Agent for Slow {
        fn kind(&self) -> AgentKind {
            AgentKind::EliteRepos
        }

        fn name(&self) -> &str {
            "slow"
        }

        async fn invoke(&self, _capability: Capability, _ctx: &AgentContext) -> Result<Value> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            if self.fail {
                Err(MaestroError::Agent("boom".into()))
            } else {
                Ok(json!({"best_practices": ["x"]}))
            }
        }
    }

    const ELITE: AgentTask = AgentTask::new(AgentKind::EliteRepos, Capability::GetBestPractices);

    fn setup() -> (Arc<ActiveTask>, ResultSink, AgentContext) {
        let task = Task::new("task_1_0", "build", TaskType::Development, TaskPriority::Medium);
        let active = Arc::new(ActiveTask::new(task, vec![ELITE], CancellationToken::new()));
        let sink = ResultSink::new(Arc::clone(&active), ELITE);
        (active, sink, AgentContext::new("task_1_0", "build"))
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_records() {
        let (active, sink, ctx) = setup();
        let exit = run_worker(Arc::new(Slow { fail: false }), ctx, sink, CancellationToken::new()).await;
        assert_eq!(exit, WorkerExit::Reported(RecordOutcome::Recorded));
        assert!(active.is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_records_nothing() {
        let (active, sink, ctx) = setup();
        let exit = run_worker(Arc::new(Slow { fail: true }), ctx, sink, CancellationToken::new()).await;
        assert_eq!(exit, WorkerExit::Failed);
        assert!(active.snapshot().results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_without_writing() {
        let (active, sink, ctx) = setup();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_worker(
            Arc::new(Slow { fail: false }),
            ctx,
            sink,
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();

        assert_eq!(handle.await.unwrap(), WorkerExit::Cancelled);
        assert!(active.snapshot().results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sealed_task_reports_late() {
        let (active, sink, ctx) = setup();
        active.seal();
        let exit = run_worker(Arc::new(Slow { fail: false }), ctx, sink, CancellationToken::new()).await;
        assert_eq!(exit, WorkerExit::Reported(RecordOutcome::Late));
    }
}
