//! The coordinator: entry point for commands.

use crate::config::CoordinatorConfig;
use crate::dispatcher::Dispatcher;
use crate::fast_path::{FastCommand, FastPathExecutor};
use crate::registry::ActiveTaskRegistry;
use crate::routing::RoutingTable;
use crate::speech::{CommandSpeaker, SilentSpeaker, Speaker};
use crate::store::{CompletionStore, FileCompletionStore};
use crate::triage::classify_command;
use maestro_agents::{select_topics, spawn_research, AgentRegistry, CommandRunner, SystemCommandRunner};
use maestro_common::{CompletionRecord, Result, Task};
use maestro_knowledge::KnowledgeCache;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

const COMPLETION_CHANNEL_CAPACITY: usize = 256;

/// Point-in-time counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub active_tasks: usize,
    pub knowledge_entries: usize,
    /// Tasks accepted but not yet picked up by the dispatcher
    pub queued: usize,
}

/// Accepts commands, answers the fast path inline and queues everything
/// else for the agent network.
///
/// Must be built inside a Tokio runtime: building starts the dispatcher
/// and the knowledge sweeper.
pub struct Coordinator {
    dispatcher: Arc<Dispatcher>,
    queue: mpsc::UnboundedSender<Task>,
    fast_path: FastPathExecutor,
    task_seq: AtomicU64,
    cancel: CancellationToken,
    background: Mutex<Vec<JoinHandle<()>>>,
}

impl Coordinator {
    /// A coordinator with the built-in agents, routing table and file store.
    pub fn new(config: CoordinatorConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: CoordinatorConfig) -> CoordinatorBuilder {
        CoordinatorBuilder::new(config)
    }

    /// Handle one command. Fast-path commands return their result;
    /// everything else returns an acknowledgement with the task id.
    pub async fn process_command(&self, command: &str) -> String {
        if let Some(fast) = FastCommand::parse(command) {
            return self.fast_path.execute(fast, || self.status()).await;
        }

        let classification = classify_command(command);
        let task = Task::new(
            self.next_task_id(),
            command,
            classification.task_type,
            classification.priority,
        );
        let task_id = task.id.clone();

        spawn_research(select_topics(command), Arc::clone(&self.dispatcher.knowledge));

        self.dispatcher.queued.fetch_add(1, Ordering::SeqCst);
        if self.queue.send(task).is_err() {
            self.dispatcher.queued.fetch_sub(1, Ordering::SeqCst);
            error!(task_id = %task_id, "Task queue closed");
            return "Command failed: coordinator is shut down".to_string();
        }

        info!(
            task_id = %task_id,
            task_type = classification.task_type.as_str(),
            priority = ?classification.priority,
            "Queued task"
        );

        format!(
            "Processing '{}' with full agent network (Task ID: {})",
            command, task_id
        )
    }

    fn next_task_id(&self) -> String {
        let seq = self.task_seq.fetch_add(1, Ordering::SeqCst);
        format!("task_{}_{}", maestro_common::now_millis(), seq)
    }

    pub fn status(&self) -> String {
        let snapshot = self.status_snapshot();
        format!(
            "System Status: {} active tasks, {} knowledge entries",
            snapshot.active_tasks, snapshot.knowledge_entries
        )
    }

    pub fn status_snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            active_tasks: self.dispatcher.registry.len(),
            knowledge_entries: self.dispatcher.knowledge.len(),
            queued: self.dispatcher.queued(),
        }
    }

    /// Load a persisted completion record.
    pub async fn completion(&self, task_id: &str) -> Result<Option<CompletionRecord>> {
        self.dispatcher.store.load(task_id).await
    }

    /// Receive every completion record as it is finalized.
    pub fn subscribe(&self) -> broadcast::Receiver<CompletionRecord> {
        self.dispatcher.completions.subscribe()
    }

    /// Records whose persistence failed after every retry.
    pub fn failed_completions(&self) -> Vec<CompletionRecord> {
        self.dispatcher.failed.lock().clone()
    }

    pub fn is_active(&self, task_id: &str) -> bool {
        self.dispatcher.registry.contains(task_id)
    }

    pub fn active_task_ids(&self) -> Vec<String> {
        self.dispatcher.registry.ids()
    }

    pub fn knowledge(&self) -> &Arc<KnowledgeCache> {
        &self.dispatcher.knowledge
    }

    /// Stop accepting work and wait for in-flight tasks to finalize with
    /// whatever results they have.
    pub async fn shutdown(&self) {
        info!("Shutting down coordinator");
        self.cancel.cancel();

        let background = std::mem::take(&mut *self.background.lock());
        for handle in background {
            if let Err(e) = handle.await {
                error!(error = %e, "Background task failed");
            }
        }

        let mut monitors = std::mem::take(&mut *self.dispatcher.monitors.lock());
        while let Some(joined) = monitors.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Monitor task failed");
            }
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Builder for wiring custom agents, stores and collaborators.
pub struct CoordinatorBuilder {
    config: CoordinatorConfig,
    routing: Option<RoutingTable>,
    agents: Option<AgentRegistry>,
    store: Option<Arc<dyn CompletionStore>>,
    runner: Option<Arc<dyn CommandRunner>>,
    speaker: Option<Arc<dyn Speaker>>,
    knowledge: Option<Arc<KnowledgeCache>>,
}

impl CoordinatorBuilder {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            config,
            routing: None,
            agents: None,
            store: None,
            runner: None,
            speaker: None,
            knowledge: None,
        }
    }

    pub fn routing(mut self, routing: RoutingTable) -> Self {
        self.routing = Some(routing);
        self
    }

    pub fn agents(mut self, agents: AgentRegistry) -> Self {
        self.agents = Some(agents);
        self
    }

    pub fn store(mut self, store: Arc<dyn CompletionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Runner for fast-path programs and, unless a speaker is set, speech.
    pub fn command_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    pub fn speaker(mut self, speaker: Arc<dyn Speaker>) -> Self {
        self.speaker = Some(speaker);
        self
    }

    pub fn knowledge(mut self, knowledge: Arc<KnowledgeCache>) -> Self {
        self.knowledge = Some(knowledge);
        self
    }

    /// Validate routing against the agents and start the background tasks.
    pub fn build(self) -> Result<Coordinator> {
        let config = self.config;
        let routing = self.routing.unwrap_or_else(RoutingTable::reference);
        let agents = self.agents.unwrap_or_else(AgentRegistry::with_defaults);
        routing.validate_against(&agents)?;

        let runner: Arc<dyn CommandRunner> =
            self.runner.unwrap_or_else(|| Arc::new(SystemCommandRunner));
        let speaker: Arc<dyn Speaker> = match self.speaker {
            Some(speaker) => speaker,
            None if config.speech.enabled => {
                Arc::new(CommandSpeaker::new(Arc::clone(&runner), &config.speech))
            }
            None => Arc::new(SilentSpeaker),
        };
        let store: Arc<dyn CompletionStore> = self
            .store
            .unwrap_or_else(|| Arc::new(FileCompletionStore::new(config.completions_dir.clone())));
        let knowledge = self
            .knowledge
            .unwrap_or_else(|| Arc::new(KnowledgeCache::new(config.knowledge.clone())));

        let (completions, _) = broadcast::channel(COMPLETION_CHANNEL_CAPACITY);
        let dispatcher = Arc::new(Dispatcher {
            routing,
            agents,
            registry: Arc::new(ActiveTaskRegistry::new()),
            store,
            speaker,
            speech_max_chars: config.speech.max_chars,
            knowledge: Arc::clone(&knowledge),
            completions,
            failed: Mutex::new(Vec::new()),
            queued: AtomicUsize::new(0),
            monitors: Mutex::new(JoinSet::new()),
            task_timeout: config.task_timeout(),
            poll_interval: config.queue_poll_interval(),
            retry: config.persistence.clone(),
        });

        let cancel = CancellationToken::new();
        let (queue, rx) = mpsc::unbounded_channel();
        let background = vec![
            dispatcher.spawn(rx, cancel.clone()),
            knowledge.spawn_sweeper(cancel.child_token()),
        ];

        let fast_path = FastPathExecutor::new(
            runner,
            config.working_dir.clone(),
            config.search_program.clone(),
            config.search_result_limit,
        );

        info!(
            timeout_ms = config.task_timeout_ms,
            completions_dir = %config.completions_dir.display(),
            "Coordinator started"
        );

        Ok(Coordinator {
            dispatcher,
            queue,
            fast_path,
            task_seq: AtomicU64::new(0),
            cancel,
            background: Mutex::new(background),
        })
    }
}
