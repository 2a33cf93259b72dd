//! Registry of agent executors keyed by agent kind.

use crate::{
    DeepAnalyzerAgent, EliteReposAgent, GithubKnowledgeAgent, PredictiveAgent,
    ViralInnovationAgent,
};
use maestro_common::{Agent, AgentKind, MaestroError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Maps each agent kind to the executor that serves it.
#[derive(Clone, Default)]
pub struct AgentRegistry {
    agents: HashMap<AgentKind, Arc<dyn Agent>>,
}

impl AgentRegistry {
    /// An empty registry. Every routed agent must be registered before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in executor for every agent kind.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(GithubKnowledgeAgent::new()));
        registry.register(Arc::new(EliteReposAgent::new()));
        registry.register(Arc::new(DeepAnalyzerAgent::new()));
        registry.register(Arc::new(ViralInnovationAgent::new()));
        registry.register(Arc::new(PredictiveAgent::new()));
        registry
    }

    /// Register an executor, replacing any previous one for the same kind.
    pub fn register(&mut self, agent: Arc<dyn Agent>) -> &mut Self {
        debug!(agent = %agent.kind(), name = %agent.name(), "Registering agent");
        self.agents.insert(agent.kind(), agent);
        self
    }

    pub fn with_agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.register(agent);
        self
    }

    pub fn get(&self, kind: AgentKind) -> Option<Arc<dyn Agent>> {
        self.agents.get(&kind).cloned()
    }

    /// Look up an executor, treating a missing one as a routing misconfiguration.
    pub fn resolve(&self, kind: AgentKind) -> Result<Arc<dyn Agent>> {
        self.get(kind).ok_or_else(|| {
            MaestroError::Routing(format!("no executor registered for agent '{}'", kind))
        })
    }

    pub fn contains(&self, kind: AgentKind) -> bool {
        self.agents.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
