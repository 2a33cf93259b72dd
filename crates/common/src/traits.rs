//! Core agent traits, agent identities and capabilities.
//!
//! These live in `maestro-common` so that the coordinator and the agent
//! crate can both reference them without circular dependencies.

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The closed set of agents the orchestrator can fan out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    GithubKnowledge,
    EliteRepos,
    DeepAnalyzer,
    ViralInnovation,
    Predictive,
}

impl AgentKind {
    pub const ALL: [AgentKind; 5] = [
        Self::GithubKnowledge,
        Self::EliteRepos,
        Self::DeepAnalyzer,
        Self::ViralInnovation,
        Self::Predictive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GithubKnowledge => "github_knowledge",
            Self::EliteRepos => "elite_repos",
            Self::DeepAnalyzer => "deep_analyzer",
            Self::ViralInnovation => "viral_innovation",
            Self::Predictive => "predictive",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capabilities that can be requested from an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    FindDevelopmentPatterns,
    FindOptimizationCommits,
    GetBestPractices,
    GetOptimizationTechniques,
    FindQualityExamples,
    AnalyzeBenchmarks,
    FindPerformancePatterns,
    FindBreakthroughSolutions,
    SuggestApproaches,
}

impl Capability {
    /// The agent that provides this capability.
    pub fn provider(&self) -> AgentKind {
        match self {
            Self::FindDevelopmentPatterns | Self::FindOptimizationCommits => {
                AgentKind::GithubKnowledge
            }
            Self::GetBestPractices | Self::GetOptimizationTechniques => AgentKind::EliteRepos,
            Self::FindQualityExamples | Self::AnalyzeBenchmarks | Self::FindPerformancePatterns => {
                AgentKind::DeepAnalyzer
            }
            Self::FindBreakthroughSolutions => AgentKind::ViralInnovation,
            Self::SuggestApproaches => AgentKind::Predictive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FindDevelopmentPatterns => "find_development_patterns",
            Self::FindOptimizationCommits => "find_optimization_commits",
            Self::GetBestPractices => "get_best_practices",
            Self::GetOptimizationTechniques => "get_optimization_techniques",
            Self::FindQualityExamples => "find_quality_examples",
            Self::AnalyzeBenchmarks => "analyze_benchmarks",
            Self::FindPerformancePatterns => "find_performance_patterns",
            Self::FindBreakthroughSolutions => "find_breakthrough_solutions",
            Self::SuggestApproaches => "suggest_approaches",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (agent, capability) unit of concurrent work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentTask {
    pub agent: AgentKind,
    pub capability: Capability,
}

impl AgentTask {
    pub const fn new(agent: AgentKind, capability: Capability) -> Self {
        Self { agent, capability }
    }
}

/// Read-only view of cached findings that agents may consult.
pub trait KnowledgeLookup: Send + Sync {
    fn lookup(&self, topic: &str) -> Option<serde_json::Value>;

    fn topics(&self) -> Vec<String>;
}

/// Everything an agent gets to see about the task it is working on.
#[derive(Clone)]
pub struct AgentContext {
    pub task_id: String,
    pub command: String,
    pub knowledge: Option<Arc<dyn KnowledgeLookup>>,
}

impl AgentContext {
    pub fn new(task_id: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            command: command.into(),
            knowledge: None,
        }
    }

    pub fn with_knowledge(mut self, knowledge: Arc<dyn KnowledgeLookup>) -> Self {
        self.knowledge = Some(knowledge);
        self
    }
}

impl fmt::Debug for AgentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentContext")
            .field("task_id", &self.task_id)
            .field("command", &self.command)
            .field("knowledge", &self.knowledge.is_some())
            .finish()
    }
}

/// The trait every agent executor implements.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Which agent this executor stands for.
    fn kind(&self) -> AgentKind;

    /// Get the agent's human-readable name.
    fn name(&self) -> &str;

    /// Produce a partial result for one capability of one task.
    ///
    /// The returned value is opaque to the orchestrator; the synthesizer
    /// picks known fields out of it.
    async fn invoke(&self, capability: Capability, ctx: &AgentContext)
        -> Result<serde_json::Value>;
}
