//! Capability routing: which agents a task type fans out to.

use maestro_agents::AgentRegistry;
use maestro_common::{AgentKind, AgentTask, Capability, MaestroError, Result, TaskType};
use std::collections::{HashMap, HashSet};

/// Maps a task type to the (agent, capability) pairs dispatched for it.
///
/// Results are keyed by agent, so a type may not list the same agent twice.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    routes: HashMap<TaskType, Vec<AgentTask>>,
}

impl RoutingTable {
    /// A table with no routes. Every task finalizes immediately.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in routing table. Learning and general have no agents.
    pub fn reference() -> Self {
        use AgentKind::*;
        use Capability::*;

        let mut routes = HashMap::new();
        routes.insert(
            TaskType::Development,
            vec![
                AgentTask::new(GithubKnowledge, FindDevelopmentPatterns),
                AgentTask::new(EliteRepos, GetBestPractices),
                AgentTask::new(DeepAnalyzer, FindQualityExamples),
            ],
        );
        routes.insert(
            TaskType::Research,
            vec![
                AgentTask::new(ViralInnovation, FindBreakthroughSolutions),
                AgentTask::new(DeepAnalyzer, AnalyzeBenchmarks),
                AgentTask::new(Predictive, SuggestApproaches),
            ],
        );
        routes.insert(
            TaskType::Optimization,
            vec![
                AgentTask::new(DeepAnalyzer, FindPerformancePatterns),
                AgentTask::new(EliteRepos, GetOptimizationTechniques),
                AgentTask::new(GithubKnowledge, FindOptimizationCommits),
            ],
        );
        Self { routes }
    }

    /// Set the agent set for a task type, replacing any previous entry.
    pub fn with_route(mut self, task_type: TaskType, tasks: Vec<AgentTask>) -> Result<Self> {
        let mut seen = HashSet::new();
        for task in &tasks {
            if !seen.insert(task.agent) {
                return Err(MaestroError::Routing(format!(
                    "agent '{}' listed twice for task type '{}'",
                    task.agent,
                    task_type.as_str()
                )));
            }
        }
        self.routes.insert(task_type, tasks);
        Ok(self)
    }

    /// The agent set for a type. Unmapped types get an empty slice.
    pub fn route(&self, task_type: TaskType) -> &[AgentTask] {
        self.routes
            .get(&task_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check that every routed agent has an executor.
    pub fn validate_against(&self, agents: &AgentRegistry) -> Result<()> {
        for (task_type, tasks) in &self.routes {
            for task in tasks {
                if !agents.contains(task.agent) {
                    return Err(MaestroError::Routing(format!(
                        "task type '{}' routes to agent '{}' which has no executor",
                        task_type.as_str(),
                        task.agent
                    )));
                }
            }
        }
        Ok(())
    }
}
