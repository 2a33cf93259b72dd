//! Deep code analyzer agent - finds high-quality reference implementations.

use async_trait::async_trait;
use maestro_common::{Agent, AgentContext, AgentKind, Capability, Result};
use serde_json::{json, Value};
use tracing::info;

pub struct DeepAnalyzerAgent {
    name: String,
}

impl DeepAnalyzerAgent {
    pub fn new() -> Self {
        Self {
            name: "Deep Code Analyzer".into(),
        }
    }
}

impl Default for DeepAnalyzerAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for DeepAnalyzerAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::DeepAnalyzer
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, capability: Capability, ctx: &AgentContext) -> Result<Value> {
        info!(
            agent = %self.kind(),
            capability = %capability,
            task_id = %ctx.task_id,
            "Analyzing code quality"
        );

        Ok(match capability {
            Capability::FindQualityExamples => json!({
                "quality_repos": [
                    { "name": "example/repo1", "quality_score": 95 },
                    { "name": "example/repo2", "quality_score": 92 },
                ]
            }),
            _ => json!({ "status": "completed" }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_quality_examples() {
        let agent = DeepAnalyzerAgent::new();
        let ctx = AgentContext::new("task_1_0", "implement tracking");
        let value = agent
            .invoke(Capability::FindQualityExamples, &ctx)
            .await
            .unwrap();

        let repos = value["quality_repos"].as_array().unwrap();
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0]["quality_score"], 95);
    }

    #[tokio::test]
    async fn test_benchmarks_report_completed() {
        let agent = DeepAnalyzerAgent::new();
        let ctx = AgentContext::new("task_1_0", "compare runtimes");
        let value = agent.invoke(Capability::AnalyzeBenchmarks, &ctx).await.unwrap();
        assert_eq!(value["status"], "completed");
    }
}
