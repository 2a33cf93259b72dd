//! Integration tests for the agent registry and built-in executors.
//!
//! Exercises every routed (agent, capability) pair through the registry,
//! concurrently, the way the dispatcher does.

use maestro_agents::{spawn_research, select_topics, AgentRegistry};
use maestro_common::{AgentContext, AgentKind, Capability};
use maestro_knowledge::KnowledgeCache;
use std::sync::Arc;

const ROUTED: [(AgentKind, Capability); 9] = [
    (AgentKind::GithubKnowledge, Capability::FindDevelopmentPatterns),
    (AgentKind::EliteRepos, Capability::GetBestPractices),
    (AgentKind::DeepAnalyzer, Capability::FindQualityExamples),
    (AgentKind::ViralInnovation, Capability::FindBreakthroughSolutions),
    (AgentKind::DeepAnalyzer, Capability::AnalyzeBenchmarks),
    (AgentKind::Predictive, Capability::SuggestApproaches),
    (AgentKind::DeepAnalyzer, Capability::FindPerformancePatterns),
    (AgentKind::EliteRepos, Capability::GetOptimizationTechniques),
    (AgentKind::GithubKnowledge, Capability::FindOptimizationCommits),
];

#[tokio::test]
async fn test_every_routed_pair_produces_an_object() {
    let registry = AgentRegistry::with_defaults();
    let ctx = AgentContext::new("task_1_0", "implement a Unity VR hand tracking system");

    let mut handles = Vec::new();
    for (kind, capability) in ROUTED {
        assert_eq!(capability.provider(), kind);
        let agent = registry.resolve(kind).unwrap();
        let ctx = ctx.clone();
        handles.push(tokio::spawn(async move {
            agent.invoke(capability, &ctx).await
        }));
    }

    for handle in handles {
        let value = handle.await.unwrap().unwrap();
        assert!(value.is_object());
    }
}

#[tokio::test]
async fn test_agents_read_research_from_cache() {
    let cache = Arc::new(KnowledgeCache::default());
    let command = "implement a Unity VR hand tracking system";
    for h in spawn_research(select_topics(command), Arc::clone(&cache)) {
        h.await.unwrap();
    }

    let registry = AgentRegistry::with_defaults();
    let agent = registry.resolve(AgentKind::GithubKnowledge).unwrap();
    let ctx = AgentContext::new("task_1_0", command).with_knowledge(cache);

    let value = agent
        .invoke(Capability::FindDevelopmentPatterns, &ctx)
        .await
        .unwrap();

    let topics = value["cached_topics"].as_array().unwrap();
    assert!(topics.iter().any(|t| t == "unity_best_practices"));
    assert!(topics.iter().any(|t| t == "vr_optimization_techniques"));
}
