//! Result synthesis and response text.

use maestro_common::{AgentResults, Synthesis, Task, TaskType};
use serde_json::Value;

const RECOMMENDATION_KEYS: &[&str] = &["recommendations", "best_practices"];
const INNOVATION_KEYS: &[&str] = &["innovations"];
const EXAMPLE_KEYS: &[&str] = &["quality_repos", "examples"];

/// Items under `key`. A non-array value counts as a single item.
fn items<'a>(value: &'a Value, key: &str) -> Vec<&'a Value> {
    match value.get(key) {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other],
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Merge partial results in arrival order. No dedup, no ranking.
pub fn synthesize(results: &AgentResults) -> Synthesis {
    let mut synthesis = Synthesis::default();

    for result in results.values() {
        let value = &result.value;
        for key in RECOMMENDATION_KEYS {
            synthesis
                .recommendations
                .extend(items(value, key).into_iter().map(as_text));
        }
        for key in INNOVATION_KEYS {
            synthesis
                .innovations
                .extend(items(value, key).into_iter().map(as_text));
        }
        for key in EXAMPLE_KEYS {
            synthesis
                .examples
                .extend(items(value, key).into_iter().cloned());
        }
    }

    synthesis
}

/// Render the user-facing response for a finalized task.
pub fn generate_response(task: &Task, synthesis: &Synthesis) -> String {
    let command = &task.command;

    let response = match task.task_type {
        TaskType::Development => {
            let top: Vec<&str> = synthesis
                .recommendations
                .iter()
                .take(3)
                .map(String::as_str)
                .collect();
            let mut text = format!("For '{}', I recommend: {}", command, top.join("; "));
            if !synthesis.examples.is_empty() {
                text.push_str(&format!(
                    ". Reference examples: {} quality repositories found.",
                    synthesis.examples.len()
                ));
            }
            text
        }
        TaskType::Research => {
            let mut text = format!("Research results for '{}': ", command);
            if !synthesis.innovations.is_empty() {
                text.push_str(&format!(
                    "Found {} breakthrough approaches. ",
                    synthesis.innovations.len()
                ));
            }
            if !synthesis.examples.is_empty() {
                text.push_str(&format!(
                    "Analyzed {} top-quality implementations.",
                    synthesis.examples.len()
                ));
            }
            text
        }
        TaskType::Optimization | TaskType::Learning | TaskType::General => format!(
            "Completed analysis for '{}'. Generated {} actionable insights.",
            command,
            synthesis.insight_count()
        ),
    };

    response.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use maestro_common::{AgentKind, AgentResult, Capability, TaskPriority};
    use serde_json::json;

    fn results(entries: Vec<(AgentKind, Value)>) -> AgentResults {
        entries
            .into_iter()
            .map(|(agent, value)| {
                (agent, AgentResult::new(Capability::FindDevelopmentPatterns, value))
            })
            .collect()
    }

    fn task(task_type: TaskType) -> Task {
        Task::new("task_1_0", "make it fast", task_type, TaskPriority::Medium)
    }

    #[test]
    fn test_field_mapping() {
        let synthesis = synthesize(&results(vec![
            (
                AgentKind::GithubKnowledge,
                json!({"recommendations": ["a", "b"], "patterns_found": 12}),
            ),
            (AgentKind::EliteRepos, json!({"best_practices": ["c"]})),
            (AgentKind::DeepAnalyzer, json!({"quality_repos": [{"name": "r"}], "examples": ["e"]})),
            (AgentKind::ViralInnovation, json!({"innovations": ["i1", {"k": 1}]})),
            (AgentKind::Predictive, json!({"suggestions": ["ignored"]})),
        ]));

        assert_eq!(synthesis.recommendations, vec!["a", "b", "c"]);
        assert_eq!(synthesis.examples, vec![json!({"name": "r"}), json!("e")]);
        assert_eq!(synthesis.innovations, vec!["i1".to_string(), r#"{"k":1}"#.to_string()]);
    }

    #[test]
    fn test_empty_results() {
        assert!(synthesize(&AgentResults::new()).is_empty());
        let synthesis = synthesize(&results(vec![(AgentKind::Predictive, json!({"status": "completed"}))]));
        assert!(synthesis.is_empty());
    }

    #[test]
    fn test_development_response() {
        let synthesis = Synthesis {
            recommendations: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            examples: vec![json!({}), json!({})],
            innovations: Vec::new(),
        };
        assert_eq!(
            generate_response(&task(TaskType::Development), &synthesis),
            "For 'make it fast', I recommend: a; b; c. Reference examples: 2 quality repositories found."
        );
    }

    #[test]
    fn test_development_response_without_examples() {
        let synthesis = Synthesis {
            recommendations: vec!["a".into()],
            ..Default::default()
        };
        assert_eq!(
            generate_response(&task(TaskType::Development), &synthesis),
            "For 'make it fast', I recommend: a"
        );
    }

    #[test]
    fn test_research_response() {
        let synthesis = Synthesis {
            innovations: vec!["x".into(), "y".into(), "z".into()],
            ..Default::default()
        };
        assert_eq!(
            generate_response(&task(TaskType::Research), &synthesis),
            "Research results for 'make it fast': Found 3 breakthrough approaches."
        );

        assert_eq!(
            generate_response(&task(TaskType::Research), &Synthesis::default()),
            "Research results for 'make it fast':"
        );
    }

    #[test]
    fn test_generic_response_counts_everything() {
        let synthesis = Synthesis {
            recommendations: vec!["a".into()],
            examples: vec![json!({})],
            innovations: vec!["b".into()],
        };
        assert_eq!(
            generate_response(&task(TaskType::Optimization), &synthesis),
            "Completed analysis for 'make it fast'. Generated 3 actionable insights."
        );
        assert_eq!(
            generate_response(&task(TaskType::General), &Synthesis::default()),
            "Completed analysis for 'make it fast'. Generated 0 actionable insights."
        );
    }
}
