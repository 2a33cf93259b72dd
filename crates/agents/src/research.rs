//! Proactive research - background topic research feeding the knowledge cache.
//!
//! Started alongside every orchestrated command. Findings land in the
//! knowledge cache keyed by topic and are never part of a task's result.

use maestro_knowledge::KnowledgeCache;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Topics the research loop knows how to look into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchTopic {
    UnityBestPractices,
    VrOptimizationTechniques,
    MetaSdkUpdates,
    SpeechRecognitionOptimizations,
    TtsImprovements,
    AudioProcessingLibraries,
    LatestAiModels,
    MlOptimizationTechniques,
    AiInferenceSpeed,
}

impl ResearchTopic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnityBestPractices => "unity_best_practices",
            Self::VrOptimizationTechniques => "vr_optimization_techniques",
            Self::MetaSdkUpdates => "meta_sdk_updates",
            Self::SpeechRecognitionOptimizations => "speech_recognition_optimizations",
            Self::TtsImprovements => "tts_improvements",
            Self::AudioProcessingLibraries => "audio_processing_libraries",
            Self::LatestAiModels => "latest_ai_models",
            Self::MlOptimizationTechniques => "ml_optimization_techniques",
            Self::AiInferenceSpeed => "ai_inference_speed",
        }
    }

    /// Curated findings for this topic. Topics without a source yield an
    /// empty object, which is still cached.
    pub fn findings(&self) -> Value {
        match self {
            Self::UnityBestPractices => json!({
                "unity_patterns": [
                    "Pool frequently spawned objects instead of instantiating per frame",
                    "Use ScriptableObjects for shared configuration data",
                    "Keep per-frame work out of Update with event-driven components",
                    "Profile on target hardware before optimizing",
                ]
            }),
            Self::SpeechRecognitionOptimizations => json!({
                "speech_optimizations": [
                    "Use WebRTC VAD for voice activity detection",
                    "Implement streaming recognition for real-time processing",
                    "Use model quantization for faster inference",
                    "Batch audio processing for efficiency",
                    "Implement noise reduction preprocessing",
                ]
            }),
            Self::LatestAiModels => json!({
                "latest_models": [
                    {
                        "name": "phi-3-mini",
                        "type": "language_model",
                        "size": "3.8B",
                        "strengths": ["fast_inference", "low_memory", "good_reasoning"],
                    },
                    {
                        "name": "whisper-large-v3",
                        "type": "speech_recognition",
                        "strengths": ["multilingual", "accurate", "robust"],
                    },
                ]
            }),
            _ => json!({}),
        }
    }
}

/// Pick research topics for a command. Only the first matching family is used.
pub fn select_topics(command: &str) -> Vec<ResearchTopic> {
    let lower = command.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has(&["unity", "vr"]) {
        vec![
            ResearchTopic::UnityBestPractices,
            ResearchTopic::VrOptimizationTechniques,
            ResearchTopic::MetaSdkUpdates,
        ]
    } else if has(&["voice", "audio"]) {
        vec![
            ResearchTopic::SpeechRecognitionOptimizations,
            ResearchTopic::TtsImprovements,
            ResearchTopic::AudioProcessingLibraries,
        ]
    } else if has(&["ai", "ml"]) {
        vec![
            ResearchTopic::LatestAiModels,
            ResearchTopic::MlOptimizationTechniques,
            ResearchTopic::AiInferenceSpeed,
        ]
    } else {
        Vec::new()
    }
}

/// Research each topic in its own task and cache the findings.
pub fn spawn_research(
    topics: Vec<ResearchTopic>,
    cache: Arc<KnowledgeCache>,
) -> Vec<JoinHandle<()>> {
    if !topics.is_empty() {
        info!(topics = ?topics, "Starting proactive research");
    }

    topics
        .into_iter()
        .map(|topic| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                let findings = topic.findings();
                debug!(topic = topic.as_str(), "Research finished");
                cache.insert(topic.as_str(), findings);
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_unity_topics() {
        let topics = select_topics("implement a Unity VR hand tracking system");
        assert_eq!(topics.len(), 3);
        assert_eq!(topics[0], ResearchTopic::UnityBestPractices);
    }

    #[test]
    fn test_unity_wins_over_audio() {
        let topics = select_topics("unity audio mixer");
        assert_eq!(topics[0], ResearchTopic::UnityBestPractices);
    }

    #[test]
    fn test_select_audio_topics() {
        let topics = select_topics("improve voice latency");
        assert_eq!(topics[0], ResearchTopic::SpeechRecognitionOptimizations);
    }

    #[test]
    fn test_no_topics() {
        assert!(select_topics("qwzx plorb").is_empty());
    }

    #[test]
    fn test_topic_names_match_serde() {
        let json = serde_json::to_string(&ResearchTopic::MetaSdkUpdates).unwrap();
        assert_eq!(json, "\"meta_sdk_updates\"");
    }

    #[tokio::test]
    async fn test_spawn_research_fills_cache() {
        let cache = Arc::new(KnowledgeCache::default());
        let handles = spawn_research(select_topics("speed up ml inference"), Arc::clone(&cache));
        for h in handles {
            h.await.unwrap();
        }

        assert_eq!(cache.len(), 3);
        let models = cache.results("latest_ai_models").unwrap();
        assert_eq!(models["latest_models"].as_array().unwrap().len(), 2);
        assert_eq!(cache.results("ai_inference_speed"), Some(json!({})));
    }
}
