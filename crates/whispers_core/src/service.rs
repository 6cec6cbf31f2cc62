//! crates/whispers_core/src/service.rs
//!
//! Orchestrates prompt building, the upstream call, parsing and fallback for
//! the three AI-backed tasks. Every operation succeeds: any generation or
//! parse failure is logged and replaced with static content.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{DashboardResult, InsightRequest, InsightResult, MemoryRecord, RecommendationSet};
use crate::error::CoreResult;
use crate::ports::TextGenerationService;
use crate::{fallback, parser, prompts};

/// Where the content of an [`Outcome`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Generated,
    Fallback,
}

/// A task result together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub source: ContentSource,
}

impl<T> Outcome<T> {
    pub fn is_fallback(&self) -> bool {
        self.source == ContentSource::Fallback
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

#[derive(Debug, Clone, Copy)]
enum Task {
    Insight,
    Recommendations,
    Dashboard,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Task::Insight => "insight",
            Task::Recommendations => "recommendations",
            Task::Dashboard => "dashboard",
        })
    }
}

/// Stateless orchestrator; safe to share across concurrent requests.
#[derive(Clone)]
pub struct InsightService {
    generator: Arc<dyn TextGenerationService>,
}

impl InsightService {
    pub fn new(generator: Arc<dyn TextGenerationService>) -> Self {
        Self { generator }
    }

    /// A short reflective sentence about one memory.
    pub async fn generate_insight(&self, request: &InsightRequest) -> Outcome<InsightResult> {
        let prompt = prompts::build_insight_prompt(request.location(), request.feeling());
        self.run(Task::Insight, prompt, parser::parse_insight, fallback::insight)
            .await
    }

    /// Exactly three destination suggestions derived from the user's history.
    pub async fn generate_recommendations(
        &self,
        memories: &[MemoryRecord],
    ) -> Outcome<RecommendationSet> {
        let prompt = prompts::build_recommendations_prompt(memories);
        self.run(
            Task::Recommendations,
            prompt,
            parser::parse_recommendations,
            fallback::recommendations,
        )
        .await
    }

    /// A travel personality plus the top three moods.
    pub async fn generate_dashboard_summary(
        &self,
        memories: &[MemoryRecord],
    ) -> Outcome<DashboardResult> {
        let prompt = prompts::build_personality_prompt(memories);
        self.run(Task::Dashboard, prompt, parser::parse_dashboard, fallback::dashboard)
            .await
    }

    async fn run<T>(
        &self,
        task: Task,
        prompt: String,
        parse: fn(&str) -> CoreResult<T>,
        fallback: fn() -> T,
    ) -> Outcome<T> {
        debug!(%task, prompt_len = prompt.len(), "Requesting generated content");

        let parsed = match self.generator.complete(&prompt).await {
            Ok(raw) => parse(&raw),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(value) => {
                debug!(%task, "Using generated content");
                Outcome {
                    value,
                    source: ContentSource::Generated,
                }
            }
            Err(e) => {
                warn!(%task, error = %e, "Falling back to default content");
                Outcome {
                    value: fallback(),
                    source: ContentSource::Fallback,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InsightError;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replies with a fixed result and counts how often it was called.
    struct ScriptedGenerator {
        reply: CoreResult<String>,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(InsightError::GenerationFailed("status 500".to_string())),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerationService for ScriptedGenerator {
        async fn complete(&self, _prompt: &str) -> CoreResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn request() -> InsightRequest {
        InsightRequest::new(Some("Hunza"), Some("peaceful")).unwrap()
    }

    fn memories() -> Vec<MemoryRecord> {
        vec![MemoryRecord {
            location: "Skardu".into(),
            feeling: "serene".into(),
            mood: "calm".into(),
            vibe: "nature".into(),
            created_at: Utc::now(),
        }]
    }

    #[tokio::test]
    async fn insight_uses_generated_text() {
        let generator = ScriptedGenerator::ok("Great place, so peaceful!");
        let service = InsightService::new(generator.clone());

        let outcome = service.generate_insight(&request()).await;
        assert_eq!(outcome.source, ContentSource::Generated);
        assert_eq!(outcome.value.text, "Great place, so peaceful!");
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn insight_falls_back_on_generation_failure() {
        let generator = ScriptedGenerator::failing();
        let service = InsightService::new(generator.clone());

        let outcome = service.generate_insight(&request()).await;
        assert!(outcome.is_fallback());
        assert_eq!(outcome.into_inner().text, fallback::FALLBACK_INSIGHT);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn insight_is_idempotent_against_a_deterministic_upstream() {
        let service = InsightService::new(ScriptedGenerator::ok("Same every time."));
        let first = service.generate_insight(&request()).await;
        let second = service.generate_insight(&request()).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn recommendations_fall_back_on_prose() {
        let service = InsightService::new(ScriptedGenerator::ok("I'd suggest visiting Swat."));
        let outcome = service.generate_recommendations(&memories()).await;
        assert!(outcome.is_fallback());
        assert_eq!(outcome.value, fallback::recommendations());
    }

    #[tokio::test]
    async fn recommendations_fall_back_for_empty_history_when_upstream_fails() {
        let service = InsightService::new(ScriptedGenerator::failing());
        let outcome = service.generate_recommendations(&[]).await;
        assert_eq!(outcome.value.len(), 3);
        assert!(outcome.is_fallback());
    }

    #[tokio::test]
    async fn dashboard_uses_generated_summary() {
        let raw = r#"{"personality":{"type":"Wanderer","description":"Drifts.","topVibes":["A","B","C"]},
                      "topMoods":[{"mood":"X","percentage":10},{"mood":"Y","percentage":10},{"mood":"Z","percentage":10}]}"#;
        let service = InsightService::new(ScriptedGenerator::ok(raw));
        let outcome = service.generate_dashboard_summary(&memories()).await;
        assert_eq!(outcome.source, ContentSource::Generated);
        assert_eq!(outcome.value.personality.kind, "Wanderer");
        assert_eq!(outcome.value.top_moods.len(), 3);
    }

    #[tokio::test]
    async fn dashboard_falls_back_on_shape_mismatch() {
        let service = InsightService::new(ScriptedGenerator::ok(r#"{"personality": "fun"}"#));
        let outcome = service.generate_dashboard_summary(&memories()).await;
        assert!(outcome.is_fallback());
        assert_eq!(outcome.value, fallback::dashboard());
    }
}
