//! End-to-end runs of the insight pipeline against a mock chat-completion
//! upstream.

use api_lib::adapters::ChatCompletionAdapter;
use chrono::Utc;
use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use whispers_core::fallback;
use whispers_core::{ContentSource, InsightRequest, InsightService, MemoryRecord};

mod support;
use support::generation_config;

const PATH: &str = "/v1/chat/completions";

fn service(server: &MockServer, timeout: Duration) -> InsightService {
    let adapter =
        ChatCompletionAdapter::new(generation_config(server.url(PATH), timeout)).unwrap();
    InsightService::new(Arc::new(adapter))
}

async fn reply_with_content(server: &MockServer, content: &str) {
    server
        .mock_async(|when, then| {
            when.method(POST).path(PATH);
            then.status(200)
                .json_body(json!({"choices": [{"message": {"content": content}}]}));
        })
        .await;
}

fn request() -> InsightRequest {
    InsightRequest::new(Some("Hunza Valley"), Some("peaceful")).unwrap()
}

fn memories() -> Vec<MemoryRecord> {
    vec![
        MemoryRecord {
            location: "Skardu".into(),
            feeling: "serene".into(),
            mood: "calm".into(),
            vibe: "nature".into(),
            created_at: Utc::now(),
        },
        MemoryRecord {
            location: "Lahore".into(),
            feeling: "hungry".into(),
            mood: "excited".into(),
            vibe: "food".into(),
            created_at: Utc::now(),
        },
    ]
}

fn recommendation(place: &str) -> Value {
    json!({
        "place": place,
        "area": "Khyber Pakhtunkhwa",
        "reason": "Green valleys for a calm traveller",
        "specialties": "Trout, waterfalls",
        "fun_activity": "Hike to a lake",
        "image_url": format!("https://via.placeholder.com/400x300?text={place}")
    })
}

fn recommendations(n: usize) -> String {
    let items: Vec<Value> = (0..n).map(|i| recommendation(&format!("Place {i}"))).collect();
    Value::Array(items).to_string()
}

#[tokio::test]
async fn insight_returns_upstream_text() {
    let server = MockServer::start_async().await;
    reply_with_content(&server, "Great place, so peaceful!").await;

    let outcome = service(&server, Duration::from_secs(5))
        .generate_insight(&request())
        .await;
    assert_eq!(outcome.source, ContentSource::Generated);
    assert_eq!(outcome.value.text, "Great place, so peaceful!");
}

#[tokio::test]
async fn insight_falls_back_on_server_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(PATH);
            then.status(500);
        })
        .await;

    let outcome = service(&server, Duration::from_secs(5))
        .generate_insight(&request())
        .await;
    assert!(outcome.is_fallback());
    assert_eq!(outcome.value.text, fallback::FALLBACK_INSIGHT);
}

#[tokio::test]
async fn insight_falls_back_on_timeout() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(PATH);
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(json!({"choices": [{"message": {"content": "late"}}]}));
        })
        .await;

    let outcome = service(&server, Duration::from_millis(200))
        .generate_insight(&request())
        .await;
    assert!(outcome.is_fallback());
    assert!(!outcome.value.text.is_empty());
}

#[tokio::test]
async fn insight_is_stable_for_identical_input() {
    let server = MockServer::start_async().await;
    reply_with_content(&server, "Mountains remember you.").await;
    let service = service(&server, Duration::from_secs(5));

    let first = service.generate_insight(&request()).await;
    let second = service.generate_insight(&request()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn well_formed_recommendations_are_returned_verbatim() {
    let server = MockServer::start_async().await;
    let raw = recommendations(3);
    reply_with_content(&server, &raw).await;

    let outcome = service(&server, Duration::from_secs(5))
        .generate_recommendations(&memories())
        .await;
    assert_eq!(outcome.source, ContentSource::Generated);
    let expected: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(serde_json::to_value(&outcome.value).unwrap(), expected);
}

#[tokio::test]
async fn prose_recommendations_fall_back() {
    let server = MockServer::start_async().await;
    reply_with_content(
        &server,
        "You would love Swat, Naran and Murree for their cool breeze!",
    )
    .await;

    let outcome = service(&server, Duration::from_secs(5))
        .generate_recommendations(&memories())
        .await;
    assert!(outcome.is_fallback());
    assert_eq!(outcome.value, fallback::recommendations());
}

#[tokio::test]
async fn wrong_sized_recommendation_lists_fall_back() {
    for n in [2, 4] {
        let server = MockServer::start_async().await;
        reply_with_content(&server, &recommendations(n)).await;

        let outcome = service(&server, Duration::from_secs(5))
            .generate_recommendations(&memories())
            .await;
        assert!(outcome.is_fallback(), "{n} items were accepted");
        assert_eq!(outcome.value, fallback::recommendations());
    }
}

#[tokio::test]
async fn recommendations_for_empty_history_always_have_three_complete_items() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(PATH);
            then.status(503);
        })
        .await;

    let outcome = service(&server, Duration::from_secs(5))
        .generate_recommendations(&[])
        .await;
    assert_eq!(outcome.value.len(), 3);
    for item in &outcome.value {
        for field in [
            &item.place,
            &item.area,
            &item.reason,
            &item.specialties,
            &item.fun_activity,
            &item.image_url,
        ] {
            assert!(!field.is_empty());
        }
    }
}

#[tokio::test]
async fn dashboard_summary_from_upstream() {
    let server = MockServer::start_async().await;
    let raw = json!({
        "personality": {
            "type": "Serene Explorer",
            "description": "You chase quiet landscapes.",
            "topVibes": ["Calm", "Nature", "Foodie"]
        },
        "topMoods": [
            {"mood": "Calm", "percentage": 45},
            {"mood": "Excited", "percentage": 35},
            {"mood": "Happy", "percentage": 20}
        ]
    })
    .to_string();
    reply_with_content(&server, &raw).await;

    let outcome = service(&server, Duration::from_secs(5))
        .generate_dashboard_summary(&memories())
        .await;
    assert_eq!(outcome.source, ContentSource::Generated);
    assert_eq!(outcome.value.personality.kind, "Serene Explorer");
    assert_eq!(outcome.value.personality.top_vibes.len(), 3);
    assert_eq!(outcome.value.top_moods[0].percentage, 45);
}

#[tokio::test]
async fn malformed_dashboard_summary_falls_back() {
    let server = MockServer::start_async().await;
    reply_with_content(&server, r#"{"personality": {"type": "Explorer"}}"#).await;

    let outcome = service(&server, Duration::from_secs(5))
        .generate_dashboard_summary(&memories())
        .await;
    assert!(outcome.is_fallback());
    assert_eq!(outcome.value.top_moods.len(), 3);
    assert_eq!(outcome.value.personality.top_vibes.len(), 3);
}
