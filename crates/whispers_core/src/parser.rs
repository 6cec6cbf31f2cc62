//! crates/whispers_core/src/parser.rs
//!
//! Turns raw upstream text into typed results.
//!
//! Structured tasks go through two phases: the text is first decoded as JSON
//! (`ParseFailed` on error), then the decoded value is checked against the
//! task's shape (`ShapeMismatch` on error). Nothing is ever clamped, padded,
//! truncated or reordered; a list with the wrong length is a mismatch.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{
    DashboardResult, InsightResult, MoodDistributionEntry, PersonalitySummary, RecommendationItem,
    RecommendationSet,
};
use crate::error::{CoreResult, InsightError};

const EXPECTED_ITEMS: usize = 3;

/// The single-insight reply is free text; only blank replies are rejected.
pub fn parse_insight(raw: &str) -> CoreResult<InsightResult> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(InsightError::ShapeMismatch("insight text is empty".to_string()));
    }
    Ok(InsightResult { text: text.to_string() })
}

pub fn parse_recommendations(raw: &str) -> CoreResult<RecommendationSet> {
    let value = decode(raw)?;
    if !value.is_array() {
        return Err(mismatch("recommendations must be a JSON array"));
    }
    let items: Vec<RecommendationItem> = serde_json::from_value(value)
        .map_err(|e| mismatch(format!("recommendation item: {}", e)))?;

    let set: RecommendationSet = items.try_into().map_err(|items: Vec<RecommendationItem>| {
        mismatch(format!(
            "expected {} recommendations, got {}",
            EXPECTED_ITEMS,
            items.len()
        ))
    })?;

    for (i, item) in set.iter().enumerate() {
        let fields = [
            ("place", &item.place),
            ("area", &item.area),
            ("reason", &item.reason),
            ("specialties", &item.specialties),
            ("fun_activity", &item.fun_activity),
            ("image_url", &item.image_url),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(mismatch(format!("recommendation {} has an empty `{}`", i, name)));
        }
    }
    Ok(set)
}

#[derive(Deserialize)]
struct DashboardWire {
    personality: PersonalityWire,
    #[serde(rename = "topMoods")]
    top_moods: Vec<MoodDistributionEntry>,
}

#[derive(Deserialize)]
struct PersonalityWire {
    #[serde(rename = "type")]
    kind: String,
    description: String,
    #[serde(rename = "topVibes")]
    top_vibes: Vec<String>,
}

pub fn parse_dashboard(raw: &str) -> CoreResult<DashboardResult> {
    let value = decode(raw)?;
    if !value.is_object() {
        return Err(mismatch("personality reply must be a JSON object"));
    }
    let wire: DashboardWire = serde_json::from_value(value).map_err(|e| mismatch(e.to_string()))?;

    if wire.personality.kind.trim().is_empty() {
        return Err(mismatch("personality type is empty"));
    }
    let top_vibes: [String; 3] = wire.personality.top_vibes.try_into().map_err(|v: Vec<String>| {
        mismatch(format!("expected {} topVibes, got {}", EXPECTED_ITEMS, v.len()))
    })?;
    if top_vibes.iter().any(|v| v.trim().is_empty()) {
        return Err(mismatch("topVibes contains an empty entry"));
    }

    let top_moods: [MoodDistributionEntry; 3] =
        wire.top_moods.try_into().map_err(|m: Vec<MoodDistributionEntry>| {
            mismatch(format!("expected {} topMoods, got {}", EXPECTED_ITEMS, m.len()))
        })?;
    for entry in &top_moods {
        if entry.mood.trim().is_empty() {
            return Err(mismatch("topMoods contains an empty mood"));
        }
        if entry.percentage > 100 {
            return Err(mismatch(format!(
                "percentage {} for mood `{}` is out of range",
                entry.percentage, entry.mood
            )));
        }
    }

    Ok(DashboardResult {
        personality: PersonalitySummary {
            kind: wire.personality.kind,
            description: wire.personality.description,
            top_vibes,
        },
        top_moods,
    })
}

/// Decodes the reply as JSON, tolerating surrounding whitespace and a single
/// markdown code fence wrapping the whole reply.
fn decode(raw: &str) -> CoreResult<Value> {
    serde_json::from_str(strip_code_fence(raw.trim()))
        .map_err(|e| InsightError::ParseFailed(e.to_string()))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    match body.find('\n') {
        Some(nl) => body[nl + 1..].trim(),
        None => text,
    }
}

fn mismatch(msg: impl Into<String>) -> InsightError {
    InsightError::ShapeMismatch(msg.into())
}
