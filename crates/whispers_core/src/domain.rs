//! crates/whispers_core/src/domain.rs
//!
//! Defines the core data structures for the application: the stored travel
//! memories and users, and the value types produced by the insight pipeline.
//! The insight output types carry serde derives because they double as the
//! JSON shape exchanged with the generative upstream and the HTTP clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InsightError;

//=========================================================================================
// Users and Memories
//=========================================================================================

/// Represents a registered user - used throughout the app.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// A travel memory as it is about to be stored.
#[derive(Debug, Clone)]
pub struct NewMemory {
    pub user_id: Uuid,
    pub photo: String,
    pub location: String,
    pub feeling: String,
    pub mood: String,
    pub vibe: String,
}

/// A stored travel memory belonging to one user.
#[derive(Debug, Clone)]
pub struct Memory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub photo: String,
    pub location: String,
    pub feeling: String,
    pub mood: String,
    pub vibe: String,
    pub created_at: DateTime<Utc>,
}

impl Memory {
    /// The read-only projection of this memory consumed by the insight pipeline.
    pub fn to_record(&self) -> MemoryRecord {
        MemoryRecord {
            location: self.location.clone(),
            feeling: self.feeling.clone(),
            mood: self.mood.clone(),
            vibe: self.vibe.clone(),
            created_at: self.created_at,
        }
    }
}

/// One row of the public feed: a memory joined with its author and like count.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub id: Uuid,
    pub photo: String,
    pub location: String,
    pub feeling: String,
    pub mood: String,
    pub vibe: String,
    pub username: String,
    pub like_count: i64,
}

/// The result of toggling a like on a memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked,
    Unliked,
}

//=========================================================================================
// Insight Pipeline Inputs
//=========================================================================================

/// The slice of a memory the insight pipeline reads. Order within a sequence
/// carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRecord {
    pub location: String,
    pub feeling: String,
    pub mood: String,
    pub vibe: String,
    pub created_at: DateTime<Utc>,
}

/// Input for the single-memory insight task. Both fields are non-blank once
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightRequest {
    location: String,
    feeling: String,
}

impl InsightRequest {
    /// Validates the caller's input, rejecting missing or blank fields.
    pub fn new(location: Option<&str>, feeling: Option<&str>) -> Result<Self, InsightError> {
        match (non_blank(location), non_blank(feeling)) {
            (Some(location), Some(feeling)) => Ok(Self {
                location: location.to_string(),
                feeling: feeling.to_string(),
            }),
            _ => Err(InsightError::CallerContractViolation(
                "Location and feeling are required".to_string(),
            )),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn feeling(&self) -> &str {
        &self.feeling
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

//=========================================================================================
// Insight Pipeline Outputs
//=========================================================================================

/// A short reflective sentence about one memory. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightResult {
    pub text: String,
}

/// A suggested destination. Field names match the JSON keys the upstream is
/// asked to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub place: String,
    pub area: String,
    pub reason: String,
    pub specialties: String,
    pub fun_activity: String,
    pub image_url: String,
}

/// Exactly three recommendations, whichever path produced them.
pub type RecommendationSet = [RecommendationItem; 3];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalitySummary {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(rename = "topVibes")]
    pub top_vibes: [String; 3],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodDistributionEntry {
    pub mood: String,
    /// In `0..=100`. AI-sourced distributions are not renormalised, so the
    /// three entries need not sum to 100.
    pub percentage: u8,
}

pub type MoodDistribution = [MoodDistributionEntry; 3];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardResult {
    pub personality: PersonalitySummary,
    #[serde(rename = "topMoods")]
    pub top_moods: MoodDistribution,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insight_request_requires_both_fields() {
        assert!(InsightRequest::new(Some("Hunza"), Some("calm")).is_ok());
        assert!(matches!(
            InsightRequest::new(None, Some("calm")),
            Err(InsightError::CallerContractViolation(_))
        ));
        assert!(matches!(
            InsightRequest::new(Some("Hunza"), Some("   ")),
            Err(InsightError::CallerContractViolation(_))
        ));
    }

    #[test]
    fn insight_request_trims_input() {
        let request = InsightRequest::new(Some("  Skardu "), Some(" at peace\n")).unwrap();
        assert_eq!(request.location(), "Skardu");
        assert_eq!(request.feeling(), "at peace");
    }

    #[test]
    fn dashboard_serializes_with_client_keys() {
        let dashboard = DashboardResult {
            personality: PersonalitySummary {
                kind: "Explorer".into(),
                description: "Seeks new horizons.".into(),
                top_vibes: ["Adventurous".into(), "Calm".into(), "Cultural".into()],
            },
            top_moods: [
                MoodDistributionEntry { mood: "Happy".into(), percentage: 40 },
                MoodDistributionEntry { mood: "Calm".into(), percentage: 35 },
                MoodDistributionEntry { mood: "Excited".into(), percentage: 25 },
            ],
        };
        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["personality"]["type"], "Explorer");
        assert_eq!(json["personality"]["topVibes"][2], "Cultural");
        assert_eq!(json["topMoods"][0]["percentage"], 40);
    }
}
