//! crates/whispers_core/src/fallback.rs
//!
//! Static default content served whenever generation or parsing fails.

use crate::domain::{
    DashboardResult, InsightResult, MoodDistributionEntry, PersonalitySummary, RecommendationItem,
    RecommendationSet,
};

pub const FALLBACK_INSIGHT: &str = "AI insight could not be generated.";

pub fn insight() -> InsightResult {
    InsightResult {
        text: FALLBACK_INSIGHT.to_string(),
    }
}

pub fn recommendations() -> RecommendationSet {
    [
        recommendation(
            "Hunza Valley",
            "Gilgit-Baltistan",
            "Peaceful mountains, perfect for reflective and scenic travel",
            "Local apricots, traditional Hunza cuisine, majestic mountain views",
            "Trekking to Ultar Sar or exploring Baltit Fort",
            "https://via.placeholder.com/400x300?text=Hunza+Valley",
        ),
        recommendation(
            "Skardu",
            "Gilgit-Baltistan",
            "Ideal for nature lovers and those who enjoy calm, serene landscapes",
            "Deosai National Park, Skardu bazaar, trout fishing",
            "Visit Shangrila Resort and take a boat ride on Upper Kachura Lake",
            "https://via.placeholder.com/400x300?text=Skardu",
        ),
        recommendation(
            "Lahore Food Streets",
            "Punjab",
            "Perfect for food enthusiasts and cultural explorers",
            "Street food like golgappa, nihari, and sweets; historic architecture",
            "Walk along Fort Road Food Street and try local delicacies",
            "https://via.placeholder.com/400x300?text=Lahore+Food+Streets",
        ),
    ]
}

pub fn dashboard() -> DashboardResult {
    DashboardResult {
        personality: PersonalitySummary {
            kind: "Traveler".to_string(),
            description: "You love exploring.".to_string(),
            top_vibes: [
                "Adventurous".to_string(),
                "Curious".to_string(),
                "Relaxed".to_string(),
            ],
        },
        top_moods: [
            mood("Happy", 50),
            mood("Excited", 30),
            mood("Calm", 20),
        ],
    }
}

fn recommendation(
    place: &str,
    area: &str,
    reason: &str,
    specialties: &str,
    fun_activity: &str,
    image_url: &str,
) -> RecommendationItem {
    RecommendationItem {
        place: place.to_string(),
        area: area.to_string(),
        reason: reason.to_string(),
        specialties: specialties.to_string(),
        fun_activity: fun_activity.to_string(),
        image_url: image_url.to_string(),
    }
}

fn mood(mood: &str, percentage: u8) -> MoodDistributionEntry {
    MoodDistributionEntry {
        mood: mood.to_string(),
        percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn fallback_recommendations_pass_the_parser() {
        // The fallback must satisfy the same shape rules as AI output.
        let json = serde_json::to_string(&recommendations()).unwrap();
        assert_eq!(parser::parse_recommendations(&json).unwrap(), recommendations());
    }

    #[test]
    fn fallback_dashboard_passes_the_parser() {
        let json = serde_json::to_string(&dashboard()).unwrap();
        assert_eq!(parser::parse_dashboard(&json).unwrap(), dashboard());
    }

    #[test]
    fn fallback_moods_sum_to_one_hundred() {
        let total: u32 = dashboard().top_moods.iter().map(|m| m.percentage as u32).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn fallback_insight_is_not_empty() {
        assert!(!insight().text.trim().is_empty());
    }
}
