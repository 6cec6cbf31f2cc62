//! crates/whispers_core/src/prompts.rs
//!
//! Renders travel data into instructions for the generative upstream.
//! Building a prompt cannot fail.

use crate::domain::MemoryRecord;

const RECOMMENDATIONS_TEMPLATE: &str = r#"You are a travel AI assistant. A user has shared the following travel memories:
{memories}

Based on these experiences, suggest exactly 3 new travel destinations the user might enjoy.
For each destination provide:
- place: the place name
- area: the area or region
- reason: why this place suits the user's travel personality and emotional vibes
- specialties: unique cultural or local specialties (food, activities, landmarks, festivals)
- fun_activity: one fun activity or experience the user should not miss
- image_url: an image URL, or a placeholder such as https://via.placeholder.com/400x300?text=Place+Name

Respond ONLY with a JSON array of exactly 3 objects using only these keys, with no text before or after it:

[
  {
    "place": "Beautiful Place Name",
    "area": "Region or City",
    "reason": "Why this place is perfect for the user",
    "specialties": "Local food, activities, landmarks, culture",
    "fun_activity": "A fun thing to do here",
    "image_url": "https://via.placeholder.com/400x300?text=Place+Name"
  }
]"#;

const PERSONALITY_TEMPLATE: &str = r#"Analyze the travel memories of the user:
{memories}

1. Give a travel personality type and a short description.
2. Give the top 3 vibes (like adventurous, calm, cultural).
3. Give the top 3 moods with a percentage distribution (integers from 0 to 100).

Respond ONLY with a JSON object using only these keys, with no text before or after it:

{
  "personality": {
    "type": "...",
    "description": "...",
    "topVibes": ["...", "...", "..."]
  },
  "topMoods": [
    {"mood": "...", "percentage": 40},
    {"mood": "...", "percentage": 35},
    {"mood": "...", "percentage": 25}
  ]
}"#;

const NO_MEMORIES: &str = "(no memories shared yet)";

/// Prompt for a short free-text insight about a single memory.
pub fn build_insight_prompt(location: &str, feeling: &str) -> String {
    format!(
        "Location: {}\nFeeling: {}\nProvide a 2-3 line emotional travel insight.",
        location, feeling
    )
}

/// Prompt asking for exactly three destination recommendations as a JSON array.
pub fn build_recommendations_prompt(memories: &[MemoryRecord]) -> String {
    RECOMMENDATIONS_TEMPLATE.replace("{memories}", &summarize_memories(memories))
}

/// Prompt asking for a personality summary and a three-entry mood distribution.
pub fn build_personality_prompt(memories: &[MemoryRecord]) -> String {
    PERSONALITY_TEMPLATE.replace("{memories}", &summarize_memories(memories))
}

/// One `location - Feeling: .., Mood: .., Vibe: ..` line per memory.
fn summarize_memories(memories: &[MemoryRecord]) -> String {
    if memories.is_empty() {
        return NO_MEMORIES.to_string();
    }
    memories
        .iter()
        .map(|m| {
            format!(
                "{} - Feeling: {}, Mood: {}, Vibe: {}",
                m.location, m.feeling, m.mood, m.vibe
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
