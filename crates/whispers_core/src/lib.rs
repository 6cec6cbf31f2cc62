pub mod domain;
pub mod error;
pub mod fallback;
pub mod parser;
pub mod ports;
pub mod prompts;
pub mod service;

pub use domain::{
    DashboardResult, FeedEntry, InsightRequest, InsightResult, LikeOutcome, Memory, MemoryRecord,
    MoodDistribution, MoodDistributionEntry, NewMemory, PersonalitySummary, RecommendationItem,
    RecommendationSet, User, UserCredentials,
};
pub use error::{CoreResult, InsightError};
pub use ports::{DatabaseService, PortError, PortResult, TextGenerationService};
pub use service::{ContentSource, InsightService, Outcome};
