//! crates/whispers_core/src/error.rs
//!
//! Failure taxonomy of the insight pipeline.

/// Errors raised while producing AI-backed content.
///
/// `GenerationFailed`, `ParseFailed` and `ShapeMismatch` never leave
/// `InsightService`: they are replaced by fallback content. Only
/// `CallerContractViolation` is meant for the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InsightError {
    /// Network error, timeout, non-success status or an unexpected envelope.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
    /// The generated text was not valid structured data.
    #[error("Failed to parse generated content: {0}")]
    ParseFailed(String),
    /// The generated data decoded but did not have the required shape.
    #[error("Generated content has the wrong shape: {0}")]
    ShapeMismatch(String),
    /// Required input was missing or blank.
    #[error("Invalid request: {0}")]
    CallerContractViolation(String),
}

/// A convenience type alias for `Result<T, InsightError>`.
pub type CoreResult<T> = Result<T, InsightError>;
