//! Error types for world generation

use thiserror::Error;

/// Errors that can occur during world generation or queries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The minimum-distance constraint could not be met within the draw budget
    #[error("point sampling exhausted: placed {accepted} of {requested} points in {draws} draws")]
    SamplingExhausted {
        requested: usize,
        accepted: usize,
        draws: usize,
    },

    /// The convex hull of the sampled points could not be built
    #[error("convex hull construction failed: {0}")]
    HullConstructionFailed(String),

    /// Hull construction kept failing after every retry
    #[error("generation failed after {attempts} attempts: {last}")]
    GenerationFailed {
        attempts: usize,
        last: Box<WorldError>,
    },

    /// A Node/Corner/Edge invariant does not hold
    #[error("topology inconsistency: {0}")]
    TopologyInconsistency(String),

    /// Requested node index does not exist
    #[error("node not found: {0}")]
    NodeNotFound(usize),
}

/// Result type alias for world operations
pub type Result<T> = std::result::Result<T, WorldError>;
