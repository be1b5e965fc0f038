//! Error types for feagen

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FeagenError>;

/// Main error type for feagen
#[derive(Debug, Error)]
pub enum FeagenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid mode: '{0}' (expected 'skip' or 'append')")]
    InvalidMode(String),

    #[error("Explicit feature list is empty")]
    EmptyFeatureSet,

    #[error("Writer '{writer}' does not support feature '{feature}'")]
    UnsupportedFeature { writer: String, feature: String },

    #[error("Unknown feature writer: {0}")]
    UnknownWriter(String),

    #[error("Invalid anchor '{anchor}' in glyph '{glyph}': {reason}")]
    InvalidAnchor {
        glyph: String,
        anchor: String,
        reason: String,
    },

    #[error("Writer '{writer}' failed: {reason}")]
    WriterFailed { writer: String, reason: String },

    #[error("Insert marker has rules before and after, feature {feature} cannot be inserted.")]
    AmbiguousInsertionMarker { feature: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
