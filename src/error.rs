//! Error types for brawlbrief.

use thiserror::Error;

/// Library-level error type for brawlbrief operations.
#[derive(Error, Debug)]
pub enum BriefError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transcript unavailable: {0}")]
    Transcript(String),

    #[error("Extraction oracle error: {0}")]
    Oracle(String),

    #[error("Oracle response violated the analysis schema: {0}")]
    SchemaViolation(String),

    #[error("Missing prompt placeholders: {}", .0.join(", "))]
    MissingPlaceholders(Vec<String>),

    #[error("Blob storage error: {0}")]
    Storage(String),

    #[error("RAG index error: {0}")]
    Index(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for brawlbrief operations.
pub type Result<T> = std::result::Result<T, BriefError>;
