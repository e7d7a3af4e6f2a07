use thiserror::Error;

use crate::core::types::PlayerId;

/// Every failure this crate can report.
///
/// None of these are retryable: movement planning is deterministic over
/// already-validated snapshots, so an error always points at bad content data
/// or a caller that skipped its own validation.
#[derive(Error, Debug)]
pub enum MovementError {
    /// A tile type, skill, combat tile type or border id is missing from the rules
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Stack input was empty, not co-located, or not owned by one player
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("Owner not found in players list: {0:?}")]
    OwnerLookup(PlayerId),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Rules parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, MovementError>;
