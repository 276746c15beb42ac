//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for TickTally
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TickTallyError {
    /// The hosted table store rejected or failed a request.
    #[error("Store error: {0}")]
    Store(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The local fast-access cache could not be read or written.
    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The owner's current plan does not allow another active project.
    #[error("Plan limit reached: {0}")]
    PlanLimitReached(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TickTallyError {
    /// Stable label for logging and user-facing message selection.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Store(_) => "store",
            Self::Network(_) => "network",
            Self::Config(_) => "config",
            Self::Cache(_) => "cache",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::PlanLimitReached(_) => "plan_limit_reached",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the failure came from talking to the remote store.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Network(_))
    }
}

/// Result type alias for TickTally operations
pub type Result<T> = std::result::Result<T, TickTallyError>;
