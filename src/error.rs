use crate::remote::RemoteError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, KanbanError>;

#[derive(Debug, Error)]
pub enum KanbanError {
    #[error("Authentication required. Sign in first.")]
    AuthenticationRequired,

    #[error("Remote request failed: {0}")]
    Remote(#[from] RemoteError),

    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Invalid card status: {0}")]
    InvalidStatus(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    Other(String),
}

impl KanbanError {
    /// Message shown to the user when `action` fails, e.g. "Failed to add card: ..."
    pub fn user_message(&self, action: &str) -> String {
        let detail = match self {
            Self::Remote(err) => err.to_string(),
            other => other.to_string(),
        };
        format!("Failed to {}: {}", action, detail)
    }

    /// True when the failure came from the remote service rather than local checks
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}
