use crate::domain::board::BoardId;
use crate::error::KanbanError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Opaque card identifier assigned by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CardId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Workflow stage of a card. Each status owns exactly one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Stuck,
    NotStarted,
    WorkingOnIt,
    Done,
    Test,
}

impl CardStatus {
    /// Wire value used by the remote service
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stuck => "stuck",
            Self::NotStarted => "not_started",
            Self::WorkingOnIt => "working_on_it",
            Self::Done => "done",
            Self::Test => "test",
        }
    }

    /// All statuses in board display order
    pub fn all() -> &'static [CardStatus] {
        &[
            Self::Stuck,
            Self::NotStarted,
            Self::WorkingOnIt,
            Self::Done,
            Self::Test,
        ]
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stuck => write!(f, "Stuck"),
            Self::NotStarted => write!(f, "Not Started"),
            Self::WorkingOnIt => write!(f, "Working On It"),
            Self::Done => write!(f, "Done"),
            Self::Test => write!(f, "Test"),
        }
    }
}

impl FromStr for CardStatus {
    type Err = KanbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stuck" => Ok(Self::Stuck),
            "not_started" => Ok(Self::NotStarted),
            "working_on_it" => Ok(Self::WorkingOnIt),
            "done" => Ok(Self::Done),
            "test" => Ok(Self::Test),
            _ => Err(KanbanError::InvalidStatus(s.to_string())),
        }
    }
}

/// A task card on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: CardStatus,
    /// Sort rank within the column, not an index
    pub position: f64,
    pub created_at: DateTime<Utc>,
    pub board_id: BoardId,
}

impl Card {
    /// Returns a copy placed at `position` under `status`
    pub fn relocated(&self, status: CardStatus, position: f64) -> Self {
        Self {
            status,
            position,
            ..self.clone()
        }
    }

    /// Returns a copy with a new position, status unchanged
    pub fn repositioned(&self, position: f64) -> Self {
        self.relocated(self.status, position)
    }
}

/// Insert payload for a card that does not exist remotely yet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCard {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: CardStatus,
    pub position: f64,
    pub board_id: BoardId,
}

impl NewCard {
    /// Builds an insert payload positioned by the current wall clock.
    ///
    /// The title is trimmed and must not be empty.
    pub fn new(
        title: impl AsRef<str>,
        status: CardStatus,
        board_id: BoardId,
    ) -> Result<Self, KanbanError> {
        let title = validate_title(title.as_ref())?;
        Ok(Self {
            title,
            description: None,
            status,
            position: Utc::now().timestamp_millis() as f64,
            board_id,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        let trimmed = description.trim();
        self.description = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn with_position(mut self, position: f64) -> Self {
        self.position = position;
        self
    }
}

/// Trims a card title, rejecting blank input
pub fn validate_title(title: &str) -> Result<String, KanbanError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(KanbanError::Validation(
            "card title must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
