use crate::domain::card::{Card, CardId, CardStatus};
use crate::domain::sorting::sort_by_position;
use crate::error::KanbanError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque board identifier assigned by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(String);

impl BoardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BoardId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BoardId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Board metadata as returned by the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Derived from the remote aggregate; only present when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_count: Option<u64>,
}

/// Insert payload for a new board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBoard {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewBoard {
    pub fn new(name: impl AsRef<str>) -> Result<Self, KanbanError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(KanbanError::Validation(
                "board name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            description: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        let trimmed = description.trim();
        self.description = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }
}

/// Identifier of one of the fixed board columns
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A status column and its cards in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    pub status: CardStatus,
    pub cards: Vec<Card>,
}

impl Column {
    pub fn new(id: impl Into<String>, status: CardStatus) -> Self {
        Self {
            id: ColumnId::new(id),
            name: status.to_string(),
            status,
            cards: Vec::new(),
        }
    }

    /// Returns a copy of this column holding `cards`
    pub fn with_cards(&self, cards: Vec<Card>) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            status: self.status,
            cards,
        }
    }

    pub fn index_of(&self, card_id: &CardId) -> Option<usize> {
        self.cards.iter().position(|c| &c.id == card_id)
    }

    /// Largest position in the column, `None` when empty
    pub fn max_position(&self) -> Option<f64> {
        self.cards.iter().map(|c| c.position).reduce(f64::max)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// The five fixed columns of an open board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardColumns {
    columns: Vec<Column>,
}

impl Default for BoardColumns {
    fn default() -> Self {
        Self {
            columns: CardStatus::all()
                .iter()
                .enumerate()
                .map(|(i, status)| Column::new((i + 1).to_string(), *status))
                .collect(),
        }
    }
}

impl BoardColumns {
    /// Groups cards into their status columns, ordered by ascending position
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut board = Self::default();
        for card in cards {
            if let Some(column) = board.columns.iter_mut().find(|c| c.status == card.status) {
                column.cards.push(card);
            }
        }
        for column in &mut board.columns {
            sort_by_position(&mut column.cards);
        }
        board
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    /// Gets the column for a status
    pub fn column_for_status(&self, status: CardStatus) -> Option<&Column> {
        self.columns.iter().find(|c| c.status == status)
    }

    /// Locates a card, returning its column and index within that column
    pub fn find_card(&self, card_id: &CardId) -> Option<(&Column, usize)> {
        self.columns
            .iter()
            .find_map(|col| col.index_of(card_id).map(|idx| (col, idx)))
    }

    pub fn card(&self, card_id: &CardId) -> Option<&Card> {
        self.find_card(card_id).map(|(col, idx)| &col.cards[idx])
    }

    pub fn total_cards(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    /// Returns a new board with the given columns swapped in by id
    pub fn replacing(&self, replacements: &[Column]) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .map(|col| {
                    replacements
                        .iter()
                        .find(|r| r.id == col.id)
                        .cloned()
                        .unwrap_or_else(|| col.clone())
                })
                .collect(),
        }
    }
}
