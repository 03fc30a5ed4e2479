//! Positional reordering of cards after a drag gesture.
//!
//! Everything here is pure: the functions read the current [`BoardColumns`]
//! and describe the replacement columns without touching any store. Positions
//! are float ranks. A move inside one column rebuilds the whole column with
//! fixed spacing; a move into another column slots the card in by arithmetic
//! on its neighbour and never renumbers the siblings.

use crate::domain::board::{BoardColumns, Column, ColumnId};
use crate::domain::card::{Card, CardId, CardStatus};
use crate::error::{KanbanError, Result};
use serde::{Deserialize, Serialize};

/// Spacing between consecutive positions after a renumber, and the gap left
/// after the last card when appending.
pub const POSITION_STEP: f64 = 1000.0;

/// Distance below the target card when dropping in front of it
pub const INSERT_BEFORE_OFFSET: f64 = 500.0;

/// Where a dragged card was released
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DropTarget {
    /// Released over another card; `column_id` is the column that card is shown in
    Card { card_id: CardId, column_id: ColumnId },
    /// Released over the empty area of a column
    Column { column_id: ColumnId },
}

impl DropTarget {
    pub fn card(card_id: impl Into<CardId>, column_id: impl Into<String>) -> Self {
        Self::Card {
            card_id: card_id.into(),
            column_id: ColumnId::new(column_id),
        }
    }

    pub fn column(column_id: impl Into<String>) -> Self {
        Self::Column {
            column_id: ColumnId::new(column_id),
        }
    }

    pub fn column_id(&self) -> &ColumnId {
        match self {
            Self::Card { column_id, .. } | Self::Column { column_id } => column_id,
        }
    }
}

/// End of a drag gesture as reported by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEnd {
    pub card_id: CardId,
    /// `None` when the card was released outside any drop zone
    pub target: Option<DropTarget>,
}

impl DragEnd {
    pub fn new(card_id: impl Into<CardId>, target: Option<DropTarget>) -> Self {
        Self {
            card_id: card_id.into(),
            target,
        }
    }
}

/// Result of a drag that changes the board
#[derive(Debug, Clone, PartialEq)]
pub enum CardMove {
    /// Reordered inside one column; every card in `column` was renumbered
    WithinColumn {
        card_id: CardId,
        position: f64,
        column: Column,
    },
    /// Moved into another column; only the moved card got a new rank
    AcrossColumns {
        card_id: CardId,
        status: CardStatus,
        position: f64,
        source: Column,
        target: Column,
    },
}

impl CardMove {
    pub fn card_id(&self) -> &CardId {
        match self {
            Self::WithinColumn { card_id, .. } | Self::AcrossColumns { card_id, .. } => card_id,
        }
    }

    /// New position of the moved card
    pub fn position(&self) -> f64 {
        match self {
            Self::WithinColumn { position, .. } | Self::AcrossColumns { position, .. } => {
                *position
            }
        }
    }

    /// Status of the moved card after the move
    pub fn status(&self) -> CardStatus {
        match self {
            Self::WithinColumn { column, .. } => column.status,
            Self::AcrossColumns { status, .. } => *status,
        }
    }

    pub fn changes_status(&self) -> bool {
        matches!(self, Self::AcrossColumns { .. })
    }

    /// Replacement columns to swap into the board
    pub fn columns(&self) -> Vec<&Column> {
        match self {
            Self::WithinColumn { column, .. } => vec![column],
            Self::AcrossColumns { source, target, .. } => vec![source, target],
        }
    }
}

/// Computes the effect of dropping `card_id` on `target`.
///
/// Returns `Ok(None)` when the drop leaves the board unchanged: the card was
/// dropped on itself, on its own column's empty area, or on a card id the
/// source column does not hold.
pub fn plan_move(
    board: &BoardColumns,
    card_id: &CardId,
    target: &DropTarget,
) -> Result<Option<CardMove>> {
    let (source, from) = board
        .find_card(card_id)
        .ok_or_else(|| KanbanError::CardNotFound(card_id.to_string()))?;
    let target_column = board
        .column(target.column_id())
        .ok_or_else(|| KanbanError::ColumnNotFound(target.column_id().to_string()))?;
    let same_column = source.id == target_column.id;

    let planned = match target {
        DropTarget::Card {
            card_id: target_card,
            ..
        } if same_column => source
            .index_of(target_card)
            .filter(|to| *to != from)
            .map(|to| {
                let column = reorder_within(source, from, to);
                let position = column.cards[to].position;
                CardMove::WithinColumn {
                    card_id: card_id.clone(),
                    position,
                    column,
                }
            }),
        DropTarget::Card {
            card_id: target_card,
            ..
        } => Some(move_across(
            source,
            from,
            target_column,
            target_column.index_of(target_card),
        )),
        DropTarget::Column { .. } if same_column => None,
        DropTarget::Column { .. } => Some(move_across(source, from, target_column, None)),
    };

    Ok(planned)
}

/// Moves the card at `from` to index `to` and renumbers the column to
/// `(index + 1) * POSITION_STEP`.
pub fn reorder_within(column: &Column, from: usize, to: usize) -> Column {
    let mut cards = column.cards.clone();
    if from < cards.len() {
        let moved = cards.remove(from);
        let to = to.min(cards.len());
        cards.insert(to, moved);
    }
    column.with_cards(renumber(&cards))
}

/// Position for a card appended after every card in `column`
pub fn append_position(column: &Column) -> f64 {
    column
        .max_position()
        .map_or(POSITION_STEP, |max| max + POSITION_STEP)
}

/// Position for a card dropped in front of `column.cards[index]`,
/// `None` when `index` is past the end of the column
pub fn insert_before_position(column: &Column, index: usize) -> Option<f64> {
    column
        .cards
        .get(index)
        .map(|card| card.position - INSERT_BEFORE_OFFSET)
}

fn renumber(cards: &[Card]) -> Vec<Card> {
    cards
        .iter()
        .enumerate()
        .map(|(i, card)| card.repositioned((i + 1) as f64 * POSITION_STEP))
        .collect()
}

fn move_across(
    source: &Column,
    from: usize,
    target: &Column,
    target_index: Option<usize>,
) -> CardMove {
    let dragged = &source.cards[from];
    let slot = target_index
        .and_then(|index| insert_before_position(target, index).map(|position| (index, position)));
    let position = slot.map_or_else(|| append_position(target), |(_, position)| position);
    let moved = dragged.relocated(target.status, position);

    let mut source_cards = source.cards.clone();
    source_cards.remove(from);

    let mut target_cards = target.cards.clone();
    match slot {
        Some((index, _)) => target_cards.insert(index, moved),
        None => target_cards.push(moved),
    }

    CardMove::AcrossColumns {
        card_id: dragged.id.clone(),
        status: target.status,
        position,
        source: source.with_cards(source_cards),
        target: target.with_cards(target_cards),
    }
}
