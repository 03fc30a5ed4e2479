//! Local copy of the open board's columns.
//!
//! Every mutation builds a fresh [`BoardColumns`] and swaps it in behind a new
//! `Arc`, so a snapshot handed to the presentation layer never changes under
//! it. Comparing revisions (or `Arc` pointers) is enough to detect a change.

use crate::domain::{BoardColumns, Card, CardId, CardMove, Column};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct BoardStore {
    columns: Arc<BoardColumns>,
    revision: u64,
}

impl BoardStore {
    pub fn new(columns: BoardColumns) -> Self {
        Self {
            columns: Arc::new(columns),
            revision: 0,
        }
    }

    /// Current immutable snapshot
    pub fn snapshot(&self) -> Arc<BoardColumns> {
        Arc::clone(&self.columns)
    }

    /// Bumped by every mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn find_card(&self, card_id: &CardId) -> Option<&Card> {
        self.columns.card(card_id)
    }

    /// Replaces every column, e.g. after fetching the board
    pub fn replace_all(&mut self, columns: BoardColumns) {
        self.commit(columns);
    }

    /// Swaps in a column reordered by the reorder engine
    pub fn move_within_column(&mut self, column: Column) {
        let next = self.columns.replacing(&[column]);
        self.commit(next);
    }

    /// Swaps in the source and target columns of a cross-column move
    pub fn move_across_columns(&mut self, source: Column, target: Column) {
        let next = self.columns.replacing(&[source, target]);
        self.commit(next);
    }

    /// Applies a planned move through the matching operation
    pub fn apply(&mut self, planned: &CardMove) {
        match planned {
            CardMove::WithinColumn { column, .. } => self.move_within_column(column.clone()),
            CardMove::AcrossColumns { source, target, .. } => {
                self.move_across_columns(source.clone(), target.clone())
            }
        }
    }

    /// Appends `card` to the end of its status column
    pub fn add_card(&mut self, card: Card) {
        let Some(column) = self.columns.column_for_status(card.status) else {
            return;
        };
        let mut cards = column.cards.clone();
        cards.push(card);
        let next = self.columns.replacing(&[column.with_cards(cards)]);
        self.commit(next);
    }

    /// Removes a card from the one column holding it.
    /// Returns the removed card, or `None` if no column held it.
    pub fn remove_card(&mut self, card_id: &CardId) -> Option<Card> {
        let (column, index) = self.columns.find_card(card_id)?;
        let mut cards = column.cards.clone();
        let removed = cards.remove(index);
        let next = self.columns.replacing(&[column.with_cards(cards)]);
        self.commit(next);
        Some(removed)
    }

    fn commit(&mut self, columns: BoardColumns) {
        self.columns = Arc::new(columns);
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{plan_move, BoardId, CardStatus, DropTarget};
    use chrono::Utc;

    fn card(id: &str, status: CardStatus, position: f64) -> Card {
        Card {
            id: CardId::from(id),
            title: id.to_string(),
            description: None,
            status,
            position,
            created_at: Utc::now(),
            board_id: BoardId::from("b1"),
        }
    }

    fn store() -> BoardStore {
        BoardStore::new(BoardColumns::from_cards(vec![
            card("a", CardStatus::NotStarted, 1000.0),
            card("b", CardStatus::Done, 1000.0),
        ]))
    }

    #[test]
    fn test_snapshots_are_immutable() {
        let mut store = store();
        let before = store.snapshot();

        store.remove_card(&CardId::from("a"));

        assert_eq!(before.total_cards(), 2);
        assert_eq!(store.snapshot().total_cards(), 1);
        assert!(!Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn test_remove_card_touches_one_column() {
        let mut store = store();

        let removed = store.remove_card(&CardId::from("b")).unwrap();
        assert_eq!(removed.status, CardStatus::Done);
        assert!(store.snapshot().column_for_status(CardStatus::Done).unwrap().is_empty());
        assert_eq!(
            store
                .snapshot()
                .column_for_status(CardStatus::NotStarted)
                .unwrap()
                .len(),
            1
        );
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_remove_missing_card_changes_nothing() {
        let mut store = store();
        assert!(store.remove_card(&CardId::from("zzz")).is_none());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_add_card_appends_to_status_column() {
        let mut store = store();
        store.add_card(card("c", CardStatus::Done, 1.0));

        let snapshot = store.snapshot();
        let done = snapshot.column_for_status(CardStatus::Done).unwrap();
        let ids: Vec<&str> = done.cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_apply_cross_column_move() {
        let mut store = store();
        let done = store
            .snapshot()
            .column_for_status(CardStatus::Done)
            .unwrap()
            .id
            .clone();

        let planned = plan_move(
            &store.snapshot(),
            &CardId::from("a"),
            &DropTarget::Column { column_id: done },
        )
        .unwrap()
        .unwrap();
        store.apply(&planned);

        let moved = store.find_card(&CardId::from("a")).unwrap();
        assert_eq!(moved.status, CardStatus::Done);
        assert_eq!(moved.position, 2000.0);
        assert!(store
            .snapshot()
            .column_for_status(CardStatus::NotStarted)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_replace_all_bumps_revision() {
        let mut store = BoardStore::default();
        assert_eq!(store.snapshot().total_cards(), 0);

        store.replace_all(BoardColumns::from_cards(vec![card("x", CardStatus::Test, 5.0)]));
        assert_eq!(store.revision(), 1);
        assert!(store.find_card(&CardId::from("x")).is_some());
    }
}
