use crate::domain::board::Board;
use crate::domain::card::Card;
use std::cmp::Ordering;

/// Sorts cards in place by ascending position, the column display order.
///
/// The sort is stable, so cards sharing a position keep their relative order.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use kanban_sync_core::domain::sorting::sort_by_position;
/// use kanban_sync_core::{BoardId, Card, CardId, CardStatus};
///
/// let card = |id: &str, position: f64| Card {
///     id: CardId::from(id),
///     title: id.to_string(),
///     description: None,
///     status: CardStatus::Done,
///     position,
///     created_at: Utc::now(),
///     board_id: BoardId::from("b1"),
/// };
///
/// let mut cards = vec![card("b", 2000.0), card("a", 1000.0)];
/// sort_by_position(&mut cards);
/// assert_eq!(cards[0].id.as_str(), "a");
/// ```
pub fn sort_by_position(cards: &mut [Card]) {
    cards.sort_by(|a, b| compare_positions(a.position, b.position));
}

/// Orders boards newest first, the order board listings use
pub fn sort_boards_newest_first(boards: &mut [Board]) {
    boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Total order over float ranks; NaN sorts after every number
fn compare_positions(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}
