use crate::{
    domain::{Board, BoardId, Card, CardId, CardStatus, NewBoard, NewCard},
    error::Result,
};
use async_trait::async_trait;

pub mod error;
pub mod graphql;
pub mod memory;
pub mod queries;

pub use error::{GraphqlError, RemoteError};
pub use graphql::{GraphqlClient, GraphqlRemote, GraphqlResponse};
pub use memory::InMemoryRemote;

/// Remote board service holding the authoritative copy of boards and cards
#[async_trait]
pub trait Remote: Send + Sync {
    /// Lists the signed-in user's boards, newest first.
    /// With `with_card_counts` each board carries its card count.
    async fn fetch_boards(&self, with_card_counts: bool) -> Result<Vec<Board>>;

    /// Creates a board
    async fn create_board(&self, board: &NewBoard) -> Result<Board>;

    /// Deletes every card of a board, returning how many were removed
    async fn delete_board_cards(&self, board_id: &BoardId) -> Result<u64>;

    /// Deletes a board row. Its cards must be deleted first.
    async fn delete_board(&self, board_id: &BoardId) -> Result<()>;

    /// Loads one board's metadata
    async fn fetch_board(&self, board_id: &BoardId) -> Result<Board>;

    /// Loads a board's cards ordered by ascending position
    async fn fetch_board_cards(&self, board_id: &BoardId) -> Result<Vec<Card>>;

    /// Inserts a card and returns it with its server-assigned id
    async fn insert_card(&self, card: &NewCard) -> Result<Card>;

    /// Sets a card's position
    async fn update_card_position(&self, card_id: &CardId, position: f64) -> Result<()>;

    /// Sets a card's status and position together
    async fn update_card_status_and_position(
        &self,
        card_id: &CardId,
        status: CardStatus,
        position: f64,
    ) -> Result<()>;

    /// Deletes a card
    async fn delete_card(&self, card_id: &CardId) -> Result<()>;
}
