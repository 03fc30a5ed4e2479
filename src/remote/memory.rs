use crate::{
    domain::{
        sort_boards_newest_first, sort_by_position, Board, BoardId, Card, CardId, CardStatus,
        NewBoard, NewCard,
    },
    error::{KanbanError, Result},
    remote::{
        error::{GraphqlError, GraphqlErrorExtensions, RemoteError},
        Remote,
    },
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct State {
    boards: HashMap<BoardId, Board>,
    cards: HashMap<CardId, Card>,
}

/// Process-local board service with the same rules as the hosted one:
/// a board cannot be deleted while it still has cards.
#[derive(Debug, Default)]
pub struct InMemoryRemote {
    state: RwLock<State>,
    owner: Option<String>,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps created boards with `user_id`
    pub fn with_owner(mut self, user_id: impl Into<String>) -> Self {
        self.owner = Some(user_id.into());
        self
    }

    /// Looks a card up directly, bypassing the remote API
    pub async fn card(&self, card_id: &CardId) -> Option<Card> {
        self.state.read().await.cards.get(card_id).cloned()
    }

    pub async fn card_count(&self) -> usize {
        self.state.read().await.cards.len()
    }

    fn new_id() -> String {
        Uuid::new_v4().to_string()
    }
}

#[async_trait]
impl Remote for InMemoryRemote {
    async fn fetch_boards(&self, with_card_counts: bool) -> Result<Vec<Board>> {
        let state = self.state.read().await;
        let mut boards: Vec<Board> = state
            .boards
            .values()
            .map(|board| {
                let count = with_card_counts.then(|| {
                    state
                        .cards
                        .values()
                        .filter(|c| c.board_id == board.id)
                        .count() as u64
                });
                Board {
                    card_count: count,
                    ..board.clone()
                }
            })
            .collect();
        sort_boards_newest_first(&mut boards);
        Ok(boards)
    }

    async fn create_board(&self, board: &NewBoard) -> Result<Board> {
        let now = Utc::now();
        let created = Board {
            id: BoardId::new(Self::new_id()),
            name: board.name.clone(),
            description: board.description.clone(),
            created_at: now,
            updated_at: Some(now),
            user_id: self.owner.clone(),
            card_count: None,
        };
        self.state
            .write()
            .await
            .boards
            .insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn delete_board_cards(&self, board_id: &BoardId) -> Result<u64> {
        let mut state = self.state.write().await;
        let before = state.cards.len();
        state.cards.retain(|_, c| &c.board_id != board_id);
        Ok((before - state.cards.len()) as u64)
    }

    async fn delete_board(&self, board_id: &BoardId) -> Result<()> {
        let mut state = self.state.write().await;
        if state.cards.values().any(|c| &c.board_id == board_id) {
            return Err(RemoteError::Graphql(vec![GraphqlError {
                message: "Foreign key violation. update or delete on table \"boards\" violates foreign key constraint on table \"cards\"".to_string(),
                extensions: Some(GraphqlErrorExtensions {
                    code: Some("constraint-violation".to_string()),
                    path: None,
                }),
            }])
            .into());
        }
        state
            .boards
            .remove(board_id)
            .map(|_| ())
            .ok_or_else(|| KanbanError::BoardNotFound(board_id.to_string()))
    }

    async fn fetch_board(&self, board_id: &BoardId) -> Result<Board> {
        self.state
            .read()
            .await
            .boards
            .get(board_id)
            .cloned()
            .ok_or_else(|| KanbanError::BoardNotFound(board_id.to_string()))
    }

    async fn fetch_board_cards(&self, board_id: &BoardId) -> Result<Vec<Card>> {
        let state = self.state.read().await;
        let mut cards: Vec<Card> = state
            .cards
            .values()
            .filter(|c| &c.board_id == board_id)
            .cloned()
            .collect();
        sort_by_position(&mut cards);
        Ok(cards)
    }

    async fn insert_card(&self, card: &NewCard) -> Result<Card> {
        let mut state = self.state.write().await;
        if !state.boards.contains_key(&card.board_id) {
            return Err(KanbanError::BoardNotFound(card.board_id.to_string()));
        }
        let created = Card {
            id: CardId::new(Self::new_id()),
            title: card.title.clone(),
            description: card.description.clone(),
            status: card.status,
            position: card.position,
            created_at: Utc::now(),
            board_id: card.board_id.clone(),
        };
        state.cards.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn update_card_position(&self, card_id: &CardId, position: f64) -> Result<()> {
        let mut state = self.state.write().await;
        let card = state
            .cards
            .get_mut(card_id)
            .ok_or_else(|| KanbanError::CardNotFound(card_id.to_string()))?;
        card.position = position;
        Ok(())
    }

    async fn update_card_status_and_position(
        &self,
        card_id: &CardId,
        status: CardStatus,
        position: f64,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let card = state
            .cards
            .get_mut(card_id)
            .ok_or_else(|| KanbanError::CardNotFound(card_id.to_string()))?;
        card.status = status;
        card.position = position;
        Ok(())
    }

    async fn delete_card(&self, card_id: &CardId) -> Result<()> {
        self.state
            .write()
            .await
            .cards
            .remove(card_id)
            .map(|_| ())
            .ok_or_else(|| KanbanError::CardNotFound(card_id.to_string()))
    }
}
