use crate::{
    domain::{Board, BoardId, Card, CardId, CardStatus, NewBoard, NewCard},
    error::Result,
    remote::{InMemoryRemote, Remote, RemoteError},
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-memory remote that records every call and can be switched to failing
#[derive(Default)]
pub struct RecordingRemote {
    inner: InMemoryRemote,
    calls: Mutex<Vec<&'static str>>,
    failing: AtomicBool,
}

impl RecordingRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &InMemoryRemote {
        &self.inner
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn fail_all(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn seed_card(
        &self,
        board_id: &BoardId,
        title: &str,
        status: CardStatus,
        position: f64,
    ) -> Card {
        let card = NewCard::new(title, status, board_id.clone())
            .unwrap()
            .with_position(position);
        self.inner.insert_card(&card).await.unwrap()
    }

    fn record(&self, call: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::Network("connection refused".to_string()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl Remote for RecordingRemote {
    async fn fetch_boards(&self, with_card_counts: bool) -> Result<Vec<Board>> {
        self.record("fetch_boards")?;
        self.inner.fetch_boards(with_card_counts).await
    }

    async fn create_board(&self, board: &NewBoard) -> Result<Board> {
        self.record("create_board")?;
        self.inner.create_board(board).await
    }

    async fn delete_board_cards(&self, board_id: &BoardId) -> Result<u64> {
        self.record("delete_board_cards")?;
        self.inner.delete_board_cards(board_id).await
    }

    async fn delete_board(&self, board_id: &BoardId) -> Result<()> {
        self.record("delete_board")?;
        self.inner.delete_board(board_id).await
    }

    async fn fetch_board(&self, board_id: &BoardId) -> Result<Board> {
        self.record("fetch_board")?;
        self.inner.fetch_board(board_id).await
    }

    async fn fetch_board_cards(&self, board_id: &BoardId) -> Result<Vec<Card>> {
        self.record("fetch_board_cards")?;
        self.inner.fetch_board_cards(board_id).await
    }

    async fn insert_card(&self, card: &NewCard) -> Result<Card> {
        self.record("insert_card")?;
        self.inner.insert_card(card).await
    }

    async fn update_card_position(&self, card_id: &CardId, position: f64) -> Result<()> {
        self.record("update_card_position")?;
        self.inner.update_card_position(card_id, position).await
    }

    async fn update_card_status_and_position(
        &self,
        card_id: &CardId,
        status: CardStatus,
        position: f64,
    ) -> Result<()> {
        self.record("update_card_status_and_position")?;
        self.inner
            .update_card_status_and_position(card_id, status, position)
            .await
    }

    async fn delete_card(&self, card_id: &CardId) -> Result<()> {
        self.record("delete_card")?;
        self.inner.delete_card(card_id).await
    }
}
