use crate::context::KanbanContext;
use crate::domain::{Board, BoardId, NewBoard};
use crate::error::Result;
use std::sync::Arc;

/// The signed-in user's list of boards
pub struct BoardDirectory {
    ctx: Arc<KanbanContext>,
}

impl BoardDirectory {
    pub fn new(ctx: Arc<KanbanContext>) -> Self {
        Self { ctx }
    }

    /// Boards newest first, each with its card count when asked
    pub async fn list(&self, with_card_counts: bool) -> Result<Vec<Board>> {
        self.ctx.require_user().await?;
        self.ctx.remote().fetch_boards(with_card_counts).await
    }

    /// Creates a board. Blank names are rejected before anything is sent.
    pub async fn create(&self, name: &str, description: Option<&str>) -> Result<Board> {
        let mut board = NewBoard::new(name)?;
        if let Some(description) = description {
            board = board.with_description(description);
        }
        self.ctx.require_user().await?;

        let created = self.ctx.remote().create_board(&board).await?;
        tracing::info!(board_id = created.id.as_str(), "created board");
        Ok(created)
    }

    /// Deletes a board's cards, then the board itself.
    /// Returns how many cards went with it.
    pub async fn delete(&self, board_id: &BoardId) -> Result<u64> {
        self.ctx.require_user().await?;
        let remote = self.ctx.remote();

        let removed = remote.delete_board_cards(board_id).await?;
        remote.delete_board(board_id).await?;
        tracing::info!(
            board_id = board_id.as_str(),
            cards = removed,
            "deleted board"
        );
        Ok(removed)
    }
}
