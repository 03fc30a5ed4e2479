use crate::context::KanbanContext;
use crate::domain::{
    plan_move, Board, BoardColumns, BoardId, Card, CardId, CardMove, CardStatus, DragEnd, NewCard,
};
use crate::error::{KanbanError, Result};
use crate::store::BoardStore;
use crate::sync::{RemoteChange, SyncFailure, SyncLayer, SyncOutcome};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A local mutation and the remote call sent for it
#[derive(Debug)]
pub struct Dispatched {
    pub planned: CardMove,
    pub task: JoinHandle<()>,
}

/// One open board.
///
/// Owns the local column store. Drag and delete update the store first and
/// then send a single remote call in the background; failures show up in
/// [`BoardSession::drain_failures`] and never undo the local change. Callers
/// should drain regularly; past [`crate::sync::FAILURE_BACKLOG`] undrained
/// reports, newer ones are dropped. Adding a card waits for the service
/// because the new card's id comes from it.
pub struct BoardSession {
    ctx: Arc<KanbanContext>,
    board: Board,
    store: BoardStore,
    sync: SyncLayer,
    failures: mpsc::Receiver<SyncFailure>,
    dragging: Option<Card>,
}

impl BoardSession {
    /// Loads the board and its cards. Requires a signed-in user.
    pub async fn open(ctx: Arc<KanbanContext>, board_id: &BoardId) -> Result<Self> {
        ctx.require_user().await?;
        let (board, columns) = load(&ctx, board_id).await?;
        tracing::info!(
            board_id = board_id.as_str(),
            cards = columns.total_cards(),
            "opened board"
        );

        let (sync, failures) = SyncLayer::new(Arc::clone(ctx.remote()));
        Ok(Self {
            ctx,
            board,
            store: BoardStore::new(columns),
            sync,
            failures,
            dragging: None,
        })
    }

    /// Refetches the board and replaces every local column
    pub async fn refresh(&mut self) -> Result<()> {
        let (board, columns) = load(&self.ctx, &self.board.id).await?;
        self.board = board;
        self.store.replace_all(columns);
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Snapshot for rendering
    pub fn columns(&self) -> Arc<BoardColumns> {
        self.store.snapshot()
    }

    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// Remembers the card being dragged so it can be shown as an overlay
    pub fn drag_start(&mut self, card_id: &CardId) -> Option<&Card> {
        self.dragging = self.store.find_card(card_id).cloned();
        self.dragging.as_ref()
    }

    pub fn dragging(&self) -> Option<&Card> {
        self.dragging.as_ref()
    }

    /// Applies a drop locally and sends the matching remote call.
    ///
    /// Returns `None` when the drop changes nothing; no call is sent then.
    pub fn drag_end(&mut self, event: DragEnd) -> Result<Option<Dispatched>> {
        self.dragging = None;
        let Some(target) = event.target else {
            return Ok(None);
        };

        let Some(planned) = plan_move(&self.store.snapshot(), &event.card_id, &target)? else {
            return Ok(None);
        };

        self.store.apply(&planned);
        let task = self.sync.dispatch(RemoteChange::for_move(&planned));
        Ok(Some(Dispatched { planned, task }))
    }

    /// Creates a card at the end of its status column.
    ///
    /// Blank titles fail with `Validation` before any call is made.
    pub async fn add_card(&mut self, title: &str, status: CardStatus) -> Result<Card> {
        let new_card = NewCard::new(title, status, self.board.id.clone())?;

        match self.sync.push(&RemoteChange::InsertCard(new_card)).await? {
            SyncOutcome::Inserted(card) => {
                self.store.add_card(card.clone());
                Ok(card)
            }
            other => Err(KanbanError::Other(format!(
                "unexpected outcome for insert: {:?}",
                other
            ))),
        }
    }

    /// Removes a card locally and sends the delete in the background
    pub fn delete_card(&mut self, card_id: &CardId) -> Result<JoinHandle<()>> {
        self.store
            .remove_card(card_id)
            .ok_or_else(|| KanbanError::CardNotFound(card_id.to_string()))?;
        Ok(self.sync.dispatch(RemoteChange::DeleteCard(card_id.clone())))
    }

    /// Failures reported by background calls since the last drain
    pub fn drain_failures(&mut self) -> Vec<SyncFailure> {
        let mut drained = Vec::new();
        while let Ok(failure) = self.failures.try_recv() {
            drained.push(failure);
        }
        drained
    }
}

async fn load(ctx: &KanbanContext, board_id: &BoardId) -> Result<(Board, BoardColumns)> {
    let remote = ctx.remote();
    let board = remote.fetch_board(board_id).await?;
    let cards = remote.fetch_board_cards(board_id).await?;
    Ok((board, BoardColumns::from_cards(cards)))
}
