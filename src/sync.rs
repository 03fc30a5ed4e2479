//! Pushes local board mutations to the remote service.
//!
//! One local mutation maps to exactly one remote call. Calls are never
//! retried or coalesced, and a failure never rolls the local store back; it
//! is logged and reported on the failure channel instead. The channel is
//! bounded; reports arriving while it is full are logged and dropped.

use crate::domain::{Card, CardId, CardMove, CardStatus, NewCard};
use crate::error::Result;
use crate::remote::Remote;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

/// A single remote call derived from a local mutation
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteChange {
    UpdatePosition {
        card_id: CardId,
        position: f64,
    },
    UpdateStatusAndPosition {
        card_id: CardId,
        status: CardStatus,
        position: f64,
    },
    InsertCard(NewCard),
    DeleteCard(CardId),
}

impl RemoteChange {
    /// Only the moved card is persisted; siblings renumbered by a
    /// same-column move are left as the service last saw them.
    pub fn for_move(planned: &CardMove) -> Self {
        match planned {
            CardMove::WithinColumn {
                card_id, position, ..
            } => Self::UpdatePosition {
                card_id: card_id.clone(),
                position: *position,
            },
            CardMove::AcrossColumns {
                card_id,
                status,
                position,
                ..
            } => Self::UpdateStatusAndPosition {
                card_id: card_id.clone(),
                status: *status,
                position: *position,
            },
        }
    }

    /// Short verb phrase used in user-facing failure messages
    pub fn action(&self) -> &'static str {
        match self {
            Self::UpdatePosition { .. } => "update card position",
            Self::UpdateStatusAndPosition { .. } => "move card",
            Self::InsertCard(_) => "add card",
            Self::DeleteCard(_) => "delete card",
        }
    }
}

/// What the remote call produced
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Updated,
    Inserted(Card),
    Deleted,
}

/// A dispatched call that failed
#[derive(Debug, Clone, PartialEq)]
pub struct SyncFailure {
    pub change: RemoteChange,
    pub message: String,
}

/// Undrained failure reports kept before new ones are dropped
pub const FAILURE_BACKLOG: usize = 64;

#[derive(Clone)]
pub struct SyncLayer {
    remote: Arc<dyn Remote>,
    failures: mpsc::Sender<SyncFailure>,
}

impl SyncLayer {
    /// Creates the layer and the receiving end of its failure channel,
    /// holding up to [`FAILURE_BACKLOG`] reports
    pub fn new(remote: Arc<dyn Remote>) -> (Self, mpsc::Receiver<SyncFailure>) {
        Self::with_failure_capacity(remote, FAILURE_BACKLOG)
    }

    /// Same as [`SyncLayer::new`] with a custom backlog (at least 1)
    pub fn with_failure_capacity(
        remote: Arc<dyn Remote>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<SyncFailure>) {
        let (failures, rx) = mpsc::channel(capacity.max(1));
        (Self { remote, failures }, rx)
    }

    /// Issues the one remote call for `change` and waits for it
    pub async fn push(&self, change: &RemoteChange) -> Result<SyncOutcome> {
        match change {
            RemoteChange::UpdatePosition { card_id, position } => {
                self.remote.update_card_position(card_id, *position).await?;
                Ok(SyncOutcome::Updated)
            }
            RemoteChange::UpdateStatusAndPosition {
                card_id,
                status,
                position,
            } => {
                self.remote
                    .update_card_status_and_position(card_id, *status, *position)
                    .await?;
                Ok(SyncOutcome::Updated)
            }
            RemoteChange::InsertCard(card) => {
                Ok(SyncOutcome::Inserted(self.remote.insert_card(card).await?))
            }
            RemoteChange::DeleteCard(card_id) => {
                self.remote.delete_card(card_id).await?;
                Ok(SyncOutcome::Deleted)
            }
        }
    }

    /// Spawns the remote call and returns without waiting.
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, change: RemoteChange) -> JoinHandle<()> {
        tracing::debug!(action = change.action(), "dispatching remote change");
        let layer = self.clone();
        tokio::spawn(async move {
            if let Err(e) = layer.push(&change).await {
                let message = e.user_message(change.action());
                tracing::warn!("{}", message);
                // A closed channel means nobody is listening; the failure was logged.
                if let Err(TrySendError::Full(dropped)) =
                    layer.failures.try_send(SyncFailure { change, message })
                {
                    tracing::debug!(
                        action = dropped.change.action(),
                        "failure backlog full, dropping report"
                    );
                }
            }
        })
    }
}
