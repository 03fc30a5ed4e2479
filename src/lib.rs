//! # Kanban Sync Core
//!
//! Client-side core of a multi-board kanban application backed by a hosted
//! GraphQL service.
//!
//! This crate provides the board and card model, the drag-and-drop reorder
//! engine, a local column store, and the layer that mirrors each local
//! mutation to the remote service, without any dependency on a specific UI.

pub mod auth;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod remote;
pub mod service;
pub mod store;
pub mod sync;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use auth::{AuthProvider, Session, SessionAuth, User};
pub use config::ClientConfig;
pub use context::KanbanContext;
pub use domain::{
    Board, BoardColumns, BoardId, Card, CardId, CardMove, CardStatus, Column, ColumnId, DragEnd,
    DropTarget, NewBoard, NewCard,
};
pub use error::{KanbanError, Result};
pub use remote::{Remote, RemoteError};
pub use service::{BoardDirectory, BoardSession};
pub use store::BoardStore;
pub use sync::{RemoteChange, SyncFailure, SyncLayer};
