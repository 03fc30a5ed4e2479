//! Board list and open-board workflows built on the remote, store, and sync layers

pub mod boards;
pub mod session;

pub use boards::BoardDirectory;
pub use session::{BoardSession, Dispatched};
