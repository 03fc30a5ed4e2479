pub mod board;
pub mod card;
pub mod reorder;
pub mod sorting;

pub use board::{Board, BoardColumns, BoardId, Column, ColumnId, NewBoard};
pub use card::{Card, CardId, CardStatus, NewCard};
pub use reorder::{plan_move, CardMove, DragEnd, DropTarget};
pub use sorting::{sort_boards_newest_first, sort_by_position};
