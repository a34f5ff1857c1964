pub mod board;
pub mod game;
pub mod movegen;
pub mod types;

pub use board::{Board, Piece, PieceId};
pub use game::{Capture, Match, MatchSnapshot, MoveRecord};
pub use movegen::MoveContext;
pub use types::*;
