//! Game model: coordinates, moves, board projection, decay, and state.

pub mod coord;
pub mod decay;
pub mod moves;
pub mod state;
pub mod types;

pub use coord::Coord;
pub use moves::Move;
pub use state::{GameSnapshot, GameState, GameStatus, MoveView};
pub use types::{Board, Cell, Symbol};
