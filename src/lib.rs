//! twenty48: the 2048 sliding tile puzzle.
//!
//! The [`board::Board`] engine owns a 4x4 grid and the score. It slides and merges
//! tiles ([`board::Board::shift`]), places new tiles ([`board::Board::spawn`]) and
//! reports every tile movement as a [`board::Transition`] so a frontend can animate a
//! move without reconstructing it. [`game::Game`] adds the turn discipline on top.
//!
//! ```
//! use twenty48::{Board, Direction};
//!
//! let mut board = Board::seeded(42);
//! let shift = board.shift(Direction::Left);
//!
//! if shift.moved() {
//!     board.spawn().unwrap();
//! }
//!
//! assert!(board.grid().count_empty() <= 14);
//! ```
pub mod board;
pub mod error;
pub mod game;
pub mod grid;
pub mod input;
pub mod line;
pub mod render;

#[cfg(feature = "cli")]
pub mod app;
#[cfg(feature = "cli")]
pub mod cli;

pub use board::{Board, Shift, Spawn, Transition};
pub use error::EngineError;
pub use game::{Game, Phase, Turn};
pub use grid::{Direction, Grid, Position};
