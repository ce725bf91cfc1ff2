//! Chess position, its rules and encodings.
//!
//! ```
//! use garth::chess::board::Board;
//!
//! let board = Board::starting();
//! let moves = board.generate_moves();
//! assert_eq!(moves.len(), 20);
//! let next = board.apply_move(&moves[0]).unwrap();
//! assert_eq!(Board::unpack(&next.pack().unwrap()).unwrap(), next);
//! ```

pub mod board;
pub mod core;
pub mod error;
pub mod moves;
pub mod pack;
pub mod rules;

mod apply;
mod fen;
