//! Typed failure kinds carried inside [`anyhow::Error`] by the fallible
//! operations of [`crate::chess`].
//!
//! Every public API returns [`anyhow::Result`] and attaches context as the
//! error travels up; callers that need to react to a specific failure can
//! recover the kind with [`anyhow::Error::downcast_ref`]:
//!
//! ```
//! use garth::chess::board::Board;
//! use garth::chess::error::ParseError;
//!
//! let error = Board::from_fen("8/8/8/8/8/8/8/8 x - - 0 1").unwrap_err();
//! assert!(matches!(
//!     error.downcast_ref::<ParseError>(),
//!     Some(ParseError::InvalidSide(_))
//! ));
//! ```

use thiserror::Error;

/// Malformed position notation or square strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The notation does not consist of exactly six space-separated fields.
    #[error("expected 6 space-separated fields, got {0}")]
    FieldCount(usize),
    /// A letter in the placement field is not one of "KQBNRPkqbnrp".
    #[error("piece symbol should be within \"KQBNRPkqbnrp\", got '{0}'")]
    InvalidPiece(char),
    /// The placement field does not describe exactly 8 ranks of 8 squares.
    #[error("invalid piece placement: {0}")]
    InvalidPlacement(String),
    /// Side to move is neither "w" nor "b".
    #[error("side to move should be 'w' or 'b', got '{0}'")]
    InvalidSide(String),
    /// Castling field contains something other than "-" or a subset of
    /// "KQkq".
    #[error("unknown castle rights: {0}")]
    InvalidCastling(String),
    /// Square is not a file letter followed by a rank digit.
    #[error("square should be a file within 'a'..='h' and a rank within '1'..='8', got '{0}'")]
    InvalidSquare(String),
    /// Clock field is not a non-negative integer in range.
    #[error("{field} should be a non-negative integer, got '{value}'")]
    InvalidNumber {
        /// Name of the offending field.
        field: &'static str,
        /// Raw input.
        value: String,
    },
}

/// Failures of the binary board and move encodings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The packed board has room for 32 piece nibbles only.
    #[error("packed board holds at most 32 pieces, got {0}")]
    TooManyPieces(usize),
    /// A counter does not fit into its 8-bit slot.
    #[error("{field} does not fit into 8 bits: {value}")]
    FieldOverflow {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was attempted.
        value: u32,
    },
    /// The encoded data violates the layout invariants.
    #[error("corrupt encoding: {0}")]
    CorruptEncoding(String),
}
