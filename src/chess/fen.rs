//! [Forsyth-Edwards Notation] (FEN) import and export for [`Board`].
//!
//! [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context};

use crate::chess::board::Board;
use crate::chess::core::{CastleRights, Piece, Side, Square, BOARD_WIDTH};
use crate::chess::error::ParseError;

const RANK_SEPARATOR: char = '/';
const FIELD_COUNT: usize = 6;

impl Board {
    /// Parses board from Forsyth-Edwards Notation.
    ///
    /// FEN ::=
    ///       Piece Placement
    ///   ' ' Side to move
    ///   ' ' Castling ability
    ///   ' ' En passant target square
    ///   ' ' Halfmove clock
    ///   ' ' Fullmove counter
    ///
    /// NOTE: This expects properly-formatted inputs: no extra symbols or
    /// additional whitespace. Use [`Board::try_from`] for cleaning up the
    /// input if it is coming from untrusted source and is likely to contain
    /// extra symbols.
    ///
    /// # Errors
    ///
    /// Any deviation from the format is reported as a [`ParseError`].
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let parts: Vec<&str> = input.split(' ').collect();
        if parts.len() != FIELD_COUNT {
            bail!(ParseError::FieldCount(parts.len()));
        }
        let mut result = Self::empty();
        parse_placement(&mut result, parts[0])
            .with_context(|| format!("incorrect FEN: {input}"))?;
        result.side_to_move = Side::try_from(parts[1])?;
        result.castling = CastleRights::try_from(parts[2])?;
        result.en_passant = match parts[3] {
            "-" => None,
            value => Some(Square::try_from(value)?),
        };
        result.halfmove_clock = parse_number(parts[4], "halfmove clock")?;
        result.fullmove_counter = parse_number(parts[5], "fullmove counter")?;
        log::debug!("parsed position {result}");
        Ok(result)
    }
}

// Ranks are described starting with rank 8 and ending with rank 1. Within
// each rank squares go from file a to file h: a letter for a piece, a digit
// for a run of empty squares.
fn parse_placement(board: &mut Board, placement: &str) -> anyhow::Result<()> {
    let ranks: Vec<&str> = placement.split(RANK_SEPARATOR).collect();
    if ranks.len() != BOARD_WIDTH as usize {
        bail!(ParseError::InvalidPlacement(format!(
            "expected {BOARD_WIDTH} ranks, got {}",
            ranks.len()
        )));
    }
    for (rank, rank_fen) in (0..BOARD_WIDTH).rev().zip(ranks) {
        let mut file: i8 = 0;
        for symbol in rank_fen.chars() {
            if file >= BOARD_WIDTH {
                bail!(ParseError::InvalidPlacement(format!(
                    "rank {rank_fen} is longer than {BOARD_WIDTH} squares"
                )));
            }
            match symbol {
                '1'..='8' => {
                    #[allow(clippy::cast_possible_wrap)]
                    let run = (symbol as u8 - b'0') as i8;
                    file += run;
                },
                _ => {
                    let (kind, side) = Piece::parse_glyph(symbol)?;
                    let _ = board.set(Square::new(rank, file), kind, side);
                    file += 1;
                },
            }
        }
        if file != BOARD_WIDTH {
            bail!(ParseError::InvalidPlacement(format!(
                "rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of length {file}"
            )));
        }
    }
    Ok(())
}

fn parse_number<T: FromStr>(value: &str, field: &'static str) -> anyhow::Result<T> {
    let invalid = || ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    };
    if value.is_empty() || !value.bytes().all(|c| c.is_ascii_digit()) {
        bail!(invalid());
    }
    match value.parse::<T>() {
        Ok(number) => Ok(number),
        Err(_) => bail!(invalid()),
    }
}

impl TryFrom<&str> for Board {
    type Error = anyhow::Error;

    /// Cleans up the input (surrounding whitespace and an optional "fen "
    /// prefix) and parses it with [`Board::from_fen`].
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        Self::from_fen(input.strip_prefix("fen ").unwrap_or(input))
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::try_from(s)
    }
}

impl fmt::Display for Board {
    /// Prints board in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..BOARD_WIDTH).rev() {
            let mut empty_squares = 0i32;
            for file in 0..BOARD_WIDTH {
                if let Some(piece) = self.at(Square::new(rank, file)) {
                    if empty_squares != 0 {
                        write!(f, "{empty_squares}")?;
                        empty_squares = 0;
                    }
                    write!(f, "{piece}")?;
                } else {
                    empty_squares += 1;
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != 0 {
                write!(f, "{RANK_SEPARATOR}")?;
            }
        }
        write!(f, " {} {} ", &self.side_to_move, &self.castling)?;
        match self.en_passant {
            Some(square) => write!(f, "{square} "),
            None => write!(f, "- "),
        }?;
        write!(f, "{} {}", &self.halfmove_clock, &self.fullmove_counter)
    }
}
