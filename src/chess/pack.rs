//! Fixed-size 32-byte binary encoding of a [`Board`].
//!
//! | bytes  | content                                   |
//! | ------ | ----------------------------------------- |
//! | 0..8   | game information word, big-endian         |
//! | 8..16  | occupancy bitmap, big-endian              |
//! | 16..32 | piece nibbles, two per byte, high first   |
//!
//! Game information word (bit 0 is the least significant one):
//!
//! | bits   | field                                  |
//! | ------ | -------------------------------------- |
//! | 0..28  | zero                                   |
//! | 28     | white may castle queenside             |
//! | 29     | white may castle kingside              |
//! | 30     | black may castle queenside             |
//! | 31     | black may castle kingside              |
//! | 32     | side to move, 1 for black              |
//! | 33..40 | en passant square code, 64 if none     |
//! | 40..48 | halfmove clock                         |
//! | 48..56 | fullmove counter                       |
//! | 56..64 | number of pieces                       |
//!
//! Both the occupancy bits and the nibbles follow the same scan order: rank 8
//! to rank 1, file a to file h. Occupancy bit 63 is a8 and bit 0 is h1.

use std::fmt;

use anyhow::{bail, Context};
use byteorder::{BigEndian, ByteOrder};

use crate::chess::board::Board;
use crate::chess::core::{CastleRights, Piece, Side, Square, BOARD_SIZE, BOARD_WIDTH};
use crate::chess::error::CodecError;

/// Size of [`PackedBoard`] in bytes.
pub const PACKED_BOARD_SIZE: usize = 32;
/// The nibble area has room for this many pieces.
pub const MAX_PACKED_PIECES: usize = 32;

const GAME_INFO: std::ops::Range<usize> = 0..8;
const OCCUPANCY: std::ops::Range<usize> = 8..16;
const NIBBLES: usize = 16;

const RESERVED_MASK: u64 = (1 << 28) - 1;
const CASTLING_BITS: [(CastleRights, u32); 4] = [
    (CastleRights::WHITE_LONG, 28),
    (CastleRights::WHITE_SHORT, 29),
    (CastleRights::BLACK_LONG, 30),
    (CastleRights::BLACK_SHORT, 31),
];
const SIDE_SHIFT: u32 = 32;
const EN_PASSANT_SHIFT: u32 = 33;
const EN_PASSANT_MASK: u64 = 0x7F;
const NO_EN_PASSANT: u8 = BOARD_SIZE;
const HALFMOVE_SHIFT: u32 = 40;
const FULLMOVE_SHIFT: u32 = 48;
const COUNT_SHIFT: u32 = 56;

/// Packed board. Constructed by [`Board::pack`] or from raw bytes, decoded by
/// [`Board::unpack`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PackedBoard([u8; PACKED_BOARD_SIZE]);

impl PackedBoard {
    /// Wraps raw bytes. They are validated by [`Board::unpack`].
    #[must_use]
    pub const fn from_bytes(bytes: [u8; PACKED_BOARD_SIZE]) -> Self {
        Self(bytes)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PACKED_BOARD_SIZE] {
        &self.0
    }

    /// The game information word.
    #[must_use]
    pub fn game_info(&self) -> u64 {
        BigEndian::read_u64(&self.0[GAME_INFO])
    }

    /// The occupancy bitmap.
    #[must_use]
    pub fn occupancy(&self) -> u64 {
        BigEndian::read_u64(&self.0[OCCUPANCY])
    }

    fn nibble(&self, index: usize) -> u8 {
        let byte = self.0[NIBBLES + index / 2];
        if index % 2 == 0 {
            byte >> 4
        } else {
            byte & 0x0F
        }
    }

    fn set_nibble(&mut self, index: usize, value: u8) {
        let byte = &mut self.0[NIBBLES + index / 2];
        if index % 2 == 0 {
            *byte |= value << 4;
        } else {
            *byte |= value & 0x0F;
        }
    }
}

impl fmt::Display for PackedBoard {
    /// Lowercase hex dump of the 32 bytes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

// Squares in the order they appear in the occupancy bitmap, starting from the
// most significant bit.
fn scan_order() -> impl Iterator<Item = Square> {
    (0..BOARD_WIDTH)
        .rev()
        .flat_map(|rank| (0..BOARD_WIDTH).map(move |file| Square::new(rank, file)))
}

fn corrupt(message: String) -> anyhow::Error {
    CodecError::CorruptEncoding(message).into()
}

impl Board {
    /// Encodes the position into [`PackedBoard`].
    ///
    /// # Errors
    ///
    /// If there are more than [`MAX_PACKED_PIECES`] pieces or the fullmove
    /// counter does not fit into 8 bits.
    pub fn pack(&self) -> anyhow::Result<PackedBoard> {
        let count = self.piece_count();
        if count > MAX_PACKED_PIECES {
            bail!(CodecError::TooManyPieces(count));
        }
        let Ok(fullmove) = u8::try_from(self.fullmove_counter) else {
            bail!(CodecError::FieldOverflow {
                field: "fullmove counter",
                value: u32::from(self.fullmove_counter),
            });
        };
        let mut info = 0u64;
        for (right, bit) in CASTLING_BITS {
            if self.castling.contains(right) {
                info |= 1 << bit;
            }
        }
        if self.side_to_move == Side::Black {
            info |= 1 << SIDE_SHIFT;
        }
        let en_passant = self.en_passant.map_or(NO_EN_PASSANT, Square::code);
        info |= u64::from(en_passant) << EN_PASSANT_SHIFT;
        info |= u64::from(self.halfmove_clock) << HALFMOVE_SHIFT;
        info |= u64::from(fullmove) << FULLMOVE_SHIFT;
        // Checked against MAX_PACKED_PIECES above.
        #[allow(clippy::cast_possible_truncation)]
        let count = count as u8;
        info |= u64::from(count) << COUNT_SHIFT;

        let mut result = PackedBoard([0; PACKED_BOARD_SIZE]);
        let mut occupancy = 0u64;
        let mut index = 0;
        for (bit, square) in (0..u64::BITS).rev().zip(scan_order()) {
            if let Some(piece) = self.at(square) {
                occupancy |= 1 << bit;
                result.set_nibble(index, piece.code());
                index += 1;
            }
        }
        BigEndian::write_u64(&mut result.0[GAME_INFO], info);
        BigEndian::write_u64(&mut result.0[OCCUPANCY], occupancy);
        log::debug!("packed {self} into {result}");
        Ok(result)
    }

    /// Decodes a position produced by [`Board::pack`].
    ///
    /// # Errors
    ///
    /// [`CodecError::CorruptEncoding`] if the data violates the layout:
    /// reserved bits are set, the piece count disagrees with the occupancy
    /// bitmap, a nibble does not name a piece, unused nibbles are not zero or
    /// the en passant code is out of range.
    pub fn unpack(packed: &PackedBoard) -> anyhow::Result<Self> {
        let info = packed.game_info();
        let occupancy = packed.occupancy();
        if info & RESERVED_MASK != 0 {
            return Err(corrupt(format!("reserved bits are set in {packed}")));
        }
        #[allow(clippy::cast_possible_truncation)]
        let field = |shift: u32, mask: u64| ((info >> shift) & mask) as u8;
        let count = usize::from(field(COUNT_SHIFT, 0xFF));
        if count != occupancy.count_ones() as usize {
            return Err(corrupt(format!(
                "piece count {count} does not match occupancy {occupancy:#018x}"
            )));
        }
        if count > MAX_PACKED_PIECES {
            return Err(corrupt(format!("{count} pieces do not fit into nibbles")));
        }
        let mut result = Self::empty();
        for (right, bit) in CASTLING_BITS {
            result.castling.set(right, info & (1 << bit) != 0);
        }
        result.side_to_move = if info & (1 << SIDE_SHIFT) == 0 {
            Side::White
        } else {
            Side::Black
        };
        result.en_passant = match field(EN_PASSANT_SHIFT, EN_PASSANT_MASK) {
            NO_EN_PASSANT => None,
            code => Some(
                Square::from_code(code)
                    .map_err(|e| corrupt(format!("en passant square: {e}")))?,
            ),
        };
        result.halfmove_clock = field(HALFMOVE_SHIFT, 0xFF);
        result.fullmove_counter = u16::from(field(FULLMOVE_SHIFT, 0xFF));

        let mut index = 0;
        for (bit, square) in (0..u64::BITS).rev().zip(scan_order()) {
            if occupancy & (1 << bit) == 0 {
                continue;
            }
            let code = packed.nibble(index);
            let piece = Piece::from_code(code, square)
                .map_err(|e| corrupt(format!("nibble {index}: {e}")))
                .with_context(|| format!("unpacking {packed}"))?;
            result.place(piece, square);
            index += 1;
        }
        if let Some(index) = (count..MAX_PACKED_PIECES).find(|&i| packed.nibble(i) != 0) {
            return Err(corrupt(format!("unused nibble {index} is not zero")));
        }
        log::debug!("unpacked {packed} into {result}");
        Ok(result)
    }
}
