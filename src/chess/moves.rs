//! [`Move`] representation and its compact 32-bit encoding.

use std::fmt;

use anyhow::{bail, Context};

use crate::chess::core::{PieceKind, Square};
use crate::chess::error::CodecError;

/// What a move does. Discriminants are the 4-bit codes of the packed move.
#[allow(missing_docs)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveAction {
    /// Quiet move onto an empty square.
    Move = 1,
    Capture = 2,
    /// Origin is the king square, destination is the rook square.
    CastleKingside = 3,
    /// Origin is the king square, destination is the rook square.
    CastleQueenside = 4,
    EnPassant = 5,
    PromoteQueen = 8,
    PromoteBishop = 9,
    PromoteKnight = 10,
    PromoteRook = 11,
}

impl MoveAction {
    /// Pawn promotions in the order the generator emits them.
    pub const PROMOTIONS: [Self; 4] = [
        Self::PromoteQueen,
        Self::PromoteBishop,
        Self::PromoteKnight,
        Self::PromoteRook,
    ];

    /// Piece kind the pawn becomes, if this is a promotion.
    #[must_use]
    pub const fn promotion(self) -> Option<PieceKind> {
        match self {
            Self::PromoteQueen => Some(PieceKind::Queen),
            Self::PromoteBishop => Some(PieceKind::Bishop),
            Self::PromoteKnight => Some(PieceKind::Knight),
            Self::PromoteRook => Some(PieceKind::Rook),
            _ => None,
        }
    }
}

impl TryFrom<u8> for MoveAction {
    type Error = anyhow::Error;

    fn try_from(code: u8) -> anyhow::Result<Self> {
        Ok(match code {
            1 => Self::Move,
            2 => Self::Capture,
            3 => Self::CastleKingside,
            4 => Self::CastleQueenside,
            5 => Self::EnPassant,
            8 => Self::PromoteQueen,
            9 => Self::PromoteBishop,
            10 => Self::PromoteKnight,
            11 => Self::PromoteRook,
            _ => bail!(CodecError::CorruptEncoding(format!(
                "unknown move action code {code}"
            ))),
        })
    }
}

/// Annotation of the position a move leads to. The generator does not fill it
/// in.
#[allow(missing_docs)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MoveResult {
    #[default]
    None = 0,
    Check = 1,
    DoubleCheck = 2,
}

impl TryFrom<u8> for MoveResult {
    type Error = anyhow::Error;

    fn try_from(code: u8) -> anyhow::Result<Self> {
        Ok(match code {
            0 => Self::None,
            1 => Self::Check,
            2 => Self::DoubleCheck,
            _ => bail!(CodecError::CorruptEncoding(format!(
                "unknown move result code {code}"
            ))),
        })
    }
}

/// A single transition of the board produced by the move generator. Moves
/// don't reference the board they were generated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    #[allow(missing_docs)]
    pub action: MoveAction,
    #[allow(missing_docs)]
    pub result: MoveResult,
    #[allow(missing_docs)]
    pub from: Square,
    #[allow(missing_docs)]
    pub to: Square,
}

impl Move {
    /// Creates a move with an empty [`MoveResult`].
    #[must_use]
    pub const fn new(action: MoveAction, from: Square, to: Square) -> Self {
        Self {
            action,
            result: MoveResult::None,
            from,
            to,
        }
    }

    /// Encodes the move into 32 bits:
    ///
    /// | bits   | field            |
    /// | ------ | ---------------- |
    /// | 0..4   | action           |
    /// | 4..8   | result           |
    /// | 8..14  | origin code      |
    /// | 14..20 | destination code |
    /// | 20..32 | zero             |
    #[must_use]
    pub fn pack(&self) -> PackedMove {
        PackedMove(
            u32::from(self.action as u8)
                | u32::from(self.result as u8) << 4
                | u32::from(self.from.code()) << 8
                | u32::from(self.to.code()) << 14,
        )
    }

    /// Decodes a move produced by [`Move::pack`].
    ///
    /// # Errors
    ///
    /// If the action or result codes are unknown or the unused bits are set.
    pub fn unpack(packed: PackedMove) -> anyhow::Result<Self> {
        let bits = packed.bits();
        if bits >> 20 != 0 {
            bail!(CodecError::CorruptEncoding(format!(
                "unused bits of packed move {packed} are set"
            )));
        }
        let field = |shift: u32, width: u32| -> u8 {
            #[allow(clippy::cast_possible_truncation)]
            let value = ((bits >> shift) & ((1 << width) - 1)) as u8;
            value
        };
        let action = MoveAction::try_from(field(0, 4))
            .with_context(|| format!("decoding packed move {packed}"))?;
        let result = MoveResult::try_from(field(4, 4))
            .with_context(|| format!("decoding packed move {packed}"))?;
        Ok(Self {
            action,
            result,
            from: Square::from_code(field(8, 6))?,
            to: Square::from_code(field(14, 6))?,
        })
    }
}

impl fmt::Display for Move {
    /// Serializes a move in [UCI format] with the promotion suffix. Castling
    /// is printed as the king and rook squares it was generated with.
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        let suffix = match self.action {
            MoveAction::PromoteQueen => "q",
            MoveAction::PromoteBishop => "b",
            MoveAction::PromoteKnight => "n",
            MoveAction::PromoteRook => "r",
            _ => "",
        };
        f.write_str(suffix)
    }
}

/// 32-bit encoding of a [`Move`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PackedMove(u32);

impl PackedMove {
    /// Wraps raw bits. They are validated by [`Move::unpack`].
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PackedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}
