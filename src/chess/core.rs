//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};
use std::ops::Add;
use std::str::FromStr;

use anyhow::bail;
use itertools::Itertools;

use crate::chess::error::ParseError;

#[allow(missing_docs)]
pub const BOARD_WIDTH: i8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = 64;

/// A single cell of the board, addressed by zero-based rank (row, 0 is rank
/// "1") and file (column, 0 is file "a").
///
/// Coordinates are signed so that stepping off the board in any direction is
/// representable: [`Square::offset`] never clamps and callers are expected to
/// check [`Square::in_bounds`] before using the result as a board index.
///
/// ```
/// use garth::chess::core::{Direction, Square};
///
/// let square = Square::try_from("e4").unwrap();
/// assert_eq!(square.offset(Direction::Up), Square::new(4, 4));
/// assert!(!Square::A1.offset(Direction::Down).in_bounds());
/// ```
///
/// Squares are ordered rank-major (a1 < b1 < ... < h1 < a2 < ... < h8), which
/// makes iteration over the board deterministic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square {
    rank: i8,
    file: i8,
}

impl Square {
    #[allow(missing_docs)]
    pub const A1: Self = Self::new(0, 0);
    #[allow(missing_docs)]
    pub const C1: Self = Self::new(0, 2);
    #[allow(missing_docs)]
    pub const E1: Self = Self::new(0, 4);
    #[allow(missing_docs)]
    pub const H1: Self = Self::new(0, 7);
    #[allow(missing_docs)]
    pub const A8: Self = Self::new(7, 0);
    #[allow(missing_docs)]
    pub const E8: Self = Self::new(7, 4);
    #[allow(missing_docs)]
    pub const H8: Self = Self::new(7, 7);

    /// Connects rank (row) and file (column) to form a square. The result may
    /// be outside of the board.
    #[must_use]
    pub const fn new(rank: i8, file: i8) -> Self {
        Self { rank, file }
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> i8 {
        self.rank
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> i8 {
        self.file
    }

    /// Returns `true` if both coordinates are within `0..BOARD_WIDTH`.
    #[must_use]
    pub const fn in_bounds(self) -> bool {
        0 <= self.rank && self.rank < BOARD_WIDTH && 0 <= self.file && self.file < BOARD_WIDTH
    }

    /// Moves the square by one step of `direction`. No bounds checking is
    /// performed.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let (rank, file) = direction.offset();
        Self::new(self.rank + rank, self.file + file)
    }

    /// Compass direction along a rank or file leading from this square to
    /// `target`, or `None` when the two squares do not share a rank or a file.
    #[must_use]
    pub fn axes_bearing(self, target: Self) -> Option<Direction> {
        let (dr, df) = (target.rank - self.rank, target.file - self.file);
        match (dr, df) {
            (0, 0) => None,
            (0, df) if df < 0 => Some(Direction::Left),
            (0, _) => Some(Direction::Right),
            (dr, 0) if dr < 0 => Some(Direction::Down),
            (_, 0) => Some(Direction::Up),
            _ => None,
        }
    }

    /// Compass direction along a diagonal leading from this square to
    /// `target`, or `None` when the two squares are not on a common diagonal.
    #[must_use]
    pub fn diag_bearing(self, target: Self) -> Option<Direction> {
        let (dr, df) = (target.rank - self.rank, target.file - self.file);
        if dr == 0 || dr.abs() != df.abs() {
            return None;
        }
        Some(match (dr < 0, df < 0) {
            (true, true) => Direction::DownLeft,
            (true, false) => Direction::DownRight,
            (false, true) => Direction::UpLeft,
            (false, false) => Direction::UpRight,
        })
    }

    /// Flat 6-bit representation: `rank * 8 + file`.
    #[must_use]
    pub fn code(self) -> u8 {
        debug_assert!(self.in_bounds(), "{self:?} is off the board");
        #[allow(clippy::cast_sign_loss)]
        let code = (self.rank * BOARD_WIDTH + self.file) as u8;
        code
    }

    /// Inverse of [`Square::code`].
    ///
    /// # Errors
    ///
    /// If `code` is outside `0..BOARD_SIZE`.
    pub fn from_code(code: u8) -> anyhow::Result<Self> {
        if code >= BOARD_SIZE {
            bail!("square code should be in 0..BOARD_SIZE, got {code}");
        }
        #[allow(clippy::cast_possible_wrap)]
        let code = code as i8;
        Ok(Self::new(code / BOARD_WIDTH, code % BOARD_WIDTH))
    }
}

impl Add<Direction> for Square {
    type Output = Self;

    fn add(self, direction: Direction) -> Self {
        self.offset(direction)
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    /// Parses algebraic notation: file letter followed by 1-based rank digit.
    fn try_from(square: &str) -> anyhow::Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            bail!(ParseError::InvalidSquare(square.to_string()));
        };
        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            bail!(ParseError::InvalidSquare(square.to_string()));
        }
        #[allow(clippy::cast_possible_wrap)]
        let (rank, file) = ((rank as u8 - b'1') as i8, (file as u8 - b'a') as i8);
        Ok(Self::new(rank, file))
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::try_from(s)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[allow(clippy::cast_sign_loss)]
        let (file, rank) = ((b'a' as i8 + self.file) as u8, (b'1' as i8 + self.rank) as u8);
        f.write_char(file as char)?;
        f.write_char(rank as char)
    }
}

/// A standard game of chess is played between two sides: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Direction in which the pawns of this side advance.
    #[must_use]
    pub const fn push_direction(self) -> Direction {
        match self {
            Self::White => Direction::Up,
            Self::Black => Direction::Down,
        }
    }

    /// Rank the pawns start the game on.
    #[must_use]
    pub const fn pawn_rank(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => 6,
        }
    }

    /// Rank from which pawns of this side may capture en passant (fifth rank
    /// from the side's own perspective).
    #[must_use]
    pub const fn en_passant_rank(self) -> i8 {
        match self {
            Self::White => 4,
            Self::Black => 3,
        }
    }

    /// Rank where the pawns of this side are promoted.
    #[must_use]
    pub const fn promotion_rank(self) -> i8 {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    /// Rank the king and rooks start the game on.
    #[must_use]
    pub const fn back_rank(self) -> i8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }

    pub(super) const fn index(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }
}

impl TryFrom<&str> for Side {
    type Error = anyhow::Error;

    fn try_from(side: &str) -> anyhow::Result<Self> {
        match side {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!(ParseError::InvalidSide(side.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Directions on the board from a perspective of White player, plus the eight
/// knight jumps.
///
/// Traditionally those are North (Up), West (Left), East (Right), South (Down)
/// and their combinations. However, using cardinal directions is confusing,
/// hence they are replaced by relative directions.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpRight,
    UpLeft,
    DownRight,
    DownLeft,
    /// One rank up, two files left.
    KnightLeftUp,
    /// Two ranks up, one file left.
    KnightUpLeft,
    /// Two ranks up, one file right.
    KnightUpRight,
    /// One rank up, two files right.
    KnightRightUp,
    /// One rank down, two files right.
    KnightRightDown,
    /// Two ranks down, one file right.
    KnightDownRight,
    /// Two ranks down, one file left.
    KnightDownLeft,
    /// One rank down, two files left.
    KnightLeftDown,
}

impl Direction {
    /// Orthogonal rays.
    pub const AXES: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
    /// Diagonal rays.
    pub const DIAGONALS: [Self; 4] = [Self::UpLeft, Self::UpRight, Self::DownLeft, Self::DownRight];
    /// L-shaped jumps.
    pub const KNIGHT_JUMPS: [Self; 8] = [
        Self::KnightLeftUp,
        Self::KnightUpLeft,
        Self::KnightUpRight,
        Self::KnightRightUp,
        Self::KnightRightDown,
        Self::KnightDownRight,
        Self::KnightDownLeft,
        Self::KnightLeftDown,
    ];

    /// (rank, file) delta of one step.
    #[must_use]
    pub const fn offset(self) -> (i8, i8) {
        match self {
            Self::Up => (1, 0),
            Self::Down => (-1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
            Self::UpRight => (1, 1),
            Self::UpLeft => (1, -1),
            Self::DownRight => (-1, 1),
            Self::DownLeft => (-1, -1),
            Self::KnightLeftUp => (1, -2),
            Self::KnightUpLeft => (2, -1),
            Self::KnightUpRight => (2, 1),
            Self::KnightRightUp => (1, 2),
            Self::KnightRightDown => (-1, 2),
            Self::KnightDownRight => (-2, 1),
            Self::KnightDownLeft => (-2, -1),
            Self::KnightLeftDown => (-1, -2),
        }
    }

    /// Forward diagonals a pawn of `side` captures along.
    #[must_use]
    pub const fn pawn_captures(side: Side) -> [Self; 2] {
        match side {
            Side::White => [Self::UpLeft, Self::UpRight],
            Side::Black => [Self::DownLeft, Self::DownRight],
        }
    }
}

/// Standard [chess pieces] and a marker for pawns that left their original
/// file. Discriminants are the 3-bit codes used by the packed board.
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King = 1,
    Queen = 2,
    Bishop = 3,
    Knight = 4,
    Rook = 5,
    Pawn = 6,
    /// A pawn that captured its way onto another file. Moves exactly like a
    /// pawn but may no longer capture en passant.
    PawnOffFile = 7,
}

impl PieceKind {
    /// Maximum number of steps the piece may travel in one direction.
    #[must_use]
    pub const fn range(self) -> u8 {
        match self {
            Self::Queen | Self::Bishop | Self::Rook => 7,
            Self::King | Self::Knight | Self::Pawn | Self::PawnOffFile => 1,
        }
    }

    const fn symbol(self) -> char {
        match self {
            Self::King => 'K',
            Self::Queen => 'Q',
            Self::Bishop => 'B',
            Self::Knight => 'N',
            Self::Rook => 'R',
            Self::Pawn | Self::PawnOffFile => 'P',
        }
    }
}

impl TryFrom<u8> for PieceKind {
    type Error = anyhow::Error;

    fn try_from(code: u8) -> anyhow::Result<Self> {
        Ok(match code {
            1 => Self::King,
            2 => Self::Queen,
            3 => Self::Bishop,
            4 => Self::Knight,
            5 => Self::Rook,
            6 => Self::Pawn,
            7 => Self::PawnOffFile,
            _ => bail!("piece kind code should be within 1..=7, got {code}"),
        })
    }
}

/// A piece owned by a side, together with the square it was last placed on.
///
/// The square is a copy of the board key the piece is stored under and is
/// only kept in sync by [`crate::chess::board::Board::place`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    side: Side,
    square: Square,
}

impl Piece {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(kind: PieceKind, side: Side, square: Square) -> Self {
        Self { kind, side, square }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Square the piece was last placed on.
    #[must_use]
    pub const fn square(&self) -> Square {
        self.square
    }

    /// See [`PieceKind::range`].
    #[must_use]
    pub const fn range(&self) -> u8 {
        self.kind.range()
    }

    /// FEN symbol: uppercase for White, lowercase for Black.
    #[must_use]
    pub const fn glyph(&self) -> char {
        let symbol = self.kind.symbol();
        match self.side {
            Side::White => symbol,
            Side::Black => symbol.to_ascii_lowercase(),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_black(&self) -> bool {
        matches!(self.side, Side::Black)
    }

    /// Slides along ranks and files.
    #[must_use]
    pub const fn moves_axes(&self) -> bool {
        matches!(self.kind, PieceKind::King | PieceKind::Queen | PieceKind::Rook)
    }

    /// Slides along diagonals.
    #[must_use]
    pub const fn moves_diag(&self) -> bool {
        matches!(self.kind, PieceKind::King | PieceKind::Queen | PieceKind::Bishop)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn moves_knight(&self) -> bool {
        matches!(self.kind, PieceKind::Knight)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn moves_pawn(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn | PieceKind::PawnOffFile)
    }

    /// Replaces the kind in place.
    pub fn promote(&mut self, kind: PieceKind) {
        self.kind = kind;
    }

    pub(super) fn place(&mut self, square: Square) {
        self.square = square;
    }

    /// 4-bit code: kind in the low 3 bits, side in the high bit.
    #[must_use]
    pub const fn code(&self) -> u8 {
        let side = match self.side {
            Side::White => 0,
            Side::Black => 0b1000,
        };
        self.kind as u8 | side
    }

    /// Inverse of [`Piece::code`].
    ///
    /// # Errors
    ///
    /// If the low 3 bits do not name a piece kind.
    pub fn from_code(code: u8, square: Square) -> anyhow::Result<Self> {
        let side = if code & 0b1000 == 0 {
            Side::White
        } else {
            Side::Black
        };
        Ok(Self::new(PieceKind::try_from(code & 0b0111)?, side, square))
    }

    /// Parses a FEN symbol into the kind and the owner.
    ///
    /// # Errors
    ///
    /// If the symbol is not one of "KQBNRPkqbnrp".
    pub fn parse_glyph(symbol: char) -> anyhow::Result<(PieceKind, Side)> {
        let kind = match symbol.to_ascii_uppercase() {
            'K' => PieceKind::King,
            'Q' => PieceKind::Queen,
            'B' => PieceKind::Bishop,
            'N' => PieceKind::Knight,
            'R' => PieceKind::Rook,
            'P' => PieceKind::Pawn,
            _ => bail!(ParseError::InvalidPiece(symbol)),
        };
        let side = if symbol.is_ascii_lowercase() {
            Side::Black
        } else {
            Side::White
        };
        Ok((kind, side))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.glyph())
    }
}

bitflags::bitflags! {
    /// Track the ability to [castle] each side (kingside is often referred to
    /// as O-O or h-side castle, queenside -- O-O-O or a-side castle). When the
    /// king moves, the side loses ability to castle both ways. When the rook
    /// moves, the side loses ability to castle towards that rook.
    ///
    /// - When castling h-side (short), the king ends up on file g and the
    ///   rook on file f.
    /// - When castling a-side (long), the king ends up on file c and the rook
    ///   on file d.
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CastleRights : u8 {
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b1000;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0100;
        #[allow(missing_docs)]
        const WHITE_BOTH = Self::WHITE_SHORT.bits() | Self::WHITE_LONG.bits();
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0010;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b0001;
        #[allow(missing_docs)]
        const BLACK_BOTH = Self::BLACK_SHORT.bits() | Self::BLACK_LONG.bits();
        #[allow(missing_docs)]
        const ALL = Self::WHITE_BOTH.bits() | Self::BLACK_BOTH.bits();
    }
}

impl CastleRights {
    /// Both rights of `side`.
    #[must_use]
    pub const fn both(side: Side) -> Self {
        match side {
            Side::White => Self::WHITE_BOTH,
            Side::Black => Self::BLACK_BOTH,
        }
    }

    /// The right that depends on the rook starting on `square`, if any.
    #[must_use]
    pub fn for_rook_corner(square: Square) -> Option<Self> {
        match square {
            Square::A1 => Some(Self::WHITE_LONG),
            Square::H1 => Some(Self::WHITE_SHORT),
            Square::A8 => Some(Self::BLACK_LONG),
            Square::H8 => Some(Self::BLACK_SHORT),
            _ => None,
        }
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = anyhow::Error;

    /// Parses [`CastleRights`] for both sides from the FEN format: "-" or a
    /// non-empty subset of "KQkq" without repetitions.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        if input == "-" {
            return Ok(Self::empty());
        }
        if input.is_empty() {
            bail!(ParseError::InvalidCastling(input.to_string()));
        }
        let mut rights = Self::empty();
        for symbol in input.chars() {
            let right = match symbol {
                'K' => Self::WHITE_SHORT,
                'Q' => Self::WHITE_LONG,
                'k' => Self::BLACK_SHORT,
                'q' => Self::BLACK_LONG,
                _ => bail!(ParseError::InvalidCastling(input.to_string())),
            };
            if rights.contains(right) {
                bail!(ParseError::InvalidCastling(input.to_string()));
            }
            rights |= right;
        }
        Ok(rights)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_char('-');
        }
        for (right, symbol) in [
            (Self::WHITE_SHORT, 'K'),
            (Self::WHITE_LONG, 'Q'),
            (Self::BLACK_SHORT, 'k'),
            (Self::BLACK_LONG, 'q'),
        ] {
            if self.contains(right) {
                f.write_char(symbol)?;
            }
        }
        Ok(())
    }
}
