//! Square-centric [`Board`]: a sparse map of occupied squares to pieces plus
//! the rest of the game state needed to continue from a position (side to
//! move, castling rights, en passant target and move counters).
//!
//! Binary conversion lives in [`crate::chess::pack`] and the movement rules
//! in [`crate::chess::rules`].

use std::collections::BTreeMap;
use std::fmt::{self, Write};

use arrayvec::ArrayVec;

use crate::chess::core::{CastleRights, Direction, Piece, PieceKind, Side, Square, BOARD_WIDTH};

/// Longest possible ray on the board.
const MAX_RAY: usize = BOARD_WIDTH as usize - 1;

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0";

/// State of the chess game: pieces, half-move counters and castling rights,
/// etc. It has 1:1 relationship with [Forsyth-Edwards Notation] (FEN), see
/// [`Board::from_fen`] and the [`fmt::Display`] implementation.
///
/// Only occupied squares are stored. Iteration over the pieces goes rank by
/// rank from a1 to h8, so everything derived from it (move lists, packed
/// boards) is deterministic.
///
/// Equality compares the position only: the king cache is derived from the
/// order of placement and takes no part in it.
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
#[derive(Clone)]
pub struct Board {
    pub(super) pieces: BTreeMap<Square, Piece>,
    pub(super) kings: [Option<Square>; 2],
    pub(super) side_to_move: Side,
    pub(super) castling: CastleRights,
    pub(super) en_passant: Option<Square>,
    /// [Halfmove Clock][^ply] keeps track of the number of (half-)moves
    /// since the last capture or pawn move and is used to enforce
    /// fifty[^fifty]-move draw rule.
    ///
    /// [Halfmove Clock]: https://www.chessprogramming.org/Halfmove_Clock
    /// [^ply]: "Half-move" or ["ply"](https://www.chessprogramming.org/Ply) means a move of only
    ///     one side.
    /// [^fifty]: 50 __full__ moves
    pub(super) halfmove_clock: u8,
    pub(super) fullmove_counter: u16,
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_counter == other.fullmove_counter
    }
}

impl Eq for Board {}

impl Board {
    /// Creates a board without pieces, White to move and no castling rights.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            pieces: BTreeMap::new(),
            kings: [None, None],
            side_to_move: Side::White,
            castling: CastleRights::empty(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_counter: 0,
        }
    }

    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use garth::chess::board::Board;
    ///
    /// let starting_position = Board::starting();
    /// assert_eq!(
    ///     &starting_position.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        const COURT: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self {
            castling: CastleRights::ALL,
            ..Self::empty()
        };
        for (file, kind) in (0..BOARD_WIDTH).zip(COURT) {
            let _ = board.set(Square::new(Side::White.back_rank(), file), kind, Side::White);
            let _ = board.set(Square::new(Side::White.pawn_rank(), file), PieceKind::Pawn, Side::White);
            let _ = board.set(Square::new(Side::Black.pawn_rank(), file), PieceKind::Pawn, Side::Black);
            let _ = board.set(Square::new(Side::Black.back_rank(), file), kind, Side::Black);
        }
        board
    }

    /// Returns the piece standing on `square`, if any.
    #[must_use]
    pub fn at(&self, square: Square) -> Option<&Piece> {
        debug_assert!(square.in_bounds(), "{square:?} is off the board");
        self.pieces.get(&square)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_empty(&self, square: Square) -> bool {
        self.at(square).is_none()
    }

    /// Puts `piece` on `square`, replacing the occupant. The piece's cached
    /// square and the king locations are updated together with the map.
    pub fn place(&mut self, mut piece: Piece, square: Square) {
        debug_assert!(square.in_bounds(), "{square:?} is off the board");
        piece.place(square);
        self.forget_king(square);
        if piece.kind() == PieceKind::King {
            self.kings[piece.side().index()] = Some(square);
        }
        let _ = self.pieces.insert(square, piece);
    }

    /// Creates a new piece and places it on `square`.
    pub fn set(&mut self, square: Square, kind: PieceKind, side: Side) -> Piece {
        let piece = Piece::new(kind, side, square);
        self.place(piece, square);
        piece
    }

    /// Removes the occupant of `square` and returns it.
    pub fn clear_square(&mut self, square: Square) -> Option<Piece> {
        debug_assert!(square.in_bounds(), "{square:?} is off the board");
        self.forget_king(square);
        self.pieces.remove(&square)
    }

    fn forget_king(&mut self, square: Square) {
        for king in &mut self.kings {
            if *king == Some(square) {
                *king = None;
            }
        }
    }

    /// All pieces on the board in rank-major order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    /// Pieces owned by `side` in rank-major order.
    pub fn side_pieces(&self, side: Side) -> impl Iterator<Item = &Piece> {
        self.pieces.values().filter(move |piece| piece.side() == side)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Square of the last king of `side` that was placed, if it is still on
    /// the board. With several kings of one side only the most recent one is
    /// tracked, so boards that are equal may still disagree here.
    #[must_use]
    pub const fn king(&self, side: Side) -> Option<Square> {
        self.kings[side.index()]
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    #[allow(missing_docs)]
    pub fn set_side_to_move(&mut self, side: Side) {
        self.side_to_move = side;
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn castling(&self) -> CastleRights {
        self.castling
    }

    #[allow(missing_docs)]
    pub fn set_castling(&mut self, rights: CastleRights, enabled: bool) {
        self.castling.set(rights, enabled);
    }

    /// Square a pawn skipped over with its last double step, if any.
    #[must_use]
    pub const fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[allow(missing_docs)]
    pub fn set_en_passant(&mut self, square: Square) {
        debug_assert!(square.in_bounds(), "{square:?} is off the board");
        self.en_passant = Some(square);
    }

    #[allow(missing_docs)]
    pub fn clear_en_passant(&mut self) {
        self.en_passant = None;
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn halfmove_clock(&self) -> u8 {
        self.halfmove_clock
    }

    #[allow(missing_docs)]
    pub fn set_halfmove_clock(&mut self, value: u8) {
        self.halfmove_clock = value;
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn fullmove_counter(&self) -> u16 {
        self.fullmove_counter
    }

    #[allow(missing_docs)]
    pub fn set_fullmove_counter(&mut self, value: u16) {
        self.fullmove_counter = value;
    }

    /// Walks from `piece` towards `direction` for at most [`Piece::range`]
    /// steps, stopping at the first occupied square, the edge of the board or
    /// the `target` square.
    #[must_use]
    pub fn seek(&self, piece: &Piece, direction: Direction, target: Option<Square>) -> SeekResult {
        let mut result = SeekResult {
            origin: piece.square(),
            target,
            direction,
            range: piece.range(),
            encountered: None,
            path: ArrayVec::new(),
            outcome: SeekOutcome::NotFound,
        };
        let mut here = piece.square();
        for _ in 0..piece.range() {
            let next = here + direction;
            if !next.in_bounds() {
                result.outcome = SeekOutcome::OutOfBounds;
                return result;
            }
            here = next;
            result.path.push(here);
            if let Some(other) = self.at(here) {
                result.encountered = Some(*other);
                result.outcome = if other.side() == piece.side() {
                    SeekOutcome::FoundFriendly
                } else {
                    SeekOutcome::FoundOpponent
                };
                return result;
            }
            if Some(here) == target {
                result.outcome = SeekOutcome::TargetFound;
                return result;
            }
        }
        result
    }

    /// Same as [`Board::seek`] but looks for a specific piece: bumping into
    /// it is reported as [`SeekOutcome::TargetFound`].
    #[must_use]
    pub fn seek_piece(&self, piece: &Piece, direction: Direction, target: &Piece) -> SeekResult {
        let mut result = self.seek(piece, direction, Some(target.square()));
        if matches!(
            result.outcome,
            SeekOutcome::FoundFriendly | SeekOutcome::FoundOpponent
        ) && result
            .encountered
            .is_some_and(|encountered| encountered.square() == target.square())
        {
            result.outcome = SeekOutcome::TargetFound;
        }
        result
    }

    /// Renders the board as an 8x8 grid of glyphs ('.' for an empty square)
    /// with rank numbers on the left and a file legend at the bottom.
    #[must_use]
    pub fn diagram(&self) -> String {
        let mut result = String::new();
        for rank in (0..BOARD_WIDTH).rev() {
            #[allow(clippy::cast_sign_loss)]
            let label = (b'1' + rank as u8) as char;
            result.push(label);
            for file in 0..BOARD_WIDTH {
                result.push(SQUARE_SEPARATOR);
                result.push(self.at(Square::new(rank, file)).map_or('.', Piece::glyph));
            }
            result.push('\n');
        }
        result.push_str(FILE_LEGEND);
        result
    }
}

const SQUARE_SEPARATOR: char = ' ';
const FILE_LEGEND: &str = "  a b c d e f g h\n";

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diagram())?;
        writeln!(f, "Side to move: {:?}", &self.side_to_move)?;
        writeln!(f, "Fullmove counter: {:?}", &self.fullmove_counter)?;
        writeln!(f, "En Passant: {:?}", &self.en_passant)?;
        // bitflags' default fmt::Debug implementation is not very convenient:
        // dump FEN instead.
        writeln!(f, "Castling rights: {}", &self.castling)?;
        f.write_str("FEN: ")?;
        fmt::Display::fmt(self, f)?;
        f.write_char('\n')
    }
}

/// How a [`Board::seek`] walk ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeekOutcome {
    /// The next step would leave the board.
    OutOfBounds,
    /// Stopped at a piece of the walker's side.
    FoundFriendly,
    /// Stopped at a piece of the other side.
    FoundOpponent,
    /// Reached the target unobstructed.
    TargetFound,
    /// Ran out of steps.
    NotFound,
}

/// Everything a [`Board::seek`] walk has seen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeekResult {
    /// Where the walk started.
    pub origin: Square,
    /// Where the walk was heading, if anywhere.
    pub target: Option<Square>,
    #[allow(missing_docs)]
    pub direction: Direction,
    /// Maximum number of steps.
    pub range: u8,
    /// The piece the walk stopped at.
    pub encountered: Option<Piece>,
    /// Squares stepped on, in order.
    pub path: ArrayVec<Square, MAX_RAY>,
    #[allow(missing_docs)]
    pub outcome: SeekOutcome,
}
