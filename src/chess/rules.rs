//! Pseudo-legal move generation and attack detection.
//!
//! Every piece kind is served by one or more [`MoveRule`]s. A rule knows how
//! to enumerate the moves of a piece and whether the piece attacks another
//! one. Moves produced here only respect movement geometry and occupancy:
//! they may leave the mover's own king in check.

use crate::chess::board::{Board, SeekOutcome};
use crate::chess::core::{Direction, Piece, PieceKind, Side, Square};
use crate::chess::moves::{Move, MoveAction};

/// Family of piece movements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveRule {
    /// Rays along ranks and files.
    Axes,
    /// Rays along diagonals.
    Diagonal,
    /// L-shaped jumps.
    Knight,
    /// Pushes, double pushes, diagonal captures, promotions and en passant.
    Pawn,
    /// Castling. Applies to kings but does not generate moves yet: it needs
    /// legality filtering (king not in check and not passing through attacked
    /// squares) that the pseudo-legal generator does not do.
    Castle,
}

impl MoveRule {
    /// Rules serving a piece kind, in the order they are run.
    #[must_use]
    pub const fn for_kind(kind: PieceKind) -> &'static [Self] {
        match kind {
            PieceKind::King => &[Self::Axes, Self::Diagonal, Self::Castle],
            PieceKind::Queen => &[Self::Axes, Self::Diagonal],
            PieceKind::Bishop => &[Self::Diagonal],
            PieceKind::Knight => &[Self::Knight],
            PieceKind::Rook => &[Self::Axes],
            PieceKind::Pawn | PieceKind::PawnOffFile => &[Self::Pawn],
        }
    }

    /// Whether this rule serves pieces of `kind`.
    #[must_use]
    pub fn applies(self, kind: PieceKind) -> bool {
        Self::for_kind(kind).contains(&self)
    }

    /// Appends the moves of `piece` under this rule to `moves`.
    pub fn generate(self, board: &Board, piece: &Piece, moves: &mut Vec<Move>) {
        debug_assert!(self.applies(piece.kind()), "{self:?} does not serve {piece:?}");
        match self {
            Self::Axes => board.gather_moves(piece, &Direction::AXES, moves, false),
            Self::Diagonal => board.gather_moves(piece, &Direction::DIAGONALS, moves, false),
            Self::Knight => board.gather_moves(piece, &Direction::KNIGHT_JUMPS, moves, false),
            Self::Pawn => generate_pawn_moves(board, piece, moves),
            Self::Castle => (),
        }
    }

    /// Whether `attacker` attacks the square of `target` under this rule.
    #[must_use]
    pub fn can_attack(self, board: &Board, attacker: &Piece, target: &Piece) -> bool {
        let (from, to) = (attacker.square(), target.square());
        match self {
            Self::Axes => from
                .axes_bearing(to)
                .is_some_and(|direction| reaches(board, attacker, direction, target)),
            Self::Diagonal => from
                .diag_bearing(to)
                .is_some_and(|direction| reaches(board, attacker, direction, target)),
            Self::Knight => Direction::KNIGHT_JUMPS.iter().any(|&jump| {
                from + jump == to && board.at(to) == Some(target)
            }),
            Self::Pawn => Direction::pawn_captures(attacker.side())
                .iter()
                .any(|&direction| from + direction == to),
            Self::Castle => false,
        }
    }
}

fn reaches(board: &Board, attacker: &Piece, direction: Direction, target: &Piece) -> bool {
    board.seek_piece(attacker, direction, target).outcome == SeekOutcome::TargetFound
}

fn push_promotions(from: Square, to: Square, moves: &mut Vec<Move>) {
    moves.extend(
        MoveAction::PROMOTIONS
            .iter()
            .map(|&action| Move::new(action, from, to)),
    );
}

fn generate_pawn_moves(board: &Board, pawn: &Piece, moves: &mut Vec<Move>) {
    let side = pawn.side();
    let from = pawn.square();
    let forward = side.push_direction();

    let single = from + forward;
    if single.in_bounds() && board.is_empty(single) {
        if single.rank() == side.promotion_rank() {
            push_promotions(from, single, moves);
        } else {
            moves.push(Move::new(MoveAction::Move, from, single));
        }
        let double = single + forward;
        if from.rank() == side.pawn_rank() && double.in_bounds() && board.is_empty(double) {
            moves.push(Move::new(MoveAction::Move, from, double));
        }
    }

    for direction in Direction::pawn_captures(side) {
        let to = from + direction;
        if !to.in_bounds() {
            continue;
        }
        match board.check_square(pawn, to, true) {
            Some(_) if to.rank() == side.promotion_rank() => push_promotions(from, to, moves),
            Some(capture) => moves.push(capture),
            None => (),
        }
    }

    // Only pawns that never left their file can take en passant.
    if pawn.kind() != PieceKind::Pawn || from.rank() != side.en_passant_rank() {
        return;
    }
    if let Some(target) = board.en_passant() {
        // The target must be the square this pawn would step onto.
        let destination = Square::new(from.rank(), target.file()) + forward;
        if (from.file() - target.file()).abs() == 1
            && destination == target
            && board.is_empty(destination)
        {
            moves.push(Move::new(MoveAction::EnPassant, from, destination));
        }
    }
}

impl Board {
    /// Walks each of `directions` from `piece` for at most
    /// [`Piece::range`] steps, appending a move for every reachable square.
    /// A walk stops at the board edge, before a friendly piece or on a
    /// capture. With `pawn_capture` set, empty squares end the walk without
    /// producing a move.
    pub fn gather_moves(
        &self,
        piece: &Piece,
        directions: &[Direction],
        moves: &mut Vec<Move>,
        pawn_capture: bool,
    ) {
        for &direction in directions {
            let mut square = piece.square();
            for _ in 0..piece.range() {
                square = square + direction;
                if !square.in_bounds() {
                    break;
                }
                let Some(candidate) = self.check_square(piece, square, pawn_capture) else {
                    break;
                };
                moves.push(candidate);
                if candidate.action == MoveAction::Capture {
                    break;
                }
            }
        }
    }

    /// Classifies a single destination for `piece`: a quiet move onto an
    /// empty square (unless `pawn_capture` is set), a capture of an opponent
    /// or nothing for a friendly piece.
    #[must_use]
    pub fn check_square(&self, piece: &Piece, square: Square, pawn_capture: bool) -> Option<Move> {
        match self.at(square) {
            None if pawn_capture => None,
            None => Some(Move::new(MoveAction::Move, piece.square(), square)),
            Some(other) if other.side() == piece.side() => None,
            Some(_) => Some(Move::new(MoveAction::Capture, piece.square(), square)),
        }
    }

    /// Pseudo-legal moves of the side to move.
    #[must_use]
    pub fn generate_moves(&self) -> Vec<Move> {
        self.generate_moves_for(self.side_to_move())
    }

    /// Pseudo-legal moves of `side`, in board order (a1 to h8) and within a
    /// piece in the order of its rules.
    #[must_use]
    pub fn generate_moves_for(&self, side: Side) -> Vec<Move> {
        let mut moves = Vec::new();
        for piece in self.side_pieces(side) {
            for rule in MoveRule::for_kind(piece.kind()) {
                rule.generate(self, piece, &mut moves);
            }
        }
        moves
    }

    /// Number of opponent pieces attacking `target`. Each attacker is
    /// counted once even if several of its rules apply.
    #[must_use]
    pub fn test_for_attack(&self, target: &Piece) -> usize {
        self.side_pieces(target.side().opponent())
            .filter(|attacker| {
                MoveRule::for_kind(attacker.kind())
                    .iter()
                    .any(|rule| rule.can_attack(self, attacker, target))
            })
            .count()
    }

    /// Number of pieces giving check to the king of `side`; zero if there is
    /// no such king on the board.
    #[must_use]
    pub fn test_for_check(&self, side: Side) -> usize {
        self.king(side)
            .and_then(|square| self.at(square))
            .map_or(0, |king| self.test_for_attack(king))
    }
}
