//! Transition from one position to the next.

use anyhow::{bail, Context};

use crate::chess::board::Board;
use crate::chess::core::{CastleRights, PieceKind, Side, Square};
use crate::chess::moves::{Move, MoveAction};

const SHORT_KING_FILE: i8 = 6;
const SHORT_ROOK_FILE: i8 = 5;
const LONG_KING_FILE: i8 = 2;
const LONG_ROOK_FILE: i8 = 3;

impl Board {
    /// Returns the position after `mv`. The board itself is left untouched.
    ///
    /// The move is trusted to come from [`Board::generate_moves`]: only the
    /// presence of the moving pieces is checked.
    ///
    /// # Errors
    ///
    /// If the origin square is empty, or a castling move does not point at a
    /// rook of the same side.
    pub fn apply_move(&self, mv: &Move) -> anyhow::Result<Self> {
        let mut next = self.clone();
        next.clear_en_passant();
        let Some(&piece) = self.at(mv.from) else {
            bail!("no piece to move on {} for {mv}", mv.from);
        };
        let side = piece.side();
        let capture = match mv.action {
            MoveAction::CastleKingside | MoveAction::CastleQueenside => {
                next.castle(mv, side)
                    .with_context(|| format!("applying {mv} to {self}"))?;
                false
            },
            MoveAction::EnPassant => {
                let _ = next.relocate(mv.from, mv.to);
                // The passed pawn stands next to the origin, behind the
                // destination.
                let _ = next.clear_square(Square::new(mv.from.rank(), mv.to.file()));
                true
            },
            action => {
                let capture = next.relocate(mv.from, mv.to);
                if let Some(kind) = action.promotion() {
                    next.promote(mv.to, kind);
                }
                capture
            },
        };

        if piece.moves_pawn() || capture {
            next.halfmove_clock = 0;
        } else {
            next.halfmove_clock = next.halfmove_clock.saturating_add(1);
        }
        if side == Side::Black {
            next.fullmove_counter = next.fullmove_counter.saturating_add(1);
        }
        next.side_to_move = side.opponent();
        log::trace!("{self} + {mv} -> {next}");
        Ok(next)
    }

    // Moves the piece and keeps castling rights, pawn kinds and the en passant
    // target in sync. Returns whether something was captured.
    fn relocate(&mut self, from: Square, to: Square) -> bool {
        let Some(mut piece) = self.clear_square(from) else {
            return false;
        };
        let captured = self.clear_square(to);
        if let Some(captured) = captured {
            if captured.kind() == PieceKind::Rook {
                self.revoke_corner(to, captured.side());
            }
        }
        match piece.kind() {
            PieceKind::King => self.set_castling(CastleRights::both(piece.side()), false),
            PieceKind::Rook => self.revoke_corner(from, piece.side()),
            PieceKind::Pawn | PieceKind::PawnOffFile => {
                if from.file() != to.file() {
                    piece.promote(PieceKind::PawnOffFile);
                }
                let side = piece.side();
                if from.rank() == side.pawn_rank() && (to.rank() - from.rank()).abs() == 2 {
                    self.set_en_passant(from + side.push_direction());
                }
            },
            _ => (),
        }
        self.place(piece, to);
        captured.is_some()
    }

    // Clears the right tied to a rook corner if the rook there belongs to
    // `side`.
    fn revoke_corner(&mut self, corner: Square, side: Side) {
        if let Some(right) = CastleRights::for_rook_corner(corner) {
            if CastleRights::both(side).contains(right) {
                self.set_castling(right, false);
            }
        }
    }

    fn promote(&mut self, square: Square, kind: PieceKind) {
        if let Some(mut piece) = self.clear_square(square) {
            piece.promote(kind);
            self.place(piece, square);
        }
    }

    fn castle(&mut self, mv: &Move, side: Side) -> anyhow::Result<()> {
        let (king_file, rook_file) = if mv.action == MoveAction::CastleKingside {
            (SHORT_KING_FILE, SHORT_ROOK_FILE)
        } else {
            (LONG_KING_FILE, LONG_ROOK_FILE)
        };
        match self.at(mv.to) {
            Some(rook) if rook.kind() == PieceKind::Rook && rook.side() == side => (),
            _ => bail!("castling needs a rook of {side} on {}", mv.to),
        }
        let rank = mv.from.rank();
        let (Some(king), Some(rook)) = (self.clear_square(mv.from), self.clear_square(mv.to))
        else {
            bail!("castling needs a king on {}", mv.from);
        };
        self.place(king, Square::new(rank, king_file));
        self.place(rook, Square::new(rank, rook_file));
        self.set_castling(CastleRights::both(side), false);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn square(input: &str) -> Square {
        Square::try_from(input).unwrap()
    }

    fn apply(board: &Board, action: MoveAction, from: &str, to: &str) -> Board {
        board
            .apply_move(&Move::new(action, square(from), square(to)))
            .unwrap()
    }

    #[test]
    fn source_board_untouched() {
        let board = Board::starting();
        let next = apply(&board, MoveAction::Move, "g1", "f3");
        assert_eq!(board, Board::starting());
        assert_eq!(
            next.to_string(),
            "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 0"
        );
        let next = apply(&next, MoveAction::Move, "g8", "f6");
        assert_eq!(
            next.to_string(),
            "rnbqkb1r/pppppppp/5n2/8/8/5N2/PPPPPPPP/RNBQKB1R w KQkq - 2 1"
        );
    }

    #[test]
    fn double_step_records_skipped_square() {
        let next = apply(&Board::starting(), MoveAction::Move, "e2", "e4");
        assert_eq!(next.en_passant(), Some(square("e3")));
        assert_eq!(next.halfmove_clock(), 0);
        let next = apply(&next, MoveAction::Move, "b8", "c6");
        assert_eq!(next.en_passant(), None);
    }

    #[test]
    fn capture() {
        let board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 7 10").unwrap();
        let next = apply(&board, MoveAction::Capture, "e4", "d5");
        assert!(next.is_empty(square("e4")));
        let pawn = next.at(square("d5")).unwrap();
        assert_eq!(pawn.kind(), PieceKind::PawnOffFile);
        assert_eq!(pawn.side(), Side::White);
        assert_eq!(pawn.square(), square("d5"));
        assert_eq!(next.piece_count(), 3);
        assert_eq!(next.halfmove_clock(), 0);
    }

    #[test]
    fn clock_resets_on_any_capture() {
        let board = Board::from_fen("4k3/8/8/3p4/8/8/8/3RK3 w - - 7 10").unwrap();
        assert_eq!(apply(&board, MoveAction::Capture, "d1", "d5").halfmove_clock(), 0);
        assert_eq!(apply(&board, MoveAction::Move, "d1", "d4").halfmove_clock(), 8);
    }

    #[test]
    fn en_passant_removes_passed_pawn() {
        let board = Board::from_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1").unwrap();
        let board = apply(&board, MoveAction::Move, "d7", "d5");
        assert_eq!(board.en_passant(), Some(square("d6")));
        let moves = board.generate_moves();
        let en_passant = moves
            .iter()
            .find(|m| m.action == MoveAction::EnPassant)
            .unwrap();
        let next = board.apply_move(en_passant).unwrap();
        assert_eq!(next.to_string(), "4k3/8/3P4/8/8/8/8/4K3 b - - 0 2");
        assert_eq!(
            next.at(square("d6")).unwrap().kind(),
            PieceKind::PawnOffFile
        );
    }

    #[test]
    fn promotion() {
        let board = Board::from_fen("3r3k/4P3/8/8/8/8/8/K7 w - - 3 40").unwrap();
        let next = apply(&board, MoveAction::PromoteKnight, "e7", "e8");
        assert_eq!(next.to_string(), "3rN2k/8/8/8/8/8/8/K7 b - - 0 40");
        let next = apply(&board, MoveAction::PromoteQueen, "e7", "d8");
        assert_eq!(next.to_string(), "3Q3k/8/8/8/8/8/8/K7 b - - 0 40");
    }

    #[test]
    fn castling_rights() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(
            apply(&board, MoveAction::Move, "e1", "e2").castling(),
            CastleRights::BLACK_BOTH
        );
        assert_eq!(
            apply(&board, MoveAction::Move, "h1", "h5").castling(),
            CastleRights::WHITE_LONG | CastleRights::BLACK_BOTH
        );
        assert_eq!(
            apply(&board, MoveAction::Capture, "a1", "a8").castling(),
            CastleRights::WHITE_SHORT | CastleRights::BLACK_SHORT
        );
    }

    #[test]
    fn castling() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let next = apply(&board, MoveAction::CastleKingside, "e1", "h1");
        assert_eq!(next.to_string(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
        assert_eq!(next.king(Side::White), Some(square("g1")));
        let next = apply(&next, MoveAction::CastleQueenside, "e8", "a8");
        assert_eq!(next.to_string(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 2 2");
        assert_eq!(next.king(Side::Black), Some(square("c8")));
    }

    #[test]
    fn invalid_moves() {
        let board = Board::starting();
        assert!(board
            .apply_move(&Move::new(MoveAction::Move, square("e4"), square("e5")))
            .is_err());
        assert!(board
            .apply_move(&Move::new(
                MoveAction::CastleKingside,
                Square::E1,
                square("g1")
            ))
            .is_err());
    }

    #[test]
    fn cached_squares_follow_pieces() {
        let mut board = Board::starting();
        for _ in 0..6 {
            let mv = board.generate_moves()[0];
            board = board.apply_move(&mv).unwrap();
            for (square, piece) in &board.pieces {
                assert_eq!(*square, piece.square());
            }
        }
    }
}
