use garth::chess::board::Board;
use garth::chess::core::Side;
use garth::chess::moves::{Move, MoveAction};
use itertools::Itertools;
use pretty_assertions::assert_eq;

fn setup(input: &str) -> Board {
    let _ = env_logger::builder().is_test(true).try_init();
    Board::try_from(input).unwrap_or_else(|e| panic!("parsing position {input}: {e:#}"))
}

fn get_moves(board: &Board) -> Vec<String> {
    board
        .generate_moves()
        .iter()
        .map(Move::to_string)
        .sorted()
        .collect::<Vec<_>>()
}

fn sorted_moves(moves: &[&str]) -> Vec<String> {
    moves
        .iter()
        .map(|m| (*m).to_string())
        .sorted()
        .collect::<Vec<_>>()
}

#[test]
fn starting_moves() {
    assert_eq!(
        get_moves(&Board::starting()),
        sorted_moves(&[
            "a2a3", "a2a4", "b1a3", "b1c3", "b2b3", "b2b4", "c2c3", "c2c4", "d2d3", "d2d4", "e2e3",
            "e2e4", "f2f3", "f2f4", "g1f3", "g1h3", "g2g3", "g2g4", "h2h3", "h2h4"
        ])
    );
}

#[test]
fn lone_pawn() {
    assert_eq!(
        get_moves(&setup("8/8/8/8/4P3/8/8/8 w - - 0 1")),
        sorted_moves(&["e4e5"])
    );
}

#[test]
fn basic_moves() {
    assert_eq!(
        get_moves(&setup("2n4k/1PP5/6K1/3Pp1Q1/3N4/3P4/P3R3/8 w - e6 0 1")),
        sorted_moves(&[
            "a2a3", "a2a4", "e2e3", "e2e4", "e2e5", "e2e1", "e2d2", "e2c2", "e2b2", "e2f2", "e2g2",
            "e2h2", "d4b5", "d4c6", "d4e6", "d4f5", "d4f3", "d4c2", "d4b3", "d5d6", "d5e6", "g5g4",
            "g5g3", "g5g2", "g5g1", "g5f5", "g5e5", "g5h5", "g5f6", "g5e7", "g5d8", "g5h6", "g5f4",
            "g5e3", "g5d2", "g5c1", "g5h4", "g6g7", "g6f6", "g6h6", "g6f7", "g6h7", "g6f5", "g6h5",
            "b7b8q", "b7b8b", "b7b8n", "b7b8r", "b7c8q", "b7c8b", "b7c8n", "b7c8r",
        ])
    );
}

#[test]
fn actions() {
    let board = setup("2n4k/1PP5/6K1/3Pp1Q1/3N4/3P4/P3R3/8 w - e6 0 1");
    let moves = board.generate_moves();
    let count = |action: MoveAction| moves.iter().filter(|m| m.action == action).count();
    assert_eq!(count(MoveAction::EnPassant), 1);
    // e2e5 and g5e5: taking the knight on c8 is a promotion.
    assert_eq!(count(MoveAction::Capture), 2);
    for action in MoveAction::PROMOTIONS {
        assert_eq!(count(action), 2);
    }
    assert_eq!(count(MoveAction::CastleKingside), 0);
    assert_eq!(count(MoveAction::CastleQueenside), 0);
}

#[test]
fn pseudo_legal_only() {
    // The knight is pinned but its moves are still generated.
    let board = setup("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1");
    assert_eq!(
        get_moves(&board),
        sorted_moves(&[
            "e1d1", "e1f1", "e1d2", "e1f2", "e2c3", "e2d4", "e2f4", "e2g3", "e2g1", "e2c1"
        ])
    );
}

#[test]
fn rooks_and_king() {
    let board = setup("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
    let moves = get_moves(&board);
    assert_eq!(moves.len(), 24);
    assert!(moves.contains(&"a8a1".to_string()));
    assert!(moves.contains(&"h8h1".to_string()));
    assert!(!moves.contains(&"e8g8".to_string()));
    assert_eq!(
        board.generate_moves_for(Side::White).len(),
        board.generate_moves().len()
    );
}

#[test]
fn black_promotions_in_order() {
    let board = setup("8/8/8/8/8/8/p7/1N6 b - - 0 1");
    assert_eq!(
        board
            .generate_moves()
            .iter()
            .map(Move::to_string)
            .collect::<Vec<_>>(),
        ["a2a1q", "a2a1b", "a2a1n", "a2a1r", "a2b1q", "a2b1b", "a2b1n", "a2b1r"]
    );
}

#[test]
fn deterministic_order() {
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
    assert_eq!(setup(fen).generate_moves(), setup(fen).generate_moves());
}
