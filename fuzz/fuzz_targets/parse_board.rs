#![no_main]
use garth::chess::board::Board;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(board) = Board::try_from(input) else {
        return;
    };
    let fen = board.to_string();
    assert_eq!(Board::from_fen(&fen).unwrap().to_string(), fen);
    for mv in board.generate_moves() {
        let _ = board.apply_move(&mv);
    }
});
