#![no_main]
use garth::chess::board::Board;
use garth::chess::pack::{PackedBoard, PACKED_BOARD_SIZE};
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    let Ok(bytes) = <[u8; PACKED_BOARD_SIZE]>::try_from(data) else {
        return;
    };
    let packed = PackedBoard::from_bytes(bytes);
    if let Ok(board) = Board::unpack(&packed) {
        // Anything that decodes is canonical.
        assert_eq!(board.pack().unwrap(), packed);
    }
});
