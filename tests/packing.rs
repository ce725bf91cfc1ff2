use garth::chess::board::{Board, STARTING_FEN};
use garth::chess::error::CodecError;
use garth::chess::moves::{Move, PackedMove};
use garth::chess::pack::{PackedBoard, PACKED_BOARD_SIZE};
use pretty_assertions::assert_eq;

const POSITIONS: [&str; 6] = [
    STARTING_FEN,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
    "4k3/8/8/3pP3/8/8/8/4K3 w - d6 31 255",
    "8/8/8/8/8/8/8/8 b - - 0 0",
];

fn setup(input: &str) -> Board {
    let _ = env_logger::builder().is_test(true).try_init();
    Board::from_fen(input).unwrap()
}

#[test]
fn board_round_trips() {
    for fen in POSITIONS {
        let board = setup(fen);
        let packed = board.pack().unwrap();
        let unpacked = Board::unpack(&packed).unwrap();
        assert_eq!(unpacked.to_string(), fen);
        assert_eq!(unpacked, board);
        let copy = PackedBoard::from_bytes(*packed.as_bytes());
        assert_eq!(Board::unpack(&copy).unwrap(), board);
    }
}

#[test]
fn starting_bytes() {
    let packed = Board::starting().pack().unwrap();
    assert_eq!(
        packed.to_string(),
        concat!(
            // Game information: 32 pieces, no en passant, all castling rights.
            "20000080f0000000",
            "ffff00000000ffff",
            "dcba9bcd",
            "eeeeeeee",
            "66666666",
            "54321345",
        )
    );
}

#[test]
fn generated_moves_round_trip() {
    for fen in POSITIONS {
        let board = setup(fen);
        for mv in board.generate_moves() {
            let packed = mv.pack();
            assert_eq!(packed.bits() >> 20, 0);
            assert_eq!(Move::unpack(packed).unwrap(), mv);
            assert_eq!(Move::unpack(PackedMove::from_bits(packed.bits())).unwrap(), mv);
        }
    }
}

#[test]
fn corrupt_boards() {
    let error = Board::unpack(&PackedBoard::from_bytes([0xFF; PACKED_BOARD_SIZE])).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<CodecError>(),
        Some(CodecError::CorruptEncoding(_))
    ));
}

#[test]
fn too_many_pieces() {
    let board = setup("rnbqkbnr/pppppppp/8/8/8/QQ6/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    assert_eq!(
        board.pack().unwrap_err().downcast_ref::<CodecError>(),
        Some(&CodecError::TooManyPieces(34))
    );
}
