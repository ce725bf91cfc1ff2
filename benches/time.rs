//! Criterion benchmarks measure time of the clearly separated pieces of code.

// Criterion builder methods return `&mut Self` for chaining.
#![allow(unused_results)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use garth::chess::board::Board;
use garth::chess::pack::PackedBoard;

const POSITIONS: [&str; 6] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
];

fn boards() -> Vec<Board> {
    POSITIONS
        .iter()
        .map(|fen| Board::from_fen(fen).unwrap())
        .collect()
}

fn parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("Notation");
    group.throughput(Throughput::Elements(POSITIONS.len() as u64));
    group.bench_with_input(
        BenchmarkId::new("parse", format!("{} positions", POSITIONS.len())),
        &POSITIONS,
        |b, positions| {
            b.iter(|| {
                for fen in positions {
                    let _ = std::hint::black_box(Board::from_fen(fen));
                }
            });
        },
    );
    let boards = boards();
    group.bench_with_input(
        BenchmarkId::new("print", format!("{} positions", boards.len())),
        &boards,
        |b, boards| {
            b.iter(|| {
                for board in boards {
                    let _ = std::hint::black_box(board.to_string());
                }
            });
        },
    );
    group.finish();
}

fn movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("Move generation");
    let boards = boards();
    group.throughput(Throughput::Elements(boards.len() as u64));
    group.bench_with_input(
        BenchmarkId::new("generate", format!("{} positions", boards.len())),
        &boards,
        |b, boards| {
            b.iter(|| {
                for board in boards {
                    let _ = std::hint::black_box(board.generate_moves());
                }
            });
        },
    );
    group.bench_with_input(
        BenchmarkId::new("generate and apply", format!("{} positions", boards.len())),
        &boards,
        |b, boards| {
            b.iter(|| {
                for board in boards {
                    for mv in board.generate_moves() {
                        let _ = std::hint::black_box(board.apply_move(&mv));
                    }
                }
            });
        },
    );
    group.finish();
}

fn codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("Binary encoding");
    let boards = boards();
    let packed: Vec<PackedBoard> = boards.iter().map(|b| b.pack().unwrap()).collect();
    group.throughput(Throughput::Elements(boards.len() as u64));
    group.bench_with_input(
        BenchmarkId::new("pack", format!("{} positions", boards.len())),
        &boards,
        |b, boards| {
            b.iter(|| {
                for board in boards {
                    let _ = std::hint::black_box(board.pack());
                }
            });
        },
    );
    group.bench_with_input(
        BenchmarkId::new("unpack", format!("{} positions", packed.len())),
        &packed,
        |b, packed| {
            b.iter(|| {
                for bytes in packed {
                    let _ = std::hint::black_box(Board::unpack(bytes));
                }
            });
        },
    );
    group.finish();
}

criterion_group! {
    name = notation;
    config = Criterion::default().sample_size(50);
    targets = parse
}
criterion_group!(position, movegen, codec);
criterion_main!(notation, position);
