use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use itertools::Itertools as _;
use tilepack::board::{Board, Direction, test_utils};

/// Generate random boards covering every fill level of the given size.
fn generate_boards(size: usize, count: usize) -> Vec<Board> {
    (0..=size * size)
        .cartesian_product(0..count)
        .map(|(filled, _)| test_utils::random_board(size, filled))
        .collect()
}

fn bench_shift(c: &mut Criterion) {
    const COUNT: usize = 20;

    let mut group = c.benchmark_group("shift");

    for size in [2, 4, 8] {
        let boards = generate_boards(size, COUNT);
        group.throughput(Throughput::Elements(boards.len() as u64));

        group.bench_function(format!("left_{size}x{size}"), |b| {
            b.iter(|| {
                for board in &boards {
                    let mut board = board.clone();
                    black_box(board.shift(Direction::Left));
                }
            });
        });
    }
}

fn bench_directions(c: &mut Criterion) {
    const COUNT: usize = 20;

    let mut group = c.benchmark_group("directions");

    let boards = generate_boards(4, COUNT);
    group.throughput(Throughput::Elements(boards.len() as u64));

    for direction in Direction::ALL {
        group.bench_function(format!("shift_{direction}"), |b| {
            b.iter(|| {
                for board in &boards {
                    let mut board = board.clone();
                    black_box(board.shift(direction));
                }
            });
        });
    }
}

criterion_group!(benches, bench_shift, bench_directions);
criterion_main!(benches);
