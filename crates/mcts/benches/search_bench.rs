use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use reversi_core::{Board, Color};
use reversi_mcts::classic::random_playout;
use reversi_mcts::{GuidedSearch, MctsConfig, UniformEvaluator};

/// Guided search from the opening with different iteration counts
fn bench_guided_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("guided_search");
    let board = Board::new();

    for num_sims in [16, 64, 400].iter() {
        let config = MctsConfig::default().with_simulations(*num_sims);
        let mut search = GuidedSearch::new();
        let mut rng = StdRng::seed_from_u64(0);

        group.bench_with_input(BenchmarkId::from_parameter(num_sims), num_sims, |b, _| {
            b.iter(|| {
                let result = search
                    .search(
                        black_box(&board),
                        Color::Black,
                        &UniformEvaluator,
                        &config,
                        &mut rng,
                    )
                    .expect("search failed");
                black_box(result)
            });
        });
    }

    group.finish();
}

/// One random game to completion, the unit of work of the classic search
fn bench_random_playout(c: &mut Criterion) {
    let board = Board::new();
    let mut rng = StdRng::seed_from_u64(0);

    c.bench_function("random_playout", |b| {
        b.iter(|| {
            random_playout(black_box(&board), Color::Black, &mut rng).expect("playout failed")
        })
    });
}

criterion_group!(benches, bench_guided_search, bench_random_playout);
criterion_main!(benches);
