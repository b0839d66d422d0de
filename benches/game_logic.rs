use criterion::{black_box, criterion_group, criterion_main, Criterion};
use typefall::core::keystroke::keystroke_cost;
use typefall::core::{GameState, Word};
use typefall::types::{StageConfig, LANE_COUNT, TICK_MS};

fn loaded_state() -> GameState {
    let mut state = GameState::new(12345);
    state.start(1);
    state.load_stage(
        vec!["apple".to_string(), "사과나무".to_string()],
        StageConfig::sanitized(10.0, 1.0, None, None),
    );
    state
}

fn bench_movement_tick(c: &mut Criterion) {
    c.bench_function("movement_tick_full_board", |b| {
        b.iter_batched(
            || {
                let mut state = loaded_state();
                for lane in 0..LANE_COUNT {
                    state.insert_word(Word::new(0, "apple", lane).at(lane as f32 * 40.0));
                    state.insert_landmine(lane, 500.0);
                }
                state
            },
            |mut state| {
                state.movement_tick(black_box(TICK_MS));
                state
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_spawn(c: &mut Criterion) {
    c.bench_function("spawn_tick", |b| {
        b.iter_batched(
            loaded_state,
            |mut state| {
                state.request_spawn(black_box(LANE_COUNT as usize));
                state
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_keystroke_cost(c: &mut Criterion) {
    c.bench_function("keystroke_cost_mixed", |b| {
        b.iter(|| keystroke_cost(black_box("왕사과 Typing Speed!")))
    });
}

criterion_group!(benches, bench_movement_tick, bench_spawn, bench_keystroke_cost);
criterion_main!(benches);
