use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use glam::Vec2;

use arena_sim::{Arena, Direction, FrameClock, InputFrame, SimConfig};

fn default_arena() -> Arena {
    let mut config = SimConfig::default();
    config.seed = 42;
    Arena::from_config(config)
}

fn bench_tick(c: &mut Criterion) {
    let input = InputFrame::idle()
        .holding(&[Direction::Up, Direction::Right])
        .aiming_at(Vec2::new(2400.0, 1800.0));

    c.bench_function("tick_default_match", |b| {
        b.iter_batched(
            default_arena,
            |mut arena| {
                let mut clock = FrameClock::new(0, 1.0);
                for _ in 0..60 {
                    clock = clock.next_frame(&arena.config().timing);
                    black_box(arena.tick(&input, clock));
                }
                arena
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("tick_with_fire", |b| {
        let mut arena = default_arena();
        let mut clock = FrameClock::new(0, 1.0);
        let firing = input.firing();
        b.iter(|| {
            clock = clock.next_frame(&arena.config().timing);
            if arena.phase().is_terminal() {
                arena.restart();
            }
            black_box(arena.tick(&firing, clock))
        })
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
