//! Benchmark for view transforms and tunnel walks.
//!
//! TARGET: a 250 block tunnel in a 128^3 world in under 1 ms
//!
//! Run with: cargo bench --package delve_procedural --bench walk_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use delve_procedural::{
    AffineView, Block, CaveWalker, Coord, GridBounds, NullObserver, Pattern, VoxelWorld,
    WalkConfig,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn benchmark_view_transforms(c: &mut Criterion) {
    let pattern = Pattern::tunnel();
    let view = AffineView::new(pattern.shape(), Coord::new(64, 32, 64), 0.0).unwrap();

    let mut group = c.benchmark_group("view");
    group.bench_function("rotate_quarter", |b| {
        let mut view = view.clone();
        b.iter(|| view.rotate_y(black_box(std::f64::consts::FRAC_PI_2)));
    });
    group.bench_function("translate_relative", |b| {
        let mut view = view.clone();
        b.iter(|| {
            view.translate_relative(black_box(1.0), black_box(0.0), black_box(3.0));
            view.translate_relative(black_box(-1.0), black_box(0.0), black_box(-3.0));
        });
    });
    group.finish();
}

fn benchmark_stamp(c: &mut Criterion) {
    let mut world = VoxelWorld::filled(GridBounds::from_size(32, 32, 32), Block::STONE);
    let pattern = Pattern::tunnel();
    let view = AffineView::new(pattern.shape(), Coord::new(12, 12, 12), 0.0).unwrap();

    c.bench_function("tunnel_stamp", |b| {
        b.iter(|| view.stamp(&mut world, black_box(&pattern)).unwrap());
    });
}

fn benchmark_walk(c: &mut Criterion) {
    let template = VoxelWorld::layered(GridBounds::from_size(128, 128, 128), 120);
    let pattern = Pattern::tunnel();
    let config = WalkConfig::default();

    let mut group = c.benchmark_group("walk");
    group.sample_size(20);
    group.throughput(Throughput::Elements(u64::from(config.max_length)));
    group.bench_function("default_tunnel_128", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut world = template.clone();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let view = AffineView::new(pattern.shape(), Coord::new(62, 60, 4), 0.0).unwrap();
            black_box(
                CaveWalker::new(&mut world, &mut rng, &mut NullObserver)
                    .walk(view, &pattern, &config)
                    .unwrap(),
            )
        });
    });
    group.finish();
}

criterion_group!(benches, benchmark_view_transforms, benchmark_stamp, benchmark_walk);
criterion_main!(benches);
