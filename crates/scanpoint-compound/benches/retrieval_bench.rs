use criterion::{black_box, criterion_group, criterion_main, Criterion};

use scanpoint_compound::CompoundGenerator;
use scanpoint_core::{Excluder, Generator, Mutator};
use scanpoint_generators::{LineGenerator, SpiralGenerator};
use scanpoint_mutators::RandomOffsetMutator;
use scanpoint_roi::{CircularRoi, RoiExcluder};

fn grid(n: usize, masked: bool, jittered: bool) -> CompoundGenerator {
    let dims: Vec<Box<dyn Generator>> = vec![
        Box::new(LineGenerator::new("y", "mm", 0.0, 10.0, n).unwrap()),
        Box::new(LineGenerator::new("x", "mm", 0.0, 10.0, n).unwrap().with_alternate(true)),
    ];
    let excluders: Vec<Box<dyn Excluder>> = if masked {
        vec![Box::new(
            RoiExcluder::new(
                vec![Box::new(CircularRoi::new([5.0, 5.0], 4.0).unwrap())],
                vec!["x".into(), "y".into()],
            )
            .unwrap(),
        )]
    } else {
        Vec::new()
    };
    let mutators: Vec<Box<dyn Mutator>> = if jittered {
        vec![Box::new(
            RandomOffsetMutator::new(1, vec!["x".into(), "y".into()], vec![0.01, 0.01]).unwrap(),
        )]
    } else {
        Vec::new()
    };
    CompoundGenerator::new(dims, excluders, mutators, 0.1, true, 0.0).unwrap()
}

fn bench_prepare_masked_500x500(c: &mut Criterion) {
    c.bench_function("prepare_masked_500x500", |b| {
        b.iter(|| {
            let mut g = grid(500, true, false);
            g.prepare().unwrap();
            black_box(g.size().unwrap())
        })
    });
}

fn bench_get_points_dense_10k(c: &mut Criterion) {
    let mut g = grid(500, false, false);
    g.prepare().unwrap();
    c.bench_function("get_points_dense_10k", |b| {
        b.iter(|| g.get_points(black_box(100_000), black_box(110_000)).unwrap())
    });
}

fn bench_get_points_masked_jittered_10k(c: &mut Criterion) {
    let mut g = grid(500, true, true);
    g.prepare().unwrap();
    c.bench_function("get_points_masked_jittered_10k", |b| {
        b.iter(|| g.get_points(black_box(50_000), black_box(60_000)).unwrap())
    });
}

fn bench_get_point_scalar(c: &mut Criterion) {
    let mut g = grid(500, true, false);
    g.prepare().unwrap();
    c.bench_function("get_point_scalar", |b| {
        b.iter(|| g.get_point(black_box(77_777)).unwrap())
    });
}

fn bench_spiral_generate_10k(c: &mut Criterion) {
    let spiral = SpiralGenerator::new(["x", "y"], "mm", [0.0, 0.0], 50.0, 0.5).unwrap();
    let idx: Vec<usize> = (0..10_000).collect();
    c.bench_function("spiral_generate_10k", |b| {
        b.iter(|| spiral.generate(black_box(&idx)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_prepare_masked_500x500,
    bench_get_points_dense_10k,
    bench_get_points_masked_jittered_10k,
    bench_get_point_scalar,
    bench_spiral_generate_10k,
);
criterion_main!(benches);
