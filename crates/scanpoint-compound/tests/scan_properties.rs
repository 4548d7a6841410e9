//! End-to-end properties of prepared compound scans.
//!
//! Each test builds a scan from the shipped generators, regions and mutators
//! and checks retrieval through the public API only.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use scanpoint_compound::CompoundGenerator;
use scanpoint_core::{Excluder, Generator, Mutator, PointBatch, ScanConfig, ScanError};
use scanpoint_generators::{
    ArrayGenerator, LineGenerator, LissajousGenerator, RandomOffsetGenerator, SpiralGenerator,
    StaticPointGenerator, ZipGenerator,
};
use scanpoint_mutators::RandomOffsetMutator;
use scanpoint_roi::{CircularRoi, PolygonalRoi, RoiExcluder};

// ─────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────

fn line(axis: &str, start: f64, stop: f64, size: usize) -> Box<dyn Generator> {
    Box::new(LineGenerator::new(axis, "mm", start, stop, size).unwrap())
}

fn snake(axis: &str, start: f64, stop: f64, size: usize) -> Box<dyn Generator> {
    Box::new(LineGenerator::new(axis, "mm", start, stop, size).unwrap().with_alternate(true))
}

fn circle_excluder(centre: [f64; 2], radius: f64) -> Box<dyn Excluder> {
    Box::new(
        RoiExcluder::new(
            vec![Box::new(CircularRoi::new(centre, radius).unwrap())],
            vec!["x".into(), "y".into()],
        )
        .unwrap(),
    )
}

fn prepared(
    dims: Vec<Box<dyn Generator>>,
    excluders: Vec<Box<dyn Excluder>>,
    mutators: Vec<Box<dyn Mutator>>,
) -> CompoundGenerator {
    let mut g = CompoundGenerator::new(dims, excluders, mutators, 0.5, true, 0.0).unwrap();
    g.prepare().unwrap();
    g
}

/// A scan touching every feature: zip, snake, mask and mutator.
fn busy_scan() -> CompoundGenerator {
    let zipped = ZipGenerator::new(vec![
        snake("x", 0.0, 4.0, 9),
        Box::new(
            ArrayGenerator::new("t", "s", (0..9).map(|i| i as f64 * 0.1).collect())
                .unwrap()
                .with_alternate(true),
        ),
    ])
    .unwrap();
    let mutator: Box<dyn Mutator> = Box::new(
        RandomOffsetMutator::new(11, vec!["x".into(), "y".into()], vec![0.05, 0.02]).unwrap(),
    );
    prepared(
        vec![line("z", 0.0, 1.0, 3), line("y", 0.0, 4.0, 7), Box::new(zipped)],
        vec![circle_excluder([2.0, 2.0], 1.2)],
        vec![mutator],
    )
}

fn assert_same_batch(a: &PointBatch, b: &PointBatch) {
    assert_eq!(a.len(), b.len());
    assert_eq!(a.positions, b.positions);
    assert_eq!(a.lower, b.lower);
    assert_eq!(a.upper, b.upper);
    assert_eq!(a.indexes, b.indexes);
    assert_eq!(a.duration, b.duration);
    assert_eq!(a.delay_after, b.delay_after);
}

// ─────────────────────────────────────────────────────
// Retrieval equivalences
// ─────────────────────────────────────────────────────

#[test]
fn scalar_and_batch_retrieval_agree() {
    let g = busy_scan();
    let size = g.size().unwrap();
    let all = g.get_points(0, size).unwrap();
    for i in 0..size {
        assert_eq!(g.get_point(i).unwrap(), all.point(i).unwrap(), "point {i}");
    }
}

#[test]
fn chunked_retrieval_concatenates() {
    let g = busy_scan();
    let size = g.size().unwrap();
    let whole = g.get_points(0, size).unwrap();
    let mut rng = StdRng::seed_from_u64(0x5CA7);
    for _ in 0..20 {
        let mut cuts = [rng.gen_range(0..=size), rng.gen_range(0..=size)];
        cuts.sort_unstable();
        let [a, b] = cuts;
        let mut joined = g.get_points(0, a).unwrap();
        joined.append(&g.get_points(a, b).unwrap()).unwrap();
        joined.append(&g.get_points(b, size).unwrap()).unwrap();
        assert_same_batch(&joined, &whole);
    }
}

#[test]
fn iterators_cover_the_scan_in_order() {
    let g = busy_scan();
    let size = g.size().unwrap();
    let whole = g.get_points(0, size).unwrap();

    let points: Vec<_> = g.iter().collect::<Result<_, _>>().unwrap();
    assert_eq!(points.len(), size);
    assert_eq!(points, whole.points().collect::<Vec<_>>());

    let mut stitched = PointBatch::empty(g.shape().len(), g.axes());
    for batch in g.batches(17) {
        let batch = batch.unwrap();
        assert!(batch.len() <= 17);
        stitched.append(&batch).unwrap();
    }
    assert_same_batch(&stitched, &whole);
}

#[test]
fn prepare_chunk_does_not_change_the_mask() {
    let build = |chunk: usize| {
        let mut g = CompoundGenerator::new(
            vec![line("y", 0.0, 5.0, 11), snake("x", 0.0, 5.0, 13)],
            vec![circle_excluder([2.0, 3.0], 1.7)],
            Vec::new(),
            0.1,
            true,
            0.0,
        )
        .unwrap()
        .with_config(ScanConfig::default().with_prepare_chunk(chunk))
        .unwrap();
        g.prepare().unwrap();
        g
    };
    let reference = build(65_536);
    for chunk in [1, 7, 13, 50] {
        let g = build(chunk);
        assert_eq!(g.size(), reference.size());
        let n = g.size().unwrap();
        assert_same_batch(&g.get_points(0, n).unwrap(), &reference.get_points(0, n).unwrap());
    }
}

// ─────────────────────────────────────────────────────
// Index space
// ─────────────────────────────────────────────────────

#[test]
fn mixed_radix_indexes() {
    let g = prepared(
        vec![line("x", 0.0, 5.0, 5), line("y", 0.0, 5.0, 5), line("z", 0.0, 5.0, 5)],
        Vec::new(),
        Vec::new(),
    );
    assert_eq!(g.raw_size(), 125);
    assert_eq!(g.get_point(7).unwrap().indexes, vec![0, 1, 2]);
    assert_eq!(g.get_point(11).unwrap().indexes, vec![0, 2, 1]);
}

#[test]
fn alternating_dimension_snakes() {
    let g = prepared(
        vec![line("x", 0.0, 5.0, 5), snake("y", 0.0, 5.0, 5), line("z", 0.0, 5.0, 5)],
        Vec::new(),
        Vec::new(),
    );
    let rows = g.get_points(0, 11).unwrap().indexes;
    assert_eq!(rows.row(0).to_vec(), vec![0, 0, 0]);
    assert_eq!(rows.row(9).to_vec(), vec![0, 1, 4]);
    assert_eq!(rows.row(10).to_vec(), vec![0, 2, 0]);

    let rows = g.get_points(16, 27).unwrap().indexes;
    let expected = [
        [0, 3, 1], [0, 3, 2], [0, 3, 3], [0, 3, 4], [0, 4, 0], [0, 4, 1],
        [0, 4, 2], [0, 4, 3], [0, 4, 4], [1, 4, 0], [1, 4, 1],
    ];
    for (row, want) in rows.rows().into_iter().zip(expected) {
        assert_eq!(row.to_vec(), want.to_vec());
    }
}

// ─────────────────────────────────────────────────────
// Masking
// ─────────────────────────────────────────────────────

#[test]
fn circular_excluder_removes_inside_points() {
    let (c, r) = ([2.5, 2.5], 1.01);
    let g = prepared(
        vec![line("y", 0.5, 5.5, 6), line("x", 0.5, 5.5, 6)],
        vec![circle_excluder(c, r)],
        Vec::new(),
    );
    let size = g.size().unwrap();
    assert_eq!(g.raw_size(), 36);
    assert_eq!(size, 31);

    let b = g.get_points(0, size).unwrap();
    for (x, y) in b.positions["x"].iter().zip(b.positions["y"].iter()) {
        let d2 = (x - c[0]).powi(2) + (y - c[1]).powi(2);
        assert!(d2 > r * r, "({x}, {y}) should have been excluded");
    }
}

#[test]
fn excluders_combine_and_keep_order() {
    let polygon: Box<dyn Excluder> = Box::new(
        RoiExcluder::new(
            vec![Box::new(
                PolygonalRoi::new(vec![4.0, 6.0, 6.0, 4.0], vec![4.0, 4.0, 6.0, 6.0]).unwrap(),
            )],
            vec!["x".into(), "y".into()],
        )
        .unwrap(),
    );
    let g = prepared(
        vec![line("y", 0.5, 5.5, 6), line("x", 0.5, 5.5, 6)],
        vec![circle_excluder([2.5, 2.5], 1.01), polygon],
        Vec::new(),
    );
    // Circle removes 5, the square (4..6)² removes the 4 corner points.
    assert_eq!(g.size().unwrap(), 27);

    let b = g.get_points(0, 27).unwrap();
    let linear: Vec<usize> = b.indexes.rows().into_iter().map(|r| r[0] * 6 + r[1]).collect();
    assert!(linear.windows(2).all(|w| w[0] < w[1]));
}

// ─────────────────────────────────────────────────────
// Bin edges
// ─────────────────────────────────────────────────────

#[test]
fn innermost_bin_edges_and_stationary_outer_axes() {
    let g = prepared(
        vec![line("x", 0.0, 5.0, 5), line("y", 0.0, 5.0, 5), line("z", 0.0, 5.0, 5)],
        Vec::new(),
        Vec::new(),
    );
    let b = g.get_points(7, 12).unwrap();
    assert_eq!(b.lower["z"].to_vec(), vec![1.875, 3.125, 4.375, -0.625, 0.625]);
    assert_eq!(b.upper["z"].to_vec(), vec![3.125, 4.375, 5.625, 0.625, 1.875]);
    for axis in ["x", "y"] {
        assert_eq!(b.lower[axis], b.positions[axis]);
        assert_eq!(b.upper[axis], b.positions[axis]);
    }
}

#[test]
fn mutators_leave_bin_edges_alone() {
    let mutator: Box<dyn Mutator> =
        Box::new(RandomOffsetMutator::new(5, vec!["x".into()], vec![0.3]).unwrap());
    let plain = prepared(vec![line("y", 0.0, 1.0, 3), line("x", 0.0, 4.0, 5)], Vec::new(), Vec::new());
    let jittered =
        prepared(vec![line("y", 0.0, 1.0, 3), line("x", 0.0, 4.0, 5)], Vec::new(), vec![mutator]);

    let (a, b) = (plain.get_points(0, 15).unwrap(), jittered.get_points(0, 15).unwrap());
    assert_eq!(a.lower, b.lower);
    assert_eq!(a.upper, b.upper);
    assert_eq!(a.positions["y"], b.positions["y"]);
    assert_ne!(a.positions["x"], b.positions["x"]);
}

// ─────────────────────────────────────────────────────
// Reproducibility
// ─────────────────────────────────────────────────────

#[test]
fn random_offset_mutator_is_reproducible() {
    let first = busy_scan();
    let second = busy_scan();
    let n = first.size().unwrap();
    let a = first.get_points(0, n).unwrap();
    let b = second.get_points(0, n).unwrap();
    assert_eq!(a.positions, b.positions);

    // Out-of-order scalar reads see the same offsets.
    for i in (0..n).rev().step_by(3) {
        assert_eq!(second.get_point(i).unwrap().positions, a.point(i).unwrap().positions);
    }
}

#[test]
fn random_offset_generator_inside_a_scan() {
    let mut max = BTreeMap::new();
    max.insert("x".to_string(), 0.1);
    let wrapped = RandomOffsetGenerator::new(line("x", 0.0, 2.0, 5), 3, max).unwrap();
    let g = prepared(vec![line("y", 0.0, 1.0, 2), Box::new(wrapped)], Vec::new(), Vec::new());
    let b = g.get_points(0, 10).unwrap();
    // The same inner index is perturbed identically on every row.
    assert_eq!(b.positions["x"][1], b.positions["x"][6]);
    assert_eq!(b.lower["x"][1], b.upper["x"][0]);
}

// ─────────────────────────────────────────────────────
// Other leaves
// ─────────────────────────────────────────────────────

#[test]
fn spiral_and_lissajous_dimensions() {
    let spiral = SpiralGenerator::new(["x", "y"], "mm", [0.0, 0.0], 1.5, 1.0).unwrap();
    let g = prepared(
        vec![Box::new(StaticPointGenerator::new(2).unwrap()), Box::new(spiral)],
        Vec::new(),
        Vec::new(),
    );
    assert_eq!(g.size().unwrap(), 14);
    let p = g.get_point(8).unwrap();
    assert_eq!(p.indexes, vec![1, 1]);
    assert!((p.positions["x"] - -0.6440318266552169).abs() < 1e-12);

    let liss = LissajousGenerator::new(["a", "b"], "mm", [0.0, 0.0], [2.0, 2.0], 1, Some(8)).unwrap();
    let g = prepared(vec![Box::new(liss)], Vec::new(), Vec::new());
    assert_eq!(g.units_by_axis()["b"], "mm");
    assert_eq!(g.size().unwrap(), 8);
}

// ─────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────

#[test]
fn error_taxonomy() {
    let mut g = CompoundGenerator::new(
        vec![line("y", 0.0, 1.0, 2), line("x", 0.0, 1.0, 3)],
        Vec::new(),
        Vec::new(),
        0.1,
        false,
        0.0,
    )
    .unwrap();
    assert_eq!(g.get_points(0, 1).unwrap_err(), ScanError::NotPrepared);
    assert!(matches!(g.batches(4).next(), Some(Err(ScanError::NotPrepared))));

    g.prepare().unwrap();
    assert_eq!(
        g.get_points(2, 7).unwrap_err(),
        ScanError::OutOfRange { start: 2, end: 7, size: 6 }
    );
    assert_eq!(
        g.get_points(4, 3).unwrap_err(),
        ScanError::OutOfRange { start: 4, end: 3, size: 6 }
    );
    assert!(g.get_points(6, 6).unwrap().is_empty());

    let leaf = LineGenerator::new("x", "mm", 0.0, 1.0, 3).unwrap();
    assert!(matches!(leaf.generate(&[5]), Err(ScanError::IndexRange { index: 5, .. })));

    let bad = serde_json::json!({ "typeid": "scanpointgenerator:generator/Nope:1.0" });
    assert!(matches!(
        scanpoint_compound::registry().generator_from_dict(&bad),
        Err(ScanError::UnknownVariant { .. })
    ));

    let zip = ZipGenerator::new(vec![line("a", 0.0, 1.0, 3), line("b", 0.0, 1.0, 4)]);
    assert!(matches!(zip, Err(ScanError::Configuration(_))));
}
