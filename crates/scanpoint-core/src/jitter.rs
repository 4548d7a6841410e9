//! Reproducible per-point jitter.
//!
//! The value for `(seed, index, slot)` never depends on which other points
//! are requested alongside it, so scalar and batched retrieval agree and a
//! resumed scan replays the same motion. The mapping is fixed arithmetic on
//! the key, so it does not move with dependency versions.

/// SplitMix64 finaliser.
#[inline]
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// 2⁻⁵³: scales the top 53 bits of a word onto `[0, 1)`.
const UNIT: f64 = 1.0 / (1u64 << 53) as f64;

/// Uniform value in `[-1, 1)` keyed by `seed`, point `index` and axis `slot`.
pub fn jitter(seed: u64, index: usize, slot: usize) -> f64 {
    let key = mix(seed ^ mix(index as u64 ^ mix(slot as u64).rotate_left(17)));
    let unit = (mix(key) >> 11) as f64 * UNIT;
    unit * 2.0 - 1.0
}
