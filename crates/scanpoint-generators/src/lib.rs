//! # scanpoint-generators
//!
//! Concrete [`Generator`](scanpoint_core::Generator) variants.
//!
//! | Generator | Axes | Shape |
//! |---|---|---|
//! | [`LineGenerator`] | 1..n | evenly spaced, `start` → `stop` inclusive |
//! | [`ArrayGenerator`] | 1 | explicit positions |
//! | [`StaticPointGenerator`] | 0 or 1 | fixed position repeated `size` times |
//! | [`SpiralGenerator`] | 2 | Archimedean spiral from the centre outwards |
//! | [`LissajousGenerator`] | 2 | closed Lissajous figure |
//! | [`ZipGenerator`] | union of children | children advanced in lock-step |
//! | [`RandomOffsetGenerator`] | wrapped | wrapped positions plus seeded jitter |
//!
//! Curve-based leaves share [`sample_curve`](scanpoint_core::sample_curve):
//! bin edges sit half an index either side of each sample.

pub mod array;
pub mod line;
pub mod lissajous;
pub mod random_offset;
pub mod spiral;
pub mod static_point;
pub mod zip;

pub use array::{ArrayGenerator, ARRAY_TYPEID};
pub use line::{LineGenerator, LINE_TYPEID};
pub use lissajous::{LissajousGenerator, LISSAJOUS_TYPEID, POINTS_PER_LOBE};
pub use random_offset::{RandomOffsetGenerator, RANDOM_OFFSET_TYPEID};
pub use spiral::{SpiralGenerator, SPIRAL_TYPEID};
pub use static_point::{StaticPointGenerator, STATIC_TYPEID};
pub use zip::{ZipGenerator, ZIP_TYPEID};

use scanpoint_core::VariantRegistry;

/// Register every generator in this crate.
pub fn register(registry: &mut VariantRegistry) {
    registry
        .register_generator(LINE_TYPEID, line::construct)
        .register_generator(ARRAY_TYPEID, array::construct)
        .register_generator(STATIC_TYPEID, static_point::construct)
        .register_generator(SPIRAL_TYPEID, spiral::construct)
        .register_generator(LISSAJOUS_TYPEID, lissajous::construct)
        .register_generator(ZIP_TYPEID, zip::construct)
        .register_generator(RANDOM_OFFSET_TYPEID, random_offset::construct);
}
