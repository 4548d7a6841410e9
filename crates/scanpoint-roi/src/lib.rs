//! # scanpoint-roi
//!
//! Two-dimensional regions of interest and the excluder that applies them.
//!
//! | Region | Inside when |
//! |---|---|
//! | [`CircularRoi`] | distance to centre ≤ radius |
//! | [`RectangularRoi`] | within width × height of `start`, rotated about it |
//! | [`EllipticalRoi`] | `(u/a)² + (v/b)² ≤ 1` in the rotated frame |
//! | [`PolygonalRoi`] | even-odd ray casting |
//! | [`SectorRoi`] | radius and polar angle both in range |
//!
//! [`RoiExcluder`] ORs its regions: a point is excluded when any region
//! contains it.

pub mod circle;
pub mod ellipse;
pub mod excluder;
pub mod polygon;
pub mod rectangle;
pub mod sector;

pub use circle::{CircularRoi, CIRCLE_TYPEID};
pub use ellipse::{EllipticalRoi, ELLIPSE_TYPEID};
pub use excluder::{RoiExcluder, ROI_EXCLUDER_TYPEID};
pub use polygon::{PolygonalRoi, POLYGON_TYPEID};
pub use rectangle::{RectangularRoi, RECTANGLE_TYPEID};
pub use sector::{SectorRoi, SECTOR_TYPEID};

use scanpoint_core::{malformed, Result, VariantRegistry};

/// Register every region and the ROI excluder.
pub fn register(registry: &mut VariantRegistry) {
    registry
        .register_roi(CIRCLE_TYPEID, circle::construct)
        .register_roi(RECTANGLE_TYPEID, rectangle::construct)
        .register_roi(ELLIPSE_TYPEID, ellipse::construct)
        .register_roi(POLYGON_TYPEID, polygon::construct)
        .register_roi(SECTOR_TYPEID, sector::construct)
        .register_excluder(ROI_EXCLUDER_TYPEID, excluder::construct);
}

/// Unpack a two-element parameter list of a serialized `typeid`.
pub(crate) fn pair(typeid: &str, what: &str, values: &[f64]) -> Result<[f64; 2]> {
    match values {
        [a, b] => Ok([*a, *b]),
        _ => Err(malformed(
            typeid,
            format!("{what} needs exactly two values, got {}", values.len()),
        )),
    }
}
