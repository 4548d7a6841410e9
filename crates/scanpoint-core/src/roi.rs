//! The region-of-interest contract.

use std::fmt;

use ndarray::{Array1, ArrayView1, Zip};
use serde_json::Value;

/// A two-dimensional geometric predicate.
pub trait Roi: fmt::Debug + Send + Sync {
    /// Serialization discriminator, e.g. `scanpointgenerator:roi/CircularROI:1.0`.
    fn typeid(&self) -> &'static str;

    /// Whether `(x, y)` lies inside the region (boundary included).
    fn contains(&self, x: f64, y: f64) -> bool;

    /// Batch form of [`Roi::contains`]: one boolean per coordinate pair.
    fn mask_points(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Array1<bool> {
        Zip::from(&x).and(&y).map_collect(|&px, &py| self.contains(px, py))
    }

    /// Tagged key-value form understood by the variant registry.
    fn to_dict(&self) -> Value;
}
