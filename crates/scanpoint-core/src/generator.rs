//! The axis-generator contract.
//!
//! A [`Generator`] owns one or more axes and maps every index in
//! `[0, size)` to a position plus the lower/upper edges of the integration
//! window around it. Generators are immutable after construction and pure in
//! the index.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use ndarray::Array1;
use serde_json::Value;

use crate::error::{Result, ScanError};
use crate::point::{AxisArrays, GeneratedArrays};

/// An immutable, deterministic producer of positions for one scan dimension.
pub trait Generator: fmt::Debug + Send + Sync {
    /// Serialization discriminator, e.g.
    /// `scanpointgenerator:generator/LineGenerator:1.0`.
    fn typeid(&self) -> &'static str;

    /// Axis names, ordered and distinct.
    fn axes(&self) -> &[String];

    /// Physical unit per axis, parallel to [`Generator::axes`].
    fn units(&self) -> &[String];

    /// Number of points along this dimension (≥ 1).
    fn size(&self) -> usize;

    /// Whether the dimension reverses direction on alternate passes.
    fn alternate(&self) -> bool;

    /// Positions and bin edges for every requested index.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::IndexRange`] if any index is outside `[0, size)`.
    fn generate(&self, indices: &[usize]) -> Result<GeneratedArrays>;

    /// Tagged key-value form understood by the variant registry.
    fn to_dict(&self) -> Value;

    /// Axis → unit map.
    fn units_by_axis(&self) -> BTreeMap<String, String> {
        self.axes()
            .iter()
            .cloned()
            .zip(self.units().iter().cloned())
            .collect()
    }
}

/// Fail with [`ScanError::IndexRange`] on the first index outside `[0, size)`.
pub fn check_indices(generator: &str, size: usize, indices: &[usize]) -> Result<()> {
    match indices.iter().find(|&&i| i >= size) {
        Some(&index) => Err(ScanError::IndexRange {
            generator: generator.to_string(),
            index,
            size,
        }),
        None => Ok(()),
    }
}

/// Sample a continuous curve at integer indices.
///
/// `curve` maps fractional indices to per-axis positions. The position of
/// index `i` is `curve(i)`; its bin edges are `curve(i - 0.5)` and
/// `curve(i + 0.5)`, i.e. the midpoints to the neighbouring samples, half a
/// step beyond the ends of the range.
pub fn sample_curve<F>(generator: &str, size: usize, indices: &[usize], curve: F) -> Result<GeneratedArrays>
where
    F: Fn(&Array1<f64>) -> AxisArrays,
{
    check_indices(generator, size, indices)?;
    let t: Array1<f64> = indices.iter().map(|&i| i as f64).collect();
    Ok(GeneratedArrays {
        positions: curve(&t),
        lower: curve(&t.mapv(|v| v - 0.5)),
        upper: curve(&t.mapv(|v| v + 0.5)),
    })
}

/// Fail with [`ScanError::Configuration`] if `axes` repeats a name.
pub fn ensure_distinct_axes(owner: &str, axes: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(axes.len());
    for axis in axes {
        if !seen.insert(axis.as_str()) {
            return Err(ScanError::config(format!("{owner}: axis '{axis}' is repeated")));
        }
    }
    Ok(())
}

/// Fail with [`ScanError::Configuration`] unless every value is finite.
pub fn ensure_finite(owner: &str, what: &str, values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ScanError::config(format!("{owner}: {what} must be finite")))
    }
}
