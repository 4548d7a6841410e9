//! Plain data carriers: per-axis arrays, single points and columnar batches.

use std::collections::BTreeMap;

use ndarray::{concatenate, Array1, Array2, Axis, ShapeError};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// One column of values per axis name.
pub type AxisArrays = BTreeMap<String, Array1<f64>>;

/// Output of a generator for a list of indices: one `position`, `lower` and
/// `upper` value per axis per requested index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedArrays {
    pub positions: AxisArrays,
    pub lower: AxisArrays,
    pub upper: AxisArrays,
}

impl GeneratedArrays {
    /// Merge the axes of `other` into `self`. Axes already present are
    /// overwritten; callers guarantee disjointness.
    pub fn merge(&mut self, other: GeneratedArrays) {
        self.positions.extend(other.positions);
        self.lower.extend(other.lower);
        self.upper.extend(other.upper);
    }

    /// Number of rows (0 when no axis is present).
    pub fn len(&self) -> usize {
        self.positions.values().next().map_or(0, |a| a.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─────────────────────────────────────────────
// Point
// ─────────────────────────────────────────────

/// A single scan point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Demand position per axis (after mutation).
    pub positions: BTreeMap<String, f64>,
    /// Start of the integration window per axis.
    pub lower: BTreeMap<String, f64>,
    /// End of the integration window per axis.
    pub upper: BTreeMap<String, f64>,
    /// Effective per-dimension index, outermost first.
    pub indexes: Vec<usize>,
    /// Dwell time at the point.
    pub duration: f64,
    /// Pause after the point.
    pub delay_after: f64,
}

// ─────────────────────────────────────────────
// PointBatch
// ─────────────────────────────────────────────

/// Columnar form of a contiguous run of points.
#[derive(Debug, Clone, PartialEq)]
pub struct PointBatch {
    pub positions: AxisArrays,
    pub lower: AxisArrays,
    pub upper: AxisArrays,
    /// `len × ndims` matrix of effective per-dimension indices.
    pub indexes: Array2<usize>,
    pub duration: Array1<f64>,
    pub delay_after: Array1<f64>,
}

impl PointBatch {
    /// An empty batch for a scan with `ndims` dimensions and the given axes.
    pub fn empty<'a>(ndims: usize, axes: impl IntoIterator<Item = &'a String>) -> Self {
        let columns: AxisArrays = axes
            .into_iter()
            .map(|a| (a.clone(), Array1::zeros(0)))
            .collect();
        Self {
            positions: columns.clone(),
            lower: columns.clone(),
            upper: columns,
            indexes: Array2::zeros((0, ndims)),
            duration: Array1::zeros(0),
            delay_after: Array1::zeros(0),
        }
    }

    pub fn len(&self) -> usize {
        self.indexes.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Extract row `i` as a [`Point`]. Returns `None` past the end.
    pub fn point(&self, i: usize) -> Option<Point> {
        if i >= self.len() {
            return None;
        }
        let pick = |cols: &AxisArrays| -> BTreeMap<String, f64> {
            cols.iter().map(|(axis, col)| (axis.clone(), col[i])).collect()
        };
        Some(Point {
            positions: pick(&self.positions),
            lower: pick(&self.lower),
            upper: pick(&self.upper),
            indexes: self.indexes.row(i).to_vec(),
            duration: self.duration[i],
            delay_after: self.delay_after[i],
        })
    }

    /// Iterate the rows as [`Point`]s.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.len()).filter_map(move |i| self.point(i))
    }

    /// Append `other` below `self`.
    ///
    /// # Errors
    ///
    /// [`ScanError::Configuration`] if the batches differ in dimension count
    /// or axis set, or `other` has ragged columns. `self` is left untouched
    /// on error.
    pub fn append(&mut self, other: &PointBatch) -> Result<()> {
        if self.indexes.ncols() != other.indexes.ncols() {
            return Err(ScanError::config(format!(
                "PointBatch: cannot append a {}-dimension batch to a {}-dimension batch",
                other.indexes.ncols(),
                self.indexes.ncols()
            )));
        }
        let same_axes = |a: &AxisArrays, b: &AxisArrays| a.keys().eq(b.keys());
        if !same_axes(&self.positions, &other.positions)
            || !same_axes(&self.lower, &other.lower)
            || !same_axes(&self.upper, &other.upper)
        {
            return Err(ScanError::config("PointBatch: cannot append a batch with different axes"));
        }
        let rows = other.len();
        let ragged = [&other.positions, &other.lower, &other.upper]
            .into_iter()
            .flat_map(|cols| cols.values())
            .any(|col| col.len() != rows)
            || other.duration.len() != rows
            || other.delay_after.len() != rows;
        if ragged {
            return Err(ScanError::config("PointBatch: appended batch has ragged columns"));
        }

        fn stacked(into: &AxisArrays, from: &AxisArrays) -> Result<AxisArrays> {
            into.iter()
                .zip(from.values())
                .map(|((axis, col), extra)| Ok((axis.clone(), join(col, extra)?)))
                .collect()
        }
        fn join(a: &Array1<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
            concatenate(Axis(0), &[a.view(), b.view()]).map_err(shape_error)
        }

        let positions = stacked(&self.positions, &other.positions)?;
        let lower = stacked(&self.lower, &other.lower)?;
        let upper = stacked(&self.upper, &other.upper)?;
        let indexes = concatenate(Axis(0), &[self.indexes.view(), other.indexes.view()])
            .map_err(shape_error)?;
        let duration = join(&self.duration, &other.duration)?;
        let delay_after = join(&self.delay_after, &other.delay_after)?;

        self.positions = positions;
        self.lower = lower;
        self.upper = upper;
        self.indexes = indexes;
        self.duration = duration;
        self.delay_after = delay_after;
        Ok(())
    }
}

fn shape_error(err: ShapeError) -> ScanError {
    ScanError::config(format!("PointBatch: {err}"))
}
