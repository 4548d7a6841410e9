//! Generator replaying an explicit list of positions on one axis.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use scanpoint_core::{
    ensure_finite, fields, sample_curve, tagged, AxisArrays, GeneratedArrays, Generator, Result,
    ScanError, VariantRegistry,
};

pub const ARRAY_TYPEID: &str = "scanpointgenerator:generator/ArrayGenerator:1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ArrayParams {
    axis: String,
    units: String,
    points: Vec<f64>,
    #[serde(default)]
    alternate: bool,
}

/// Positions taken verbatim from `points`. Bin edges are the midpoints
/// between neighbours; the outer edges mirror the first and last gap.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayGenerator {
    axes: Vec<String>,
    units: Vec<String>,
    points: Vec<f64>,
    alternate: bool,
}

impl ArrayGenerator {
    pub fn new(axis: impl Into<String>, unit: impl Into<String>, points: Vec<f64>) -> Result<Self> {
        if points.is_empty() {
            return Err(ScanError::config("ArrayGenerator: points must not be empty"));
        }
        ensure_finite("ArrayGenerator", "points", &points)?;
        Ok(Self {
            axes: vec![axis.into()],
            units: vec![unit.into()],
            points,
            alternate: false,
        })
    }

    pub fn with_alternate(mut self, alternate: bool) -> Self {
        self.alternate = alternate;
        self
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        let p: ArrayParams = fields(value)?;
        Ok(Self::new(p.axis, p.units, p.points)?.with_alternate(p.alternate))
    }

    /// Piecewise-linear through `points`, extended linearly past both ends.
    fn interpolate(&self, t: f64) -> f64 {
        let n = self.points.len();
        if n == 1 {
            return self.points[0];
        }
        let i0 = (t.floor().max(0.0) as usize).min(n - 2);
        let frac = t - i0 as f64;
        let (a, b) = (self.points[i0], self.points[i0 + 1]);
        a + frac * (b - a)
    }

    fn curve(&self, t: &Array1<f64>) -> AxisArrays {
        let mut out = AxisArrays::new();
        out.insert(self.axes[0].clone(), t.mapv(|v| self.interpolate(v)));
        out
    }
}

impl Generator for ArrayGenerator {
    fn typeid(&self) -> &'static str {
        ARRAY_TYPEID
    }

    fn axes(&self) -> &[String] {
        &self.axes
    }

    fn units(&self) -> &[String] {
        &self.units
    }

    fn size(&self) -> usize {
        self.points.len()
    }

    fn alternate(&self) -> bool {
        self.alternate
    }

    fn generate(&self, indices: &[usize]) -> Result<GeneratedArrays> {
        sample_curve("ArrayGenerator", self.points.len(), indices, |t| self.curve(t))
    }

    fn to_dict(&self) -> Value {
        tagged(
            ARRAY_TYPEID,
            &ArrayParams {
                axis: self.axes[0].clone(),
                units: self.units[0].clone(),
                points: self.points.clone(),
                alternate: self.alternate,
            },
        )
    }
}

pub(crate) fn construct(value: &Value, _: &VariantRegistry) -> Result<Box<dyn Generator>> {
    Ok(Box::new(ArrayGenerator::from_dict(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_points_with_midpoint_edges() {
        let g = ArrayGenerator::new("x", "mm", vec![0.0, 1.0, 3.0, 7.0]).unwrap();
        assert_eq!(g.size(), 4);
        let a = g.generate(&[0, 1, 2, 3]).unwrap();
        assert_eq!(a.positions["x"].to_vec(), vec![0.0, 1.0, 3.0, 7.0]);
        assert_eq!(a.lower["x"].to_vec(), vec![-0.5, 0.5, 2.0, 5.0]);
        assert_eq!(a.upper["x"].to_vec(), vec![0.5, 2.0, 5.0, 9.0]);
    }

    #[test]
    fn single_point() {
        let g = ArrayGenerator::new("x", "mm", vec![4.0]).unwrap();
        let a = g.generate(&[0]).unwrap();
        assert_eq!(a.lower["x"][0], 4.0);
        assert_eq!(a.upper["x"][0], 4.0);
    }

    #[test]
    fn empty_points_rejected() {
        assert!(matches!(ArrayGenerator::new("x", "mm", vec![]), Err(ScanError::Configuration(_))));
    }

    #[test]
    fn dict_roundtrip() {
        let g = ArrayGenerator::new("t", "s", vec![0.1, 0.2]).unwrap().with_alternate(true);
        assert_eq!(ArrayGenerator::from_dict(&g.to_dict()).unwrap(), g);
    }
}
