use serde::{Deserialize, Serialize};
use serde_json::Value;

use scanpoint_core::{ensure_finite, fields, tagged, Result, Roi, ScanError, VariantRegistry};

pub const POLYGON_TYPEID: &str = "scanpointgenerator:roi/PolygonalROI:1.0";

#[derive(Debug, Serialize, Deserialize)]
struct PolygonParams {
    points_x: Vec<f64>,
    points_y: Vec<f64>,
}

/// Simple or self-intersecting polygon, filled by the even-odd rule.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonalRoi {
    points_x: Vec<f64>,
    points_y: Vec<f64>,
}

impl PolygonalRoi {
    pub fn new(points_x: Vec<f64>, points_y: Vec<f64>) -> Result<Self> {
        if points_x.len() != points_y.len() {
            return Err(ScanError::config(format!(
                "PolygonalROI: {} x coordinates but {} y coordinates",
                points_x.len(),
                points_y.len()
            )));
        }
        if points_x.len() < 3 {
            return Err(ScanError::config("PolygonalROI: at least three vertices are required"));
        }
        ensure_finite("PolygonalROI", "points_x", &points_x)?;
        ensure_finite("PolygonalROI", "points_y", &points_y)?;
        Ok(Self { points_x, points_y })
    }

    pub fn vertices(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points_x.iter().copied().zip(self.points_y.iter().copied())
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        let p: PolygonParams = fields(value)?;
        Self::new(p.points_x, p.points_y)
    }
}

impl Roi for PolygonalRoi {
    fn typeid(&self) -> &'static str {
        POLYGON_TYPEID
    }

    /// Cast a ray towards +x and count edge crossings.
    fn contains(&self, x: f64, y: f64) -> bool {
        let (xs, ys) = (&self.points_x, &self.points_y);
        let n = xs.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            if (ys[i] > y) != (ys[j] > y) {
                let cross = xs[i] + (y - ys[i]) * (xs[j] - xs[i]) / (ys[j] - ys[i]);
                if x < cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    fn to_dict(&self) -> Value {
        tagged(
            POLYGON_TYPEID,
            &PolygonParams { points_x: self.points_x.clone(), points_y: self.points_y.clone() },
        )
    }
}

pub(crate) fn construct(value: &Value, _: &VariantRegistry) -> Result<Box<dyn Roi>> {
    Ok(Box::new(PolygonalRoi::from_dict(value)?))
}
