use serde::{Deserialize, Serialize};
use serde_json::Value;

use scanpoint_core::{ensure_finite, fields, tagged, Result, Roi, ScanError, VariantRegistry};

use crate::pair;

pub const CIRCLE_TYPEID: &str = "scanpointgenerator:roi/CircularROI:1.0";

#[derive(Debug, Serialize, Deserialize)]
struct CircleParams {
    centre: Vec<f64>,
    radius: f64,
}

/// Closed disc `‖p − centre‖ ≤ radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct CircularRoi {
    centre: [f64; 2],
    radius: f64,
}

impl CircularRoi {
    pub fn new(centre: [f64; 2], radius: f64) -> Result<Self> {
        ensure_finite("CircularROI", "centre/radius", &[centre[0], centre[1], radius])?;
        if radius <= 0.0 {
            return Err(ScanError::config("CircularROI: radius must be positive"));
        }
        Ok(Self { centre, radius })
    }

    pub fn centre(&self) -> [f64; 2] {
        self.centre
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        let p: CircleParams = fields(value)?;
        Self::new(pair(CIRCLE_TYPEID, "centre", &p.centre)?, p.radius)
    }
}

impl Roi for CircularRoi {
    fn typeid(&self) -> &'static str {
        CIRCLE_TYPEID
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        let (dx, dy) = (x - self.centre[0], y - self.centre[1]);
        dx * dx + dy * dy <= self.radius * self.radius
    }

    fn to_dict(&self) -> Value {
        tagged(
            CIRCLE_TYPEID,
            &CircleParams { centre: self.centre.to_vec(), radius: self.radius },
        )
    }
}

pub(crate) fn construct(value: &Value, _: &VariantRegistry) -> Result<Box<dyn Roi>> {
    Ok(Box::new(CircularRoi::from_dict(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn boundary_is_inside() {
        let c = CircularRoi::new([1.0, 1.0], 2.0).unwrap();
        assert!(c.contains(1.0, 1.0));
        assert!(c.contains(3.0, 1.0));
        assert!(!c.contains(3.01, 1.0));
    }

    #[test]
    fn batch_mask_matches_scalar() {
        let c = CircularRoi::new([0.0, 0.0], 1.0).unwrap();
        let (x, y) = (array![0.0, 0.5, 2.0], array![0.0, 0.5, 0.0]);
        assert_eq!(c.mask_points(x.view(), y.view()), array![true, true, false]);
    }

    #[test]
    fn rejects_non_positive_radius() {
        assert!(matches!(CircularRoi::new([0.0, 0.0], 0.0), Err(ScanError::Configuration(_))));
    }

    #[test]
    fn dict_roundtrip() {
        let c = CircularRoi::new([0.5, -2.0], 3.0).unwrap();
        assert_eq!(CircularRoi::from_dict(&c.to_dict()).unwrap(), c);
    }
}
