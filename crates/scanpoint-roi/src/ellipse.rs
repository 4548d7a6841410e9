use serde::{Deserialize, Serialize};
use serde_json::Value;

use scanpoint_core::{ensure_finite, fields, tagged, Result, Roi, ScanError, VariantRegistry};

use crate::pair;

pub const ELLIPSE_TYPEID: &str = "scanpointgenerator:roi/EllipticalROI:1.0";

#[derive(Debug, Serialize, Deserialize)]
struct EllipseParams {
    centre: Vec<f64>,
    semiaxes: Vec<f64>,
    #[serde(default)]
    angle: f64,
}

/// Ellipse with semi-axes `(a, b)` rotated by `angle` radians about its centre.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipticalRoi {
    centre: [f64; 2],
    semiaxes: [f64; 2],
    angle: f64,
}

impl EllipticalRoi {
    pub fn new(centre: [f64; 2], semiaxes: [f64; 2], angle: f64) -> Result<Self> {
        ensure_finite(
            "EllipticalROI",
            "parameters",
            &[centre[0], centre[1], semiaxes[0], semiaxes[1], angle],
        )?;
        if semiaxes[0] <= 0.0 || semiaxes[1] <= 0.0 {
            return Err(ScanError::config("EllipticalROI: semiaxes must be positive"));
        }
        Ok(Self { centre, semiaxes, angle })
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        let p: EllipseParams = fields(value)?;
        Self::new(
            pair(ELLIPSE_TYPEID, "centre", &p.centre)?,
            pair(ELLIPSE_TYPEID, "semiaxes", &p.semiaxes)?,
            p.angle,
        )
    }
}

impl Roi for EllipticalRoi {
    fn typeid(&self) -> &'static str {
        ELLIPSE_TYPEID
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        let (dx, dy) = (x - self.centre[0], y - self.centre[1]);
        let (sin, cos) = self.angle.sin_cos();
        let u = (dx * cos + dy * sin) / self.semiaxes[0];
        let v = (-dx * sin + dy * cos) / self.semiaxes[1];
        u * u + v * v <= 1.0
    }

    fn to_dict(&self) -> Value {
        tagged(
            ELLIPSE_TYPEID,
            &EllipseParams {
                centre:   self.centre.to_vec(),
                semiaxes: self.semiaxes.to_vec(),
                angle:    self.angle,
            },
        )
    }
}

pub(crate) fn construct(value: &Value, _: &VariantRegistry) -> Result<Box<dyn Roi>> {
    Ok(Box::new(EllipticalRoi::from_dict(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn unrotated() {
        let e = EllipticalRoi::new([0.0, 0.0], [2.0, 1.0], 0.0).unwrap();
        assert!(e.contains(1.9, 0.0));
        assert!(!e.contains(0.0, 1.5));
    }

    #[test]
    fn rotated_swaps_extent() {
        let e = EllipticalRoi::new([0.0, 0.0], [2.0, 1.0], FRAC_PI_2).unwrap();
        assert!(e.contains(0.0, 1.9));
        assert!(!e.contains(1.5, 0.0));
    }

    #[test]
    fn dict_roundtrip() {
        let e = EllipticalRoi::new([1.0, 2.0], [3.0, 0.5], 0.7).unwrap();
        assert_eq!(EllipticalRoi::from_dict(&e.to_dict()).unwrap(), e);
    }
}
