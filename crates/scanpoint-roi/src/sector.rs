use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use scanpoint_core::{ensure_finite, fields, tagged, Result, Roi, ScanError, VariantRegistry};

use crate::pair;

pub const SECTOR_TYPEID: &str = "scanpointgenerator:roi/SectorROI:1.0";

#[derive(Debug, Serialize, Deserialize)]
struct SectorParams {
    centre: Vec<f64>,
    radii: Vec<f64>,
    angles: Vec<f64>,
}

/// Annular sector: radius in `[radii[0], radii[1]]`, polar angle on the
/// counter-clockwise arc from `angles[0]` to `angles[1]`.
///
/// An arc spanning a full turn or more covers every angle.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorRoi {
    centre: [f64; 2],
    radii: [f64; 2],
    angles: [f64; 2],
}

impl SectorRoi {
    pub fn new(centre: [f64; 2], radii: [f64; 2], angles: [f64; 2]) -> Result<Self> {
        ensure_finite("SectorROI", "centre", &centre)?;
        ensure_finite("SectorROI", "radii", &radii)?;
        ensure_finite("SectorROI", "angles", &angles)?;
        if radii[0] < 0.0 || radii[1] < radii[0] {
            return Err(ScanError::config("SectorROI: radii must satisfy 0 <= inner <= outer"));
        }
        Ok(Self { centre, radii, angles })
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        let p: SectorParams = fields(value)?;
        Self::new(
            pair(SECTOR_TYPEID, "centre", &p.centre)?,
            pair(SECTOR_TYPEID, "radii", &p.radii)?,
            pair(SECTOR_TYPEID, "angles", &p.angles)?,
        )
    }

    fn within_arc(&self, theta: f64) -> bool {
        let [start, end] = self.angles;
        if end - start >= TAU {
            return true;
        }
        let span = (end - start).rem_euclid(TAU);
        (theta - start).rem_euclid(TAU) <= span
    }
}

impl Roi for SectorRoi {
    fn typeid(&self) -> &'static str {
        SECTOR_TYPEID
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        let (dx, dy) = (x - self.centre[0], y - self.centre[1]);
        let r2 = dx * dx + dy * dy;
        let [r0, r1] = self.radii;
        if r2 < r0 * r0 || r2 > r1 * r1 {
            return false;
        }
        // The centre itself has no polar angle.
        r2 == 0.0 || self.within_arc(dy.atan2(dx))
    }

    fn to_dict(&self) -> Value {
        tagged(
            SECTOR_TYPEID,
            &SectorParams {
                centre: self.centre.to_vec(),
                radii:  self.radii.to_vec(),
                angles: self.angles.to_vec(),
            },
        )
    }
}

pub(crate) fn construct(value: &Value, _: &VariantRegistry) -> Result<Box<dyn Roi>> {
    Ok(Box::new(SectorRoi::from_dict(value)?))
}
