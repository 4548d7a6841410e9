//! Removes points that fall inside any of a set of regions.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use scanpoint_core::{
    ensure_distinct_axes, fields, tagged, Excluder, Result, Roi, ScanError, VariantRegistry,
};

pub const ROI_EXCLUDER_TYPEID: &str = "scanpointgenerator:excluder/ROIExcluder:1.0";

#[derive(Debug, Serialize, Deserialize)]
struct RoiExcluderParams {
    rois: Vec<Value>,
    axes: Vec<String>,
}

/// Applies its regions to the coordinates of two axes and flags a point when
/// any region contains it.
#[derive(Debug)]
pub struct RoiExcluder {
    rois: Vec<Box<dyn Roi>>,
    axes: Vec<String>,
}

impl RoiExcluder {
    /// # Errors
    ///
    /// [`ScanError::Configuration`] unless `axes` names exactly two distinct
    /// axes and at least one region is given.
    pub fn new(rois: Vec<Box<dyn Roi>>, axes: Vec<String>) -> Result<Self> {
        if axes.len() != 2 {
            return Err(ScanError::config(format!(
                "ROIExcluder: exactly two axes are required, got {}",
                axes.len()
            )));
        }
        ensure_distinct_axes("ROIExcluder", &axes)?;
        if rois.is_empty() {
            return Err(ScanError::config("ROIExcluder: at least one region is required"));
        }
        Ok(Self { rois, axes })
    }

    pub fn rois(&self) -> &[Box<dyn Roi>] {
        &self.rois
    }

    pub fn from_dict(value: &Value, registry: &VariantRegistry) -> Result<Self> {
        let p: RoiExcluderParams = fields(value)?;
        let rois = p
            .rois
            .iter()
            .map(|r| registry.roi_from_dict(r))
            .collect::<Result<Vec<_>>>()?;
        Self::new(rois, p.axes)
    }
}

impl Excluder for RoiExcluder {
    fn typeid(&self) -> &'static str {
        ROI_EXCLUDER_TYPEID
    }

    fn axes(&self) -> &[String] {
        &self.axes
    }

    fn create_mask(&self, coords: &[ArrayView1<'_, f64>]) -> Result<Array1<bool>> {
        let [x, y] = coords else {
            return Err(ScanError::config(format!(
                "ROIExcluder: expected 2 coordinate columns, got {}",
                coords.len()
            )));
        };
        if x.len() != y.len() {
            return Err(ScanError::config("ROIExcluder: coordinate columns differ in length"));
        }
        let mut excluded = Array1::from_elem(x.len(), false);
        for roi in &self.rois {
            let inside = roi.mask_points(x.view(), y.view());
            excluded.zip_mut_with(&inside, |e, &i| *e |= i);
        }
        Ok(excluded)
    }

    fn to_dict(&self) -> Value {
        tagged(
            ROI_EXCLUDER_TYPEID,
            &RoiExcluderParams {
                rois: self.rois.iter().map(|r| r.to_dict()).collect(),
                axes: self.axes.clone(),
            },
        )
    }
}

pub(crate) fn construct(value: &Value, registry: &VariantRegistry) -> Result<Box<dyn Excluder>> {
    Ok(Box::new(RoiExcluder::from_dict(value, registry)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CircularRoi, RectangularRoi};
    use ndarray::array;

    fn axes() -> Vec<String> {
        vec!["x".to_string(), "y".to_string()]
    }

    #[test]
    fn union_of_regions_is_excluded() {
        let ex = RoiExcluder::new(
            vec![
                Box::new(CircularRoi::new([0.0, 0.0], 1.0).unwrap()),
                Box::new(RectangularRoi::new([5.0, 5.0], 1.0, 1.0, 0.0).unwrap()),
            ],
            axes(),
        )
        .unwrap();
        let x = array![0.0, 5.5, 3.0];
        let y = array![0.0, 5.5, 3.0];
        let mask = ex.create_mask(&[x.view(), y.view()]).unwrap();
        assert_eq!(mask, array![true, true, false]);
    }

    #[test]
    fn column_count_checked() {
        let ex = RoiExcluder::new(vec![Box::new(CircularRoi::new([0.0, 0.0], 1.0).unwrap())], axes())
            .unwrap();
        let x = array![0.0];
        assert!(matches!(ex.create_mask(&[x.view()]), Err(ScanError::Configuration(_))));
    }

    #[test]
    fn axes_validated() {
        let roi = || -> Vec<Box<dyn Roi>> { vec![Box::new(CircularRoi::new([0.0, 0.0], 1.0).unwrap())] };
        assert!(RoiExcluder::new(roi(), vec!["x".into()]).is_err());
        assert!(RoiExcluder::new(roi(), vec!["x".into(), "x".into()]).is_err());
        assert!(RoiExcluder::new(Vec::new(), axes()).is_err());
    }
}
