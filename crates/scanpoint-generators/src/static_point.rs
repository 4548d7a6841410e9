//! Repeats one position `size` times.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use scanpoint_core::{
    check_indices, ensure_finite, fields, tagged, AxisArrays, GeneratedArrays, Generator, Result,
    ScanError, VariantRegistry,
};

pub const STATIC_TYPEID: &str = "scanpointgenerator:generator/StaticPointGenerator:1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StaticParams {
    size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    units: Option<String>,
    #[serde(default)]
    position: f64,
}

/// Takes `size` repeated measurements without moving. With no axis it only
/// contributes a dimension of the given size; with an axis every point sits at
/// `position` with zero-width bin edges.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticPointGenerator {
    size: usize,
    axes: Vec<String>,
    units: Vec<String>,
    position: f64,
}

impl StaticPointGenerator {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(ScanError::config("StaticPointGenerator: size must be at least 1"));
        }
        Ok(Self { size, axes: Vec::new(), units: Vec::new(), position: 0.0 })
    }

    /// Attach an axis held at `position`.
    pub fn with_axis(
        mut self,
        axis: impl Into<String>,
        unit: impl Into<String>,
        position: f64,
    ) -> Result<Self> {
        ensure_finite("StaticPointGenerator", "position", &[position])?;
        self.axes = vec![axis.into()];
        self.units = vec![unit.into()];
        self.position = position;
        Ok(self)
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        let p: StaticParams = fields(value)?;
        let g = Self::new(p.size)?;
        match p.axis {
            Some(axis) => g.with_axis(axis, p.units.unwrap_or_default(), p.position),
            None => Ok(g),
        }
    }
}

impl Generator for StaticPointGenerator {
    fn typeid(&self) -> &'static str {
        STATIC_TYPEID
    }

    fn axes(&self) -> &[String] {
        &self.axes
    }

    fn units(&self) -> &[String] {
        &self.units
    }

    fn size(&self) -> usize {
        self.size
    }

    fn alternate(&self) -> bool {
        false
    }

    fn generate(&self, indices: &[usize]) -> Result<GeneratedArrays> {
        check_indices("StaticPointGenerator", self.size, indices)?;
        let column: AxisArrays = self
            .axes
            .iter()
            .map(|axis| (axis.clone(), Array1::from_elem(indices.len(), self.position)))
            .collect();
        Ok(GeneratedArrays {
            positions: column.clone(),
            lower: column.clone(),
            upper: column,
        })
    }

    fn to_dict(&self) -> Value {
        tagged(
            STATIC_TYPEID,
            &StaticParams {
                size: self.size,
                axis: self.axes.first().cloned(),
                units: self.units.first().cloned(),
                position: self.position,
            },
        )
    }
}

pub(crate) fn construct(value: &Value, _: &VariantRegistry) -> Result<Box<dyn Generator>> {
    Ok(Box::new(StaticPointGenerator::from_dict(value)?))
}
