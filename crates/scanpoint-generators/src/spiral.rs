//! Archimedean spiral over two axes.
//!
//! ```text
//! φ(t) = α·√(t + ½)        α = √(4π)
//! x(t) = cx + β·φ·sin φ     β = scale / 2π
//! y(t) = cy + β·φ·cos φ
//! size = ⌊(radius / (α·β))²⌋
//! ```
//!
//! Successive points are roughly equidistant along the curve, and the spacing
//! between rings equals `scale`.

use std::f64::consts::PI;

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use scanpoint_core::{
    ensure_distinct_axes, ensure_finite, fields, malformed, sample_curve, tagged, AxisArrays,
    GeneratedArrays, Generator, Result, ScanError, VariantRegistry,
};

pub const SPIRAL_TYPEID: &str = "scanpointgenerator:generator/SpiralGenerator:1.0";

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SpiralParams {
    axes: Vec<String>,
    units: String,
    centre: Vec<f64>,
    radius: f64,
    #[serde(default = "default_scale")]
    scale: f64,
    #[serde(default)]
    alternate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpiralGenerator {
    axes: Vec<String>,
    units: Vec<String>,
    centre: [f64; 2],
    radius: f64,
    scale: f64,
    alternate: bool,
    alpha: f64,
    beta: f64,
    size: usize,
}

impl SpiralGenerator {
    pub fn new(
        axes: [&str; 2],
        unit: impl Into<String>,
        centre: [f64; 2],
        radius: f64,
        scale: f64,
    ) -> Result<Self> {
        const OWNER: &str = "SpiralGenerator";
        let axes: Vec<String> = axes.iter().map(|a| a.to_string()).collect();
        ensure_distinct_axes(OWNER, &axes)?;
        ensure_finite(OWNER, "centre", &centre)?;
        ensure_finite(OWNER, "radius/scale", &[radius, scale])?;
        if radius <= 0.0 || scale <= 0.0 {
            return Err(ScanError::config("SpiralGenerator: radius and scale must be positive"));
        }

        let alpha = (4.0 * PI).sqrt();
        let beta = scale / (2.0 * PI);
        let size = (radius / (alpha * beta)).powi(2).floor() as usize;
        if size == 0 {
            return Err(ScanError::config(format!(
                "SpiralGenerator: radius {radius} is too small for scale {scale}"
            )));
        }

        let unit = unit.into();
        Ok(Self {
            axes,
            units: vec![unit.clone(), unit],
            centre,
            radius,
            scale,
            alternate: false,
            alpha,
            beta,
            size,
        })
    }

    pub fn with_alternate(mut self, alternate: bool) -> Self {
        self.alternate = alternate;
        self
    }

    pub fn centre(&self) -> [f64; 2] {
        self.centre
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        let p: SpiralParams = fields(value)?;
        let (axes, centre) = match (p.axes.as_slice(), p.centre.as_slice()) {
            ([x, y], [cx, cy]) => ([x.as_str(), y.as_str()], [*cx, *cy]),
            _ => {
                return Err(malformed(SPIRAL_TYPEID, "axes and centre need exactly two entries"))
            }
        };
        Ok(Self::new(axes, p.units, centre, p.radius, p.scale)?.with_alternate(p.alternate))
    }

    fn curve(&self, t: &Array1<f64>) -> AxisArrays {
        let phi = t.mapv(|v| self.alpha * (v + 0.5).max(0.0).sqrt());
        let (b, [cx, cy]) = (self.beta, self.centre);
        let mut out = AxisArrays::new();
        out.insert(self.axes[0].clone(), phi.mapv(|p| cx + b * p * p.sin()));
        out.insert(self.axes[1].clone(), phi.mapv(|p| cy + b * p * p.cos()));
        out
    }
}

impl Generator for SpiralGenerator {
    fn typeid(&self) -> &'static str {
        SPIRAL_TYPEID
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
        self.alternate
    }

    fn generate(&self, indices: &[usize]) -> Result<GeneratedArrays> {
        sample_curve("SpiralGenerator", self.size, indices, |t| self.curve(t))
    }

    fn to_dict(&self) -> Value {
        tagged(
            SPIRAL_TYPEID,
            &SpiralParams {
                axes: self.axes.clone(),
                units: self.units[0].clone(),
                centre: self.centre.to_vec(),
                radius: self.radius,
                scale: self.scale,
                alternate: self.alternate,
            },
        )
    }
}

pub(crate) fn construct(value: &Value, _: &VariantRegistry) -> Result<Box<dyn Generator>> {
    Ok(Box::new(SpiralGenerator::from_dict(value)?))
}
