//! Lissajous figure over two axes.
//!
//! ```text
//! Δ    = 2π / size
//! x(t) = cx + span₀/2 · sin(lobes·Δ·t + π/2)
//! y(t) = cy + span₁/2 · sin((lobes + 1)·Δ·t)
//! ```

use std::f64::consts::{FRAC_PI_2, PI};

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use scanpoint_core::{
    ensure_distinct_axes, ensure_finite, fields, malformed, sample_curve, tagged, AxisArrays,
    GeneratedArrays, Generator, Result, ScanError, VariantRegistry,
};

pub const LISSAJOUS_TYPEID: &str = "scanpointgenerator:generator/LissajousGenerator:1.0";

/// Points per lobe when no explicit size is given.
pub const POINTS_PER_LOBE: usize = 250;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LissajousParams {
    axes: Vec<String>,
    units: String,
    centre: Vec<f64>,
    span: Vec<f64>,
    lobes: u32,
    #[serde(default)]
    size: Option<usize>,
    #[serde(default)]
    alternate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LissajousGenerator {
    axes: Vec<String>,
    units: Vec<String>,
    centre: [f64; 2],
    span: [f64; 2],
    lobes: u32,
    size: usize,
    alternate: bool,
}

impl LissajousGenerator {
    /// `size = None` picks [`POINTS_PER_LOBE`] points per lobe.
    pub fn new(
        axes: [&str; 2],
        unit: impl Into<String>,
        centre: [f64; 2],
        span: [f64; 2],
        lobes: u32,
        size: Option<usize>,
    ) -> Result<Self> {
        const OWNER: &str = "LissajousGenerator";
        let axes: Vec<String> = axes.iter().map(|a| a.to_string()).collect();
        ensure_distinct_axes(OWNER, &axes)?;
        ensure_finite(OWNER, "centre", &centre)?;
        ensure_finite(OWNER, "span", &span)?;
        if lobes == 0 {
            return Err(ScanError::config("LissajousGenerator: lobes must be at least 1"));
        }
        let size = size.unwrap_or(POINTS_PER_LOBE * lobes as usize);
        if size == 0 {
            return Err(ScanError::config("LissajousGenerator: size must be at least 1"));
        }
        let unit = unit.into();
        Ok(Self {
            axes,
            units: vec![unit.clone(), unit],
            centre,
            span,
            lobes,
            size,
            alternate: false,
        })
    }

    pub fn with_alternate(mut self, alternate: bool) -> Self {
        self.alternate = alternate;
        self
    }

    pub fn lobes(&self) -> u32 {
        self.lobes
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        let p: LissajousParams = fields(value)?;
        match (p.axes.as_slice(), p.centre.as_slice(), p.span.as_slice()) {
            ([x, y], [cx, cy], [sx, sy]) => Ok(Self::new(
                [x.as_str(), y.as_str()],
                p.units,
                [*cx, *cy],
                [*sx, *sy],
                p.lobes,
                p.size,
            )?
            .with_alternate(p.alternate)),
            _ => Err(malformed(
                LISSAJOUS_TYPEID,
                "axes, centre and span need exactly two entries",
            )),
        }
    }

    fn curve(&self, t: &Array1<f64>) -> AxisArrays {
        let increment = 2.0 * PI / self.size as f64;
        let x_freq = self.lobes as f64;
        let y_freq = (self.lobes + 1) as f64;
        let (x_max, y_max) = (self.span[0] / 2.0, self.span[1] / 2.0);
        let [cx, cy] = self.centre;

        let mut out = AxisArrays::new();
        out.insert(
            self.axes[0].clone(),
            t.mapv(|v| cx + x_max * (x_freq * increment * v + FRAC_PI_2).sin()),
        );
        out.insert(
            self.axes[1].clone(),
            t.mapv(|v| cy + y_max * (y_freq * increment * v).sin()),
        );
        out
    }
}

impl Generator for LissajousGenerator {
    fn typeid(&self) -> &'static str {
        LISSAJOUS_TYPEID
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
        sample_curve("LissajousGenerator", self.size, indices, |t| self.curve(t))
    }

    fn to_dict(&self) -> Value {
        tagged(
            LISSAJOUS_TYPEID,
            &LissajousParams {
                axes: self.axes.clone(),
                units: self.units[0].clone(),
                centre: self.centre.to_vec(),
                span: self.span.to_vec(),
                lobes: self.lobes,
                size: Some(self.size),
                alternate: self.alternate,
            },
        )
    }
}

pub(crate) fn construct(value: &Value, _: &VariantRegistry) -> Result<Box<dyn Generator>> {
    Ok(Box::new(LissajousGenerator::from_dict(value)?))
}
