//! Straight-line generator over one or more axes.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use scanpoint_core::{
    ensure_distinct_axes, ensure_finite, fields, sample_curve, tagged, AxisArrays,
    GeneratedArrays, Generator, Result, ScanError, VariantRegistry,
};

pub const LINE_TYPEID: &str = "scanpointgenerator:generator/LineGenerator:1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LineParams {
    axes: Vec<String>,
    units: Vec<String>,
    start: Vec<f64>,
    stop: Vec<f64>,
    size: usize,
    #[serde(default)]
    alternate: bool,
}

/// `size` evenly spaced points from `start` to `stop` (inclusive) on every
/// axis simultaneously.
#[derive(Debug, Clone, PartialEq)]
pub struct LineGenerator {
    axes: Vec<String>,
    units: Vec<String>,
    start: Vec<f64>,
    stop: Vec<f64>,
    step: Vec<f64>,
    size: usize,
    alternate: bool,
}

impl LineGenerator {
    /// Single-axis line.
    pub fn new(
        axis: impl Into<String>,
        unit: impl Into<String>,
        start: f64,
        stop: f64,
        size: usize,
    ) -> Result<Self> {
        Self::multi(vec![axis.into()], vec![unit.into()], vec![start], vec![stop], size, false)
    }

    /// Line across several axes. A single unit is broadcast to every axis.
    pub fn multi(
        axes: Vec<String>,
        units: Vec<String>,
        start: Vec<f64>,
        stop: Vec<f64>,
        size: usize,
        alternate: bool,
    ) -> Result<Self> {
        const OWNER: &str = "LineGenerator";
        if axes.is_empty() {
            return Err(ScanError::config("LineGenerator: at least one axis is required"));
        }
        if size == 0 {
            return Err(ScanError::config("LineGenerator: size must be at least 1"));
        }
        ensure_distinct_axes(OWNER, &axes)?;
        let units = match units.len() {
            1 if axes.len() > 1 => vec![units[0].clone(); axes.len()],
            n if n == axes.len() => units,
            n => {
                return Err(ScanError::config(format!(
                    "LineGenerator: {n} units given for {} axes",
                    axes.len()
                )))
            }
        };
        if start.len() != axes.len() || stop.len() != axes.len() {
            return Err(ScanError::config(format!(
                "LineGenerator: start/stop need {} values (got {}/{})",
                axes.len(),
                start.len(),
                stop.len()
            )));
        }
        ensure_finite(OWNER, "start", &start)?;
        ensure_finite(OWNER, "stop", &stop)?;

        let step = start
            .iter()
            .zip(&stop)
            .map(|(a, b)| if size > 1 { (b - a) / (size - 1) as f64 } else { 0.0 })
            .collect();

        Ok(Self { axes, units, start, stop, step, size, alternate })
    }

    /// Builder: set the alternate (snake) flag.
    pub fn with_alternate(mut self, alternate: bool) -> Self {
        self.alternate = alternate;
        self
    }

    pub fn start(&self) -> &[f64] {
        &self.start
    }

    pub fn stop(&self) -> &[f64] {
        &self.stop
    }

    pub fn step(&self) -> &[f64] {
        &self.step
    }

    /// Rebuild from the tagged form produced by [`Generator::to_dict`].
    pub fn from_dict(value: &Value) -> Result<Self> {
        let p: LineParams = fields(value)?;
        Self::multi(p.axes, p.units, p.start, p.stop, p.size, p.alternate)
    }

    fn curve(&self, t: &Array1<f64>) -> AxisArrays {
        self.axes
            .iter()
            .enumerate()
            .map(|(k, axis)| {
                let (start, step) = (self.start[k], self.step[k]);
                (axis.clone(), t.mapv(|i| start + step * i))
            })
            .collect()
    }
}

impl Generator for LineGenerator {
    fn typeid(&self) -> &'static str {
        LINE_TYPEID
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
        sample_curve("LineGenerator", self.size, indices, |t| self.curve(t))
    }

    fn to_dict(&self) -> Value {
        tagged(
            LINE_TYPEID,
            &LineParams {
                axes: self.axes.clone(),
                units: self.units.clone(),
                start: self.start.clone(),
                stop: self.stop.clone(),
                size: self.size,
                alternate: self.alternate,
            },
        )
    }
}

pub(crate) fn construct(value: &Value, _: &VariantRegistry) -> Result<Box<dyn Generator>> {
    Ok(Box::new(LineGenerator::from_dict(value)?))
}
