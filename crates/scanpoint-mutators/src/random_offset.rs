//! Seeded, bounded position jitter applied after index resolution.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use scanpoint_core::{
    ensure_distinct_axes, fields, jitter, tagged, AxisArrays, Mutator, Result, ScanError,
    VariantRegistry,
};

pub const RANDOM_OFFSET_MUTATOR_TYPEID: &str =
    "scanpointgenerator:mutator/RandomOffsetMutator:1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RandomOffsetMutatorParams {
    seed: u64,
    axes: Vec<String>,
    max_offset: Vec<f64>,
}

/// Adds `max_offset[a] · jitter(seed, index, a)` to axis `axes[a]` of every
/// point, `index` being the point's compressed index.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomOffsetMutator {
    seed: u64,
    axes: Vec<String>,
    max_offset: Vec<f64>,
}

impl RandomOffsetMutator {
    /// # Errors
    ///
    /// [`ScanError::Configuration`] if `axes` and `max_offset` differ in
    /// length, an axis repeats, or an offset is negative or non-finite.
    pub fn new(seed: u64, axes: Vec<String>, max_offset: Vec<f64>) -> Result<Self> {
        if axes.len() != max_offset.len() {
            return Err(ScanError::config(format!(
                "RandomOffsetMutator: {} axes but {} offsets",
                axes.len(),
                max_offset.len()
            )));
        }
        ensure_distinct_axes("RandomOffsetMutator", &axes)?;
        if let Some(bad) = max_offset.iter().find(|m| !m.is_finite() || **m < 0.0) {
            return Err(ScanError::config(format!(
                "RandomOffsetMutator: max offset {bad} must be finite and non-negative"
            )));
        }
        Ok(Self { seed, axes, max_offset })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn max_offset(&self) -> &[f64] {
        &self.max_offset
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        let p: RandomOffsetMutatorParams = fields(value)?;
        Self::new(p.seed, p.axes, p.max_offset)
    }
}

impl Mutator for RandomOffsetMutator {
    fn typeid(&self) -> &'static str {
        RANDOM_OFFSET_MUTATOR_TYPEID
    }

    fn axes(&self) -> &[String] {
        &self.axes
    }

    fn mutate(&self, positions: &mut AxisArrays, indices: &[usize]) {
        for (slot, (axis, &max)) in self.axes.iter().zip(&self.max_offset).enumerate() {
            let Some(column) = positions.get_mut(axis) else {
                continue;
            };
            for (value, &index) in column.iter_mut().zip(indices) {
                *value += max * jitter(self.seed, index, slot);
            }
        }
    }

    fn to_dict(&self) -> Value {
        tagged(
            RANDOM_OFFSET_MUTATOR_TYPEID,
            &RandomOffsetMutatorParams {
                seed:       self.seed,
                axes:       self.axes.clone(),
                max_offset: self.max_offset.clone(),
            },
        )
    }
}

pub(crate) fn construct(value: &Value, _: &VariantRegistry) -> Result<Box<dyn Mutator>> {
    Ok(Box::new(RandomOffsetMutator::from_dict(value)?))
}
