//! Wraps a generator and jitters its positions by a seeded, bounded offset.

use std::collections::BTreeMap;

use ndarray::{s, Array1};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use scanpoint_core::{
    check_indices, fields, jitter, tagged, GeneratedArrays, Generator, Result, ScanError,
    VariantRegistry,
};

pub const RANDOM_OFFSET_TYPEID: &str = "scanpointgenerator:generator/RandomOffsetGenerator:1.0";

#[derive(Debug, Serialize, Deserialize)]
struct RandomOffsetParams {
    generator: Value,
    seed: u64,
    max_offset: BTreeMap<String, f64>,
}

/// A leaf whose positions are the wrapped generator's plus
/// `max_offset[axis] · jitter(seed, index, slot)`, `slot` being the axis'
/// position in the wrapped generator's axes.
///
/// Perturbed axes get fresh bin edges: the midpoints to the neighbouring
/// perturbed positions, extrapolated by half the adjacent gap at the two ends.
/// Axes without an entry in `max_offset` pass through untouched.
#[derive(Debug)]
pub struct RandomOffsetGenerator {
    inner: Box<dyn Generator>,
    seed: u64,
    max_offset: BTreeMap<String, f64>,
}

impl RandomOffsetGenerator {
    /// # Errors
    ///
    /// [`ScanError::Configuration`] if an offset names an axis the wrapped
    /// generator does not own, or is negative or non-finite.
    pub fn new(
        inner: Box<dyn Generator>,
        seed: u64,
        max_offset: BTreeMap<String, f64>,
    ) -> Result<Self> {
        for (axis, max) in &max_offset {
            if !inner.axes().contains(axis) {
                return Err(ScanError::config(format!(
                    "RandomOffsetGenerator: offset given for unknown axis '{axis}'"
                )));
            }
            if !max.is_finite() || *max < 0.0 {
                return Err(ScanError::config(format!(
                    "RandomOffsetGenerator: max offset for '{axis}' must be finite and non-negative"
                )));
            }
        }
        Ok(Self { inner, seed, max_offset })
    }

    pub fn inner(&self) -> &dyn Generator {
        self.inner.as_ref()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn max_offset(&self) -> &BTreeMap<String, f64> {
        &self.max_offset
    }

    pub fn from_dict(value: &Value, registry: &VariantRegistry) -> Result<Self> {
        let p: RandomOffsetParams = fields(value)?;
        Self::new(registry.generator_from_dict(&p.generator)?, p.seed, p.max_offset)
    }

    fn offset(&self, max: f64, index: usize, slot: usize) -> f64 {
        max * jitter(self.seed, index, slot)
    }
}

impl Generator for RandomOffsetGenerator {
    fn typeid(&self) -> &'static str {
        RANDOM_OFFSET_TYPEID
    }

    fn axes(&self) -> &[String] {
        self.inner.axes()
    }

    fn units(&self) -> &[String] {
        self.inner.units()
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    fn alternate(&self) -> bool {
        self.inner.alternate()
    }

    fn generate(&self, indices: &[usize]) -> Result<GeneratedArrays> {
        let size = self.size();
        check_indices("RandomOffsetGenerator", size, indices)?;
        let n = indices.len();

        // One inner call for the requested rows and both neighbours of each.
        let prev: Vec<usize> = indices.iter().map(|&i| i.saturating_sub(1)).collect();
        let next: Vec<usize> = indices.iter().map(|&i| (i + 1).min(size - 1)).collect();
        let mut wanted = Vec::with_capacity(3 * n);
        wanted.extend_from_slice(indices);
        wanted.extend_from_slice(&prev);
        wanted.extend_from_slice(&next);
        let base = self.inner.generate(&wanted)?;

        let mut out = GeneratedArrays::default();
        for (slot, axis) in self.inner.axes().iter().enumerate() {
            let (Some(pos), Some(lo), Some(up)) =
                (base.positions.get(axis), base.lower.get(axis), base.upper.get(axis))
            else {
                continue;
            };
            let Some(&max) = self.max_offset.get(axis) else {
                out.positions.insert(axis.clone(), pos.slice(s![..n]).to_owned());
                out.lower.insert(axis.clone(), lo.slice(s![..n]).to_owned());
                out.upper.insert(axis.clone(), up.slice(s![..n]).to_owned());
                continue;
            };

            let perturbed = |row: usize, index: usize| pos[row] + self.offset(max, index, slot);
            let mut positions = Array1::zeros(n);
            let mut lower = Array1::zeros(n);
            let mut upper = Array1::zeros(n);
            for (k, &i) in indices.iter().enumerate() {
                let p = perturbed(k, i);
                positions[k] = p;
                if size == 1 {
                    let shift = p - pos[k];
                    lower[k] = lo[k] + shift;
                    upper[k] = up[k] + shift;
                    continue;
                }
                let before = perturbed(n + k, prev[k]);
                let after = perturbed(2 * n + k, next[k]);
                if i == 0 {
                    lower[k] = p - (after - p) / 2.0;
                    upper[k] = (p + after) / 2.0;
                } else if i == size - 1 {
                    lower[k] = (before + p) / 2.0;
                    upper[k] = p + (p - before) / 2.0;
                } else {
                    lower[k] = (before + p) / 2.0;
                    upper[k] = (p + after) / 2.0;
                }
            }
            out.positions.insert(axis.clone(), positions);
            out.lower.insert(axis.clone(), lower);
            out.upper.insert(axis.clone(), upper);
        }
        Ok(out)
    }

    fn to_dict(&self) -> Value {
        tagged(
            RANDOM_OFFSET_TYPEID,
            &RandomOffsetParams {
                generator: self.inner.to_dict(),
                seed: self.seed,
                max_offset: self.max_offset.clone(),
            },
        )
    }
}

pub(crate) fn construct(value: &Value, registry: &VariantRegistry) -> Result<Box<dyn Generator>> {
    Ok(Box::new(RandomOffsetGenerator::from_dict(value, registry)?))
}
