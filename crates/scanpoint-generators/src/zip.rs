//! Lock-step merge of generators that share one scan dimension.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use scanpoint_core::{
    check_indices, fields, tagged, GeneratedArrays, Generator, Result, ScanError,
    VariantRegistry,
};

pub const ZIP_TYPEID: &str = "scanpointgenerator:generator/ZipGenerator:1.0";

#[derive(Debug, Serialize, Deserialize)]
struct ZipParams {
    generators: Vec<Value>,
}

/// Runs several generators side by side along one dimension.
///
/// The children must agree on `size` and `alternate` and own disjoint axes.
/// Axes and units are the children's, concatenated in order. `generate`
/// hands the same indices to every child and merges the results.
#[derive(Debug)]
pub struct ZipGenerator {
    generators: Vec<Box<dyn Generator>>,
    axes: Vec<String>,
    units: Vec<String>,
    size: usize,
    alternate: bool,
}

impl ZipGenerator {
    /// # Errors
    ///
    /// [`ScanError::Configuration`] if `generators` is empty, two children
    /// share an axis, or the children disagree on size or alternate.
    pub fn new(generators: Vec<Box<dyn Generator>>) -> Result<Self> {
        let first = generators
            .first()
            .ok_or_else(|| ScanError::config("ZipGenerator: at least one generator is required"))?;
        let size = first.size();
        let alternate = first.alternate();

        let mut axes = Vec::new();
        let mut units = Vec::new();
        let mut seen = HashSet::new();
        for g in &generators {
            for axis in g.axes() {
                if !seen.insert(axis.clone()) {
                    return Err(ScanError::config(format!(
                        "ZipGenerator: cannot zip generators on the same axis '{axis}'"
                    )));
                }
            }
            if g.size() != size {
                return Err(ScanError::config(format!(
                    "ZipGenerator: cannot zip generators of different sizes ({} vs {size})",
                    g.size()
                )));
            }
            if g.alternate() != alternate {
                return Err(ScanError::config(
                    "ZipGenerator: cannot zip generators with different alternate values",
                ));
            }
            axes.extend(g.axes().iter().cloned());
            units.extend(g.units().iter().cloned());
        }

        Ok(Self { generators, axes, units, size, alternate })
    }

    pub fn generators(&self) -> &[Box<dyn Generator>] {
        &self.generators
    }

    /// Rebuild from the tagged form, deserializing children through `registry`.
    pub fn from_dict(value: &Value, registry: &VariantRegistry) -> Result<Self> {
        let p: ZipParams = fields(value)?;
        Self::new(registry.generators_from_dicts(&p.generators)?)
    }
}

impl Generator for ZipGenerator {
    fn typeid(&self) -> &'static str {
        ZIP_TYPEID
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
        check_indices("ZipGenerator", self.size, indices)?;
        let mut zipped = GeneratedArrays::default();
        for g in &self.generators {
            zipped.merge(g.generate(indices)?);
        }
        Ok(zipped)
    }

    fn to_dict(&self) -> Value {
        tagged(
            ZIP_TYPEID,
            &ZipParams {
                generators: self.generators.iter().map(|g| g.to_dict()).collect(),
            },
        )
    }
}

pub(crate) fn construct(value: &Value, registry: &VariantRegistry) -> Result<Box<dyn Generator>> {
    Ok(Box::new(ZipGenerator::from_dict(value, registry)?))
}
