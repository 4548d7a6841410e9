//! The mutator contract.

use std::fmt;

use serde_json::Value;

use crate::point::AxisArrays;

/// Deterministically perturbs point positions.
///
/// A mutator only sees positions; bin edges and index vectors are never
/// handed to it.
pub trait Mutator: fmt::Debug + Send + Sync {
    /// Serialization discriminator.
    fn typeid(&self) -> &'static str;

    /// Axes this mutator perturbs.
    fn axes(&self) -> &[String];

    /// Perturb `positions` in place. Row `k` of every column belongs to the
    /// point with compressed index `indices[k]`. The result for a row depends
    /// only on its own index and the mutator's parameters.
    fn mutate(&self, positions: &mut AxisArrays, indices: &[usize]);

    /// Tagged key-value form understood by the variant registry.
    fn to_dict(&self) -> Value;
}
