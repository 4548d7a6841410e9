//! # scanpoint-mutators
//!
//! Deterministic perturbations applied to retrieved positions.
//!
//! | Mutator | Effect |
//! |---|---|
//! | [`RandomOffsetMutator`] | seeded jitter, bounded per axis, keyed by compressed index |

pub mod random_offset;

pub use random_offset::{RandomOffsetMutator, RANDOM_OFFSET_MUTATOR_TYPEID};

use scanpoint_core::VariantRegistry;

/// Register every mutator in this crate.
pub fn register(registry: &mut VariantRegistry) {
    registry.register_mutator(RANDOM_OFFSET_MUTATOR_TYPEID, random_offset::construct);
}
