//! Process-wide default variant registry.

use once_cell::sync::Lazy;
use tracing::debug;

use scanpoint_core::VariantRegistry;

static REGISTRY: Lazy<VariantRegistry> = Lazy::new(default_registry);

/// A fresh registry holding every variant shipped with the workspace.
///
/// Start from this to add custom variants.
pub fn default_registry() -> VariantRegistry {
    let mut registry = VariantRegistry::new();
    scanpoint_generators::register(&mut registry);
    scanpoint_roi::register(&mut registry);
    scanpoint_mutators::register(&mut registry);
    debug!(
        generators = registry.generator_typeids().len(),
        rois = registry.roi_typeids().len(),
        excluders = registry.excluder_typeids().len(),
        mutators = registry.mutator_typeids().len(),
        "variant registry built"
    );
    registry
}

/// Return a reference to the shared default registry.
///
/// Built on first access and immutable afterwards.
pub fn registry() -> &'static VariantRegistry {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knows_every_shipped_variant() {
        let reg = registry();
        assert_eq!(reg.generator_typeids().len(), 7);
        assert_eq!(reg.roi_typeids().len(), 5);
        assert_eq!(reg.excluder_typeids(), vec!["scanpointgenerator:excluder/ROIExcluder:1.0"]);
        assert_eq!(
            reg.mutator_typeids(),
            vec!["scanpointgenerator:mutator/RandomOffsetMutator:1.0"]
        );
        assert_eq!(reg.len(), 14);
    }
}
