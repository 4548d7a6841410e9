//! Tagged-variant registry.
//!
//! Every generator, region, excluder and mutator serializes to a JSON object
//! carrying a `typeid` discriminator next to its constructor arguments:
//!
//! ```text
//! { "typeid": "scanpointgenerator:generator/LineGenerator:1.0",
//!   "axes": ["x"], "units": ["mm"], "start": [0.0], "stop": [5.0],
//!   "size": 5, "alternate": false }
//! ```
//!
//! A [`VariantRegistry`] maps each typeid to a constructor function. Each
//! variant crate exposes a `register(&mut VariantRegistry)` function; the
//! compound crate assembles the process-wide default once. Lookups fail closed
//! with [`ScanError::UnknownVariant`].

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, ScanError};
use crate::excluder::Excluder;
use crate::generator::Generator;
use crate::mutator::Mutator;
use crate::roi::Roi;

/// Key carrying the discriminator in every serialized variant.
pub const TYPEID_KEY: &str = "typeid";

pub type GeneratorCtor = fn(&Value, &VariantRegistry) -> Result<Box<dyn Generator>>;
pub type RoiCtor = fn(&Value, &VariantRegistry) -> Result<Box<dyn Roi>>;
pub type ExcluderCtor = fn(&Value, &VariantRegistry) -> Result<Box<dyn Excluder>>;
pub type MutatorCtor = fn(&Value, &VariantRegistry) -> Result<Box<dyn Mutator>>;

// ─────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────

/// typeid → constructor maps, one per variant family.
///
/// Constructors receive the registry itself so composite variants (zip,
/// random offset, ROI excluder) can deserialize their children.
#[derive(Clone, Default)]
pub struct VariantRegistry {
    generators: HashMap<&'static str, GeneratorCtor>,
    rois: HashMap<&'static str, RoiCtor>,
    excluders: HashMap<&'static str, ExcluderCtor>,
    mutators: HashMap<&'static str, MutatorCtor>,
}

impl fmt::Debug for VariantRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantRegistry")
            .field("generators", &sorted_keys(&self.generators))
            .field("rois", &sorted_keys(&self.rois))
            .field("excluders", &sorted_keys(&self.excluders))
            .field("mutators", &sorted_keys(&self.mutators))
            .finish()
    }
}

impl VariantRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_generator(&mut self, typeid: &'static str, ctor: GeneratorCtor) -> &mut Self {
        self.generators.insert(typeid, ctor);
        self
    }

    pub fn register_roi(&mut self, typeid: &'static str, ctor: RoiCtor) -> &mut Self {
        self.rois.insert(typeid, ctor);
        self
    }

    pub fn register_excluder(&mut self, typeid: &'static str, ctor: ExcluderCtor) -> &mut Self {
        self.excluders.insert(typeid, ctor);
        self
    }

    pub fn register_mutator(&mut self, typeid: &'static str, ctor: MutatorCtor) -> &mut Self {
        self.mutators.insert(typeid, ctor);
        self
    }

    /// Rebuild a generator from its tagged form.
    pub fn generator_from_dict(&self, value: &Value) -> Result<Box<dyn Generator>> {
        let typeid = typeid_of(value)?;
        let ctor = self.generators.get(typeid).ok_or_else(|| unregistered(typeid))?;
        ctor(value, self)
    }

    /// Rebuild a region of interest from its tagged form.
    pub fn roi_from_dict(&self, value: &Value) -> Result<Box<dyn Roi>> {
        let typeid = typeid_of(value)?;
        let ctor = self.rois.get(typeid).ok_or_else(|| unregistered(typeid))?;
        ctor(value, self)
    }

    /// Rebuild an excluder from its tagged form.
    pub fn excluder_from_dict(&self, value: &Value) -> Result<Box<dyn Excluder>> {
        let typeid = typeid_of(value)?;
        let ctor = self.excluders.get(typeid).ok_or_else(|| unregistered(typeid))?;
        ctor(value, self)
    }

    /// Rebuild a mutator from its tagged form.
    pub fn mutator_from_dict(&self, value: &Value) -> Result<Box<dyn Mutator>> {
        let typeid = typeid_of(value)?;
        let ctor = self.mutators.get(typeid).ok_or_else(|| unregistered(typeid))?;
        ctor(value, self)
    }

    /// Rebuild a list of generators, failing on the first bad entry.
    pub fn generators_from_dicts(&self, values: &[Value]) -> Result<Vec<Box<dyn Generator>>> {
        values.iter().map(|v| self.generator_from_dict(v)).collect()
    }

    pub fn generator_typeids(&self) -> Vec<&'static str> {
        sorted_keys(&self.generators)
    }

    pub fn roi_typeids(&self) -> Vec<&'static str> {
        sorted_keys(&self.rois)
    }

    pub fn excluder_typeids(&self) -> Vec<&'static str> {
        sorted_keys(&self.excluders)
    }

    pub fn mutator_typeids(&self) -> Vec<&'static str> {
        sorted_keys(&self.mutators)
    }

    /// Total number of registered variants across all families.
    pub fn len(&self) -> usize {
        self.generators.len() + self.rois.len() + self.excluders.len() + self.mutators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sorted_keys<V>(map: &HashMap<&'static str, V>) -> Vec<&'static str> {
    let mut keys: Vec<_> = map.keys().copied().collect();
    keys.sort_unstable();
    keys
}

fn unregistered(typeid: &str) -> ScanError {
    ScanError::UnknownVariant {
        typeid: typeid.to_string(),
        detail: "no constructor registered for this typeid".to_string(),
    }
}

// ─────────────────────────────────────────────
// Tagged value helpers
// ─────────────────────────────────────────────

/// Read the discriminator of a tagged value.
///
/// # Errors
///
/// [`ScanError::UnknownVariant`] if `value` is not an object with a string
/// `typeid`.
pub fn typeid_of(value: &Value) -> Result<&str> {
    value
        .get(TYPEID_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| ScanError::UnknownVariant {
            typeid: String::new(),
            detail: format!("structure has no string '{TYPEID_KEY}' field"),
        })
}

/// Serialize `fields` and tag the result with `typeid`.
///
/// `fields` must serialize to a JSON object; anything else cannot be rebuilt
/// by [`fields`] and trips a debug assertion.
pub fn tagged<T: Serialize>(typeid: &str, fields: &T) -> Value {
    let mut map = match serde_json::to_value(fields) {
        Ok(Value::Object(map)) => map,
        other => {
            debug_assert!(false, "{typeid}: parameters must serialize to an object, got {other:?}");
            serde_json::Map::new()
        }
    };
    map.insert(TYPEID_KEY.to_string(), Value::String(typeid.to_string()));
    Value::Object(map)
}

/// A serialized structure of `typeid` whose fields are present but malformed.
pub fn malformed(typeid: &str, detail: impl Into<String>) -> ScanError {
    ScanError::UnknownVariant { typeid: typeid.to_string(), detail: detail.into() }
}

/// Deserialize the constructor arguments of a tagged value.
///
/// # Errors
///
/// [`ScanError::UnknownVariant`] naming the typeid when a required field is
/// missing or ill-typed.
pub fn fields<T: DeserializeOwned>(value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| ScanError::UnknownVariant {
        typeid: typeid_of(value).unwrap_or_default().to_string(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Params {
        size: usize,
        #[serde(default)]
        alternate: bool,
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "must serialize to an object")]
    fn tagged_refuses_non_object_params() {
        let _ = tagged("demo:1.0", &3u32);
    }

    #[test]
    fn malformed_names_the_typeid() {
        match malformed("demo:1.0", "centre needs two values") {
            ScanError::UnknownVariant { typeid, detail } => {
                assert_eq!(typeid, "demo:1.0");
                assert_eq!(detail, "centre needs two values");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn tagged_inserts_typeid() {
        let v = tagged("demo:1.0", &Params { size: 3, alternate: true });
        assert_eq!(v["typeid"], "demo:1.0");
        assert_eq!(v["size"], 3);
        assert_eq!(v["alternate"], true);
    }

    #[test]
    fn fields_roundtrip_and_defaults() {
        let p: Params = fields(&json!({"typeid": "demo:1.0", "size": 4})).unwrap();
        assert_eq!(p, Params { size: 4, alternate: false });
    }

    #[test]
    fn missing_field_is_unknown_variant() {
        let err = fields::<Params>(&json!({"typeid": "demo:1.0"})).unwrap_err();
        match err {
            ScanError::UnknownVariant { typeid, detail } => {
                assert_eq!(typeid, "demo:1.0");
                assert!(detail.contains("size"), "detail was {detail}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unregistered_typeid_fails_closed() {
        let reg = VariantRegistry::new();
        assert!(reg.is_empty());
        let err = reg.generator_from_dict(&json!({"typeid": "nope"})).unwrap_err();
        assert!(matches!(err, ScanError::UnknownVariant { ref typeid, .. } if typeid == "nope"));
        let err = reg.roi_from_dict(&json!({"radius": 1.0})).unwrap_err();
        assert!(matches!(err, ScanError::UnknownVariant { .. }));
    }
}
