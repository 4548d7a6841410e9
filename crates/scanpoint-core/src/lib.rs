//! # scanpoint-core
//!
//! Shared contracts and data carriers for the scanpoint workspace.
//!
//! | Module | Responsibility |
//! |---|---|
//! | [`generator`] | [`Generator`] trait, curve sampling, index validation |
//! | [`roi`] | [`Roi`] trait (2-D region predicates) |
//! | [`excluder`] | [`Excluder`] trait (per-point removal mask) |
//! | [`mutator`] | [`Mutator`] trait (deterministic position perturbation) |
//! | [`point`] | [`Point`], [`PointBatch`], [`GeneratedArrays`] |
//! | [`registry`] | [`VariantRegistry`], tagged `typeid` helpers |
//! | [`jitter`] | seed/index keyed uniform jitter |
//! | [`config`] | [`ScanConfig`] |
//! | [`error`] | [`ScanError`] |
//!
//! Concrete variants live in `scanpoint-generators`, `scanpoint-roi` and
//! `scanpoint-mutators`; composition lives in `scanpoint-compound`.

pub mod config;
pub mod error;
pub mod excluder;
pub mod generator;
pub mod jitter;
pub mod mutator;
pub mod point;
pub mod registry;
pub mod roi;

pub use config::ScanConfig;
pub use error::{Result, ScanError};
pub use excluder::Excluder;
pub use generator::{check_indices, ensure_distinct_axes, ensure_finite, sample_curve, Generator};
pub use jitter::jitter;
pub use mutator::Mutator;
pub use point::{AxisArrays, GeneratedArrays, Point, PointBatch};
pub use registry::{fields, malformed, tagged, typeid_of, VariantRegistry, TYPEID_KEY};
pub use roi::Roi;
