//! # scanpoint-compound
//!
//! Composes dimension generators into a nested, masked, mutated scan and
//! serves its points by compressed index.
//!
//! | Module | Responsibility |
//! |---|---|
//! | [`index`] | [`IndexSpace`]: raw index → per-dimension effective index (mixed radix + snake) |
//! | [`compaction`] | [`Compaction`]: compressed index → raw index over a roaring bitmap |
//! | [`compound`] | [`CompoundGenerator`]: validation, `prepare`, retrieval, serialization |
//! | [`iter`] | [`Points`] / [`Batches`] streaming iterators |
//! | [`registry`] | default [`VariantRegistry`](scanpoint_core::VariantRegistry) |
//!
//! ```no_run
//! use scanpoint_compound::CompoundGenerator;
//! use scanpoint_generators::LineGenerator;
//!
//! # fn main() -> scanpoint_core::Result<()> {
//! let mut scan = CompoundGenerator::new(
//!     vec![
//!         Box::new(LineGenerator::new("y", "mm", 0.0, 1.0, 3)?),
//!         Box::new(LineGenerator::new("x", "mm", 0.0, 1.0, 4)?.with_alternate(true)),
//!     ],
//!     Vec::new(),
//!     Vec::new(),
//!     0.1,
//!     true,
//!     0.0,
//! )?;
//! scan.prepare()?;
//! for point in scan.iter() {
//!     let point = point?;
//!     println!("{:?} {:?}", point.indexes, point.positions);
//! }
//! # Ok(())
//! # }
//! ```

pub mod compaction;
pub mod compound;
pub mod index;
pub mod iter;
pub mod registry;

pub use compaction::Compaction;
pub use compound::{CompoundGenerator, COMPOUND_TYPEID, DEFAULT_DURATION};
pub use index::IndexSpace;
pub use iter::{Batches, Points};
pub use registry::{default_registry, registry};
