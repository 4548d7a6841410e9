//! The excluder contract.

use std::fmt;

use ndarray::{Array1, ArrayView1};
use serde_json::Value;

use crate::error::Result;

/// Flags points for removal from a scan.
///
/// `create_mask` returns `true` for every point that must be **removed**.
/// A compound generator keeps a raw point only when no excluder flags it.
pub trait Excluder: fmt::Debug + Send + Sync {
    /// Serialization discriminator.
    fn typeid(&self) -> &'static str;

    /// The axes whose coordinates [`Excluder::create_mask`] consumes, in order.
    fn axes(&self) -> &[String];

    /// One "excluded" flag per point. `coords[k]` holds the coordinates of
    /// `axes()[k]`; all columns have the same length.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ScanError::Configuration`] if the number of columns
    /// does not match [`Excluder::axes`].
    fn create_mask(&self, coords: &[ArrayView1<'_, f64>]) -> Result<Array1<bool>>;

    /// Tagged key-value form understood by the variant registry.
    fn to_dict(&self) -> Value;
}
