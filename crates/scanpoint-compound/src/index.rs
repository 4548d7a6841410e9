//! Nested index space: mixed-radix decomposition plus alternation.
//!
//! A raw index enumerates the Cartesian product of the dimension sizes with
//! the innermost dimension varying fastest. Resolving it yields one
//! *effective* sub-index per dimension: an alternating dimension runs
//! backwards whenever the effective sub-indices of all dimensions outside it
//! sum to an odd number.

use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut1};

use scanpoint_core::{Result, ScanError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpace {
    sizes: Vec<usize>,
    alternate: Vec<bool>,
    raw_size: usize,
}

impl IndexSpace {
    /// Dimensions are given outermost first.
    ///
    /// # Errors
    ///
    /// [`ScanError::Configuration`] if the lists differ in length, are empty,
    /// contain a zero size, or the product overflows.
    pub fn new(sizes: Vec<usize>, alternate: Vec<bool>) -> Result<Self> {
        if sizes.is_empty() {
            return Err(ScanError::config("index space needs at least one dimension"));
        }
        if sizes.len() != alternate.len() {
            return Err(ScanError::config(format!(
                "{} dimension sizes but {} alternate flags",
                sizes.len(),
                alternate.len()
            )));
        }
        if sizes.contains(&0) {
            return Err(ScanError::config("dimension sizes must be at least 1"));
        }
        let raw_size = sizes
            .iter()
            .try_fold(1usize, |acc, &s| acc.checked_mul(s))
            .ok_or_else(|| ScanError::config("raw scan size overflows"))?;
        Ok(Self { sizes, alternate, raw_size })
    }

    pub fn ndims(&self) -> usize {
        self.sizes.len()
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn raw_size(&self) -> usize {
        self.raw_size
    }

    /// Plain mixed-radix digits of `raw`, outermost first.
    pub fn decompose(&self, raw: usize) -> Vec<usize> {
        let mut digits = Array1::zeros(self.ndims());
        self.decompose_into(raw, digits.view_mut());
        digits.to_vec()
    }

    /// Effective sub-indices of `raw`, outermost first.
    pub fn resolve(&self, raw: usize) -> Vec<usize> {
        let mut digits = Array1::zeros(self.ndims());
        self.resolve_into(raw, digits.view_mut());
        digits.to_vec()
    }

    /// [`IndexSpace::resolve`] for many raw indices: one row per index,
    /// written in place.
    pub fn resolve_many(&self, raws: &[usize]) -> Array2<usize> {
        let mut out = Array2::zeros((raws.len(), self.ndims()));
        for (row, &raw) in out.rows_mut().into_iter().zip(raws) {
            self.resolve_into(raw, row);
        }
        out
    }

    fn decompose_into(&self, raw: usize, mut digits: ArrayViewMut1<'_, usize>) {
        let mut rest = raw;
        for (d, &size) in self.sizes.iter().enumerate().rev() {
            digits[d] = rest % size;
            rest /= size;
        }
    }

    fn resolve_into(&self, raw: usize, mut digits: ArrayViewMut1<'_, usize>) {
        self.decompose_into(raw, digits.view_mut());
        self.apply_alternation(digits);
    }

    /// Whether dimension `d` runs backwards for the point whose effective
    /// sub-indices are `effective`.
    pub fn is_reversed(&self, effective: ArrayView1<'_, usize>, d: usize) -> bool {
        self.alternate[d] && effective.iter().take(d).sum::<usize>() % 2 == 1
    }

    fn apply_alternation(&self, mut digits: ArrayViewMut1<'_, usize>) {
        let mut outer = 0usize;
        for d in 0..digits.len() {
            if self.alternate[d] && outer % 2 == 1 {
                digits[d] = self.sizes[d] - 1 - digits[d];
            }
            outer += digits[d];
        }
    }
}
