//! Compressed index → raw index mapping.

use roaring::RoaringBitmap;

/// The retained subset of the raw index space.
///
/// Without excluders every raw index is retained and no bitmap is kept.
/// Otherwise the retained raw indices live in a [`RoaringBitmap`] and the
/// `i`-th compressed index maps to the `i`-th smallest member.
#[derive(Debug, Clone, PartialEq)]
pub enum Compaction {
    Dense { len: usize },
    Sparse(RoaringBitmap),
}

impl Compaction {
    /// Number of retained points.
    pub fn len(&self) -> usize {
        match self {
            Compaction::Dense { len } => *len,
            Compaction::Sparse(bitmap) => bitmap.len() as usize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw index of compressed index `i`, or `None` past the end.
    pub fn raw_index(&self, i: usize) -> Option<usize> {
        match self {
            Compaction::Dense { len } => (i < *len).then_some(i),
            Compaction::Sparse(bitmap) => {
                let i = u32::try_from(i).ok()?;
                bitmap.select(i).map(|raw| raw as usize)
            }
        }
    }

    /// Raw indices of the compressed range `[start, end)`, clipped to
    /// [`Compaction::len`]. Strictly increasing.
    ///
    /// A sparse range costs one `select` for its first member and then
    /// streams the bitmap from there.
    pub fn raw_range(&self, start: usize, end: usize) -> Vec<usize> {
        let end = end.min(self.len());
        if start >= end {
            return Vec::new();
        }
        match self {
            Compaction::Dense { .. } => (start..end).collect(),
            Compaction::Sparse(bitmap) => {
                let Some(first) = u32::try_from(start).ok().and_then(|s| bitmap.select(s)) else {
                    return Vec::new();
                };
                bitmap
                    .range(first..)
                    .take(end - start)
                    .map(|raw| raw as usize)
                    .collect()
            }
        }
    }

    /// The retained-index bitmap, if masking produced one.
    pub fn retained(&self) -> Option<&RoaringBitmap> {
        match self {
            Compaction::Dense { .. } => None,
            Compaction::Sparse(bitmap) => Some(bitmap),
        }
    }
}
