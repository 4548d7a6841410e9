//! Streaming retrieval over a prepared compound generator.

use scanpoint_core::{Point, PointBatch, Result};

use crate::compound::CompoundGenerator;

/// Consecutive [`PointBatch`]es covering `[0, size)`.
///
/// Yields a single error (e.g. [`NotPrepared`](scanpoint_core::ScanError::NotPrepared))
/// and then stops if retrieval fails.
#[derive(Debug)]
pub struct Batches<'a> {
    scan: &'a CompoundGenerator,
    chunk: usize,
    next: usize,
    finished: bool,
}

impl<'a> Batches<'a> {
    pub(crate) fn new(scan: &'a CompoundGenerator, chunk: usize) -> Self {
        Self { scan, chunk: chunk.max(1), next: 0, finished: false }
    }
}

impl Iterator for Batches<'_> {
    type Item = Result<PointBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let size = match self.scan.size() {
            Ok(size) => size,
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        };
        if self.next >= size {
            self.finished = true;
            return None;
        }
        let end = (self.next + self.chunk).min(size);
        let batch = self.scan.get_points(self.next, end);
        self.next = end;
        self.finished = batch.is_err();
        Some(batch)
    }
}

/// Every [`Point`] of the scan in compressed order.
#[derive(Debug)]
pub struct Points<'a> {
    batches: Batches<'a>,
    current: Option<(PointBatch, usize)>,
}

impl<'a> Points<'a> {
    pub(crate) fn new(batches: Batches<'a>) -> Self {
        Self { batches, current: None }
    }
}

impl Iterator for Points<'_> {
    type Item = Result<Point>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((batch, row)) = &mut self.current {
                if let Some(point) = batch.point(*row) {
                    *row += 1;
                    return Some(Ok(point));
                }
            }
            match self.batches.next()? {
                Ok(batch) => self.current = Some((batch, 0)),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
