//! The compound generator: nests dimensions, masks, compacts and serves points.
//!
//! Lifecycle:
//!
//! 1. [`CompoundGenerator::new`] validates the wiring (axis disjointness,
//!    excluder/mutator axes, raw size). Nothing is evaluated yet.
//! 2. [`CompoundGenerator::prepare`] streams the raw index space through the
//!    excluders in chunks and records the retained raw indices.
//! 3. Retrieval ([`get_point`](CompoundGenerator::get_point),
//!    [`get_points`](CompoundGenerator::get_points), [`iter`](CompoundGenerator::iter),
//!    [`batches`](CompoundGenerator::batches)) is read-only.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use ndarray::{Array1, Zip};
use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use scanpoint_core::config::DEFAULT_MAX_RAW_SIZE;
use scanpoint_core::{
    ensure_finite, fields, tagged, typeid_of, AxisArrays, Excluder, Generator, Mutator, Point,
    PointBatch, Result, ScanConfig, ScanError, VariantRegistry,
};

use crate::compaction::Compaction;
use crate::index::IndexSpace;
use crate::iter::{Batches, Points};

pub const COMPOUND_TYPEID: &str = "scanpointgenerator:generator/CompoundGenerator:1.0";

/// Duration meaning "decided per point by the caller".
pub const DEFAULT_DURATION: f64 = -1.0;

fn default_duration() -> f64 {
    DEFAULT_DURATION
}

fn default_continuous() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
struct CompoundParams {
    generators: Vec<Value>,
    #[serde(default)]
    excluders: Vec<Value>,
    #[serde(default)]
    mutators: Vec<Value>,
    #[serde(default = "default_duration")]
    duration: f64,
    #[serde(default = "default_continuous")]
    continuous: bool,
    #[serde(default)]
    delay_after: f64,
}

// ─────────────────────────────────────────────
// CompoundGenerator
// ─────────────────────────────────────────────

/// A multi-dimensional scan built from nested dimension generators.
///
/// Dimensions are listed outermost first; the last one varies fastest.
#[derive(Debug)]
pub struct CompoundGenerator {
    dimensions: Vec<Box<dyn Generator>>,
    excluders: Vec<Box<dyn Excluder>>,
    mutators: Vec<Box<dyn Mutator>>,
    duration: f64,
    continuous: bool,
    delay_after: f64,
    config: ScanConfig,
    space: IndexSpace,
    axes: Vec<String>,
    units: Vec<String>,
    compaction: Option<Compaction>,
}

impl CompoundGenerator {
    /// Wire a scan together with the default [`ScanConfig`].
    ///
    /// # Errors
    ///
    /// [`ScanError::Configuration`] if `dimensions` is empty, two dimensions
    /// share an axis, an excluder or mutator names an axis no dimension owns,
    /// `duration`/`delay_after` are not finite, or the raw size exceeds
    /// [`ScanConfig::max_raw_size`].
    pub fn new(
        dimensions: Vec<Box<dyn Generator>>,
        excluders: Vec<Box<dyn Excluder>>,
        mutators: Vec<Box<dyn Mutator>>,
        duration: f64,
        continuous: bool,
        delay_after: f64,
    ) -> Result<Self> {
        if dimensions.is_empty() {
            return Err(ScanError::config("CompoundGenerator: at least one generator is required"));
        }
        ensure_finite("CompoundGenerator", "duration/delay_after", &[duration, delay_after])?;

        let mut axes = Vec::new();
        let mut units = Vec::new();
        let mut seen = HashSet::new();
        for g in &dimensions {
            for axis in g.axes() {
                if !seen.insert(axis.clone()) {
                    return Err(ScanError::config(format!(
                        "CompoundGenerator: axis '{axis}' is produced by more than one generator"
                    )));
                }
            }
            axes.extend(g.axes().iter().cloned());
            units.extend(g.units().iter().cloned());
        }

        for ex in &excluders {
            if let Some(axis) = ex.axes().iter().find(|a| !seen.contains(*a)) {
                return Err(ScanError::config(format!(
                    "CompoundGenerator: excluder axis '{axis}' is not produced by any generator"
                )));
            }
        }
        for m in &mutators {
            if let Some(axis) = m.axes().iter().find(|a| !seen.contains(*a)) {
                return Err(ScanError::config(format!(
                    "CompoundGenerator: mutator axis '{axis}' is not produced by any generator"
                )));
            }
        }

        let space = IndexSpace::new(
            dimensions.iter().map(|g| g.size()).collect(),
            dimensions.iter().map(|g| g.alternate()).collect(),
        )?;

        let scan = Self {
            dimensions,
            excluders,
            mutators,
            duration,
            continuous,
            delay_after,
            config: ScanConfig::default(),
            space,
            axes,
            units,
            compaction: None,
        };
        scan.check_raw_size()?;
        Ok(scan)
    }

    /// Replace the configuration. Must be called before [`prepare`](Self::prepare)
    /// to affect chunking.
    ///
    /// # Errors
    ///
    /// [`ScanError::Configuration`] if the raw size exceeds the new limit.
    pub fn with_config(mut self, config: ScanConfig) -> Result<Self> {
        self.config = config;
        self.check_raw_size()?;
        Ok(self)
    }

    fn check_raw_size(&self) -> Result<()> {
        let limit = self.config.max_raw_size.min(DEFAULT_MAX_RAW_SIZE);
        let raw = self.space.raw_size() as u64;
        if raw > limit {
            return Err(ScanError::config(format!(
                "CompoundGenerator: raw size {raw} exceeds the limit of {limit}"
            )));
        }
        Ok(())
    }

    // ── Preparation ─────────────────────────────────────────────────────────

    /// Build the mask and the compressed→raw table. A second call is a no-op.
    ///
    /// # Errors
    ///
    /// Propagates generator and excluder failures; the generator stays
    /// unprepared in that case.
    pub fn prepare(&mut self) -> Result<()> {
        if self.compaction.is_some() {
            debug!("compound generator already prepared");
            return Ok(());
        }

        let raw_size = self.space.raw_size();
        let compaction = if self.excluders.is_empty() {
            Compaction::Dense { len: raw_size }
        } else {
            Compaction::Sparse(self.build_mask()?)
        };

        info!(
            raw_size,
            size = compaction.len(),
            dimensions = self.dimensions.len(),
            excluders = self.excluders.len(),
            mutators = self.mutators.len(),
            "compound generator prepared"
        );
        if compaction.is_empty() {
            warn!(raw_size, "every point of the scan is excluded");
        }
        self.compaction = Some(compaction);
        Ok(())
    }

    /// Stream the raw space in chunks and keep every index no excluder flags.
    fn build_mask(&self) -> Result<RoaringBitmap> {
        let excluded_axes: BTreeSet<&String> =
            self.excluders.iter().flat_map(|e| e.axes()).collect();
        let owners: Vec<usize> = self
            .dimensions
            .iter()
            .enumerate()
            .filter(|(_, g)| g.axes().iter().any(|a| excluded_axes.contains(a)))
            .map(|(d, _)| d)
            .collect();

        let raw_size = self.space.raw_size();
        let chunk = self.config.prepare_chunk.max(1);
        let mut retained = RoaringBitmap::new();

        let mut start = 0;
        while start < raw_size {
            let end = (start + chunk).min(raw_size);
            let raws: Vec<usize> = (start..end).collect();
            let effective = self.space.resolve_many(&raws);

            let mut positions = AxisArrays::new();
            for &d in &owners {
                let indices = effective.column(d).to_vec();
                positions.extend(self.dimensions[d].generate(&indices)?.positions);
            }

            let mut excluded = Array1::from_elem(raws.len(), false);
            for ex in &self.excluders {
                let coords = ex
                    .axes()
                    .iter()
                    .map(|axis| {
                        positions.get(axis).map(|c| c.view()).ok_or_else(|| {
                            ScanError::config(format!("no coordinates for excluder axis '{axis}'"))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                let mask = ex.create_mask(&coords)?;
                if mask.len() != raws.len() {
                    return Err(ScanError::config(format!(
                        "{}: mask has {} entries for {} points",
                        ex.typeid(),
                        mask.len(),
                        raws.len()
                    )));
                }
                excluded.zip_mut_with(&mask, |e, &m| *e |= m);
            }

            let before = retained.len();
            for (&raw, &drop) in raws.iter().zip(excluded.iter()) {
                if !drop {
                    let raw = u32::try_from(raw).map_err(|_| {
                        ScanError::config(format!("raw index {raw} exceeds the bitmap range"))
                    })?;
                    retained.insert(raw);
                }
            }
            debug!(
                chunk_start = start,
                chunk_len = raws.len(),
                retained = retained.len() - before,
                "masked chunk"
            );
            start = end;
        }
        Ok(retained)
    }

    // ── Retrieval ───────────────────────────────────────────────────────────

    fn compaction(&self) -> Result<&Compaction> {
        self.compaction.as_ref().ok_or(ScanError::NotPrepared)
    }

    /// The point at compressed index `i`.
    ///
    /// # Errors
    ///
    /// [`ScanError::NotPrepared`] before [`prepare`](Self::prepare),
    /// [`ScanError::OutOfRange`] if `i ≥ size`.
    pub fn get_point(&self, i: usize) -> Result<Point> {
        let size = self.size()?;
        let end = i.saturating_add(1);
        self.get_points(i, end)?
            .point(0)
            .ok_or(ScanError::OutOfRange { start: i, end, size })
    }

    /// Columnar batch for compressed indices `[start, end)`.
    ///
    /// # Errors
    ///
    /// [`ScanError::NotPrepared`] before [`prepare`](Self::prepare),
    /// [`ScanError::OutOfRange`] unless `start ≤ end ≤ size`.
    pub fn get_points(&self, start: usize, end: usize) -> Result<PointBatch> {
        let compaction = self.compaction()?;
        let size = compaction.len();
        if start > end || end > size {
            return Err(ScanError::OutOfRange { start, end, size });
        }

        let raws = compaction.raw_range(start, end);
        let n = raws.len();
        let effective = self.space.resolve_many(&raws);
        let innermost = self.dimensions.len() - 1;

        let mut positions = AxisArrays::new();
        let mut lower = AxisArrays::new();
        let mut upper = AxisArrays::new();
        for (d, g) in self.dimensions.iter().enumerate() {
            let indices = effective.column(d).to_vec();
            let mut arrays = g.generate(&indices)?;
            if d == innermost {
                let reversed: Array1<bool> = effective
                    .rows()
                    .into_iter()
                    .map(|row| self.space.is_reversed(row, d))
                    .collect();
                for (axis, lo) in arrays.lower.iter_mut() {
                    if let Some(up) = arrays.upper.get_mut(axis) {
                        Zip::from(lo).and(up).and(&reversed).for_each(|l, u, &r| {
                            if r {
                                std::mem::swap(l, u);
                            }
                        });
                    }
                }
                lower.extend(arrays.lower);
                upper.extend(arrays.upper);
            } else {
                // Outer axes hold still for the duration of a point.
                lower.extend(arrays.positions.clone());
                upper.extend(arrays.positions.clone());
            }
            positions.extend(arrays.positions);
        }

        if !self.mutators.is_empty() {
            let compressed: Vec<usize> = (start..end).collect();
            for m in &self.mutators {
                m.mutate(&mut positions, &compressed);
            }
        }

        Ok(PointBatch {
            positions,
            lower,
            upper,
            indexes: effective,
            duration: Array1::from_elem(n, self.duration),
            delay_after: Array1::from_elem(n, self.delay_after),
        })
    }

    /// Every point in compressed order, fetched in chunks of
    /// [`ScanConfig::prepare_chunk`].
    pub fn iter(&self) -> Points<'_> {
        Points::new(self.batches(self.config.prepare_chunk))
    }

    /// Consecutive batches of at most `chunk` points covering the scan.
    pub fn batches(&self, chunk: usize) -> Batches<'_> {
        Batches::new(self, chunk)
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    /// All axes, outer dimension first.
    pub fn axes(&self) -> &[String] {
        &self.axes
    }

    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn units_by_axis(&self) -> BTreeMap<String, String> {
        self.axes.iter().cloned().zip(self.units.iter().cloned()).collect()
    }

    /// Size of every dimension, outermost first.
    pub fn shape(&self) -> &[usize] {
        self.space.sizes()
    }

    /// Size of the unmasked Cartesian product.
    pub fn raw_size(&self) -> usize {
        self.space.raw_size()
    }

    /// Number of retained points.
    ///
    /// # Errors
    ///
    /// [`ScanError::NotPrepared`] before [`prepare`](Self::prepare).
    pub fn size(&self) -> Result<usize> {
        Ok(self.compaction()?.len())
    }

    pub fn is_prepared(&self) -> bool {
        self.compaction.is_some()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn continuous(&self) -> bool {
        self.continuous
    }

    pub fn delay_after(&self) -> f64 {
        self.delay_after
    }

    pub fn dimensions(&self) -> &[Box<dyn Generator>] {
        &self.dimensions
    }

    pub fn excluders(&self) -> &[Box<dyn Excluder>] {
        &self.excluders
    }

    pub fn mutators(&self) -> &[Box<dyn Mutator>] {
        &self.mutators
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn index_space(&self) -> &IndexSpace {
        &self.space
    }

    // ── Serialization ───────────────────────────────────────────────────────

    pub fn to_dict(&self) -> Value {
        tagged(
            COMPOUND_TYPEID,
            &CompoundParams {
                generators:  self.dimensions.iter().map(|g| g.to_dict()).collect(),
                excluders:   self.excluders.iter().map(|e| e.to_dict()).collect(),
                mutators:    self.mutators.iter().map(|m| m.to_dict()).collect(),
                duration:    self.duration,
                continuous:  self.continuous,
                delay_after: self.delay_after,
            },
        )
    }

    /// Rebuild an unprepared scan using the process-wide default registry.
    pub fn from_dict(value: &Value) -> Result<Self> {
        Self::from_dict_with(value, crate::registry())
    }

    /// Rebuild an unprepared scan resolving children through `registry`.
    ///
    /// # Errors
    ///
    /// [`ScanError::UnknownVariant`] for a foreign typeid or malformed
    /// fields, plus any construction error.
    pub fn from_dict_with(value: &Value, registry: &VariantRegistry) -> Result<Self> {
        let typeid = typeid_of(value)?;
        if typeid != COMPOUND_TYPEID {
            return Err(ScanError::UnknownVariant {
                typeid: typeid.to_string(),
                detail: format!("expected {COMPOUND_TYPEID}"),
            });
        }
        let p: CompoundParams = fields(value)?;
        let excluders = p
            .excluders
            .iter()
            .map(|e| registry.excluder_from_dict(e))
            .collect::<Result<Vec<_>>>()?;
        let mutators = p
            .mutators
            .iter()
            .map(|m| registry.mutator_from_dict(m))
            .collect::<Result<Vec<_>>>()?;
        Self::new(
            registry.generators_from_dicts(&p.generators)?,
            excluders,
            mutators,
            p.duration,
            p.continuous,
            p.delay_after,
        )
    }
}
