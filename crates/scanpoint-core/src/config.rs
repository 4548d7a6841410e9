//! Tuning knobs for scan preparation.

use serde::{Deserialize, Serialize};

/// Default number of raw indices evaluated per mask chunk.
pub const DEFAULT_PREPARE_CHUNK: usize = 65_536;

/// Default upper bound on the raw (pre-mask) scan size.
///
/// Retained raw indices are stored in a 32-bit roaring bitmap.
pub const DEFAULT_MAX_RAW_SIZE: u64 = u32::MAX as u64;

/// Configuration applied by a compound generator while preparing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Raw indices resolved and masked per batch during `prepare()`.
    ///
    /// Bounds the transient memory of mask construction.
    /// Default: `65536`
    pub prepare_chunk: usize,

    /// Largest raw size a compound generator accepts at construction.
    /// Default: `4294967295`
    pub max_raw_size: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            prepare_chunk: DEFAULT_PREPARE_CHUNK,
            max_raw_size:  DEFAULT_MAX_RAW_SIZE,
        }
    }
}

impl ScanConfig {
    /// Load from environment variables, falling back to defaults.
    ///
    /// | Variable                  | Default      |
    /// |---------------------------|--------------|
    /// | `SCANPOINT_PREPARE_CHUNK` | `65536`      |
    /// | `SCANPOINT_MAX_RAW_SIZE`  | `4294967295` |
    ///
    /// Zero and unparsable values are ignored. `max_raw_size` is clamped to
    /// the bitmap capacity.
    pub fn from_env() -> Self {
        fn env_nonzero<T>(key: &str, default: T) -> T
        where
            T: std::str::FromStr + PartialEq + Default,
        {
            std::env::var(key)
                .ok()
                .and_then(|s| s.trim().parse::<T>().ok())
                .filter(|v| *v != T::default())
                .unwrap_or(default)
        }

        Self {
            prepare_chunk: env_nonzero("SCANPOINT_PREPARE_CHUNK", DEFAULT_PREPARE_CHUNK),
            max_raw_size:  env_nonzero("SCANPOINT_MAX_RAW_SIZE", DEFAULT_MAX_RAW_SIZE)
                .min(DEFAULT_MAX_RAW_SIZE),
        }
    }

    /// Override the mask chunk size (values below 1 become 1).
    pub fn with_prepare_chunk(mut self, chunk: usize) -> Self {
        self.prepare_chunk = chunk.max(1);
        self
    }

    /// Override the raw size limit.
    pub fn with_max_raw_size(mut self, max_raw_size: u64) -> Self {
        self.max_raw_size = max_raw_size.min(DEFAULT_MAX_RAW_SIZE);
        self
    }
}
