//! Engine configuration

use std::path::Path;

use cmvm_factor::TableShape;
use cmvm_fixed_point::BitWidth;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Dimensions and word width of an engine. Immutable once the engine is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of slices (K)
    #[serde(default = "default_slice_count")]
    pub slice_count: usize,

    /// Width of each slice buffer, i.e. table columns (C)
    #[serde(default = "default_slice_width")]
    pub slice_width: usize,

    /// Real input elements per slice (m); the rest of the slice is zero padding
    #[serde(default = "default_populated_width")]
    pub populated_width: usize,

    /// Output vector length, i.e. table rows (R)
    #[serde(default = "default_output_width")]
    pub output_width: usize,

    /// Digit planes per base table (D)
    #[serde(default = "default_planes")]
    pub planes: usize,

    /// Word width (W)
    #[serde(default)]
    pub bit_width: BitWidth,

    /// Run slice computations on the rayon pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_slice_count() -> usize { 2 }
fn default_slice_width() -> usize { 4 }
fn default_populated_width() -> usize { 2 }
fn default_output_width() -> usize { 4 }
fn default_planes() -> usize { 1 }
fn default_parallel() -> bool { true }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            slice_count: default_slice_count(),
            slice_width: default_slice_width(),
            populated_width: default_populated_width(),
            output_width: default_output_width(),
            planes: default_planes(),
            bit_width: BitWidth::default(),
            parallel: default_parallel(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl EngineConfig {
    /// Load config from a JSON file; missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Defaults overridden by `CMVM_*` environment variables
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `CMVM_*` environment variables on top of this config.
    ///
    /// Unparsable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(k) = env_parse("CMVM_SLICE_COUNT") {
            self.slice_count = k;
        }
        if let Some(c) = env_parse("CMVM_SLICE_WIDTH") {
            self.slice_width = c;
        }
        if let Some(m) = env_parse("CMVM_POPULATED_WIDTH") {
            self.populated_width = m;
        }
        if let Some(r) = env_parse("CMVM_OUTPUT_WIDTH") {
            self.output_width = r;
        }
        if let Some(d) = env_parse("CMVM_PLANES") {
            self.planes = d;
        }
        if let Some(w) = env_parse::<u32>("CMVM_BIT_WIDTH").and_then(|w| BitWidth::new(w).ok()) {
            self.bit_width = w;
        }
        if let Some(p) = env_parse("CMVM_PARALLEL") {
            self.parallel = p;
        }
        self
    }

    /// Expected input vector length (N = m * K)
    pub fn input_len(&self) -> usize {
        self.populated_width * self.slice_count
    }

    /// Shape every base table must have (D x R x C)
    pub fn table_shape(&self) -> TableShape {
        TableShape::new(self.planes, self.output_width, self.slice_width)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.slice_count == 0 {
            return Err(EngineError::Config("slice_count must be at least 1".to_string()));
        }
        if self.planes == 0 {
            return Err(EngineError::Config("planes must be at least 1".to_string()));
        }
        if self.slice_width == 0 || self.output_width == 0 {
            return Err(EngineError::Config(format!(
                "slice_width ({}) and output_width ({}) must be non-zero",
                self.slice_width, self.output_width
            )));
        }
        if self.populated_width == 0 || self.populated_width > self.slice_width {
            return Err(EngineError::Config(format!(
                "populated_width ({}) must be in 1..={}",
                self.populated_width, self.slice_width
            )));
        }
        Ok(())
    }
}
