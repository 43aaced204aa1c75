//! Configuration structures for the season matching engine.
//!
//! This module defines all tunable parameters, organized into the
//! extraction settings and the surrounding driver settings.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use season_colors::SeasonConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = SeasonConfig::from_json_file(Path::new("season.json"))?;
//!
//! // Or use defaults
//! let config = SeasonConfig::default();
//! # Ok::<(), season_colors::SeasonError>(())
//! ```
//!
//! Missing fields fall back to their defaults, so a file only needs to name
//! the values it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{extraction, loading, ranking};
use crate::{Result, SeasonError};

/// Complete configuration for one classification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonConfig {
    /// Dominant color extraction settings
    pub extraction: ExtractionConfig,

    /// Optional JSON palette table; the built-in table is used when absent
    pub palettes_path: Option<PathBuf>,

    /// How many seasons to report (best plus alternates); values above the
    /// number of seasons report all of them
    pub top_n: usize,

    /// Longest side of the thumbnail images are shrunk to before extraction
    pub thumbnail_size: u32,
}

/// Dominant color extraction parameters.
///
/// Controls the k-means quantization that reduces a pixel region to a
/// handful of weighted colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Target number of clusters
    pub num_colors: usize,

    /// Regions with fewer pixels are rejected
    pub min_pixels: usize,

    /// Lloyd iteration cap
    pub max_iterations: usize,

    /// Clusters holding a smaller fraction of the region are dropped (0.0-1.0)
    pub min_cluster_fraction: f64,

    /// Regions with more pixels are rejected
    pub max_pixels: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            num_colors: extraction::DEFAULT_NUM_COLORS,
            min_pixels: extraction::DEFAULT_MIN_PIXELS,
            max_iterations: extraction::DEFAULT_MAX_ITERATIONS,
            min_cluster_fraction: extraction::DEFAULT_MIN_CLUSTER_FRACTION,
            max_pixels: extraction::DEFAULT_MAX_PIXELS,
        }
    }
}

impl ExtractionConfig {
    /// Default settings with a different cluster count
    pub fn with_num_colors(num_colors: usize) -> Self {
        Self {
            num_colors,
            ..Self::default()
        }
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if self.num_colors == 0 {
            return Err(SeasonError::configuration("num_colors must be at least 1"));
        }
        if self.max_iterations == 0 {
            return Err(SeasonError::configuration(
                "max_iterations must be at least 1",
            ));
        }
        if !(0.0..1.0).contains(&self.min_cluster_fraction) {
            return Err(SeasonError::configuration(format!(
                "min_cluster_fraction must be in [0, 1), got {}",
                self.min_cluster_fraction
            )));
        }
        if self.max_pixels < self.min_pixels.max(1) {
            return Err(SeasonError::configuration(format!(
                "max_pixels ({}) is below min_pixels ({})",
                self.max_pixels, self.min_pixels
            )));
        }
        Ok(())
    }
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig::default(),
            palettes_path: None,
            top_n: ranking::DEFAULT_TOP_N,
            thumbnail_size: loading::DEFAULT_THUMBNAIL_SIZE,
        }
    }
}

impl SeasonConfig {
    /// Check every section
    pub fn validate(&self) -> Result<()> {
        self.extraction.validate()?;
        if self.top_n == 0 {
            return Err(SeasonError::configuration("top_n must be at least 1"));
        }
        if self.thumbnail_size == 0 {
            return Err(SeasonError::configuration("thumbnail_size must be positive"));
        }
        Ok(())
    }

    /// Load and validate configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SeasonError::io(format!("reading {}", path.display()), e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| SeasonError::json(format!("parsing {}", path.display()), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SeasonError::json("serializing configuration", e))?;
        std::fs::write(path, json)
            .map_err(|e| SeasonError::io(format!("writing {}", path.display()), e))?;
        Ok(())
    }
}
