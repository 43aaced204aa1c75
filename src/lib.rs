//! # Season Colors
//!
//! A Rust crate for matching garment colors to seasonal color palettes.
//!
//! This library classifies a cropped garment region by:
//! - Extracting a few dominant colors with a deterministic k-means
//! - Converting them to CIE Lab (D65)
//! - Scoring each of nine seasonal palettes by weighted ΔE76
//! - Ranking the seasons, ties broken by a fixed season order
//!
//! ## Example
//!
//! ```rust,no_run
//! use season_colors::{classify_image, PaletteTable, SeasonConfig};
//! use std::path::Path;
//!
//! let config = SeasonConfig::default();
//! let result = classify_image(Path::new("dress.jpg"), None, &config, PaletteTable::builtin())?;
//! println!("{}", result.ranking);
//! # Ok::<(), season_colors::SeasonError>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod error;
pub mod constants;
pub mod config;
pub mod color;
pub mod season;
pub mod image_loader;

pub use error::{Result, SeasonError};
pub use config::{ExtractionConfig, SeasonConfig};
pub use color::{ColorConverter, ColorExtractor, Lab, PixelRegion, Rgb, WeightedColor};
pub use season::{MatchResult, Palette, PaletteTable, Season, SeasonMatcher, SeasonScore};
pub use image_loader::CropBox;

/// Dominant colors of a garment and the seasons they match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Extracted colors, most prominent first
    pub colors: Vec<WeightedColor>,
    /// All seasons, closest first
    pub ranking: MatchResult,
}

impl Classification {
    /// Extracted colors as `#rrggbb` strings
    pub fn dominant_hexes(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.color.to_hex()).collect()
    }
}

/// Classify an in-memory pixel region
///
/// # Errors
///
/// Returns `SeasonError` if:
/// - The extraction settings are invalid
/// - The region is smaller than `min_pixels` or larger than `max_pixels`
pub fn classify_region(
    region: &PixelRegion,
    config: &ExtractionConfig,
    table: &PaletteTable,
) -> Result<Classification> {
    let colors = ColorExtractor::new(config.clone())?.extract(region)?;
    let ranking = SeasonMatcher::new(table).rank(&colors)?;
    Ok(Classification { colors, ranking })
}

/// Load, crop and classify an image file
///
/// This is the main entry point for file-based callers. The image is cropped
/// to `crop` when given and shrunk to `config.thumbnail_size` before
/// extraction.
///
/// # Errors
///
/// Returns `SeasonError` if:
/// - The configuration is invalid
/// - The image cannot be loaded or the crop is empty
/// - Extraction or matching fails
pub fn classify_image(
    path: &Path,
    crop: Option<CropBox>,
    config: &SeasonConfig,
    table: &PaletteTable,
) -> Result<Classification> {
    config.validate()?;
    let region = image_loader::load_region(path, crop, config.thumbnail_size)?;
    classify_region(&region, &config.extraction, table)
}
