//! Color types, conversion and extraction module
//!
//! This module handles color space conversions and the reduction of pixel
//! regions to weighted dominant colors.

pub mod types;
pub mod conversion;
pub mod extraction;

pub use types::{Lab, PixelRegion, Rgb, WeightedColor};
pub use conversion::ColorConverter;
pub use extraction::ColorExtractor;
