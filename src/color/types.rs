//! Color value types shared by extraction and matching

use std::fmt;

use palette::{white_point::D65, Srgb};
use serde::{Deserialize, Serialize};

use crate::constants::extraction::{LUMA_B, LUMA_G, LUMA_R};
use crate::{Result, SeasonError};

/// CIE Lab color relative to the D65 white point
pub type Lab = palette::Lab<D65, f64>;

/// 8-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `rrggbb` or the `#rgb` shorthand
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            n => {
                return Err(SeasonError::invalid_hex(
                    hex,
                    format!("expected 3 or 6 hex digits, got {}", n),
                ))
            }
        };

        let channel = |range: std::ops::Range<usize>, name: &str| {
            expanded
                .get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| SeasonError::invalid_hex(hex, format!("invalid {} value", name)))
        };

        Ok(Self::new(
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
        ))
    }

    /// Lowercase `#rrggbb` form
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Relative luminance of the encoded channels, in [0, 1]
    pub fn luminance(self) -> f64 {
        (LUMA_R * self.r as f64 + LUMA_G * self.g as f64 + LUMA_B * self.b as f64) / 255.0
    }

    /// Pack into a single `0xRRGGBB` value
    pub(crate) fn packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for Srgb<u8> {
    fn from(color: Rgb) -> Self {
        Srgb::new(color.r, color.g, color.b)
    }
}

impl From<Srgb<u8>> for Rgb {
    fn from(color: Srgb<u8>) -> Self {
        Self::new(color.red, color.green, color.blue)
    }
}

/// A color paired with its prominence weight in (0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedColor<C = Rgb> {
    pub color: C,
    pub weight: f64,
}

impl<C> WeightedColor<C> {
    pub fn new(color: C, weight: f64) -> Self {
        Self { color, weight }
    }

    /// Replace the color, keeping the weight
    pub fn map<D>(self, f: impl FnOnce(C) -> D) -> WeightedColor<D> {
        WeightedColor {
            color: f(self.color),
            weight: self.weight,
        }
    }
}

/// Rectangular block of row-major RGB pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelRegion {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl PixelRegion {
    /// Build a region, checking that the pixel count matches the dimensions
    pub fn new(width: u32, height: u32, pixels: Vec<Rgb>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(SeasonError::invalid_parameter(
                "pixels",
                format!("{} pixels for a {}x{} region", pixels.len(), width, height),
            ));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a region from packed `RGBRGB...` bytes
    pub fn from_raw_rgb(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        if data.len() % 3 != 0 {
            return Err(SeasonError::invalid_parameter(
                "data",
                format!("{} bytes is not a multiple of 3", data.len()),
            ));
        }
        let pixels = data
            .chunks_exact(3)
            .map(|px| Rgb::new(px[0], px[1], px[2]))
            .collect();
        Self::new(width, height, pixels)
    }

    /// A `width` x `height` region filled with one color
    pub fn uniform(width: u32, height: u32, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let color = Rgb::from_hex("#8aa3b5").unwrap();
        assert_eq!(color, Rgb::new(0x8a, 0xa3, 0xb5));
        assert_eq!(color.to_hex(), "#8aa3b5");
    }

    #[test]
    fn test_hex_shorthand_and_case() {
        assert_eq!(Rgb::from_hex("#abc").unwrap(), Rgb::new(0xaa, 0xbb, 0xcc));
        assert_eq!(Rgb::from_hex("FF0000").unwrap(), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::from_hex("  #00ff00 ").unwrap(), Rgb::new(0, 255, 0));
    }

    #[test]
    fn test_hex_invalid() {
        assert!(Rgb::from_hex("#FF").is_err());
        assert!(Rgb::from_hex("#GGGGGG").is_err());
        assert!(Rgb::from_hex("").is_err());
        assert!(Rgb::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_luminance_bounds() {
        assert_eq!(Rgb::new(0, 0, 0).luminance(), 0.0);
        assert!((Rgb::new(255, 255, 255).luminance() - 1.0).abs() < 1e-12);
        assert!(Rgb::new(0, 255, 0).luminance() > Rgb::new(255, 0, 0).luminance());
    }

    #[test]
    fn test_region_dimension_check() {
        assert!(PixelRegion::new(2, 2, vec![Rgb::new(1, 2, 3); 3]).is_err());
        let region = PixelRegion::new(2, 2, vec![Rgb::new(1, 2, 3); 4]).unwrap();
        assert_eq!(region.len(), 4);
        assert_eq!(region.width(), 2);
    }

    #[test]
    fn test_region_from_raw() {
        let data = [255, 0, 0, 0, 255, 0];
        let region = PixelRegion::from_raw_rgb(2, 1, &data).unwrap();
        assert_eq!(region.pixels(), &[Rgb::new(255, 0, 0), Rgb::new(0, 255, 0)]);
        assert!(PixelRegion::from_raw_rgb(1, 1, &data[..4]).is_err());
    }

    #[test]
    fn test_weighted_color_map() {
        let weighted = WeightedColor::new(Rgb::new(10, 20, 30), 0.25);
        let hex = weighted.map(Rgb::to_hex);
        assert_eq!(hex.color, "#0a141e");
        assert_eq!(hex.weight, 0.25);
    }
}
