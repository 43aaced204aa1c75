//! Color space conversion utilities
//!
//! Provides conversions between color spaces:
//! - 8-bit sRGB to CIE XYZ and Lab (D65, sRGB companding)
//! - Lab back to 8-bit sRGB with gamut clamping
//! - ΔE76 color difference

use palette::{white_point::D65, FromColor, Srgb, Xyz};

use crate::color::{Lab, Rgb};
use crate::constants::D65_WHITE_POINT_XYZ;

/// Stateless color converter targeting the D65 illuminant
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorConverter;

impl ColorConverter {
    /// Create a new color converter with D65 as target illuminant
    pub fn new() -> Self {
        Self
    }

    /// Reference white the converter normalizes against
    pub fn white_point(&self) -> [f64; 3] {
        D65_WHITE_POINT_XYZ
    }

    /// Convert 8-bit sRGB to CIE XYZ
    ///
    /// Channels are linearized with the sRGB transfer function before the
    /// linear RGB to XYZ matrix is applied.
    pub fn rgb_to_xyz(&self, rgb: Rgb) -> Xyz<D65, f64> {
        Xyz::from_color(Self::srgb(rgb))
    }

    /// Convert 8-bit sRGB to Lab color space
    ///
    /// # Arguments
    ///
    /// * `rgb` - color with channels in [0, 255]
    ///
    /// # Returns
    ///
    /// Lab color relative to the D65 white point
    pub fn rgb_to_lab(&self, rgb: Rgb) -> Lab {
        Lab::from_color(Self::srgb(rgb))
    }

    /// Convert Lab to the nearest 8-bit sRGB color, clamped to the gamut
    pub fn lab_to_rgb(&self, lab: Lab) -> Rgb {
        let srgb = Srgb::<f64>::from_color(lab);
        let clamped = Srgb::new(
            srgb.red.clamp(0.0, 1.0),
            srgb.green.clamp(0.0, 1.0),
            srgb.blue.clamp(0.0, 1.0),
        );
        clamped.into_format::<u8>().into()
    }

    /// Compute Delta E (color difference) between two Lab colors
    ///
    /// Uses simple Euclidean distance (ΔE76)
    pub fn delta_e(&self, lab1: Lab, lab2: Lab) -> f64 {
        let dl = lab1.l - lab2.l;
        let da = lab1.a - lab2.a;
        let db = lab1.b - lab2.b;
        (dl * dl + da * da + db * db).sqrt()
    }

    fn srgb(rgb: Rgb) -> Srgb<f64> {
        Srgb::<u8>::from(rgb).into_format::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_point() {
        let converter = ColorConverter::new();
        assert_eq!(converter.white_point(), D65_WHITE_POINT_XYZ);

        let xyz = converter.rgb_to_xyz(Rgb::new(255, 255, 255));
        assert!((xyz.x - D65_WHITE_POINT_XYZ[0]).abs() < 1e-3);
        assert!((xyz.y - D65_WHITE_POINT_XYZ[1]).abs() < 1e-3);
        assert!((xyz.z - D65_WHITE_POINT_XYZ[2]).abs() < 1e-3);
    }

    #[test]
    fn test_rgb_to_lab_black() {
        let converter = ColorConverter::new();
        let lab = converter.rgb_to_lab(Rgb::new(0, 0, 0));
        assert!(lab.l.abs() < 0.5);
    }

    #[test]
    fn test_rgb_to_lab_white() {
        let converter = ColorConverter::new();
        let lab = converter.rgb_to_lab(Rgb::new(255, 255, 255));
        assert!((lab.l - 100.0).abs() < 0.5);
        assert!(lab.a.abs() < 0.5);
        assert!(lab.b.abs() < 0.5);
    }

    #[test]
    fn test_rgb_to_lab_primaries() {
        let converter = ColorConverter::new();

        // Reference values for sRGB red under D65
        let red = converter.rgb_to_lab(Rgb::new(255, 0, 0));
        assert!((red.l - 53.24).abs() < 0.5);
        assert!((red.a - 80.09).abs() < 0.5);
        assert!((red.b - 67.20).abs() < 0.5);

        let blue = converter.rgb_to_lab(Rgb::new(0, 0, 255));
        assert!(blue.b < -100.0);
    }

    #[test]
    fn test_lab_to_rgb_roundtrip() {
        let converter = ColorConverter::new();
        for rgb in [
            Rgb::new(0x8a, 0xa3, 0xb5),
            Rgb::new(0xb5, 0x65, 0x1d),
            Rgb::new(0, 0, 0),
            Rgb::new(255, 255, 255),
        ] {
            assert_eq!(converter.lab_to_rgb(converter.rgb_to_lab(rgb)), rgb);
        }
    }

    #[test]
    fn test_lab_to_rgb_gamut_clipping() {
        let converter = ColorConverter::new();
        let rgb = converter.lab_to_rgb(Lab::new(50.0, 120.0, 120.0));
        assert_eq!(rgb.r, 255);
    }

    #[test]
    fn test_delta_e_same_color() {
        let converter = ColorConverter::new();
        let lab = converter.rgb_to_lab(Rgb::new(12, 200, 99));
        assert_eq!(converter.delta_e(lab, lab), 0.0);
    }

    #[test]
    fn test_delta_e_different_colors() {
        let converter = ColorConverter::new();
        let lab1 = Lab::new(50.0, 0.0, 0.0);
        let lab2 = Lab::new(53.0, 4.0, 0.0);
        assert!((converter.delta_e(lab1, lab2) - 5.0).abs() < 1e-12);
        assert_eq!(converter.delta_e(lab1, lab2), converter.delta_e(lab2, lab1));
    }
}
