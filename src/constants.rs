//! Reference values and defaults for color extraction and season matching
//!
//! This module contains compile-time constants for color conversion,
//! clustering and ranking.

/// D65 Standard Illuminant Reference
///
/// CIE Standard Illuminant D65 represents average daylight with a correlated
/// color temperature of 6504K. All Lab values in this crate are relative to it.
pub mod d65 {
    /// D65 white point in CIE XYZ color space (array form)
    /// Source: CIE 15:2004 Colorimetry, 3rd edition
    pub const WHITE_POINT_XYZ: [f64; 3] = [0.95047, 1.00000, 1.08883];
}

/// Re-export D65 white point at top level for convenience
pub const D65_WHITE_POINT_XYZ: [f64; 3] = d65::WHITE_POINT_XYZ;

/// Dominant color extraction defaults
pub mod extraction {
    /// Number of clusters requested when the caller does not say
    pub const DEFAULT_NUM_COLORS: usize = 5;

    /// Smallest region accepted by default
    pub const DEFAULT_MIN_PIXELS: usize = 1;

    /// Lloyd iteration cap for k-means
    pub const DEFAULT_MAX_ITERATIONS: usize = 24;

    /// Clusters below this pixel fraction are dropped (0.0 keeps every non-empty cluster)
    pub const DEFAULT_MIN_CLUSTER_FRACTION: f64 = 0.0;

    /// Upper bound on pixels handed to the extractor
    pub const DEFAULT_MAX_PIXELS: usize = 16_000_000; // 16MP

    /// Tolerance on the sum of extracted weights
    pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

    /// Rec. 709 luma coefficients used for luminance tie-breaking
    pub const LUMA_R: f64 = 0.2126;
    pub const LUMA_G: f64 = 0.7152;
    pub const LUMA_B: f64 = 0.0722;
}

/// Season ranking parameters
pub mod ranking {
    /// Distances closer than this are considered tied
    pub const TIE_EPSILON: f64 = 1e-9;

    /// Number of seasons reported by default ("best" plus two alternates)
    pub const DEFAULT_TOP_N: usize = 3;

    /// Number of seasonal palettes in a complete table
    pub const SEASON_COUNT: usize = 9;
}

/// Image loading parameters
pub mod loading {
    /// Longest side of the working thumbnail
    pub const DEFAULT_THUMBNAIL_SIZE: u32 = 300;
}
