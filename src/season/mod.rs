//! Seasonal palettes and season ranking
//!
//! This module holds the nine seasonal reference palettes and the matcher
//! that ranks them against extracted garment colors.

pub mod palettes;
pub mod matcher;

pub use palettes::{Palette, PaletteTable, Season};
pub use matcher::{MatchResult, SeasonMatcher, SeasonScore};
