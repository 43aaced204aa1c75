//! Season ranking
//!
//! Scores every palette against a garment's weighted colors:
//!
//! ```text
//! score(palette) = Σ weight_i · min_j ΔE76(color_i, swatch_j)
//! ```
//!
//! and sorts ascending. Scores within [`TIE_EPSILON`] of each other are ties,
//! resolved by [`Season`] priority.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{ColorConverter, Lab, Rgb, WeightedColor};
use crate::constants::ranking::TIE_EPSILON;
use crate::season::{Palette, PaletteTable, Season};
use crate::{Result, SeasonError};

/// One season and its aggregate distance (lower is closer)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonScore {
    pub season: Season,
    /// Weighted sum of closest-swatch ΔE76 distances.
    ///
    /// Seasons tied within `TIE_EPSILON` all report the smallest score of
    /// their tie, so this can sit up to 1e-9 below the palette's own sum.
    pub distance: f64,
}

/// Every season ranked from closest to farthest
///
/// Never empty: deserializing an empty ranking fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatchResult")]
pub struct MatchResult {
    scores: Vec<SeasonScore>,
}

#[derive(Deserialize)]
struct RawMatchResult {
    scores: Vec<SeasonScore>,
}

impl TryFrom<RawMatchResult> for MatchResult {
    type Error = SeasonError;

    fn try_from(raw: RawMatchResult) -> Result<Self> {
        if raw.scores.is_empty() {
            return Err(SeasonError::EmptyInput);
        }
        Ok(Self { scores: raw.scores })
    }
}

impl MatchResult {
    /// Closest season
    pub fn best(&self) -> &SeasonScore {
        &self.scores[0]
    }

    /// The two runners-up
    pub fn also_works_for(&self) -> &[SeasonScore] {
        self.top(3).get(1..).unwrap_or_default()
    }

    /// The first `n` entries (fewer if `n` exceeds the ranking)
    pub fn top(&self, n: usize) -> &[SeasonScore] {
        &self.scores[..n.min(self.scores.len())]
    }

    pub fn scores(&self) -> &[SeasonScore] {
        &self.scores
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeasonScore> {
        self.scores.iter()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Score of a given season
    pub fn distance_for(&self, season: Season) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.season == season)
            .map(|s| s.distance)
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(best) = self.scores.first() else {
            return f.write_str("No seasons ranked");
        };
        write!(f, "Best for: {} ({:.2})", best.season, best.distance)?;
        let others = self.also_works_for();
        if !others.is_empty() {
            let names: Vec<&str> = others.iter().map(|s| s.season.name()).collect();
            write!(f, "; Also works for: {}", names.join(" · "))?;
        }
        Ok(())
    }
}

/// Ranks seasonal palettes by perceptual distance
#[derive(Debug, Clone, Copy)]
pub struct SeasonMatcher<'a> {
    table: &'a PaletteTable,
    converter: ColorConverter,
}

impl SeasonMatcher<'static> {
    /// Matcher over the built-in palette table
    pub fn builtin() -> Self {
        Self::new(PaletteTable::builtin())
    }
}

impl<'a> SeasonMatcher<'a> {
    pub fn new(table: &'a PaletteTable) -> Self {
        Self {
            table,
            converter: ColorConverter::new(),
        }
    }

    pub fn table(&self) -> &'a PaletteTable {
        self.table
    }

    /// Rank all seasons for extracted RGB colors
    ///
    /// # Errors
    ///
    /// - `EmptyInput` if `colors` is empty
    /// - `Configuration` if a weight is not a positive finite number
    pub fn rank(&self, colors: &[WeightedColor<Rgb>]) -> Result<MatchResult> {
        let labs: Vec<WeightedColor<Lab>> = colors
            .iter()
            .map(|c| c.map(|rgb| self.converter.rgb_to_lab(rgb)))
            .collect();
        self.rank_lab(&labs)
    }

    /// Rank all seasons for colors already in Lab
    pub fn rank_lab(&self, colors: &[WeightedColor<Lab>]) -> Result<MatchResult> {
        if colors.is_empty() {
            return Err(SeasonError::EmptyInput);
        }
        if let Some(bad) = colors.iter().find(|c| !(c.weight.is_finite() && c.weight > 0.0)) {
            return Err(SeasonError::configuration(format!(
                "color weight must be positive, got {}",
                bad.weight
            )));
        }

        let mut scores: Vec<SeasonScore> = self
            .table
            .palettes()
            .iter()
            .map(|palette| SeasonScore {
                season: palette.season(),
                distance: self.palette_distance(colors, palette),
            })
            .collect();

        scores.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.season.cmp(&b.season))
        });
        resolve_ties(&mut scores);

        let result = MatchResult { scores };
        debug!(
            colors = colors.len(),
            best = %result.best().season,
            distance = result.best().distance,
            "ranked seasons"
        );
        Ok(result)
    }

    /// Weighted sum of each color's distance to its closest swatch
    pub fn palette_distance(&self, colors: &[WeightedColor<Lab>], palette: &Palette) -> f64 {
        colors
            .iter()
            .map(|c| c.weight * self.closest_swatch_distance(c.color, palette))
            .sum()
    }

    /// ΔE76 from `color` to the nearest swatch of `palette`
    pub fn closest_swatch_distance(&self, color: Lab, palette: &Palette) -> f64 {
        palette
            .colors()
            .iter()
            .map(|&swatch| self.converter.delta_e(color, swatch))
            .fold(f64::INFINITY, f64::min)
    }
}

/// Reorder runs of near-equal scores by season priority
///
/// A run starts at its smallest score and extends while scores stay within
/// `TIE_EPSILON` of it. Every member's distance is overwritten with the run's
/// smallest score, so a reordered run never reads as descending.
fn resolve_ties(scores: &mut [SeasonScore]) {
    let mut start = 0;
    while start < scores.len() {
        let anchor = scores[start].distance;
        let end = scores[start..]
            .iter()
            .position(|s| s.distance - anchor > TIE_EPSILON)
            .map_or(scores.len(), |offset| start + offset);

        let run = &mut scores[start..end];
        run.sort_by_key(|s| s.season);
        for score in run.iter_mut() {
            score.distance = anchor;
        }
        start = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(season: Season, distance: f64) -> SeasonScore {
        SeasonScore { season, distance }
    }

    #[test]
    fn test_empty_input() {
        let err = SeasonMatcher::builtin().rank(&[]).unwrap_err();
        assert!(matches!(err, SeasonError::EmptyInput));
    }

    #[test]
    fn test_non_positive_weight_rejected() {
        let colors = [WeightedColor::new(Rgb::new(1, 2, 3), 0.0)];
        let err = SeasonMatcher::builtin().rank(&colors).unwrap_err();
        assert!(matches!(err, SeasonError::Configuration { .. }));

        let colors = [WeightedColor::new(Rgb::new(1, 2, 3), f64::NAN)];
        assert!(SeasonMatcher::builtin().rank(&colors).is_err());
    }

    #[test]
    fn test_exact_swatch_scores_zero() {
        let matcher = SeasonMatcher::builtin();
        let swatch = Rgb::new(0xb5, 0x65, 0x1d);
        let result = matcher.rank(&[WeightedColor::new(swatch, 1.0)]).unwrap();

        assert_eq!(result.len(), 9);
        assert_eq!(result.best().season, Season::WarmAutumn);
        assert_eq!(result.best().distance, 0.0);
    }

    #[test]
    fn test_ranking_is_monotone() {
        let matcher = SeasonMatcher::builtin();
        let colors = [
            WeightedColor::new(Rgb::new(40, 90, 160), 0.6),
            WeightedColor::new(Rgb::new(230, 220, 200), 0.3),
            WeightedColor::new(Rgb::new(20, 20, 20), 0.1),
        ];
        let result = matcher.rank(&colors).unwrap();

        assert_eq!(result.len(), 9);
        for pair in result.scores().windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
        let mut seasons: Vec<Season> = result.iter().map(|s| s.season).collect();
        seasons.sort();
        assert_eq!(seasons, Season::ALL.to_vec());
    }

    #[test]
    fn test_palette_distance_weighted_sum() {
        let matcher = SeasonMatcher::builtin();
        let palette = matcher.table().get(Season::DeepWinter);
        let converter = ColorConverter::new();

        let a = converter.rgb_to_lab(Rgb::new(200, 200, 200));
        let b = converter.rgb_to_lab(Rgb::new(0x1b, 0x36, 0x5d));
        let colors = [WeightedColor::new(a, 0.25), WeightedColor::new(b, 0.75)];

        let expected = 0.25 * matcher.closest_swatch_distance(a, palette);
        let actual = matcher.palette_distance(&colors, palette);
        assert!((actual - expected).abs() < 1e-12);
    }

    #[test]
    fn test_resolve_ties_by_priority() {
        let mut scores = vec![
            score(Season::BrightSpring, 1.0),
            score(Season::CoolSummer, 1.0 + 5e-10),
            score(Season::DeepWinter, 2.0),
            score(Season::SoftSummer, 3.0),
        ];
        resolve_ties(&mut scores);

        assert_eq!(scores[0], score(Season::CoolSummer, 1.0));
        assert_eq!(scores[1], score(Season::BrightSpring, 1.0));
        // Cool Summer's own sum was 5e-10 higher
        assert!((scores[0].distance - (1.0 + 5e-10)).abs() <= TIE_EPSILON);
        assert_eq!(scores[2].season, Season::DeepWinter);
        assert_eq!(scores[3].season, Season::SoftSummer);
    }

    #[test]
    fn test_resolve_ties_keeps_distinct_scores() {
        let mut scores = vec![
            score(Season::BrightSpring, 1.0),
            score(Season::SoftSummer, 1.0 + 1e-6),
        ];
        resolve_ties(&mut scores);
        assert_eq!(scores[0].season, Season::BrightSpring);
        assert_eq!(scores[1].distance, 1.0 + 1e-6);
    }

    #[test]
    fn test_also_works_for_and_display() {
        let result = MatchResult {
            scores: vec![
                score(Season::SoftAutumn, 1.5),
                score(Season::WarmAutumn, 2.0),
                score(Season::SoftSummer, 4.0),
                score(Season::DeepWinter, 9.0),
            ],
        };
        let alternates: Vec<Season> = result.also_works_for().iter().map(|s| s.season).collect();
        assert_eq!(alternates, vec![Season::WarmAutumn, Season::SoftSummer]);
        assert_eq!(result.top(20).len(), 4);
        assert_eq!(result.distance_for(Season::DeepWinter), Some(9.0));
        assert_eq!(
            result.to_string(),
            "Best for: Soft Autumn (1.50); Also works for: Warm Autumn · Soft Summer"
        );
    }

    #[test]
    fn test_empty_result_not_deserialized() {
        assert!(serde_json::from_str::<MatchResult>(r#"{"scores":[]}"#).is_err());

        let json = r#"{"scores":[{"season":"Deep Winter","distance":2.5}]}"#;
        let result: MatchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.to_string(), "Best for: Deep Winter (2.50)");
    }

    #[test]
    fn test_empty_result_displays() {
        let result = MatchResult { scores: Vec::new() };
        assert_eq!(result.to_string(), "No seasons ranked");
    }
}
