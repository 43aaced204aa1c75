//! Dominant color extraction
//!
//! Reduces a pixel region to a few weighted colors with a deterministic
//! k-means in RGB space:
//! - Histogram of distinct colors (most frequent first)
//! - Farthest-point seeding starting from the most frequent color
//! - Count-weighted Lloyd iterations up to a fixed cap
//! - Rounded centroids, weights as pixel-count fractions
//!
//! Every tie (seed choice, cluster assignment, output order) is broken by a
//! fixed rule, so identical input always yields identical output.

use std::collections::{BTreeMap, HashMap};
use std::cmp::Ordering;

use tracing::debug;

use crate::color::{PixelRegion, Rgb, WeightedColor};
use crate::config::ExtractionConfig;
use crate::{Result, SeasonError};

/// One distinct color and how many pixels carry it
#[derive(Debug, Clone, Copy)]
struct HistogramEntry {
    color: Rgb,
    count: usize,
}

type Point = [f64; 3];

/// Extracts dominant colors from pixel regions
#[derive(Debug, Clone)]
pub struct ColorExtractor {
    config: ExtractionConfig,
}

impl Default for ColorExtractor {
    fn default() -> Self {
        Self {
            config: ExtractionConfig::default(),
        }
    }
}

impl ColorExtractor {
    /// Create an extractor, rejecting invalid settings
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract the dominant colors of a region
    ///
    /// # Returns
    ///
    /// Between 1 and `num_colors` colors, sorted by descending weight (ties by
    /// lower luminance), with weights summing to 1.0
    ///
    /// # Errors
    ///
    /// - `InsufficientData` if the region is empty or below `min_pixels`
    /// - `RegionTooLarge` if the region exceeds `max_pixels`
    pub fn extract(&self, region: &PixelRegion) -> Result<Vec<WeightedColor>> {
        let pixels = region.pixels();
        let minimum = self.config.min_pixels.max(1);
        if pixels.len() < minimum {
            return Err(SeasonError::InsufficientData {
                pixel_count: pixels.len(),
                minimum,
            });
        }
        if pixels.len() > self.config.max_pixels {
            return Err(SeasonError::RegionTooLarge {
                pixel_count: pixels.len(),
                limit: self.config.max_pixels,
            });
        }

        // Step 1: distinct colors
        let entries = histogram(pixels);
        let k = self.config.num_colors.min(entries.len());

        // Step 2: clustering
        let mut centroids = initial_centroids(&entries, k);
        let (assignment, iterations) = self.lloyd(&entries, &mut centroids);

        // Step 3: cluster summaries
        let clusters = summarize(&entries, &assignment, k);

        // Step 4: drop, merge and weight
        let colors = self.weigh(clusters, pixels.len());

        debug!(
            pixels = pixels.len(),
            distinct = entries.len(),
            k,
            iterations,
            kept = colors.len(),
            "extracted dominant colors"
        );

        Ok(colors)
    }

    /// Run Lloyd iterations, returning the final assignment and iteration count
    fn lloyd(&self, entries: &[HistogramEntry], centroids: &mut [Point]) -> (Vec<usize>, usize) {
        let mut assignment = vec![usize::MAX; entries.len()];
        let mut iterations = 0;

        while iterations < self.config.max_iterations {
            iterations += 1;

            let mut changed = false;
            for (slot, entry) in assignment.iter_mut().zip(entries) {
                let nearest = nearest_centroid(centroids, point(entry.color));
                if *slot != nearest {
                    *slot = nearest;
                    changed = true;
                }
            }
            if !changed {
                break;
            }

            let mut sums = vec![[0.0; 3]; centroids.len()];
            let mut counts = vec![0usize; centroids.len()];
            for (&cluster, entry) in assignment.iter().zip(entries) {
                let p = point(entry.color);
                let n = entry.count as f64;
                for channel in 0..3 {
                    sums[cluster][channel] += p[channel] * n;
                }
                counts[cluster] += entry.count;
            }
            // An emptied cluster keeps its previous centroid
            for ((centroid, sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
                if count > 0 {
                    let n = count as f64;
                    *centroid = [sum[0] / n, sum[1] / n, sum[2] / n];
                }
            }
        }

        (assignment, iterations)
    }

    /// Turn clusters into weighted colors sorted by prominence
    fn weigh(&self, clusters: Vec<(Rgb, usize)>, total: usize) -> Vec<WeightedColor> {
        let largest = clusters.iter().map(|&(_, count)| count).max().unwrap_or(0);
        let threshold = self.config.min_cluster_fraction * total as f64;

        // Clusters whose rounded centroids coincide are merged
        let mut merged: BTreeMap<Rgb, usize> = BTreeMap::new();
        let mut largest_kept = false;
        for (color, count) in clusters {
            let is_largest = count == largest && !largest_kept;
            if count == 0 || ((count as f64) < threshold && !is_largest) {
                continue;
            }
            largest_kept |= is_largest;
            *merged.entry(color).or_insert(0) += count;
        }

        let kept_total: usize = merged.values().sum();
        let mut colors: Vec<WeightedColor> = merged
            .into_iter()
            .map(|(color, count)| WeightedColor::new(color, count as f64 / kept_total as f64))
            .collect();
        colors.sort_by(compare_prominence);
        colors
    }
}

/// Count distinct colors, most frequent first (ties by packed RGB value)
fn histogram(pixels: &[Rgb]) -> Vec<HistogramEntry> {
    let mut counts: HashMap<Rgb, usize> = HashMap::new();
    for &pixel in pixels {
        *counts.entry(pixel).or_insert(0) += 1;
    }

    let mut entries: Vec<HistogramEntry> = counts
        .into_iter()
        .map(|(color, count)| HistogramEntry { color, count })
        .collect();
    entries.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.color.packed().cmp(&b.color.packed()))
    });
    entries
}

/// Farthest-point seeding; `k` must not exceed the number of entries
fn initial_centroids(entries: &[HistogramEntry], k: usize) -> Vec<Point> {
    let mut centroids = Vec::with_capacity(k);
    let Some(first) = entries.first() else {
        return centroids;
    };
    centroids.push(point(first.color));

    let mut nearest: Vec<f64> = entries
        .iter()
        .map(|e| distance_squared(point(e.color), centroids[0]))
        .collect();

    while centroids.len() < k {
        // Strict comparison keeps the earliest entry on ties
        let mut farthest = 0;
        for (i, &d) in nearest.iter().enumerate() {
            if d > nearest[farthest] {
                farthest = i;
            }
        }
        if nearest[farthest] == 0.0 {
            break;
        }

        let seed = point(entries[farthest].color);
        centroids.push(seed);
        for (d, entry) in nearest.iter_mut().zip(entries) {
            *d = d.min(distance_squared(point(entry.color), seed));
        }
    }

    centroids
}

/// Rounded centroid and pixel count for every cluster index
fn summarize(entries: &[HistogramEntry], assignment: &[usize], k: usize) -> Vec<(Rgb, usize)> {
    let mut sums = vec![[0.0; 3]; k];
    let mut counts = vec![0usize; k];
    for (&cluster, entry) in assignment.iter().zip(entries) {
        let p = point(entry.color);
        let n = entry.count as f64;
        for channel in 0..3 {
            sums[cluster][channel] += p[channel] * n;
        }
        counts[cluster] += entry.count;
    }

    sums.iter()
        .zip(counts)
        .map(|(sum, count)| {
            if count == 0 {
                return (Rgb::new(0, 0, 0), 0);
            }
            let n = count as f64;
            let channel = |v: f64| (v / n).round().clamp(0.0, 255.0) as u8;
            (Rgb::new(channel(sum[0]), channel(sum[1]), channel(sum[2])), count)
        })
        .collect()
}

/// Index of the closest centroid, lowest index on ties
fn nearest_centroid(centroids: &[Point], p: Point) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, &centroid) in centroids.iter().enumerate() {
        let d = distance_squared(p, centroid);
        if d < best_distance {
            best = i;
            best_distance = d;
        }
    }
    best
}

/// Descending weight, then ascending luminance, then ascending packed RGB
fn compare_prominence(a: &WeightedColor, b: &WeightedColor) -> Ordering {
    b.weight
        .total_cmp(&a.weight)
        .then_with(|| a.color.luminance().total_cmp(&b.color.luminance()))
        .then_with(|| a.color.packed().cmp(&b.color.packed()))
}

fn point(color: Rgb) -> Point {
    [color.r as f64, color.g as f64, color.b as f64]
}

fn distance_squared(p: Point, q: Point) -> f64 {
    let dr = p[0] - q[0];
    let dg = p[1] - q[1];
    let db = p[2] - q[2];
    dr * dr + dg * dg + db * db
}
