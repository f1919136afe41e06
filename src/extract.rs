use std::collections::HashSet;

use image::{DynamicImage, GenericImageView, imageops::FilterType};
use kmeans_colors::{Kmeans, get_kmeans};
use palette::Srgb;

use crate::color::Color;
use crate::error::{PaletteError, Result};

/// Palette size used when the caller does not ask for one.
pub const DEFAULT_COLOR_COUNT: usize = 5;
/// Upper bound on requested colors; cluster indices are stored as `u8`.
pub const MAX_COLOR_COUNT: usize = u8::MAX as usize;
/// Side of the square canvas every image is resampled to before clustering.
pub const SAMPLE_SIZE: u32 = 150;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_MAX_ITERATIONS: usize = 300;
pub const DEFAULT_CONVERGENCE: f32 = 1e-4;

/// Extract up to `n_colors` representative colors with the default settings.
pub fn extract(image: &DynamicImage, n_colors: usize) -> Result<Vec<Color>> {
    PaletteExtractor::default().extract(image, n_colors)
}

/// K-means palette extraction over a fixed-size resample of the image.
///
/// Every run is seeded, so the same image and color count always give the same
/// palette. The extractor holds no state between calls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaletteExtractor {
    sample_size: u32,
    seed: u64,
    max_iterations: usize,
    convergence: f32,
    runs: usize,
}

impl Default for PaletteExtractor {
    fn default() -> Self {
        Self {
            sample_size: SAMPLE_SIZE,
            seed: DEFAULT_SEED,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence: DEFAULT_CONVERGENCE,
            runs: 1,
        }
    }
}

impl PaletteExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample_size(mut self, sample_size: u32) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn convergence(mut self, convergence: f32) -> Self {
        self.convergence = convergence;
        self
    }

    /// Number of k-means runs; run `i` uses `seed + i` and the lowest score wins.
    pub fn runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Extract an ordered palette of at most `n_colors` distinct colors.
    ///
    /// Centroids keep the order k-means reports them in. Centroids that round to
    /// the same RGB triple are collapsed onto the first one, so the palette can
    /// be shorter than the effective cluster count.
    pub fn extract(&self, image: &DynamicImage, n_colors: usize) -> Result<Vec<Color>> {
        self.validate(n_colors)?;

        let samples = self.sample_pixels(image)?;
        let k = effective_cluster_count(&samples, n_colors);
        if k < n_colors {
            log::info!("low color diversity, reducing clusters from {n_colors} to {k}");
        }

        let centroids = self.cluster(&samples, k)?;
        let palette = dedup_colors(centroids.iter().map(Color::from_centroid));
        log::debug!(
            "extracted {} colors from {} centroids",
            palette.len(),
            centroids.len()
        );

        Ok(palette)
    }

    fn validate(&self, n_colors: usize) -> Result<()> {
        if n_colors == 0 {
            return Err(PaletteError::invalid_input("n_colors must be at least 1"));
        }
        if n_colors > MAX_COLOR_COUNT {
            return Err(PaletteError::invalid_input(format!(
                "n_colors must be at most {MAX_COLOR_COUNT}, got {n_colors}"
            )));
        }
        if self.sample_size == 0 {
            return Err(PaletteError::invalid_input("sample size must be at least 1"));
        }
        if self.runs == 0 {
            return Err(PaletteError::invalid_input("runs must be at least 1"));
        }
        Ok(())
    }

    /// Resample to a `sample_size` square (nearest-neighbour, so every sample is
    /// a real source color), drop alpha and flatten to RGB triples.
    ///
    /// The source image is left untouched.
    fn sample_pixels(&self, image: &DynamicImage) -> Result<Vec<[u8; 3]>> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PaletteError::processing(format!(
                "cannot sample an empty {width}x{height} image"
            )));
        }

        let resized = image
            .resize_exact(self.sample_size, self.sample_size, FilterType::Nearest)
            .to_rgb8();
        let samples: Vec<[u8; 3]> = resized.pixels().map(|p| p.0).collect();
        log::debug!(
            "sampled {} pixels from a {width}x{height} image",
            samples.len()
        );

        Ok(samples)
    }

    fn cluster(&self, samples: &[[u8; 3]], k: usize) -> Result<Vec<Srgb<f32>>> {
        let points: Vec<Srgb<f32>> = samples
            .iter()
            .map(|&[r, g, b]| Srgb::new(r, g, b).into_format::<f32>())
            .collect();

        let best: Kmeans<Srgb<f32>> = (0..self.runs)
            .map(|run| {
                get_kmeans(
                    k,
                    self.max_iterations,
                    self.convergence,
                    false,
                    &points,
                    self.seed.wrapping_add(run as u64),
                )
            })
            .min_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| PaletteError::processing("k-means produced no result"))?;

        log::debug!("k-means with k={k} finished with score {}", best.score);

        if best.centroids.is_empty() {
            return Err(PaletteError::processing("k-means returned no centroids"));
        }
        let finite = |c: &Srgb<f32>| c.red.is_finite() && c.green.is_finite() && c.blue.is_finite();
        if !best.centroids.iter().all(finite) {
            return Err(PaletteError::processing("k-means returned a non-finite centroid"));
        }

        Ok(best.centroids)
    }
}

/// `min(n_colors, distinct samples)`, never below one.
fn effective_cluster_count(samples: &[[u8; 3]], n_colors: usize) -> usize {
    let distinct = samples.iter().collect::<HashSet<_>>().len().max(1);
    log::debug!("{distinct} distinct colors in sample set");
    n_colors.min(distinct)
}

fn dedup_colors(colors: impl IntoIterator<Item = Color>) -> Vec<Color> {
    let mut seen = HashSet::new();
    colors
        .into_iter()
        .filter(|color| seen.insert(color.rgb()))
        .collect()
}
