//! Shared types for the logomatte background-removal pipeline.

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can reference the raster
/// without depending on `image` directly.
pub use image::RgbaImage;

/// Value written to every erased pixel: fully transparent, canonical white.
///
/// Resetting RGB keeps stray color out of transparent regions.
pub const ERASED: image::Rgba<u8> = image::Rgba([255, 255, 255, 0]);

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// A brightness + neutrality test on the RGB channels of a pixel.
///
/// A pixel passes when every channel is at least `lum_min` and the
/// channel spread (`max - min`) is at most `sat_max`. The spread is a
/// coarse saturation proxy: gold tones are bright but have a large
/// red-to-blue spread, so they fail the test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorThreshold {
    /// Minimum value required on each of R, G and B.
    pub lum_min: u8,
    /// Maximum allowed channel spread.
    pub sat_max: u8,
}

impl ColorThreshold {
    /// Create a new threshold.
    #[must_use]
    pub const fn new(lum_min: u8, sat_max: u8) -> Self {
        Self { lum_min, sat_max }
    }

    /// Returns `true` if the RGB triple is bright and neutral enough.
    #[must_use]
    pub fn matches(self, rgb: [u8; 3]) -> bool {
        let [r, g, b] = rgb;
        if r < self.lum_min || g < self.lum_min || b < self.lum_min {
            return false;
        }
        channel_spread(rgb) <= self.sat_max
    }
}

/// Max channel minus min channel across R, G and B.
#[must_use]
pub fn channel_spread(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb;
    r.max(g).max(b) - r.min(g).min(b)
}

/// Configuration for the background-removal pipeline.
///
/// The defaults are tuned for the gold-on-white MarDelux logo family.
/// The fringe saturation bound in particular assumes the foreground gold
/// has a channel spread above 38; other palettes may need a tighter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatteConfig {
    /// Strict test for neutral-white background pixels (applied once).
    pub background: ColorThreshold,

    /// Looser test for anti-aliased halo pixels, applied only next to
    /// pixels that are already transparent.
    pub fringe: ColorThreshold,

    /// Upper bound on defringe rounds. Each round strips at most one
    /// pixel layer of halo.
    pub max_rounds: u32,
}

impl MatteConfig {
    /// Default minimum channel value for background pixels.
    pub const DEFAULT_LUM_MIN: u8 = 246;
    /// Default maximum channel spread for background pixels.
    pub const DEFAULT_SAT_MAX: u8 = 18;
    /// Default minimum channel value for fringe pixels.
    pub const DEFAULT_FRINGE_LUM_MIN: u8 = 232;
    /// Default maximum channel spread for fringe pixels.
    pub const DEFAULT_FRINGE_SAT_MAX: u8 = 38;
    /// Default cap on defringe rounds.
    pub const DEFAULT_MAX_ROUNDS: u32 = 6;

    /// Check the configuration for values the pipeline cannot honor.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if `max_rounds` is zero, or
    /// if the fringe threshold is stricter than the background threshold
    /// on either axis (the fringe pass is meant to catch a superset).
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_rounds == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_rounds must be at least 1".to_owned(),
            ));
        }
        if self.fringe.lum_min > self.background.lum_min {
            return Err(PipelineError::InvalidConfig(format!(
                "fringe lum_min ({}) must not exceed background lum_min ({})",
                self.fringe.lum_min, self.background.lum_min,
            )));
        }
        if self.fringe.sat_max < self.background.sat_max {
            return Err(PipelineError::InvalidConfig(format!(
                "fringe sat_max ({}) must not be below background sat_max ({})",
                self.fringe.sat_max, self.background.sat_max,
            )));
        }
        Ok(())
    }
}

impl Default for MatteConfig {
    fn default() -> Self {
        Self {
            background: ColorThreshold::new(Self::DEFAULT_LUM_MIN, Self::DEFAULT_SAT_MAX),
            fringe: ColorThreshold::new(Self::DEFAULT_FRINGE_LUM_MIN, Self::DEFAULT_FRINGE_SAT_MAX),
            max_rounds: Self::DEFAULT_MAX_ROUNDS,
        }
    }
}

/// Summary of what the defringe loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefringeOutcome {
    /// Rounds executed, including the final no-change round when the loop
    /// converged.
    pub rounds: u32,
    /// Total pixels erased across all rounds.
    pub removed: u64,
    /// `true` if a round produced no changes before the cap was hit.
    pub converged: bool,
}

/// Pixel counts from one pass of [`remove_background`](crate::remove_background).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatteStats {
    /// Pixels erased by the background classifier.
    pub background_erased: u64,
    /// Defringe loop summary.
    pub defringe: DefringeOutcome,
}

/// Result of running the full decode -> matte -> encode pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    /// Encoded PNG with per-pixel alpha.
    pub png: Vec<u8>,
    /// Dimensions of the source image in pixels.
    pub dimensions: Dimensions,
    /// What the classifier and defringer changed.
    pub stats: MatteStats,
}

impl ProcessResult {
    /// One-line account of what the matte stages did to this image.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}x{}: {} background pixels, {} fringe pixels in {} rounds",
            self.dimensions.width,
            self.dimensions.height,
            self.stats.background_erased,
            self.stats.defringe.removed,
            self.stats.defringe.rounds,
        )
    }
}

/// Errors that can occur during pipeline processing.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[source] image::ImageError),

    /// Failed to encode the output PNG.
    #[error("failed to encode PNG: {0}")]
    ImageEncode(#[source] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}
