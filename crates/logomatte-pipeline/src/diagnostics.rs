//! Pipeline diagnostics: timing and pixel counts for each stage.
//!
//! [`process_with_diagnostics`] runs the same stages as
//! [`process`](crate::process) and records how long each took and what it
//! changed. Time is read through the [`Clock`] trait so this crate stays
//! free of any particular time source; the CLI supplies one backed by
//! [`std::time::Instant`].
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, MatteConfig, PipelineError, ProcessResult};
use crate::{classify, codec, defringe};

/// Source of monotonic timestamps.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Capture the current time.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    /// Stage 1: decode to RGBA.
    pub decode: StageDiagnostics,
    /// Stage 2: background classification.
    pub classify: StageDiagnostics,
    /// Stage 3: fringe erosion.
    pub defringe: StageDiagnostics,
    /// Stage 4: PNG encoding.
    pub encode: StageDiagnostics,
    /// Total wall-clock duration of the entire pipeline (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all stages.
    pub summary: PipelineSummary,
}

/// Diagnostics for a single pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics that vary by pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Image decoding metrics.
    Decode {
        /// Size of the input image bytes.
        input_bytes: usize,
        /// Decoded image width in pixels.
        width: u32,
        /// Decoded image height in pixels.
        height: u32,
    },
    /// Background classification metrics.
    Classify {
        /// Minimum channel value used.
        lum_min: u8,
        /// Maximum channel spread used.
        sat_max: u8,
        /// Pixels rewritten to transparent.
        erased: u64,
    },
    /// Fringe erosion metrics.
    Defringe {
        /// Minimum channel value used.
        lum_min: u8,
        /// Maximum channel spread used.
        sat_max: u8,
        /// Rounds executed.
        rounds: u32,
        /// Configured round cap.
        max_rounds: u32,
        /// Pixels rewritten to transparent across all rounds.
        removed: u64,
        /// Whether a no-change round was reached before the cap.
        converged: bool,
    },
    /// PNG encoding metrics.
    Encode {
        /// Size of the encoded PNG.
        output_bytes: usize,
    },
}

/// High-level summary counts for the entire pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Source image width in pixels.
    pub image_width: u32,
    /// Source image height in pixels.
    pub image_height: u32,
    /// Total pixel count.
    pub pixel_count: u64,
    /// Pixels left with alpha 0 in the output.
    pub transparent_count: u64,
}

/// Run the full pipeline, collecting per-stage diagnostics.
///
/// Produces exactly the same [`ProcessResult`] as [`process`](crate::process).
///
/// # Errors
///
/// Same as [`process`](crate::process).
pub fn process_with_diagnostics<C: Clock>(
    image_bytes: &[u8],
    config: &MatteConfig,
    clock: &C,
) -> Result<(ProcessResult, PipelineDiagnostics), PipelineError> {
    config.validate()?;
    let start = clock.now();

    let t = clock.now();
    let mut raster = codec::decode_rgba(image_bytes)?;
    let dimensions = Dimensions {
        width: raster.width(),
        height: raster.height(),
    };
    let decode = StageDiagnostics {
        duration: clock.elapsed(&t),
        metrics: StageMetrics::Decode {
            input_bytes: image_bytes.len(),
            width: dimensions.width,
            height: dimensions.height,
        },
    };

    let t = clock.now();
    let background_erased = classify::erase_background(&mut raster, config.background);
    let classify = StageDiagnostics {
        duration: clock.elapsed(&t),
        metrics: StageMetrics::Classify {
            lum_min: config.background.lum_min,
            sat_max: config.background.sat_max,
            erased: background_erased,
        },
    };

    let t = clock.now();
    let outcome = defringe::defringe(&mut raster, config.fringe, config.max_rounds);
    let defringe = StageDiagnostics {
        duration: clock.elapsed(&t),
        metrics: StageMetrics::Defringe {
            lum_min: config.fringe.lum_min,
            sat_max: config.fringe.sat_max,
            rounds: outcome.rounds,
            max_rounds: config.max_rounds,
            removed: outcome.removed,
            converged: outcome.converged,
        },
    };

    let transparent_count = count_transparent(&raster);

    let t = clock.now();
    let png = codec::encode_png(&raster)?;
    let encode = StageDiagnostics {
        duration: clock.elapsed(&t),
        metrics: StageMetrics::Encode {
            output_bytes: png.len(),
        },
    };

    let diagnostics = PipelineDiagnostics {
        decode,
        classify,
        defringe,
        encode,
        total_duration: clock.elapsed(&start),
        summary: PipelineSummary {
            image_width: dimensions.width,
            image_height: dimensions.height,
            pixel_count: u64::from(dimensions.width) * u64::from(dimensions.height),
            transparent_count,
        },
    };

    let result = ProcessResult {
        png,
        dimensions,
        stats: crate::MatteStats {
            background_erased,
            defringe: outcome,
        },
    };
    log::debug!("{}", result.summary());
    Ok((result, diagnostics))
}

impl PipelineDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Pipeline Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Image: {}x{} ({} pixels)",
            self.summary.image_width, self.summary.image_height, self.summary.pixel_count,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        let stages = [
            ("Decode", &self.decode),
            ("Classify", &self.classify),
            ("Defringe", &self.defringe),
            ("Encode", &self.encode),
        ];

        for (name, diag) in &stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Transparent pixels: {} / {}",
            self.summary.transparent_count, self.summary.pixel_count,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Decode {
            input_bytes,
            width,
            height,
        } => format!("{input_bytes} bytes -> {width}x{height}"),
        StageMetrics::Classify {
            lum_min,
            sat_max,
            erased,
        } => format!("lum>={lum_min} spread<={sat_max} erased={erased}"),
        StageMetrics::Defringe {
            lum_min,
            sat_max,
            rounds,
            max_rounds,
            removed,
            converged,
        } => {
            let state = if *converged { "converged" } else { "capped" };
            format!(
                "lum>={lum_min} spread<={sat_max} rounds={rounds}/{max_rounds} removed={removed} ({state})",
            )
        }
        StageMetrics::Encode { output_bytes } => format!("{output_bytes} bytes"),
    }
}

/// Count pixels with alpha 0.
pub(crate) fn count_transparent(image: &image::RgbaImage) -> u64 {
    image
        .pixels()
        .map(|p| u64::from(u8::from(p.0[3] == 0)))
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Deterministic clock: every `now()` advances by one millisecond.
    struct StepClock(Cell<u64>);

    impl Clock for StepClock {
        type Instant = u64;

        fn now(&self) -> u64 {
            let t = self.0.get() + 1;
            self.0.set(t);
            t
        }

        fn elapsed(&self, since: &u64) -> Duration {
            Duration::from_millis(self.0.get() - since)
        }
    }

    fn gold_on_white_png() -> Vec<u8> {
        let img = image::RgbaImage::from_fn(4, 4, |x, y| {
            if (1..3).contains(&x) && (1..3).contains(&y) {
                image::Rgba([212, 175, 55, 255])
            } else {
                image::Rgba([255, 255, 255, 255])
            }
        });
        codec::encode_png(&img).unwrap()
    }

    #[test]
    fn duration_ms_converts_correctly() {
        let d = Duration::from_millis(1234);
        let ms = duration_ms(d);
        assert!((ms - 1234.0).abs() < 0.01);
    }

    #[test]
    fn count_transparent_works() {
        let mut img = image::RgbaImage::from_pixel(5, 2, image::Rgba([0, 0, 0, 255]));
        for x in 0..3 {
            img.put_pixel(x, 1, crate::ERASED);
        }
        assert_eq!(count_transparent(&img), 3);
    }

    #[test]
    fn diagnostics_match_plain_process() {
        let png = gold_on_white_png();
        let config = MatteConfig::default();
        let clock = StepClock(Cell::new(0));

        let (result, diag) = process_with_diagnostics(&png, &config, &clock).unwrap();
        let plain = crate::process(&png, &config).unwrap();

        assert_eq!(result, plain);
        assert_eq!(result.summary(), plain.summary());
        assert_eq!(diag.summary.pixel_count, 16);
        assert_eq!(diag.summary.transparent_count, 12);
        assert!(matches!(
            diag.classify.metrics,
            StageMetrics::Classify { erased: 12, .. }
        ));
        assert!(matches!(
            diag.defringe.metrics,
            StageMetrics::Defringe {
                rounds: 1,
                removed: 0,
                converged: true,
                ..
            }
        ));
        assert!(diag.total_duration >= diag.decode.duration);
    }

    #[test]
    fn invalid_config_is_rejected_before_decoding() {
        let config = MatteConfig {
            max_rounds: 0,
            ..MatteConfig::default()
        };
        let clock = StepClock(Cell::new(0));
        let result = process_with_diagnostics(&[], &config, &clock);
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn report_lists_every_stage() {
        let png = gold_on_white_png();
        let clock = StepClock(Cell::new(0));
        let (_, diag) = process_with_diagnostics(&png, &MatteConfig::default(), &clock).unwrap();

        let report = diag.report();
        assert!(report.contains("Pipeline Diagnostics Report"));
        for stage in ["Decode", "Classify", "Defringe", "Encode"] {
            assert!(report.contains(stage), "missing {stage} in report");
        }
        assert!(report.contains("converged"));
    }

    #[test]
    fn diagnostics_serialize_durations_as_seconds() {
        let png = gold_on_white_png();
        let clock = StepClock(Cell::new(0));
        let (_, diag) = process_with_diagnostics(&png, &MatteConfig::default(), &clock).unwrap();

        let json = serde_json::to_value(&diag).unwrap();
        assert!(json["total_duration"].is_f64());
        assert_eq!(json["summary"]["transparent_count"], 12);
    }
}
