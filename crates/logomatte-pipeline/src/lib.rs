//! logomatte-pipeline: Pure background-removal pipeline (sans-IO).
//!
//! Turns a logo on a white background into a transparent PNG through:
//! decode -> background classification -> fringe erosion -> encode.
//! The [`trace`] module turns a matted result into filled outlines for
//! vector export.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and rasters. Filesystem discovery and writing live in
//! `logomatte-io`.

pub mod classify;
pub mod codec;
pub mod defringe;
pub mod diagnostics;
pub mod trace;
pub mod types;

pub use types::{
    ColorThreshold, DefringeOutcome, Dimensions, ERASED, MatteConfig, MatteStats, PipelineError,
    ProcessResult, RgbaImage, channel_spread,
};

/// Remove the white background from an in-memory RGBA raster.
///
/// Runs background classification once, then the defringe loop. The
/// raster is mutated in place and keeps its dimensions.
pub fn remove_background(image: &mut RgbaImage, config: &MatteConfig) -> MatteStats {
    let background_erased = classify::erase_background(image, config.background);
    let defringe = defringe::defringe(image, config.fringe, config.max_rounds);
    MatteStats {
        background_erased,
        defringe,
    }
}

/// Run the full pipeline on encoded image bytes.
///
/// # Pipeline steps
///
/// 1. Decode and normalize to 8-bit RGBA
/// 2. Erase neutral-white background pixels
/// 3. Erode near-white fringe from the transparent region
/// 4. Encode as PNG with alpha
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if `config` fails validation.
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is unrecognized.
/// Returns [`PipelineError::ImageEncode`] if PNG encoding fails.
pub fn process(image_bytes: &[u8], config: &MatteConfig) -> Result<ProcessResult, PipelineError> {
    config.validate()?;

    let mut raster = codec::decode_rgba(image_bytes)?;
    let dimensions = Dimensions {
        width: raster.width(),
        height: raster.height(),
    };

    let stats = remove_background(&mut raster, config);
    let png = codec::encode_png(&raster)?;
    let result = ProcessResult {
        png,
        dimensions,
        stats,
    };
    log::debug!("{}", result.summary());
    Ok(result)
}
