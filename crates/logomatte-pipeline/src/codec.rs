//! Image decoding to RGBA and PNG encoding.
//!
//! The matte stages only ever see an 8-bit RGBA raster. Whatever the
//! source layout (grayscale, RGB, 16-bit, palette), it is normalized here
//! on the way in, and serialized back to an RGBA PNG on the way out.

use image::{ImageEncoder, RgbaImage};

use crate::types::PipelineError;

/// Decode raw image bytes into an 8-bit RGBA raster.
///
/// Supports whatever formats the `image` crate was built with (PNG,
/// JPEG, BMP, WebP). Sources without alpha come out fully opaque.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let img = image::load_from_memory(bytes).map_err(PipelineError::ImageDecode)?;
    Ok(img.to_rgba8())
}

/// Encode an RGBA raster as PNG, preserving per-pixel alpha.
///
/// # Errors
///
/// Returns [`PipelineError::ImageEncode`] if the PNG encoder fails.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, PipelineError> {
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(PipelineError::ImageEncode)?;
    Ok(buf)
}
