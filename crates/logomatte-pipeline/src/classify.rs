//! Background classification: erase bright, neutral pixels.
//!
//! This is the first matte step. Every pixel is tested on its own against
//! the strict background threshold; there is no neighbor dependency, so
//! the pass is order-independent.

use image::RgbaImage;

use crate::types::{ColorThreshold, ERASED};

/// Returns `true` if the pixel is neutral-white background.
///
/// Alpha is not consulted: an already-transparent white pixel still
/// qualifies and is simply rewritten to the canonical erased value.
#[must_use]
pub fn is_background(pixel: image::Rgba<u8>, threshold: ColorThreshold) -> bool {
    let [r, g, b, _] = pixel.0;
    threshold.matches([r, g, b])
}

/// Rewrite every background pixel to [`ERASED`], in place.
///
/// Non-qualifying pixels pass through unchanged. Returns the number of
/// pixels that qualified.
pub fn erase_background(image: &mut RgbaImage, threshold: ColorThreshold) -> u64 {
    let mut erased = 0;
    for pixel in image.pixels_mut() {
        if is_background(*pixel, threshold) {
            *pixel = ERASED;
            erased += 1;
        }
    }
    erased
}
