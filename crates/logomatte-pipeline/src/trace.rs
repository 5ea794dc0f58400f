//! Silhouette tracing: turn a matted logo into filled outlines.
//!
//! The raster is flattened onto white, converted to grayscale and
//! thresholded, so every pixel darker than the threshold belongs to the
//! silhouette. Suzuki-Abe border following then yields both outer and
//! hole borders; drawn together under the even-odd fill rule they
//! reproduce the silhouette, counters and all.

use image::{DynamicImage, GrayImage, Rgb, RgbImage, Rgba};

use crate::codec;
use crate::types::{Dimensions, PipelineError, RgbaImage};

/// Grayscale level at or above which a flattened pixel is background.
pub const DEFAULT_TRACE_THRESHOLD: u8 = 220;

/// Closed border of one silhouette region.
///
/// Vertices are pixel coordinates of border pixels, in tracing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    /// Border pixel coordinates `(x, y)`.
    pub points: Vec<(u32, u32)>,
    /// `true` for the inner border of a hole in a region.
    pub hole: bool,
}

/// Outlines traced from one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    /// Dimensions of the traced raster.
    pub dimensions: Dimensions,
    /// Every outline with at least three vertices.
    pub outlines: Vec<Outline>,
}

/// Composite an RGBA raster over opaque white.
#[must_use]
pub fn flatten_on_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        Rgb([over_white(r, a), over_white(g, a), over_white(b, a)])
    })
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let c = u32::from(channel);
    let a = u32::from(alpha);
    let blended = (c * a + 255 * (255 - a) + 127) / 255;
    u8::try_from(blended).unwrap_or(u8::MAX)
}

/// Binary silhouette: 255 where the flattened luma is below `threshold`,
/// 0 elsewhere.
#[must_use]
pub fn silhouette(image: &RgbaImage, threshold: u8) -> GrayImage {
    let mut gray: GrayImage = DynamicImage::ImageRgb8(flatten_on_white(image)).into_luma8();
    for pixel in gray.pixels_mut() {
        pixel.0[0] = if pixel.0[0] < threshold { 255 } else { 0 };
    }
    gray
}

/// Trace the borders of a binary silhouette.
///
/// Borders with fewer than three vertices enclose no area and are dropped.
#[must_use]
pub fn trace_outlines(silhouette: &GrayImage) -> Vec<Outline> {
    imageproc::contours::find_contours::<u32>(silhouette)
        .into_iter()
        .filter(|c| c.points.len() >= 3)
        .map(|c| Outline {
            hole: matches!(c.border_type, imageproc::contours::BorderType::Hole),
            points: c.points.into_iter().map(|p| (p.x, p.y)).collect(),
        })
        .collect()
}

/// Decode image bytes and trace their silhouette.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] or [`PipelineError::ImageDecode`]
/// if the bytes cannot be decoded.
pub fn trace_image(image_bytes: &[u8], threshold: u8) -> Result<Trace, PipelineError> {
    let raster = codec::decode_rgba(image_bytes)?;
    let dimensions = Dimensions {
        width: raster.width(),
        height: raster.height(),
    };
    let outlines = trace_outlines(&silhouette(&raster, threshold));
    log::debug!(
        "{}x{}: traced {} outlines ({} holes) at threshold {threshold}",
        dimensions.width,
        dimensions.height,
        outlines.len(),
        outlines.iter().filter(|o| o.hole).count(),
    );
    Ok(Trace {
        dimensions,
        outlines,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ERASED;

    const GOLD: Rgba<u8> = Rgba([212, 175, 55, 255]);

    /// `size`x`size` transparent field with a gold ring between `outer`
    /// (inclusive) and `inner` (exclusive) pixels from the edge.
    fn gold_ring(size: u32, outer: u32, inner: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| {
            let edge = x.min(y).min(size - 1 - x).min(size - 1 - y);
            if (outer..inner).contains(&edge) {
                GOLD
            } else {
                ERASED
            }
        })
    }

    #[test]
    fn flatten_keeps_opaque_and_whitens_transparent() {
        let mut img = RgbaImage::from_pixel(3, 1, GOLD);
        img.put_pixel(1, 0, ERASED);
        img.put_pixel(2, 0, Rgba([0, 0, 0, 128]));

        let flat = flatten_on_white(&img);
        assert_eq!(*flat.get_pixel(0, 0), Rgb([212, 175, 55]));
        assert_eq!(*flat.get_pixel(1, 0), Rgb([255, 255, 255]));
        assert_eq!(*flat.get_pixel(2, 0), Rgb([127, 127, 127]));
    }

    #[test]
    fn silhouette_marks_dark_pixels_only() {
        let mut img = RgbaImage::from_pixel(4, 1, ERASED);
        img.put_pixel(0, 0, GOLD);
        img.put_pixel(1, 0, Rgba([240, 236, 232, 255]));
        // Gold at low alpha flattens to a light tint.
        img.put_pixel(2, 0, Rgba([212, 175, 55, 20]));

        let sil = silhouette(&img, DEFAULT_TRACE_THRESHOLD);
        let values: Vec<u8> = sil.pixels().map(|p| p.0[0]).collect();
        assert_eq!(values, [255, 0, 0, 0]);
    }

    #[test]
    fn empty_silhouette_has_no_outlines() {
        let sil = silhouette(&RgbaImage::from_pixel(8, 8, ERASED), DEFAULT_TRACE_THRESHOLD);
        assert!(trace_outlines(&sil).is_empty());
    }

    #[test]
    fn single_pixel_is_dropped() {
        let mut img = RgbaImage::from_pixel(5, 5, ERASED);
        img.put_pixel(2, 2, GOLD);
        let sil = silhouette(&img, DEFAULT_TRACE_THRESHOLD);
        assert!(trace_outlines(&sil).is_empty());
    }

    #[test]
    fn filled_square_is_one_outer_outline() {
        let img = gold_ring(10, 2, 5);
        let outlines = trace_outlines(&silhouette(&img, DEFAULT_TRACE_THRESHOLD));

        assert_eq!(outlines.len(), 1);
        assert!(!outlines[0].hole);
        for &(x, y) in &outlines[0].points {
            assert!((2..8).contains(&x) && (2..8).contains(&y));
        }
    }

    #[test]
    fn ring_has_outer_and_hole_outlines() {
        let img = gold_ring(12, 1, 4);
        let outlines = trace_outlines(&silhouette(&img, DEFAULT_TRACE_THRESHOLD));

        assert_eq!(outlines.iter().filter(|o| !o.hole).count(), 1);
        assert_eq!(outlines.iter().filter(|o| o.hole).count(), 1);
    }

    #[test]
    fn trace_image_decodes_png() {
        let png = codec::encode_png(&gold_ring(10, 2, 5)).unwrap();
        let trace = trace_image(&png, DEFAULT_TRACE_THRESHOLD).unwrap();

        assert_eq!(
            trace.dimensions,
            Dimensions {
                width: 10,
                height: 10
            }
        );
        assert_eq!(trace.outlines.len(), 1);
    }

    #[test]
    fn trace_image_rejects_empty_input() {
        assert!(matches!(
            trace_image(&[], DEFAULT_TRACE_THRESHOLD),
            Err(PipelineError::EmptyInput)
        ));
    }
}
