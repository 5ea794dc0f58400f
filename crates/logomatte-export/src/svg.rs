//! SVG export serializer.
//!
//! Every traced outline becomes one closed subpath (`M`, `L`.., `z`) of a
//! single `<path>`. Hole borders are ordinary subpaths too; the even-odd
//! fill rule cuts them out of the region that contains them.
//!
//! Vertices sit at pixel centers, so a coordinate `(x, y)` in the trace
//! is emitted as `(x + 0.5, y + 0.5)` in a `viewBox` matching the source
//! raster.

use svg::Document;
use svg::node::Value;
use svg::node::element::Path;
use svg::node::element::path::Data;

use logomatte_pipeline::trace::{DEFAULT_TRACE_THRESHOLD, Outline, trace_image};
use logomatte_pipeline::{Dimensions, PipelineError};

/// Rose gold used for the site's vector logos.
pub const DEFAULT_FILL: &str = "#b76e79";

/// How a PNG is traced and painted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgOptions {
    /// Grayscale level at or above which a pixel is background.
    pub threshold: u8,
    /// Fill color as `#rgb` or `#rrggbb`.
    pub fill: String,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_TRACE_THRESHOLD,
            fill: DEFAULT_FILL.to_owned(),
        }
    }
}

impl SvgOptions {
    /// Check that the fill is a hex color.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidFill`] otherwise.
    pub fn validate(&self) -> Result<(), ExportError> {
        let valid = self.fill.strip_prefix('#').is_some_and(|hex| {
            matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        });
        if valid {
            Ok(())
        } else {
            Err(ExportError::InvalidFill(self.fill.clone()))
        }
    }
}

/// Errors from PNG to SVG conversion.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The fill is not a `#rgb` / `#rrggbb` color.
    #[error("invalid SVG fill color {0:?} (expected #rgb or #rrggbb)")]
    InvalidFill(String),

    /// The PNG could not be decoded.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Build an SVG path `d` attribute covering every outline.
///
/// Returns an empty string when there is nothing to draw.
///
/// # Examples
///
/// ```
/// use logomatte_export::build_path_data;
/// use logomatte_pipeline::trace::Outline;
///
/// let outline = Outline {
///     points: vec![(0, 0), (2, 0), (2, 1)],
///     hole: false,
/// };
/// assert!(build_path_data(&[outline]).starts_with("M0.5,0.5 L2.5,0.5 L2.5,1.5"));
/// ```
#[must_use]
pub fn build_path_data(outlines: &[Outline]) -> String {
    let mut data = Data::new();
    let mut subpaths = 0usize;
    for outline in outlines {
        let Some((&first, rest)) = outline.points.split_first() else {
            continue;
        };
        data = data.move_to(pixel_center(first));
        for &p in rest {
            data = data.line_to(pixel_center(p));
        }
        data = data.close();
        subpaths += 1;
    }
    if subpaths == 0 {
        return String::new();
    }
    String::from(Value::from(data))
}

fn pixel_center((x, y): (u32, u32)) -> (f64, f64) {
    (f64::from(x) + 0.5, f64::from(y) + 0.5)
}

/// Serialize outlines into an SVG document sized like the source raster.
///
/// An empty outline list yields a valid document with no `<path>`.
#[must_use]
pub fn to_svg(outlines: &[Outline], dimensions: Dimensions, fill: &str) -> String {
    let w = dimensions.width;
    let h = dimensions.height;
    let mut doc = Document::new()
        .set("width", w)
        .set("height", h)
        .set("viewBox", (0, 0, w, h));

    let d = build_path_data(outlines);
    if !d.is_empty() {
        doc = doc.add(
            Path::new()
                .set("d", d)
                .set("fill", fill)
                .set("fill-rule", "evenodd"),
        );
    }

    // `Document` does not emit an XML declaration.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

/// Trace a (matted) PNG and serialize it as a filled SVG.
///
/// # Errors
///
/// Returns [`ExportError::InvalidFill`] if `options` fail validation and
/// [`ExportError::Pipeline`] if the PNG cannot be decoded.
pub fn png_to_svg(png: &[u8], options: &SvgOptions) -> Result<String, ExportError> {
    options.validate()?;
    let trace = trace_image(png, options.threshold)?;
    Ok(to_svg(&trace.outlines, trace.dimensions, &options.fill))
}
