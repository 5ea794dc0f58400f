//! logomatte-export: SVG serializer for traced silhouettes (sans-IO).
//!
//! Turns the outlines from `logomatte_pipeline::trace` into a single
//! filled `<path>` in the logo's brand color.

pub mod svg;

pub use svg::{DEFAULT_FILL, ExportError, SvgOptions, build_path_data, png_to_svg, to_svg};
