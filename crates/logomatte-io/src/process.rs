//! Read a source PNG, run the pipeline, and write the transparent result.
//!
//! Each job is handled end to end before returning; nothing is shared
//! between jobs. Output directories are created on demand and existing
//! output files are overwritten. [`export_svg`] traces a written PNG into
//! an SVG next to it.

use std::path::{Path, PathBuf};

use log::debug;
use logomatte_export::{SvgOptions, png_to_svg};
use logomatte_pipeline::diagnostics::{Clock, PipelineDiagnostics, process_with_diagnostics};
use logomatte_pipeline::{Dimensions, MatteConfig, MatteStats, ProcessResult};

use crate::discover::Job;
use crate::error::IoError;

/// What was written for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    /// Full path of the output PNG.
    pub path: PathBuf,
    /// Source image dimensions.
    pub dimensions: Dimensions,
    /// Pixel counts from the matte stages.
    pub stats: MatteStats,
}

/// Process one job, writing `output_dir/<job.output_name>`.
///
/// # Errors
///
/// Returns [`IoError::Read`] if the input cannot be read,
/// [`IoError::Pipeline`] if decoding or encoding fails,
/// [`IoError::CreateDir`] / [`IoError::Write`] if the output cannot be
/// written.
pub fn process_job(job: &Job, output_dir: &Path, config: &MatteConfig) -> Result<Written, IoError> {
    let bytes = read_input(&job.input)?;
    let result = logomatte_pipeline::process(&bytes, config).map_err(|source| IoError::Pipeline {
        path: job.input.clone(),
        source,
    })?;
    write_output(output_dir, &job.output_name, &result)
}

/// Like [`process_job`], but also returns per-stage diagnostics.
///
/// # Errors
///
/// Same as [`process_job`].
pub fn process_job_with_diagnostics<C: Clock>(
    job: &Job,
    output_dir: &Path,
    config: &MatteConfig,
    clock: &C,
) -> Result<(Written, PipelineDiagnostics), IoError> {
    let bytes = read_input(&job.input)?;
    let (result, diagnostics) =
        process_with_diagnostics(&bytes, config, clock).map_err(|source| IoError::Pipeline {
            path: job.input.clone(),
            source,
        })?;
    let written = write_output(output_dir, &job.output_name, &result)?;
    Ok((written, diagnostics))
}

/// Trace `png_path` and write the result to the same path with an `.svg`
/// extension, overwriting any existing file.
///
/// # Errors
///
/// Returns [`IoError::Read`] if the PNG cannot be read,
/// [`IoError::Export`] if it cannot be traced, and [`IoError::Write`] if
/// the SVG cannot be written.
pub fn export_svg(png_path: &Path, options: &SvgOptions) -> Result<PathBuf, IoError> {
    let bytes = read_input(png_path)?;
    let svg = png_to_svg(&bytes, options).map_err(|source| IoError::Export {
        path: png_path.to_path_buf(),
        source,
    })?;

    let path = png_path.with_extension("svg");
    std::fs::write(&path, svg.as_bytes()).map_err(|source| IoError::Write {
        path: path.clone(),
        source,
    })?;
    debug!("wrote {} ({} bytes)", path.display(), svg.len());
    Ok(path)
}

fn read_input(path: &Path) -> Result<Vec<u8>, IoError> {
    let bytes = std::fs::read(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} ({} bytes)", path.display(), bytes.len());
    Ok(bytes)
}

fn write_output(output_dir: &Path, name: &str, result: &ProcessResult) -> Result<Written, IoError> {
    std::fs::create_dir_all(output_dir).map_err(|source| IoError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let path = output_dir.join(name);
    std::fs::write(&path, &result.png).map_err(|source| IoError::Write {
        path: path.clone(),
        source,
    })?;
    debug!("wrote {} ({} bytes)", path.display(), result.png.len());

    Ok(Written {
        path,
        dimensions: result.dimensions,
        stats: result.stats,
    })
}
