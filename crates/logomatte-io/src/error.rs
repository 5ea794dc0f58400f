//! Error types for filesystem glue.

use std::path::PathBuf;

use logomatte_export::ExportError;
use logomatte_pipeline::PipelineError;

/// Errors raised while locating input files.
#[derive(Debug, thiserror::Error)]
pub enum DiscoverError {
    /// The input tree contains no PNG files.
    #[error("no PNG files found in {}", .dir.display())]
    NoPngFiles {
        /// Directory that was searched.
        dir: PathBuf,
    },
}

/// Errors raised while processing one input/output pair.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// The input file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// Input path.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The output directory could not be created.
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// Output path.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Decoding, matting or encoding failed.
    #[error("failed to process {}: {source}", .path.display())]
    Pipeline {
        /// Input path.
        path: PathBuf,
        /// Pipeline error.
        #[source]
        source: PipelineError,
    },

    /// Tracing a written PNG into SVG failed.
    #[error("failed to export SVG from {}: {source}", .path.display())]
    Export {
        /// PNG path.
        path: PathBuf,
        /// Export error.
        #[source]
        source: ExportError,
    },
}
