//! logomatte-io: Filesystem glue for the logomatte pipeline.
//!
//! Locates the logo PNGs under an input directory, names the outputs, and
//! runs each file through `logomatte-pipeline`, optionally exporting an
//! SVG through `logomatte-export`. All pixel work happens in those crates;
//! this crate only reads, plans, and writes.

pub mod catalog;
pub mod discover;
pub mod error;
pub mod process;

pub use catalog::{LogoCatalog, LogoEntry};
pub use discover::{FALLBACK_LIMIT, Job, Plan, find_pngs, plan};
pub use error::{DiscoverError, IoError};
pub use process::{Written, export_svg, process_job, process_job_with_diagnostics};
