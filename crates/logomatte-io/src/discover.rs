//! Input discovery: find the logo PNGs and decide their output names.
//!
//! The input directory is walked recursively. If every logo in the
//! [`LogoCatalog`] is present, the plan follows catalog order with the
//! canonical output names. Otherwise the first few PNGs (by file name)
//! are processed under generic names and the plan is flagged as a
//! fallback so the caller can warn about it.

use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};
use log::debug;

use crate::catalog::LogoCatalog;
use crate::error::DiscoverError;

/// How many PNGs the fallback plan processes.
pub const FALLBACK_LIMIT: usize = 3;

/// One file to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Source PNG path.
    pub input: PathBuf,
    /// File name to write in the output directory.
    pub output_name: String,
}

/// Ordered list of files to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Jobs in output order.
    pub jobs: Vec<Job>,
    /// `true` when the catalog could not be matched in full and generic
    /// output names are used instead.
    pub fallback: bool,
}

/// Walk `dir` recursively and return every `*.png` file.
///
/// Symlinks that resolve to regular files are included; directory
/// symlinks are not followed. The walk runs on the calling thread.
///
/// The result is sorted by file name, then by full path, so discovery does
/// not depend on filesystem listing order. A missing or unreadable
/// directory yields an empty list.
#[must_use]
pub fn find_pngs(dir: &Path) -> Vec<PathBuf> {
    let mut pngs: Vec<PathBuf> = WalkDir::new(dir)
        .skip_hidden(false)
        .parallelism(Parallelism::Serial)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| {
            let file_type = e.file_type();
            file_type.is_file() || (file_type.is_symlink() && e.path().is_file())
        })
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
        .collect();
    pngs.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
    pngs
}

/// Discover inputs under `input_dir` and build a processing plan.
///
/// # Errors
///
/// Returns [`DiscoverError::NoPngFiles`] if the directory tree contains no
/// PNG files at all.
pub fn plan(input_dir: &Path, catalog: &LogoCatalog) -> Result<Plan, DiscoverError> {
    let candidates = find_pngs(input_dir);
    debug!(
        "found {} PNG candidates under {}",
        candidates.len(),
        input_dir.display()
    );
    plan_from_candidates(&candidates, catalog).ok_or_else(|| DiscoverError::NoPngFiles {
        dir: input_dir.to_path_buf(),
    })
}

/// Build a plan from an already-sorted candidate list.
///
/// Returns `None` when there are no candidates.
#[must_use]
pub fn plan_from_candidates(candidates: &[PathBuf], catalog: &LogoCatalog) -> Option<Plan> {
    if candidates.is_empty() {
        return None;
    }

    if let Some(jobs) = match_catalog(candidates, catalog) {
        return Some(Plan {
            jobs,
            fallback: false,
        });
    }

    let jobs = candidates
        .iter()
        .take(FALLBACK_LIMIT)
        .enumerate()
        .map(|(i, input)| Job {
            input: input.clone(),
            output_name: format!("logo-{}.png", i + 1),
        })
        .collect();
    Some(Plan {
        jobs,
        fallback: true,
    })
}

/// Match every catalog entry to its first candidate, in catalog order.
///
/// Returns `None` unless all entries are found.
fn match_catalog(candidates: &[PathBuf], catalog: &LogoCatalog) -> Option<Vec<Job>> {
    if catalog.is_empty() {
        return None;
    }

    catalog
        .entries()
        .iter()
        .map(|entry| {
            let input = candidates.iter().find(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| entry.matches(name))
            });
            if input.is_none() {
                debug!("catalog logo {} not found", entry.source_name);
            }
            input.map(|input| Job {
                input: input.clone(),
                output_name: entry.output_name.to_owned(),
            })
        })
        .collect()
}
