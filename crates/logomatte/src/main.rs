//! logomatte: remove the white background from the MarDelux logo PNGs.
//!
//! Finds the three logo exports under the input directory, erases the
//! neutral-white background and the near-white anti-alias fringe, and
//! writes transparent PNGs under their canonical names. With `--svg`,
//! each PNG is also traced into a filled SVG in the site's rose gold.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin logomatte -- [INPUT_DIR] [OUTPUT_DIR]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use logomatte_export::{DEFAULT_FILL, SvgOptions};
use logomatte_io::{
    IoError, Job, LogoCatalog, Plan, export_svg, plan, process_job_with_diagnostics,
};
use logomatte_pipeline::diagnostics::{Clock, PipelineDiagnostics};
use logomatte_pipeline::trace::DEFAULT_TRACE_THRESHOLD;
use logomatte_pipeline::{ColorThreshold, MatteConfig};
use serde::Serialize;

const USAGE: &str = "Usage: logomatte [INPUT_DIR] [OUTPUT_DIR]";

/// Remove the white background from logo PNGs, keeping the gold foreground.
///
/// Looks for the three MarDelux logo exports (any nesting, any file-name
/// prefix) and writes `logo-texto.png`, `logo-lotus.png` and
/// `logo-completo.png`. If they are not all present, the first three PNGs
/// by file name are processed as `logo-1.png` .. `logo-3.png`.
#[derive(Parser)]
#[command(name = "logomatte", version)]
struct Cli {
    /// Directory searched recursively for source PNGs.
    #[arg(default_value = "assets")]
    input_dir: PathBuf,

    /// Directory the transparent PNGs are written to (created if needed).
    #[arg(default_value = "public/logo")]
    output_dir: PathBuf,

    /// Minimum R, G and B value for a pixel to count as background.
    #[arg(long, default_value_t = MatteConfig::DEFAULT_LUM_MIN)]
    lum_min: u8,

    /// Maximum channel spread for a pixel to count as background.
    #[arg(long, default_value_t = MatteConfig::DEFAULT_SAT_MAX)]
    sat_max: u8,

    /// Minimum R, G and B value for a fringe pixel.
    #[arg(long, default_value_t = MatteConfig::DEFAULT_FRINGE_LUM_MIN)]
    fringe_lum_min: u8,

    /// Maximum channel spread for a fringe pixel.
    #[arg(long, default_value_t = MatteConfig::DEFAULT_FRINGE_SAT_MAX)]
    fringe_sat_max: u8,

    /// Maximum number of defringe rounds (one halo layer per round).
    #[arg(long, default_value_t = MatteConfig::DEFAULT_MAX_ROUNDS, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    max_rounds: u32,

    /// Full matte config as a JSON string.
    ///
    /// When provided, the individual threshold flags are ignored.
    /// The JSON must be a valid `MatteConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,

    /// Skip files that fail to process instead of aborting the run.
    #[arg(long)]
    keep_going: bool,

    /// Also trace each written PNG into `<name>.svg` next to it.
    #[arg(long)]
    svg: bool,

    /// Grayscale level at or above which a pixel is left out of the SVG.
    #[arg(long, default_value_t = DEFAULT_TRACE_THRESHOLD)]
    svg_threshold: u8,

    /// SVG fill color (`#rgb` or `#rrggbb`).
    #[arg(long, default_value = DEFAULT_FILL)]
    svg_fill: String,

    /// Print one JSON line of diagnostics per file on stdout.
    ///
    /// Progress messages move to stderr so stdout stays machine-readable.
    #[arg(long)]
    json: bool,

    /// Enable debug logging (overridden by `RUST_LOG`).
    #[arg(short, long)]
    verbose: bool,
}

/// Build a [`MatteConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual threshold flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<MatteConfig, String> {
    let config = if let Some(ref json) = cli.config_json {
        serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"))?
    } else {
        MatteConfig {
            background: ColorThreshold::new(cli.lum_min, cli.sat_max),
            fringe: ColorThreshold::new(cli.fringe_lum_min, cli.fringe_sat_max),
            max_rounds: cli.max_rounds,
        }
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut console = Console {
        out: io::stdout().lock(),
        err: io::stderr().lock(),
        json: cli.json,
    };
    match execute(&cli, &mut console) {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::Failed) => ExitCode::FAILURE,
        Err(e) => {
            drop(console);
            eprintln!("Error writing output: {e}");
            ExitCode::FAILURE
        }
    }
}

/// How a run ended; `main` maps it to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Every file was written.
    Done,
    /// Bad arguments, no inputs, or at least one file failed.
    Failed,
}

/// Output streams for one run.
///
/// With `--json`, stdout carries only the per-file JSON lines and the
/// progress lines move to stderr.
struct Console<O, E> {
    out: O,
    err: E,
    json: bool,
}

impl<O: Write, E: Write> Console<O, E> {
    /// Stream for human-readable progress lines.
    fn progress(&mut self) -> &mut dyn Write {
        if self.json { &mut self.err } else { &mut self.out }
    }
}

/// Per-run switches for [`run`].
struct RunOptions {
    keep_going: bool,
    json: bool,
    svg: Option<SvgOptions>,
}

/// One `--json` line.
#[derive(Serialize)]
struct JobReport<'a> {
    input: &'a Path,
    output: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    svg: Option<&'a Path>,
    diagnostics: &'a PipelineDiagnostics,
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Job(#[from] IoError),

    #[error("failed to serialize diagnostics: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Console(#[from] io::Error),
}

/// Whole CLI flow after argument parsing and logger setup.
///
/// Only failures to write to the console are returned as errors; every
/// other failure is reported on `console.err` and yields
/// [`Outcome::Failed`].
fn execute<O: Write, E: Write>(cli: &Cli, console: &mut Console<O, E>) -> io::Result<Outcome> {
    let config = match config_from_cli(cli) {
        Ok(c) => c,
        Err(msg) => {
            writeln!(console.err, "{msg}")?;
            return Ok(Outcome::Failed);
        }
    };
    log::debug!("config: {config:?}");

    let svg = if cli.svg {
        let options = SvgOptions {
            threshold: cli.svg_threshold,
            fill: cli.svg_fill.clone(),
        };
        if let Err(e) = options.validate() {
            writeln!(console.err, "{e}")?;
            return Ok(Outcome::Failed);
        }
        Some(options)
    } else {
        None
    };

    let plan = match plan(&cli.input_dir, &LogoCatalog::mardelux()) {
        Ok(plan) => plan,
        Err(e) => {
            writeln!(console.err, "{e}")?;
            writeln!(console.err, "{USAGE}")?;
            return Ok(Outcome::Failed);
        }
    };

    if plan.fallback {
        writeln!(
            console.err,
            "Warning: the three catalog logos were not all found; using the first {} PNGs by \
             file name. Point INPUT_DIR at the folder with the logo exports to get canonical names.",
            plan.jobs.len(),
        )?;
    }

    writeln!(console.progress(), "Input: {}", cli.input_dir.display())?;
    writeln!(console.progress(), "Output: {}", cli.output_dir.display())?;

    let options = RunOptions {
        keep_going: cli.keep_going,
        json: cli.json,
        svg,
    };
    match run(&plan, &cli.output_dir, &config, &options, console) {
        Ok(0) => {
            writeln!(console.progress(), "Done.")?;
            Ok(Outcome::Done)
        }
        Ok(n) => {
            writeln!(console.err, "Done with {n} failed file(s).")?;
            Ok(Outcome::Failed)
        }
        Err(RunError::Console(e)) => Err(e),
        Err(e) => {
            writeln!(console.err, "Error: {e}")?;
            Ok(Outcome::Failed)
        }
    }
}

/// Process every job in order.
///
/// Returns the number of skipped failures in `--keep-going` mode; without
/// it, the first failure aborts the run.
fn run<O: Write, E: Write>(
    plan: &Plan,
    output_dir: &Path,
    config: &MatteConfig,
    options: &RunOptions,
    console: &mut Console<O, E>,
) -> Result<usize, RunError> {
    let mut failures = 0;

    for job in &plan.jobs {
        match run_job(job, output_dir, config, options, console) {
            Ok(()) => {}
            Err(RunError::Job(e)) if options.keep_going => {
                writeln!(console.err, "  FAILED: {} ({e})", job.output_name)?;
                failures += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(failures)
}

fn run_job<O: Write, E: Write>(
    job: &Job,
    output_dir: &Path,
    config: &MatteConfig,
    options: &RunOptions,
    console: &mut Console<O, E>,
) -> Result<(), RunError> {
    let (written, diagnostics) = process_job_with_diagnostics(job, output_dir, config, &StdClock)?;
    writeln!(console.progress(), "  OK: {}", job.output_name)?;
    log::debug!(
        "{} -> {}\n{}",
        job.input.display(),
        written.path.display(),
        diagnostics.report(),
    );

    let svg_path = match &options.svg {
        Some(svg) => {
            let path = export_svg(&written.path, svg)?;
            writeln!(console.progress(), "  OK: {}", file_name(&path))?;
            Some(path)
        }
        None => None,
    };

    if options.json {
        let report = JobReport {
            input: &job.input,
            output: &written.path,
            svg: svg_path.as_deref(),
            diagnostics: &diagnostics,
        };
        writeln!(console.out, "{}", serde_json::to_string(&report)?)?;
    }
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}
