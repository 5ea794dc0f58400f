//! Integration tests: discover logos on disk, process them, and inspect the written PNGs.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;

use image::{Rgba, RgbaImage};
use logomatte_export::SvgOptions;
use logomatte_io::{DiscoverError, IoError, LogoCatalog, export_svg, plan, process_job};
use logomatte_pipeline::{ERASED, MatteConfig};
use tempfile::TempDir;

const TEXT: &str = "image-12dcd7b3-841f-4ccc-9b73-f03bfef6074a.png";
const LOTUS: &str = "image-468a3e27-c9e0-438c-8e55-a8d5d0263cb2.png";
const FULL: &str = "image-a14242b4-331e-453c-9c4b-954dc9110a24.png";

const GOLD: Rgba<u8> = Rgba([212, 175, 55, 255]);

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 4x4 white field with a centered 2x2 gold square.
fn gold_square_on_white() -> RgbaImage {
    RgbaImage::from_fn(4, 4, |x, y| {
        if (1..3).contains(&x) && (1..3).contains(&y) {
            GOLD
        } else {
            Rgba([255, 255, 255, 255])
        }
    })
}

fn write_png(path: &Path, img: &RgbaImage) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    img.save(path).unwrap();
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn canonical_logos_in_nested_folders_get_canonical_names() {
    init_logging();
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let out_dir = output.path().join("public/logo");

    let img = gold_square_on_white();
    write_png(&input.path().join(format!("z/deep/9_{TEXT}")), &img);
    write_png(&input.path().join(format!("a/export_{LOTUS}")), &img);
    write_png(&input.path().join(FULL), &img);
    write_png(&input.path().join("unrelated.png"), &img);

    let plan = plan(input.path(), &LogoCatalog::mardelux()).unwrap();
    assert!(!plan.fallback);

    let names: Vec<_> = plan.jobs.iter().map(|j| j.output_name.as_str()).collect();
    assert_eq!(
        names,
        ["logo-texto.png", "logo-lotus.png", "logo-completo.png"]
    );

    for job in &plan.jobs {
        let written = process_job(job, &out_dir, &MatteConfig::default()).unwrap();
        assert_eq!(written.stats.background_erased, 12);
    }

    assert_eq!(
        file_names(&out_dir),
        ["logo-completo.png", "logo-lotus.png", "logo-texto.png"]
    );
}

#[test]
fn written_png_has_transparent_background_and_intact_gold() {
    init_logging();
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    write_png(&input.path().join("logo.png"), &gold_square_on_white());

    let plan = plan(input.path(), &LogoCatalog::mardelux()).unwrap();
    assert!(plan.fallback);
    assert_eq!(plan.jobs.len(), 1);
    assert_eq!(plan.jobs[0].output_name, "logo-1.png");

    let written = process_job(&plan.jobs[0], output.path(), &MatteConfig::default()).unwrap();
    assert_eq!(written.path, output.path().join("logo-1.png"));

    let out = image::open(&written.path).unwrap().to_rgba8();
    for (x, y, p) in out.enumerate_pixels() {
        if (1..3).contains(&x) && (1..3).contains(&y) {
            assert_eq!(*p, GOLD);
        } else {
            assert_eq!(*p, ERASED);
        }
    }
}

#[test]
fn fallback_takes_first_three_by_file_name() {
    init_logging();
    let input = TempDir::new().unwrap();
    let img = gold_square_on_white();
    for name in ["d.png", "b/c.png", "a.png", "e.png", "notes.txt"] {
        let path = input.path().join(name);
        if name.ends_with(".png") {
            write_png(&path, &img);
        } else {
            std::fs::write(&path, b"not an image").unwrap();
        }
    }
    // Only one of three canonical logos present.
    write_png(&input.path().join(TEXT), &img);

    let plan = plan(input.path(), &LogoCatalog::mardelux()).unwrap();
    assert!(plan.fallback);

    let inputs: Vec<_> = plan
        .jobs
        .iter()
        .map(|j| j.input.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(inputs, ["a.png", "c.png", "d.png"]);
}

#[test]
fn empty_directory_reports_no_png_files() {
    let input = TempDir::new().unwrap();
    std::fs::write(input.path().join("readme.md"), b"# logos").unwrap();

    let err = plan(input.path(), &LogoCatalog::mardelux()).unwrap_err();
    assert!(matches!(err, DiscoverError::NoPngFiles { .. }));
    assert!(err.to_string().contains("no PNG files"));
}

#[test]
fn missing_directory_reports_no_png_files() {
    let input = TempDir::new().unwrap();
    let missing = input.path().join("does-not-exist");
    let err = plan(&missing, &LogoCatalog::mardelux()).unwrap_err();
    assert!(matches!(err, DiscoverError::NoPngFiles { .. }));
}

#[test]
fn existing_output_is_overwritten() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_png(&input.path().join("logo.png"), &gold_square_on_white());
    std::fs::write(output.path().join("logo-1.png"), b"stale").unwrap();

    let plan = plan(input.path(), &LogoCatalog::mardelux()).unwrap();
    let written = process_job(&plan.jobs[0], output.path(), &MatteConfig::default()).unwrap();

    let bytes = std::fs::read(&written.path).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
}

#[test]
fn corrupt_png_is_a_pipeline_error() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    std::fs::write(input.path().join("broken.png"), b"definitely not png").unwrap();

    let plan = plan(input.path(), &LogoCatalog::mardelux()).unwrap();
    let err = process_job(&plan.jobs[0], output.path(), &MatteConfig::default()).unwrap_err();

    assert!(matches!(err, IoError::Pipeline { .. }));
    assert!(err.to_string().contains("broken.png"));
    assert!(!output.path().join("logo-1.png").exists());
}

#[test]
fn svg_is_written_next_to_the_matted_png() {
    init_logging();
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_png(&input.path().join(TEXT), &gold_square_on_white());
    write_png(&input.path().join(LOTUS), &gold_square_on_white());
    write_png(&input.path().join(FULL), &gold_square_on_white());

    let plan = plan(input.path(), &LogoCatalog::mardelux()).unwrap();
    let written = process_job(&plan.jobs[0], output.path(), &MatteConfig::default()).unwrap();
    let svg_path = export_svg(&written.path, &SvgOptions::default()).unwrap();

    assert_eq!(svg_path, output.path().join("logo-texto.svg"));
    let svg = std::fs::read_to_string(&svg_path).unwrap();
    assert!(svg.contains(r#"viewBox="0 0 4 4""#));
    assert!(svg.contains(r##"fill="#b76e79""##));
    assert_eq!(
        file_names(output.path()),
        ["logo-texto.png", "logo-texto.svg"]
    );
}

#[test]
fn svg_export_of_missing_png_is_a_read_error() {
    let output = TempDir::new().unwrap();
    let err = export_svg(&output.path().join("logo-lotus.png"), &SvgOptions::default()).unwrap_err();
    assert!(matches!(err, IoError::Read { .. }));
    assert!(!output.path().join("logo-lotus.svg").exists());
}

#[test]
fn svg_export_of_corrupt_png_is_an_export_error() {
    let output = TempDir::new().unwrap();
    let png = output.path().join("logo-1.png");
    std::fs::write(&png, b"not a png").unwrap();

    let err = export_svg(&png, &SvgOptions::default()).unwrap_err();
    assert!(matches!(err, IoError::Export { .. }));
    assert!(err.to_string().contains("logo-1.png"));
}
