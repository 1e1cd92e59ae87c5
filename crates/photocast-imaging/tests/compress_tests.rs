//! Integration tests for the JPEG compressor on generated fixture images.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use photocast_core::{CompressionSpec, ImageTransformer, PhotocastError};
use photocast_imaging::{image_info, JpegCompressor};
use std::path::{Path, PathBuf};

/// Writes a gradient with some noise so JPEG has real work to do
fn fixture(dir: &Path, name: &str, width: u32, height: u32, format: ImageFormat) -> PathBuf {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let noise = ((x * 7919 + y * 104_729) % 61) as u8;
        Rgb([
            ((x * 255) / width.max(1)) as u8 ^ noise,
            ((y * 255) / height.max(1)) as u8,
            noise.wrapping_mul(4),
        ])
    });
    let path = dir.join(name);
    DynamicImage::ImageRgb8(img)
        .save_with_format(&path, format)
        .unwrap();
    path
}

/// Reads dimensions from the content, not the extension
fn dims(path: &Path) -> (u32, u32) {
    let info = image_info(path).unwrap();
    (info.width, info.height)
}

// =============================================================================
// Resize rules
// =============================================================================

#[test]
fn test_small_image_keeps_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "small.jpg", 640, 480, ImageFormat::Jpeg);

    let out = JpegCompressor::default()
        .compress(&path, &CompressionSpec::default())
        .unwrap();

    assert_eq!(out, path);
    assert_eq!(dims(&path), (640, 480));
}

#[test]
fn test_large_landscape_fits_default_box() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "wide.png", 2400, 1600, ImageFormat::Png);
    let before = std::fs::metadata(&path).unwrap().len();

    JpegCompressor::default()
        .compress(&path, &CompressionSpec::default())
        .unwrap();

    let (w, h) = dims(&path);
    assert_eq!(w, 1920);
    assert_eq!(h, 1280);
    assert_eq!(image_info(&path).unwrap().format.as_deref(), Some("jpeg"));
    assert!((2400.0 / 1600.0 - w as f64 / h as f64).abs() < 0.01);
    assert!(std::fs::metadata(&path).unwrap().len() < before);
}

#[test]
fn test_large_portrait_pins_height() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "tall.jpg", 900, 1500, ImageFormat::Jpeg);

    JpegCompressor::default()
        .compress(&path, &CompressionSpec::new(600, 85))
        .unwrap();

    let (w, h) = dims(&path);
    assert_eq!(h, 600);
    assert_eq!(w, 360);
}

#[test]
fn test_second_pass_is_noop_on_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "twice.jpg", 1200, 700, ImageFormat::Jpeg);
    let spec = CompressionSpec::new(1000, 90);
    let compressor = JpegCompressor::default();

    compressor.compress(&path, &spec).unwrap();
    let first = dims(&path);
    compressor.compress(&path, &spec).unwrap();

    assert_eq!(first, (1000, 583));
    assert_eq!(dims(&path), first);
}

// =============================================================================
// Orientation and format
// =============================================================================

#[test]
fn test_orientation_six_turns_landscape_upright() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "rotated.jpg", 400, 200, ImageFormat::Jpeg);

    JpegCompressor::default()
        .compress(&path, &CompressionSpec::default().with_orientation(Some(6)))
        .unwrap();

    assert_eq!(dims(&path), (200, 400));
}

#[test]
fn test_identity_orientation_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "upright.jpg", 400, 200, ImageFormat::Jpeg);

    JpegCompressor::default()
        .compress(&path, &CompressionSpec::default().with_orientation(Some(1)))
        .unwrap();

    assert_eq!(dims(&path), (400, 200));
}

#[test]
fn test_output_is_always_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    // extension lies about the content
    let path = fixture(dir.path(), "really-a-png.jpg", 300, 300, ImageFormat::Png);
    assert_eq!(image_info(&path).unwrap().format.as_deref(), Some("png"));

    JpegCompressor::default()
        .compress(&path, &CompressionSpec::default())
        .unwrap();

    let info = image_info(&path).unwrap();
    assert_eq!(info.format.as_deref(), Some("jpeg"));
    assert_eq!((info.width, info.height), (300, 300));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.jpg");

    let err = JpegCompressor::default()
        .compress(&missing, &CompressionSpec::default())
        .unwrap_err();

    assert!(matches!(err, PhotocastError::FileNotFound(p) if p == missing));
}

#[test]
fn test_corrupt_data_is_processing_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.jpg");
    std::fs::write(&path, b"definitely not an image").unwrap();

    let err = JpegCompressor::default()
        .compress(&path, &CompressionSpec::default())
        .unwrap_err();

    assert!(matches!(err, PhotocastError::ImageProcessingFailed(_)));
    // source left untouched
    assert_eq!(std::fs::read(&path).unwrap(), b"definitely not an image");
}
