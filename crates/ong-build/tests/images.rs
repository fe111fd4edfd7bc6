//! Image optimizer tests with generated images

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use ong_build::{BuildError, ImageOptimizer};
use tempfile::TempDir;

fn save(img: image::DynamicImage, path: &Path, format: ImageFormat) {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    fs::write(path, bytes).unwrap();
}

fn gradient() -> RgbImage {
    RgbImage::from_fn(64, 64, |x, y| Rgb([(x * 4) as u8, (y * 4) as u8, 128]))
}

// ============================================================================
// OPTIMIZATION
// ============================================================================

#[test]
fn test_optimized_images_never_grow() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("img");
    let dist = dir.path().join("out");
    fs::create_dir_all(&src).unwrap();

    save(gradient().into(), &src.join("foto.jpg"), ImageFormat::Jpeg);
    save(
        RgbaImage::from_pixel(32, 32, Rgba([10, 200, 30, 255])).into(),
        &src.join("icone.PNG"),
        ImageFormat::Png,
    );
    fs::write(src.join("leia-me.txt"), "ignorado").unwrap();

    let report = ImageOptimizer::new(&src, &dist)
        .with_jpeg_quality(60)
        .optimize()
        .unwrap();

    assert_eq!(report.images.len(), 2);
    for stat in &report.images {
        assert!(stat.optimized <= stat.original, "{} grew", stat.file);
        let written = fs::metadata(dist.join(&stat.file)).unwrap().len();
        assert_eq!(written, stat.optimized);
    }
    assert!(!dist.join("leia-me.txt").exists());

    let png = image::open(dist.join("icone.PNG")).unwrap();
    assert_eq!(png.width(), 32);
}

#[test]
fn test_empty_directory() {
    let dir = TempDir::new().unwrap();
    let report = ImageOptimizer::new(dir.path(), dir.path().join("out"))
        .optimize()
        .unwrap();
    assert!(report.images.is_empty());
    assert_eq!(report.total_savings(), 0);
}

// ============================================================================
// FAILURES
// ============================================================================

#[test]
fn test_corrupt_image_is_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("quebrada.png"), b"definitely not a png").unwrap();

    let err = ImageOptimizer::new(dir.path(), dir.path().join("out"))
        .optimize()
        .unwrap_err();
    assert!(matches!(err, BuildError::Image { ref file, .. } if file == "quebrada.png"));
}
