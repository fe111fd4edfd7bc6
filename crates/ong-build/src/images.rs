//! Image optimization
//!
//! JPEGs are re-encoded at a fixed quality, PNGs with maximum compression.
//! Whichever of original and re-encoded bytes is smaller is written, so an
//! optimized file never grows.

use std::fs;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageFormat};

use crate::{file_name, files_with_extension, io_error, BuildError, BuildResult};

/// Default JPEG quality
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Size change of one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageStat {
    pub file: String,
    pub original: u64,
    pub optimized: u64,
}

impl ImageStat {
    pub fn savings(&self) -> u64 {
        self.original.saturating_sub(self.optimized)
    }

    /// Savings as a percentage of the original size
    pub fn percent(&self) -> f64 {
        if self.original == 0 {
            return 0.0;
        }
        self.savings() as f64 / self.original as f64 * 100.0
    }
}

/// Outcome of an optimization run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimizeReport {
    pub images: Vec<ImageStat>,
}

impl OptimizeReport {
    pub fn total_savings(&self) -> u64 {
        self.images.iter().map(ImageStat::savings).sum()
    }
}

/// JPEG/PNG optimizer
#[derive(Debug, Clone)]
pub struct ImageOptimizer {
    src: PathBuf,
    dist: PathBuf,
    jpeg_quality: u8,
}

impl ImageOptimizer {
    pub fn new(src: impl Into<PathBuf>, dist: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dist: dist.into(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// JPEG quality, clamped to 1..=100
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Optimize every top-level `*.jpg`, `*.jpeg` and `*.png` in the source
    pub fn optimize(&self) -> BuildResult<OptimizeReport> {
        tracing::info!("🖼️ Optimizing images in {}", self.src.display());
        fs::create_dir_all(&self.dist).map_err(io_error(&self.dist))?;

        let mut report = OptimizeReport::default();
        for path in files_with_extension(&self.src, &["jpg", "jpeg", "png"])? {
            let stat = self.optimize_file(&path)?;
            tracing::info!(
                "📊 {}: {} -> {} ({:.1}% smaller)",
                stat.file,
                format_bytes(stat.original),
                format_bytes(stat.optimized),
                stat.percent()
            );
            report.images.push(stat);
        }
        tracing::info!("💾 Total savings: {}", format_bytes(report.total_savings()));
        Ok(report)
    }

    fn optimize_file(&self, path: &Path) -> BuildResult<ImageStat> {
        let file = file_name(path);
        let original = fs::read(path).map_err(io_error(path))?;
        let format = match ImageFormat::from_path(path) {
            Ok(ImageFormat::Png) => ImageFormat::Png,
            _ => ImageFormat::Jpeg,
        };

        let encoded = self
            .reencode(&original, format)
            .map_err(|source| BuildError::Image {
                file: file.clone(),
                source,
            })?;
        let bytes = if encoded.len() < original.len() {
            &encoded
        } else {
            &original
        };

        let out = self.dist.join(&file);
        fs::write(&out, bytes).map_err(io_error(&out))?;
        Ok(ImageStat {
            file,
            original: original.len() as u64,
            optimized: bytes.len() as u64,
        })
    }

    fn reencode(&self, bytes: &[u8], format: ImageFormat) -> Result<Vec<u8>, image::ImageError> {
        let img = image::load_from_memory_with_format(bytes, format)?;
        let mut out = Vec::new();
        match format {
            ImageFormat::Png => {
                let encoder =
                    PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive);
                img.write_with_encoder(encoder)?;
            }
            _ => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
                let encoder = JpegEncoder::new_with_quality(&mut out, self.jpeg_quality);
                rgb.write_with_encoder(encoder)?;
            }
        }
        Ok(out)
    }
}

/// Human-readable size: `0 Bytes`, `512 Bytes`, `1.5 KB`, `2 MB`
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1_258_291), "1.2 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5 GB");
    }

    #[test]
    fn test_percent() {
        let stat = ImageStat {
            file: "a.png".into(),
            original: 200,
            optimized: 150,
        };
        assert_eq!(stat.savings(), 50);
        assert_eq!(stat.percent(), 25.0);
    }

    #[test]
    fn test_quality_clamped() {
        let optimizer = ImageOptimizer::new("a", "b").with_jpeg_quality(0);
        assert_eq!(optimizer.jpeg_quality, 1);
    }
}
