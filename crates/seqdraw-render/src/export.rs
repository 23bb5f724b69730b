//! Raster export of rendered diagrams.
//!
//! The GPU renderer produces a [`RasterImage`]; this module turns it into a
//! PNG or JPEG file, optionally keying the canvas background out to
//! transparency (PNG only).

use image::{DynamicImage, ImageFormat, RgbaImage};
use seqdraw_core::theme::ThemeColor;
use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// Per-channel distance from the background color still treated as background.
pub const CHROMA_KEY_TOLERANCE: u8 = 10;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: the rendered surface is empty")]
    EmptySurface,
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// RGBA pixels read back from the renderer, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RasterImage {
    pub fn new(rgba: Vec<u8>, width: u32, height: u32) -> Self {
        Self { rgba, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.rgba.is_empty()
    }

    /// Make every pixel within `tolerance` of `background` fully transparent.
    pub fn chroma_key(&mut self, background: ThemeColor, tolerance: u8) {
        for px in self.rgba.chunks_exact_mut(4) {
            let color = ThemeColor { r: px[0], g: px[1], b: px[2], a: px[3] };
            if color.is_near(background, tolerance) {
                px[3] = 0;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    /// Infer the format from a file extension (`png`, `jpg`, `jpeg`).
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            other => Err(ExportError::UnsupportedFormat(if other.is_empty() {
                path.display().to_string()
            } else {
                other.to_string()
            })),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    pub fn supports_transparency(self) -> bool {
        self == ExportFormat::Png
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Png => f.write_str("PNG"),
            ExportFormat::Jpeg => f.write_str("JPEG"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Key out the canvas background. Ignored for JPEG.
    pub transparent: bool,
    /// Canvas background color used for keying.
    pub background: ThemeColor,
}

/// Encode an image in memory.
pub fn encode(image: &RasterImage, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
    if image.is_empty() {
        return Err(ExportError::EmptySurface);
    }
    let mut image = image.clone();
    if options.transparent {
        if options.format.supports_transparency() {
            image.chroma_key(options.background, CHROMA_KEY_TOLERANCE);
        } else {
            log::warn!("{} has no alpha channel, exporting opaque", options.format);
        }
    }

    let buffer = RgbaImage::from_raw(image.width, image.height, image.rgba)
        .ok_or_else(|| ExportError::Encode("pixel buffer does not match image size".to_string()))?;
    let dynamic = DynamicImage::ImageRgba8(buffer);

    let mut bytes = Cursor::new(Vec::new());
    let result = match options.format {
        ExportFormat::Png => dynamic.write_to(&mut bytes, ImageFormat::Png),
        ExportFormat::Jpeg => DynamicImage::ImageRgb8(dynamic.to_rgb8()).write_to(&mut bytes, ImageFormat::Jpeg),
    };
    result.map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(bytes.into_inner())
}

/// Encode and write an image. Nothing is written when encoding fails.
pub fn export_raster(image: &RasterImage, path: &Path, options: &ExportOptions) -> Result<(), ExportError> {
    let bytes = encode(image, options)?;
    fs::write(path, bytes).map_err(|e| ExportError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
    log::info!("Exported {}x{} {} to {}", image.width, image.height, options.format, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const WHITE: ThemeColor = ThemeColor::rgb(255, 255, 255);

    /// 2x1 image: near-white pixel, then a black one.
    fn sample() -> RasterImage {
        RasterImage::new(vec![250, 252, 255, 255, 0, 0, 0, 255], 2, 1)
    }

    fn options(format: ExportFormat, transparent: bool) -> ExportOptions {
        ExportOptions {
            format,
            transparent,
            background: WHITE,
        }
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("a.png")).unwrap(), ExportFormat::Png);
        assert_eq!(ExportFormat::from_path(Path::new("a.JPG")).unwrap(), ExportFormat::Jpeg);
        assert_eq!(ExportFormat::from_path(Path::new("a.jpeg")).unwrap(), ExportFormat::Jpeg);
        assert!(matches!(
            ExportFormat::from_path(Path::new("a.gif")),
            Err(ExportError::UnsupportedFormat(ext)) if ext == "gif"
        ));
        assert!(ExportFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_chroma_key_within_tolerance() {
        let mut image = sample();
        image.chroma_key(WHITE, CHROMA_KEY_TOLERANCE);
        assert_eq!(image.rgba[3], 0);
        assert_eq!(image.rgba[7], 255);
    }

    #[test]
    fn test_png_transparency_round_trip() {
        let bytes = encode(&sample(), &options(ExportFormat::Png, true)).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.get_pixel(0, 0)[3], 0);
        assert_eq!(decoded.get_pixel(1, 0)[3], 255);
    }

    #[test]
    fn test_png_opaque_by_default() {
        let bytes = encode(&sample(), &options(ExportFormat::Png, false)).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(0, 0)[3], 255);
    }

    #[test]
    fn test_jpeg_ignores_transparency() {
        let bytes = encode(&sample(), &options(ExportFormat::Jpeg, true)).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_empty_surface_rejected() {
        let empty = RasterImage::new(Vec::new(), 0, 0);
        assert!(matches!(
            encode(&empty, &options(ExportFormat::Png, false)),
            Err(ExportError::EmptySurface)
        ));
    }

    #[test]
    fn test_mismatched_buffer_rejected() {
        let bad = RasterImage::new(vec![0; 4], 2, 2);
        assert!(matches!(
            encode(&bad, &options(ExportFormat::Png, false)),
            Err(ExportError::Encode(_))
        ));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.png");
        export_raster(&sample(), &path, &options(ExportFormat::Png, false)).unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_failed_write_reports_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        assert!(matches!(
            export_raster(&sample(), &path, &options(ExportFormat::Png, false)),
            Err(ExportError::Io(_))
        ));
    }
}
