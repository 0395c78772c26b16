//! Raster decoding and encoding.

use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::ascii::Raster;
use crate::error::{AsciifyError, Result};

/// Decode an image file into a 16-bit raster. The format is guessed from the
/// file contents.
pub fn load(path: &Path) -> Result<Raster> {
    let img = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?;
    log::info!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    Ok(Raster::from_dynamic(&img))
}

/// Decode an in-memory PNG or JPEG.
pub fn decode(bytes: &[u8]) -> Result<Raster> {
    let img = image::load_from_memory(bytes)?;
    Ok(Raster::from_dynamic(&img))
}

/// Encode `raster` to `path`. The format follows the extension (`.png`,
/// `.jpg`/`.jpeg`).
pub fn save(raster: &Raster, path: &Path) -> Result<()> {
    save_rgba(&raster.to_rgba8_image(), path)
}

/// Encode an 8-bit RGBA image to `path`.
///
/// JPEG has no alpha channel, so the image is flattened to RGB first.
pub fn save_rgba(img: &RgbaImage, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .map_err(|_| AsciifyError::UnsupportedRasterFormat(path.display().to_string()))?;
    match format {
        ImageFormat::Png => img.save_with_format(path, format)?,
        ImageFormat::Jpeg => image::DynamicImage::ImageRgba8(img.clone())
            .to_rgb8()
            .save_with_format(path, format)?,
        other => {
            return Err(AsciifyError::UnsupportedRasterFormat(format!(
                "{:?} ({})",
                other,
                path.display()
            )))
        }
    }
    log::info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::Pixel;
    use tempfile::TempDir;

    fn gradient() -> Raster {
        Raster::from_fn(6, 4, |x, y| Pixel::from_rgb8(x as u8 * 40, y as u8 * 60, 128))
    }

    #[test]
    fn test_png_round_trip_keeps_8bit_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("g.png");
        save(&gradient(), &path).unwrap();
        let back = load(&path).unwrap();
        assert_eq!(back, gradient());
    }

    #[test]
    fn test_jpeg_saves() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("g.jpg");
        save(&gradient(), &path).unwrap();
        let back = load(&path).unwrap();
        assert_eq!((back.width(), back.height()), (6, 4));
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("g.xyz");
        assert!(matches!(
            save(&gradient(), &path),
            Err(AsciifyError::UnsupportedRasterFormat(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            load(Path::new("/nonexistent/input.png")),
            Err(AsciifyError::Io(_))
        ));
    }

    #[test]
    fn test_garbage_bytes_are_unsupported() {
        assert!(matches!(
            decode(b"definitely not an image"),
            Err(AsciifyError::UnsupportedRasterFormat(_))
        ));
    }
}
