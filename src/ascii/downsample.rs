//! Downscaling a source raster to one pixel per character cell.

use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

use super::raster::{Pixel, Raster};
use crate::error::{AsciifyError, Result};

/// Resampling filter used to shrink the source to the cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DownscaleFilter {
    /// Lanczos windowed sinc (radius 3) from the `image` resampler.
    #[default]
    Lanczos3,
    /// Plain mean of the `scale × scale` pixels of each cell.
    BoxAverage,
}

/// Output dimensions of a downscale by `scale`: `floor(w/scale) × floor(h/scale)`.
pub fn downscaled_dimensions(width: u32, height: u32, scale: u32) -> (u32, u32) {
    if scale == 0 {
        return (0, 0);
    }
    (width / scale, height / scale)
}

/// Shrink `raster` by an integer `scale`.
///
/// # Arguments
/// * `raster` - Full-resolution source
/// * `scale` - Source pixels per output pixel along each axis
/// * `filter` - Resampling filter
///
/// # Returns
/// A raster of `floor(w/scale) × floor(h/scale)` pixels. When either
/// dimension would be zero the result is empty.
///
/// # Errors
/// `InvalidScale` when `scale` is zero.
pub fn downscale(raster: &Raster, scale: u32, filter: DownscaleFilter) -> Result<Raster> {
    if scale == 0 {
        return Err(AsciifyError::InvalidScale(scale));
    }

    let (out_w, out_h) = downscaled_dimensions(raster.width(), raster.height(), scale);
    if out_w == 0 || out_h == 0 {
        return Ok(Raster::filled(out_w, out_h, Pixel::default()));
    }
    if scale == 1 {
        return Ok(raster.clone());
    }

    let out = match filter {
        DownscaleFilter::Lanczos3 => {
            let src = raster.to_rgba16_image();
            let resized = imageops::resize(&src, out_w, out_h, FilterType::Lanczos3);
            Raster::from_rgba16_image(&resized)
        }
        DownscaleFilter::BoxAverage => box_average(raster, scale, out_w, out_h),
    };
    log::debug!(
        "downscaled {}x{} -> {}x{} ({:?})",
        raster.width(),
        raster.height(),
        out_w,
        out_h,
        filter
    );
    Ok(out)
}

/// Average every `scale × scale` cell. Pixels past the last whole cell are ignored.
fn box_average(raster: &Raster, scale: u32, out_w: u32, out_h: u32) -> Raster {
    let count = (scale as u64) * (scale as u64);
    Raster::from_fn(out_w, out_h, |cx, cy| {
        let mut sum = [0u64; 4];
        for py in cy * scale..(cy + 1) * scale {
            for px in cx * scale..(cx + 1) * scale {
                if let Some(p) = raster.get(px, py) {
                    sum[0] += p.r as u64;
                    sum[1] += p.g as u64;
                    sum[2] += p.b as u64;
                    sum[3] += p.a as u64;
                }
            }
        }
        Pixel::new(
            (sum[0] / count) as u16,
            (sum[1] / count) as u16,
            (sum[2] / count) as u16,
            (sum[3] / count) as u16,
        )
    })
}

/// Centered crop to the largest size that is a whole multiple of `scale`.
///
/// A zero `scale` returns the raster unchanged.
pub fn bound_to_scale_multiple(raster: &Raster, scale: u32) -> Raster {
    if scale == 0 {
        return raster.clone();
    }
    let new_w = raster.width() / scale * scale;
    let new_h = raster.height() / scale * scale;
    if new_w == raster.width() && new_h == raster.height() {
        return raster.clone();
    }

    let off_x = (raster.width() - new_w) / 2;
    let off_y = (raster.height() - new_h) / 2;
    log::debug!(
        "cropping {}x{} to {}x{} at ({}, {})",
        raster.width(),
        raster.height(),
        new_w,
        new_h,
        off_x,
        off_y
    );
    Raster::from_fn(new_w, new_h, |x, y| {
        raster.get(x + off_x, y + off_y).unwrap_or_default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_floor() {
        assert_eq!(downscaled_dimensions(100, 50, 8), (12, 6));
        assert_eq!(downscaled_dimensions(7, 7, 8), (0, 0));
        assert_eq!(downscaled_dimensions(7, 7, 0), (0, 0));
    }

    #[test]
    fn test_downscale_zero_scale_is_error() {
        let r = Raster::filled(8, 8, Pixel::default());
        assert!(matches!(
            downscale(&r, 0, DownscaleFilter::BoxAverage),
            Err(AsciifyError::InvalidScale(0))
        ));
    }

    #[test]
    fn test_downscale_output_size() {
        let r = Raster::filled(37, 21, Pixel::from_rgb8(9, 9, 9));
        for filter in [DownscaleFilter::Lanczos3, DownscaleFilter::BoxAverage] {
            let out = downscale(&r, 4, filter).unwrap();
            assert_eq!((out.width(), out.height()), (9, 5));
        }
    }

    #[test]
    fn test_downscale_smaller_than_scale_is_empty() {
        let r = Raster::filled(3, 20, Pixel::from_rgb8(9, 9, 9));
        let out = downscale(&r, 8, DownscaleFilter::Lanczos3).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_box_average_means() {
        // 2x2 cells: left cell black/white columns, right cell all white
        let r = Raster::from_fn(4, 2, |x, _| {
            if x == 0 {
                Pixel::from_rgb8(0, 0, 0)
            } else {
                Pixel::from_rgb8(255, 255, 255)
            }
        });
        let out = downscale(&r, 2, DownscaleFilter::BoxAverage).unwrap();
        assert_eq!(out.get(0, 0).unwrap().r, 65535 / 2);
        assert_eq!(out.get(1, 0).unwrap(), Pixel::from_rgb8(255, 255, 255));
    }

    #[test]
    fn test_flat_image_stays_flat() {
        let p = Pixel::from_rgb8(120, 60, 30);
        let r = Raster::filled(32, 32, p);
        let out = downscale(&r, 8, DownscaleFilter::Lanczos3).unwrap();
        for q in out.pixels() {
            assert!((q.r as i32 - p.r as i32).abs() <= 257);
            assert!((q.g as i32 - p.g as i32).abs() <= 257);
        }
    }

    #[test]
    fn test_crop_is_centered() {
        let r = Raster::from_fn(11, 9, |x, y| Pixel::from_rgb8(x as u8, y as u8, 0));
        let out = bound_to_scale_multiple(&r, 4);
        assert_eq!((out.width(), out.height()), (8, 8));
        // 11 - 8 = 3 -> offset 1; 9 - 8 = 1 -> offset 0
        assert_eq!(out.get(0, 0), Some(Pixel::from_rgb8(1, 0, 0)));
    }

    #[test]
    fn test_crop_noop_on_multiple() {
        let r = Raster::filled(16, 8, Pixel::from_rgb8(1, 2, 3));
        assert_eq!(bound_to_scale_multiple(&r, 8), r);
    }
}
