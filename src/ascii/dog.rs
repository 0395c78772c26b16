//! Difference-of-Gaussians edge enhancement, usable as the Sobel input.

use serde::{Deserialize, Serialize};

use super::blur::BlurMethod;
use super::grayscale::luminance8;
use super::raster::{Pixel, Raster};
use crate::error::Result;

/// Parameters of the difference-of-Gaussians filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DogParams {
    /// Standard deviation of the narrow blur.
    pub sigma: f64,
    /// The wide blur uses `sigma * sigma_scale`.
    pub sigma_scale: f64,
    /// Output is white where the difference exceeds `threshold * 255`.
    pub threshold: f64,
    /// Sharpening weight of the narrow blur over the wide one.
    pub tau: f64,
    pub method: BlurMethod,
}

impl Default for DogParams {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            sigma_scale: 4.0,
            threshold: 0.3,
            tau: 0.95,
            method: BlurMethod::Approximate,
        }
    }
}

/// Binary edge image: `(1 + tau) * L(narrow) - tau * L(wide)` thresholded to
/// black or white, then median filtered.
///
/// # Errors
/// `DegenerateKernel` when either blur sigma is not positive and finite.
pub fn difference_of_gaussians(raster: &Raster, params: &DogParams) -> Result<Raster> {
    let narrow = params.method.apply(raster, params.sigma)?;
    let wide = params
        .method
        .apply(raster, params.sigma * params.sigma_scale)?;
    let cutoff = params.threshold * 255.0;

    let binary: Vec<u8> = narrow
        .pixels()
        .iter()
        .zip(wide.pixels())
        .map(|(&n, &w)| {
            let diff = (1.0 + params.tau) * luminance8(n) - params.tau * luminance8(w);
            if diff > cutoff {
                255
            } else {
                0
            }
        })
        .collect();

    let filtered = median_filter(&binary, raster.width(), raster.height());
    Ok(Raster::from_fn(raster.width(), raster.height(), |x, y| {
        let v = filtered[y as usize * raster.width() as usize + x as usize];
        Pixel::from_rgb8(v, v, v)
    }))
}

/// 3×3 median over interior pixels of a gray plane. Border pixels are 0.
pub fn median_filter(plane: &[u8], width: u32, height: u32) -> Vec<u8> {
    let w = width as usize;
    let h = height as usize;
    let mut out = vec![0u8; w * h];
    if w < 3 || h < 3 {
        return out;
    }

    let mut window = [0u8; 9];
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let mut i = 0;
            for ny in y - 1..=y + 1 {
                for nx in x - 1..=x + 1 {
                    window[i] = plane[ny * w + nx];
                    i += 1;
                }
            }
            window.sort_unstable();
            out[y * w + x] = window[4];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_removes_salt() {
        let mut plane = vec![0u8; 25];
        plane[12] = 255;
        let out = median_filter(&plane, 5, 5);
        assert!(out.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_median_keeps_solid_region_and_zeroes_border() {
        let plane = vec![200u8; 16];
        let out = median_filter(&plane, 4, 4);
        assert_eq!(out[5], 200);
        assert_eq!(out[0], 0);
        assert_eq!(out[15], 0);
    }

    #[test]
    fn test_median_small_plane() {
        assert_eq!(median_filter(&[9, 9, 9, 9], 2, 2), vec![0; 4]);
    }

    #[test]
    fn test_dog_is_binary() {
        let r = Raster::from_fn(24, 24, |x, y| {
            let v = if (x / 6 + y / 6) % 2 == 0 { 230 } else { 20 };
            Pixel::from_rgb8(v, v, v)
        });
        let out = difference_of_gaussians(&r, &DogParams::default()).unwrap();
        assert_eq!(out.width(), 24);
        assert_eq!(out.height(), 24);
        for p in out.pixels() {
            assert!(p.r == 0 || p.r == 65535);
        }
        // A bright square interior stays white.
        assert_eq!(out.get(2, 2).unwrap().r, 65535);
    }

    #[test]
    fn test_dog_dark_image_is_black() {
        let r = Raster::filled(10, 10, Pixel::from_rgb8(30, 30, 30));
        let out = difference_of_gaussians(&r, &DogParams::default()).unwrap();
        assert!(out.pixels().iter().all(|p| p.r == 0));
    }

    #[test]
    fn test_dog_rejects_bad_sigma() {
        let r = Raster::filled(4, 4, Pixel::from_rgb8(0, 0, 0));
        let params = DogParams {
            sigma: -1.0,
            ..DogParams::default()
        };
        assert!(difference_of_gaussians(&r, &params).is_err());
    }
}
