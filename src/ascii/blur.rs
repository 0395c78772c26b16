//! Gaussian blur: an exact separable convolution and a box-blur approximation.
//!
//! Both variants keep the input dimensions. They differ at the image border:
//!
//! - [`blur_separable`] skips taps that fall outside the image and divides by
//!   the sum of the in-bounds weights.
//! - [`box_blur_approx`] clamps out-of-range samples to the nearest edge pixel.

use serde::{Deserialize, Serialize};

use super::raster::{Pixel, Raster};
use crate::error::{AsciifyError, Result};

/// Default number of box passes used to approximate a Gaussian.
pub const DEFAULT_BOX_PASSES: usize = 3;

/// Which blur implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlurMethod {
    /// Separable convolution with a sampled Gaussian kernel
    #[default]
    Exact,
    /// Three sliding-window box passes
    Approximate,
}

impl BlurMethod {
    /// Blur `raster` with standard deviation `sigma` using this method.
    pub fn apply(self, raster: &Raster, sigma: f64) -> Result<Raster> {
        match self {
            BlurMethod::Exact => blur_separable(raster, sigma),
            BlurMethod::Approximate => box_blur_approx(raster, sigma, DEFAULT_BOX_PASSES),
        }
    }
}

/// A normalized, odd-length 1-D Gaussian kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Vec<f64>,
}

impl Kernel {
    /// Sample a Gaussian of standard deviation `sigma`.
    ///
    /// The length is `ceil(3 * sigma) * 2 + 1`; weights are normalized so
    /// they sum to 1.
    pub fn gaussian(sigma: f64) -> Result<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(AsciifyError::DegenerateKernel { sigma });
        }

        let radius = (sigma * 3.0).ceil() as usize;
        let size = radius * 2 + 1;
        let two_sigma_sq = 2.0 * sigma * sigma;

        let mut weights: Vec<f64> = (0..size)
            .map(|i| {
                let x = i as f64 - radius as f64;
                (-(x * x) / two_sigma_sq).exp()
            })
            .collect();

        let sum: f64 = weights.iter().sum();
        if !sum.is_finite() || sum <= 0.0 {
            return Err(AsciifyError::DegenerateKernel { sigma });
        }
        for w in &mut weights {
            *w /= sum;
        }

        Ok(Self { weights })
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Number of taps on either side of the center.
    pub fn radius(&self) -> usize {
        self.weights.len() / 2
    }
}

/// Convenience wrapper for [`Kernel::gaussian`].
pub fn kernel(sigma: f64) -> Result<Kernel> {
    Kernel::gaussian(sigma)
}

type Accum = [f64; 4];

fn to_accum(p: &Pixel) -> Accum {
    [p.r as f64, p.g as f64, p.b as f64, p.a as f64]
}

fn from_accum(a: &Accum) -> Pixel {
    let ch = |v: f64| v.round().clamp(0.0, 65535.0) as u16;
    Pixel::new(ch(a[0]), ch(a[1]), ch(a[2]), ch(a[3]))
}

fn finish(raster: &Raster, plane: &[Accum]) -> Raster {
    let pixels = plane.iter().map(from_accum).collect();
    // Same length as the input raster by construction.
    Raster::from_pixels(raster.width(), raster.height(), pixels).unwrap_or_else(|| raster.clone())
}

/// Blur with a separable Gaussian: rows first, then columns.
///
/// Only in-bounds taps contribute; each output is divided by the sum of the
/// weights that were used, so a flat image stays flat.
pub fn blur_separable(raster: &Raster, sigma: f64) -> Result<Raster> {
    let kernel = Kernel::gaussian(sigma)?;
    if raster.is_empty() {
        return Ok(raster.clone());
    }

    let w = raster.width() as usize;
    let h = raster.height() as usize;
    let radius = kernel.radius() as isize;
    let weights = kernel.weights();
    let src: Vec<Accum> = raster.pixels().iter().map(to_accum).collect();

    let convolve = |input: &[Accum],
                    output: &mut [Accum],
                    len: usize,
                    stride: usize,
                    count: usize,
                    step: usize| {
        for line in 0..count {
            let base = line * step;
            for i in 0..len {
                let mut sum = [0.0; 4];
                let mut weight_sum = 0.0;
                for k in -radius..=radius {
                    let j = i as isize + k;
                    if j < 0 || j >= len as isize {
                        continue;
                    }
                    let weight = weights[(k + radius) as usize];
                    let sample = &input[base + j as usize * stride];
                    for c in 0..4 {
                        sum[c] += sample[c] * weight;
                    }
                    weight_sum += weight;
                }
                let out = &mut output[base + i * stride];
                for c in 0..4 {
                    out[c] = sum[c] / weight_sum;
                }
            }
        }
    };

    let mut horizontal = vec![[0.0; 4]; src.len()];
    convolve(&src, &mut horizontal, w, 1, h, w);

    let mut vertical = vec![[0.0; 4]; src.len()];
    convolve(&horizontal, &mut vertical, h, w, w, 1);

    Ok(finish(raster, &vertical))
}

/// Box widths whose successive application approximates a Gaussian of
/// standard deviation `sigma`.
///
/// The ideal width `w = sqrt(12σ²/n + 1)` is stepped down by one when its
/// integer part is even, but stays fractional. The first
/// `m = trunc((12σ² - n·w² - 4n·w - 3n) / (-4w - 4))` passes use `trunc(w)`
/// and the rest `trunc(w) + 2`.
pub fn box_sizes(sigma: f64, passes: usize) -> Result<Vec<usize>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(AsciifyError::DegenerateKernel { sigma });
    }
    if passes == 0 {
        return Ok(Vec::new());
    }

    let n = passes as f64;
    let variance12 = 12.0 * sigma * sigma;
    let mut ideal = (variance12 / n + 1.0).sqrt();
    if (ideal.trunc() as i64) % 2 == 0 {
        ideal -= 1.0;
    }

    let m = ((variance12 - n * ideal * ideal - 4.0 * n * ideal - 3.0 * n) / (-4.0 * ideal - 4.0))
        .trunc() as i64;
    let wl = (ideal.trunc() as usize).max(1);
    let wu = wl + 2;

    Ok((0..passes)
        .map(|i| if (i as i64) < m { wl } else { wu })
        .collect())
}

/// One sliding-window mean over `len` samples spaced `stride` apart,
/// with out-of-range samples clamped to the first/last sample.
fn box_line(
    input: &[Accum],
    output: &mut [Accum],
    base: usize,
    len: usize,
    stride: usize,
    radius: usize,
) {
    let at = |j: isize| -> Accum {
        let clamped = j.clamp(0, len as isize - 1) as usize;
        input[base + clamped * stride]
    };
    let r = radius as isize;
    let norm = 1.0 / (2 * radius + 1) as f64;

    let mut sum = [0.0; 4];
    for j in -r..=r {
        let s = at(j);
        for c in 0..4 {
            sum[c] += s[c];
        }
    }

    for i in 0..len as isize {
        let out = &mut output[base + i as usize * stride];
        for c in 0..4 {
            out[c] = sum[c] * norm;
        }
        let entering = at(i + r + 1);
        let leaving = at(i - r);
        for c in 0..4 {
            sum[c] += entering[c] - leaving[c];
        }
    }
}

/// Approximate a Gaussian blur with `passes` box blurs.
///
/// Each pass runs a horizontal then a vertical moving average whose running
/// sum is updated incrementally (add the entering sample, subtract the
/// leaving one).
pub fn box_blur_approx(raster: &Raster, sigma: f64, passes: usize) -> Result<Raster> {
    let sizes = box_sizes(sigma, passes)?;
    log::debug!("box blur sigma={} sizes={:?}", sigma, sizes);
    if raster.is_empty() {
        return Ok(raster.clone());
    }

    let w = raster.width() as usize;
    let h = raster.height() as usize;
    let mut current: Vec<Accum> = raster.pixels().iter().map(to_accum).collect();
    let mut scratch = vec![[0.0; 4]; current.len()];

    for size in sizes {
        let radius = (size - 1) / 2;
        for y in 0..h {
            box_line(&current, &mut scratch, y * w, w, 1, radius);
        }
        for x in 0..w {
            box_line(&scratch, &mut current, x, h, w, radius);
        }
    }

    Ok(finish(raster, &current))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: u32, h: u32) -> Raster {
        Raster::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 {
                Pixel::from_rgb8(255, 255, 255)
            } else {
                Pixel::from_rgb8(0, 0, 0)
            }
        })
    }

    #[test]
    fn test_kernel_length_sigma_one() {
        assert_eq!(kernel(1.0).unwrap().len(), 7);
    }

    #[test]
    fn test_kernel_length_fractional_sigma() {
        // ceil(1.5 * 3) = 5 -> 11 taps
        assert_eq!(kernel(1.5).unwrap().len(), 11);
    }

    #[test]
    fn test_kernel_sums_to_one() {
        for sigma in [0.1, 0.5, 1.0, 2.5, 6.0, 13.7] {
            let sum: f64 = kernel(sigma).unwrap().weights().iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "sigma {sigma} sums to {sum}");
        }
    }

    #[test]
    fn test_kernel_is_symmetric_and_peaked() {
        let k = kernel(2.0).unwrap();
        let w = k.weights();
        for i in 0..w.len() {
            assert!((w[i] - w[w.len() - 1 - i]).abs() < 1e-15);
        }
        assert!(w.iter().all(|&v| v <= w[k.radius()]));
    }

    #[test]
    fn test_kernel_rejects_degenerate_sigma() {
        for sigma in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                kernel(sigma),
                Err(AsciifyError::DegenerateKernel { .. })
            ));
        }
    }

    #[test]
    fn test_box_sizes_sigma_one() {
        assert_eq!(box_sizes(1.0, 3).unwrap(), vec![1, 3, 3]);
    }

    #[test]
    fn test_box_sizes_default_bloom_sigma() {
        assert_eq!(box_sizes(6.0, 3).unwrap(), vec![11, 13, 13]);
    }

    #[test]
    fn test_box_sizes_even_ideal_width() {
        // sqrt(17) = 4.12 has an even integer part, so the width steps down to 3.12
        assert_eq!(box_sizes(2.0, 3).unwrap(), vec![3, 5, 5]);
    }

    #[test]
    fn test_single_box_pass_on_ramp() {
        // sqrt(3 + 1) = 2 is even, stepped down to 1; m = trunc(0.625) = 0
        assert_eq!(box_sizes(0.5, 1).unwrap(), vec![3]);

        let ramp = Raster::from_fn(5, 1, |x, _| {
            let v = (x * 30) as u8;
            Pixel::from_rgb8(v, v, v)
        });
        let out = box_blur_approx(&ramp, 0.5, 1).unwrap();
        let reds: Vec<u8> = out.pixels().iter().map(|p| p.rgb8().r).collect();
        // Window of 3 with the ends clamped: (0+0+30)/3, (0+30+60)/3, ...
        assert_eq!(reds, vec![10, 30, 60, 90, 110]);
    }

    #[test]
    fn test_box_sizes_are_odd_and_sorted() {
        for sigma in [0.5, 1.0, 2.0, 6.0, 10.0] {
            let sizes = box_sizes(sigma, 3).unwrap();
            assert_eq!(sizes.len(), 3);
            assert!(sizes.iter().all(|s| s % 2 == 1));
            assert!(sizes.windows(2).all(|p| p[0] <= p[1]));
        }
    }

    #[test]
    fn test_box_sizes_rejects_degenerate_sigma() {
        assert!(box_sizes(0.0, 3).is_err());
    }

    #[test]
    fn test_blurs_preserve_dimensions() {
        let r = checker(13, 7);
        let exact = blur_separable(&r, 2.0).unwrap();
        let approx = box_blur_approx(&r, 2.0, 3).unwrap();
        assert_eq!((exact.width(), exact.height()), (13, 7));
        assert_eq!((approx.width(), approx.height()), (13, 7));
    }

    #[test]
    fn test_blurs_keep_flat_image_flat() {
        let flat = Raster::filled(9, 5, Pixel::from_rgb8(100, 150, 200));
        assert_eq!(blur_separable(&flat, 1.5).unwrap(), flat);
        assert_eq!(box_blur_approx(&flat, 1.5, 3).unwrap(), flat);
    }

    #[test]
    fn test_blur_smooths_checkerboard() {
        let r = checker(16, 16);
        let blurred = blur_separable(&r, 2.0).unwrap();
        let center = blurred.get(8, 8).unwrap();
        let mid = 65535.0 / 2.0;
        assert!((center.r as f64 - mid).abs() < 65535.0 * 0.1);
    }

    #[test]
    fn test_box_blur_handles_radius_larger_than_image() {
        let r = checker(3, 2);
        let blurred = box_blur_approx(&r, 10.0, 3).unwrap();
        assert_eq!((blurred.width(), blurred.height()), (3, 2));
    }

    #[test]
    fn test_blur_empty_raster() {
        let r = Raster::filled(0, 0, Pixel::default());
        assert!(blur_separable(&r, 1.0).unwrap().is_empty());
        assert!(box_blur_approx(&r, 1.0, 3).unwrap().is_empty());
    }

    #[test]
    fn test_blur_method_dispatch() {
        let r = checker(8, 8);
        assert_eq!(
            BlurMethod::Exact.apply(&r, 1.0).unwrap(),
            blur_separable(&r, 1.0).unwrap()
        );
        assert_eq!(
            BlurMethod::Approximate.apply(&r, 1.0).unwrap(),
            box_blur_approx(&r, 1.0, DEFAULT_BOX_PASSES).unwrap()
        );
    }
}
