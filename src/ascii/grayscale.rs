//! Luminance and perceptual brightness using Rec. 709 weights.

use super::raster::{Pixel, Raster};

/// Rec. 709 red weight.
pub const LUMA_R: f64 = 0.2126;
/// Rec. 709 green weight.
pub const LUMA_G: f64 = 0.7152;
/// Rec. 709 blue weight.
pub const LUMA_B: f64 = 0.0722;

/// Full-scale channel value on the 16-bit scale.
pub const CHANNEL_MAX: f64 = 65535.0;

/// Luminance of a pixel on the 16-bit scale, `[0, 65535]`. Alpha is ignored.
///
/// Y = 0.2126*R + 0.7152*G + 0.0722*B
#[inline]
pub fn luminance(p: Pixel) -> f64 {
    LUMA_R * p.r as f64 + LUMA_G * p.g as f64 + LUMA_B * p.b as f64
}

/// Luminance rescaled to the 8-bit range `[0, 255]` (not rounded).
#[inline]
pub fn luminance8(p: Pixel) -> f64 {
    luminance(p) / CHANNEL_MAX * 255.0
}

/// IEC 61966-2-1 sRGB decode of a `[0, 1]` value into linear light.
#[inline]
pub fn srgb_to_linear(v: f64) -> f64 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// CIE L* of a linear luminance in `[0, 1]`. Output is in `[0, 100]`.
///
/// Uses the exact rational constants 216/24389 and 24389/27 rather than the
/// rounded 0.008856 / 903.3.
#[inline]
pub fn lightness(linear: f64) -> f64 {
    if linear <= 216.0 / 24389.0 {
        linear * (24389.0 / 27.0)
    } else {
        116.0 * linear.cbrt() - 16.0
    }
}

/// Perceptual brightness (L*) of a pixel, in `[0, 100]`.
pub fn perceptual_brightness(p: Pixel) -> f64 {
    let r = srgb_to_linear(p.r as f64 / CHANNEL_MAX);
    let g = srgb_to_linear(p.g as f64 / CHANNEL_MAX);
    let b = srgb_to_linear(p.b as f64 / CHANNEL_MAX);
    lightness(LUMA_R * r + LUMA_G * g + LUMA_B * b)
}

/// Compute the 8-bit-scale luminance plane of a raster, one value per pixel,
/// row-major. Values are kept fractional for the Sobel stage.
pub fn luminance_plane(raster: &Raster) -> Vec<f64> {
    raster.pixels().iter().map(|&p| luminance8(p)).collect()
}

/// Convert a raster to 8-bit grayscale (truncated luminance).
pub fn to_grayscale(raster: &Raster) -> Vec<u8> {
    raster
        .pixels()
        .iter()
        .map(|&p| luminance8(p).clamp(0.0, 255.0) as u8)
        .collect()
}
