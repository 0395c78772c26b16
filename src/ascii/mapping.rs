//! Brightness to glyph and palette index mapping.

use super::grayscale::{luminance, perceptual_brightness, CHANNEL_MAX};
use super::raster::Pixel;

/// Index into a table of `len` entries for a brightness normalized to `[0, 1]`.
///
/// `floor(norm * (len - 1))`, clamped to the table. This one rule serves both
/// glyph ramps and palettes.
#[inline]
pub fn ramp_index(norm: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let idx = (norm.clamp(0.0, 1.0) * (len - 1) as f64).floor() as usize;
    idx.min(len - 1)
}

/// Luminance of a pixel normalized to `[0, 1]`, flipped when `invert` is set.
#[inline]
pub fn normalized_brightness(p: Pixel, invert: bool) -> f64 {
    let norm = luminance(p) / CHANNEL_MAX;
    if invert {
        1.0 - norm
    } else {
        norm
    }
}

/// Map a pixel to a glyph of `ramp` by its luminance.
///
/// Lower brightness maps to earlier (sparser) characters. With an empty ramp
/// every pixel maps to a space.
///
/// # Example
/// ```
/// use asciify::ascii::{glyph_for_brightness, Pixel, STANDARD_CHARSET};
///
/// assert_eq!(glyph_for_brightness(Pixel::from_rgb8(0, 0, 0), STANDARD_CHARSET, false), ' ');
/// assert_eq!(glyph_for_brightness(Pixel::from_rgb8(255, 255, 255), STANDARD_CHARSET, false), '@');
/// ```
pub fn glyph_for_brightness(p: Pixel, ramp: &[char], invert: bool) -> char {
    if ramp.is_empty() {
        return ' ';
    }
    ramp[ramp_index(normalized_brightness(p, invert), ramp.len())]
}

/// Map a pixel to a glyph of `ramp` by its perceptual brightness (L*).
pub fn glyph_for_perceptual_brightness(p: Pixel, ramp: &[char], invert: bool) -> char {
    if ramp.is_empty() {
        return ' ';
    }
    let norm = perceptual_brightness(p) / 100.0;
    let norm = if invert { 1.0 - norm } else { norm };
    ramp[ramp_index(norm, ramp.len())]
}

/// Map a row of pixels to glyphs.
pub fn map_to_chars(pixels: &[Pixel], ramp: &[char], invert: bool) -> Vec<char> {
    pixels
        .iter()
        .map(|&p| glyph_for_brightness(p, ramp, invert))
        .collect()
}
