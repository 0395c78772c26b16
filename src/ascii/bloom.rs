//! Light bloom, color burn and tint post-processing.

use serde::{Deserialize, Serialize};

use super::blur::BlurMethod;
use super::color::Rgb;
use super::grayscale::luminance8;
use super::raster::{Pixel, Raster};
use crate::error::Result;

const SCALE_8: f64 = 257.0;

/// Bloom parameters. `threshold` is on the 8-bit luminance scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomSettings {
    pub enabled: bool,
    pub sigma: f64,
    pub threshold: u8,
    pub intensity: f64,
    pub method: BlurMethod,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            sigma: 6.0,
            threshold: 225,
            intensity: 6.0,
            method: BlurMethod::Exact,
        }
    }
}

impl BloomSettings {
    /// Apply bloom with these settings, ignoring `enabled`.
    pub fn apply(&self, raster: &Raster) -> Result<Raster> {
        bloom(
            raster,
            self.sigma,
            self.threshold as f64 / 255.0,
            self.intensity,
            self.method,
        )
    }
}

/// Smooth ramp from 0 at `thresh` to 1 at 255.
///
/// A threshold of 255 or more degenerates to a hard step.
pub fn soft_threshold(value: f64, thresh: f64) -> f64 {
    if value < thresh {
        0.0
    } else if thresh >= 255.0 {
        1.0
    } else {
        ((value - thresh) / (255.0 - thresh)).min(1.0)
    }
}

/// Keep only the bright parts of `raster`, each pixel scaled by its soft
/// threshold weight. `thresh` is a fraction in `[0, 1]`. Alpha is preserved.
pub fn extract_highlights(raster: &Raster, thresh: f64) -> Raster {
    let cutoff = thresh * 255.0;
    raster.map(|p| {
        let weight = soft_threshold(luminance8(*p), cutoff);
        let scale = |c: u16| (c as f64 * weight) as u16;
        Pixel::new(scale(p.r), scale(p.g), scale(p.b), p.a)
    })
}

/// Additive-screen merge of a blurred highlight layer onto `base`.
///
/// Per channel on the 8-bit scale:
/// `base * (1 - glow/255 * intensity) + glow * intensity`, clamped.
pub fn merge(base: &Raster, glow: &Raster, intensity: f64) -> Raster {
    base.zip_map(glow, |b, g| {
        let mix = |bc: u16, gc: u16| {
            let b8 = bc as f64 / SCALE_8;
            let g8 = gc as f64 / SCALE_8;
            let out = b8 * (1.0 - g8 / 255.0 * intensity) + g8 * intensity;
            to_channel(out)
        };
        Pixel::new(mix(b.r, g.r), mix(b.g, g.g), mix(b.b, g.b), b.a)
    })
}

/// Highlight extraction, blur, merge.
///
/// # Errors
/// `DegenerateKernel` when `sigma` is not a positive finite number.
pub fn bloom(
    raster: &Raster,
    sigma: f64,
    thresh: f64,
    intensity: f64,
    method: BlurMethod,
) -> Result<Raster> {
    let highlights = extract_highlights(raster, thresh);
    let glow = method.apply(&highlights, sigma)?;
    Ok(merge(raster, &glow, intensity))
}

/// Multiply every color channel by `factor`, saturating. Alpha is preserved.
pub fn color_burn(raster: &Raster, factor: f64) -> Raster {
    let burn = |c: u16| (c as f64 * factor).clamp(0.0, 65535.0) as u16;
    raster.map(|p| Pixel::new(burn(p.r), burn(p.g), burn(p.b), p.a))
}

/// Multiply every channel by `color / 255`.
pub fn tint(raster: &Raster, color: Rgb) -> Raster {
    let apply = |c: u16, t: u8| (c as f64 * t as f64 / 255.0).round() as u16;
    raster.map(|p| {
        Pixel::new(
            apply(p.r, color.r),
            apply(p.g, color.g),
            apply(p.b, color.b),
            p.a,
        )
    })
}

/// 8-bit-scale float back to a 16-bit channel.
fn to_channel(v8: f64) -> u16 {
    (v8.clamp(0.0, 255.0) * SCALE_8).round() as u16
}
