//! Monochrome color ramps generated from a single base color.

use serde::{Deserialize, Serialize};

use super::color::Rgb;
use super::mapping::ramp_index;
use crate::error::{AsciifyError, Result};

/// Default number of palette shades.
pub const DEFAULT_SHADES: usize = 8;

/// How shades are derived from the base color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteKind {
    /// Black to base color, channels scaled linearly.
    #[default]
    Linear,
    /// HSV ramp with a slight hue swing and saturation lift in the midtones.
    Spiced,
}

/// Ordered colors, darkest first. The last entry is the base color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Build a palette of `shades` colors.
    ///
    /// # Errors
    /// `InvalidPaletteSize` when `shades < 2`.
    pub fn generate(kind: PaletteKind, base: Rgb, shades: usize) -> Result<Self> {
        match kind {
            PaletteKind::Linear => Self::linear(base, shades),
            PaletteKind::Spiced => Self::spiced(base, shades),
        }
    }

    pub fn linear(base: Rgb, shades: usize) -> Result<Self> {
        check_shades(shades)?;
        let last = (shades - 1) as f64;
        let colors = (0..shades)
            .map(|i| {
                let factor = i as f64 / last;
                Rgb::new(
                    scale_channel(base.r, factor),
                    scale_channel(base.g, factor),
                    scale_channel(base.b, factor),
                )
            })
            .collect();
        Ok(Self { colors })
    }

    pub fn spiced(base: Rgb, shades: usize) -> Result<Self> {
        check_shades(shades)?;
        let (h, s, v) = rgb_to_hsv(base);
        let last = (shades - 1) as f64;
        let colors = (0..shades)
            .map(|i| {
                let factor = i as f64 / last;
                let hue = h + (factor * std::f64::consts::PI).sin() * 10.0;
                let sat = (s * (0.8 + 0.2 * factor)).clamp(0.0, 1.0);
                hsv_to_rgb(hue, sat, v * factor)
            })
            .collect();
        Ok(Self { colors })
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Shade for a brightness normalized to `[0, 1]`.
    pub fn lookup(&self, norm: f64) -> Rgb {
        self.colors[ramp_index(norm, self.colors.len())]
    }
}

fn check_shades(shades: usize) -> Result<()> {
    if shades < 2 {
        return Err(AsciifyError::InvalidPaletteSize(shades));
    }
    Ok(())
}

#[inline]
fn scale_channel(c: u8, factor: f64) -> u8 {
    (c as f64 * factor).clamp(0.0, 255.0) as u8
}

/// RGB to `(hue in degrees [0, 360), saturation [0, 1], value [0, 1])`.
pub fn rgb_to_hsv(c: Rgb) -> (f64, f64, f64) {
    let r = c.r as f64 / 255.0;
    let g = c.g as f64 / 255.0;
    let b = c.b as f64 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let sat = if max == 0.0 { 0.0 } else { delta / max };
    (hue, sat, max)
}

/// HSV back to RGB. Hue wraps around 360°; channels are rounded.
pub fn hsv_to_rgb(hue: f64, sat: f64, value: f64) -> Rgb {
    let h = hue.rem_euclid(360.0);
    let s = sat.clamp(0.0, 1.0);
    let v = value.clamp(0.0, 1.0);

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to8 = |ch: f64| ((ch + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(to8(r), to8(g), to8(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Rgb = Rgb::new(0xF8, 0xCA, 0xAE);

    #[test]
    fn test_linear_endpoints() {
        let p = Palette::linear(BASE, 8).unwrap();
        assert_eq!(p.len(), 8);
        assert_eq!(p.colors()[0], Rgb::BLACK);
        assert_eq!(p.colors()[7], BASE);
    }

    #[test]
    fn test_linear_is_monotonic() {
        let p = Palette::linear(BASE, 16).unwrap();
        for pair in p.colors().windows(2) {
            assert!(pair[0].r <= pair[1].r);
            assert!(pair[0].g <= pair[1].g);
            assert!(pair[0].b <= pair[1].b);
        }
    }

    #[test]
    fn test_linear_truncates() {
        // 255 * 1/3 = 85.0, 100 * 1/3 = 33.3 -> 33
        let p = Palette::linear(Rgb::new(255, 100, 0), 4).unwrap();
        assert_eq!(p.colors()[1], Rgb::new(85, 33, 0));
    }

    #[test]
    fn test_spiced_endpoints() {
        let p = Palette::spiced(BASE, 8).unwrap();
        assert_eq!(p.colors()[0], Rgb::BLACK);
        let last = p.colors()[7];
        assert!((last.r as i32 - BASE.r as i32).abs() <= 2);
        assert!((last.g as i32 - BASE.g as i32).abs() <= 2);
        assert!((last.b as i32 - BASE.b as i32).abs() <= 2);
    }

    #[test]
    fn test_too_few_shades() {
        assert!(matches!(
            Palette::generate(PaletteKind::Linear, BASE, 1),
            Err(AsciifyError::InvalidPaletteSize(1))
        ));
        assert!(matches!(
            Palette::generate(PaletteKind::Spiced, BASE, 0),
            Err(AsciifyError::InvalidPaletteSize(0))
        ));
    }

    #[test]
    fn test_lookup_uses_floor_rule() {
        let p = Palette::linear(BASE, 8).unwrap();
        assert_eq!(p.lookup(0.0), p.colors()[0]);
        assert_eq!(p.lookup(1.0), p.colors()[7]);
        // 0.5 * 7 = 3.5 -> 3
        assert_eq!(p.lookup(0.5), p.colors()[3]);
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(rgb_to_hsv(Rgb::new(255, 0, 0)), (0.0, 1.0, 1.0));
        assert_eq!(rgb_to_hsv(Rgb::new(0, 255, 0)), (120.0, 1.0, 1.0));
        assert_eq!(rgb_to_hsv(Rgb::new(0, 0, 255)), (240.0, 1.0, 1.0));
        assert_eq!(rgb_to_hsv(Rgb::BLACK), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_hsv_round_trip_base() {
        let (h, s, v) = rgb_to_hsv(BASE);
        assert_eq!(hsv_to_rgb(h, s, v), BASE);
    }

    #[test]
    fn test_hue_wraps() {
        assert_eq!(hsv_to_rgb(360.0, 1.0, 1.0), Rgb::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(-120.0, 1.0, 1.0), Rgb::new(0, 0, 255));
    }
}
