//! Image analysis and character-grid composition.
//!
//! The pipeline turns a [`Raster`] into a [`Grid`] of styled cells:
//!
//! 1. **Edge detection** - Sobel on the full-resolution luminance (or a
//!    difference-of-Gaussians image), quantized to 0/45/90/135°
//! 2. **Shader mapping** - one dominant edge direction per cell block
//! 3. **Downscaling** - one pixel per cell
//! 4. **Post-processing** - tint and bloom in color mode
//! 5. **Composition** - edge glyph over brightness glyph, palette or true
//!    color, optional color burn
//!
//! Everything here is pure: no file I/O and no drawing. See
//! [`crate::render`] for turning a grid into output.
//!
//! # Character Sets
//!
//! Brightness glyphs come from a [`CharSet`]:
//! - `Standard` - 10-level ASCII density ramp `" .>+oP0?#@"`
//! - `Blocks` - Unicode shade blocks
//! - `Minimal` - 4-level clean look

mod bloom;
mod blur;
mod charset;
mod color;
mod composer;
mod dog;
mod downsample;
mod edges;
mod grayscale;
mod mapping;
mod palette;
mod raster;
mod shader;

pub use bloom::{
    bloom, color_burn, extract_highlights, merge, soft_threshold, tint, BloomSettings,
};
pub use blur::{
    blur_separable, box_blur_approx, box_sizes, kernel, BlurMethod, Kernel, DEFAULT_BOX_PASSES,
};
pub use charset::{CharSet, BLOCKS_CHARSET, MINIMAL_CHARSET, NO_EDGE, STANDARD_CHARSET};
pub use color::{burn_channel, Rgb};
pub use composer::{
    analyze, analyze_detailed, Analysis, AnalyzeConfig, BurnSettings, Cell, EdgeSource, Grid,
    DEFAULT_BACKGROUND, DEFAULT_BASE_COLOR, DEFAULT_SCALE,
};
pub use dog::{difference_of_gaussians, median_filter, DogParams};
pub use downsample::{bound_to_scale_multiple, downscale, downscaled_dimensions, DownscaleFilter};
pub use edges::{
    angle_heatmap, classify_gradient, AngleMap, EdgeAngle, EdgeDetector, EdgeMap, MagnitudeMap,
    MAGNITUDE_THRESHOLD,
};
pub use grayscale::{
    lightness, luminance, luminance8, luminance_plane, perceptual_brightness, srgb_to_linear,
    to_grayscale,
};
pub use mapping::{
    glyph_for_brightness, glyph_for_perceptual_brightness, map_to_chars, normalized_brightness,
    ramp_index,
};
pub use palette::{hsv_to_rgb, rgb_to_hsv, Palette, PaletteKind, DEFAULT_SHADES};
pub use raster::{Pixel, Raster, Rgba16Image};
pub use shader::{dominant_angle, shader_map, BlockSampling, ShaderMap};
