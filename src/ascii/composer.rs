//! Grid composition: runs every analysis stage and emits styled cells.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::bloom::{tint, BloomSettings};
use super::charset::CharSet;
use super::color::Rgb;
use super::dog::{difference_of_gaussians, DogParams};
use super::downsample::{bound_to_scale_multiple, downscale, DownscaleFilter};
use super::edges::{EdgeDetector, EdgeMap};
use super::grayscale::perceptual_brightness;
use super::mapping::{normalized_brightness, ramp_index};
use super::palette::{Palette, PaletteKind, DEFAULT_SHADES};
use super::raster::Raster;
use super::shader::{shader_map, BlockSampling, ShaderMap};
use crate::error::{AsciifyError, Result};

/// Default source pixels per cell.
pub const DEFAULT_SCALE: u32 = 8;
/// Default monochrome base color, `#F8CAAE`.
pub const DEFAULT_BASE_COLOR: Rgb = Rgb::new(0xF8, 0xCA, 0xAE);
/// Default monochrome background, `#110301`.
pub const DEFAULT_BACKGROUND: Rgb = Rgb::new(0x11, 0x03, 0x01);

/// One output character and its display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub color: Rgb,
}

/// The composed character grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    background: Rgb,
}

impl Grid {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Suggested canvas background for rendering.
    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y as usize * self.width as usize + x as usize])
    }

    /// Rows of cells, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks(0) panics; an empty grid has no rows anyway.
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Glyphs only, one line per row.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{}", cell.glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Which raster feeds the Sobel stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeSource {
    /// Luminance of the source itself.
    #[default]
    Luminance,
    /// Binary difference-of-Gaussians image.
    Dog,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnSettings {
    pub enabled: bool,
    pub factor: f64,
}

impl Default for BurnSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            factor: 1.2,
        }
    }
}

/// Everything `analyze` needs. Deserializable from the `[analyze]` table of
/// the config file; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeConfig {
    pub scale: u32,
    /// Shader block size; `None` means the same as `scale`.
    pub block_size: Option<u32>,
    pub monochrome: bool,
    pub invert: bool,
    pub charset: CharSet,
    /// Index the ramp by L* instead of luminance.
    pub perceptual: bool,
    pub palette: PaletteKind,
    pub palette_shades: usize,
    pub base_color: Rgb,
    pub background_color: Rgb,
    /// Color-mode tint applied before bloom.
    pub tint: Option<Rgb>,
    pub bloom: BloomSettings,
    pub burn: BurnSettings,
    pub edge_source: EdgeSource,
    pub dog: DogParams,
    pub block_sampling: BlockSampling,
    pub downscale_filter: DownscaleFilter,
    /// Centered crop to a multiple of `scale` before analysis.
    pub crop: bool,
    /// Sobel worker threads; `None` uses the available parallelism.
    pub workers: Option<usize>,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            block_size: None,
            monochrome: true,
            invert: false,
            charset: CharSet::default(),
            perceptual: false,
            palette: PaletteKind::default(),
            palette_shades: DEFAULT_SHADES,
            base_color: DEFAULT_BASE_COLOR,
            background_color: DEFAULT_BACKGROUND,
            tint: None,
            bloom: BloomSettings::default(),
            burn: BurnSettings::default(),
            edge_source: EdgeSource::default(),
            dog: DogParams::default(),
            block_sampling: BlockSampling::default(),
            downscale_filter: DownscaleFilter::default(),
            crop: true,
            workers: None,
        }
    }
}

impl AnalyzeConfig {
    pub fn block_size(&self) -> u32 {
        self.block_size.unwrap_or(self.scale)
    }

    /// Reject configurations `analyze` cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.scale == 0 {
            return Err(AsciifyError::InvalidScale(self.scale));
        }
        if self.block_size() == 0 {
            return Err(AsciifyError::InvalidScale(0));
        }
        if self.palette_shades < 2 {
            return Err(AsciifyError::InvalidPaletteSize(self.palette_shades));
        }
        Ok(())
    }

    fn detector(&self) -> EdgeDetector {
        match self.workers {
            Some(n) => EdgeDetector::with_workers(n),
            None => EdgeDetector::new(),
        }
    }

    fn canvas_background(&self) -> Rgb {
        if self.monochrome {
            self.background_color
        } else if self.invert {
            Rgb::WHITE
        } else {
            Rgb::BLACK
        }
    }
}

/// Grid plus the intermediate edge products, for diagnostics.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub grid: Grid,
    pub edges: EdgeMap,
    pub shader: ShaderMap,
}

/// Convert `raster` into a styled character grid of
/// `floor(w/scale) × floor(h/scale)` cells.
pub fn analyze(raster: &Raster, config: &AnalyzeConfig) -> Result<Grid> {
    analyze_detailed(raster, config).map(|a| a.grid)
}

/// Like [`analyze`] but also returns the edge and shader maps.
pub fn analyze_detailed(raster: &Raster, config: &AnalyzeConfig) -> Result<Analysis> {
    config.validate()?;
    let scale = config.scale;

    let source = if config.crop {
        Cow::Owned(bound_to_scale_multiple(raster, scale))
    } else {
        Cow::Borrowed(raster)
    };

    let detector = config.detector();
    let edges = match config.edge_source {
        EdgeSource::Luminance => detector.detect(&source),
        EdgeSource::Dog => detector.detect(&difference_of_gaussians(&source, &config.dog)?),
    };
    let block = config.block_size();
    let shader = shader_map(&edges.angles, block, config.block_sampling);

    let mut small = downscale(&source, scale, config.downscale_filter)?;
    if !config.monochrome {
        if let Some(color) = config.tint {
            small = tint(&small, color);
        }
        if config.bloom.enabled {
            small = config.bloom.apply(&small)?;
        }
    }

    let palette = if config.monochrome {
        Some(Palette::generate(
            config.palette,
            config.base_color,
            config.palette_shades,
        )?)
    } else {
        None
    };
    let ramp = config.charset.chars();

    let mut cells = Vec::with_capacity(small.pixels().len());
    for y in 0..small.height() {
        for x in 0..small.width() {
            let pixel = small.get(x, y).unwrap_or_default();
            let norm = if config.perceptual {
                let l = perceptual_brightness(pixel) / 100.0;
                if config.invert {
                    1.0 - l
                } else {
                    l
                }
            } else {
                normalized_brightness(pixel, config.invert)
            };

            let glyph = cell_edge_glyph(&shader, x, y, scale, block)
                .unwrap_or_else(|| ramp[ramp_index(norm, ramp.len())]);
            let mut color = match &palette {
                Some(p) => p.lookup(norm),
                None => pixel.rgb8(),
            };
            if config.burn.enabled {
                color = color.burn(config.burn.factor);
            }
            cells.push(Cell { glyph, color });
        }
    }

    log::debug!(
        "composed {}x{} grid ({} edge cells)",
        small.width(),
        small.height(),
        shader.edge_count()
    );

    Ok(Analysis {
        grid: Grid {
            width: small.width(),
            height: small.height(),
            cells,
            background: config.canvas_background(),
        },
        edges,
        shader,
    })
}

/// Edge glyph for the cell covering pixels `[x*scale, (x+1)*scale)` (and the
/// same for `y`). The shader blocks overlapping that span are scanned in
/// row-major order; the first one with an edge wins.
fn cell_edge_glyph(shader: &ShaderMap, x: u32, y: u32, scale: u32, block: u32) -> Option<char> {
    if block == scale {
        return shader.glyph(x, y);
    }
    let span = |c: u32| (c * scale / block)..=(((c + 1) * scale - 1) / block);
    span(y).find_map(|by| span(x).find_map(|bx| shader.glyph(bx, by)))
}
