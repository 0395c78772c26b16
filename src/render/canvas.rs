//! Font-based rasterization of a grid onto an RGBA image.

use std::path::Path;

use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};

use super::{CellPosition, GlyphRenderer};
use crate::ascii::{Grid, Rgb};
use crate::error::{AsciifyError, Result};

/// Draws every cell as a font glyph inside a `cell_size × cell_size` square.
pub struct CanvasRenderer {
    font: FontVec,
    canvas: RgbaImage,
}

impl CanvasRenderer {
    /// Load a TTF/OTF font from raw bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(data).map_err(|e| AsciifyError::FontLoad(e.to_string()))?;
        Ok(Self {
            font,
            canvas: RgbaImage::new(0, 0),
        })
    }

    /// Load a TTF/OTF font file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        log::debug!("loaded font {} ({} bytes)", path.display(), data.len());
        Self::from_bytes(data)
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }
}

impl GlyphRenderer for CanvasRenderer {
    fn begin(&mut self, grid: &Grid, cell_size: u32) {
        let bg = grid.background();
        self.canvas = RgbaImage::from_pixel(
            grid.width() * cell_size,
            grid.height() * cell_size,
            Rgba([bg.r, bg.g, bg.b, 255]),
        );
    }

    fn draw_glyph(&mut self, position: CellPosition, glyph: char, color: Rgb, cell_size: u32) {
        if glyph == ' ' || cell_size == 0 {
            return;
        }

        let scale = PxScale::from(cell_size as f32);
        let scaled = self.font.as_scaled(scale);
        let id = self.font.glyph_id(glyph);

        let cell_x = (position.x * cell_size) as f32;
        let cell_y = (position.y * cell_size) as f32;
        let inset = ((cell_size as f32 - scaled.h_advance(id)) / 2.0).max(0.0);
        let placed =
            id.with_scale_and_position(scale, point(cell_x + inset, cell_y + scaled.ascent()));

        let Some(outline) = self.font.outline_glyph(placed) else {
            return;
        };
        let bounds = outline.px_bounds();
        let (width, height) = self.canvas.dimensions();

        outline.draw(|gx, gy, coverage| {
            let x = bounds.min.x as i64 + gx as i64;
            let y = bounds.min.y as i64 + gy as i64;
            if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                return;
            }
            let dst = self.canvas.get_pixel_mut(x as u32, y as u32);
            let a = coverage.clamp(0.0, 1.0);
            let blend = |d: u8, s: u8| (d as f32 * (1.0 - a) + s as f32 * a).round() as u8;
            dst.0 = [
                blend(dst.0[0], color.r),
                blend(dst.0[1], color.g),
                blend(dst.0[2], color.b),
                255,
            ];
        });
    }
}

#[cfg(test)]
mod tests {
    use super::super::render_grid;
    use super::*;
    use crate::ascii::{analyze, AnalyzeConfig, DownscaleFilter, Pixel, Raster, DEFAULT_BACKGROUND};

    const SYSTEM_FONTS: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
        "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
        "/System/Library/Fonts/Menlo.ttc",
    ];

    fn system_font() -> Option<CanvasRenderer> {
        SYSTEM_FONTS
            .iter()
            .map(Path::new)
            .find(|p| p.exists())
            .and_then(|p| CanvasRenderer::from_file(p).ok())
    }

    #[test]
    fn test_invalid_font_bytes() {
        let err = CanvasRenderer::from_bytes(vec![0, 1, 2, 3]).err();
        assert!(matches!(err, Some(AsciifyError::FontLoad(_))));
    }

    #[test]
    fn test_missing_font_file() {
        let err = CanvasRenderer::from_file(Path::new("/nonexistent/font.ttf")).err();
        assert!(matches!(err, Some(AsciifyError::Io(_))));
    }

    #[test]
    fn test_canvas_size_and_glyph_ink() {
        let Some(mut renderer) = system_font() else {
            eprintln!("no system font found, skipping");
            return;
        };
        let raster = Raster::filled(32, 16, Pixel::from_rgb8(255, 255, 255));
        let config = AnalyzeConfig {
            downscale_filter: DownscaleFilter::BoxAverage,
            ..AnalyzeConfig::default()
        };
        let grid = analyze(&raster, &config).unwrap();
        render_grid(&grid, 12, &mut renderer);

        let img = renderer.into_image();
        assert_eq!(img.dimensions(), (4 * 12, 2 * 12));
        let bg = Rgba([DEFAULT_BACKGROUND.r, DEFAULT_BACKGROUND.g, DEFAULT_BACKGROUND.b, 255]);
        assert_eq!(*img.get_pixel(0, 0), bg);
        assert!(img.pixels().any(|p| *p != bg), "'@' glyphs should leave ink");
    }
}
