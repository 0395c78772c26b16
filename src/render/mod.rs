//! Turning a composed [`Grid`] into output.
//!
//! Rendering is kept apart from analysis: [`crate::ascii::analyze`] returns a
//! data-only grid and a [`GlyphRenderer`] draws it, one call per cell.

mod canvas;
mod text;

pub use canvas::CanvasRenderer;
pub use text::{bg_escape, fg_escape, AnsiRenderer, TextRenderer, RESET};

use serde::{Deserialize, Serialize};

use crate::ascii::{Grid, Rgb};

/// Output flavor of the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain glyphs, no color
    #[default]
    Text,
    /// Glyphs with 24-bit ANSI color escapes
    Ansi,
    /// Rasterized glyphs in a PNG image
    Png,
}

/// Cell coordinates in the grid (column, row).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    pub x: u32,
    pub y: u32,
}

/// Something that can draw a grid one glyph at a time.
pub trait GlyphRenderer {
    /// Called once before any glyph with the full grid and cell size.
    fn begin(&mut self, _grid: &Grid, _cell_size: u32) {}

    /// Called at the start of every row.
    fn begin_row(&mut self, _row: u32, _background: Rgb) {}

    /// Draw one cell.
    fn draw_glyph(&mut self, position: CellPosition, glyph: char, color: Rgb, cell_size: u32);

    /// Called after the last cell of every row.
    fn end_row(&mut self, _row: u32) {}
}

/// Drive `renderer` over every cell of `grid`, row by row.
pub fn render_grid<R: GlyphRenderer + ?Sized>(grid: &Grid, cell_size: u32, renderer: &mut R) {
    renderer.begin(grid, cell_size);
    for (y, row) in grid.rows().enumerate() {
        let y = y as u32;
        renderer.begin_row(y, grid.background());
        for (x, cell) in row.iter().enumerate() {
            let position = CellPosition { x: x as u32, y };
            renderer.draw_glyph(position, cell.glyph, cell.color, cell_size);
        }
        renderer.end_row(y);
    }
}
