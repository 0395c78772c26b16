//! Text and ANSI truecolor renderers.

use super::{CellPosition, GlyphRenderer};
use crate::ascii::{Grid, Rgb};

/// Plain glyphs, one line per row.
#[derive(Debug, Default)]
pub struct TextRenderer {
    out: String,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

impl GlyphRenderer for TextRenderer {
    fn begin(&mut self, grid: &Grid, _cell_size: u32) {
        self.out.clear();
        self.out
            .reserve((grid.width() as usize + 1) * grid.height() as usize);
    }

    fn draw_glyph(&mut self, _position: CellPosition, glyph: char, _color: Rgb, _cell_size: u32) {
        self.out.push(glyph);
    }

    fn end_row(&mut self, _row: u32) {
        self.out.push('\n');
    }
}

/// Glyphs colored with 24-bit ANSI escapes on the grid background.
///
/// Each row sets the background once, each cell its foreground, and the row
/// ends with a reset so the terminal state does not leak.
#[derive(Debug)]
pub struct AnsiRenderer {
    out: String,
    background: bool,
}

impl Default for AnsiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnsiRenderer {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            background: true,
        }
    }

    /// Leave the terminal's own background in place.
    pub fn without_background(mut self) -> Self {
        self.background = false;
        self
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

/// `ESC[38;2;r;g;bm`
pub fn fg_escape(color: Rgb) -> String {
    format!("\x1b[38;2;{};{};{}m", color.r, color.g, color.b)
}

/// `ESC[48;2;r;g;bm`
pub fn bg_escape(color: Rgb) -> String {
    format!("\x1b[48;2;{};{};{}m", color.r, color.g, color.b)
}

pub const RESET: &str = "\x1b[0m";

impl GlyphRenderer for AnsiRenderer {
    fn begin(&mut self, _grid: &Grid, _cell_size: u32) {
        self.out.clear();
    }

    fn begin_row(&mut self, _row: u32, background: Rgb) {
        if self.background {
            self.out.push_str(&bg_escape(background));
        }
    }

    fn draw_glyph(&mut self, _position: CellPosition, glyph: char, color: Rgb, _cell_size: u32) {
        self.out.push_str(&fg_escape(color));
        self.out.push(glyph);
    }

    fn end_row(&mut self, _row: u32) {
        self.out.push_str(RESET);
        self.out.push('\n');
    }
}
