//! Glyph ramps for brightness mapping and the directional edge glyphs.

use serde::{Deserialize, Serialize};

/// Standard density ramp (10 levels), darkest (space) to brightest (@).
pub const STANDARD_CHARSET: &[char] = &[' ', '.', '>', '+', 'o', 'P', '0', '?', '#', '@'];

/// Block character ramp (5 levels) using Unicode shade blocks.
pub const BLOCKS_CHARSET: &[char] = &[' ', '░', '▒', '▓', '█'];

/// Minimal ramp (4 levels) for a cleaner look.
pub const MINIMAL_CHARSET: &[char] = &[' ', '.', ':', '#'];

/// Glyph marking a cell with no dominant edge. The brightness glyph is used instead.
pub const NO_EDGE: char = ' ';

/// Character ramp used for brightness glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharSet {
    /// Standard ASCII ramp `" .>+oP0?#@"`
    #[default]
    Standard,
    /// Unicode shade blocks
    Blocks,
    /// 4-level ramp
    Minimal,
}

impl CharSet {
    /// Get the character slice for this charset.
    pub fn chars(&self) -> &'static [char] {
        match self {
            CharSet::Standard => STANDARD_CHARSET,
            CharSet::Blocks => BLOCKS_CHARSET,
            CharSet::Minimal => MINIMAL_CHARSET,
        }
    }

    /// Get a human-readable name for the charset.
    pub fn name(&self) -> &'static str {
        match self {
            CharSet::Standard => "standard",
            CharSet::Blocks => "blocks",
            CharSet::Minimal => "minimal",
        }
    }
}
