//! CLI enum types mirroring the library's configuration enums.

use clap::ValueEnum;

use crate::ascii::{self, BlurMethod, EdgeSource, PaletteKind};
use crate::render::OutputFormat;

/// Output flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Ansi,
    Png,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Ansi => OutputFormat::Ansi,
            Format::Png => OutputFormat::Png,
        }
    }
}

/// ASCII character set for brightness glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CharacterSet {
    #[default]
    Standard,
    Blocks,
    Minimal,
}

impl From<CharacterSet> for ascii::CharSet {
    fn from(c: CharacterSet) -> Self {
        match c {
            CharacterSet::Standard => ascii::CharSet::Standard,
            CharacterSet::Blocks => ascii::CharSet::Blocks,
            CharacterSet::Minimal => ascii::CharSet::Minimal,
        }
    }
}

/// Monochrome palette ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PaletteChoice {
    #[default]
    Linear,
    Spiced,
}

impl From<PaletteChoice> for PaletteKind {
    fn from(p: PaletteChoice) -> Self {
        match p {
            PaletteChoice::Linear => PaletteKind::Linear,
            PaletteChoice::Spiced => PaletteKind::Spiced,
        }
    }
}

/// Raster fed to the Sobel stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EdgeInput {
    #[default]
    Luminance,
    Dog,
}

impl From<EdgeInput> for EdgeSource {
    fn from(e: EdgeInput) -> Self {
        match e {
            EdgeInput::Luminance => EdgeSource::Luminance,
            EdgeInput::Dog => EdgeSource::Dog,
        }
    }
}

/// Gaussian blur implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BlurChoice {
    #[default]
    Exact,
    Approximate,
}

impl From<BlurChoice> for BlurMethod {
    fn from(b: BlurChoice) -> Self {
        match b {
            BlurChoice::Exact => BlurMethod::Exact,
            BlurChoice::Approximate => BlurMethod::Approximate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_to_output_format() {
        assert_eq!(OutputFormat::from(Format::Text), OutputFormat::Text);
        assert_eq!(OutputFormat::from(Format::Ansi), OutputFormat::Ansi);
        assert_eq!(OutputFormat::from(Format::Png), OutputFormat::Png);
    }

    #[test]
    fn test_charset_to_ascii_charset() {
        assert_eq!(
            ascii::CharSet::from(CharacterSet::Standard),
            ascii::CharSet::Standard
        );
        assert_eq!(
            ascii::CharSet::from(CharacterSet::Blocks),
            ascii::CharSet::Blocks
        );
        assert_eq!(
            ascii::CharSet::from(CharacterSet::Minimal),
            ascii::CharSet::Minimal
        );
    }

    #[test]
    fn test_palette_and_edge_and_blur() {
        assert_eq!(PaletteKind::from(PaletteChoice::Spiced), PaletteKind::Spiced);
        assert_eq!(EdgeSource::from(EdgeInput::Dog), EdgeSource::Dog);
        assert_eq!(
            BlurMethod::from(BlurChoice::Approximate),
            BlurMethod::Approximate
        );
    }
}
