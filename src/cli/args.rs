//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{BlurChoice, CharacterSet, EdgeInput, Format, PaletteChoice};
use crate::ascii::Rgb;

/// Parse and validate a hex color (`#RRGGBB` or `#RGB`)
pub fn parse_hex_color(s: &str) -> Result<Rgb, String> {
    Rgb::from_hex(s).map_err(|e| e.to_string())
}

/// Parse and validate the cell scale (1-256 pixels)
pub fn parse_scale(s: &str) -> Result<u32, String> {
    let scale: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid scale", s))?;
    if !(1..=256).contains(&scale) {
        return Err(format!("Scale must be between 1 and 256, got {}", scale));
    }
    Ok(scale)
}

/// Parse and validate palette size (at least 2 shades)
pub fn parse_shades(s: &str) -> Result<usize, String> {
    let shades: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number of shades", s))?;
    if shades < 2 {
        return Err(format!("A palette needs at least 2 shades, got {}", shades));
    }
    Ok(shades)
}

/// Convert an image into edge-aware ASCII art
#[derive(Parser, Debug)]
#[command(name = "asciify")]
#[command(version, about = "Convert images into edge-aware ASCII art", long_about = None)]
#[command(args_conflicts_with_subcommands = true, arg_required_else_help = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Input image (PNG or JPEG)
    pub input: Option<PathBuf>,

    /// Output file (stdout for text/ansi when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (inferred from a .png output path when omitted)
    #[arg(long, short)]
    pub format: Option<Format>,

    /// TTF/OTF font for PNG output
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Source pixels per character cell
    #[arg(long, short, value_parser = parse_scale)]
    pub scale: Option<u32>,

    /// Pixel size of a rendered PNG cell (default: scale)
    #[arg(long)]
    pub cell_size: Option<u32>,

    /// Keep the image's colors instead of a monochrome palette
    #[arg(long)]
    pub color: bool,

    /// Invert brightness (for light backgrounds)
    #[arg(long)]
    pub invert: bool,

    /// Disable bloom in color mode
    #[arg(long)]
    pub no_bloom: bool,

    /// Apply color burn to the final colors
    #[arg(long)]
    pub burn: bool,

    /// Monochrome palette ramp
    #[arg(long)]
    pub palette: Option<PaletteChoice>,

    /// Number of palette shades
    #[arg(long, value_parser = parse_shades)]
    pub shades: Option<usize>,

    /// Monochrome base color
    #[arg(long, value_parser = parse_hex_color)]
    pub base_color: Option<Rgb>,

    /// Monochrome background color
    #[arg(long, value_parser = parse_hex_color)]
    pub background: Option<Rgb>,

    /// ASCII character set
    #[arg(long)]
    pub charset: Option<CharacterSet>,

    /// Image fed to edge detection
    #[arg(long)]
    pub edge_source: Option<EdgeInput>,

    /// Bloom blur implementation
    #[arg(long)]
    pub blur: Option<BlurChoice>,

    /// Do not crop the input to a multiple of the scale
    #[arg(long)]
    pub no_crop: bool,

    /// Sobel worker threads (default: available parallelism)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Write the edge magnitude and angle heatmap into this directory
    #[arg(long)]
    pub debug_dir: Option<PathBuf>,

    /// CRT scanline effect (not implemented)
    #[arg(long, hide = true)]
    pub crt: bool,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
