//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{parse_hex_color, parse_scale, parse_shades, Args, Command, ConfigAction};
pub use commands::{
    handle_config_action, init_config_file, merge_analyze_config, resolve_format, run_convert,
    CliError,
};
pub use enums::{BlurChoice, CharacterSet, EdgeInput, Format, PaletteChoice};
