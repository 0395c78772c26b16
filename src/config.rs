//! Configuration file handling for asciify.
//!
//! Loads configuration from `<config_dir>/asciify/config.toml` or a custom path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ascii::AnalyzeConfig;
use crate::render::OutputFormat;

/// Configuration file structure for asciify.
/// Loaded from `<config_dir>/asciify/config.toml` (or custom path via --config).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analyze: AnalyzeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Font used for PNG output.
    #[serde(default)]
    pub font: Option<PathBuf>,
    /// Pixel size of one rendered cell; defaults to the analysis scale.
    #[serde(default)]
    pub cell_size: Option<u32>,
    #[serde(default = "default_true")]
    pub ansi_background: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            font: None,
            cell_size: None,
            ansi_background: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    /// With no path, the default location is used and a missing file yields
    /// the default config. An explicit path must exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load_from_explicit(p),
            None => {
                let path = default_path();
                if path.exists() {
                    Self::read(&path)
                } else {
                    log::debug!("no config at {}, using defaults", path.display());
                    Ok(Config::default())
                }
            }
        }
    }

    /// Load a config file that the user asked for by name.
    pub fn load_from_explicit(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Self::read(path)
    }

    /// Parse TOML text.
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::SerializeError)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_toml(&content, path)?;
        log::info!("loaded config {}", path.display());
        Ok(config)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    NotFound {
        path: PathBuf,
    },
    SerializeError(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::NotFound { path } => {
                write!(f, "Config file not found: '{}'", path.display())
            }
            ConfigError::SerializeError(source) => {
                write!(f, "Failed to serialize config: {}", source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::NotFound { .. } => None,
            ConfigError::SerializeError(source) => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("asciify").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/asciify/config.toml")
        })
}

/// Commented starter config written by `asciify config init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r##"# asciify configuration

[analyze]
# Source pixels per character cell
scale = 8
# Recolor with a palette derived from base_color
monochrome = true
# Swap dark and light
invert = false
# Glyph ramp: standard, blocks, minimal
charset = "standard"
# Palette: linear, spiced
palette = "linear"
palette_shades = 8
base_color = "#F8CAAE"
background_color = "#110301"
# Edge input: luminance, dog
edge_source = "luminance"
# Shader block sampling: overlapping, exact
block_sampling = "overlapping"
# Downscale filter: lanczos3, box-average
downscale_filter = "lanczos3"
# Crop to a multiple of scale (centered)
crop = true

[analyze.bloom]
# Glow around highlights (color mode only)
enabled = true
sigma = 6.0
threshold = 225
intensity = 6.0
# Blur: exact, approximate
method = "exact"

[analyze.burn]
enabled = false
factor = 1.2

[output]
# text, ansi, png
format = "text"
# font = "/path/to/font.ttf"
"##;
