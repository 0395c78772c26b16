//! Subcommand handlers: image conversion and config actions.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::args::{Args, ConfigAction};
use crate::ascii::{analyze_detailed, angle_heatmap, Analysis, AnalyzeConfig};
use crate::config::{default_path as get_config_path, Config, ConfigError, DEFAULT_CONFIG_TEMPLATE};
use crate::error::AsciifyError;
use crate::io;
use crate::render::{render_grid, AnsiRenderer, CanvasRenderer, OutputFormat, TextRenderer};

/// Errors surfaced by the command-line front end.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Asciify(#[from] AsciifyError),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No input image given")]
    MissingInput,

    #[error("PNG output needs a font (--font or [output] font in the config)")]
    MissingFont,

    #[error("PNG output needs an output path (-o)")]
    MissingOutput,

    #[error("Config file already exists: {}", .0.display())]
    ConfigExists(PathBuf),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> CliError + '_ {
    move |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Layer CLI flags over a config-file analysis config.
pub fn merge_analyze_config(base: AnalyzeConfig, args: &Args) -> AnalyzeConfig {
    let mut cfg = base;
    if let Some(scale) = args.scale {
        cfg.scale = scale;
    }
    if args.color {
        cfg.monochrome = false;
    }
    if args.invert {
        cfg.invert = true;
    }
    if args.no_bloom {
        cfg.bloom.enabled = false;
    }
    if let Some(blur) = args.blur {
        cfg.bloom.method = blur.into();
    }
    if args.burn {
        cfg.burn.enabled = true;
    }
    if let Some(palette) = args.palette {
        cfg.palette = palette.into();
    }
    if let Some(shades) = args.shades {
        cfg.palette_shades = shades;
    }
    if let Some(base_color) = args.base_color {
        cfg.base_color = base_color;
    }
    if let Some(background) = args.background {
        cfg.background_color = background;
    }
    if let Some(charset) = args.charset {
        cfg.charset = charset.into();
    }
    if let Some(source) = args.edge_source {
        cfg.edge_source = source.into();
    }
    if args.no_crop {
        cfg.crop = false;
    }
    if let Some(workers) = args.workers {
        cfg.workers = Some(workers);
    }
    cfg
}

/// Pick the output format: flag, then a `.png` output path, then the config.
pub fn resolve_format(args: &Args, config: &Config) -> OutputFormat {
    if let Some(format) = args.format {
        return format.into();
    }
    let png_output = args
        .output
        .as_deref()
        .and_then(Path::extension)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if png_output {
        OutputFormat::Png
    } else {
        config.output.format
    }
}

/// Convert the input image and write the result.
pub fn run_convert(args: &Args) -> Result<(), CliError> {
    let input = args.input.as_deref().ok_or(CliError::MissingInput)?;
    let config = Config::load(args.config.as_deref())?;
    let analyze_config = merge_analyze_config(config.analyze.clone(), args);

    if args.crt {
        log::warn!("--crt is not implemented, ignoring");
    }

    let raster = io::load(input)?;
    let analysis = analyze_detailed(&raster, &analyze_config)?;
    log::info!(
        "{}x{} cells from {}x{} pixels",
        analysis.grid.width(),
        analysis.grid.height(),
        raster.width(),
        raster.height()
    );

    if let Some(dir) = &args.debug_dir {
        write_debug_images(&analysis, dir)?;
    }

    match resolve_format(args, &config) {
        OutputFormat::Text => {
            let mut renderer = TextRenderer::new();
            render_grid(&analysis.grid, analyze_config.scale, &mut renderer);
            emit_text(renderer.as_str(), args.output.as_deref())
        }
        OutputFormat::Ansi => {
            let mut renderer = if config.output.ansi_background {
                AnsiRenderer::new()
            } else {
                AnsiRenderer::new().without_background()
            };
            render_grid(&analysis.grid, analyze_config.scale, &mut renderer);
            emit_text(renderer.as_str(), args.output.as_deref())
        }
        OutputFormat::Png => {
            let font = args
                .font
                .as_deref()
                .or(config.output.font.as_deref())
                .ok_or(CliError::MissingFont)?;
            let output = args.output.as_deref().ok_or(CliError::MissingOutput)?;
            let cell_size = args
                .cell_size
                .or(config.output.cell_size)
                .unwrap_or(analyze_config.scale);

            let mut renderer = CanvasRenderer::from_file(font)?;
            render_grid(&analysis.grid, cell_size, &mut renderer);
            io::save_rgba(renderer.canvas(), output)?;
            Ok(())
        }
    }
}

fn emit_text(text: &str, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => {
            fs::write(path, text).map_err(io_err(path))?;
            log::info!("wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(text.as_bytes())
                .and_then(|_| lock.flush())
                .map_err(io_err(Path::new("<stdout>")))?;
        }
    }
    Ok(())
}

/// Dump the Sobel magnitude and the angle heatmap as PNGs.
fn write_debug_images(analysis: &Analysis, dir: &Path) -> Result<(), CliError> {
    fs::create_dir_all(dir).map_err(io_err(dir))?;
    io::save(&analysis.edges.magnitude.to_raster(), &dir.join("magnitude.png"))?;
    io::save(&angle_heatmap(&analysis.edges.angles), &dir.join("angles.png"))?;
    log::info!("wrote debug images to {}", dir.display());
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, path: Option<&Path>) -> Result<(), CliError> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    match action {
        ConfigAction::Show => {
            let config = Config::load(path)?;
            println!("Current configuration:");
            println!();
            print!("{}", config.to_toml()?);
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            init_config_file(&config_path)?;
            println!("Created config file: {}", config_path.display());
        }
    }
    Ok(())
}

/// Write the commented default config to `path`, refusing to overwrite.
pub fn init_config_file(path: &Path) -> Result<(), CliError> {
    if path.exists() {
        return Err(CliError::ConfigExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(io_err(path))?;
    Ok(())
}
