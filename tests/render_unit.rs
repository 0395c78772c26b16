//! Rendering and raster file I/O through the public API.

use std::path::PathBuf;

use asciify::ascii::{analyze, AnalyzeConfig, DownscaleFilter, Grid, Pixel, Raster, Rgb};
use asciify::io;
use asciify::render::{
    bg_escape, fg_escape, render_grid, AnsiRenderer, CanvasRenderer, TextRenderer, RESET,
};
use asciify::AsciifyError;
use tempfile::TempDir;

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/Library/Fonts/Courier New.ttf",
];

fn find_font() -> Option<PathBuf> {
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

fn white_grid(width: u32, height: u32) -> Grid {
    let raster = Raster::filled(width, height, Pixel::from_rgb8(255, 255, 255));
    let config = AnalyzeConfig {
        downscale_filter: DownscaleFilter::BoxAverage,
        ..AnalyzeConfig::default()
    };
    analyze(&raster, &config).unwrap()
}

// ==================== Text & ANSI ====================

#[test]
fn test_text_renderer_lines() {
    let grid = white_grid(24, 16);
    let mut renderer = TextRenderer::new();
    render_grid(&grid, 8, &mut renderer);
    assert_eq!(renderer.as_str(), "@@@\n@@@\n");
    assert_eq!(renderer.as_str(), grid.to_string());
}

#[test]
fn test_ansi_renderer_row_layout() {
    let grid = white_grid(16, 8);
    let mut renderer = AnsiRenderer::new();
    render_grid(&grid, 8, &mut renderer);

    let base = Rgb::new(0xF8, 0xCA, 0xAE);
    let expected = format!(
        "{}{}@{}@{}\n",
        bg_escape(Rgb::new(0x11, 0x03, 0x01)),
        fg_escape(base),
        fg_escape(base),
        RESET
    );
    assert_eq!(renderer.into_string(), expected);
}

#[test]
fn test_ansi_renderer_without_background() {
    let grid = white_grid(16, 16);
    let mut renderer = AnsiRenderer::new().without_background();
    render_grid(&grid, 8, &mut renderer);
    let out = renderer.into_string();
    assert!(!out.contains("\x1b[48;2;"));
    assert_eq!(out.matches(RESET).count(), 2);
    assert_eq!(out.lines().count(), 2);
}

#[test]
fn test_rendering_is_repeatable_with_one_renderer() {
    let grid = white_grid(16, 16);
    let mut renderer = TextRenderer::new();
    render_grid(&grid, 8, &mut renderer);
    render_grid(&grid, 8, &mut renderer);
    assert_eq!(renderer.as_str(), "@@\n@@\n");
}

// ==================== Canvas ====================

#[test]
fn test_canvas_rejects_garbage_font() {
    assert!(matches!(
        CanvasRenderer::from_bytes(vec![0, 1, 2, 3]),
        Err(AsciifyError::FontLoad(_))
    ));
}

#[test]
fn test_canvas_png_output() {
    let Some(font) = find_font() else {
        eprintln!("no monospace font found, skipping");
        return;
    };
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("grid.png");

    let grid = white_grid(32, 16);
    let mut renderer = CanvasRenderer::from_file(&font).unwrap();
    render_grid(&grid, 12, &mut renderer);
    io::save_rgba(renderer.canvas(), &out).unwrap();

    let loaded = io::load(&out).unwrap();
    assert_eq!((loaded.width(), loaded.height()), (48, 24));
    // Some glyph ink lands on the background.
    let bg = Rgb::new(0x11, 0x03, 0x01);
    assert!(loaded.pixels().iter().any(|p| p.rgb8() != bg));
}

// ==================== Raster I/O ====================

#[test]
fn test_png_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gradient.png");
    let raster = Raster::from_fn(10, 6, |x, y| Pixel::from_rgb8(x as u8 * 20, y as u8 * 40, 7));
    io::save(&raster, &path).unwrap();

    let loaded = io::load(&path).unwrap();
    assert_eq!((loaded.width(), loaded.height()), (10, 6));
    assert_eq!(loaded.get(9, 5).unwrap().rgb8(), Rgb::new(180, 200, 7));
}

#[test]
fn test_jpeg_save_is_lossy_but_decodable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flat.jpg");
    let raster = Raster::filled(16, 16, Pixel::from_rgb8(120, 120, 120));
    io::save(&raster, &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let decoded = io::decode(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (16, 16));
    let p = decoded.get(8, 8).unwrap().rgb8();
    assert!((p.r as i32 - 120).abs() <= 4);
}

#[test]
fn test_unknown_extension_is_unsupported() {
    let dir = TempDir::new().unwrap();
    let raster = Raster::filled(2, 2, Pixel::default());
    for name in ["out.xyz", "out"] {
        assert!(matches!(
            io::save(&raster, &dir.path().join(name)),
            Err(AsciifyError::UnsupportedRasterFormat(_))
        ));
    }
}

#[test]
fn test_decode_garbage_fails() {
    assert!(io::decode(b"definitely not an image").is_err());
}
