//! Sobel edge detection producing a magnitude raster and a quantized angle map.

use std::f64::consts::PI;
use std::num::NonZeroUsize;

use super::grayscale::luminance_plane;
use super::raster::{Pixel, Raster};

/// Gradient magnitudes below this are treated as noise (no edge).
pub const MAGNITUDE_THRESHOLD: u8 = 50;

/// Sobel kernels as `[column][row]`: the first index walks `dx`, the second `dy`.
///
/// ```text
/// Gx:          Gy:
/// [1  0 -1]    [ 1  2  1]
/// [2  0 -2]    [ 0  0  0]
/// [1  0 -1]    [-1 -2 -1]
/// ```
const SOBEL_X: [[f64; 3]; 3] = [[1.0, 0.0, -1.0], [2.0, 0.0, -2.0], [1.0, 0.0, -1.0]];
const SOBEL_Y: [[f64; 3]; 3] = [[1.0, 2.0, 1.0], [0.0, 0.0, 0.0], [-1.0, -2.0, -1.0]];

/// Quantized edge direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeAngle {
    /// 0°, drawn as `_`
    Horizontal,
    /// 45°, drawn as `/`
    DiagonalUp,
    /// 90°, drawn as `|`
    Vertical,
    /// 135°, drawn as `\`
    DiagonalDown,
}

impl EdgeAngle {
    /// All angles in ascending order of degrees.
    pub const ALL: [EdgeAngle; 4] = [
        EdgeAngle::Horizontal,
        EdgeAngle::DiagonalUp,
        EdgeAngle::Vertical,
        EdgeAngle::DiagonalDown,
    ];

    pub fn degrees(self) -> f64 {
        match self {
            EdgeAngle::Horizontal => 0.0,
            EdgeAngle::DiagonalUp => 45.0,
            EdgeAngle::Vertical => 90.0,
            EdgeAngle::DiagonalDown => 135.0,
        }
    }

    /// Position in [`EdgeAngle::ALL`], i.e. `degrees / 45`.
    pub fn index(self) -> usize {
        match self {
            EdgeAngle::Horizontal => 0,
            EdgeAngle::DiagonalUp => 1,
            EdgeAngle::Vertical => 2,
            EdgeAngle::DiagonalDown => 3,
        }
    }

    /// Directional glyph for this edge.
    pub fn glyph(self) -> char {
        match self {
            EdgeAngle::Horizontal => '_',
            EdgeAngle::DiagonalUp => '/',
            EdgeAngle::Vertical => '|',
            EdgeAngle::DiagonalDown => '\\',
        }
    }

    /// Diagnostic heatmap color.
    pub fn heat_color(self) -> Pixel {
        match self {
            EdgeAngle::Horizontal => Pixel::from_rgb8(0, 255, 0),
            EdgeAngle::DiagonalUp => Pixel::from_rgb8(255, 255, 0),
            EdgeAngle::Vertical => Pixel::from_rgb8(255, 0, 0),
            EdgeAngle::DiagonalDown => Pixel::from_rgb8(0, 0, 255),
        }
    }

    /// Quantize an `atan2` angle divided by π (so in `[-1, 1]`).
    ///
    /// Returns `None` only for NaN input.
    pub fn quantize(a: f64) -> Option<EdgeAngle> {
        const E1: f64 = 1.0 / 8.0;
        const E3: f64 = 3.0 / 8.0;
        const E5: f64 = 5.0 / 8.0;
        const E7: f64 = 7.0 / 8.0;

        if (-E1..=E1).contains(&a) || a >= E7 || a <= -E7 {
            Some(EdgeAngle::Horizontal)
        } else if (a > E1 && a <= E3) || (a > -E7 && a <= -E5) {
            Some(EdgeAngle::DiagonalUp)
        } else if (a > E3 && a <= E5) || (a > -E5 && a <= -E3) {
            Some(EdgeAngle::Vertical)
        } else if (a > E5 && a <= E7) || (a > -E3 && a <= -E1) {
            Some(EdgeAngle::DiagonalDown)
        } else {
            None
        }
    }
}

/// Per-pixel quantized edge directions; `None` where there is no reliable edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AngleMap {
    width: u32,
    height: u32,
    angles: Vec<Option<EdgeAngle>>,
}

impl AngleMap {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn angles(&self) -> &[Option<EdgeAngle>] {
        &self.angles
    }

    /// Angle at `(x, y)`. Out-of-bounds reads are undefined (`None`).
    pub fn get(&self, x: u32, y: u32) -> Option<EdgeAngle> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.angles[y as usize * self.width as usize + x as usize]
    }

    /// Number of defined entries.
    pub fn defined_count(&self) -> usize {
        self.angles.iter().filter(|a| a.is_some()).count()
    }
}

/// 8-bit gradient magnitude per pixel (diagnostic output).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagnitudeMap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl MagnitudeMap {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y as usize * self.width as usize + x as usize])
    }

    /// Grayscale raster of the magnitudes.
    pub fn to_raster(&self) -> Raster {
        Raster::from_fn(self.width, self.height, |x, y| {
            let v = self.data[y as usize * self.width as usize + x as usize];
            Pixel::from_rgb8(v, v, v)
        })
    }
}

/// Output of the edge detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMap {
    pub magnitude: MagnitudeMap,
    pub angles: AngleMap,
}

/// Sobel edge detector that splits rows across worker threads.
#[derive(Debug, Clone, Copy)]
pub struct EdgeDetector {
    workers: usize,
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeDetector {
    /// One worker per available hardware thread.
    pub fn new() -> Self {
        let workers = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self { workers }
    }

    /// Use exactly `workers` threads (at least 1).
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Detect edges on the luminance of `raster`.
    pub fn detect(&self, raster: &Raster) -> EdgeMap {
        let plane = luminance_plane(raster);
        self.detect_plane(&plane, raster.width(), raster.height())
    }

    /// Detect edges on a precomputed 8-bit-scale luminance plane.
    ///
    /// Rows are partitioned into contiguous chunks of `ceil(height / workers)`
    /// rows. Each worker owns the output slices for its chunk, so results do
    /// not depend on the worker count. Border rows and columns stay undefined.
    pub fn detect_plane(&self, plane: &[f64], width: u32, height: u32) -> EdgeMap {
        let w = width as usize;
        let h = height as usize;
        let mut angles = vec![None; w * h];
        let mut magnitude = vec![0u8; w * h];

        if w >= 3 && h >= 3 && plane.len() >= w * h {
            let workers = self.workers.min(h);
            let chunk_rows = h.div_ceil(workers);
            log::debug!(
                "sobel {}x{} with {} workers ({} rows per chunk)",
                w,
                h,
                workers,
                chunk_rows
            );

            if workers <= 1 {
                sobel_rows(plane, w, h, 0, &mut angles, &mut magnitude);
            } else {
                std::thread::scope(|s| {
                    let chunks = angles
                        .chunks_mut(chunk_rows * w)
                        .zip(magnitude.chunks_mut(chunk_rows * w))
                        .enumerate();
                    for (i, (angle_chunk, mag_chunk)) in chunks {
                        s.spawn(move || {
                            sobel_rows(plane, w, h, i * chunk_rows, angle_chunk, mag_chunk);
                        });
                    }
                });
            }
        }

        EdgeMap {
            magnitude: MagnitudeMap {
                width,
                height,
                data: magnitude,
            },
            angles: AngleMap {
                width,
                height,
                angles,
            },
        }
    }
}

/// Sobel gradient `(gx, gy)` at an interior pixel.
///
/// Each tap's product is truncated toward zero before summing.
fn sobel_at(plane: &[f64], w: usize, x: usize, y: usize) -> (i32, i32) {
    let mut gx = 0i32;
    let mut gy = 0i32;
    for dy in 0..3 {
        for dx in 0..3 {
            let lum = plane[(y + dy - 1) * w + (x + dx - 1)];
            gx += (lum * SOBEL_X[dx][dy]) as i32;
            gy += (lum * SOBEL_Y[dx][dy]) as i32;
        }
    }
    (gx, gy)
}

/// Magnitude and quantized direction for a gradient.
pub fn classify_gradient(gx: i32, gy: i32) -> (u8, Option<EdgeAngle>) {
    let magnitude = ((gx as f64).powi(2) + (gy as f64).powi(2))
        .sqrt()
        .round()
        .min(255.0) as u8;
    if magnitude < MAGNITUDE_THRESHOLD {
        return (magnitude, None);
    }
    let angle = (gy as f64).atan2(gx as f64) / PI;
    (magnitude, EdgeAngle::quantize(angle))
}

/// Process the rows of one chunk starting at `start_y`. The output slices
/// cover exactly those rows.
fn sobel_rows(
    plane: &[f64],
    w: usize,
    h: usize,
    start_y: usize,
    angles: &mut [Option<EdgeAngle>],
    magnitude: &mut [u8],
) {
    let rows = angles.len() / w;
    for row in 0..rows {
        let y = start_y + row;
        if y == 0 || y >= h - 1 {
            continue;
        }
        for x in 1..w - 1 {
            let (gx, gy) = sobel_at(plane, w, x, y);
            let (mag, angle) = classify_gradient(gx, gy);
            angles[row * w + x] = angle;
            magnitude[row * w + x] = mag;
        }
    }
}

/// Color-coded view of an angle map: 0° green, 45° yellow, 90° red,
/// 135° blue, undefined black.
pub fn angle_heatmap(angles: &AngleMap) -> Raster {
    Raster::from_fn(angles.width(), angles.height(), |x, y| {
        angles
            .get(x, y)
            .map(EdgeAngle::heat_color)
            .unwrap_or_else(|| Pixel::from_rgb8(0, 0, 0))
    })
}
