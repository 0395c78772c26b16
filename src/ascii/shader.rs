//! Block-level aggregation of the angle map into one directional glyph per cell.

use serde::{Deserialize, Serialize};

use super::edges::{AngleMap, EdgeAngle};

/// Which source pixels a block samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockSampling {
    /// `(b+1)×(b+1)` samples per block, sharing the last row/column with the
    /// next block.
    #[default]
    Overlapping,
    /// Exactly the `b×b` pixels of the block.
    Exact,
}

impl BlockSampling {
    /// Samples taken along each axis for block size `block`.
    pub fn span(self, block: u32) -> u32 {
        match self {
            BlockSampling::Overlapping => block + 1,
            BlockSampling::Exact => block,
        }
    }
}

/// One optional edge glyph per display cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderMap {
    width: u32,
    height: u32,
    cells: Vec<Option<EdgeAngle>>,
}

impl ShaderMap {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dominant angle of cell `(x, y)`, `None` for "no edge" or out of bounds.
    pub fn angle(&self, x: u32, y: u32) -> Option<EdgeAngle> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Edge glyph of cell `(x, y)`, `None` when the cell defers to luminance.
    pub fn glyph(&self, x: u32, y: u32) -> Option<char> {
        self.angle(x, y).map(EdgeAngle::glyph)
    }

    /// Number of cells carrying an edge glyph.
    pub fn edge_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// Pick the dominant angle from per-angle counts indexed like [`EdgeAngle::ALL`].
///
/// Equal counts keep the earlier (lower) angle. Returns `None` when the winning
/// count does not exceed `2 * block`.
pub fn dominant_angle(counts: &[usize; 4], block: u32) -> Option<EdgeAngle> {
    let mut best = 0;
    for i in 1..counts.len() {
        if counts[i] > counts[best] {
            best = i;
        }
    }
    if counts[best] <= 2 * block as usize {
        None
    } else {
        Some(EdgeAngle::ALL[best])
    }
}

/// Aggregate `angles` into `floor(w/block) × floor(h/block)` cells.
///
/// Samples falling outside the angle map count as undefined. A zero `block`
/// yields an empty map.
pub fn shader_map(angles: &AngleMap, block: u32, sampling: BlockSampling) -> ShaderMap {
    if block == 0 {
        return ShaderMap {
            width: 0,
            height: 0,
            cells: Vec::new(),
        };
    }

    let width = angles.width() / block;
    let height = angles.height() / block;
    let span = sampling.span(block);
    let mut cells = Vec::with_capacity(width as usize * height as usize);

    for cy in 0..height {
        for cx in 0..width {
            let mut counts = [0usize; 4];
            let (x0, y0) = (cx * block, cy * block);
            for y in y0..y0 + span {
                for x in x0..x0 + span {
                    if let Some(angle) = angles.get(x, y) {
                        counts[angle.index()] += 1;
                    }
                }
            }
            cells.push(dominant_angle(&counts, block));
        }
    }

    log::debug!(
        "shader map {}x{} (block {}, {:?})",
        width,
        height,
        block,
        sampling
    );

    ShaderMap {
        width,
        height,
        cells,
    }
}
