//! Histogram of oriented gradients.
//!
//! Gradients are centered differences (not halved) with zero rows and
//! columns on the border. Each cell accumulates gradient magnitude into
//! unsigned orientation bins, normalized by the cell area. Overlapping
//! blocks of cells are then L2-Hys normalized and flattened in
//! block-row, block-column, cell-row, cell-column, orientation order.

use crate::digit::HogConfig;
use ndarray::{Array2, Array3, ArrayView2};

/// Guards the block normalization against division by zero.
const EPS: f64 = 1e-5;

/// L2-Hys clipping value.
const CLIP: f64 = 0.2;

/// HOG descriptor over a single-channel image.
#[derive(Debug, Clone)]
pub struct HogExtractor {
    orientations: usize,
    pixels_per_cell: usize,
    cells_per_block: usize,
}

impl HogExtractor {
    pub fn new(config: &HogConfig) -> Self {
        Self {
            orientations: config.orientations,
            pixels_per_cell: config.pixels_per_cell,
            cells_per_block: config.cells_per_block,
        }
    }

    /// Number of cells along an axis of `size` pixels. Trailing pixels
    /// that do not fill a cell are ignored.
    #[inline]
    pub fn cells(&self, size: usize) -> usize {
        size / self.pixels_per_cell
    }

    /// Number of sliding blocks along an axis of `size` pixels.
    #[inline]
    pub fn blocks(&self, size: usize) -> usize {
        (self.cells(size) + 1).saturating_sub(self.cells_per_block)
    }

    /// Output length for a `rows x cols` image.
    pub fn output_len(&self, rows: usize, cols: usize) -> usize {
        self.blocks(rows) * self.blocks(cols) * self.cells_per_block.pow(2) * self.orientations
    }

    /// Computes the flattened, block-normalized descriptor.
    pub fn extract(&self, image: ArrayView2<'_, f64>) -> Vec<f64> {
        let (magnitude, orientation) = gradients(image);
        let histograms = self.cell_histograms(&magnitude, &orientation);
        self.normalize_blocks(&histograms)
    }

    /// Per-cell orientation histograms, shape `(cell_rows, cell_cols, bins)`.
    fn cell_histograms(&self, magnitude: &Array2<f64>, orientation: &Array2<f64>) -> Array3<f64> {
        let (rows, cols) = magnitude.dim();
        let (cell_rows, cell_cols) = (self.cells(rows), self.cells(cols));
        let cell = self.pixels_per_cell;
        let bin_width = 180.0 / self.orientations as f64;
        let area = (cell * cell) as f64;

        let mut histograms = Array3::<f64>::zeros((cell_rows, cell_cols, self.orientations));
        for ((cr, cc, bin), slot) in histograms.indexed_iter_mut() {
            let upper = bin_width * (bin + 1) as f64;
            let lower = bin_width * bin as f64;
            let mut total = 0.0;
            for r in cr * cell..(cr + 1) * cell {
                for c in cc * cell..(cc + 1) * cell {
                    let angle = orientation[[r, c]];
                    if angle < upper && angle >= lower {
                        total += magnitude[[r, c]];
                    }
                }
            }
            *slot = total / area;
        }
        histograms
    }

    fn normalize_blocks(&self, histograms: &Array3<f64>) -> Vec<f64> {
        let (cell_rows, cell_cols, _) = histograms.dim();
        let block = self.cells_per_block;
        let block_rows = (cell_rows + 1).saturating_sub(block);
        let block_cols = (cell_cols + 1).saturating_sub(block);

        let mut out = Vec::with_capacity(block_rows * block_cols * block * block * self.orientations);
        for br in 0..block_rows {
            for bc in 0..block_cols {
                let values: Vec<f64> = histograms
                    .slice(ndarray::s![br..br + block, bc..bc + block, ..])
                    .iter()
                    .copied()
                    .collect();
                out.extend(l2_hys(values));
            }
        }
        out
    }
}

impl Default for HogExtractor {
    fn default() -> Self {
        Self::new(&HogConfig::default())
    }
}

/// Gradient magnitude and unsigned orientation in degrees `[0, 180)`.
fn gradients(image: ArrayView2<'_, f64>) -> (Array2<f64>, Array2<f64>) {
    let (rows, cols) = image.dim();
    let g_row = Array2::from_shape_fn((rows, cols), |(r, c)| {
        if r == 0 || r + 1 >= rows {
            0.0
        } else {
            image[[r + 1, c]] - image[[r - 1, c]]
        }
    });
    let g_col = Array2::from_shape_fn((rows, cols), |(r, c)| {
        if c == 0 || c + 1 >= cols {
            0.0
        } else {
            image[[r, c + 1]] - image[[r, c - 1]]
        }
    });

    let magnitude = Array2::from_shape_fn((rows, cols), |ix| g_row[ix].hypot(g_col[ix]));
    let orientation = Array2::from_shape_fn((rows, cols), |ix| {
        g_row[ix].atan2(g_col[ix]).to_degrees().rem_euclid(180.0)
    });
    (magnitude, orientation)
}

fn l2_hys(values: Vec<f64>) -> Vec<f64> {
    let norm = (values.iter().map(|v| v * v).sum::<f64>() + EPS * EPS).sqrt();
    let clipped: Vec<f64> = values.into_iter().map(|v| (v / norm).min(CLIP)).collect();
    let norm = (clipped.iter().map(|v| v * v).sum::<f64>() + EPS * EPS).sqrt();
    clipped.into_iter().map(|v| v / norm).collect()
}
