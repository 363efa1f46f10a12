//! Row and column projections.

use ndarray::{ArrayView2, Axis};

/// Horizontal and vertical projection sums.
#[derive(Debug, Clone, PartialEq)]
pub struct Projections {
    /// Sum of each row, one value per row.
    pub horizontal: Vec<f64>,
    /// Sum of each column, one value per column.
    pub vertical: Vec<f64>,
}

/// Computes stroke distribution along both axes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionExtractor;

impl ProjectionExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, image: ArrayView2<'_, f64>) -> Projections {
        Projections {
            horizontal: image.sum_axis(Axis(1)).to_vec(),
            vertical: image.sum_axis(Axis(0)).to_vec(),
        }
    }
}
