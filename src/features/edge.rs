//! Sobel edge magnitude.

use ndarray::{Array2, ArrayView2};

/// Smoothing weights applied across the derivative axis.
const SMOOTH: [f64; 3] = [0.25, 0.5, 0.25];

/// Sobel gradient magnitude over the whole image, flattened row-major.
///
/// Each axis is differentiated with `[1, 0, -1]` and smoothed with
/// `[1, 2, 1] / 4` along the other axis. Borders use half-sample
/// symmetric reflection (`dcba|abcd|dcba`). The magnitude is
/// `sqrt((g_row^2 + g_col^2) / 2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeExtractor;

impl EdgeExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Returns the edge magnitude image.
    pub fn magnitude(&self, image: ArrayView2<'_, f64>) -> Array2<f64> {
        let (rows, cols) = image.dim();
        let at = |r: isize, c: isize| image[[reflect(r, rows), reflect(c, cols)]];

        Array2::from_shape_fn((rows, cols), |(r, c)| {
            let (r, c) = (r as isize, c as isize);
            let mut g_row = 0.0;
            let mut g_col = 0.0;
            for (k, w) in SMOOTH.iter().enumerate() {
                let offset = k as isize - 1;
                g_row += w * (at(r - 1, c + offset) - at(r + 1, c + offset));
                g_col += w * (at(r + offset, c - 1) - at(r + offset, c + 1));
            }
            ((g_row * g_row + g_col * g_col) / 2.0).sqrt()
        })
    }

    /// Returns the flattened edge magnitude.
    pub fn extract(&self, image: ArrayView2<'_, f64>) -> Vec<f64> {
        self.magnitude(image).iter().copied().collect()
    }
}

/// Half-sample symmetric reflection: index -1 maps to 0, `len` to `len - 1`.
fn reflect(index: isize, len: usize) -> usize {
    let len = len as isize;
    let period = 2 * len;
    let wrapped = index.rem_euclid(period);
    if wrapped < len {
        wrapped as usize
    } else {
        (period - 1 - wrapped) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_image_has_no_edges() {
        let image = Array2::from_elem((28, 28), 1.0);
        let edges = EdgeExtractor::new().extract(image.view());
        assert_eq!(edges.len(), 784);
        assert!(edges.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_reflect() {
        assert_eq!(reflect(-1, 4), 0);
        assert_eq!(reflect(-2, 4), 1);
        assert_eq!(reflect(4, 4), 3);
        assert_eq!(reflect(5, 4), 2);
        assert_eq!(reflect(2, 4), 2);
    }

    #[test]
    fn test_step_edge_response() {
        // Columns 0..4 are 0, columns 4..8 are 1.
        let image = Array2::from_shape_fn((8, 8), |(_, c)| if c >= 4 { 1.0 } else { 0.0 });
        let edges = EdgeExtractor::new().magnitude(image.view());

        // Either side of the step sees a unit column difference.
        let expected = (1.0f64 / 2.0).sqrt();
        assert_relative_eq!(edges[[3, 3]], expected);
        assert_relative_eq!(edges[[3, 4]], expected);
        assert_eq!(edges[[3, 1]], 0.0);
        // The reflected border does not create a spurious edge.
        assert_eq!(edges[[0, 7]], 0.0);
    }

    #[test]
    fn test_single_pixel_symmetric() {
        let mut image = Array2::<f64>::zeros((5, 5));
        image[[2, 2]] = 1.0;
        let edges = EdgeExtractor::new().magnitude(image.view());

        assert_eq!(edges[[2, 2]], 0.0);
        assert_relative_eq!(edges[[1, 2]], edges[[3, 2]]);
        assert_relative_eq!(edges[[2, 1]], edges[[2, 3]]);
        assert_relative_eq!(edges[[1, 2]], edges[[2, 1]]);
    }
}
