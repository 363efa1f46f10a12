//! Binary thresholding.

use ndarray::{Array2, ArrayView2};

/// Maps values strictly above `threshold` to 1.0 and all others to 0.0.
pub fn binarize(image: ArrayView2<'_, f64>, threshold: f64) -> Array2<f64> {
    image.mapv(|v| if v > threshold { 1.0 } else { 0.0 })
}
