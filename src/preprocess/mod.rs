//! Image normalization, smoothing and binarization.
//!
//! Every feature stage works on the output of this module: a binary image
//! with values exactly 0.0 or 1.0 and the same shape as the input.

mod blur;
mod threshold;

pub use blur::{gaussian_kernel, GaussianBlur};
pub use threshold::binarize;

use crate::digit::PreprocessConfig;
use ndarray::{Array2, ArrayView2};

/// Scales raw intensities, blurs them and thresholds the result.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    scale: f64,
    blur: GaussianBlur,
    threshold: f64,
}

impl Preprocessor {
    /// Creates a preprocessor from validated settings.
    pub fn new(config: &PreprocessConfig) -> Self {
        Self {
            scale: config.scale,
            blur: GaussianBlur::new(config.blur_kernel, config.blur_sigma),
            threshold: config.threshold,
        }
    }

    /// Runs scale, blur and threshold in that order.
    pub fn process(&self, image: ArrayView2<'_, f64>) -> Array2<f64> {
        let scaled = image.mapv(|v| v / self.scale);
        let blurred = self.blur.apply(scaled.view());
        binarize(blurred.view(), self.threshold)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(&PreprocessConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke_image() -> Array2<f64> {
        let mut image = Array2::<f64>::zeros((28, 28));
        image.slice_mut(ndarray::s![6..22, 12..16]).fill(255.0);
        image.slice_mut(ndarray::s![6..9, 8..20]).fill(255.0);
        image
    }

    #[test]
    fn test_output_is_binary() {
        let image = Array2::from_shape_fn((28, 28), |(r, c)| ((r * 31 + c * 17) % 256) as f64);
        let binary = Preprocessor::default().process(image.view());
        assert!(binary.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn test_half_intensity_maps_to_zero() {
        // 127.5 / 255 is exactly 0.5 and the blur keeps a flat image flat.
        let image = Array2::from_elem((28, 28), 127.5);
        let binary = Preprocessor::default().process(image.view());
        assert!(binary.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_solid_strokes_stable_under_reprocessing() {
        let preprocessor = Preprocessor::default();
        let once = preprocessor.process(stroke_image().view());
        let twice = preprocessor.process(once.mapv(|v| v * 255.0).view());
        assert_eq!(once, twice);
        assert!(once.sum() > 0.0);
    }

    #[test]
    fn test_isolated_pixel_removed() {
        let mut image = Array2::<f64>::zeros((28, 28));
        image[[10, 10]] = 255.0;
        let binary = Preprocessor::default().process(image.view());
        assert_eq!(binary.sum(), 0.0);
    }
}
