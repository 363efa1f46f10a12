//! Separable Gaussian smoothing.
//!
//! Kernels follow the usual fixed binomial tables for small sizes when no
//! sigma is given, and a sampled Gaussian otherwise. Borders are extended
//! with reflect-101 (`gfedcb|abcdefgh|gfedcba`).

use ndarray::{Array2, ArrayView2};

/// Fixed kernels used for sizes up to 7 when sigma is not positive.
const SMALL_KERNELS: [&[f64]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
    ],
];

/// Gaussian blur with a square, odd-sized kernel.
#[derive(Debug, Clone)]
pub struct GaussianBlur {
    kernel: Vec<f64>,
}

impl GaussianBlur {
    /// Builds the blur for a kernel size and sigma.
    ///
    /// `size` must be odd; callers validate it through the extractor
    /// configuration.
    pub fn new(size: usize, sigma: f64) -> Self {
        Self {
            kernel: gaussian_kernel(size, sigma),
        }
    }

    /// Returns the 1-D kernel weights.
    pub fn kernel(&self) -> &[f64] {
        &self.kernel
    }

    /// Applies the blur: a horizontal pass followed by a vertical pass.
    pub fn apply(&self, image: ArrayView2<'_, f64>) -> Array2<f64> {
        let (rows, cols) = image.dim();
        let radius = (self.kernel.len() / 2) as isize;

        let horizontal = Array2::from_shape_fn((rows, cols), |(r, c)| {
            self.kernel
                .iter()
                .enumerate()
                .map(|(k, w)| {
                    let src = reflect_101(c as isize + k as isize - radius, cols);
                    w * image[[r, src]]
                })
                .sum::<f64>()
        });

        Array2::from_shape_fn((rows, cols), |(r, c)| {
            self.kernel
                .iter()
                .enumerate()
                .map(|(k, w)| {
                    let src = reflect_101(r as isize + k as isize - radius, rows);
                    w * horizontal[[src, c]]
                })
                .sum::<f64>()
        })
    }
}

/// Computes normalized 1-D Gaussian weights.
pub fn gaussian_kernel(size: usize, sigma: f64) -> Vec<f64> {
    if sigma <= 0.0 && size % 2 == 1 && size <= 7 {
        return SMALL_KERNELS[size / 2].to_vec();
    }

    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let center = (size as f64 - 1.0) / 2.0;
    let scale = -0.5 / (sigma * sigma);

    let weights: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - center;
            (scale * x * x).exp()
        })
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

/// Maps an out-of-range index back into `[0, len)` without repeating the
/// edge sample.
fn reflect_101(mut index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    loop {
        if index < 0 {
            index = -index;
        } else if index > last {
            index = 2 * last - index;
        } else {
            return index as usize;
        }
    }
}
