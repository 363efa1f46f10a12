//! Digit image type representing one grayscale sample.

use ndarray::{Array2, ArrayView2};
use std::path::Path;
use thiserror::Error;

/// Errors raised when an input cannot be turned into a usable image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("invalid image shape: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    InvalidImageShape {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },
    #[error("non-finite pixel value at ({row}, {col})")]
    NonFinitePixel { row: usize, col: usize },
    #[error("flat buffer has {actual} values, expected {expected}")]
    FlatLength { expected: usize, actual: usize },
    #[error("failed to decode image: {0}")]
    Decode(#[from] ::image::ImageError),
}

/// A single grayscale digit sample.
///
/// Pixels are stored as `f64` in row-major order, raw intensities in
/// `[0, 255]`. Construction rejects NaN and infinite values; the shape is
/// checked later against the extractor's configured geometry.
#[derive(Clone, PartialEq)]
pub struct DigitImage {
    pixels: Array2<f64>,
}

impl DigitImage {
    /// Wraps a 2-D array of raw intensities.
    pub fn from_array(pixels: Array2<f64>) -> Result<Self, ImageError> {
        if let Some(((row, col), _)) = pixels.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ImageError::NonFinitePixel { row, col });
        }
        Ok(Self { pixels })
    }

    /// Reshapes a row-major flat buffer into a `rows x cols` image.
    pub fn from_flat(values: &[f64], rows: usize, cols: usize) -> Result<Self, ImageError> {
        let expected = rows * cols;
        if values.len() != expected {
            return Err(ImageError::FlatLength {
                expected,
                actual: values.len(),
            });
        }
        let pixels = Array2::from_shape_vec((rows, cols), values.to_vec()).map_err(|_| {
            ImageError::FlatLength {
                expected,
                actual: values.len(),
            }
        })?;
        Self::from_array(pixels)
    }

    /// Converts an 8-bit grayscale image.
    pub fn from_gray(gray: &::image::GrayImage) -> Self {
        let (width, height) = gray.dimensions();
        let pixels = Array2::from_shape_fn((height as usize, width as usize), |(r, c)| {
            f64::from(gray.get_pixel(c as u32, r as u32).0[0])
        });
        Self { pixels }
    }

    /// Decodes an image file and converts it to 8-bit grayscale.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let decoded = ::image::open(path.as_ref())?;
        Ok(Self::from_gray(&decoded.to_luma8()))
    }

    /// Returns a view of the raw pixels.
    #[inline]
    pub fn pixels(&self) -> ArrayView2<'_, f64> {
        self.pixels.view()
    }

    /// Returns the number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.pixels.nrows()
    }

    /// Returns the number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.pixels.ncols()
    }

    /// Checks that the image is exactly `size x size`.
    pub fn ensure_square(&self, size: usize) -> Result<(), ImageError> {
        if self.rows() != size || self.cols() != size {
            return Err(ImageError::InvalidImageShape {
                expected_rows: size,
                expected_cols: size,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for DigitImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigitImage")
            .field("rows", &self.rows())
            .field("cols", &self.cols())
            .finish()
    }
}
