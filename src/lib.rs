//! Digit Feature Extraction Library
//!
//! Turns small grayscale digit images (28x28 by default) into fixed-length
//! feature vectors for a downstream classifier. The transforms are
//! classical and deterministic: no training, no learned weights.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! digit → preprocess → features (HOG, Sobel, zones, projections, Hu) → vector
//!                                        ↓
//!                                 metrics (batch runs)
//! ```
//!
//! # Design Principles
//!
//! - **Pure stages**: every stage is a function of its input; the extractor
//!   holds configuration only and is safe to share between threads
//! - **Explicit geometry**: image, zone and HOG sizes are configuration,
//!   and the vector length follows from them
//! - **Hardened input**: wrong shapes and non-finite pixels are reported
//!   as errors instead of producing garbage vectors
//!
//! # Example
//!
//! ```
//! use digit_features::{DigitImage, FeatureExtractor};
//! use ndarray::Array2;
//!
//! let mut pixels = Array2::<f64>::zeros((28, 28));
//! pixels.slice_mut(ndarray::s![4..24, 12..16]).fill(255.0);
//! let image = DigitImage::from_array(pixels).unwrap();
//!
//! let extractor = FeatureExtractor::default();
//! let features = extractor.extract(&image).unwrap();
//! assert_eq!(features.len(), 2159);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod digit;
pub mod features;
pub mod metrics;
pub mod preprocess;

// Re-export commonly used types at crate root
pub use digit::{ConfigError, DigitImage, ExtractorConfig, FileConfig, ImageError};
pub use features::{FeatureExtractor, FeatureLayout, FeatureParts, FeatureVector, Segment};
pub use metrics::{ExtractionSnapshot, MetricsRegistry};
pub use preprocess::Preprocessor;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
