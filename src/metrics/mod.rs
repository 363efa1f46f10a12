//! Prometheus metrics for extraction runs.
//!
//! The extractor itself records nothing; batch drivers such as the CLI
//! keep an [`ExtractionSnapshot`] and push it into the registry.
//!
//! # Metrics Exposed
//!
//! - `digit_features_images_processed_total` - Images turned into vectors
//! - `digit_features_images_rejected_total` - Images skipped on decode or shape errors
//! - `digit_features_vector_length` - Length of the produced vectors
//! - `digit_features_foreground_pixels` - Foreground pixels of the last binarized image
//!
//! # Example
//!
//! ```
//! use digit_features::metrics::{ExtractionSnapshot, MetricsRegistry};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//! registry.update(&ExtractionSnapshot {
//!     processed: 10,
//!     rejected: 0,
//!     vector_length: 2159,
//!     foreground_pixels: Some(150),
//! });
//! assert!(registry.encode().unwrap().contains("digit_features_vector_length 2159"));
//! ```

mod collector;

pub use collector::{ExtractionSnapshot, MetricsError, MetricsRegistry};
