//! Digit image input and extractor configuration.
//!
//! This module provides the validated pixel grid handed to the feature
//! extractor and the configuration that fixes its geometry. Images are
//! owned by the caller; nothing here is retained between extractions.

mod config;
mod image;

pub use self::config::{
    ConfigError, ExtractorConfig, FileConfig, GeometryConfig, HogConfig, OutputConfig,
    OutputFormat, PreprocessConfig,
};
pub use self::image::{DigitImage, ImageError};
