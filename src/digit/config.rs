//! Feature extractor configuration.
//!
//! The defaults reproduce the 28x28 digit setup: 7x7 zones, a 3x3
//! Gaussian blur, a 0.5 binary threshold and HOG with 4x4-pixel cells
//! grouped into 2x2-cell blocks. Changing the geometry or the HOG layout
//! changes the feature vector length.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Image geometry shared by every stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Side length of the square input image in pixels.
    pub image_size: usize,
    /// Side length of one zonal density region in pixels.
    pub zone_size: usize,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            image_size: 28,
            zone_size: 7,
        }
    }
}

impl GeometryConfig {
    /// Number of zones along each axis.
    #[inline]
    pub fn zone_grid(&self) -> usize {
        self.image_size / self.zone_size
    }
}

/// Normalization, blur and binarization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Divisor mapping raw intensities into `[0, 1]`.
    pub scale: f64,
    /// Gaussian kernel side length. Must be odd and at least 1.
    pub blur_kernel: usize,
    /// Gaussian sigma; zero or negative derives it from the kernel size.
    pub blur_sigma: f64,
    /// Values strictly above this become 1.0, everything else 0.0.
    pub threshold: f64,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            scale: 255.0,
            blur_kernel: 3,
            blur_sigma: 0.0,
            threshold: 0.5,
        }
    }
}

/// Histogram of oriented gradients layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HogConfig {
    /// Number of unsigned orientation bins over 180 degrees.
    pub orientations: usize,
    /// Cell side length in pixels.
    pub pixels_per_cell: usize,
    /// Block side length in cells.
    pub cells_per_block: usize,
}

impl Default for HogConfig {
    fn default() -> Self {
        Self {
            orientations: 9,
            pixels_per_cell: 4,
            cells_per_block: 2,
        }
    }
}

/// Complete configuration of the feature extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub geometry: GeometryConfig,
    #[serde(default)]
    pub preprocess: PreprocessConfig,
    #[serde(default)]
    pub hog: HogConfig,
}

impl ExtractorConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let geometry = &self.geometry;
        if geometry.image_size == 0
            || geometry.zone_size == 0
            || geometry.image_size % geometry.zone_size != 0
        {
            return Err(ConfigError::InvalidGeometry {
                image_size: geometry.image_size,
                zone_size: geometry.zone_size,
            });
        }

        // Edges and zones hold up to size^2 values each, projections 2 * size.
        let size = geometry.image_size;
        let summaries = size
            .checked_mul(size)
            .and_then(|n| n.checked_mul(2))
            .and_then(|n| n.checked_add(2 * size))
            .and_then(|n| n.checked_add(7));
        let Some(summaries) = summaries else {
            return Err(ConfigError::InvalidGeometry {
                image_size: size,
                zone_size: geometry.zone_size,
            });
        };

        let preprocess = &self.preprocess;
        if preprocess.blur_kernel == 0
            || preprocess.blur_kernel % 2 == 0
            || preprocess.blur_kernel > geometry.image_size
        {
            return Err(ConfigError::InvalidKernelSize(preprocess.blur_kernel));
        }
        if !preprocess.scale.is_finite() || preprocess.scale <= 0.0 {
            return Err(ConfigError::InvalidScale(preprocess.scale));
        }
        if !preprocess.threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold(preprocess.threshold));
        }
        if !preprocess.blur_sigma.is_finite() {
            return Err(ConfigError::InvalidSigma(preprocess.blur_sigma));
        }

        let hog = &self.hog;
        if hog.orientations == 0
            || hog.pixels_per_cell == 0
            || hog.cells_per_block == 0
            || geometry.image_size / hog.pixels_per_cell < hog.cells_per_block
        {
            return Err(ConfigError::InvalidHogLayout {
                image_size: geometry.image_size,
                pixels_per_cell: hog.pixels_per_cell,
                cells_per_block: hog.cells_per_block,
            });
        }

        let blocks = size / hog.pixels_per_cell + 1 - hog.cells_per_block;
        let total = blocks
            .checked_mul(blocks)
            .and_then(|n| n.checked_mul(hog.cells_per_block))
            .and_then(|n| n.checked_mul(hog.cells_per_block))
            .and_then(|n| n.checked_mul(hog.orientations))
            .and_then(|n| n.checked_add(summaries));
        if total.is_none() {
            return Err(ConfigError::InvalidHogLayout {
                image_size: size,
                pixels_per_cell: hog.pixels_per_cell,
                cells_per_block: hog.cells_per_block,
            });
        }

        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("blur kernel size {0} must be odd, at least 1 and no larger than the image")]
    InvalidKernelSize(usize),
    #[error("zone size {zone_size} must be non-zero and divide image size {image_size}")]
    InvalidGeometry { image_size: usize, zone_size: usize },
    #[error(
        "HOG layout does not fit: {image_size}px image, {pixels_per_cell}px cells, {cells_per_block}-cell blocks"
    )]
    InvalidHogLayout {
        image_size: usize,
        pixels_per_cell: usize,
        cells_per_block: usize,
    },
    #[error("intensity scale {0} must be finite and positive")]
    InvalidScale(f64),
    #[error("threshold {0} must be finite")]
    InvalidThreshold(f64),
    #[error("blur sigma {0} must be finite")]
    InvalidSigma(f64),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Output format for extracted vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `path,v0,v1,...` line per image.
    #[default]
    Csv,
    /// One JSON object per line.
    Json,
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Line format written to stdout.
    pub format: OutputFormat,
    /// Print Prometheus metrics to stderr after the run.
    pub metrics: bool,
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(flatten)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.extractor.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.geometry.zone_grid(), 4);
    }

    #[test]
    fn test_even_kernel_invalid() {
        let mut config = ExtractorConfig::default();
        config.preprocess.blur_kernel = 4;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidKernelSize(4))
        ));

        config.preprocess.blur_kernel = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidKernelSize(0))
        ));
    }

    #[test]
    fn test_zone_must_divide_image() {
        let mut config = ExtractorConfig::default();
        config.geometry.zone_size = 5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_hog_blocks_must_fit() {
        let mut config = ExtractorConfig::default();
        config.hog.pixels_per_cell = 16;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidHogLayout { .. })
        ));
    }

    #[test]
    fn test_kernel_larger_than_image_invalid() {
        let mut config = ExtractorConfig::default();
        config.preprocess.blur_kernel = 1_000_001;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidKernelSize(1_000_001))
        ));

        config.preprocess.blur_kernel = 29;
        assert!(config.validate().is_err());
        config.preprocess.blur_kernel = 27;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_oversized_geometry_invalid() {
        let mut config = ExtractorConfig::default();
        config.geometry.image_size = 1 << 40;
        config.geometry.zone_size = 1 << 40;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_oversized_hog_invalid() {
        let mut config = ExtractorConfig::default();
        config.hog.orientations = usize::MAX / 4;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidHogLayout { .. })
        ));
    }

    #[test]
    fn test_non_finite_values_named() {
        let mut config = ExtractorConfig::default();
        config.preprocess.blur_sigma = f64::NAN;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSigma(v) if v.is_nan()));
        assert_eq!(err.to_string(), "blur sigma NaN must be finite");

        let mut config = ExtractorConfig::default();
        config.preprocess.threshold = f64::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold(v)) if v.is_infinite()
        ));
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = FileConfig::from_toml(
            r#"
            [preprocess]
            blur_kernel = 5

            [output]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.extractor.preprocess.blur_kernel, 5);
        assert_eq!(config.extractor.preprocess.threshold, 0.5);
        assert_eq!(config.extractor.geometry, GeometryConfig::default());
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_sample_config_matches_defaults() {
        let config = FileConfig::from_toml(include_str!("../../demos/digit-features.toml")).unwrap();
        assert_eq!(config.extractor, ExtractorConfig::default());
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert!(!config.output.metrics);
    }

    #[test]
    fn test_parse_rejects_invalid() {
        let result = FileConfig::from_toml("[preprocess]\nblur_kernel = 2\n");
        assert!(matches!(result, Err(ConfigError::InvalidKernelSize(2))));
    }
}
