//! Feature extraction from digit images.
//!
//! One preprocessed binary image feeds five independent stages whose
//! outputs are concatenated in a fixed order:
//!
//! ```text
//! HOG | Sobel edges | zonal density | row projection | column projection | Hu moments
//! ```
//!
//! For the default 28x28 configuration the vector has 2159 values.

mod edge;
mod hog;
mod moments;
mod projection;
mod vector;
mod zonal;

pub use edge::EdgeExtractor;
pub use hog::HogExtractor;
pub use moments::{MomentExtractor, HU_MOMENTS};
pub use projection::{ProjectionExtractor, Projections};
pub use vector::{FeatureLayout, FeatureParts, FeatureVector, Segment};
pub use zonal::ZonalDensityExtractor;

use crate::digit::{ConfigError, DigitImage, ExtractorConfig, ImageError};
use crate::preprocess::Preprocessor;
use ndarray::{Array2, ArrayView2};

/// Extracts one feature vector per image.
///
/// Holds only immutable configuration, so a single extractor can be
/// shared across threads and called concurrently.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    image_size: usize,
    preprocessor: Preprocessor,
    hog: HogExtractor,
    edges: EdgeExtractor,
    zones: ZonalDensityExtractor,
    projections: ProjectionExtractor,
    moments: MomentExtractor,
    layout: FeatureLayout,
}

impl FeatureExtractor {
    /// Creates an extractor after validating the configuration.
    pub fn new(config: &ExtractorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: &ExtractorConfig) -> Self {
        let size = config.geometry.image_size;
        let hog = HogExtractor::new(&config.hog);
        let zones = ZonalDensityExtractor::new(&config.geometry);
        let layout = FeatureLayout {
            hog: hog.output_len(size, size),
            edges: size * size,
            zones: zones.output_len(),
            horizontal: size,
            vertical: size,
            hu_moments: HU_MOMENTS,
        };

        Self {
            image_size: size,
            preprocessor: Preprocessor::new(&config.preprocess),
            hog,
            edges: EdgeExtractor::new(),
            zones,
            projections: ProjectionExtractor::new(),
            moments: MomentExtractor::new(),
            layout,
        }
    }

    /// Segment lengths of every vector this extractor produces.
    #[inline]
    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    /// Length of every vector this extractor produces.
    #[inline]
    pub fn feature_len(&self) -> usize {
        self.layout.total()
    }

    /// Side length of accepted images.
    #[inline]
    pub fn image_size(&self) -> usize {
        self.image_size
    }

    /// Returns the binarized image the feature stages operate on.
    pub fn preprocess(&self, image: &DigitImage) -> Result<Array2<f64>, ImageError> {
        image.ensure_square(self.image_size)?;
        Ok(self.preprocessor.process(image.pixels()))
    }

    /// Runs the five feature stages on an already binarized image.
    pub fn parts(&self, binary: ArrayView2<'_, f64>) -> FeatureParts {
        let Projections {
            horizontal,
            vertical,
        } = self.projections.extract(binary);

        FeatureParts {
            hog: self.hog.extract(binary),
            edges: self.edges.extract(binary),
            zones: self.zones.extract(binary),
            horizontal,
            vertical,
            hu_moments: self.moments.extract(binary),
        }
    }

    /// Extracts the feature vector of one image.
    pub fn extract(&self, image: &DigitImage) -> Result<FeatureVector, ImageError> {
        let binary = self.preprocess(image)?;
        let parts = self.parts(binary.view());
        debug_assert_eq!(parts.layout(), self.layout);

        let vector = parts.concatenate();
        tracing::debug!(
            foreground = binary.sum(),
            features = vector.len(),
            "Extracted feature vector"
        );
        Ok(vector)
    }

    /// Extracts from a row-major buffer of `image_size^2` raw intensities.
    pub fn extract_flat(&self, values: &[f64]) -> Result<FeatureVector, ImageError> {
        let image = DigitImage::from_flat(values, self.image_size, self.image_size)?;
        self.extract(&image)
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::from_validated(&ExtractorConfig::default())
    }
}
