//! Metrics collection and registry.

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of a batch run for metrics update.
#[derive(Debug, Clone, Default)]
pub struct ExtractionSnapshot {
    /// Images turned into feature vectors so far.
    pub processed: u64,
    /// Images skipped because of decode or shape errors.
    pub rejected: u64,
    /// Length of the produced vectors.
    pub vector_length: usize,
    /// Foreground pixel count of the most recent binarized image.
    pub foreground_pixels: Option<u64>,
}

/// Prometheus metrics registry for feature extraction runs.
pub struct MetricsRegistry {
    registry: Registry,
    processed_total: IntCounter,
    rejected_total: IntCounter,
    vector_length: IntGauge,
    foreground_pixels: IntGauge,
}

impl MetricsRegistry {
    /// Creates a new registry with all extraction metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let processed_total = IntCounter::new(
            "digit_features_images_processed_total",
            "Total number of images turned into feature vectors",
        )?;
        let rejected_total = IntCounter::new(
            "digit_features_images_rejected_total",
            "Total number of images rejected before extraction",
        )?;
        let vector_length = IntGauge::new(
            "digit_features_vector_length",
            "Length of the produced feature vectors",
        )?;
        let foreground_pixels = IntGauge::new(
            "digit_features_foreground_pixels",
            "Foreground pixels in the most recent binarized image",
        )?;

        registry.register(Box::new(processed_total.clone()))?;
        registry.register(Box::new(rejected_total.clone()))?;
        registry.register(Box::new(vector_length.clone()))?;
        registry.register(Box::new(foreground_pixels.clone()))?;

        Ok(Self {
            registry,
            processed_total,
            rejected_total,
            vector_length,
            foreground_pixels,
        })
    }

    /// Updates all metrics from a snapshot.
    pub fn update(&self, snapshot: &ExtractionSnapshot) {
        // Counters only move forward by the difference.
        let processed = self.processed_total.get();
        if snapshot.processed > processed {
            self.processed_total.inc_by(snapshot.processed - processed);
        }
        let rejected = self.rejected_total.get();
        if snapshot.rejected > rejected {
            self.rejected_total.inc_by(snapshot.rejected - rejected);
        }

        self.vector_length.set(snapshot.vector_length as i64);
        if let Some(foreground) = snapshot.foreground_pixels {
            self.foreground_pixels.set(foreground as i64);
        }
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
