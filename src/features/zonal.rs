//! Zonal density over a grid of square regions.

use crate::digit::GeometryConfig;
use ndarray::{s, ArrayView2};

/// Sums pixels inside non-overlapping `zone_size x zone_size` regions.
///
/// Zones are visited row-major: outer loop over the zone row, inner loop
/// over the zone column. The default 28x28 geometry yields 16 sums.
#[derive(Debug, Clone)]
pub struct ZonalDensityExtractor {
    zone_size: usize,
    grid: usize,
}

impl ZonalDensityExtractor {
    pub fn new(geometry: &GeometryConfig) -> Self {
        Self {
            zone_size: geometry.zone_size,
            grid: geometry.zone_grid(),
        }
    }

    /// Number of zones produced.
    #[inline]
    pub fn output_len(&self) -> usize {
        self.grid * self.grid
    }

    pub fn extract(&self, image: ArrayView2<'_, f64>) -> Vec<f64> {
        let size = self.zone_size;
        let mut zones = Vec::with_capacity(self.output_len());
        for zr in 0..self.grid {
            for zc in 0..self.grid {
                let (r, c) = (zr * size, zc * size);
                zones.push(image.slice(s![r..r + size, c..c + size]).sum());
            }
        }
        zones
    }
}

impl Default for ZonalDensityExtractor {
    fn default() -> Self {
        Self::new(&GeometryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_all_ones_partition() {
        let image = Array2::from_elem((28, 28), 1.0);
        let zones = ZonalDensityExtractor::default().extract(image.view());

        assert_eq!(zones.len(), 16);
        assert!(zones.iter().all(|&z| z == 49.0));
        assert_eq!(zones.iter().sum::<f64>(), 784.0);
    }

    #[test]
    fn test_row_major_order() {
        let mut image = Array2::<f64>::zeros((28, 28));
        // Zone row 0, column 3.
        image[[0, 21]] = 1.0;
        // Zone row 2, column 1.
        image[[14, 13]] = 2.0;

        let zones = ZonalDensityExtractor::default().extract(image.view());
        assert_eq!(zones[3], 1.0);
        assert_eq!(zones[2 * 4 + 1], 2.0);
        assert_eq!(zones.iter().sum::<f64>(), 3.0);
    }

    #[test]
    fn test_custom_geometry() {
        let geometry = GeometryConfig {
            image_size: 28,
            zone_size: 14,
        };
        let image = Array2::from_elem((28, 28), 1.0);
        let zones = ZonalDensityExtractor::new(&geometry).extract(image.view());
        assert_eq!(zones, vec![196.0; 4]);
    }
}
