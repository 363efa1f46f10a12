//! Feature vector assembly.

use super::moments::HU_MOMENTS;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Segments of the feature vector, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Hog,
    Edges,
    Zones,
    HorizontalProjection,
    VerticalProjection,
    HuMoments,
}

impl Segment {
    /// All segments in concatenation order.
    pub const ALL: [Segment; 6] = [
        Segment::Hog,
        Segment::Edges,
        Segment::Zones,
        Segment::HorizontalProjection,
        Segment::VerticalProjection,
        Segment::HuMoments,
    ];

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Segment::Hog => "hog",
            Segment::Edges => "edges",
            Segment::Zones => "zones",
            Segment::HorizontalProjection => "horizontal_projection",
            Segment::VerticalProjection => "vertical_projection",
            Segment::HuMoments => "hu_moments",
        }
    }
}

/// Length of each segment for one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLayout {
    pub hog: usize,
    pub edges: usize,
    pub zones: usize,
    pub horizontal: usize,
    pub vertical: usize,
    pub hu_moments: usize,
}

impl FeatureLayout {
    /// Length of a single segment.
    pub fn len_of(&self, segment: Segment) -> usize {
        match segment {
            Segment::Hog => self.hog,
            Segment::Edges => self.edges,
            Segment::Zones => self.zones,
            Segment::HorizontalProjection => self.horizontal,
            Segment::VerticalProjection => self.vertical,
            Segment::HuMoments => self.hu_moments,
        }
    }

    /// Index range of a segment within the concatenated vector.
    pub fn range(&self, segment: Segment) -> Range<usize> {
        let start: usize = Segment::ALL
            .iter()
            .take_while(|s| **s != segment)
            .map(|s| self.len_of(*s))
            .sum();
        start..start + self.len_of(segment)
    }

    /// Total vector length.
    pub fn total(&self) -> usize {
        Segment::ALL.iter().map(|s| self.len_of(*s)).sum()
    }
}

/// The sub-vectors produced by the feature stages.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureParts {
    pub hog: Vec<f64>,
    pub edges: Vec<f64>,
    pub zones: Vec<f64>,
    pub horizontal: Vec<f64>,
    pub vertical: Vec<f64>,
    pub hu_moments: [f64; HU_MOMENTS],
}

impl FeatureParts {
    /// Layout matching the lengths of these parts.
    pub fn layout(&self) -> FeatureLayout {
        FeatureLayout {
            hog: self.hog.len(),
            edges: self.edges.len(),
            zones: self.zones.len(),
            horizontal: self.horizontal.len(),
            vertical: self.vertical.len(),
            hu_moments: HU_MOMENTS,
        }
    }

    /// Concatenates the parts in output order, without padding.
    pub fn concatenate(self) -> FeatureVector {
        let mut values = Vec::with_capacity(self.layout().total());
        values.extend(self.hog);
        values.extend(self.edges);
        values.extend(self.zones);
        values.extend(self.horizontal);
        values.extend(self.vertical);
        values.extend(self.hu_moments);
        FeatureVector { values }
    }
}

/// Flat feature vector handed to a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    /// Returns the feature values.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values of one segment.
    ///
    /// Returns `None` if the layout does not describe this vector.
    pub fn segment(&self, layout: &FeatureLayout, segment: Segment) -> Option<&[f64]> {
        if layout.total() != self.len() {
            return None;
        }
        self.values.get(layout.range(segment))
    }

    /// Consumes the vector and returns the values.
    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_parts() -> FeatureParts {
        FeatureParts {
            hog: vec![1.0; 3],
            edges: vec![2.0; 4],
            zones: vec![3.0; 2],
            horizontal: vec![4.0; 5],
            vertical: vec![5.0; 5],
            hu_moments: [6.0; HU_MOMENTS],
        }
    }

    #[test]
    fn test_concatenation_order() {
        let parts = synthetic_parts();
        let layout = parts.layout();
        let vector = parts.concatenate();

        assert_eq!(vector.len(), 3 + 4 + 2 + 5 + 5 + 7);
        assert_eq!(vector.len(), layout.total());

        for (expected, segment) in Segment::ALL.iter().enumerate() {
            let values = vector.segment(&layout, *segment).unwrap();
            assert_eq!(values.len(), layout.len_of(*segment));
            assert!(
                values.iter().all(|&v| v == (expected + 1) as f64),
                "segment {} out of place",
                segment.name()
            );
        }

        // No interleaving: values never decrease along the vector.
        assert!(vector.as_slice().windows(2).all(|w| w[0] <= w[1]));

        let values = vector.into_inner();
        assert_eq!(values.len(), layout.total());
        assert_eq!(values[..3], [1.0; 3]);
    }

    #[test]
    fn test_ranges_are_contiguous() {
        let layout = synthetic_parts().layout();
        let mut next = 0;
        for segment in Segment::ALL {
            let range = layout.range(segment);
            assert_eq!(range.start, next);
            next = range.end;
        }
        assert_eq!(next, layout.total());
    }

    #[test]
    fn test_segment_rejects_foreign_layout() {
        let vector = synthetic_parts().concatenate();
        let mut layout = synthetic_parts().layout();
        layout.hog += 1;
        assert!(vector.segment(&layout, Segment::Hog).is_none());
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let vector = FeatureParts {
            hog: vec![0.5],
            edges: vec![],
            zones: vec![],
            horizontal: vec![],
            vertical: vec![],
            hu_moments: [0.0; HU_MOMENTS],
        }
        .concatenate();

        let json = serde_json::to_string(&vector).unwrap();
        assert_eq!(json, "[0.5,0.0,0.0,0.0,0.0,0.0,0.0,0.0]");
    }
}
