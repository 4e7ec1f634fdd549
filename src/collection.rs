//! Per-sequence feature collections.

use crate::feature::{Bound, Feature, FeatureMetadata};

/// Destination for assembled features.
///
/// The reader only ever calls [`FeatureSink::add`]; any container that can
/// accept a feature's bounds and metadata can be filled from a GFF3 stream.
pub trait FeatureSink {
    /// Add one feature. Called once per data line, with no deduplication.
    fn add(&mut self, bounds: Vec<Bound>, metadata: FeatureMetadata);
}

/// Features belonging to one sequence, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureCollection {
    features: Vec<Feature>,
}

impl FeatureCollection {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collection with room for `capacity` features.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            features: Vec::with_capacity(capacity),
        }
    }

    /// Add a feature with the given bounds.
    pub fn add(&mut self, bounds: Vec<Bound>, metadata: FeatureMetadata) {
        self.features.push(Feature::new(bounds, metadata));
    }

    /// Iterate features in insertion order.
    pub fn features(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Get a feature by insertion index.
    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Total number of bounds across all features (one output line each).
    pub fn bound_count(&self) -> usize {
        self.features.iter().map(|f| f.bounds.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FeatureSink for FeatureCollection {
    fn add(&mut self, bounds: Vec<Bound>, metadata: FeatureMetadata) {
        FeatureCollection::add(self, bounds, metadata);
    }
}

impl FeatureSink for Vec<Feature> {
    fn add(&mut self, bounds: Vec<Bound>, metadata: FeatureMetadata) {
        self.push(Feature::new(bounds, metadata));
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}
