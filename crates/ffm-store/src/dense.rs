//! Dense indexed latent storage for bounded feature/field universes.

use ffm_core::feature::{FeatureId, FieldId};

use crate::initializer::VInitializer;
use crate::traits::LatentStore;

/// Dense latent store over a bounded, pre-known universe.
///
/// Parameters live in one flat `Vec<f32>` of length
/// `num_features * num_fields * factors`, every vector eagerly seeded by
/// the initialization policy at construction. Feature identifiers are
/// treated as indices in `0..num_features` and field identifiers as
/// indices in `0..num_fields`; querying outside those bounds is a caller
/// contract breach and panics.
///
/// # Example
///
/// ```
/// use ffm_store::{DenseLatentStore, LatentStore, ZerosVInit};
///
/// let mut store = DenseLatentStore::new(100, 4, 8, &ZerosVInit);
/// assert_eq!(store.get(42, 3, 7), 0.0);
/// store.set(42, 3, 7, -0.5);
/// assert_eq!(store.get(42, 3, 7), -0.5);
/// ```
#[derive(Debug, Clone)]
pub struct DenseLatentStore {
    num_features: usize,
    num_fields: usize,
    factors: usize,
    values: Vec<f32>,
}

impl DenseLatentStore {
    /// Creates a dense store, eagerly seeding every latent vector.
    pub fn new(
        num_features: usize,
        num_fields: usize,
        factors: usize,
        init: &dyn VInitializer,
    ) -> Self {
        let mut values = Vec::with_capacity(num_features * num_fields * factors);
        for _ in 0..num_features * num_fields {
            values.extend(init.initialize(factors));
        }
        Self {
            num_features,
            num_fields,
            factors,
            values,
        }
    }

    /// Returns the feature bound.
    #[inline]
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Returns the field bound.
    #[inline]
    pub fn num_fields(&self) -> usize {
        self.num_fields
    }

    #[inline]
    fn offset(&self, feature: FeatureId, field: FieldId, f: usize) -> usize {
        assert!(
            feature >= 0 && (feature as usize) < self.num_features,
            "feature {} outside dense bound {}",
            feature,
            self.num_features
        );
        assert!(
            (field as usize) < self.num_fields,
            "field {} outside dense bound {}",
            field,
            self.num_fields
        );
        assert!(f < self.factors, "factor {} outside k={}", f, self.factors);
        (feature as usize * self.num_fields + field as usize) * self.factors + f
    }
}

impl LatentStore for DenseLatentStore {
    fn factors(&self) -> usize {
        self.factors
    }

    fn get(&mut self, feature: FeatureId, field: FieldId, f: usize) -> f32 {
        self.values[self.offset(feature, field, f)]
    }

    fn set(&mut self, feature: FeatureId, field: FieldId, f: usize, value: f32) {
        let offset = self.offset(feature, field, f);
        self.values[offset] = value;
    }

    fn len(&self) -> usize {
        self.num_features * self.num_fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initializer::{ConstantVInit, ZerosVInit};

    #[test]
    fn test_eager_initialization() {
        let mut store = DenseLatentStore::new(3, 2, 4, &ConstantVInit::new(0.25));
        for feature in 0..3 {
            for field in 0..2 {
                for f in 0..4 {
                    assert_eq!(store.get(feature, field, f), 0.25);
                }
            }
        }
        assert_eq!(store.len(), 6);
    }

    #[test]
    fn test_set_then_get() {
        let mut store = DenseLatentStore::new(10, 4, 2, &ZerosVInit);
        store.set(9, 3, 1, 1.5);
        assert_eq!(store.get(9, 3, 1), 1.5);
        // Neighbouring slots untouched.
        assert_eq!(store.get(9, 3, 0), 0.0);
        assert_eq!(store.get(9, 2, 1), 0.0);
    }

    #[test]
    #[should_panic(expected = "outside dense bound")]
    fn test_out_of_bounds_feature_panics() {
        let mut store = DenseLatentStore::new(2, 2, 1, &ZerosVInit);
        store.get(2, 0, 0);
    }

    #[test]
    #[should_panic(expected = "outside dense bound")]
    fn test_negative_feature_panics() {
        let mut store = DenseLatentStore::new(2, 2, 1, &ZerosVInit);
        store.get(-1, 0, 0);
    }
}
