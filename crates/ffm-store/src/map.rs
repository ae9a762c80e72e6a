//! Associative-map latent storage for open-ended feature spaces.

use ffm_core::feature::{FeatureId, FieldId};
use hashbrown::HashMap;

use crate::initializer::VInitializer;
use crate::traits::LatentStore;

/// Map-backed latent store for open-ended or streaming feature spaces.
///
/// Latent vectors are keyed by `(feature, field)` and created lazily: the
/// first `get` (or `set`) of an unseen key materializes the vector through
/// the initialization policy. Materializing on read keeps repeated reads of
/// a never-written entry stable even under random policies.
///
/// # Example
///
/// ```
/// use ffm_store::{LatentStore, MapLatentStore, ConstantVInit};
///
/// let mut store = MapLatentStore::new(2, Box::new(ConstantVInit::new(0.1)));
/// assert!(store.is_empty());
/// assert_eq!(store.get(7, 1, 0), 0.1);
/// assert_eq!(store.len(), 1);
/// ```
pub struct MapLatentStore {
    factors: usize,
    init: Box<dyn VInitializer>,
    entries: HashMap<(FeatureId, FieldId), Vec<f32>>,
}

impl MapLatentStore {
    /// Creates an empty map store with the given factor count and
    /// initialization policy.
    pub fn new(factors: usize, init: Box<dyn VInitializer>) -> Self {
        Self {
            factors,
            init,
            entries: HashMap::new(),
        }
    }

    /// Returns the latent vector for `(feature, field)`, materializing it if
    /// absent.
    fn vector(&mut self, feature: FeatureId, field: FieldId) -> &mut Vec<f32> {
        let factors = self.factors;
        self.entries
            .entry((feature, field))
            .or_insert_with(|| self.init.initialize(factors))
    }
}

impl LatentStore for MapLatentStore {
    fn factors(&self) -> usize {
        self.factors
    }

    fn get(&mut self, feature: FeatureId, field: FieldId, f: usize) -> f32 {
        self.vector(feature, field)[f]
    }

    fn set(&mut self, feature: FeatureId, field: FieldId, f: usize, value: f32) {
        self.vector(feature, field)[f] = value;
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initializer::{RandomUniformVInit, ZerosVInit};

    #[test]
    fn test_lazy_materialization() {
        let mut store = MapLatentStore::new(4, Box::new(ZerosVInit));
        assert_eq!(store.len(), 0);
        assert_eq!(store.get(1, 0, 3), 0.0);
        assert_eq!(store.len(), 1);
        store.set(1, 1, 0, 0.5);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_repeated_reads_are_stable_under_random_init() {
        let init = RandomUniformVInit::new(-1.0, 1.0, 11);
        let mut store = MapLatentStore::new(8, Box::new(init));
        let first: Vec<f32> = (0..8).map(|f| store.get(3, 2, f)).collect();
        let second: Vec<f32> = (0..8).map(|f| store.get(3, 2, f)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_set_overwrites() {
        let mut store = MapLatentStore::new(2, Box::new(ZerosVInit));
        store.set(5, 1, 1, 0.3);
        store.set(5, 1, 1, -0.3);
        assert_eq!(store.get(5, 1, 1), -0.3);
        assert_eq!(store.get(5, 1, 0), 0.0);
    }

    #[test]
    fn test_keys_are_field_aware() {
        // The same feature holds distinct vectors per interacting field.
        let mut store = MapLatentStore::new(1, Box::new(ZerosVInit));
        store.set(1, 0, 0, 0.25);
        store.set(1, 1, 0, 0.75);
        assert_eq!(store.get(1, 0, 0), 0.25);
        assert_eq!(store.get(1, 1, 0), 0.75);
    }
}
