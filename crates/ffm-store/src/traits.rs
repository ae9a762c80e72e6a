//! Core trait for latent parameter storage.

use ffm_core::feature::{FeatureId, FieldId};

/// Storage capability for the field-aware latent factor matrix V.
///
/// A latent store maps `(feature, interacting field, factor index)` to one
/// scalar. The training core only borrows read/write access through this
/// trait; it never owns the store and performs no locking. The store
/// guarantees read-your-writes within a single caller and nothing more —
/// the core is single-threaded per model instance.
///
/// `get` is defined for every combination the model may query: entries that
/// were never written observe the initialization policy the store was
/// constructed with. The map-backed variant materializes entries on first
/// read so that repeated reads of a never-written entry are stable, which is
/// why `get` takes `&mut self`.
///
/// # Example
///
/// ```
/// use ffm_store::{LatentStore, MapLatentStore, ZerosVInit};
///
/// let mut store = MapLatentStore::new(4, Box::new(ZerosVInit));
/// assert_eq!(store.get(1, 0, 2), 0.0);
/// store.set(1, 0, 2, 0.25);
/// assert_eq!(store.get(1, 0, 2), 0.25);
/// ```
pub trait LatentStore {
    /// Returns the factor count `k` this store was built for.
    fn factors(&self) -> usize;

    /// Returns `V[feature][field][f]`.
    ///
    /// Never-written entries return the initialization-policy value.
    fn get(&mut self, feature: FeatureId, field: FieldId, f: usize) -> f32;

    /// Unconditionally overwrites `V[feature][field][f]`.
    fn set(&mut self, feature: FeatureId, field: FieldId, f: usize, value: f32);

    /// Returns the number of (feature, field) latent vectors currently held.
    fn len(&self) -> usize;

    /// Returns whether the store holds no latent vectors.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
