//! Feature and field types for field-aware factorization machines.
//!
//! A training example is an ordered sequence of [`Feature`] values, each
//! carrying an opaque feature identifier, the identifier of the field
//! (categorical group) it belongs to, and a numeric value. Fields are what
//! make the model *field-aware*: every feature keeps one latent vector per
//! interacting field rather than a single shared vector.

use serde::{Deserialize, Serialize};

/// An opaque feature identifier.
///
/// Features within one example are unique by identifier; identity comparison
/// is what excludes self-interaction during prediction and precomputation.
pub type FeatureId = i64;

/// An opaque field identifier (e.g. "user", "item", "context").
///
/// The number of distinct fields per example is small relative to the number
/// of features.
pub type FieldId = u32;

/// One non-zero input dimension of a training example.
///
/// # Examples
///
/// ```
/// use ffm_core::feature::Feature;
///
/// let feature = Feature::new(42, 1, 1.0);
/// assert_eq!(feature.id(), 42);
/// assert_eq!(feature.field(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// The unique identifier of this feature.
    id: FeatureId,

    /// The field (categorical group) this feature belongs to.
    field: FieldId,

    /// The feature value. 1.0 for categorical one-hot features, or a real
    /// value for numeric features.
    value: f64,
}

impl Feature {
    /// Creates a new feature.
    pub fn new(id: FeatureId, field: FieldId, value: f64) -> Self {
        Self { id, field, value }
    }

    /// Returns the feature identifier.
    #[inline]
    pub fn id(&self) -> FeatureId {
        self.id
    }

    /// Returns the field identifier.
    #[inline]
    pub fn field(&self) -> FieldId {
        self.field
    }

    /// Returns the feature value.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Returns the distinct fields of an example, in order of first appearance.
///
/// The gradient pass precomputes one aggregate per (feature, field) pair;
/// this is the field axis of that table.
///
/// # Examples
///
/// ```
/// use ffm_core::feature::{distinct_fields, Feature};
///
/// let x = vec![
///     Feature::new(1, 7, 1.0),
///     Feature::new(2, 3, 1.0),
///     Feature::new(3, 7, 0.5),
/// ];
/// assert_eq!(distinct_fields(&x), vec![7, 3]);
/// ```
pub fn distinct_fields(x: &[Feature]) -> Vec<FieldId> {
    let mut fields = Vec::new();
    for e in x {
        if !fields.contains(&e.field()) {
            fields.push(e.field());
        }
    }
    fields
}
