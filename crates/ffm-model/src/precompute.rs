//! Per-example precomputation for the gradient pass.
//!
//! Before applying updates, the engine aggregates, for every feature and
//! every distinct field of the example, the latent contributions of all
//! same-field partner features. The update pass then reads each aggregate
//! in O(1) instead of rescanning all pairs, bringing one example's update
//! cost down from `O(k·n²)` per parameter to `O(n · distinct_fields · k)`
//! overall.

use ffm_core::error::{NumericDivergence, Result};
use ffm_core::feature::{Feature, FieldId};
use ffm_store::LatentStore;

use crate::engine::FfmEngine;

/// The precomputation table of one example: one aggregate per
/// `(feature index, field, factor)`.
///
/// Values live in a flat buffer of shape `[n][fields][k]`, with the field
/// axis following the order of the field list the table was built with.
#[derive(Debug, Clone)]
pub struct SumTable {
    values: Vec<f64>,
    fields: Vec<FieldId>,
    factors: usize,
}

impl SumTable {
    /// Returns the aggregate for feature index `i`, field position `a`
    /// (an index into [`SumTable::fields`]), and factor `f`.
    #[inline]
    pub fn get(&self, i: usize, a: usize, f: usize) -> f64 {
        self.values[(i * self.fields.len() + a) * self.factors + f]
    }

    /// Returns the field list this table was built against.
    #[inline]
    pub fn fields(&self) -> &[FieldId] {
        &self.fields
    }

    /// Returns the position of `field` in the field list, if present.
    pub fn field_index(&self, field: FieldId) -> Option<usize> {
        self.fields.iter().position(|&a| a == field)
    }
}

impl FfmEngine {
    /// Builds the precomputation table for one example.
    ///
    /// For every feature index `i`, field `a` in `fields`, and factor `f`,
    /// the entry is the sum over all features `e` of the example with
    /// `field(e) == a` and `id(e) != id(x_i)` of
    /// `V[e][field(x_i)][f] · value(x_i)`. Self-contributions are always
    /// excluded, by feature identifier.
    ///
    /// # Errors
    ///
    /// Returns [`NumericDivergence::Precomputation`] with the offending
    /// indices and the full example if any aggregate is not finite.
    pub fn sum_vfx(
        &self,
        store: &mut dyn LatentStore,
        x: &[Feature],
        fields: &[FieldId],
    ) -> Result<SumTable> {
        let k = self.factors();
        let mut values = Vec::with_capacity(x.len() * fields.len() * k);
        for i in 0..x.len() {
            for &a in fields {
                for f in 0..k {
                    values.push(self.sum_vfx_one(store, x, i, a, f)?);
                }
            }
        }
        Ok(SumTable {
            values,
            fields: fields.to_vec(),
            factors: k,
        })
    }

    /// One aggregate: all field-`a` partners of `x[i]` at factor `f`.
    fn sum_vfx_one(
        &self,
        store: &mut dyn LatentStore,
        x: &[Feature],
        i: usize,
        a: FieldId,
        f: usize,
    ) -> Result<f64> {
        let xi = &x[i];
        let mut ret = 0.0f64;
        for e in x {
            if e.id() == xi.id() {
                continue;
            }
            if e.field() == a {
                let vjf = store.get(e.id(), xi.field(), f) as f64;
                ret += vjf * xi.value();
            }
        }
        if !ret.is_finite() {
            return Err(NumericDivergence::Precomputation {
                value: ret,
                feature_index: i,
                field: a,
                factor: f,
                features: x.to_vec(),
            });
        }
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffm_core::feature::distinct_fields;
    use ffm_store::{MapLatentStore, ZerosVInit};

    fn zero_store(factors: usize) -> MapLatentStore {
        MapLatentStore::new(factors, Box::new(ZerosVInit))
    }

    #[test]
    fn test_sum_table_layout() {
        let engine = FfmEngine::from_parts(2, vec![0.0, 0.0]).unwrap();
        let mut store = zero_store(2);
        store.set(2, 0, 0, 0.5);
        store.set(2, 0, 1, 0.25);

        let x = vec![Feature::new(1, 0, 2.0), Feature::new(2, 1, 1.0)];
        let fields = distinct_fields(&x);
        let table = engine.sum_vfx(&mut store, &x, &fields).unwrap();

        assert_eq!(table.fields(), &[0, 1]);
        assert_eq!(table.field_index(1), Some(1));
        assert_eq!(table.field_index(9), None);

        // Feature 0 against field 1: partner is feature 2, addressed by
        // field(x_0) = 0, scaled by value(x_0) = 2.0.
        assert!((table.get(0, 1, 0) - 1.0).abs() < 1e-12);
        assert!((table.get(0, 1, 1) - 0.5).abs() < 1e-12);
        // No partner in feature 0's own field.
        assert!((table.get(0, 0, 0)).abs() < 1e-12);
    }

    #[test]
    fn test_self_exclusion() {
        let engine = FfmEngine::from_parts(1, vec![0.0]).unwrap();
        let mut store = zero_store(1);
        // Feature 1 shares field 0 with feature 3; its own entry must not
        // contribute to its field-0 aggregate.
        store.set(1, 0, 0, 100.0);
        store.set(3, 0, 0, 0.5);

        let x = vec![Feature::new(1, 0, 1.0), Feature::new(3, 0, 1.0)];
        let table = engine.sum_vfx(&mut store, &x, &[0]).unwrap();

        // Aggregate for feature 1 against field 0 only sees feature 3.
        assert!((table.get(0, 0, 0) - 0.5).abs() < 1e-12);
        // And vice versa.
        assert!((table.get(1, 0, 0) - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_matches_brute_force_rescan() {
        let engine = FfmEngine::from_parts(3, vec![0.0; 3]).unwrap();
        let mut store = zero_store(3);

        // A mixed example: several features, uneven field distribution.
        let x = vec![
            Feature::new(1, 0, 1.0),
            Feature::new(2, 1, 0.5),
            Feature::new(3, 1, 2.0),
            Feature::new(4, 2, -1.0),
            Feature::new(5, 0, 0.25),
        ];
        // Deterministic pseudo-random parameters.
        for e in &x {
            for field in 0..3u32 {
                for f in 0..3 {
                    let v = ((e.id() as f32) * 0.17 - (field as f32) * 0.31 + (f as f32) * 0.07)
                        .sin();
                    store.set(e.id(), field, f, v);
                }
            }
        }

        let fields = distinct_fields(&x);
        let table = engine.sum_vfx(&mut store, &x, &fields).unwrap();

        for (i, xi) in x.iter().enumerate() {
            for (a_idx, &a) in fields.iter().enumerate() {
                for f in 0..3 {
                    let mut expected = 0.0f64;
                    for e in &x {
                        if e.id() != xi.id() && e.field() == a {
                            expected += store.get(e.id(), xi.field(), f) as f64 * xi.value();
                        }
                    }
                    assert!(
                        (table.get(i, a_idx, f) - expected).abs() < 1e-12,
                        "mismatch at i={i}, a={a}, f={f}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_precomputation_divergence_context() {
        let engine = FfmEngine::from_parts(1, vec![0.0]).unwrap();
        let mut store = zero_store(1);
        store.set(2, 0, 0, f32::MAX);

        let x = vec![Feature::new(1, 0, 1e300), Feature::new(2, 1, 1.0)];
        let err = engine.sum_vfx(&mut store, &x, &[0, 1]).unwrap_err();
        match err {
            NumericDivergence::Precomputation {
                value,
                feature_index,
                field,
                features,
                ..
            } => {
                assert!(!value.is_finite());
                assert_eq!(feature_index, 0);
                assert_eq!(field, 1);
                assert_eq!(features.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
