//! The per-parameter SGD update rule.

use ffm_core::error::{NumericDivergence, Result};
use ffm_core::feature::{Feature, FieldId};
use ffm_store::LatentStore;

use crate::engine::FfmEngine;

impl FfmEngine {
    /// Applies one L2-regularized SGD step to `V[x][field][f]`.
    ///
    /// Given the example's loss derivative `dloss`, the precomputed
    /// aggregate `sum_vx` for this (feature, field, factor), and the step
    /// size `eta`:
    ///
    /// ```text
    /// h        = value(x) * sum_vx
    /// gradient = dloss * h
    /// next_v   = current_v - eta * (gradient + 2 * lambda[f] * current_v)
    /// ```
    ///
    /// The `2 *` comes from differentiating the L2 penalty. On success the
    /// new value is written back through the store; updates for distinct
    /// (feature, field, factor) combinations computed from the same
    /// precomputation table are independent of each other.
    ///
    /// # Errors
    ///
    /// Returns [`NumericDivergence::Update`] carrying every intermediate
    /// quantity if `next_v` is not finite. Divergence is unrecoverable for
    /// that parameter and is never written back.
    pub fn update_v(
        &self,
        store: &mut dyn LatentStore,
        dloss: f64,
        x: &Feature,
        f: usize,
        sum_vx: f64,
        eta: f32,
        field: FieldId,
    ) -> Result<()> {
        let current_v = store.get(x.id(), field, f);
        let h = x.value() * sum_vx;
        let gradient = (dloss * h) as f32;
        let lambda = self.lambda(f);
        let next_v = current_v - eta * (gradient + 2.0 * lambda * current_v);
        if !next_v.is_finite() {
            return Err(NumericDivergence::Update {
                next_v,
                feature: x.id(),
                factor: f,
                field,
                current_v,
                h,
                gradient,
                lambda,
                dloss,
                sum_vx,
            });
        }
        store.set(x.id(), field, f, next_v);
        Ok(())
    }
}
