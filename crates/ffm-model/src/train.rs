//! Per-example training driver.

use ffm_core::error::Result;
use ffm_core::feature::{distinct_fields, Feature};
use ffm_store::LatentStore;
use tracing::debug;

use crate::engine::FfmEngine;

impl FfmEngine {
    /// Applies one full SGD step for a training example.
    ///
    /// The precomputation table is built once, then [`FfmEngine::update_v`]
    /// runs for every (feature, field, factor) combination whose pair terms
    /// contributed to the prediction: each feature is updated against every
    /// distinct field carried by at least one *other* feature of the
    /// example. The caller computes `dloss` externally from the prediction
    /// and supplies the step size `eta` from its learning-rate policy.
    ///
    /// The whole step must complete before the next example's prediction is
    /// computed; updates mutate the same store predictions read.
    ///
    /// # Errors
    ///
    /// Propagates any [`NumericDivergence`](ffm_core::NumericDivergence)
    /// from the precomputation or update passes. A failed step aborts the
    /// example immediately; already-applied per-parameter updates remain in
    /// the store, and the caller decides whether to skip the example or
    /// abort the run.
    pub fn train_example(
        &self,
        store: &mut dyn LatentStore,
        x: &[Feature],
        dloss: f64,
        eta: f32,
    ) -> Result<()> {
        let fields = distinct_fields(x);
        let table = self.sum_vfx(store, x, &fields)?;
        for (i, xi) in x.iter().enumerate() {
            for (a_idx, &a) in fields.iter().enumerate() {
                if !x.iter().any(|e| e.id() != xi.id() && e.field() == a) {
                    continue;
                }
                for f in 0..self.factors() {
                    self.update_v(store, dloss, xi, f, table.get(i, a_idx, f), eta, a)?;
                }
            }
        }
        debug!(
            features = x.len(),
            fields = fields.len(),
            factors = self.factors(),
            dloss,
            eta = f64::from(eta),
            "applied ffm sgd step"
        );
        Ok(())
    }
}
