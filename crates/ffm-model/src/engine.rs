//! The FFM prediction engine.

use ffm_core::error::{ConfigError, NumericDivergence, Result};
use ffm_core::feature::{Feature, FeatureId};
use ffm_core::params::FfmConfig;
use ffm_store::LatentStore;
use hashbrown::HashMap;

/// Bias and linear weights owned by the enclosing factorization-machine
/// base, read-only from the FFM core's perspective.
pub trait BaseWeights {
    /// Returns the bias term `w0`.
    fn bias(&self) -> f64;

    /// Returns the linear weight `W(feature)`.
    fn weight(&self, feature: FeatureId) -> f64;
}

/// A simple map-backed [`BaseWeights`] implementation.
///
/// # Example
///
/// ```
/// use ffm_model::{BaseWeights, LinearTerms};
///
/// let mut base = LinearTerms::new(0.5);
/// base.set_weight(1, 0.25);
/// assert_eq!(base.bias(), 0.5);
/// assert_eq!(base.weight(1), 0.25);
/// assert_eq!(base.weight(2), 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LinearTerms {
    bias: f64,
    weights: HashMap<FeatureId, f64>,
}

impl LinearTerms {
    /// Creates linear terms with the given bias and no weights.
    pub fn new(bias: f64) -> Self {
        Self {
            bias,
            weights: HashMap::new(),
        }
    }

    /// Sets the weight for a feature.
    pub fn set_weight(&mut self, feature: FeatureId, weight: f64) {
        self.weights.insert(feature, weight);
    }
}

impl BaseWeights for LinearTerms {
    fn bias(&self) -> f64 {
        self.bias
    }

    fn weight(&self, feature: FeatureId) -> f64 {
        self.weights.get(&feature).copied().unwrap_or(0.0)
    }
}

/// The online-learning core of a field-aware factorization machine.
///
/// The engine holds only the hyperparameters fixed at construction (the
/// factor count `k` and the per-factor L2 coefficients); the latent
/// parameters themselves live in a [`LatentStore`] the engine borrows per
/// call. One engine instance is single-threaded: prediction and update for
/// one example must complete before the next example is processed, because
/// updates mutate the same store predictions read.
///
/// # Example
///
/// ```
/// use ffm_core::params::{FfmConfig, InitializerConfig};
/// use ffm_core::Feature;
/// use ffm_model::{FfmEngine, LinearTerms};
/// use ffm_store::build_store;
///
/// let config = FfmConfig::builder(1)
///     .initializer(InitializerConfig::zeros())
///     .build()
///     .unwrap();
/// let engine = FfmEngine::new(&config).unwrap();
/// let mut store = build_store(&config).unwrap();
///
/// let x = vec![Feature::new(1, 0, 1.0), Feature::new(2, 1, 1.0)];
/// store.set(1, 1, 0, 0.3);
/// store.set(2, 0, 0, 0.4);
///
/// let y = engine.predict(store.as_mut(), &LinearTerms::new(0.0), &x).unwrap();
/// assert!((y - 0.12).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct FfmEngine {
    factors: usize,
    lambda: Vec<f32>,
}

impl FfmEngine {
    /// Creates an engine from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the factor count is zero or the lambda
    /// vector length does not match it.
    pub fn new(config: &FfmConfig) -> std::result::Result<Self, ConfigError> {
        Self::from_parts(config.factors(), config.lambda().to_vec())
    }

    /// Creates an engine from a factor count and per-factor L2 coefficients.
    pub fn from_parts(
        factors: usize,
        lambda: Vec<f32>,
    ) -> std::result::Result<Self, ConfigError> {
        if factors == 0 {
            return Err(ConfigError::new("factor count must be positive"));
        }
        if lambda.len() != factors {
            return Err(ConfigError::new(format!(
                "lambda length {} does not match factor count {}",
                lambda.len(),
                factors
            )));
        }
        Ok(Self { factors, lambda })
    }

    /// Returns the factor count `k`.
    #[inline]
    pub fn factors(&self) -> usize {
        self.factors
    }

    /// Returns the L2 coefficient for factor `f`.
    #[inline]
    pub fn lambda(&self, f: usize) -> f32 {
        self.lambda[f]
    }

    /// Computes the model prediction for one example.
    ///
    /// The prediction is `w0 + Σ W(x_i)·value(x_i) + Σ_f Σ_{i<j}
    /// V[x_i][field(x_j)][f] · V[x_j][field(x_i)][f] · value(x_i) ·
    /// value(x_j)`. Note the asymmetry of the pairwise term: each feature's
    /// latent vector is addressed by the *other* feature's field. A feature
    /// never interacts with itself. Cost is `O(k·n²)`; no linear-time
    /// reduction exists for the field-aware formulation.
    ///
    /// # Errors
    ///
    /// Returns [`NumericDivergence::Prediction`] with the input feature
    /// vector if the final sum is not finite.
    pub fn predict(
        &self,
        store: &mut dyn LatentStore,
        base: &dyn BaseWeights,
        x: &[Feature],
    ) -> Result<f64> {
        // w0
        let mut ret = base.bias();
        // W
        for e in x {
            ret += base.weight(e.id()) * e.value();
        }
        // V
        for f in 0..self.factors {
            for i in 0..x.len() {
                for j in (i + 1)..x.len() {
                    let (ei, ej) = (&x[i], &x[j]);
                    let vijf = store.get(ei.id(), ej.field(), f) as f64;
                    let vjif = store.get(ej.id(), ei.field(), f) as f64;
                    ret += vijf * vjif * ei.value() * ej.value();
                }
            }
        }
        if !ret.is_finite() {
            return Err(NumericDivergence::Prediction {
                value: ret,
                features: x.to_vec(),
            });
        }
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffm_store::{MapLatentStore, ZerosVInit};

    fn zero_store(factors: usize) -> MapLatentStore {
        MapLatentStore::new(factors, Box::new(ZerosVInit))
    }

    #[test]
    fn test_from_parts_validation() {
        assert!(FfmEngine::from_parts(0, vec![]).is_err());
        assert!(FfmEngine::from_parts(2, vec![0.01]).is_err());
        assert!(FfmEngine::from_parts(2, vec![0.01, 0.01]).is_ok());
    }

    #[test]
    fn test_predict_bias_and_linear_only() {
        let engine = FfmEngine::from_parts(1, vec![0.0]).unwrap();
        let mut store = zero_store(1);

        let mut base = LinearTerms::new(1.0);
        base.set_weight(1, 2.0);
        base.set_weight(2, -1.0);

        let x = vec![Feature::new(1, 0, 3.0), Feature::new(2, 1, 4.0)];
        let y = engine.predict(&mut store, &base, &x).unwrap();
        // 1.0 + 2.0*3.0 + (-1.0)*4.0, all V are zero
        assert!((y - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_predict_two_feature_interaction() {
        let engine = FfmEngine::from_parts(1, vec![0.0]).unwrap();
        let mut store = zero_store(1);
        store.set(1, 1, 0, 0.3);
        store.set(2, 0, 0, 0.4);

        let x = vec![Feature::new(1, 0, 1.0), Feature::new(2, 1, 1.0)];
        let y = engine
            .predict(&mut store, &LinearTerms::new(0.0), &x)
            .unwrap();
        assert!((y - 0.12).abs() < 1e-9);
    }

    #[test]
    fn test_predict_uses_partner_field_not_own() {
        let engine = FfmEngine::from_parts(1, vec![0.0]).unwrap();
        let mut store = zero_store(1);
        // Correct asymmetric lookups.
        store.set(1, 1, 0, 0.3);
        store.set(2, 0, 0, 0.4);
        // Decoys at own-field addresses; must not contribute.
        store.set(1, 0, 0, 0.9);
        store.set(2, 1, 0, 0.7);

        let x = vec![Feature::new(1, 0, 1.0), Feature::new(2, 1, 1.0)];
        let y = engine
            .predict(&mut store, &LinearTerms::new(0.0), &x)
            .unwrap();
        assert!((y - 0.12).abs() < 1e-9);
        assert!((y - 0.9 * 0.7).abs() > 1e-3);
    }

    #[test]
    fn test_predict_is_idempotent() {
        let engine = FfmEngine::from_parts(2, vec![0.01, 0.01]).unwrap();
        let mut store = zero_store(2);
        store.set(1, 1, 0, 0.1);
        store.set(1, 1, 1, 0.2);
        store.set(2, 0, 0, -0.3);
        store.set(2, 0, 1, 0.4);

        let base = LinearTerms::new(0.5);
        let x = vec![Feature::new(1, 0, 1.0), Feature::new(2, 1, 2.0)];

        let first = engine.predict(&mut store, &base, &x).unwrap();
        let second = engine.predict(&mut store, &base, &x).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_predict_divergence_carries_features() {
        let engine = FfmEngine::from_parts(1, vec![0.0]).unwrap();
        let mut store = zero_store(1);
        store.set(1, 1, 0, 2.0);
        store.set(2, 0, 0, 2.0);

        let x = vec![Feature::new(1, 0, f64::MAX), Feature::new(2, 1, f64::MAX)];
        let err = engine
            .predict(&mut store, &LinearTerms::new(0.0), &x)
            .unwrap_err();
        match err {
            NumericDivergence::Prediction { value, features } => {
                assert!(!value.is_finite());
                assert_eq!(features.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
