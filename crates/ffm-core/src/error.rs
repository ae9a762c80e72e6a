//! Error types for field-aware factorization machine training.
//!
//! Numeric divergence is the single fatal error taxonomy of the online
//! training core: whenever a computed scalar (a prediction, a precomputed
//! aggregate, or an updated parameter) is not finite, the current call fails
//! with a [`NumericDivergence`] carrying enough state to diagnose the cause
//! without reproducing the run. Divergence is never retried or clamped;
//! continuing would silently corrupt the model. It is the caller's decision
//! whether to skip the example or abort the run.

use thiserror::Error;

use crate::feature::{Feature, FeatureId, FieldId};

/// A non-finite value was produced during prediction or update.
///
/// Each variant corresponds to one computation site and carries the full
/// diagnostic context of that site. Divergence usually indicates
/// unnormalized training examples or an unstable learning rate.
#[derive(Debug, Clone, Error)]
pub enum NumericDivergence {
    /// The final prediction sum was not finite.
    #[error(
        "detected {value} in predict; we recommend to normalize training examples. \
         features={features:?}"
    )]
    Prediction {
        /// The offending prediction value.
        value: f64,
        /// The input feature vector that produced it.
        features: Vec<Feature>,
    },

    /// A precomputed per-(feature, field, factor) aggregate was not finite.
    #[error(
        "got {value} for sumV[{feature_index}][field {field}][{factor}]; \
         features={features:?}"
    )]
    Precomputation {
        /// The offending aggregate.
        value: f64,
        /// Index of the feature within the example.
        feature_index: usize,
        /// The interacting field being aggregated.
        field: FieldId,
        /// The factor index.
        factor: usize,
        /// The full example being precomputed.
        features: Vec<Feature>,
    },

    /// An updated latent parameter was not finite.
    #[error(
        "got {next_v} for next V{factor}[{feature}] against field {field}: \
         current_v={current_v}, h={h}, gradient={gradient}, lambda={lambda}, \
         dloss={dloss}, sum_vx={sum_vx}"
    )]
    Update {
        /// The offending next parameter value.
        next_v: f32,
        /// The feature whose parameter was being updated.
        feature: FeatureId,
        /// The factor index.
        factor: usize,
        /// The interacting field addressing the latent vector.
        field: FieldId,
        /// The parameter value before the step.
        current_v: f32,
        /// `value(x) * sum_vx`.
        h: f64,
        /// `dloss * h`.
        gradient: f32,
        /// The L2 coefficient for this factor.
        lambda: f32,
        /// The loss derivative for the example.
        dloss: f64,
        /// The precomputed aggregate fed into the step.
        sum_vx: f64,
    },
}

/// A specialized Result type for training-core operations.
pub type Result<T> = std::result::Result<T, NumericDivergence>;

/// Error during configuration validation or model construction.
#[derive(Debug, Clone, Error)]
#[error("configuration error: {message}")]
pub struct ConfigError {
    /// A description of the configuration error.
    pub message: String,
}

impl ConfigError {
    /// Creates a new configuration error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_divergence_display() {
        let err = NumericDivergence::Prediction {
            value: f64::NAN,
            features: vec![Feature::new(1, 0, 1.0)],
        };
        let msg = err.to_string();
        assert!(msg.contains("NaN"));
        assert!(msg.contains("normalize"));
    }

    #[test]
    fn test_update_divergence_carries_intermediates() {
        let err = NumericDivergence::Update {
            next_v: f32::INFINITY,
            feature: 42,
            factor: 3,
            field: 7,
            current_v: 0.5,
            h: 2.0,
            gradient: 1.0,
            lambda: 0.01,
            dloss: 1.0,
            sum_vx: 2.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("V3[42]"));
        assert!(msg.contains("h=2"));
        assert!(msg.contains("lambda=0.01"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::new("factor count must be positive");
        assert_eq!(
            err.to_string(),
            "configuration error: factor count must be positive"
        );
    }
}
