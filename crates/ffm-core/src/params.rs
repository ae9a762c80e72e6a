//! Configuration types for field-aware factorization machine training.
//!
//! This module provides:
//!
//! - [`FfmConfig`]: hyperparameters fixed at model construction (factor
//!   count, per-factor L2 coefficients, initialization policy, parameter
//!   storage variant).
//! - [`InitializerConfig`]: configuration for latent-vector initialization.
//! - [`StoreConfig`]: selection between the two parameter storage variants.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for latent-vector initialization.
///
/// New latent vectors are seeded by the configured policy: eagerly for
/// dense storage, on first read for map storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InitializerConfig {
    /// Initialize all factors to zero.
    Zeros,

    /// Initialize all factors to a constant value.
    Constant {
        /// The constant value.
        value: f32,
    },

    /// Initialize with uniform random values in `[min, max)`.
    RandomUniform {
        /// The minimum value (inclusive).
        min: f32,
        /// The maximum value (exclusive).
        max: f32,
    },

    /// Initialize with normally distributed random values.
    RandomNormal {
        /// The mean of the distribution.
        mean: f32,
        /// The standard deviation of the distribution.
        stddev: f32,
    },
}

impl Default for InitializerConfig {
    fn default() -> Self {
        InitializerConfig::RandomUniform {
            min: -0.05,
            max: 0.05,
        }
    }
}

impl InitializerConfig {
    /// Creates a zeros initializer config.
    pub fn zeros() -> Self {
        InitializerConfig::Zeros
    }

    /// Creates a constant initializer config.
    pub fn constant(value: f32) -> Self {
        InitializerConfig::Constant { value }
    }

    /// Creates a uniform random initializer config.
    pub fn uniform(min: f32, max: f32) -> Self {
        InitializerConfig::RandomUniform { min, max }
    }

    /// Creates a normal (gaussian) random initializer config.
    pub fn normal(mean: f32, stddev: f32) -> Self {
        InitializerConfig::RandomNormal { mean, stddev }
    }

    /// Validates the initializer configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the parameters are inconsistent
    /// (e.g. `min >= max`, non-positive `stddev`).
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            InitializerConfig::Zeros | InitializerConfig::Constant { .. } => Ok(()),
            InitializerConfig::RandomUniform { min, max } => {
                if min >= max {
                    return Err(ConfigError::new(format!(
                        "uniform initializer requires min < max, got [{}, {})",
                        min, max
                    )));
                }
                Ok(())
            }
            InitializerConfig::RandomNormal { stddev, .. } => {
                if *stddev <= 0.0 {
                    return Err(ConfigError::new(format!(
                        "normal initializer requires stddev > 0, got {}",
                        stddev
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Selection of the latent parameter storage variant.
///
/// Dense storage fits a bounded, pre-known feature/field universe; map
/// storage fits open-ended or streaming feature spaces where entries are
/// created lazily.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoreConfig {
    /// Dense indexed storage over a bounded universe.
    Dense {
        /// Number of distinct features, features are indexed `0..num_features`.
        num_features: usize,
        /// Number of distinct fields, fields are indexed `0..num_fields`.
        num_fields: usize,
    },

    /// Associative-map storage keyed by (feature, field), entries created
    /// on first read.
    Map,
}

impl StoreConfig {
    /// Validates the storage configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let StoreConfig::Dense {
            num_features,
            num_fields,
        } = self
        {
            if *num_features == 0 || *num_fields == 0 {
                return Err(ConfigError::new(format!(
                    "dense store requires non-zero bounds, got {} features x {} fields",
                    num_features, num_fields
                )));
            }
        }
        Ok(())
    }
}

/// Hyperparameters of a field-aware factorization machine.
///
/// The factor count `k` is fixed for the lifetime of a model instance and
/// identical across all features and fields. L2 coefficients are kept per
/// factor, seeded from a single `lambda0` unless overridden.
///
/// # Examples
///
/// ```
/// use ffm_core::params::{FfmConfig, InitializerConfig, StoreConfig};
///
/// let config = FfmConfig::builder(4)
///     .lambda0(0.01)
///     .initializer(InitializerConfig::zeros())
///     .store(StoreConfig::Map)
///     .build()
///     .unwrap();
/// assert_eq!(config.factors(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FfmConfig {
    /// The number of latent factors per (feature, field) vector.
    factors: usize,

    /// Per-factor L2 regularization coefficients (length == factors).
    lambda: Vec<f32>,

    /// Initialization policy for latent vectors.
    initializer: InitializerConfig,

    /// Storage variant for the latent parameters.
    store: StoreConfig,

    /// Seed for random initialization policies.
    seed: u64,
}

impl FfmConfig {
    /// Creates a builder with the given factor count.
    pub fn builder(factors: usize) -> FfmConfigBuilder {
        FfmConfigBuilder {
            config: FfmConfig {
                factors,
                lambda: vec![0.01; factors],
                initializer: InitializerConfig::default(),
                store: StoreConfig::Map,
                seed: 0x5f3e_1a2b,
            },
        }
    }

    /// Returns the factor count `k`.
    #[inline]
    pub fn factors(&self) -> usize {
        self.factors
    }

    /// Returns the per-factor L2 coefficients.
    #[inline]
    pub fn lambda(&self) -> &[f32] {
        &self.lambda
    }

    /// Returns the initializer configuration.
    #[inline]
    pub fn initializer(&self) -> &InitializerConfig {
        &self.initializer
    }

    /// Returns the storage configuration.
    #[inline]
    pub fn store(&self) -> &StoreConfig {
        &self.store
    }

    /// Returns the seed for random initialization.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Builder for [`FfmConfig`].
#[derive(Debug, Clone)]
pub struct FfmConfigBuilder {
    config: FfmConfig,
}

impl FfmConfigBuilder {
    /// Sets all per-factor L2 coefficients to `lambda0`.
    pub fn lambda0(mut self, lambda0: f32) -> Self {
        self.config.lambda = vec![lambda0; self.config.factors];
        self
    }

    /// Sets the per-factor L2 coefficients explicitly.
    pub fn lambda(mut self, lambda: Vec<f32>) -> Self {
        self.config.lambda = lambda;
        self
    }

    /// Sets the initializer configuration.
    pub fn initializer(mut self, initializer: InitializerConfig) -> Self {
        self.config.initializer = initializer;
        self
    }

    /// Sets the storage configuration.
    pub fn store(mut self, store: StoreConfig) -> Self {
        self.config.store = store;
        self
    }

    /// Sets the seed for random initialization policies.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the factor count is zero, the lambda
    /// vector length does not match the factor count, any lambda is
    /// negative or non-finite, or the initializer/store configs are invalid.
    pub fn build(self) -> Result<FfmConfig, ConfigError> {
        let config = self.config;
        if config.factors == 0 {
            return Err(ConfigError::new("factor count must be positive"));
        }
        if config.lambda.len() != config.factors {
            return Err(ConfigError::new(format!(
                "lambda length {} does not match factor count {}",
                config.lambda.len(),
                config.factors
            )));
        }
        if config.lambda.iter().any(|l| !l.is_finite() || *l < 0.0) {
            return Err(ConfigError::new(
                "lambda coefficients must be finite and non-negative",
            ));
        }
        config.initializer.validate()?;
        config.store.validate()?;
        Ok(config)
    }
}
