//! Initialization policies for latent vectors.
//!
//! When a latent vector is created (eagerly for dense storage, on first
//! read for map storage) its factors are seeded by a [`VInitializer`].
//! The policies mirror the usual choices for factorization machines: zero,
//! constant, uniform random, and gaussian random.
//!
//! Random policies draw from a seeded [`StdRng`] behind a mutex so that a
//! training run is reproducible from its configured seed.
//!
//! # Example
//!
//! ```
//! use ffm_store::initializer::{RandomUniformVInit, VInitializer};
//!
//! let init = RandomUniformVInit::new(-0.05, 0.05, 42);
//! let v = init.initialize(8);
//! assert_eq!(v.len(), 8);
//! assert!(v.iter().all(|x| (-0.05..0.05).contains(x)));
//! ```

use ffm_core::params::InitializerConfig;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// A policy producing initial values for a latent vector.
///
/// Initializers must be `Send + Sync`; random variants keep their generator
/// behind a mutex.
pub trait VInitializer: Send + Sync {
    /// Produces the initial factors for one latent vector.
    fn initialize(&self, dim: usize) -> Vec<f32>;

    /// Returns the name of this policy, for logging and debugging.
    fn name(&self) -> &str;
}

/// Initializes every factor to zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZerosVInit;

impl VInitializer for ZerosVInit {
    fn initialize(&self, dim: usize) -> Vec<f32> {
        vec![0.0; dim]
    }

    fn name(&self) -> &str {
        "zeros"
    }
}

/// Initializes every factor to a constant value.
#[derive(Debug, Clone, Copy)]
pub struct ConstantVInit {
    value: f32,
}

impl ConstantVInit {
    /// Creates a constant initializer with the given value.
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl VInitializer for ConstantVInit {
    fn initialize(&self, dim: usize) -> Vec<f32> {
        vec![self.value; dim]
    }

    fn name(&self) -> &str {
        "constant"
    }
}

/// Initializes factors with uniform random values in `[min, max)`.
#[derive(Debug)]
pub struct RandomUniformVInit {
    min: f32,
    max: f32,
    rng: Mutex<StdRng>,
}

impl RandomUniformVInit {
    /// Creates a uniform initializer over `[min, max)` with the given seed.
    ///
    /// # Panics
    ///
    /// Panics if `min >= max`.
    pub fn new(min: f32, max: f32, seed: u64) -> Self {
        assert!(min < max, "uniform range [{}, {}) is empty", min, max);
        Self {
            min,
            max,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl VInitializer for RandomUniformVInit {
    fn initialize(&self, dim: usize) -> Vec<f32> {
        let mut rng = self.rng.lock();
        (0..dim).map(|_| rng.gen_range(self.min..self.max)).collect()
    }

    fn name(&self) -> &str {
        "random_uniform"
    }
}

/// Initializes factors with gaussian random values.
#[derive(Debug)]
pub struct GaussianVInit {
    normal: Normal<f64>,
    rng: Mutex<StdRng>,
}

impl GaussianVInit {
    /// Creates a gaussian initializer with the given mean, standard
    /// deviation, and seed.
    ///
    /// # Panics
    ///
    /// Panics if `stddev` is not a positive finite value.
    pub fn new(mean: f32, stddev: f32, seed: u64) -> Self {
        assert!(
            stddev.is_finite() && stddev > 0.0,
            "stddev ({}) must be positive",
            stddev
        );
        Self {
            normal: Normal::new(mean as f64, stddev as f64)
                .expect("normal distribution parameters already validated"),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl VInitializer for GaussianVInit {
    fn initialize(&self, dim: usize) -> Vec<f32> {
        let mut rng = self.rng.lock();
        (0..dim)
            .map(|_| self.normal.sample(&mut *rng) as f32)
            .collect()
    }

    fn name(&self) -> &str {
        "gaussian"
    }
}

/// Creates an initializer from its configuration.
///
/// Random policies are seeded with `seed` so runs are reproducible.
///
/// # Example
///
/// ```
/// use ffm_core::params::InitializerConfig;
/// use ffm_store::initializer::create_initializer;
///
/// let init = create_initializer(&InitializerConfig::zeros(), 0);
/// assert_eq!(init.name(), "zeros");
/// ```
pub fn create_initializer(config: &InitializerConfig, seed: u64) -> Box<dyn VInitializer> {
    match config {
        InitializerConfig::Zeros => Box::new(ZerosVInit),
        InitializerConfig::Constant { value } => Box::new(ConstantVInit::new(*value)),
        InitializerConfig::RandomUniform { min, max } => {
            Box::new(RandomUniformVInit::new(*min, *max, seed))
        }
        InitializerConfig::RandomNormal { mean, stddev } => {
            Box::new(GaussianVInit::new(*mean, *stddev, seed))
        }
    }
}
