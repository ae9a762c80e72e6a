//! Latent parameter storage for field-aware factorization machines.
//!
//! This crate provides the storage capability the FFM training core reads
//! and writes through:
//!
//! - [`LatentStore`] — the core trait mapping
//!   `(feature, interacting field, factor)` to one latent scalar.
//! - [`DenseLatentStore`] — flat indexed storage for bounded, pre-known
//!   feature/field universes.
//! - [`MapLatentStore`] — associative storage for open-ended feature
//!   spaces, with lazy entry creation.
//! - [`VInitializer`] and implementations — the initialization policies
//!   that seed new latent vectors.
//!
//! # Example
//!
//! ```
//! use ffm_core::params::{FfmConfig, InitializerConfig, StoreConfig};
//! use ffm_store::build_store;
//!
//! let config = FfmConfig::builder(4)
//!     .initializer(InitializerConfig::zeros())
//!     .store(StoreConfig::Dense { num_features: 100, num_fields: 8 })
//!     .build()
//!     .unwrap();
//!
//! let mut store = build_store(&config).unwrap();
//! assert_eq!(store.factors(), 4);
//! assert_eq!(store.get(0, 0, 0), 0.0);
//! ```

use ffm_core::error::ConfigError;
use ffm_core::params::{FfmConfig, StoreConfig};

mod dense;
pub mod initializer;
mod map;
mod traits;

pub use dense::DenseLatentStore;
pub use initializer::{
    create_initializer, ConstantVInit, GaussianVInit, RandomUniformVInit, VInitializer, ZerosVInit,
};
pub use map::MapLatentStore;
pub use traits::LatentStore;

/// Builds the latent store selected by the configuration.
///
/// The storage variant, factor count, initialization policy, and seed are
/// all taken from `config`; this is the construction-time selection point
/// between dense and map storage.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the store or initializer configuration is
/// invalid.
pub fn build_store(config: &FfmConfig) -> Result<Box<dyn LatentStore>, ConfigError> {
    config.store().validate()?;
    config.initializer().validate()?;
    let init = create_initializer(config.initializer(), config.seed());
    match *config.store() {
        StoreConfig::Dense {
            num_features,
            num_fields,
        } => Ok(Box::new(DenseLatentStore::new(
            num_features,
            num_fields,
            config.factors(),
            init.as_ref(),
        ))),
        StoreConfig::Map => Ok(Box::new(MapLatentStore::new(config.factors(), init))),
    }
}
