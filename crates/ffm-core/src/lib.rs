//! Core types for field-aware factorization machine (FFM) training.
//!
//! This crate provides the foundational types shared by the FFM online
//! training core:
//!
//! - **Feature types**: [`Feature`], [`FeatureId`], [`FieldId`] — one
//!   non-zero input dimension with its field (categorical group).
//! - **Configuration**: [`FfmConfig`] and friends — factor count, L2
//!   coefficients, initialization policy, storage variant.
//! - **Error types**: [`NumericDivergence`] — the fatal divergence taxonomy
//!   of the training core — and [`ConfigError`].
//!
//! # Example
//!
//! ```
//! use ffm_core::feature::{distinct_fields, Feature};
//! use ffm_core::params::{FfmConfig, InitializerConfig, StoreConfig};
//!
//! let x = vec![Feature::new(1, 0, 1.0), Feature::new(2, 1, 1.0)];
//! assert_eq!(distinct_fields(&x), vec![0, 1]);
//!
//! let config = FfmConfig::builder(8)
//!     .lambda0(0.01)
//!     .initializer(InitializerConfig::uniform(-0.05, 0.05))
//!     .store(StoreConfig::Map)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.factors(), 8);
//! ```

pub mod error;
pub mod feature;
pub mod params;

pub use error::{ConfigError, NumericDivergence, Result};
pub use feature::{distinct_fields, Feature, FeatureId, FieldId};
pub use params::{FfmConfig, FfmConfigBuilder, InitializerConfig, StoreConfig};
