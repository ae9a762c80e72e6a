//! Online prediction and gradient update engine for field-aware
//! factorization machines (FFM).
//!
//! An FFM scores a sparse example as
//! `w0 + Σ W(x_i)·value(x_i) + Σ_f Σ_{i<j} V[x_i][field(x_j)][f] ·
//! V[x_j][field(x_i)][f] · value(x_i) · value(x_j)`: every feature keeps
//! one latent vector *per interacting field*, which is what distinguishes
//! it from a plain factorization machine. This crate implements the online
//! core:
//!
//! - [`FfmEngine::predict`] — the `O(k·n²)` field-aware prediction.
//! - [`FfmEngine::sum_vfx`] — the per-example precomputation table for the
//!   gradient pass.
//! - [`FfmEngine::update_v`] — one L2-regularized SGD step on a single
//!   latent parameter.
//! - [`FfmEngine::train_example`] — the per-example driver combining the
//!   two.
//!
//! Latent parameters live behind the [`ffm_store::LatentStore`] capability;
//! bias and linear weights come from the enclosing model through
//! [`BaseWeights`]. Every computed scalar is checked for finiteness and a
//! non-finite value fails the call with a diagnostic
//! [`ffm_core::NumericDivergence`].
//!
//! # Example
//!
//! ```
//! use ffm_core::params::{FfmConfig, InitializerConfig};
//! use ffm_core::Feature;
//! use ffm_model::{FfmEngine, LinearTerms};
//! use ffm_store::build_store;
//!
//! let config = FfmConfig::builder(4)
//!     .lambda0(0.01)
//!     .initializer(InitializerConfig::uniform(-0.05, 0.05))
//!     .build()
//!     .unwrap();
//! let engine = FfmEngine::new(&config).unwrap();
//! let mut store = build_store(&config).unwrap();
//! let base = LinearTerms::new(0.0);
//!
//! let x = vec![Feature::new(1, 0, 1.0), Feature::new(2, 1, 1.0)];
//! let prediction = engine.predict(store.as_mut(), &base, &x).unwrap();
//! let dloss = prediction - 1.0; // squared loss against target 1.0
//! engine.train_example(store.as_mut(), &x, dloss, 0.01).unwrap();
//! ```

mod engine;
mod precompute;
mod train;
mod update;

pub use engine::{BaseWeights, FfmEngine, LinearTerms};
pub use precompute::SumTable;
