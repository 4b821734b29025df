//! # `vecops` Core
//!
//! Runtime-dispatched SIMD kernels for approximate-nearest-neighbor search.
//!
//! The crate computes the inner product, the inner-product distance
//! (`1 - a·b`) and the squared Euclidean distance of `f32` vectors, and
//! normalizes vectors to unit length in place.
//!
//! ## Features
//!
//! - **One binary, every CPU**: AVX-512, AVX2+FMA, NEON, portable `wide` and scalar kernels
//! - **Resolved once**: CPU detection and kernel selection happen on first use,
//!   later calls are a single indirect jump
//! - **Scalar reference**: every accelerated kernel has a scalar twin used as
//!   fallback and as test oracle
//!
//! ## Quick Start
//!
//! ```rust
//! use vecops_core::{inner_product, l2_distance_squared, normalize, DistanceMetric};
//!
//! let mut a = vec![3.0, 4.0, 0.0, 0.0];
//! let b = vec![3.0, 4.0, 0.0, 0.0];
//!
//! assert_eq!(inner_product(&a, &b), 25.0);
//! assert_eq!(l2_distance_squared(&a, &b), 0.0);
//!
//! normalize(&mut a);
//! assert!((a[0] - 0.6).abs() < 1e-6 && (a[1] - 0.8).abs() < 1e-6);
//!
//! // Pick a metric once, keep the handle.
//! let dist = DistanceMetric::L2.distance_fn();
//! assert_eq!(dist(&b, &b), 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)] // Acceptable for f32/f64 conversions
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::suboptimal_flops)]

pub mod config;
pub mod distance;
#[cfg(test)]
mod distance_tests;
pub mod error;
#[cfg(test)]
mod error_tests;
pub mod simd_dispatch;
pub mod simd_explicit;
mod simd_native;
#[cfg(target_arch = "aarch64")]
mod simd_neon;
#[cfg(all(test, target_arch = "aarch64"))]
mod simd_neon_tests;
pub mod simd_ops;
pub mod simd_scalar;
#[cfg(test)]
mod test_utils;
pub mod tier;

pub use config::{ConfigError, DispatchConfig, LoggingConfig, VecopsConfig};
pub use distance::DistanceMetric;
pub use error::{Error, Result};
pub use simd_dispatch::{
    dispatch_info, dispatch_table, init_dispatch, kernels_for, DispatchInfo, DispatchTable,
    DistanceFn, KernelSet, NormalizeFn,
};
pub use simd_ops::{
    inner_product, inner_product_distance, l2_distance_squared, l2_norm, normalize,
    normalize_scalar, warmup,
};
pub use tier::{available_tiers, detect_target, SimdFeatures, SimdTier};
