//! Public kernel entry points.
//!
//! Every function here loads the cached pointer from the dispatch table and
//! calls it. The first call anywhere in the process resolves the table.
//!
//! # Example
//!
//! ```
//! use vecops_core::simd_ops;
//!
//! let a = vec![1.0, 0.0, 0.0, 0.0];
//! let b = vec![0.0, 1.0, 0.0, 0.0];
//! assert_eq!(simd_ops::inner_product(&a, &b), 0.0);
//! assert_eq!(simd_ops::l2_distance_squared(&a, &b), 2.0);
//!
//! let mut v = vec![3.0, 4.0, 0.0, 0.0];
//! simd_ops::normalize(&mut v);
//! assert!((v[0] - 0.6).abs() < 1e-6);
//! ```

use crate::simd_dispatch::dispatch_table;
use crate::simd_scalar;

/// Dimension used by [`warmup`], a common embedding size.
const WARMUP_DIM: usize = 768;

/// Computes the inner product `sum(a[i] * b[i])`.
///
/// `a` and `b` may be the same slice. Empty input returns `0.0`.
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[inline]
#[must_use]
pub fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    (dispatch_table().inner_product().kernel)(a, b)
}

/// Computes `1 - inner_product(a, b)`.
///
/// Inputs are expected to be unit length already; this function does not
/// normalize. Uses the same kernel as [`inner_product`], so the two agree
/// bit-for-bit on identical inputs.
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[inline]
#[must_use]
pub fn inner_product_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - inner_product(a, b)
}

/// Computes the squared Euclidean distance `sum((a[i] - b[i])^2)`.
///
/// Never negative; identical inputs give exactly `0.0`.
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[inline]
#[must_use]
pub fn l2_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    (dispatch_table().l2_distance_squared().kernel)(a, b)
}

/// Normalizes `v` to unit length in place.
///
/// Vectors whose sum of squares would overflow or underflow `f32` are
/// rescaled by their largest element first, so any finite non-zero vector
/// comes out unit length. An all-zero vector, or one holding NaN or an
/// infinity, is left unchanged.
#[inline]
pub fn normalize(v: &mut [f32]) {
    (dispatch_table().normalize().kernel)(v);
}

/// Scalar reference normalization, always available regardless of dispatch.
#[inline]
pub fn normalize_scalar(v: &mut [f32]) {
    simd_scalar::normalize(v);
}

/// Euclidean norm of `v`, via the dispatched inner product.
#[inline]
#[must_use]
pub fn l2_norm(v: &[f32]) -> f32 {
    inner_product(v, v).sqrt()
}

/// Runs each dispatched kernel once so the first real call is not cold.
pub fn warmup() {
    let table = dispatch_table();
    let a = vec![0.01_f32; WARMUP_DIM];
    let mut b = vec![0.02_f32; WARMUP_DIM];

    let _ = std::hint::black_box((table.inner_product().kernel)(&a, &b));
    let _ = std::hint::black_box((table.l2_distance_squared().kernel)(&a, &b));
    (table.normalize().kernel)(&mut b);
    std::hint::black_box(&b);

    tracing::debug!(dim = WARMUP_DIM, "SIMD kernels warmed up");
}
