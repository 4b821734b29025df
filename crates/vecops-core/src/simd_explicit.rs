//! Portable SIMD kernels using the `wide` crate.
//!
//! `f32x8` lowers to AVX/SSE on x86_64, NEON on aarch64 and SIMD128 on WASM,
//! falling back to scalar lanes elsewhere. This tier is therefore available on
//! every target and sits directly above the scalar reference.
//!
//! | Platform | Lowering |
//! |----------|----------|
//! | **`x86_64`** | AVX / SSE2 |
//! | **`aarch64`** | NEON |
//! | **WASM** | SIMD128 |
//! | **Fallback** | Scalar lanes |

use crate::simd_scalar::{inverse_norm, normalize_rescaled};
use wide::f32x8;

/// Lanes per `f32x8`.
const LANES: usize = 8;

/// Computes the inner product using 8-wide fused multiply-add.
///
/// # Panics
///
/// Panics if vectors have different lengths.
///
/// # Example
///
/// ```
/// use vecops_core::simd_explicit::inner_product_simd;
///
/// let a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
/// let b = vec![1.0; 9];
/// assert!((inner_product_simd(&a, &b) - 45.0).abs() < 1e-5);
/// ```
#[inline]
#[must_use]
pub fn inner_product_simd(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let len = a.len();
    let simd_len = len / LANES;

    let mut sum = f32x8::ZERO;

    for i in 0..simd_len {
        let offset = i * LANES;
        let va = f32x8::from(&a[offset..offset + LANES]);
        let vb = f32x8::from(&b[offset..offset + LANES]);
        sum = va.mul_add(vb, sum); // sum = (va * vb) + sum
    }

    let mut result = sum.reduce_add();

    // Tail
    let base = simd_len * LANES;
    for (x, y) in a[base..].iter().zip(&b[base..]) {
        result += x * y;
    }

    result
}

/// Computes squared L2 distance using 8-wide fused multiply-add.
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[inline]
#[must_use]
pub fn l2_distance_squared_simd(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let len = a.len();
    let simd_len = len / LANES;

    let mut sum = f32x8::ZERO;

    for i in 0..simd_len {
        let offset = i * LANES;
        let va = f32x8::from(&a[offset..offset + LANES]);
        let vb = f32x8::from(&b[offset..offset + LANES]);
        let diff = va - vb;
        sum = diff.mul_add(diff, sum);
    }

    let mut result = sum.reduce_add();

    let base = simd_len * LANES;
    for (x, y) in a[base..].iter().zip(&b[base..]) {
        let diff = x - y;
        result += diff * diff;
    }

    result
}

/// Normalizes `v` in place: one pass for the sum of squares, one to scale.
///
/// Vectors with a zero norm or a non-finite element are left unchanged.
#[inline]
pub fn normalize_simd(v: &mut [f32]) {
    let sum_sq = inner_product_simd(v, v);
    let Some(inv_norm) = inverse_norm(sum_sq) else {
        normalize_rescaled(v);
        return;
    };

    let factor = f32x8::splat(inv_norm);
    let mut chunks = v.chunks_exact_mut(LANES);
    for chunk in &mut chunks {
        let scaled = f32x8::from(&chunk[..]) * factor;
        chunk.copy_from_slice(&scaled.to_array());
    }
    for x in chunks.into_remainder() {
        *x *= inv_norm;
    }
}
