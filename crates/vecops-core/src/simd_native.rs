//! Native x86_64 kernels using `core::arch` intrinsics.
//!
//! Two tiers live here:
//!
//! - **AVX2 + FMA**: 2×8 lanes per iteration with two accumulators for ILP.
//! - **AVX-512F**: 16 lanes per iteration, `_mm512_reduce_add_ps` for the reduction.
//!
//! The `unsafe` kernels are `#[target_feature]` functions. The safe wrappers at
//! the bottom are `pub(crate)` and only reach callers through the dispatch
//! registry, which hands them out after the matching tier was detected.

#![allow(clippy::similar_names)]

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "x86_64")]
use crate::simd_scalar::{inverse_norm, normalize_rescaled};

// =============================================================================
// AVX2 + FMA
// =============================================================================

/// Horizontal sum of the 8 lanes of a `__m256`.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
unsafe fn hsum256(v: __m256) -> f32 {
    let hi = _mm256_extractf128_ps(v, 1);
    let lo = _mm256_castps256_ps128(v);
    let sum128 = _mm_add_ps(lo, hi);
    let shuf = _mm_movehdup_ps(sum128);
    let sums = _mm_add_ps(sum128, shuf);
    let shuf2 = _mm_movehl_ps(sums, sums);
    _mm_cvtss_f32(_mm_add_ss(sums, shuf2))
}

/// AVX2 inner product with 2 accumulators.
///
/// # Safety
///
/// Requires AVX2 and FMA. `a` and `b` must have equal length.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
unsafe fn inner_product_avx2(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len();
    let simd_len = len / 16;

    let mut sum0 = _mm256_setzero_ps();
    let mut sum1 = _mm256_setzero_ps();

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 16;
        let va0 = _mm256_loadu_ps(a_ptr.add(offset));
        let vb0 = _mm256_loadu_ps(b_ptr.add(offset));
        sum0 = _mm256_fmadd_ps(va0, vb0, sum0);

        let va1 = _mm256_loadu_ps(a_ptr.add(offset + 8));
        let vb1 = _mm256_loadu_ps(b_ptr.add(offset + 8));
        sum1 = _mm256_fmadd_ps(va1, vb1, sum1);
    }

    let mut result = hsum256(_mm256_add_ps(sum0, sum1));

    let base = simd_len * 16;
    for (x, y) in a[base..].iter().zip(&b[base..]) {
        result += x * y;
    }

    result
}

/// AVX2 squared L2 distance with 2 accumulators.
///
/// # Safety
///
/// Requires AVX2 and FMA. `a` and `b` must have equal length.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
unsafe fn l2_distance_squared_avx2(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len();
    let simd_len = len / 16;

    let mut sum0 = _mm256_setzero_ps();
    let mut sum1 = _mm256_setzero_ps();

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 16;
        let va0 = _mm256_loadu_ps(a_ptr.add(offset));
        let vb0 = _mm256_loadu_ps(b_ptr.add(offset));
        let diff0 = _mm256_sub_ps(va0, vb0);
        sum0 = _mm256_fmadd_ps(diff0, diff0, sum0);

        let va1 = _mm256_loadu_ps(a_ptr.add(offset + 8));
        let vb1 = _mm256_loadu_ps(b_ptr.add(offset + 8));
        let diff1 = _mm256_sub_ps(va1, vb1);
        sum1 = _mm256_fmadd_ps(diff1, diff1, sum1);
    }

    let mut result = hsum256(_mm256_add_ps(sum0, sum1));

    let base = simd_len * 16;
    for (x, y) in a[base..].iter().zip(&b[base..]) {
        let diff = x - y;
        result += diff * diff;
    }

    result
}

/// Multiplies every element of `v` by `factor`, 8 lanes at a time.
///
/// # Safety
///
/// Requires AVX2.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
unsafe fn scale_avx2(v: &mut [f32], factor: f32) {
    let len = v.len();
    let simd_len = len / 8;
    let f = _mm256_set1_ps(factor);
    let ptr = v.as_mut_ptr();

    for i in 0..simd_len {
        let p = ptr.add(i * 8);
        _mm256_storeu_ps(p, _mm256_mul_ps(_mm256_loadu_ps(p), f));
    }

    for x in &mut v[simd_len * 8..] {
        *x *= factor;
    }
}

/// AVX2 in-place normalization.
///
/// # Safety
///
/// Requires AVX2 and FMA.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
unsafe fn normalize_avx2(v: &mut [f32]) {
    let sum_sq = inner_product_avx2(v, v);
    match inverse_norm(sum_sq) {
        Some(inv_norm) => scale_avx2(v, inv_norm),
        None => normalize_rescaled(v),
    }
}

// =============================================================================
// AVX-512F
// =============================================================================

/// AVX-512 inner product, 16 floats per iteration.
///
/// # Safety
///
/// Requires AVX-512F. `a` and `b` must have equal length.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn inner_product_avx512(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len();
    let simd_len = len / 16;

    let mut sum = _mm512_setzero_ps();

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 16;
        let va = _mm512_loadu_ps(a_ptr.add(offset));
        let vb = _mm512_loadu_ps(b_ptr.add(offset));
        sum = _mm512_fmadd_ps(va, vb, sum);
    }

    let mut result = _mm512_reduce_add_ps(sum);

    let base = simd_len * 16;
    for (x, y) in a[base..].iter().zip(&b[base..]) {
        result += x * y;
    }

    result
}

/// AVX-512 squared L2 distance.
///
/// # Safety
///
/// Requires AVX-512F. `a` and `b` must have equal length.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn l2_distance_squared_avx512(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len();
    let simd_len = len / 16;

    let mut sum = _mm512_setzero_ps();

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 16;
        let va = _mm512_loadu_ps(a_ptr.add(offset));
        let vb = _mm512_loadu_ps(b_ptr.add(offset));
        let diff = _mm512_sub_ps(va, vb);
        sum = _mm512_fmadd_ps(diff, diff, sum);
    }

    let mut result = _mm512_reduce_add_ps(sum);

    let base = simd_len * 16;
    for (x, y) in a[base..].iter().zip(&b[base..]) {
        let diff = x - y;
        result += diff * diff;
    }

    result
}

/// Multiplies every element of `v` by `factor`, 16 lanes at a time.
///
/// # Safety
///
/// Requires AVX-512F.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn scale_avx512(v: &mut [f32], factor: f32) {
    let len = v.len();
    let simd_len = len / 16;
    let f = _mm512_set1_ps(factor);
    let ptr = v.as_mut_ptr();

    for i in 0..simd_len {
        let p = ptr.add(i * 16);
        _mm512_storeu_ps(p, _mm512_mul_ps(_mm512_loadu_ps(p), f));
    }

    for x in &mut v[simd_len * 16..] {
        *x *= factor;
    }
}

/// AVX-512 in-place normalization.
///
/// # Safety
///
/// Requires AVX-512F.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx512f")]
#[inline]
unsafe fn normalize_avx512(v: &mut [f32]) {
    let sum_sq = inner_product_avx512(v, v);
    match inverse_norm(sum_sq) {
        Some(inv_norm) => scale_avx512(v, inv_norm),
        None => normalize_rescaled(v),
    }
}

// =============================================================================
// Safe wrappers for the dispatch registry
// =============================================================================

#[cfg(target_arch = "x86_64")]
pub(crate) fn inner_product_avx2_safe(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    // SAFETY: only registered for SimdTier::Avx2, which requires avx2 + fma detection.
    unsafe { inner_product_avx2(a, b) }
}

#[cfg(target_arch = "x86_64")]
pub(crate) fn l2_distance_squared_avx2_safe(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    // SAFETY: only registered for SimdTier::Avx2, which requires avx2 + fma detection.
    unsafe { l2_distance_squared_avx2(a, b) }
}

#[cfg(target_arch = "x86_64")]
pub(crate) fn normalize_avx2_safe(v: &mut [f32]) {
    // SAFETY: only registered for SimdTier::Avx2, which requires avx2 + fma detection.
    unsafe { normalize_avx2(v) }
}

#[cfg(target_arch = "x86_64")]
pub(crate) fn inner_product_avx512_safe(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    // SAFETY: only registered for SimdTier::Avx512, which requires avx512f detection.
    unsafe { inner_product_avx512(a, b) }
}

#[cfg(target_arch = "x86_64")]
pub(crate) fn l2_distance_squared_avx512_safe(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    // SAFETY: only registered for SimdTier::Avx512, which requires avx512f detection.
    unsafe { l2_distance_squared_avx512(a, b) }
}

#[cfg(target_arch = "x86_64")]
pub(crate) fn normalize_avx512_safe(v: &mut [f32]) {
    // SAFETY: only registered for SimdTier::Avx512, which requires avx512f detection.
    unsafe { normalize_avx512(v) }
}
