//! NEON kernels for aarch64.
//!
//! 4 lanes per `float32x4_t`, two accumulators per loop iteration, `vfmaq_f32`
//! for the fused multiply-add and `vaddvq_f32` for the horizontal reduction.

use crate::simd_scalar::{inverse_norm, normalize_rescaled};
use std::arch::aarch64::*;

/// NEON inner product.
///
/// # Safety
///
/// Requires NEON. `a` and `b` must have equal length.
#[target_feature(enable = "neon")]
#[inline]
unsafe fn inner_product_neon(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len();
    let chunks = len / 8;

    let mut sum0 = vdupq_n_f32(0.0);
    let mut sum1 = vdupq_n_f32(0.0);

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..chunks {
        let offset = i * 8;
        // SAFETY: offset + 8 <= chunks * 8 <= len
        sum0 = vfmaq_f32(sum0, vld1q_f32(a_ptr.add(offset)), vld1q_f32(b_ptr.add(offset)));
        sum1 = vfmaq_f32(
            sum1,
            vld1q_f32(a_ptr.add(offset + 4)),
            vld1q_f32(b_ptr.add(offset + 4)),
        );
    }

    let mut result = vaddvq_f32(vaddq_f32(sum0, sum1));

    let base = chunks * 8;
    for (x, y) in a[base..].iter().zip(&b[base..]) {
        result += x * y;
    }

    result
}

/// NEON squared L2 distance.
///
/// # Safety
///
/// Requires NEON. `a` and `b` must have equal length.
#[target_feature(enable = "neon")]
#[inline]
unsafe fn l2_distance_squared_neon(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len();
    let chunks = len / 8;

    let mut sum0 = vdupq_n_f32(0.0);
    let mut sum1 = vdupq_n_f32(0.0);

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..chunks {
        let offset = i * 8;
        let diff0 = vsubq_f32(vld1q_f32(a_ptr.add(offset)), vld1q_f32(b_ptr.add(offset)));
        sum0 = vfmaq_f32(sum0, diff0, diff0);
        let diff1 = vsubq_f32(
            vld1q_f32(a_ptr.add(offset + 4)),
            vld1q_f32(b_ptr.add(offset + 4)),
        );
        sum1 = vfmaq_f32(sum1, diff1, diff1);
    }

    let mut result = vaddvq_f32(vaddq_f32(sum0, sum1));

    let base = chunks * 8;
    for (x, y) in a[base..].iter().zip(&b[base..]) {
        let diff = x - y;
        result += diff * diff;
    }

    result
}

/// NEON in-place normalization.
///
/// # Safety
///
/// Requires NEON.
#[target_feature(enable = "neon")]
#[inline]
unsafe fn normalize_neon(v: &mut [f32]) {
    let sum_sq = inner_product_neon(v, v);
    let Some(inv_norm) = inverse_norm(sum_sq) else {
        normalize_rescaled(v);
        return;
    };

    let len = v.len();
    let chunks = len / 4;
    let factor = vdupq_n_f32(inv_norm);
    let ptr = v.as_mut_ptr();

    for i in 0..chunks {
        let p = ptr.add(i * 4);
        vst1q_f32(p, vmulq_f32(vld1q_f32(p), factor));
    }

    for x in &mut v[chunks * 4..] {
        *x *= inv_norm;
    }
}

// =============================================================================
// Safe wrappers for the dispatch registry
// =============================================================================

pub(crate) fn inner_product_neon_safe(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    // SAFETY: NEON is guaranteed on all aarch64 targets.
    unsafe { inner_product_neon(a, b) }
}

pub(crate) fn l2_distance_squared_neon_safe(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    // SAFETY: NEON is guaranteed on all aarch64 targets.
    unsafe { l2_distance_squared_neon(a, b) }
}

pub(crate) fn normalize_neon_safe(v: &mut [f32]) {
    // SAFETY: NEON is guaranteed on all aarch64 targets.
    unsafe { normalize_neon(v) }
}
