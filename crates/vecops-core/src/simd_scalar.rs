//! Scalar reference kernels.
//!
//! Straight loops with no intrinsics. They are the fallback when no wider
//! tier is usable and the ground truth the SIMD kernels are tested against.

/// Smallest sum of squares the single-pass normalize trusts.
///
/// Below it, element squares may have underflowed or gone subnormal, so the
/// vector is normalized through [`normalize_rescaled`] instead.
const MIN_DIRECT_SUM_SQ: f32 = 1e-30;

/// Computes `sum(a[i] * b[i])`.
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[inline]
#[must_use]
pub fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    a.iter().zip(b).fold(0.0, |acc, (x, y)| acc + x * y)
}

/// Computes `sum((a[i] - b[i])^2)`.
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[inline]
#[must_use]
pub fn l2_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    a.iter().zip(b).fold(0.0, |acc, (x, y)| {
        let d = x - y;
        acc + d * d
    })
}

/// Normalizes `v` to unit length in place.
///
/// Vectors with a zero norm or any non-finite element are left unchanged.
#[inline]
pub fn normalize(v: &mut [f32]) {
    let sum_sq = v.iter().fold(0.0, |acc, x| acc + x * x);
    match inverse_norm(sum_sq) {
        Some(inv_norm) => {
            for x in v.iter_mut() {
                *x *= inv_norm;
            }
        }
        None => normalize_rescaled(v),
    }
}

/// Turns a sum of squares into the factor that scales a vector to unit length.
///
/// Returns `None` when `sum_sq` overflowed, is NaN, or is too small to be
/// accurate. Callers then fall back to [`normalize_rescaled`].
#[inline]
pub(crate) fn inverse_norm(sum_sq: f32) -> Option<f32> {
    if sum_sq.is_finite() && sum_sq >= MIN_DIRECT_SUM_SQ {
        Some(1.0 / sum_sq.sqrt())
    } else {
        None
    }
}

/// Slow path shared by every tier's normalize.
///
/// Divides by `max |v[i]|` first so the sum of squares lands in `[1, len]`,
/// then scales by the inverse norm of the rescaled vector. Leaves `v`
/// unchanged when every element is zero or any element is NaN or infinite.
#[cold]
pub(crate) fn normalize_rescaled(v: &mut [f32]) {
    let mut max_abs = 0.0f32;
    for &x in v.iter() {
        if !x.is_finite() {
            return;
        }
        max_abs = max_abs.max(x.abs());
    }
    if max_abs == 0.0 {
        return;
    }

    for x in v.iter_mut() {
        *x /= max_abs;
    }
    let sum_sq = v.iter().fold(0.0, |acc, x| acc + x * x);
    let inv_norm = 1.0 / sum_sq.sqrt();
    for x in v.iter_mut() {
        *x *= inv_norm;
    }
}
