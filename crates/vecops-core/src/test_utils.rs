//! Shared helpers for unit tests.

/// Deterministic pseudo-random vector in `[-1, 1)`.
pub(crate) fn generate_vector(dim: usize, seed: u64) -> Vec<f32> {
    let mut x = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    (0..dim)
        .map(|_| {
            x = x
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            ((x >> 40) as f32 / (1u64 << 24) as f32) * 2.0 - 1.0
        })
        .collect()
}

/// Lengths around every SIMD width used by the kernels, plus larger remainders.
pub(crate) fn boundary_lengths() -> Vec<usize> {
    let mut lens = vec![0, 1, 2, 3];
    for width in [4usize, 8, 16, 32] {
        lens.extend([width - 1, width, width + 1]);
    }
    lens.extend([3 * 16 + 5, 7 * 8 + 3, 100, 127, 128, 129, 768, 1531]);
    lens.sort_unstable();
    lens.dedup();
    lens
}

/// Relative tolerance between a SIMD kernel and the scalar reference.
pub(crate) const REL_TOL: f32 = 1e-4;

/// Asserts `actual` is within [`REL_TOL`] of `expected`, relative to `scale`.
///
/// `scale` is the sum of absolute terms that went into the result, which
/// bounds the reordering error even when the signed sum cancels to ~0.
pub(crate) fn assert_close(actual: f32, expected: f32, scale: f32, context: &str) {
    let tol = REL_TOL * scale.max(1.0);
    assert!(
        (actual - expected).abs() <= tol,
        "{context}: actual={actual}, expected={expected}, tol={tol}"
    );
}

/// Sum of `|a[i] * b[i]|`, the magnitude scale of an inner product.
pub(crate) fn abs_product_sum(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x * y).abs()).sum()
}

/// Sum of `(a[i] - b[i])^2`, the magnitude scale of a squared L2 distance.
pub(crate) fn abs_diff_sum(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Checks a normalize kernel on vectors whose sum of squares overflows or
/// underflows `f32`, and on inputs it must leave alone.
pub(crate) fn assert_normalizes_extreme_scales(normalize: fn(&mut [f32]), context: &str) {
    let mut big = [1e20f32, 0.0, 0.0, 0.0];
    normalize(&mut big);
    assert_eq!(big, [1.0, 0.0, 0.0, 0.0], "{context}: 1e20");

    let mut small = [1e-25f32, 0.0, 0.0, 0.0];
    normalize(&mut small);
    assert_eq!(small, [1.0, 0.0, 0.0, 0.0], "{context}: 1e-25");

    let mut subnormal = [0.0f32, -1e-45, 0.0];
    normalize(&mut subnormal);
    assert_eq!(subnormal, [0.0, -1.0, 0.0], "{context}: subnormal");

    // Lengths that reach every SIMD body and tail.
    for (len, value) in [(9usize, 1e20f32), (19, 1e-25), (33, f32::MAX), (40, -3e-20)] {
        let mut v = vec![value; len];
        normalize(&mut v);
        let norm = v.iter().map(|&x| f64::from(x) * f64::from(x)).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "{context}: len={len} value={value} norm={norm}");
    }

    let mut with_nan = [1.0f32, f32::NAN, 2.0];
    normalize(&mut with_nan);
    assert_eq!(with_nan[0], 1.0, "{context}: NaN input");
    assert!(with_nan[1].is_nan(), "{context}: NaN input");
    assert_eq!(with_nan[2], 2.0, "{context}: NaN input");

    let mut with_inf = [f32::NEG_INFINITY, 1.0, 0.0, 0.0, 5.0];
    normalize(&mut with_inf);
    assert_eq!(with_inf, [f32::NEG_INFINITY, 1.0, 0.0, 0.0, 5.0], "{context}: Inf input");

    let mut zeros = [0.0f32; 21];
    normalize(&mut zeros);
    assert!(zeros.iter().all(|&x| x == 0.0), "{context}: zeros");
}
