//! Tests for the aarch64 NEON kernels.

use crate::simd_neon::{
    inner_product_neon_safe, l2_distance_squared_neon_safe, normalize_neon_safe,
};
use crate::simd_scalar;
use crate::test_utils::{
    abs_diff_sum, abs_product_sum, assert_close, assert_normalizes_extreme_scales,
    boundary_lengths, generate_vector,
};

#[test]
fn test_neon_kernels_match_scalar() {
    for len in boundary_lengths() {
        // Arrange
        let a = generate_vector(len, 50);
        let b = generate_vector(len, 51);

        // Act
        let ip = inner_product_neon_safe(&a, &b);
        let l2 = l2_distance_squared_neon_safe(&a, &b);

        // Assert
        assert_close(
            ip,
            simd_scalar::inner_product(&a, &b),
            abs_product_sum(&a, &b),
            &format!("ip len={len}"),
        );
        assert_close(
            l2,
            simd_scalar::l2_distance_squared(&a, &b),
            abs_diff_sum(&a, &b),
            &format!("l2 len={len}"),
        );
    }
}

#[test]
fn test_neon_normalize_matches_scalar() {
    for len in boundary_lengths() {
        let original = generate_vector(len, 52);
        let mut neon = original.clone();
        let mut scalar = original;

        normalize_neon_safe(&mut neon);
        simd_scalar::normalize(&mut scalar);

        for (n, s) in neon.iter().zip(&scalar) {
            assert!((n - s).abs() < 1e-5, "len={len}: {n} vs {s}");
        }
    }
}

#[test]
fn test_neon_zero_vector_unchanged() {
    let mut v = vec![0.0f32; 9];
    normalize_neon_safe(&mut v);
    assert!(v.iter().all(|&x| x == 0.0));
}

#[test]
fn test_neon_normalize_extreme_scales() {
    assert_normalizes_extreme_scales(normalize_neon_safe, "neon");
}

#[test]
#[should_panic(expected = "Vector dimensions must match")]
fn test_neon_length_mismatch() {
    let _ = l2_distance_squared_neon_safe(&[1.0; 4], &[1.0; 5]);
}
