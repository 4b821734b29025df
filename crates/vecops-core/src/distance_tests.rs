//! Tests for distance metrics.

use crate::distance::DistanceMetric;
use crate::error::Error;
use crate::simd_ops;
use crate::test_utils::generate_vector;

#[test]
fn test_distance_fn_l2() {
    // Arrange
    let dist = DistanceMetric::L2.distance_fn();
    let a = [1.0f32, 0.0, 0.0, 0.0];
    let b = [0.0f32, 1.0, 0.0, 0.0];

    // Act & Assert
    assert_eq!(dist(&a, &b), 2.0);
    assert_eq!(dist(&a, &a), 0.0);
}

#[test]
fn test_distance_fn_inner_product() {
    let dist = DistanceMetric::InnerProduct.distance_fn();
    let a = [1.0f32, 0.0, 0.0, 0.0];
    let b = [0.0f32, 1.0, 0.0, 0.0];

    assert_eq!(dist(&a, &b), 1.0);
    assert_eq!(dist(&a, &a), 0.0);
}

#[test]
fn test_distance_fn_matches_direct_call() {
    let a = generate_vector(100, 1);
    let b = generate_vector(100, 2);

    for metric in [DistanceMetric::InnerProduct, DistanceMetric::L2] {
        let handle = metric.distance_fn();
        assert_eq!(handle(&a, &b).to_bits(), metric.distance(&a, &b).to_bits(), "{metric}");
    }
}

#[test]
fn test_distance_fn_is_stable() {
    let first = DistanceMetric::L2.distance_fn();
    let second = DistanceMetric::L2.distance_fn();

    assert!(std::ptr::fn_addr_eq(first, second));
}

#[test]
fn test_inner_product_distance_of_unit_vectors() {
    let mut a = generate_vector(64, 3);
    simd_ops::normalize(&mut a);

    let d = DistanceMetric::InnerProduct.distance(&a, &a);

    assert!(d.abs() < 1e-4);
}

#[test]
fn test_try_distance_ok() {
    let result = DistanceMetric::L2.try_distance(&[3.0, 4.0], &[0.0, 0.0]);

    assert_eq!(result.ok(), Some(25.0));
}

#[test]
fn test_try_distance_dimension_mismatch() {
    let result = DistanceMetric::InnerProduct.try_distance(&[1.0, 2.0, 3.0], &[1.0]);

    match result {
        Err(Error::DimensionMismatch { expected, actual }) => {
            assert_eq!(expected, 3);
            assert_eq!(actual, 1);
        }
        other => panic!("expected DimensionMismatch, got {other:?}"),
    }
}

#[test]
fn test_requires_normalized_input() {
    assert!(DistanceMetric::InnerProduct.requires_normalized_input());
    assert!(!DistanceMetric::L2.requires_normalized_input());
}

#[test]
fn test_from_str_aliases() {
    assert_eq!("ip".parse::<DistanceMetric>().ok(), Some(DistanceMetric::InnerProduct));
    assert_eq!(
        "Inner_Product".parse::<DistanceMetric>().ok(),
        Some(DistanceMetric::InnerProduct)
    );
    assert_eq!(" l2 ".parse::<DistanceMetric>().ok(), Some(DistanceMetric::L2));
    assert_eq!("euclidean".parse::<DistanceMetric>().ok(), Some(DistanceMetric::L2));
}

#[test]
fn test_from_str_unknown() {
    let err = "cosine".parse::<DistanceMetric>().unwrap_err();

    assert_eq!(err.code(), "VECOPS-002");
    assert!(err.to_string().contains("cosine"));
}

#[test]
fn test_display_round_trips_through_from_str() {
    for metric in [DistanceMetric::InnerProduct, DistanceMetric::L2] {
        let parsed: DistanceMetric = metric.to_string().parse().expect("display name parses");
        assert_eq!(parsed, metric);
    }
}

#[test]
fn test_serde_snake_case() {
    let json = serde_json::to_string(&DistanceMetric::InnerProduct).expect("serialize");
    assert_eq!(json, "\"inner_product\"");

    let metric: DistanceMetric = serde_json::from_str("\"l2\"").expect("deserialize");
    assert_eq!(metric, DistanceMetric::L2);
}

#[test]
fn test_deserialize_accepts_aliases() {
    let metric: DistanceMetric = serde_json::from_str("\"euclidean\"").expect("deserialize");
    assert_eq!(metric, DistanceMetric::L2);

    let metric: DistanceMetric = serde_json::from_str("\"IP\"").expect("deserialize");
    assert_eq!(metric, DistanceMetric::InnerProduct);

    let err = serde_json::from_str::<DistanceMetric>("\"cosine\"").unwrap_err();
    assert!(err.to_string().contains("VECOPS-002"), "{err}");
}
