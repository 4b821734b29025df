//! Tests for error codes and messages.

use crate::config::ConfigError;
use crate::error::Error;

#[test]
fn test_error_codes() {
    let cases = [
        (
            Error::DimensionMismatch {
                expected: 3,
                actual: 4,
            },
            "VECOPS-001",
        ),
        (Error::UnknownMetric("x".to_string()), "VECOPS-002"),
        (Error::UnknownTier("y".to_string()), "VECOPS-003"),
        (Error::Config("z".to_string()), "VECOPS-004"),
    ];

    for (err, code) in cases {
        assert_eq!(err.code(), code);
        assert!(err.to_string().starts_with(&format!("[{code}]")), "{err}");
    }
}

#[test]
fn test_dimension_mismatch_message() {
    let err = Error::DimensionMismatch {
        expected: 768,
        actual: 384,
    };

    assert_eq!(
        err.to_string(),
        "[VECOPS-001] Vector dimension mismatch: expected 768, got 384"
    );
}

#[test]
fn test_from_config_error() {
    // Arrange
    let config_err = ConfigError::InvalidValue {
        key: "logging.level".to_string(),
        message: "bad".to_string(),
    };

    // Act
    let err: Error = config_err.into();

    // Assert
    assert_eq!(err.code(), "VECOPS-004");
    assert!(err.to_string().contains("logging.level"));
}
