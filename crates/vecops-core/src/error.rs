//! Error types for `vecops`.
//!
//! The kernels themselves have no error channel; these errors come from the
//! checked distance API, name parsing and configuration loading.

use thiserror::Error;

/// Result type alias for `vecops` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside the numeric hot path.
///
/// Error codes follow the pattern `VECOPS-XXX`.
#[derive(Error, Debug)]
pub enum Error {
    /// Dimension mismatch (VECOPS-001).
    #[error("[VECOPS-001] Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Length of the first vector.
        expected: usize,
        /// Length of the second vector.
        actual: usize,
    },

    /// Unknown distance metric name (VECOPS-002).
    #[error("[VECOPS-002] Unknown distance metric '{0}', expected one of: ip, inner_product, l2, euclidean")]
    UnknownMetric(String),

    /// Unknown SIMD tier name (VECOPS-003).
    #[error("[VECOPS-003] Unknown SIMD tier '{0}', expected one of: scalar, portable, neon, avx2, avx512")]
    UnknownTier(String),

    /// Configuration error (VECOPS-004).
    #[error("[VECOPS-004] Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns the error code (e.g., "VECOPS-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DimensionMismatch { .. } => "VECOPS-001",
            Self::UnknownMetric(_) => "VECOPS-002",
            Self::UnknownTier(_) => "VECOPS-003",
            Self::Config(_) => "VECOPS-004",
        }
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
