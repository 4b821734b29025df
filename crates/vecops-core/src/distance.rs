//! Distance metrics and first-class distance handles.
//!
//! An ANN index picks a [`DistanceMetric`] once, grabs its [`DistanceFn`]
//! through [`DistanceMetric::distance_fn`], and calls the handle directly for
//! every comparison. Lower values always mean more similar.

use crate::error::{Error, Result};
use crate::simd_dispatch::{dispatch_table, DistanceFn};
use crate::simd_ops;
use serde::{Deserialize, Serialize};

/// Distance metric for vector comparison.
///
/// Deserialization accepts every name [`FromStr`](std::str::FromStr) does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum DistanceMetric {
    /// `1 - a·b`. Inputs must be normalized by the caller.
    InnerProduct,
    /// Squared Euclidean distance (no square root).
    L2,
}

impl DistanceMetric {
    /// Returns the distance function for this metric.
    ///
    /// For [`DistanceMetric::L2`] this is the dispatched kernel pointer
    /// itself; for [`DistanceMetric::InnerProduct`] it is
    /// [`simd_ops::inner_product_distance`], which wraps the dispatched
    /// inner product.
    #[must_use]
    pub fn distance_fn(&self) -> DistanceFn {
        match self {
            Self::InnerProduct => simd_ops::inner_product_distance,
            Self::L2 => dispatch_table().l2_distance_squared().kernel,
        }
    }

    /// Computes the distance between two vectors.
    ///
    /// # Panics
    ///
    /// Panics if vectors have different lengths.
    #[inline]
    #[must_use]
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::InnerProduct => simd_ops::inner_product_distance(a, b),
            Self::L2 => simd_ops::l2_distance_squared(a, b),
        }
    }

    /// Computes the distance, returning an error instead of panicking on
    /// mismatched lengths.
    pub fn try_distance(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        if a.len() != b.len() {
            return Err(Error::DimensionMismatch {
                expected: a.len(),
                actual: b.len(),
            });
        }
        Ok(self.distance(a, b))
    }

    /// Returns true if callers must normalize vectors before using this metric.
    #[must_use]
    pub const fn requires_normalized_input(&self) -> bool {
        matches!(self, Self::InnerProduct)
    }

    /// Canonical short name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InnerProduct => "ip",
            Self::L2 => "l2",
        }
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for DistanceMetric {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl std::str::FromStr for DistanceMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ip" | "inner_product" => Ok(Self::InnerProduct),
            "l2" | "euclidean" => Ok(Self::L2),
            other => Err(Error::UnknownMetric(other.to_string())),
        }
    }
}
