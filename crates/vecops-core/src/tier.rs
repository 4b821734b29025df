//! SIMD tier detection.
//!
//! Probes the CPU once and reports which instruction-set tiers the kernels
//! may use, ordered from most to least capable. `Scalar` and `Portable` are
//! always usable; anything wider must be confirmed by runtime detection.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Instruction-set tier a kernel implementation is compiled for.
///
/// Variants are declared in capability order, so the derived `Ord` gives
/// `Scalar < Portable < Neon < Avx2 < Avx512`.
///
/// Serializes as the snake_case variant name. Deserialization goes through
/// [`FromStr`](std::str::FromStr), so config files and `VECOPS_*` variables
/// accept the same spellings (`AVX2`, `avx-512`, `wide`, ...) as the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum SimdTier {
    /// Plain Rust loops, the reference implementation.
    Scalar,
    /// `wide` crate `f32x8`, lowered to whatever the target offers.
    Portable,
    /// ARM NEON intrinsics (aarch64 only).
    Neon,
    /// AVX2 + FMA intrinsics (x86_64 only).
    Avx2,
    /// AVX-512F intrinsics (x86_64 only).
    Avx512,
}

impl SimdTier {
    /// All tiers, most capable first.
    pub const ALL: [SimdTier; 5] = [
        SimdTier::Avx512,
        SimdTier::Avx2,
        SimdTier::Neon,
        SimdTier::Portable,
        SimdTier::Scalar,
    ];

    /// Human-readable tier name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Scalar => "Scalar",
            Self::Portable => "Portable",
            Self::Neon => "NEON",
            Self::Avx2 => "AVX2",
            Self::Avx512 => "AVX-512",
        }
    }

    /// Number of `f32` lanes in one vector register for this tier.
    #[must_use]
    pub const fn lanes(&self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Neon => 4,
            Self::Portable | Self::Avx2 => 8,
            Self::Avx512 => 16,
        }
    }

    /// Returns true if this tier can run on the current CPU.
    #[must_use]
    pub fn is_available(&self) -> bool {
        available_tiers().contains(self)
    }
}

impl std::fmt::Display for SimdTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SimdTier {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scalar" => Ok(Self::Scalar),
            "portable" | "wide" => Ok(Self::Portable),
            "neon" => Ok(Self::Neon),
            "avx2" => Ok(Self::Avx2),
            "avx512" | "avx-512" => Ok(Self::Avx512),
            other => Err(crate::Error::UnknownTier(other.to_string())),
        }
    }
}

impl TryFrom<String> for SimdTier {
    type Error = crate::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Raw CPU feature flags relevant to the kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SimdFeatures {
    /// AVX-512 foundation instructions.
    pub avx512f: bool,
    /// AVX2 instructions.
    pub avx2: bool,
    /// Fused multiply-add (FMA3).
    pub fma: bool,
    /// ARM NEON.
    pub neon: bool,
}

impl SimdFeatures {
    /// Detects available SIMD features on the current CPU.
    #[must_use]
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            Self {
                avx512f: is_x86_feature_detected!("avx512f"),
                avx2: is_x86_feature_detected!("avx2"),
                fma: is_x86_feature_detected!("fma"),
                neon: false,
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            // NEON is mandatory on every aarch64 target Rust supports.
            Self {
                neon: true,
                ..Self::default()
            }
        }

        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            Self::default()
        }
    }

    /// Converts feature flags into the list of usable tiers, best first.
    #[must_use]
    pub fn tiers(&self) -> Vec<SimdTier> {
        let mut tiers = Vec::with_capacity(SimdTier::ALL.len());
        if self.avx512f {
            tiers.push(SimdTier::Avx512);
        }
        // The AVX2 kernels are built around `_mm256_fmadd_ps`.
        if self.avx2 && self.fma {
            tiers.push(SimdTier::Avx2);
        }
        if self.neon {
            tiers.push(SimdTier::Neon);
        }
        tiers.push(SimdTier::Portable);
        tiers.push(SimdTier::Scalar);
        tiers
    }
}

static AVAILABLE_TIERS: OnceLock<Vec<SimdTier>> = OnceLock::new();

/// Returns the tiers usable on this CPU, most capable first.
///
/// Detection runs once; the result is cached for the process lifetime.
/// The last element is always [`SimdTier::Scalar`].
#[must_use]
pub fn available_tiers() -> &'static [SimdTier] {
    AVAILABLE_TIERS.get_or_init(|| SimdFeatures::detect().tiers())
}

/// Detects the best SIMD tier ahead of time.
///
/// Calling this at startup moves the CPU probe out of the first kernel call.
#[must_use]
pub fn detect_target() -> SimdTier {
    available_tiers()
        .first()
        .copied()
        .unwrap_or(SimdTier::Scalar)
}
