//! Zero-overhead kernel dispatch using `OnceLock`.
//!
//! Each kernel family (inner product, squared L2, normalize) has one
//! implementation per [`SimdTier`] it was compiled for. On first use the
//! CPU is probed, the best registered implementation per family is chosen
//! and the resulting function pointers are cached for the process lifetime.
//!
//! # Performance
//!
//! - **No per-call feature checks**: `is_x86_feature_detected!` runs once
//! - **One indirect call**: entry points load the cached pointer and jump
//!
//! # Concurrency
//!
//! `OnceLock` runs exactly one initializer even when many threads race the
//! first call, and publishes the finished table with release/acquire
//! ordering, so no thread can observe a partially written pointer.

use crate::config::{DispatchConfig, VecopsConfig};
use crate::simd_scalar;
use crate::tier::{available_tiers, SimdTier};
use std::sync::OnceLock;
use std::time::Instant;

/// Signature shared by binary distance kernels and usable as a metric handle.
pub type DistanceFn = fn(&[f32], &[f32]) -> f32;

/// Signature of in-place normalization kernels.
pub type NormalizeFn = fn(&mut [f32]);

/// Kernels compiled for one tier. `None` means the tier has no implementation
/// for that family.
#[derive(Clone, Copy)]
pub(crate) struct KernelSlots {
    pub(crate) inner_product: Option<DistanceFn>,
    pub(crate) l2_distance_squared: Option<DistanceFn>,
    pub(crate) normalize: Option<NormalizeFn>,
}

impl KernelSlots {
    const EMPTY: Self = Self {
        inner_product: None,
        l2_distance_squared: None,
        normalize: None,
    };
}

/// Returns the kernels compiled for `tier` on this target.
///
/// Callers must only invoke the result for tiers that were detected.
pub(crate) fn registered_kernels(tier: SimdTier) -> KernelSlots {
    match tier {
        SimdTier::Scalar => KernelSlots {
            inner_product: Some(simd_scalar::inner_product),
            l2_distance_squared: Some(simd_scalar::l2_distance_squared),
            normalize: Some(simd_scalar::normalize),
        },
        SimdTier::Portable => KernelSlots {
            inner_product: Some(crate::simd_explicit::inner_product_simd),
            l2_distance_squared: Some(crate::simd_explicit::l2_distance_squared_simd),
            normalize: Some(crate::simd_explicit::normalize_simd),
        },
        SimdTier::Neon => {
            #[cfg(target_arch = "aarch64")]
            {
                KernelSlots {
                    inner_product: Some(crate::simd_neon::inner_product_neon_safe),
                    l2_distance_squared: Some(crate::simd_neon::l2_distance_squared_neon_safe),
                    normalize: Some(crate::simd_neon::normalize_neon_safe),
                }
            }
            #[cfg(not(target_arch = "aarch64"))]
            {
                KernelSlots::EMPTY
            }
        }
        SimdTier::Avx2 => {
            #[cfg(target_arch = "x86_64")]
            {
                KernelSlots {
                    inner_product: Some(crate::simd_native::inner_product_avx2_safe),
                    l2_distance_squared: Some(crate::simd_native::l2_distance_squared_avx2_safe),
                    normalize: Some(crate::simd_native::normalize_avx2_safe),
                }
            }
            #[cfg(not(target_arch = "x86_64"))]
            {
                KernelSlots::EMPTY
            }
        }
        SimdTier::Avx512 => {
            #[cfg(target_arch = "x86_64")]
            {
                KernelSlots {
                    inner_product: Some(crate::simd_native::inner_product_avx512_safe),
                    l2_distance_squared: Some(
                        crate::simd_native::l2_distance_squared_avx512_safe,
                    ),
                    normalize: Some(crate::simd_native::normalize_avx512_safe),
                }
            }
            #[cfg(not(target_arch = "x86_64"))]
            {
                KernelSlots::EMPTY
            }
        }
    }
}

/// A kernel chosen for one family, with the tier it came from.
#[derive(Debug, Clone, Copy)]
pub struct Selected<F> {
    /// Tier of the selected implementation.
    pub tier: SimdTier,
    /// The implementation itself.
    pub kernel: F,
}

/// Picks the best implementation for one kernel family.
///
/// Walks `tiers` (best first), skipping anything above `cap`, and takes the
/// first tier `lookup` has an implementation for. If none match, returns
/// `fallback` tagged as [`SimdTier::Scalar`].
pub(crate) fn select_kernel<F: Copy>(
    family: &'static str,
    tiers: &[SimdTier],
    cap: Option<SimdTier>,
    lookup: impl Fn(SimdTier) -> Option<F>,
    fallback: F,
) -> Selected<F> {
    let mut candidates = tiers
        .iter()
        .copied()
        .filter(|&tier| cap.is_none_or(|max| tier <= max));
    let preferred = candidates.clone().next();

    let selected = candidates
        .find_map(|tier| lookup(tier).map(|kernel| Selected { tier, kernel }))
        .unwrap_or(Selected {
            tier: SimdTier::Scalar,
            kernel: fallback,
        });

    if let Some(preferred) = preferred {
        if preferred != selected.tier {
            tracing::debug!(
                family,
                preferred = %preferred,
                selected = %selected.tier,
                "No kernel registered for preferred tier, falling back"
            );
        }
    }

    selected
}

/// Resolved kernel selection for every family.
#[derive(Debug, Clone, Copy)]
pub struct DispatchTable {
    inner_product: Selected<DistanceFn>,
    l2_distance_squared: Selected<DistanceFn>,
    normalize: Selected<NormalizeFn>,
    max_tier: Option<SimdTier>,
    init_time_ms: f64,
}

impl DispatchTable {
    /// Resolves a table against the detected tiers without touching the global one.
    #[must_use]
    pub fn resolve(config: &DispatchConfig) -> Self {
        Self::resolve_for(available_tiers(), config)
    }

    pub(crate) fn resolve_for(tiers: &[SimdTier], config: &DispatchConfig) -> Self {
        let start = Instant::now();
        let cap = config.max_tier;

        let inner_product = select_kernel(
            "inner_product",
            tiers,
            cap,
            |t| registered_kernels(t).inner_product,
            simd_scalar::inner_product as DistanceFn,
        );
        let l2_distance_squared = select_kernel(
            "l2_distance_squared",
            tiers,
            cap,
            |t| registered_kernels(t).l2_distance_squared,
            simd_scalar::l2_distance_squared as DistanceFn,
        );
        let normalize = select_kernel(
            "normalize",
            tiers,
            cap,
            |t| registered_kernels(t).normalize,
            simd_scalar::normalize as NormalizeFn,
        );

        Self {
            inner_product,
            l2_distance_squared,
            normalize,
            max_tier: cap,
            init_time_ms: start.elapsed().as_secs_f64() * 1000.0,
        }
    }

    /// Selected inner product kernel.
    #[inline]
    #[must_use]
    pub fn inner_product(&self) -> Selected<DistanceFn> {
        self.inner_product
    }

    /// Selected squared L2 kernel.
    #[inline]
    #[must_use]
    pub fn l2_distance_squared(&self) -> Selected<DistanceFn> {
        self.l2_distance_squared
    }

    /// Selected normalize kernel.
    #[inline]
    #[must_use]
    pub fn normalize(&self) -> Selected<NormalizeFn> {
        self.normalize
    }

    /// Snapshot of this table for logging and introspection.
    #[must_use]
    pub fn info(&self) -> DispatchInfo {
        DispatchInfo {
            inner_product: self.inner_product.tier,
            l2_distance_squared: self.l2_distance_squared.tier,
            normalize: self.normalize.tier,
            inner_product_fn: self.inner_product.kernel,
            l2_distance_squared_fn: self.l2_distance_squared.kernel,
            normalize_fn: self.normalize.kernel,
            available_tiers: available_tiers().to_vec(),
            max_tier: self.max_tier,
            init_time_ms: self.init_time_ms,
        }
    }
}

/// Global dispatch table, resolved on first use.
static DISPATCH: OnceLock<DispatchTable> = OnceLock::new();

/// Lazy initializer: environment-only config, so first use never reads files.
fn resolve_from_env() -> DispatchTable {
    let config = VecopsConfig::from_env().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Invalid VECOPS_* environment, using default dispatch config");
        VecopsConfig::default()
    });
    let table = DispatchTable::resolve(&config.dispatch);
    log_table(&table);
    table
}

fn log_table(table: &DispatchTable) {
    tracing::info!(
        inner_product = %table.inner_product.tier,
        l2_distance_squared = %table.l2_distance_squared.tier,
        normalize = %table.normalize.tier,
        available_tiers = ?available_tiers(),
        max_tier = ?table.max_tier,
        "SIMD dispatch resolved"
    );
}

/// Returns the process-wide dispatch table, resolving it on first call.
#[inline]
#[must_use]
pub fn dispatch_table() -> &'static DispatchTable {
    DISPATCH.get_or_init(resolve_from_env)
}

/// Resolves the global dispatch table eagerly with an explicit configuration.
///
/// Call this at startup to move CPU detection out of the first kernel call
/// and to apply a file-based config. If the table was already resolved
/// (by an earlier call or by lazy first use), the existing selection is kept
/// and returned: selection never changes once made.
///
/// # Example
///
/// ```
/// use vecops_core::{init_dispatch, VecopsConfig};
///
/// let info = init_dispatch(&VecopsConfig::default());
/// println!("{info}");
/// ```
pub fn init_dispatch(config: &VecopsConfig) -> DispatchInfo {
    let mut resolved_here = false;
    let table = DISPATCH.get_or_init(|| {
        resolved_here = true;
        let table = DispatchTable::resolve(&config.dispatch);
        log_table(&table);
        table
    });

    if !resolved_here && table.max_tier != config.dispatch.max_tier {
        tracing::info!(
            requested_max_tier = ?config.dispatch.max_tier,
            active_max_tier = ?table.max_tier,
            "SIMD dispatch already resolved, keeping existing selection"
        );
    }

    if config.dispatch.warmup {
        crate::simd_ops::warmup();
    }

    table.info()
}

/// Returns information about the active dispatch table.
#[must_use]
pub fn dispatch_info() -> DispatchInfo {
    dispatch_table().info()
}

/// Kernels of a single tier, for side-by-side comparison.
#[derive(Debug, Clone, Copy)]
pub struct KernelSet {
    /// Tier these kernels belong to.
    pub tier: SimdTier,
    /// Inner product kernel.
    pub inner_product: DistanceFn,
    /// Squared L2 kernel.
    pub l2_distance_squared: DistanceFn,
    /// Normalize kernel.
    pub normalize: NormalizeFn,
}

/// Returns the complete kernel set of `tier`, if it runs on this CPU.
///
/// Returns `None` for tiers that were not detected or that lack an
/// implementation for any family on this target.
#[must_use]
pub fn kernels_for(tier: SimdTier) -> Option<KernelSet> {
    if !tier.is_available() {
        return None;
    }
    let slots = registered_kernels(tier);
    Some(KernelSet {
        tier,
        inner_product: slots.inner_product?,
        l2_distance_squared: slots.l2_distance_squared?,
        normalize: slots.normalize?,
    })
}

/// Information about the dispatch table configuration.
#[derive(Debug, Clone)]
pub struct DispatchInfo {
    /// Tier selected for the inner product (and inner-product distance).
    pub inner_product: SimdTier,
    /// Tier selected for squared L2.
    pub l2_distance_squared: SimdTier,
    /// Tier selected for normalize.
    pub normalize: SimdTier,
    /// Selected inner product kernel.
    pub inner_product_fn: DistanceFn,
    /// Selected squared L2 kernel.
    pub l2_distance_squared_fn: DistanceFn,
    /// Selected normalize kernel.
    pub normalize_fn: NormalizeFn,
    /// Tiers usable on this CPU, best first.
    pub available_tiers: Vec<SimdTier>,
    /// Configured cap, if any.
    pub max_tier: Option<SimdTier>,
    /// Time taken to resolve the table (ms).
    pub init_time_ms: f64,
}

impl DispatchInfo {
    /// Returns true if both snapshots route every family to the same kernel.
    #[must_use]
    pub fn same_selection(&self, other: &Self) -> bool {
        self.inner_product == other.inner_product
            && self.l2_distance_squared == other.l2_distance_squared
            && self.normalize == other.normalize
            && std::ptr::fn_addr_eq(self.inner_product_fn, other.inner_product_fn)
            && std::ptr::fn_addr_eq(self.l2_distance_squared_fn, other.l2_distance_squared_fn)
            && std::ptr::fn_addr_eq(self.normalize_fn, other.normalize_fn)
    }
}

impl std::fmt::Display for DispatchInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SIMD Dispatch Info:")?;
        writeln!(f, "  Available tiers: {:?}", self.available_tiers)?;
        match self.max_tier {
            Some(max) => writeln!(f, "  Max tier: {max}")?,
            None => writeln!(f, "  Max tier: auto")?,
        }
        writeln!(f, "  Inner product: {}", self.inner_product)?;
        writeln!(f, "  L2 squared: {}", self.l2_distance_squared)?;
        writeln!(f, "  Normalize: {}", self.normalize)?;
        write!(f, "  Init time: {:.3}ms", self.init_time_ms)
    }
}
