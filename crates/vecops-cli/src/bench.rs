//! Wall-clock timing of one distance metric, dispatched versus scalar.

use std::fmt;
use std::hint::black_box;
use std::time::{Duration, Instant};
use vecops_core::{dispatch_info, simd_scalar, DistanceFn, DistanceMetric, SimdTier};

/// Result of one `vecops bench` run.
pub struct BenchReport {
    metric: DistanceMetric,
    dim: usize,
    iters: usize,
    tier: SimdTier,
    dispatched: Duration,
    scalar: Duration,
    checksum_delta: f32,
}

#[allow(clippy::cast_precision_loss)]
fn generate_vector(dim: usize, seed: u64) -> Vec<f32> {
    let mut x = seed;
    (0..dim)
        .map(|_| {
            x = x.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            (x as f32 / u64::MAX as f32) * 2.0 - 1.0
        })
        .collect()
}

fn scalar_inner_product_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - simd_scalar::inner_product(a, b)
}

fn time_kernel(kernel: DistanceFn, a: &[f32], b: &[f32], iters: usize) -> (Duration, f32) {
    let mut acc = 0.0f32;
    let start = Instant::now();
    for _ in 0..iters {
        acc += kernel(black_box(a), black_box(b));
    }
    (start.elapsed(), acc)
}

/// Runs `iters` calls of the dispatched and the scalar kernel for `metric`.
#[allow(clippy::cast_precision_loss)]
pub fn run(metric: DistanceMetric, dim: usize, iters: usize, seed: u64) -> BenchReport {
    let mut a = generate_vector(dim, seed);
    let mut b = generate_vector(dim, seed.wrapping_add(1));
    if metric.requires_normalized_input() {
        vecops_core::normalize(&mut a);
        vecops_core::normalize(&mut b);
    }

    let info = dispatch_info();
    let (tier, scalar_fn): (SimdTier, DistanceFn) = match metric {
        DistanceMetric::InnerProduct => (info.inner_product, scalar_inner_product_distance),
        DistanceMetric::L2 => (info.l2_distance_squared, simd_scalar::l2_distance_squared),
    };

    tracing::debug!(%metric, dim, iters, %tier, "Starting kernel benchmark");

    // One untimed pass each so neither side pays for cold caches.
    let _ = time_kernel(metric.distance_fn(), &a, &b, 1);
    let _ = time_kernel(scalar_fn, &a, &b, 1);

    let (dispatched, dispatched_sum) = time_kernel(metric.distance_fn(), &a, &b, iters);
    let (scalar, scalar_sum) = time_kernel(scalar_fn, &a, &b, iters);

    BenchReport {
        metric,
        dim,
        iters,
        tier,
        dispatched,
        scalar,
        checksum_delta: (dispatched_sum - scalar_sum).abs() / iters as f32,
    }
}

#[allow(clippy::cast_precision_loss)]
fn ns_per_call(total: Duration, iters: usize) -> f64 {
    total.as_nanos() as f64 / iters as f64
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dispatched_ns = ns_per_call(self.dispatched, self.iters);
        let scalar_ns = ns_per_call(self.scalar, self.iters);
        let speedup = if dispatched_ns > 0.0 {
            scalar_ns / dispatched_ns
        } else {
            f64::INFINITY
        };

        writeln!(f, "metric={} dim={} iters={}", self.metric, self.dim, self.iters)?;
        writeln!(f, "  {:<12} {:>10.1} ns/call", self.tier.name(), dispatched_ns)?;
        writeln!(f, "  {:<12} {:>10.1} ns/call", "Scalar", scalar_ns)?;
        writeln!(f, "  speedup      {:>10.2}x", speedup)?;
        write!(f, "  mean |dispatched - scalar| = {:e}", self.checksum_delta)
    }
}
