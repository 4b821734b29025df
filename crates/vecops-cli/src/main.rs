#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
//! `vecops` CLI - inspect kernel dispatch and measure kernel throughput
//!
//! Usage:
//!   `vecops info`
//!   `vecops info --json`
//!   `vecops bench --dim 768 --iters 100000 --metric l2`
//!   `vecops --config ./vecops.toml bench`

mod bench;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vecops_core::{DistanceMetric, VecopsConfig};

#[derive(Parser)]
#[command(name = "vecops")]
#[command(author, version, about = "vecops - SIMD kernel dispatch inspector")]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a configuration file (defaults to ./vecops.toml if present)
    #[arg(short, long, global = true, env = "VECOPS_CONFIG")]
    config: Option<PathBuf>,

    /// Log level override (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// CLI metric option
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum MetricArg {
    /// Inner-product distance (`1 - a·b`)
    #[default]
    Ip,
    /// Squared Euclidean distance
    L2,
}

impl From<MetricArg> for DistanceMetric {
    fn from(m: MetricArg) -> Self {
        match m {
            MetricArg::Ip => DistanceMetric::InnerProduct,
            MetricArg::L2 => DistanceMetric::L2,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show detected tiers and the selected kernel per family
    Info {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Time the dispatched kernel against the scalar reference
    Bench {
        /// Vector dimension
        #[arg(short, long, default_value = "768")]
        dim: usize,

        /// Kernel calls per measurement
        #[arg(short, long, default_value = "100000")]
        iters: usize,

        /// Distance metric to measure
        #[arg(short, long, value_enum, default_value_t = MetricArg::Ip)]
        metric: MetricArg,

        /// Seed for the generated vectors
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<VecopsConfig> {
    let config = match path {
        Some(path) => VecopsConfig::load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => VecopsConfig::load().context("loading configuration")?,
    };
    config.validate().context("validating configuration")?;
    Ok(config)
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_ref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
        config.validate().context("validating --log-level")?;
    }
    init_tracing(&config.logging.level);

    let info = vecops_core::init_dispatch(&config);

    match cli.command {
        Commands::Info { json } => {
            if json {
                let value = serde_json::json!({
                    "detected_target": vecops_core::detect_target().to_string(),
                    "available_tiers": info
                        .available_tiers
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>(),
                    "max_tier": info.max_tier.map(|t| t.to_string()),
                    "inner_product": info.inner_product.to_string(),
                    "l2_distance_squared": info.l2_distance_squared.to_string(),
                    "normalize": info.normalize.to_string(),
                    "init_time_ms": info.init_time_ms,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{info}");
                println!("  Features: {:?}", vecops_core::SimdFeatures::detect());
            }
        }
        Commands::Bench {
            dim,
            iters,
            metric,
            seed,
        } => {
            anyhow::ensure!(iters > 0, "--iters must be at least 1");
            let report = bench::run(metric.into(), dim, iters, seed);
            println!("{report}");
        }
    }

    Ok(())
}
