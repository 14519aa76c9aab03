//! Compare SymNMF against k-means on one point file.
//!
//! ```bash
//! symnmf-analysis 3 points.txt
//! # nmf: 0.4812
//! # kmeans: 0.4790
//! ```
//!
//! Both lines report the mean silhouette coefficient of the respective
//! clustering. Failures print `An Error Has Occurred` and exit with status 1.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use symnmf_core::analysis::analysis_report;
use symnmf_core::factorize::DEFAULT_EPSILON;
use symnmf_core::init::DEFAULT_SEED;
use symnmf_core::io::read_points;
use symnmf_core::SymNmfConfig;

const FAILURE_MESSAGE: &str = "An Error Has Occurred";

/// Silhouette scores of SymNMF and k-means clusterings.
#[derive(Parser, Debug)]
#[command(name = "symnmf-analysis", version)]
struct Args {
    /// Number of clusters k.
    k: usize,

    /// Comma-separated point file, one point per line.
    file: PathBuf,

    /// Seed for the SymNMF initial factor and the k-means centroids.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Convergence threshold for the SymNMF engine.
    #[arg(long, default_value_t = DEFAULT_EPSILON)]
    epsilon: f64,
}

fn run(args: &Args) -> Result<()> {
    let points = read_points(&args.file)
        .with_context(|| format!("reading points from {}", args.file.display()))?;
    let config = SymNmfConfig {
        epsilon: args.epsilon,
        ..SymNmfConfig::default()
    };
    let report = analysis_report(&points, args.k, args.seed, &config)
        .with_context(|| format!("analysis with k = {}", args.k))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{report}")?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            debug!("argument error: {e}");
            println!("{FAILURE_MESSAGE}");
            return ExitCode::from(1);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{e:#}");
            println!("{FAILURE_MESSAGE}");
            ExitCode::from(1)
        }
    }
}
