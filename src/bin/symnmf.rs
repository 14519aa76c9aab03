//! SymNMF command-line driver.
//!
//! ## Usage
//!
//! ```bash
//! # similarity / degree / normalized similarity of a point file
//! symnmf sym points.txt
//! symnmf ddg points.txt
//! symnmf norm points.txt
//!
//! # full factorization into k = 3 clusters
//! symnmf symnmf points.txt --rank 3 --seed 1234
//! ```
//!
//! The result matrix goes to stdout. Any failure prints `An Error Has Occurred`
//! and exits with status 1; set `RUST_LOG=debug` to see the underlying cause on
//! stderr.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use symnmf_core::goal::{run_goal, Goal, GoalOptions};
use symnmf_core::init::DEFAULT_SEED;
use symnmf_core::io::{read_points, write_matrix};

const FAILURE_MESSAGE: &str = "An Error Has Occurred";

/// Similarity graphs and symmetric non-negative matrix factorization.
#[derive(Parser, Debug)]
#[command(name = "symnmf", version)]
struct Args {
    /// Goal: sym, ddg, norm or symnmf (anything else means norm).
    goal: String,

    /// Comma-separated point file, one point per line.
    file: PathBuf,

    /// Target rank k for the symnmf goal.
    #[arg(short = 'k', long)]
    rank: Option<usize>,

    /// Seed for the random initial factor.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

fn run(args: &Args) -> Result<()> {
    let goal = Goal::parse(&args.goal);
    let points = read_points(&args.file)
        .with_context(|| format!("reading points from {}", args.file.display()))?;

    let options = GoalOptions {
        rank: args.rank,
        seed: args.seed,
        ..GoalOptions::default()
    };
    let result = run_goal(goal, &points, &options).with_context(|| format!("goal {goal}"))?;
    debug!(rows = result.rows(), cols = result.cols(), "writing result");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_matrix(&mut out, &result)?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    // stdout carries only the matrix; logs go to stderr.
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
