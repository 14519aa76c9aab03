//! Initial factor construction and hard cluster assignment.
//!
//! The engine needs a non-negative starting `H`. The conventional choice draws
//! each entry uniformly from `[0, 2·√(m/k)]`, where `m` is the mean entry of
//! `W`, so that `H·Hᵗ` starts on the same scale as `W`.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{Result, SymNmfError};
use crate::matrix::Matrix;

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 1234;

/// Draw a random `n × k` initial factor for normalized similarity `w`.
///
/// Deterministic for a given `seed`. Requires a square `w` and `1 ≤ k < n`.
pub fn initial_factor(w: &Matrix, k: usize, seed: u64) -> Result<Matrix> {
    if !w.is_square() {
        return Err(SymNmfError::dimension_mismatch(
            "initial_factor",
            w.shape(),
            w.shape(),
        ));
    }
    let n = w.rows();
    if k == 0 || k >= n {
        return Err(SymNmfError::InvalidRank { rank: k, points: n });
    }

    let upper = 2.0 * (w.mean() / k as f64).sqrt();
    if !upper.is_finite() {
        return Err(SymNmfError::invalid_parameter(format!(
            "initial factor bound is not finite (mean of W = {})",
            w.mean()
        )));
    }

    let dist = Uniform::new_inclusive(0.0, upper);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut h = Matrix::zeros(n, k)?;
    for i in 0..n {
        for v in h.row_mut(i) {
            *v = dist.sample(&mut rng);
        }
    }
    Ok(h)
}

/// Cluster label per point: the column of the largest entry in each row of `h`.
///
/// Ties go to the lowest column index.
pub fn cluster_assignments(h: &Matrix) -> Vec<usize> {
    h.iter_rows()
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |best, (j, &v)| {
                    if v > best.1 {
                        (j, v)
                    } else {
                        best
                    }
                })
                .0
        })
        .collect()
}
