//! Similarity-graph construction: similarity → degree → normalized similarity.
//!
//! Each transform takes the `n × d` point set and is independently callable, so
//! the pipeline can be entered or left at any stage.
//!
//! ```text
//! A[i][j] = exp(-‖x_i − x_j‖² / 2)   (i ≠ j),   A[i][i] = 0
//! D[i][i] = Σ_j A[i][j]
//! W       = D^(-1/2) · A · D^(-1/2)
//! ```
//!
//! Intermediates are owned locals; on any failure they are dropped before the
//! error propagates.

use tracing::debug;

use crate::error::Result;
use crate::matrix::{euclidean_distance, Matrix};

/// Gaussian-kernel similarity matrix of the points (rows of `points`).
///
/// Symmetric by construction since the kernel is symmetric in its arguments;
/// the diagonal is fixed at `0.0`. O(n²·d).
pub fn similarity(points: &Matrix) -> Result<Matrix> {
    let n = points.rows();
    let mut a = Matrix::zeros(n, n)?;
    for i in 0..n {
        for j in 0..n {
            if i != j {
                let dist = euclidean_distance(points.row(i), points.row(j));
                a[(i, j)] = (-(dist * dist) / 2.0).exp();
            }
        }
    }
    debug!(n, d = points.cols(), "similarity matrix built");
    Ok(a)
}

/// Diagonal degree matrix: `D[i][i]` is the `i`-th row sum of [`similarity`].
pub fn degree(points: &Matrix) -> Result<Matrix> {
    let a = similarity(points)?;
    degree_of(&a)
}

/// Degree matrix of an already-built similarity matrix.
pub(crate) fn degree_of(a: &Matrix) -> Result<Matrix> {
    let n = a.rows();
    let mut d = Matrix::zeros(n, n)?;
    for i in 0..n {
        d[(i, i)] = a.row(i).iter().sum();
    }
    debug!(n, "degree matrix built");
    Ok(d)
}

/// Normalized similarity `W = D^(-1/2) · A · D^(-1/2)`.
///
/// Fails with `NegativeValue` if any degree entry is negative. Degrees of a
/// Gaussian similarity matrix are sums of non-negative terms, so this is
/// unreachable for finite input.
pub fn normalized(points: &Matrix) -> Result<Matrix> {
    let a = similarity(points)?;
    let d = degree_of(&a)?;
    let d_half = d.inverse_sqrt_elementwise()?;
    let left = d_half.multiply(&a)?;
    let w = left.multiply(&d_half)?;
    debug!(n = w.rows(), "normalized similarity matrix built");
    Ok(w)
}

// ─── Tests ────────────────────────────────────────────────────────────────
