//! Python FFI bindings via PyO3.
//!
//! Exposes the graph pipeline and the factorization engine on plain nested
//! lists, so Python drivers can prepare data with whatever tooling they like.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! import symnmf_core as sn
//!
//! X = [[0.0, 0.0], [0.1, 0.0], [5.0, 5.0], [5.1, 5.0]]
//! W = sn.norm(X)
//! H0 = sn.initial_factor(W, 2)
//! H = sn.symnmf(H0, W, len(X), 2)
//! labels = sn.cluster_assignments(H)
//! print(sn.silhouette_score(X, labels))
//! nmf, kmeans = sn.analysis_report(X, 2)
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::analysis;
use crate::error::SymNmfError;
use crate::factorize::{
    factorize, SymNmfConfig, DEFAULT_BETA, DEFAULT_EPSILON, DEFAULT_MAX_ITER,
};
use crate::graph;
use crate::init::{self, DEFAULT_SEED};
use crate::matrix::Matrix;

fn to_py_err(e: SymNmfError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn to_matrix(rows: &[Vec<f64>]) -> PyResult<Matrix> {
    Matrix::from_rows(rows).map_err(to_py_err)
}

/// Check that a Python-supplied shape agrees with the data.
fn expect_shape(name: &str, m: &Matrix, rows: usize, cols: usize) -> PyResult<()> {
    if m.shape() != (rows, cols) {
        return Err(PyValueError::new_err(format!(
            "{name} must be {rows}x{cols}, got {}x{}",
            m.rows(),
            m.cols()
        )));
    }
    Ok(())
}

// ── Graph pipeline ────────────────────────────────────────────────────────────

/// Similarity matrix of the points (one point per inner list).
#[pyfunction(name = "sym")]
fn py_sym(points: Vec<Vec<f64>>) -> PyResult<Vec<Vec<f64>>> {
    let x = to_matrix(&points)?;
    Ok(graph::similarity(&x).map_err(to_py_err)?.to_rows())
}

/// Diagonal degree matrix of the points.
#[pyfunction(name = "ddg")]
fn py_ddg(points: Vec<Vec<f64>>) -> PyResult<Vec<Vec<f64>>> {
    let x = to_matrix(&points)?;
    Ok(graph::degree(&x).map_err(to_py_err)?.to_rows())
}

/// Normalized similarity matrix of the points.
#[pyfunction(name = "norm")]
fn py_norm(points: Vec<Vec<f64>>) -> PyResult<Vec<Vec<f64>>> {
    let x = to_matrix(&points)?;
    Ok(graph::normalized(&x).map_err(to_py_err)?.to_rows())
}

// ── Factorization ─────────────────────────────────────────────────────────────

/// Run SymNMF and return the final factor matrix.
///
/// Args:
///     h:        initial n×k non-negative factor
///     w:        n×n normalized similarity matrix
///     n:        number of points
///     k:        target rank
///     max_iter: iteration budget (default 300)
///     epsilon:  convergence threshold (default 1e-4)
///     beta:     relaxation weight (default 0.5)
#[pyfunction(name = "symnmf")]
#[pyo3(signature = (h, w, n, k, max_iter=DEFAULT_MAX_ITER, epsilon=DEFAULT_EPSILON, beta=DEFAULT_BETA))]
fn py_symnmf(
    h: Vec<Vec<f64>>,
    w: Vec<Vec<f64>>,
    n: usize,
    k: usize,
    max_iter: usize,
    epsilon: f64,
    beta: f64,
) -> PyResult<Vec<Vec<f64>>> {
    let h = to_matrix(&h)?;
    let w = to_matrix(&w)?;
    expect_shape("h", &h, n, k)?;
    expect_shape("w", &w, n, n)?;
    let config = SymNmfConfig {
        beta,
        max_iter,
        epsilon,
        ..SymNmfConfig::default()
    };
    let out = factorize(&h, &w, &config).map_err(to_py_err)?;
    Ok(out.factor.to_rows())
}

/// Random initial factor for `w` with entries in [0, 2·sqrt(mean(w)/k)].
#[pyfunction(name = "initial_factor")]
#[pyo3(signature = (w, k, seed=DEFAULT_SEED))]
fn py_initial_factor(w: Vec<Vec<f64>>, k: usize, seed: u64) -> PyResult<Vec<Vec<f64>>> {
    let w = to_matrix(&w)?;
    Ok(init::initial_factor(&w, k, seed).map_err(to_py_err)?.to_rows())
}

/// Hard cluster label per row of `h` (argmax column).
#[pyfunction(name = "cluster_assignments")]
fn py_cluster_assignments(h: Vec<Vec<f64>>) -> PyResult<Vec<usize>> {
    let h = to_matrix(&h)?;
    Ok(init::cluster_assignments(&h))
}

/// Mean silhouette coefficient of `labels` over `points`.
#[pyfunction(name = "silhouette_score")]
fn py_silhouette_score(points: Vec<Vec<f64>>, labels: Vec<usize>) -> PyResult<f64> {
    let x = to_matrix(&points)?;
    analysis::silhouette_score(&x, &labels).map_err(to_py_err)
}

/// k-means labels of the points (k-means++ seeding, Lloyd iterations).
#[pyfunction(name = "kmeans_labels")]
#[pyo3(signature = (points, k, max_iter=analysis::DEFAULT_KMEANS_ITER, seed=DEFAULT_SEED))]
fn py_kmeans_labels(
    points: Vec<Vec<f64>>,
    k: usize,
    max_iter: usize,
    seed: u64,
) -> PyResult<Vec<usize>> {
    let x = to_matrix(&points)?;
    analysis::kmeans_labels(&x, k, max_iter, seed).map_err(to_py_err)
}

/// Silhouette scores of SymNMF and k-means on the same points, as `(nmf, kmeans)`.
#[pyfunction(name = "analysis_report")]
#[pyo3(signature = (points, k, seed=DEFAULT_SEED))]
fn py_analysis_report(points: Vec<Vec<f64>>, k: usize, seed: u64) -> PyResult<(f64, f64)> {
    let x = to_matrix(&points)?;
    let report =
        analysis::analysis_report(&x, k, seed, &SymNmfConfig::default()).map_err(to_py_err)?;
    Ok((report.nmf, report.kmeans))
}

// ── Module entry point ────────────────────────────────────────────────────────

/// SymNMF: similarity graphs and symmetric non-negative matrix factorization.
#[pymodule]
pub fn symnmf_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_sym, m)?)?;
    m.add_function(wrap_pyfunction!(py_ddg, m)?)?;
    m.add_function(wrap_pyfunction!(py_norm, m)?)?;
    m.add_function(wrap_pyfunction!(py_symnmf, m)?)?;
    m.add_function(wrap_pyfunction!(py_initial_factor, m)?)?;
    m.add_function(wrap_pyfunction!(py_cluster_assignments, m)?)?;
    m.add_function(wrap_pyfunction!(py_silhouette_score, m)?)?;
    m.add_function(wrap_pyfunction!(py_kmeans_labels, m)?)?;
    m.add_function(wrap_pyfunction!(py_analysis_report, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
