//! SymNMF factorization engine: multiplicative updates until convergence.
//!
//! Approximates a normalized similarity matrix `W` (`n × n`) by `H·Hᵗ` with
//! `H` (`n × k`) elementwise non-negative.
//!
//! # Update rule
//!
//! ```text
//! WH       = W · H
//! HHtH     = H · Hᵗ · H
//! H'[i][j] = H[i][j] · ((1 − β) + β · WH[i][j] / HHtH[i][j])
//! ```
//!
//! Each iteration builds a new generation `H'` from the current one; nothing
//! is updated in place. Iteration stops when `‖H' − H‖²_F < ε` (`Converged`)
//! or after `max_iter` updates (`Exhausted`).
//!
//! # Configurable edge behaviour
//!
//! - [`ConvergedGeneration`] picks which generation is returned on convergence.
//! - [`ZeroDenominator`] picks what happens when an `HHtH` entry is exactly zero.

use tracing::{debug, trace, warn};

use crate::error::{Result, SymNmfError};
use crate::matrix::Matrix;

/// Historical relaxation weight β.
pub const DEFAULT_BETA: f64 = 0.5;

/// Historical iteration budget.
pub const DEFAULT_MAX_ITER: usize = 300;

/// Historical convergence threshold on the squared Frobenius norm of the update.
pub const DEFAULT_EPSILON: f64 = 1e-4;

/// Which generation to return once the convergence test passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConvergedGeneration {
    /// The newest generation, the one whose step satisfied the threshold.
    #[default]
    Latest,
    /// The generation before the final update (one step behind).
    Previous,
}

/// Behaviour when an `H·Hᵗ·H` entry is exactly zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZeroDenominator {
    /// Abort with [`SymNmfError::DivideByZero`].
    #[default]
    Fail,
    /// Leave that entry of `H` unchanged for this iteration.
    Skip,
}

/// Parameters of the factorization engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymNmfConfig {
    /// Relaxation weight β in `(0, 1]`.  Default: 0.5.
    pub beta: f64,
    /// Maximum number of updates.  Default: 300.
    pub max_iter: usize,
    /// Convergence threshold ε (> 0) on `‖H' − H‖²_F`.  Default: 1e-4.
    pub epsilon: f64,
    /// Generation returned on convergence.  Default: `Latest`.
    pub converged_generation: ConvergedGeneration,
    /// Handling of zero denominators.  Default: `Fail`.
    pub zero_denominator: ZeroDenominator,
}

impl Default for SymNmfConfig {
    fn default() -> Self {
        Self {
            beta: DEFAULT_BETA,
            max_iter: DEFAULT_MAX_ITER,
            epsilon: DEFAULT_EPSILON,
            converged_generation: ConvergedGeneration::default(),
            zero_denominator: ZeroDenominator::default(),
        }
    }
}

impl SymNmfConfig {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.beta > 0.0 && self.beta <= 1.0) {
            return Err(SymNmfError::invalid_parameter(format!(
                "beta must be in (0, 1], got {}",
                self.beta
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(SymNmfError::invalid_parameter(format!(
                "epsilon must be finite and positive, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Terminal state of the iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// The update norm fell below ε.
    Converged,
    /// `max_iter` updates ran without meeting ε.
    Exhausted,
}

/// Result of [`factorize`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Factorization {
    /// Final factor matrix `H` (`n × k`).
    pub factor: Matrix,
    /// Number of updates performed.
    pub iterations: usize,
    /// How the loop ended.
    pub termination: Termination,
    /// `‖H' − H‖²_F` of the last update (`None` if no update ran).
    pub last_delta: Option<f64>,
}

impl Factorization {
    /// True if the loop ended by convergence.
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

/// Run SymNMF from `initial` (`n × k`) against normalized similarity `w` (`n × n`).
///
/// Fails on shape errors, `k ∉ 1..n`, invalid config, allocation failure, or
/// (with [`ZeroDenominator::Fail`]) a zero `H·Hᵗ·H` entry. Neither input is
/// modified.
pub fn factorize(initial: &Matrix, w: &Matrix, config: &SymNmfConfig) -> Result<Factorization> {
    config.validate()?;
    validate_shapes(initial, w)?;

    let (n, k) = initial.shape();
    debug!(n, k, max_iter = config.max_iter, "starting symnmf");

    let mut current = initial.try_clone()?;
    let mut last_delta = None;

    for iter in 1..=config.max_iter {
        let next = update_step(&current, w, config)?;
        let delta = next.subtract(&current)?.frobenius_norm_squared();
        last_delta = Some(delta);
        trace!(iter, delta, "symnmf update");

        if delta < config.epsilon {
            debug!(iterations = iter, delta, "symnmf converged");
            let factor = match config.converged_generation {
                ConvergedGeneration::Latest => next,
                ConvergedGeneration::Previous => current,
            };
            return Ok(Factorization {
                factor,
                iterations: iter,
                termination: Termination::Converged,
                last_delta,
            });
        }
        current = next;
    }

    warn!(
        max_iter = config.max_iter,
        last_delta = ?last_delta,
        "symnmf exhausted iteration budget without converging"
    );
    Ok(Factorization {
        factor: current,
        iterations: config.max_iter,
        termination: Termination::Exhausted,
        last_delta,
    })
}

/// [`factorize`] with the historical constants.
pub fn factorize_default(initial: &Matrix, w: &Matrix) -> Result<Factorization> {
    factorize(initial, w, &SymNmfConfig::default())
}

fn validate_shapes(h: &Matrix, w: &Matrix) -> Result<()> {
    if !w.is_square() {
        return Err(SymNmfError::dimension_mismatch("factorize", w.shape(), w.shape()));
    }
    if h.rows() != w.rows() {
        return Err(SymNmfError::dimension_mismatch("factorize", h.shape(), w.shape()));
    }
    let (n, k) = h.shape();
    if k == 0 || k >= n {
        return Err(SymNmfError::InvalidRank { rank: k, points: n });
    }
    Ok(())
}

/// One multiplicative update producing the next generation of `h`.
fn update_step(h: &Matrix, w: &Matrix, config: &SymNmfConfig) -> Result<Matrix> {
    let wh = w.multiply(h)?;
    let hhth = h.multiply(&h.transpose()?)?.multiply(h)?;

    let (n, k) = h.shape();
    let mut next = Matrix::zeros(n, k)?;
    for i in 0..n {
        for j in 0..k {
            let denom = hhth[(i, j)];
            next[(i, j)] = if denom == 0.0 {
                match config.zero_denominator {
                    ZeroDenominator::Fail => {
                        return Err(SymNmfError::DivideByZero { row: i, col: j })
                    }
                    ZeroDenominator::Skip => h[(i, j)],
                }
            } else {
                h[(i, j)] * ((1.0 - config.beta) + config.beta * wh[(i, j)] / denom)
            };
        }
    }
    Ok(next)
}

// ─── Tests ────────────────────────────────────────────────────────────────
