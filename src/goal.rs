//! Goal selection and end-to-end dispatch.
//!
//! ```text
//! sym     points → A
//! ddg     points → D
//! norm    points → W              (also the fallback for unknown selectors)
//! symnmf  points → W → H₀ → H     (needs a rank k)
//! ```

use core::convert::Infallible;
use core::fmt;
use core::str::FromStr;

use tracing::debug;

use crate::error::{Result, SymNmfError};
use crate::factorize::{factorize, SymNmfConfig};
use crate::graph::{degree, normalized, similarity};
use crate::init::{initial_factor, DEFAULT_SEED};
use crate::matrix::Matrix;

/// What to compute from a point set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Goal {
    /// Similarity matrix.
    Sym,
    /// Diagonal degree matrix.
    Ddg,
    /// Normalized similarity matrix.
    Norm,
    /// Full factorization of the normalized similarity matrix.
    SymNmf,
}

impl Goal {
    /// Parse a selector. Anything unrecognised means [`Goal::Norm`].
    pub fn parse(selector: &str) -> Self {
        match selector {
            "sym" => Self::Sym,
            "ddg" => Self::Ddg,
            "symnmf" => Self::SymNmf,
            _ => Self::Norm,
        }
    }

    /// Canonical selector string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sym => "sym",
            Self::Ddg => "ddg",
            Self::Norm => "norm",
            Self::SymNmf => "symnmf",
        }
    }
}

impl FromStr for Goal {
    type Err = Infallible;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra inputs for [`Goal::SymNmf`]; ignored by the other goals.
#[derive(Clone, Debug)]
pub struct GoalOptions {
    /// Target rank `k`.
    pub rank: Option<usize>,
    /// Seed for the random initial factor.
    pub seed: u64,
    /// Engine parameters.
    pub config: SymNmfConfig,
}

impl Default for GoalOptions {
    fn default() -> Self {
        Self {
            rank: None,
            seed: DEFAULT_SEED,
            config: SymNmfConfig::default(),
        }
    }
}

/// Compute `goal` for `points`.
pub fn run_goal(goal: Goal, points: &Matrix, options: &GoalOptions) -> Result<Matrix> {
    debug!(%goal, n = points.rows(), d = points.cols(), "running goal");
    match goal {
        Goal::Sym => similarity(points),
        Goal::Ddg => degree(points),
        Goal::Norm => normalized(points),
        Goal::SymNmf => {
            let k = options
                .rank
                .ok_or_else(|| SymNmfError::invalid_parameter("symnmf goal requires a rank"))?;
            let w = normalized(points)?;
            let h0 = initial_factor(&w, k, options.seed)?;
            Ok(factorize(&h0, &w, &options.config)?.factor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selectors() {
        assert_eq!(Goal::parse("sym"), Goal::Sym);
        assert_eq!(Goal::parse("ddg"), Goal::Ddg);
        assert_eq!(Goal::parse("norm"), Goal::Norm);
        assert_eq!(Goal::parse("symnmf"), Goal::SymNmf);
        assert_eq!(Goal::parse("whatever"), Goal::Norm);
        assert_eq!("ddg".parse::<Goal>().unwrap(), Goal::Ddg);
    }

    #[test]
    fn test_symnmf_requires_rank() {
        let x = Matrix::from_rows(&[[0.0], [1.0], [5.0]]).unwrap();
        let err = run_goal(Goal::SymNmf, &x, &GoalOptions::default()).unwrap_err();
        assert!(matches!(err, SymNmfError::InvalidParameter { .. }));
    }

    #[test]
    fn test_symnmf_shape() {
        let x = Matrix::from_rows(&[[0.0, 0.0], [0.1, 0.0], [5.0, 5.0], [5.1, 5.0]]).unwrap();
        let opts = GoalOptions { rank: Some(2), ..GoalOptions::default() };
        let h = run_goal(Goal::SymNmf, &x, &opts).unwrap();
        assert_eq!(h.shape(), (4, 2));
        assert!(h.as_slice().iter().all(|&v| v >= 0.0));
    }
}
