//! # symnmf-core
//!
//! Graph-based clustering by Symmetric Non-negative Matrix Factorization.
//!
//! ---
//!
//! A point set becomes a Gaussian similarity graph, the graph is normalized by
//! vertex degree, and the normalized graph `W` is factorized as `W ≈ H·Hᵗ` with
//! `H ≥ 0`. Each row of `H` holds one point's association weights to the `k`
//! clusters; the largest weight is the point's cluster.
//!
//! ## The pipeline
//!
//! ```text
//! points X (n×d) → similarity A → degree D → normalized W = D^-½·A·D^-½
//!                                                   ↓
//!                         initial H₀ (n×k) → factorize → H (n×k) → labels
//! ```
//!
//! Every stage is callable on its own, so the pipeline can be entered or left
//! at any point.
//!
//! ## Module overview
//!
//! | Module | Key items | What it does |
//! |--------|-----------|--------------|
//! | [`matrix`] | [`Matrix`], [`euclidean_distance`] | Dense matrix and arithmetic primitives |
//! | [`graph`] | [`similarity`], [`degree`], [`normalized`] | Similarity-graph construction |
//! | [`factorize`] | [`factorize()`], [`SymNmfConfig`], [`Factorization`] | Multiplicative-update engine |
//! | [`init`] | [`initial_factor`], [`cluster_assignments`] | Starting factor and hard labels |
//! | [`analysis`] | [`silhouette_score`], [`kmeans_labels`], [`analysis_report`] | Clustering quality and the k-means comparison |
//! | [`io`] | [`read_points`], [`write_matrix`] | Point files in, formatted matrices out |
//! | [`goal`] | [`Goal`], [`run_goal`] | Selector dispatch used by the CLI |
//! | [`error`] | [`SymNmfError`] | Error kinds for every fallible operation |
//!
//! ## Example
//!
//! ```
//! use symnmf_core::{factorize, initial_factor, normalized, Matrix, SymNmfConfig};
//!
//! let x = Matrix::from_rows(&[[0.0, 0.0], [0.2, 0.1], [6.0, 6.0], [6.1, 5.9]])?;
//! let w = normalized(&x)?;
//! let h0 = initial_factor(&w, 2, 1234)?;
//! let out = factorize(&h0, &w, &SymNmfConfig::default())?;
//! assert_eq!(out.factor.shape(), (4, 2));
//! # Ok::<(), symnmf_core::SymNmfError>(())
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`Matrix`], [`Factorization`] and the config types.
//! - `python-ffi`: PyO3 extension module `symnmf_core`.
//! - `cli`: the `symnmf` and `symnmf-analysis` binaries.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod matrix;
pub mod graph;
pub mod factorize;
pub mod init;
pub mod analysis;
pub mod io;
pub mod goal;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use analysis::{analysis_report, kmeans_labels, silhouette_score, AnalysisReport};
pub use error::{Result, SymNmfError};
pub use factorize::{
    factorize, factorize_default, ConvergedGeneration, Factorization, SymNmfConfig, Termination,
    ZeroDenominator,
};
pub use goal::{run_goal, Goal, GoalOptions};
pub use graph::{degree, normalized, similarity};
pub use init::{cluster_assignments, initial_factor};
pub use io::{read_points, write_matrix};
pub use matrix::{euclidean_distance, Matrix};
