//! End-to-end tests for the graph pipeline and the factorization engine.
//!
//! Each test goes through the public API only: points → A → D → W → H.

use symnmf_core::{
    analysis_report, cluster_assignments, kmeans_labels, degree, factorize, factorize_default, initial_factor, normalized,
    run_goal, silhouette_score, similarity, ConvergedGeneration, Goal, GoalOptions, Matrix,
    SymNmfConfig, SymNmfError, Termination,
};

// ─── helpers ─────────────────────────────────────────────────────────────────

/// Two tight groups of three points, far apart.
fn two_clusters() -> Matrix {
    Matrix::from_rows(&[
        [0.0, 0.0],
        [0.3, 0.1],
        [0.1, 0.4],
        [4.0, 4.0],
        [4.2, 3.9],
        [3.8, 4.1],
    ])
    .unwrap()
}

fn assert_close(a: &Matrix, b: &Matrix, tol: f64) {
    assert_eq!(a.shape(), b.shape());
    for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
        assert!((x - y).abs() <= tol, "{x} vs {y} (tol {tol})");
    }
}

// ─── graph pipeline ──────────────────────────────────────────────────────────

#[test]
fn test_two_point_scenario() {
    let x = Matrix::from_rows(&[[0.0, 0.0], [1.0, 1.0]]).unwrap();
    let e = (-1.0f64).exp();

    let a = similarity(&x).unwrap();
    assert_close(&a, &Matrix::from_rows(&[[0.0, e], [e, 0.0]]).unwrap(), 1e-12);

    let d = degree(&x).unwrap();
    assert_close(&d, &Matrix::from_rows(&[[e, 0.0], [0.0, e]]).unwrap(), 1e-12);

    let w = normalized(&x).unwrap();
    assert_close(&w, &Matrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap(), 1e-12);
}

#[test]
fn test_normalized_matches_explicit_products() {
    let x = two_clusters();
    let a = similarity(&x).unwrap();
    let d_half = degree(&x).unwrap().inverse_sqrt_elementwise().unwrap();
    let expected = d_half.multiply(&a).unwrap().multiply(&d_half).unwrap();
    assert_close(&normalized(&x).unwrap(), &expected, 0.0);
}

#[test]
fn test_similarity_block_structure() {
    let a = similarity(&two_clusters()).unwrap();
    // within a group: close to 1; across groups: ~exp(-16)
    assert!(a[(0, 1)] > 0.9);
    assert!(a[(3, 4)] > 0.9);
    assert!(a[(0, 3)] < 1e-6);
}

// ─── factorization ───────────────────────────────────────────────────────────

#[test]
fn test_factorization_recovers_clusters() {
    let x = two_clusters();
    let w = normalized(&x).unwrap();
    let h0 = initial_factor(&w, 2, 1234).unwrap();
    // tighter threshold than the default so the split is complete, same budget
    let config = SymNmfConfig { epsilon: 1e-8, ..SymNmfConfig::default() };
    let out = factorize(&h0, &w, &config).unwrap();

    assert!(out.iterations <= 300);
    assert!(out.factor.as_slice().iter().all(|&v| v >= 0.0));

    let labels = cluster_assignments(&out.factor);
    assert_eq!(labels[0], labels[1]);
    assert_eq!(labels[1], labels[2]);
    assert_eq!(labels[3], labels[4]);
    assert_eq!(labels[4], labels[5]);
    assert_ne!(labels[0], labels[3]);

    let score = silhouette_score(&x, &labels).unwrap();
    assert!(score > 0.8, "silhouette = {score}");
}

#[test]
fn test_analysis_report_scores_both_clusterings() {
    let x = two_clusters();
    let config = SymNmfConfig { epsilon: 1e-8, ..SymNmfConfig::default() };
    let report = analysis_report(&x, 2, 1234, &config).unwrap();
    assert!(report.nmf > 0.8, "nmf = {}", report.nmf);
    assert!(report.kmeans > 0.8, "kmeans = {}", report.kmeans);

    // both methods find the same partition here, so the scores agree
    let labels = kmeans_labels(&x, 2, 300, 1234).unwrap();
    assert_eq!(silhouette_score(&x, &labels).unwrap(), report.kmeans);
    assert!((report.nmf - report.kmeans).abs() < 1e-12);

    let text = report.to_string();
    assert!(text.starts_with("nmf: "));
    assert!(text.contains("\nkmeans: "));
}

#[test]
fn test_rerun_from_output_converges_immediately() {
    let w = Matrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap();
    let h0 = Matrix::from_rows(&[[0.5], [0.5]]).unwrap();
    let first = factorize_default(&h0, &w).unwrap();
    assert!(first.converged());

    let second = factorize_default(&first.factor, &w).unwrap();
    assert_eq!(second.termination, Termination::Converged);
    assert_eq!(second.iterations, 1);
}

#[test]
fn test_generation_policies_differ_by_one_step() {
    let w = Matrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap();
    let h0 = Matrix::from_rows(&[[0.5], [0.5]]).unwrap();

    let latest = factorize_default(&h0, &w).unwrap();
    let previous = factorize(
        &h0,
        &w,
        &SymNmfConfig {
            converged_generation: ConvergedGeneration::Previous,
            ..SymNmfConfig::default()
        },
    )
    .unwrap();

    assert_eq!(latest.iterations, previous.iterations);
    // stepping the returned previous generation once more yields the latest one
    let one_step = factorize(
        &previous.factor,
        &w,
        &SymNmfConfig { max_iter: 1, ..SymNmfConfig::default() },
    )
    .unwrap();
    assert_close(&one_step.factor, &latest.factor, 1e-12);
}

#[test]
fn test_exhaustion_is_deterministic() {
    let x = two_clusters();
    let w = normalized(&x).unwrap();
    let h0 = initial_factor(&w, 2, 99).unwrap();
    let config = SymNmfConfig { max_iter: 2, epsilon: 1e-300, ..SymNmfConfig::default() };

    let a = factorize(&h0, &w, &config).unwrap();
    let b = factorize(&h0, &w, &config).unwrap();
    assert_eq!(a.termination, Termination::Exhausted);
    assert_eq!(a.iterations, 2);
    assert_eq!(a, b);
}

#[test]
fn test_rank_must_be_below_point_count() {
    let w = normalized(&two_clusters()).unwrap();
    let h = Matrix::from_vec(6, 6, vec![0.1; 36]).unwrap();
    assert!(matches!(
        factorize_default(&h, &w).unwrap_err(),
        SymNmfError::InvalidRank { rank: 6, points: 6 }
    ));
}

// ─── goal dispatch ───────────────────────────────────────────────────────────

#[test]
fn test_goals_match_direct_calls() {
    let x = two_clusters();
    let opts = GoalOptions::default();
    assert_eq!(run_goal(Goal::Sym, &x, &opts).unwrap(), similarity(&x).unwrap());
    assert_eq!(run_goal(Goal::Ddg, &x, &opts).unwrap(), degree(&x).unwrap());
    assert_eq!(run_goal(Goal::parse("bogus"), &x, &opts).unwrap(), normalized(&x).unwrap());
}

#[test]
fn test_symnmf_goal_is_reproducible() {
    let x = two_clusters();
    let opts = GoalOptions { rank: Some(2), seed: 5, ..GoalOptions::default() };
    let h1 = run_goal(Goal::SymNmf, &x, &opts).unwrap();
    let h2 = run_goal(Goal::SymNmf, &x, &opts).unwrap();
    assert_eq!(h1, h2);
    assert_eq!(h1.shape(), (6, 2));
}
