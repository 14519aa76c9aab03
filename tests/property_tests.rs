//! Property-based tests for the matrix primitives, graph pipeline and engine.
//!
//! These use proptest to check structural properties that must hold for every
//! point set, not just the hand-picked scenarios in `pipeline_tests.rs`.

use proptest::prelude::*;
use symnmf_core::{
    degree, factorize, normalized, similarity, Matrix, SymNmfConfig, SymNmfError, Termination,
};

// Graph construction is O(n²·d); keep the case count modest.
fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    }
}

/// Point sets with 1..8 points in 1..4 dimensions, coordinates in [-5, 5].
fn point_set() -> impl Strategy<Value = Matrix> {
    (1usize..8, 1usize..4).prop_flat_map(|(n, d)| {
        prop::collection::vec(-5.0f64..5.0, n * d)
            .prop_map(move |data| Matrix::from_vec(n, d, data).unwrap())
    })
}

/// Strictly positive matrix of the given shape.
fn positive_matrix(rows: usize, cols: usize) -> impl Strategy<Value = Matrix> {
    prop::collection::vec(0.05f64..1.0, rows * cols)
        .prop_map(move |data| Matrix::from_vec(rows, cols, data).unwrap())
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn similarity_is_symmetric_with_zero_diagonal(x in point_set()) {
        let a = similarity(&x).unwrap();
        let n = x.rows();
        prop_assert_eq!(a.shape(), (n, n));
        for i in 0..n {
            prop_assert_eq!(a[(i, i)], 0.0);
            for j in 0..n {
                prop_assert_eq!(a[(i, j)], a[(j, i)]);
                prop_assert!((0.0..=1.0).contains(&a[(i, j)]));
            }
        }
    }

    #[test]
    fn degree_is_diagonal_of_row_sums(x in point_set()) {
        let a = similarity(&x).unwrap();
        let d = degree(&x).unwrap();
        let n = x.rows();
        for i in 0..n {
            let row_sum: f64 = a.row(i).iter().sum();
            prop_assert_eq!(d[(i, i)], row_sum);
            for j in 0..n {
                if i != j {
                    prop_assert_eq!(d[(i, j)], 0.0);
                }
            }
        }
    }

    #[test]
    fn normalized_is_symmetric(x in point_set()) {
        let w = normalized(&x).unwrap();
        prop_assert!(w.is_symmetric(1e-9));
        prop_assert!(w.as_slice().iter().all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn multiply_rejects_mismatched_inner_dims(
        n1 in 1usize..5, m1 in 1usize..5, n2 in 1usize..5, m2 in 1usize..5,
    ) {
        prop_assume!(m1 != n2);
        let a = Matrix::zeros(n1, m1).unwrap();
        let b = Matrix::zeros(n2, m2).unwrap();
        let is_mismatch = matches!(
            a.multiply(&b),
            Err(SymNmfError::DimensionMismatch { .. })
        );
        prop_assert!(is_mismatch);
    }

    #[test]
    fn multiply_shape_and_transpose_identity(a in positive_matrix(3, 2), b in positive_matrix(2, 4)) {
        // (A·B)ᵗ = Bᵗ·Aᵗ
        let ab_t = a.multiply(&b).unwrap().transpose().unwrap();
        let bt_at = b.transpose().unwrap().multiply(&a.transpose().unwrap()).unwrap();
        prop_assert_eq!(ab_t.shape(), (4, 3));
        for (x, y) in ab_t.as_slice().iter().zip(bt_at.as_slice()) {
            prop_assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    fn inverse_sqrt_fails_on_any_negative(
        data in prop::collection::vec(0.0f64..4.0, 9),
        idx in 0usize..9,
        neg in -4.0f64..-1e-6,
    ) {
        let mut data = data;
        data[idx] = neg;
        let m = Matrix::from_vec(3, 3, data).unwrap();
        let is_negative = matches!(
            m.inverse_sqrt_elementwise(),
            Err(SymNmfError::NegativeValue { .. })
        );
        prop_assert!(is_negative);
    }

    #[test]
    fn factorize_preserves_non_negativity(
        h in positive_matrix(5, 2),
        w in positive_matrix(5, 5),
        max_iter in 1usize..40,
    ) {
        // symmetrise W so it is a valid similarity input
        let wt = w.transpose().unwrap();
        let mut sym = Matrix::zeros(5, 5).unwrap();
        for i in 0..5 {
            for j in 0..5 {
                sym[(i, j)] = 0.5 * (w[(i, j)] + wt[(i, j)]);
            }
        }
        let config = SymNmfConfig { max_iter, ..SymNmfConfig::default() };
        let out = factorize(&h, &sym, &config).unwrap();
        prop_assert!(out.iterations <= max_iter);
        if out.termination == Termination::Exhausted {
            prop_assert_eq!(out.iterations, max_iter);
        }
        prop_assert!(out.factor.as_slice().iter().all(|&v| v >= 0.0 && v.is_finite()));
    }
}
