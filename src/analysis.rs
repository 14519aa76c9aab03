//! Clustering quality: mean silhouette coefficient, a k-means baseline and
//! the SymNMF-vs-k-means comparison report.
//!
//! The silhouette compares the hard clusters read off a SymNMF factor against
//! any other labelling of the same points. Label values are arbitrary; only the
//! partition they induce matters.
//!
//! ```text
//! a(i) = mean distance from i to the other members of its cluster
//! b(i) = min over other clusters C of the mean distance from i to C
//! s(i) = (b(i) − a(i)) / max(a(i), b(i))      (0 for singleton clusters)
//! ```

use core::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::error::{Result, SymNmfError};
use crate::factorize::{factorize, SymNmfConfig};
use crate::graph::normalized;
use crate::init::{cluster_assignments, initial_factor};
use crate::matrix::{euclidean_distance, Matrix};

/// Iteration budget for the k-means baseline.
pub const DEFAULT_KMEANS_ITER: usize = 300;

/// Mean silhouette coefficient of `labels` over the rows of `points`, in `[-1, 1]`.
///
/// Fails with `InvalidParameter` unless `labels.len() == n` and the number of
/// distinct labels is between 2 and `n − 1` inclusive.
pub fn silhouette_score(points: &Matrix, labels: &[usize]) -> Result<f64> {
    let n = points.rows();
    if labels.len() != n {
        return Err(SymNmfError::invalid_parameter(format!(
            "expected {n} labels, got {}",
            labels.len()
        )));
    }

    // Dense cluster index per point, so sparse or huge label values stay cheap.
    let mut distinct_labels = labels.to_vec();
    distinct_labels.sort_unstable();
    distinct_labels.dedup();
    let dense: Vec<usize> = labels
        .iter()
        .filter_map(|l| distinct_labels.binary_search(l).ok())
        .collect();
    let n_clusters = distinct_labels.len();
    let mut sizes = vec![0usize; n_clusters];
    for &c in &dense {
        sizes[c] += 1;
    }
    let distinct = n_clusters;
    if distinct < 2 || distinct >= n {
        return Err(SymNmfError::invalid_parameter(format!(
            "silhouette needs 2..={} distinct labels, got {distinct}",
            n.saturating_sub(1)
        )));
    }

    let mut sums = vec![0.0f64; n_clusters];
    let mut total = 0.0;
    for i in 0..n {
        let own = dense[i];
        if sizes[own] == 1 {
            continue;
        }
        sums.iter_mut().for_each(|s| *s = 0.0);
        for j in 0..n {
            if i != j {
                sums[dense[j]] += euclidean_distance(points.row(i), points.row(j));
            }
        }
        let a = sums[own] / (sizes[own] - 1) as f64;
        let b = (0..n_clusters)
            .filter(|&c| c != own)
            .map(|c| sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);
        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }
    Ok(total / n as f64)
}

// ── k-means baseline ──────────────────────────────────────────────────────────

/// Lloyd's k-means over the rows of `points`, returning a label in `0..k` per point.
///
/// The `k` starting centroids are points picked by k-means++ seeding from
/// `seed`. Iteration stops once no assignment changes, or after `max_iter`
/// rounds. A cluster that loses all its members keeps its previous centroid.
pub fn kmeans_labels(points: &Matrix, k: usize, max_iter: usize, seed: u64) -> Result<Vec<usize>> {
    let n = points.rows();
    if k == 0 || k >= n {
        return Err(SymNmfError::InvalidRank { rank: k, points: n });
    }
    let d = points.cols();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut centroids = Matrix::zeros(k, d)?;
    seed_centroids(points, &mut centroids, &mut rng);

    let mut labels = vec![usize::MAX; n];
    let mut rounds = 0;
    while rounds < max_iter {
        rounds += 1;
        let mut changed = false;
        for (i, label) in labels.iter_mut().enumerate() {
            let nearest = nearest_centroid(&centroids, points.row(i));
            if *label != nearest {
                *label = nearest;
                changed = true;
            }
        }
        trace!(round = rounds, changed, "k-means round");
        if !changed {
            break;
        }

        let mut sums = Matrix::zeros(k, d)?;
        let mut counts = vec![0usize; k];
        for (i, &c) in labels.iter().enumerate() {
            counts[c] += 1;
            for (s, &x) in sums.row_mut(c).iter_mut().zip(points.row(i)) {
                *s += x;
            }
        }
        for (c, &count) in counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            for (dst, &s) in centroids.row_mut(c).iter_mut().zip(sums.row(c)) {
                *dst = s / count as f64;
            }
        }
    }
    debug!(n, k, rounds, "k-means finished");

    if max_iter == 0 {
        for (i, label) in labels.iter_mut().enumerate() {
            *label = nearest_centroid(&centroids, points.row(i));
        }
    }
    Ok(labels)
}

/// k-means++ seeding: each further centroid is a point drawn with probability
/// proportional to its squared distance from the centroids chosen so far.
fn seed_centroids(points: &Matrix, centroids: &mut Matrix, rng: &mut StdRng) {
    let n = points.rows();
    let first = rng.gen_range(0..n);
    centroids.row_mut(0).copy_from_slice(points.row(first));

    let mut nearest_sq: Vec<f64> = points
        .iter_rows()
        .map(|p| euclidean_distance(p, points.row(first)).powi(2))
        .collect();
    for c in 1..centroids.rows() {
        let total: f64 = nearest_sq.iter().sum();
        let pick = if total > 0.0 {
            let mut r = rng.gen::<f64>() * total;
            nearest_sq
                .iter()
                .position(|&w| {
                    r -= w;
                    w > 0.0 && r < 0.0
                })
                .or_else(|| nearest_sq.iter().rposition(|&w| w > 0.0))
                .unwrap_or(0)
        } else {
            // every point coincides with a chosen centroid
            rng.gen_range(0..n)
        };
        centroids.row_mut(c).copy_from_slice(points.row(pick));
        for (i, best) in nearest_sq.iter_mut().enumerate() {
            let dist = euclidean_distance(points.row(i), points.row(pick)).powi(2);
            if dist < *best {
                *best = dist;
            }
        }
    }
}

fn nearest_centroid(centroids: &Matrix, point: &[f64]) -> usize {
    centroids
        .iter_rows()
        .enumerate()
        .fold((0, f64::INFINITY), |best, (c, centroid)| {
            let dist = euclidean_distance(centroid, point);
            if dist < best.1 {
                (c, dist)
            } else {
                best
            }
        })
        .0
}

// ── SymNMF vs k-means ─────────────────────────────────────────────────────────

/// Silhouette scores of the SymNMF and k-means clusterings of one point set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalysisReport {
    /// Silhouette of the labels read off the SymNMF factor.
    pub nmf: f64,
    /// Silhouette of the k-means labels.
    pub kmeans: f64,
}

impl fmt::Display for AnalysisReport {
    /// Two lines, `nmf: <score>` and `kmeans: <score>`, with 4 decimals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nmf: {:.4}", self.nmf)?;
        writeln!(f, "kmeans: {:.4}", self.kmeans)
    }
}

/// Cluster `points` into `k` groups with SymNMF and with k-means, and score both.
///
/// SymNMF runs the full pipeline (normalized graph, seeded initial factor,
/// `factorize` under `config`); k-means uses [`DEFAULT_KMEANS_ITER`] rounds.
/// Both draw from the same `seed`.
pub fn analysis_report(
    points: &Matrix,
    k: usize,
    seed: u64,
    config: &SymNmfConfig,
) -> Result<AnalysisReport> {
    let w = normalized(points)?;
    let h0 = initial_factor(&w, k, seed)?;
    let h = factorize(&h0, &w, config)?.factor;
    let nmf = silhouette_score(points, &cluster_assignments(&h))?;

    let labels = kmeans_labels(points, k, DEFAULT_KMEANS_ITER, seed)?;
    let kmeans = silhouette_score(points, &labels)?;

    debug!(nmf, kmeans, "analysis report");
    Ok(AnalysisReport { nmf, kmeans })
}
