use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::FeatureVector;

/// Lloyd's-style k-means over feature vectors, with cosine distance.
///
/// Centroid initialization shuffles the input uniformly at random and takes
/// the first `k` vectors, so two runs over the same data may partition
/// differently unless a seed is supplied via [`KMeans::with_seed`].
pub struct KMeans {
    k: usize,
    max_iterations: usize,
    tolerance: f64,
    seed: Option<u64>,
}

impl KMeans {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: 100,
            tolerance: 1e-4,
            seed: None,
        }
    }

    pub fn with_max_iter(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Partition `vectors` into `k` (possibly empty) member lists.
    ///
    /// Empty input produces empty output. When the input has no more vectors
    /// than clusters, every vector becomes its own singleton cluster and the
    /// iterative algorithm is skipped entirely.
    pub fn cluster(&self, vectors: Vec<FeatureVector>) -> Result<Vec<Vec<FeatureVector>>> {
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "cluster count must be at least 1",
            });
        }
        if vectors.is_empty() {
            return Ok(Vec::new());
        }
        if vectors.len() <= self.k {
            return Ok(vectors.into_iter().map(|v| vec![v]).collect());
        }

        let dims = vectors[0].dimensions.len();

        let mut order: Vec<usize> = (0..vectors.len()).collect();
        match self.seed {
            Some(seed) => order.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => order.shuffle(&mut rand::rng()),
        }
        let mut centroids: Vec<Vec<f64>> = order
            .iter()
            .take(self.k)
            .map(|&i| vectors[i].dimensions.clone())
            .collect();

        let mut assignment = vec![0usize; vectors.len()];
        let mut iterations = 0;
        let mut changed = true;

        while changed && iterations < self.max_iterations {
            changed = false;

            for (i, vector) in vectors.iter().enumerate() {
                assignment[i] = closest_centroid(&vector.dimensions, &centroids);
            }

            // coordinate-wise mean per cluster; an empty cluster keeps the
            // all-zero centroid rather than dividing by zero
            let mut sums = vec![vec![0.0f64; dims]; self.k];
            let mut counts = vec![0usize; self.k];
            for (i, vector) in vectors.iter().enumerate() {
                counts[assignment[i]] += 1;
                for (sum, d) in sums[assignment[i]].iter_mut().zip(&vector.dimensions) {
                    *sum += d;
                }
            }
            let new_centroids: Vec<Vec<f64>> = sums
                .into_iter()
                .zip(&counts)
                .map(|(mut sum, &count)| {
                    if count > 0 {
                        for value in &mut sum {
                            *value /= count as f64;
                        }
                    }
                    sum
                })
                .collect();

            for (old, new) in centroids.iter().zip(&new_centroids) {
                if old
                    .iter()
                    .zip(new)
                    .any(|(a, b)| (a - b).abs() >= self.tolerance)
                {
                    changed = true;
                    break;
                }
            }

            centroids = new_centroids;
            iterations += 1;
        }

        debug!(
            "K-means finished - k={}, iterations={}, converged={}",
            self.k, iterations, !changed
        );

        let mut clusters: Vec<Vec<FeatureVector>> = (0..self.k).map(|_| Vec::new()).collect();
        for (i, vector) in vectors.into_iter().enumerate() {
            clusters[assignment[i]].push(vector);
        }
        Ok(clusters)
    }
}

/// Default cluster count for `user_count` users: one cluster per three
/// users, never fewer than 2 or more than 5.
pub fn default_k(user_count: usize) -> usize {
    (user_count / 3).clamp(2, 5)
}

/// Cosine similarity of two vectors. A zero vector has no direction, so any
/// comparison involving one is pinned to 0.0 instead of propagating NaN.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

// index of the centroid at minimum cosine distance; ties go to the lowest index
fn closest_centroid(dimensions: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;

    for (idx, centroid) in centroids.iter().enumerate() {
        let distance = 1.0 - cosine_similarity(dimensions, centroid);
        if distance < best_distance {
            best_distance = distance;
            best = idx;
        }
    }

    best
}

/// Mean pairwise cosine similarity among a cluster's members. Clusters of
/// size 0 or 1 score 1.0 by convention.
pub fn cohesion(members: &[FeatureVector]) -> f64 {
    if members.len() <= 1 {
        return 1.0;
    }

    let mut total = 0.0f64;
    let mut pairs = 0usize;
    for (a, b) in members.iter().tuple_combinations() {
        total += cosine_similarity(&a.dimensions, &b.dimensions);
        pairs += 1;
    }

    total / pairs as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn vector(user: &str, dimensions: Vec<f64>) -> FeatureVector {
        FeatureVector {
            user: user.to_string(),
            dimensions,
            themes: BTreeSet::new(),
            domain: "General".to_string(),
        }
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let a = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn cosine_with_zero_vector_is_sentinel_zero() {
        let zero = vec![0.0, 0.0, 0.0];
        let other = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&zero, &other), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn default_k_is_clamped() {
        assert_eq!(default_k(1), 2);
        assert_eq!(default_k(6), 2);
        assert_eq!(default_k(9), 3);
        assert_eq!(default_k(15), 5);
        assert_eq!(default_k(100), 5);
    }

    #[test]
    fn rejects_zero_clusters() {
        let result = KMeans::new(0).cluster(vec![vector("a", vec![1.0])]);
        assert!(matches!(
            result,
            Err(Error::InvalidParameter { name: "k", .. })
        ));
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let clusters = KMeans::new(3).cluster(Vec::new()).unwrap();
        assert!(clusters.is_empty());
    }

    #[test]
    fn few_vectors_become_singletons() {
        let vectors = vec![
            vector("a", vec![1.0, 0.0]),
            vector("b", vec![0.0, 1.0]),
            vector("c", vec![1.0, 1.0]),
        ];
        let clusters = KMeans::new(5).cluster(vectors).unwrap();

        assert_eq!(clusters.len(), 3);
        for cluster in &clusters {
            assert_eq!(cluster.len(), 1);
            assert_eq!(cohesion(cluster), 1.0);
        }
    }

    #[test]
    fn every_vector_is_assigned_exactly_once() {
        let vectors: Vec<FeatureVector> = (0..12)
            .map(|i| {
                let angle = i as f64 / 2.0;
                vector(&format!("u{i}"), vec![angle.cos().abs(), angle.sin().abs()])
            })
            .collect();

        let clusters = KMeans::new(3).with_seed(7).cluster(vectors).unwrap();
        let mut users: Vec<String> = clusters
            .iter()
            .flat_map(|c| c.iter().map(|v| v.user.clone()))
            .collect();
        users.sort();

        let mut expected: Vec<String> = (0..12).map(|i| format!("u{i}")).collect();
        expected.sort();
        assert_eq!(users, expected);
    }

    #[test]
    fn terminates_within_max_iterations() {
        let vectors: Vec<FeatureVector> = (0..9)
            .map(|i| vector(&format!("u{i}"), vec![i as f64, (9 - i) as f64]))
            .collect();

        // a single iteration is always enough to return
        let clusters = KMeans::new(2)
            .with_max_iter(1)
            .with_seed(1)
            .cluster(vectors)
            .unwrap();
        assert_eq!(clusters.iter().map(Vec::len).sum::<usize>(), 9);
    }

    #[test]
    fn zero_vectors_cluster_without_panicking() {
        let mut vectors: Vec<FeatureVector> = (0..6)
            .map(|i| vector(&format!("u{i}"), vec![1.0 + i as f64, 2.0]))
            .collect();
        vectors.push(vector("silent", vec![0.0, 0.0]));

        let clusters = KMeans::new(2).with_seed(3).cluster(vectors).unwrap();
        assert_eq!(clusters.iter().map(Vec::len).sum::<usize>(), 7);
        for cluster in &clusters {
            let score = cohesion(cluster);
            assert!(score.is_finite());
            assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let make = || {
            (0..10)
                .map(|i| vector(&format!("u{i}"), vec![(i % 3) as f64, (i % 4) as f64, 1.0]))
                .collect::<Vec<_>>()
        };

        let first = KMeans::new(3).with_seed(42).cluster(make()).unwrap();
        let second = KMeans::new(3).with_seed(42).cluster(make()).unwrap();

        let shape = |clusters: &[Vec<FeatureVector>]| {
            clusters
                .iter()
                .map(|c| c.iter().map(|v| v.user.clone()).collect::<Vec<_>>())
                .collect::<Vec<_>>()
        };
        assert_eq!(shape(&first), shape(&second));
    }

    #[test]
    fn cohesion_of_identical_members_is_one() {
        let members = vec![
            vector("a", vec![1.0, 2.0]),
            vector("b", vec![1.0, 2.0]),
            vector("c", vec![2.0, 4.0]),
        ];
        assert!((cohesion(&members) - 1.0).abs() < 1e-9);
    }
}
