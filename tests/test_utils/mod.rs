use kmeans_restarts::PointStore;
use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build a store where point `i` has `values[i]` in every dimension.
#[allow(dead_code)]
pub fn broadcast_store(values: &[f32], dim: usize) -> PointStore {
    let rows = values.iter().map(|&v| vec![v; dim]).collect();
    PointStore::from_rows(rows, dim).unwrap()
}

/// Centroid matrix where centroid `c` has `values[c]` in every dimension.
#[allow(dead_code)]
pub fn broadcast_centroids(values: &[f32], dim: usize) -> Array2<f32> {
    Array2::from_shape_fn((values.len(), dim), |(c, _)| values[c])
}

/// Create synthetic data with well-separated clusters
/// Returns (store, true_labels)
#[allow(dead_code)]
pub fn create_gaussian_clusters(
    num_clusters: usize,
    points_per_cluster: usize,
    dim: usize,
    separation: f32,
    seed: u64,
) -> (PointStore, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);

    let total_points = num_clusters * points_per_cluster;
    let mut data = Array2::<f32>::zeros((total_points, dim));
    let mut true_labels = Vec::with_capacity(total_points);

    for cluster_id in 0..num_clusters {
        let center: Vec<f32> = (0..dim)
            .map(|d| (cluster_id as f32) * separation + (d as f32) * 0.1)
            .collect();

        for point_id in 0..points_per_cluster {
            let idx = cluster_id * points_per_cluster + point_id;
            true_labels.push(cluster_id);

            for d in 0..dim {
                let noise: f32 = rng.gen_range(-0.5..0.5);
                data[(idx, d)] = center[d] + noise;
            }
        }
    }

    (PointStore::new(data), true_labels)
}

/// Generate deterministic test points (for reproducibility)
#[allow(dead_code)]
pub fn create_deterministic_store(n: usize, dim: usize, seed: u64) -> PointStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<f32> = (0..n * dim).map(|_| rng.gen_range(-10.0..10.0)).collect();
    PointStore::new(Array2::from_shape_vec((n, dim), data).unwrap())
}

/// Random labels in `[0, k)`.
#[allow(dead_code)]
pub fn random_labels(n: usize, k: usize, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..k)).collect()
}

/// Reference Euclidean distance, scalar and in f64.
#[allow(dead_code)]
pub fn reference_distance(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (f64::from(x) - f64::from(y)).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Verify that each point is assigned to its nearest centroid
#[allow(dead_code)]
pub fn verify_optimal_assignment(
    store: &PointStore,
    centroids: &Array2<f32>,
    labels: &[usize],
) -> bool {
    for (i, &assigned_label) in labels.iter().enumerate() {
        let point = store.point(i);
        let assigned_dist = reference_distance(point, centroids.row(assigned_label));

        for c in 0..centroids.nrows() {
            let dist = reference_distance(point, centroids.row(c));
            if dist < assigned_dist - 1e-5 {
                return false;
            }
        }
    }
    true
}

/// Largest absolute element-wise difference between two matrices.
#[allow(dead_code)]
pub fn max_abs_diff(a: &Array2<f32>, b: &Array2<f32>) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max)
}
