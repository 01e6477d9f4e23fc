use crate::error::InputError;
use crate::strategy::Executor;
use crate::utils::row_distance;
use crate::vector_store::PointStore;
use log::{log_enabled, trace, Level};
use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::Rng;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Label of a point that has not been through an assignment step yet.
pub const UNASSIGNED: usize = usize::MAX;

/// How often the refinement loop traces its accuracy.
const TRACE_EVERY: usize = 50;

/// Seed `k` centroids by copying uniformly drawn points.
///
/// Indices are drawn with replacement, so two centroids may start out
/// identical. Fails on an empty store.
pub fn random_init<R: Rng + ?Sized>(
    store: &PointStore,
    k: usize,
    rng: &mut R,
) -> Result<Array2<f32>, InputError> {
    let n = store.len();
    if n == 0 {
        return Err(InputError::Empty);
    }

    let mut centroids = Array2::<f32>::zeros((k, store.features()));
    for c in 0..k {
        let idx = rng.gen_range(0..n);
        centroids.row_mut(c).assign(&store.point(idx));
        trace!("Random init: centroid {} <- point {}", c, idx);
    }
    Ok(centroids)
}

/// Find the nearest centroid to a point. Exact ties keep the lower index.
#[inline]
pub fn find_nearest_centroid(point: ArrayView1<f32>, centroids: &Array2<f32>) -> (usize, f32) {
    let mut best_c = 0;
    let mut best_dist = f32::INFINITY;

    for (c, centroid) in centroids.outer_iter().enumerate() {
        let dist = row_distance(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best_c = c;
        }
    }

    (best_c, best_dist)
}

/// Assignment step: relabel every point with its nearest centroid.
///
/// Returns the number of labels that changed.
pub fn assign_points<E: Executor>(
    exec: &E,
    store: &PointStore,
    centroids: &Array2<f32>,
    labels: &mut [usize],
) -> usize {
    debug_assert_eq!(labels.len(), store.len());
    exec.count_changes(labels, |i, label| {
        let (best_c, _) = find_nearest_centroid(store.point(i), centroids);
        if *label != best_c {
            *label = best_c;
            true
        } else {
            false
        }
    })
}

/// Per-cluster feature sums and member counts.
///
/// Sums are kept in `f64` so the result does not depend on how the points
/// were split between workers beyond rounding noise.
#[derive(Clone, Debug, PartialEq)]
pub struct Accumulator {
    sums: Array2<f64>,
    counts: Vec<usize>,
}

impl Accumulator {
    pub fn new(k: usize, features: usize) -> Self {
        Accumulator {
            sums: Array2::zeros((k, features)),
            counts: vec![0; k],
        }
    }

    #[inline]
    pub fn add(&mut self, cluster: usize, point: ArrayView1<f32>) {
        self.counts[cluster] += 1;
        self.sums
            .row_mut(cluster)
            .zip_mut_with(&point, |sum, &x| *sum += f64::from(x));
    }

    /// Fold another worker's partial sums into this one.
    pub fn merge(&mut self, other: Accumulator) {
        self.sums += &other.sums;
        for (count, other) in self.counts.iter_mut().zip(other.counts) {
            *count += other;
        }
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn sums(&self) -> ArrayView2<'_, f64> {
        self.sums.view()
    }

    /// Overwrite each non-empty cluster's centroid with its mean.
    ///
    /// Empty clusters keep their previous centroid. Returns how many were empty.
    pub fn write_means(&self, centroids: &mut Array2<f32>) -> usize {
        let mut empty = 0;
        for (c, &count) in self.counts.iter().enumerate() {
            if count == 0 {
                empty += 1;
                continue;
            }
            let count = count as f64;
            centroids
                .row_mut(c)
                .zip_mut_with(&self.sums.row(c), |centroid, &sum| {
                    *centroid = (sum / count) as f32
                });
        }
        empty
    }
}

/// Update step: move every centroid to the mean of the points labeled with it.
///
/// Each worker accumulates into its own [`Accumulator`]; the partials are
/// merged once per worker. Points that are unassigned are skipped. Returns
/// the number of empty clusters, whose centroids are left unchanged.
pub fn update_centroids<E: Executor>(
    exec: &E,
    store: &PointStore,
    labels: &[usize],
    centroids: &mut Array2<f32>,
) -> usize {
    let k = centroids.nrows();
    let features = centroids.ncols();

    let totals = exec.fold_merge(
        labels.len(),
        || Accumulator::new(k, features),
        |acc, i| {
            let c = labels[i];
            if c < k {
                acc.add(c, store.point(i));
            }
        },
        |global, local| global.merge(local),
    );

    totals.write_means(centroids)
}

/// Mean distance from each point to its assigned centroid. Lower is better.
///
/// Distances are summed in `f64` and the mean narrowed back to `f32`.
/// An empty store has no meaningful accuracy and yields infinity.
pub fn compute_accuracy<E: Executor>(
    exec: &E,
    store: &PointStore,
    labels: &[usize],
    centroids: &Array2<f32>,
) -> f32 {
    let n = store.len();
    if n == 0 {
        return f32::INFINITY;
    }
    let k = centroids.nrows();

    let total = exec.sum(n, |i| match labels[i] {
        c if c < k => f64::from(row_distance(store.point(i), centroids.row(c))),
        _ => 0.0,
    });

    (total / n as f64) as f32
}

/// Terminal state of one restart's refinement loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// An assignment step changed no labels.
    Converged,
    /// The iteration ceiling was reached first. Not an error.
    IterationCapped,
}

/// Outcome of [`refine`].
#[derive(Clone, Copy, Debug)]
pub struct Refinement {
    pub iterations: usize,
    pub termination: Termination,
    /// Wall time spent in assignment steps.
    pub assign_time: Duration,
    /// Wall time spent in update steps.
    pub update_time: Duration,
}

/// Alternate assignment and update steps until no label changes or
/// `max_iterations` is reached.
///
/// The update step also runs on the converging iteration, so `centroids`
/// always holds the means of the final labels.
pub fn refine<E: Executor>(
    exec: &E,
    store: &PointStore,
    centroids: &mut Array2<f32>,
    labels: &mut [usize],
    max_iterations: usize,
) -> Refinement {
    let mut assign_time = Duration::ZERO;
    let mut update_time = Duration::ZERO;
    let mut iterations = 0;
    let mut termination = Termination::IterationCapped;

    for iter in 0..max_iterations {
        let start = Instant::now();
        let changes = assign_points(exec, store, centroids, labels);
        assign_time += start.elapsed();

        let start = Instant::now();
        let empty = update_centroids(exec, store, labels, centroids);
        update_time += start.elapsed();

        iterations = iter + 1;
        trace!(
            "Iteration {}: {} labels changed, {} empty clusters",
            iterations,
            changes,
            empty
        );
        if iter % TRACE_EVERY == 0 && log_enabled!(Level::Trace) {
            let accuracy = compute_accuracy(exec, store, labels, centroids);
            trace!("Iteration {}: accuracy {:.6}", iterations, accuracy);
        }

        if changes == 0 {
            termination = Termination::Converged;
            break;
        }
    }

    Refinement {
        iterations,
        termination,
        assign_time,
        update_time,
    }
}
