use crate::config::RunConfig;
use crate::error::{InputError, Result};
use crate::kmeans::{compute_accuracy, random_init, refine, Termination, UNASSIGNED};
use crate::strategy::Executor;
use crate::utils::unix_timestamp_secs;
use crate::vector_store::PointStore;
use log::{debug, info};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

/// Final state of one restart.
#[derive(Clone, Debug)]
pub struct RestartResult {
    pub restart: usize,
    pub centroids: Array2<f32>,
    pub accuracy: f32,
    pub iterations: usize,
    pub termination: Termination,
}

/// Lowest-accuracy restart seen so far.
///
/// Starts empty (accuracy `+inf`) and only ever moves downward.
#[derive(Clone, Debug, Default)]
pub struct BestResult {
    best: Option<RestartResult>,
}

impl BestResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accuracy(&self) -> f32 {
        self.best.as_ref().map_or(f32::INFINITY, |b| b.accuracy)
    }

    pub fn restart(&self) -> Option<usize> {
        self.best.as_ref().map(|b| b.restart)
    }

    /// Keep `candidate` if it is strictly better. Ties keep the earlier result.
    pub fn offer(&mut self, candidate: RestartResult) -> bool {
        if candidate.accuracy < self.accuracy() {
            self.best = Some(candidate);
            true
        } else {
            false
        }
    }

    pub fn get(&self) -> Option<&RestartResult> {
        self.best.as_ref()
    }

    pub fn into_inner(self) -> Option<RestartResult> {
        self.best
    }
}

/// Short record of a restart kept for reporting once its centroids are gone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RestartSummary {
    pub restart: usize,
    pub accuracy: f32,
    pub iterations: usize,
    pub termination: Termination,
}

/// Wall time aggregated over every iteration of every restart.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepTimings {
    pub assign: Duration,
    pub update: Duration,
    /// Iterations executed across all restarts.
    pub iterations: u64,
    pub elapsed: Duration,
}

impl StepTimings {
    pub fn avg_assign(&self) -> Duration {
        self.per_iteration(self.assign)
    }

    pub fn avg_update(&self) -> Duration {
        self.per_iteration(self.update)
    }

    fn per_iteration(&self, total: Duration) -> Duration {
        if self.iterations == 0 {
            return Duration::ZERO;
        }
        match u32::try_from(self.iterations) {
            Ok(n) => total / n,
            Err(_) => total.div_f64(self.iterations as f64),
        }
    }
}

/// Everything a run produces.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub best: BestResult,
    pub restarts: Vec<RestartSummary>,
    pub timings: StepTimings,
    /// Seed the run actually used.
    pub seed: u64,
    pub strategy: &'static str,
    pub workers: usize,
}

/// Run `config.restarts` independent init/refine/evaluate trials and keep
/// the one with the lowest accuracy.
///
/// The configuration is validated and an empty store is refused before any
/// work starts. The RNG is seeded once for the whole run.
pub fn run_kmeans_restarts<E: Executor>(
    exec: &E,
    store: &PointStore,
    config: &RunConfig,
) -> Result<RunOutcome> {
    config.validate()?;
    if store.is_empty() {
        return Err(InputError::Empty.into());
    }

    let seed = config.seed.unwrap_or_else(unix_timestamp_secs);
    let mut rng = StdRng::seed_from_u64(seed);
    info!(
        "Clustering {} points: k={}, restarts={}, max_iter={}, strategy={} ({} workers), seed={}",
        store.len(),
        config.k,
        config.restarts,
        config.max_iterations,
        exec.name(),
        exec.workers(),
        seed
    );

    let mut labels = vec![UNASSIGNED; store.len()];
    let mut best = BestResult::new();
    let mut restarts = Vec::with_capacity(config.restarts);
    let mut timings = StepTimings::default();
    let run_start = Instant::now();

    for r in 0..config.restarts {
        exec.fill(&mut labels, UNASSIGNED);
        let mut centroids = random_init(store, config.k, &mut rng)?;

        let refinement = refine(
            exec,
            store,
            &mut centroids,
            &mut labels,
            config.max_iterations,
        );
        timings.assign += refinement.assign_time;
        timings.update += refinement.update_time;
        timings.iterations += refinement.iterations as u64;

        let accuracy = compute_accuracy(exec, store, &labels, &centroids);
        debug!(
            "Restart {}: {:?} after {} iterations, accuracy {:.6}",
            r, refinement.termination, refinement.iterations, accuracy
        );

        restarts.push(RestartSummary {
            restart: r,
            accuracy,
            iterations: refinement.iterations,
            termination: refinement.termination,
        });

        let improved = best.offer(RestartResult {
            restart: r,
            centroids,
            accuracy,
            iterations: refinement.iterations,
            termination: refinement.termination,
        });
        if improved {
            info!("Restart {} is the new best: accuracy {:.6}", r, accuracy);
        }
    }

    timings.elapsed = run_start.elapsed();

    Ok(RunOutcome {
        best,
        restarts,
        timings,
        seed,
        strategy: exec.name(),
        workers: exec.workers(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(restart: usize, accuracy: f32) -> RestartResult {
        RestartResult {
            restart,
            centroids: Array2::zeros((1, 1)),
            accuracy,
            iterations: 1,
            termination: Termination::Converged,
        }
    }

    #[test]
    fn test_best_starts_empty() {
        let best = BestResult::new();
        assert_eq!(best.accuracy(), f32::INFINITY);
        assert_eq!(best.restart(), None);
    }

    #[test]
    fn test_ties_keep_earlier_restart() {
        let mut best = BestResult::new();
        assert!(best.offer(result(0, 2.0)));
        assert!(!best.offer(result(1, 2.0)));
        assert!(!best.offer(result(2, 3.0)));
        assert!(best.offer(result(3, 1.0)));
        assert_eq!(best.restart(), Some(3));
    }

    #[test]
    fn test_nan_never_becomes_best() {
        let mut best = BestResult::new();
        assert!(!best.offer(result(0, f32::NAN)));
        assert!(best.get().is_none());
    }

    #[test]
    fn test_average_step_time() {
        let timings = StepTimings {
            assign: Duration::from_millis(30),
            update: Duration::from_millis(60),
            iterations: 3,
            elapsed: Duration::from_millis(100),
        };
        assert_eq!(timings.avg_assign(), Duration::from_millis(10));
        assert_eq!(timings.avg_update(), Duration::from_millis(20));
        assert_eq!(StepTimings::default().avg_assign(), Duration::ZERO);
    }
}
