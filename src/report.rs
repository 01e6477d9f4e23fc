use crate::kmeans::Termination;
use crate::restarts::RunOutcome;
use log::info;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Serializable summary of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub points: usize,
    pub k: usize,
    pub restarts: usize,
    pub max_iterations: usize,
    pub strategy: String,
    pub workers: usize,
    pub seed: u64,
    pub best_restart: Option<usize>,
    pub best_iterations: Option<usize>,
    pub best_termination: Option<Termination>,
    pub best_accuracy: Option<f32>,
    /// One row per cluster, one column per feature.
    pub best_centroids: Vec<Vec<f32>>,
    pub total_iterations: u64,
    pub elapsed_sec: f64,
    pub avg_assign_sec: f64,
    pub avg_update_sec: f64,
}

impl RunReport {
    pub fn new(outcome: &RunOutcome, points: usize, k: usize, max_iterations: usize) -> Self {
        let best = outcome.best.get();
        let timings = &outcome.timings;
        RunReport {
            points,
            k,
            restarts: outcome.restarts.len(),
            max_iterations,
            strategy: outcome.strategy.to_string(),
            workers: outcome.workers,
            seed: outcome.seed,
            best_restart: best.map(|b| b.restart),
            best_iterations: best.map(|b| b.iterations),
            best_termination: best.map(|b| b.termination),
            best_accuracy: best.map(|b| b.accuracy),
            best_centroids: best
                .map(|b| b.centroids.outer_iter().map(|row| row.to_vec()).collect())
                .unwrap_or_default(),
            total_iterations: timings.iterations,
            elapsed_sec: timings.elapsed.as_secs_f64(),
            avg_assign_sec: timings.avg_assign().as_secs_f64(),
            avg_update_sec: timings.avg_update().as_secs_f64(),
        }
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, output_path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(output_path)?;
        file.write_all(json.as_bytes())?;

        info!("Wrote JSON report to {}", output_path.display());
        Ok(())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Loaded {} points.", self.points)?;
        writeln!(
            f,
            "K={}, Restarts={}, MaxIter={}, Strategy={} ({} workers), Seed={}",
            self.k, self.restarts, self.max_iterations, self.strategy, self.workers, self.seed
        )?;

        match (self.best_restart, self.best_iterations, self.best_accuracy) {
            (Some(restart), Some(iterations), Some(accuracy)) => {
                writeln!(
                    f,
                    "\nBest restart = {}, iterations in best run = {}",
                    restart, iterations
                )?;
                writeln!(f, "Best (lowest) accuracy = {:.6}", accuracy)?;
                writeln!(f, "\nBest centroids:")?;
                for (c, centroid) in self.best_centroids.iter().enumerate() {
                    let values: Vec<String> = centroid.iter().map(|v| format!("{:.6}", v)).collect();
                    writeln!(f, "C{}: {}", c, values.join(", "))?;
                }
            }
            _ => writeln!(f, "\nNo restart produced a finite accuracy.")?,
        }

        writeln!(f, "\nTiming:")?;
        writeln!(f, "Total elapsed time (s) = {:.6}", self.elapsed_sec)?;
        writeln!(f, "Avg A-step time per iteration (s) = {:.9}", self.avg_assign_sec)?;
        writeln!(f, "Avg U-step time per iteration (s) = {:.9}", self.avg_update_sec)?;
        write!(
            f,
            "Total iterations executed (across all restarts) = {}",
            self.total_iterations
        )
    }
}
