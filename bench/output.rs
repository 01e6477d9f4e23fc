use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One strategy's measurements on the shared dataset.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    pub strategy: String,
    pub workers: usize,
    pub point_count: usize,
    pub dimension: usize,
    pub k: usize,
    pub restarts: usize,
    pub seed: u64,
    pub best_accuracy: f32,
    pub total_iterations: u64,
    pub avg_assign_ms: f64,
    pub avg_update_ms: f64,
    pub elapsed_sec: f64,
    /// Elapsed time of the sequential run divided by this run's.
    pub speedup: f64,
}

/// Write results to JSON file
pub fn write_json(
    results: &[BenchmarkResult],
    output_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(results)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;

    eprintln!("Wrote {} results to JSON", results.len());
    Ok(())
}

/// Render results as a Markdown table.
pub fn markdown_table(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str("| strategy | workers | accuracy | iterations | avg A-step (ms) | avg U-step (ms) | elapsed (s) | speedup |\n");
    out.push_str("|----------|---------|----------|------------|-----------------|-----------------|-------------|---------|\n");
    for r in results {
        out.push_str(&format!(
            "| {} | {} | {:.6} | {} | {:.4} | {:.4} | {:.3} | {:.2}x |\n",
            r.strategy,
            r.workers,
            r.best_accuracy,
            r.total_iterations,
            r.avg_assign_ms,
            r.avg_update_ms,
            r.elapsed_sec,
            r.speedup
        ));
    }
    out
}
