mod dataset;
mod output;

use clap::Parser;
use dataset::{generate_blobs, write_text_dataset};
use kmeans_restarts::{
    run_kmeans_restarts, Executor, Parallel, PointStore, RunConfig, RunOutcome, Sequential,
};
use output::{markdown_table, write_json, BenchmarkResult};
use std::path::PathBuf;

/// Compare the sequential and parallel strategies on a synthetic dataset.
#[derive(Debug, Parser)]
struct Args {
    #[arg(long, default_value_t = 200_000)]
    points: usize,

    #[arg(long, default_value_t = 8)]
    dimension: usize,

    #[arg(long, default_value_t = 5)]
    k: usize,

    #[arg(long, default_value_t = 10)]
    restarts: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Thread counts to try for the parallel strategy.
    #[arg(long, value_delimiter = ',', default_values_t = vec![2, 4, 8])]
    threads: Vec<usize>,

    /// Also save the generated dataset as a text file.
    #[arg(long)]
    save_dataset: Option<PathBuf>,

    #[arg(long)]
    json: Option<PathBuf>,
}

fn measure<E: Executor>(
    exec: &E,
    store: &PointStore,
    config: &RunConfig,
) -> Result<RunOutcome, Box<dyn std::error::Error>> {
    eprintln!("Running {} strategy ({} workers)...", exec.name(), exec.workers());
    Ok(run_kmeans_restarts(exec, store, config)?)
}

fn to_result(outcome: &RunOutcome, args: &Args, baseline_sec: f64) -> BenchmarkResult {
    let elapsed_sec = outcome.timings.elapsed.as_secs_f64();
    BenchmarkResult {
        strategy: outcome.strategy.to_string(),
        workers: outcome.workers,
        point_count: args.points,
        dimension: args.dimension,
        k: args.k,
        restarts: args.restarts,
        seed: outcome.seed,
        best_accuracy: outcome.best.accuracy(),
        total_iterations: outcome.timings.iterations,
        avg_assign_ms: outcome.timings.avg_assign().as_secs_f64() * 1000.0,
        avg_update_ms: outcome.timings.avg_update().as_secs_f64() * 1000.0,
        elapsed_sec,
        speedup: if elapsed_sec > 0.0 {
            baseline_sec / elapsed_sec
        } else {
            0.0
        },
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env = env_logger::Env::default().default_filter_or("warn");
    env_logger::Builder::from_env(env).init();

    let args = Args::parse();
    let limits = kmeans_restarts::Limits {
        max_points: args.points.max(1),
        max_clusters: args.k.max(1),
        ..Default::default()
    };
    let config = RunConfig::new(args.k)
        .with_features(args.dimension)
        .with_restarts(args.restarts)
        .with_seed(args.seed)
        .with_limits(limits);
    config.validate()?;

    eprintln!(
        "Generating {} points of dimension {} with seed {}...",
        args.points, args.dimension, args.seed
    );
    let store = generate_blobs(args.points, args.dimension, args.k, 10.0, args.seed);
    if let Some(path) = &args.save_dataset {
        write_text_dataset(&store, path)?;
    }

    let sequential = measure(&Sequential, &store, &config)?;
    let baseline_sec = sequential.timings.elapsed.as_secs_f64();
    let mut results = vec![to_result(&sequential, &args, baseline_sec)];

    for &threads in &args.threads {
        let parallel = measure(&Parallel::new(Some(threads))?, &store, &config)?;
        let drift = (parallel.best.accuracy() - sequential.best.accuracy()).abs();
        if drift > 1e-3 {
            eprintln!(
                "WARNING: {} threads found accuracy {:.6}, sequential found {:.6}",
                threads,
                parallel.best.accuracy(),
                sequential.best.accuracy()
            );
        }
        results.push(to_result(&parallel, &args, baseline_sec));
    }

    println!("{}", markdown_table(&results));

    if let Some(path) = &args.json {
        write_json(&results, path)?;
    }
    Ok(())
}
