use clap::{Parser, ValueEnum};
use kmeans_restarts::{
    run_kmeans_restarts, Executor, Parallel, PointStore, RunConfig, RunReport, Sequential,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    Sequential,
    Parallel,
}

/// Multi-restart k-means over a delimited text dataset.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Dataset with one point per line; fields separated by commas, spaces or tabs.
    dataset: PathBuf,

    /// Number of clusters.
    k: usize,

    /// Number of independent restarts.
    restarts: Option<usize>,

    #[arg(long, value_enum, default_value_t = Strategy::Parallel)]
    strategy: Strategy,

    /// Worker threads for the parallel strategy (default: all cores).
    #[arg(long)]
    threads: Option<usize>,

    /// RNG seed (default: current time).
    #[arg(long)]
    seed: Option<u64>,

    /// Iteration ceiling per restart.
    #[arg(long = "max-iter")]
    max_iterations: Option<usize>,

    /// Features per point.
    #[arg(long)]
    features: Option<usize>,

    /// YAML file with base settings; explicit flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write the report as JSON.
    #[arg(long)]
    json: Option<PathBuf>,
}

impl Args {
    fn run_config(&self) -> kmeans_restarts::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };
        config.k = self.k;
        if let Some(restarts) = self.restarts {
            config.restarts = restarts;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }
        if let Some(features) = self.features {
            config.features = features;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }
        Ok(config)
    }
}

fn run<E: Executor>(exec: &E, args: &Args, config: &RunConfig) -> kmeans_restarts::Result<()> {
    let store =
        PointStore::from_text_file(&args.dataset, config.features, config.limits.max_points)?;

    let outcome = run_kmeans_restarts(exec, &store, config)?;
    let report = RunReport::new(&outcome, store.len(), config.k, config.max_iterations);
    println!("{}", report);

    if let Some(path) = &args.json {
        report.write_json(path)?;
    }
    Ok(())
}

fn try_main(args: Args) -> kmeans_restarts::Result<()> {
    let config = args.run_config()?;
    // Reject bad parameters before touching the dataset.
    config.validate()?;

    match args.strategy {
        Strategy::Sequential => run(&Sequential, &args, &config),
        Strategy::Parallel => run(&Parallel::new(config.threads)?, &args, &config),
    }
}

fn main() -> ExitCode {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env).init();

    match try_main(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
