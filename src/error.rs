use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Run parameters that fall outside the configured limits.
///
/// These are reported before any data is loaded or processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("number of clusters must be in [1, {max}], got {k}")]
    ClusterCount { k: usize, max: usize },

    #[error("restarts must be in [1, {max}], got {restarts}")]
    RestartCount { restarts: usize, max: usize },

    #[error("iteration ceiling must be in [1, {max}], got {max_iterations}")]
    IterationCeiling { max_iterations: usize, max: usize },

    #[error("feature dimension must be at least 1")]
    Dimension,

    #[error("worker thread count must be at least 1")]
    Threads,

    #[error("point capacity must be at least 1")]
    PointCapacity,
}

/// Failures while obtaining the dataset.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `row` and `feature` are zero-based; `text` is the start of the offending field.
    #[error("parse error at row {row}, feature {feature}; offending text starts with: '{text}'")]
    Malformed {
        row: usize,
        feature: usize,
        text: String,
    },

    #[error("point {row} has {found} features, expected {expected}")]
    Dimension {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("no points loaded")]
    Empty,

    #[error("dataset shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    #[error("cannot read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse config file: {0}")]
    ConfigFile(#[from] serde_yaml::Error),

    #[error("cannot encode report: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("cannot start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
