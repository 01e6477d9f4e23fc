//! Multi-restart k-means clustering.
//!
//! Each restart seeds `k` centroids from randomly drawn points, alternates
//! assignment and update steps until no label changes (or an iteration
//! ceiling is hit), and scores the result by the mean point-to-centroid
//! distance. The restart with the lowest score wins.
//!
//! Every pass over the points goes through an [`Executor`]: [`Sequential`]
//! for a single-threaded baseline, [`Parallel`] for a rayon thread team.
//!
//! ```rust
//! use kmeans_restarts::{run_kmeans_restarts, PointStore, RunConfig, Sequential};
//!
//! let store = PointStore::from_rows(
//!     vec![vec![0.0, 0.0], vec![0.1, 0.1], vec![10.0, 10.0], vec![10.1, 10.1]],
//!     2,
//! )
//! .unwrap();
//! let config = RunConfig::new(2).with_features(2).with_restarts(10).with_seed(42);
//!
//! let outcome = run_kmeans_restarts(&Sequential, &store, &config).unwrap();
//! let best = outcome.best.get().unwrap();
//! assert_eq!(best.centroids.nrows(), 2);
//! ```

pub mod config;
pub mod error;
pub mod kmeans;
pub mod report;
pub mod restarts;
pub mod strategy;
pub mod utils;
pub mod vector_store;

pub use config::{Limits, RunConfig, DEFAULT_FEATURES, DEFAULT_RESTARTS};
pub use error::{ConfigError, Error, InputError, Result};
pub use kmeans::{Termination, UNASSIGNED};
pub use report::RunReport;
pub use restarts::{run_kmeans_restarts, BestResult, RestartResult, RunOutcome, StepTimings};
pub use strategy::{Executor, Parallel, Sequential};
pub use vector_store::PointStore;
