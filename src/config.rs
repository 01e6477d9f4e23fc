use crate::error::{ConfigError, Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_FEATURES: usize = 8;
pub const DEFAULT_RESTARTS: usize = 100;

/// Hard ceilings enforced as configuration limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Points beyond this count are not loaded.
    pub max_points: usize,

    /// Upper bound for `k`.
    pub max_clusters: usize,

    /// Upper bound for the restart count.
    pub max_restarts: usize,

    /// Upper bound for the per-restart iteration ceiling.
    pub max_iterations: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_points: 1_000_000,
            max_clusters: 10,
            max_restarts: 1000,
            max_iterations: 2000,
        }
    }
}

/// Configuration for one clustering run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of clusters.
    pub k: usize,

    /// Number of independent restarts.
    pub restarts: usize,

    /// Iteration ceiling for a single restart.
    pub max_iterations: usize,

    /// Feature dimension of every point.
    pub features: usize,

    /// RNG seed. `None` seeds from the current time.
    pub seed: Option<u64>,

    /// Worker threads for the parallel strategy. `None` uses all available cores.
    pub threads: Option<usize>,

    pub limits: Limits,
}

impl Default for RunConfig {
    fn default() -> Self {
        let limits = Limits::default();
        Self {
            k: 2,
            restarts: DEFAULT_RESTARTS,
            max_iterations: limits.max_iterations,
            features: DEFAULT_FEATURES,
            seed: None,
            threads: None,
            limits,
        }
    }
}

impl RunConfig {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    /// Load a config from a YAML file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RunConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_features(mut self, features: usize) -> Self {
        self.features = features;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Check every parameter against the limits.
    ///
    /// Must pass before any data is loaded.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let limits = &self.limits;
        if self.k == 0 || self.k > limits.max_clusters {
            return Err(ConfigError::ClusterCount {
                k: self.k,
                max: limits.max_clusters,
            });
        }
        if self.restarts == 0 || self.restarts > limits.max_restarts {
            return Err(ConfigError::RestartCount {
                restarts: self.restarts,
                max: limits.max_restarts,
            });
        }
        if self.max_iterations == 0 || self.max_iterations > limits.max_iterations {
            return Err(ConfigError::IterationCeiling {
                max_iterations: self.max_iterations,
                max: limits.max_iterations,
            });
        }
        if self.features == 0 {
            return Err(ConfigError::Dimension);
        }
        if self.threads == Some(0) {
            return Err(ConfigError::Threads);
        }
        if limits.max_points == 0 {
            return Err(ConfigError::PointCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RunConfig::default().validate().is_ok());
    }

    #[test]
    fn test_yaml_overrides_only_named_fields() {
        let config: RunConfig = serde_yaml::from_str("k: 4\nseed: 7\nlimits:\n  max_clusters: 20\n").unwrap();
        assert_eq!(config.k, 4);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.restarts, DEFAULT_RESTARTS);
        assert_eq!(config.limits.max_clusters, 20);
        assert_eq!(config.limits.max_restarts, 1000);
    }

    #[test]
    fn test_missing_config_file_names_path() {
        let err = RunConfig::from_file("no_such_config_4821.yaml").unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
        assert!(err.to_string().contains("no_such_config_4821.yaml"));
    }

    #[test]
    fn test_iteration_ceiling_above_limit_rejected() {
        let config = RunConfig::new(2).with_max_iterations(5000);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::IterationCeiling { max_iterations: 5000, .. })
        ));
    }

    #[test]
    fn test_zero_threads_rejected() {
        let config = RunConfig::new(2).with_threads(0);
        assert!(matches!(config.validate(), Err(ConfigError::Threads)));
    }
}
