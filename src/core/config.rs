use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::{DijkstraError, Result};
use crate::graph::VertexId;

/// How many rounds each worker executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPolicy {
    /// Every worker runs `V - 1` rounds, one global extraction each
    #[default]
    Exact,
    /// Every worker runs `floor((V - 1) / N)` rounds; may leave vertices unsettled
    Truncated,
}

/// Which vertex indices a worker examines during the local scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStrategy {
    /// Contiguous block of `[0, V)` per worker; every vertex is covered every round
    #[default]
    Contiguous,
    /// Start at `rank + round * N`, step `N * rounds_per_worker`
    Strided,
}

/// Run configuration shared by every worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    // Topology
    /// Number of cooperating workers
    pub workers: usize,
    /// Worker whose result is surfaced to callers
    pub reporting_rank: usize,

    // Algorithm
    /// Source vertex
    pub source: VertexId,
    /// Round budget policy
    pub round_policy: RoundPolicy,
    /// Local scan strategy
    pub scan_strategy: ScanStrategy,
    /// Leave the round loop once a round finds no candidate
    pub stop_when_exhausted: bool,

    // Harness
    /// Timed repetitions of the whole computation
    pub repeat: usize,
    /// Compare the result against the sequential reference
    pub verify: bool,

    // Limits
    /// Largest vertex count accepted from a graph source
    pub max_vertices: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            workers,
            reporting_rank: 0,
            source: 0,
            round_policy: RoundPolicy::Exact,
            scan_strategy: ScanStrategy::Contiguous,
            stop_when_exhausted: false,
            repeat: 30,
            verify: false,
            max_vertices: 1 << 20,
        }
    }
}

impl RunConfig {
    /// Create a new builder for RunConfig
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::new()
    }

    /// Truncated round budget with strided scanning
    pub fn legacy() -> Self {
        Self {
            round_policy: RoundPolicy::Truncated,
            scan_strategy: ScanStrategy::Strided,
            ..Default::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(DijkstraError::configuration_field(
                "workers must be greater than 0",
                "workers",
            ));
        }
        if self.reporting_rank >= self.workers {
            return Err(DijkstraError::configuration_field(
                format!(
                    "reporting_rank {} must be below workers {}",
                    self.reporting_rank, self.workers
                ),
                "reporting_rank",
            ));
        }
        if self.repeat == 0 {
            return Err(DijkstraError::configuration_field(
                "repeat must be greater than 0",
                "repeat",
            ));
        }
        if self.max_vertices == 0 {
            return Err(DijkstraError::configuration_field(
                "max_vertices must be greater than 0",
                "max_vertices",
            ));
        }
        Ok(())
    }

    /// Load from a YAML (`.yaml`, `.yml`) or JSON (`.json`) file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|err| DijkstraError::io(format!("read {}", path.display()), err))?;

        let config: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)?,
            Some("json") => serde_json::from_str(&text)?,
            other => {
                return Err(DijkstraError::configuration(format!(
                    "unsupported config extension {:?} for {}",
                    other,
                    path.display()
                )))
            }
        };
        config.validate()?;
        Ok(config)
    }
}

/// Builder for RunConfig
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: RunConfig::default(),
        }
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    pub fn reporting_rank(mut self, rank: usize) -> Self {
        self.config.reporting_rank = rank;
        self
    }

    pub fn source(mut self, source: VertexId) -> Self {
        self.config.source = source;
        self
    }

    pub fn round_policy(mut self, policy: RoundPolicy) -> Self {
        self.config.round_policy = policy;
        self
    }

    pub fn scan_strategy(mut self, strategy: ScanStrategy) -> Self {
        self.config.scan_strategy = strategy;
        self
    }

    pub fn stop_when_exhausted(mut self, enabled: bool) -> Self {
        self.config.stop_when_exhausted = enabled;
        self
    }

    pub fn repeat(mut self, repeat: usize) -> Self {
        self.config.repeat = repeat;
        self
    }

    pub fn verify(mut self, enabled: bool) -> Self {
        self.config.verify = enabled;
        self
    }

    pub fn max_vertices(mut self, max_vertices: usize) -> Self {
        self.config.max_vertices = max_vertices;
        self
    }

    /// Build and validate
    pub fn build(self) -> Result<RunConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for RunConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
