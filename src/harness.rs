//! Launches a world of workers and collects the designated worker's result
//!
//! Each worker is a tokio task that runs the full computation `repeat`
//! times, with a barrier before the first repetition and after each one so
//! that per-repetition timings line up across workers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::collective::{Collective, LocalCollective};
use crate::coord::dijkstra::{DijkstraOutcome, DistributedDijkstra};
use crate::coord::types::Distance;
use crate::core::config::{RoundPolicy, RunConfig, ScanStrategy};
use crate::core::errors::{DijkstraError, Result};
use crate::core::metrics::{CollectiveMetrics, CollectiveSnapshot, RunStats};
use crate::graph::{Graph, VertexId};
use crate::reference::{first_mismatch, sequential_distances};

/// Min / mean / max over repetition timings, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingSummary {
    pub min_ms: f64,
    pub mean_ms: f64,
    pub max_ms: f64,
}

/// Everything a caller needs to report on a harness run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub workers: usize,
    pub source: VertexId,
    pub reporting_rank: usize,
    pub round_policy: RoundPolicy,
    pub scan_strategy: ScanStrategy,
    /// Distances held by the reporting worker after the last repetition
    pub distances: Vec<Distance>,
    /// Reporting worker's wall time per repetition, in milliseconds
    pub repetitions_ms: Vec<f64>,
    /// Per-worker stats from the last repetition, ordered by rank
    pub stats: Vec<RunStats>,
    pub collectives: CollectiveSnapshot,
    /// Set when verification against the sequential reference was requested
    pub verified: Option<bool>,
}

impl RunReport {
    pub fn timing_summary(&self) -> Option<TimingSummary> {
        if self.repetitions_ms.is_empty() {
            return None;
        }
        let min_ms = self.repetitions_ms.iter().copied().fold(f64::INFINITY, f64::min);
        let max_ms = self.repetitions_ms.iter().copied().fold(0.0, f64::max);
        let mean_ms = self.repetitions_ms.iter().sum::<f64>() / self.repetitions_ms.len() as f64;
        Some(TimingSummary {
            min_ms,
            mean_ms,
            max_ms,
        })
    }
}

struct WorkerRun {
    outcome: DijkstraOutcome,
    timings: Vec<Duration>,
}

/// Runs the distributed computation on an in-process world
pub struct Harness {
    graph: Arc<Graph>,
    config: RunConfig,
}

impl Harness {
    pub fn new(graph: Arc<Graph>, config: RunConfig) -> Result<Self> {
        config.validate()?;
        if graph.is_empty() {
            return Err(DijkstraError::missing_graph("graph has no vertices"));
        }
        if graph.vertex_count() > config.max_vertices {
            return Err(DijkstraError::configuration_field(
                format!(
                    "vertex count {} exceeds capacity {}",
                    graph.vertex_count(),
                    config.max_vertices
                ),
                "max_vertices",
            ));
        }
        if config.source >= graph.vertex_count() {
            return Err(DijkstraError::source_out_of_range(
                config.source,
                graph.vertex_count(),
            ));
        }
        Ok(Self { graph, config })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Spawn one task per worker, wait for all of them, and build the report
    pub async fn run(&self) -> Result<RunReport> {
        let metrics = Arc::new(CollectiveMetrics::new());
        let world = LocalCollective::world_with_metrics(self.config.workers, metrics.clone())?;

        info!(
            workers = self.config.workers,
            vertices = self.graph.vertex_count(),
            edges = self.graph.edge_count(),
            source = self.config.source,
            repeat = self.config.repeat,
            "launching workers"
        );

        let handles: Vec<_> = world
            .into_iter()
            .map(|comm| {
                let graph = self.graph.clone();
                let config = self.config.clone();
                tokio::spawn(async move { run_worker(graph, comm, config).await })
            })
            .collect();

        let mut runs = Vec::with_capacity(handles.len());
        for (rank, joined) in join_all(handles).await.into_iter().enumerate() {
            let run = joined
                .map_err(|err| DijkstraError::worker(rank, err.to_string()))?
                .map_err(|err| {
                    if err.is_precondition() {
                        err
                    } else {
                        DijkstraError::worker(rank, err.to_string())
                    }
                })?;
            runs.push(run);
        }

        let reporting = runs
            .get(self.config.reporting_rank)
            .ok_or_else(|| DijkstraError::worker(self.config.reporting_rank, "no result"))?;
        if let Some(rank) = runs
            .iter()
            .position(|run| run.outcome.distances != reporting.outcome.distances)
        {
            return Err(DijkstraError::worker(
                rank,
                "final distances differ from the reporting worker",
            ));
        }

        let verified = if self.config.verify {
            let expected = sequential_distances(&self.graph, self.config.source)?;
            let mismatch = first_mismatch(&reporting.outcome.distances, &expected);
            if let Some(vertex) = mismatch {
                warn!(
                    vertex,
                    actual = ?reporting.outcome.distances.get(vertex),
                    expected = ?expected.get(vertex),
                    "distributed result differs from sequential reference"
                );
            }
            Some(mismatch.is_none())
        } else {
            None
        };

        Ok(RunReport {
            vertex_count: self.graph.vertex_count(),
            edge_count: self.graph.edge_count(),
            workers: self.config.workers,
            source: self.config.source,
            reporting_rank: self.config.reporting_rank,
            round_policy: self.config.round_policy,
            scan_strategy: self.config.scan_strategy,
            distances: reporting.outcome.distances.clone(),
            repetitions_ms: reporting
                .timings
                .iter()
                .map(|t| t.as_secs_f64() * 1000.0)
                .collect(),
            stats: runs.iter().map(|run| run.outcome.stats.clone()).collect(),
            collectives: metrics.snapshot(),
            verified,
        })
    }
}

async fn run_worker(
    graph: Arc<Graph>,
    comm: LocalCollective,
    config: RunConfig,
) -> Result<WorkerRun> {
    let rank = comm.rank();
    let mut timings = Vec::with_capacity(config.repeat);
    let mut last = None;

    comm.barrier().await?;
    for repetition in 0..config.repeat {
        let started = Instant::now();
        let outcome = DistributedDijkstra::new(&graph, &comm, &config)
            .run(config.source)
            .await?;
        let elapsed = started.elapsed();
        comm.barrier().await?;

        debug!(
            rank,
            repetition = repetition + 1,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "repetition finished"
        );
        timings.push(elapsed);
        last = Some(outcome);
    }

    last.map(|outcome| WorkerRun { outcome, timings })
        .ok_or_else(|| {
            DijkstraError::configuration_field("repeat must be greater than 0", "repeat")
        })
}
