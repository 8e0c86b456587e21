//! Per-worker orchestration of the distributed shortest-path loop

use std::time::Instant;

use tracing::{info, info_span, warn, Instrument};

use crate::collective::Collective;
use crate::coord::partition::RoundBudget;
use crate::coord::round::{RoundCoordinator, ScanPlan};
use crate::coord::state::DistanceState;
use crate::coord::types::{Distance, RoundOutcome, Topology};
use crate::core::config::RunConfig;
use crate::core::errors::{DijkstraError, Result};
use crate::core::metrics::RunStats;
use crate::graph::{Graph, VertexId};

/// What one worker ends up with after a run
#[derive(Clone, Debug, PartialEq)]
pub struct DijkstraOutcome {
    /// Reconciled distances, identical on every worker
    pub distances: Vec<Distance>,
    pub stats: RunStats,
}

/// One worker's view of a distributed shortest-path computation
pub struct DistributedDijkstra<'a, C: Collective + ?Sized> {
    graph: &'a Graph,
    collective: &'a C,
    config: &'a RunConfig,
}

impl<'a, C: Collective + ?Sized> DistributedDijkstra<'a, C> {
    pub fn new(graph: &'a Graph, collective: &'a C, config: &'a RunConfig) -> Self {
        Self {
            graph,
            collective,
            config,
        }
    }

    /// Checks that need no communication. Every worker sees the same graph,
    /// source and config, so every worker fails or passes together.
    pub fn validate(&self, source: VertexId) -> Result<Topology> {
        let vertex_count = self.graph.vertex_count();
        if vertex_count == 0 {
            return Err(DijkstraError::missing_graph("graph has no vertices"));
        }
        if source >= vertex_count {
            return Err(DijkstraError::source_out_of_range(source, vertex_count));
        }
        let topology = Topology::new(self.collective.rank(), self.collective.size())?;
        if topology.size != self.config.workers {
            return Err(DijkstraError::configuration_field(
                format!(
                    "collective world has {} workers, config expects {}",
                    topology.size, self.config.workers
                ),
                "workers",
            ));
        }
        Ok(topology)
    }

    /// Run the full computation from `source`.
    ///
    /// Precondition failures return before the first collective call. After
    /// that, every worker executes the same sequence of collectives.
    pub async fn run(&self, source: VertexId) -> Result<DijkstraOutcome> {
        let topology = self.validate(source)?;
        let budget =
            RoundBudget::for_topology(self.graph.vertex_count(), topology, self.config.round_policy)?;
        let plan = ScanPlan::new(
            self.config.scan_strategy,
            self.graph.vertex_count(),
            topology,
            &budget,
        )?;

        self.execute(source, topology, budget, plan)
            .instrument(info_span!("worker", rank = topology.rank))
            .await
    }

    async fn execute(
        &self,
        source: VertexId,
        topology: Topology,
        budget: RoundBudget,
        plan: ScanPlan,
    ) -> Result<DijkstraOutcome> {
        let started = Instant::now();
        self.agree_on("round_budget", budget.rounds as u64).await?;

        let coordinator = RoundCoordinator::new(self.graph, self.collective, plan);
        let mut state = DistanceState::new(self.graph.vertex_count(), source);
        let mut stats = RunStats::new(topology.rank);

        for round in 0..budget.rounds {
            let outcome = coordinator.step(&mut state, round).await?;
            stats.rounds += 1;
            match outcome {
                RoundOutcome::Settled { relaxed, .. } => {
                    stats.settled += 1;
                    stats.relaxations += relaxed;
                }
                RoundOutcome::Idle => {
                    stats.idle_rounds += 1;
                    if self.config.stop_when_exhausted {
                        break;
                    }
                }
            }
        }

        self.collective
            .all_reduce_min(state.distances_mut())
            .await?;
        stats.elapsed = started.elapsed();

        if stats.idle_rounds > 0 {
            warn!(
                idle_rounds = stats.idle_rounds,
                "rounds found no candidate to settle"
            );
        }
        if stats.settled + 1 < self.graph.vertex_count() && stats.idle_rounds == 0 {
            warn!(
                settled = stats.settled,
                vertices = self.graph.vertex_count(),
                "round budget ended before every vertex could be settled"
            );
        }
        info!(
            rounds = stats.rounds,
            settled = stats.settled,
            relaxations = stats.relaxations,
            elapsed_ms = stats.elapsed_ms(),
            "shortest-path run complete"
        );

        Ok(DijkstraOutcome {
            distances: state.into_distances(),
            stats,
        })
    }

    /// Fail on every worker unless all workers hold the same `local` value.
    ///
    /// One vector reduction over `[v, MAX - v]` yields both the minimum and
    /// the maximum across workers.
    async fn agree_on(&self, operation: &str, local: u64) -> Result<()> {
        let mut bounds = [local, u64::MAX - local];
        self.collective.all_reduce_min(&mut bounds).await?;
        let (min, max) = (bounds[0], u64::MAX - bounds[1]);
        if min != max {
            return Err(DijkstraError::divergence(operation, local, min, max));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collective::LocalCollective;
    use crate::coord::types::{Candidate, INFINITY};
    use async_trait::async_trait;
    use futures::future::join_all;

    fn config(workers: usize) -> RunConfig {
        RunConfig::builder().workers(workers).build().unwrap()
    }

    #[tokio::test]
    async fn test_single_worker_sample() {
        let mut graph = Graph::new(4);
        for (src, dst, weight) in [(0, 1, 4), (0, 2, 1), (2, 1, 2), (1, 3, 1), (2, 3, 5)] {
            graph.add_edge(src, dst, weight).unwrap();
        }
        let world = LocalCollective::world(1).unwrap();
        let config = config(1);

        let outcome = DistributedDijkstra::new(&graph, &world[0], &config)
            .run(0)
            .await
            .unwrap();
        assert_eq!(outcome.distances, vec![0, 3, 1, 4]);
        assert_eq!(outcome.stats.rounds, 3);
        assert_eq!(outcome.stats.settled, 3);
        assert_eq!(outcome.stats.idle_rounds, 0);
    }

    #[tokio::test]
    async fn test_preconditions_fail_before_collectives() {
        let graph = Graph::new(3);
        let world = LocalCollective::world(2).unwrap();
        let metrics = world[0].metrics();
        let config = config(2);

        let err = DistributedDijkstra::new(&graph, &world[0], &config)
            .run(3)
            .await
            .unwrap_err();
        assert!(matches!(err, DijkstraError::SourceOutOfRange { .. }));
        assert!(err.is_precondition());

        let empty = Graph::new(0);
        let err = DistributedDijkstra::new(&empty, &world[1], &config)
            .run(0)
            .await
            .unwrap_err();
        assert!(matches!(err, DijkstraError::MissingGraph { .. }));

        let wrong = RunConfig::builder().workers(3).build().unwrap();
        let err = DistributedDijkstra::new(&graph, &world[0], &wrong)
            .run(0)
            .await
            .unwrap_err();
        assert!(matches!(err, DijkstraError::Configuration { .. }));

        assert_eq!(metrics.snapshot().vector_reductions, 0);
    }

    #[tokio::test]
    async fn test_stop_when_exhausted_breaks_in_lockstep() {
        let mut graph = Graph::new(5);
        graph.add_edge(0, 1, 2).unwrap();
        let world = LocalCollective::world(2).unwrap();
        let config = RunConfig::builder()
            .workers(2)
            .stop_when_exhausted(true)
            .build()
            .unwrap();

        let graph = &graph;
        let config = &config;
        let outcomes = join_all(world.iter().map(|comm| async move {
            DistributedDijkstra::new(graph, comm, config).run(0).await
        }))
        .await;

        for outcome in outcomes {
            let outcome = outcome.unwrap();
            assert_eq!(outcome.distances, vec![0, 2, INFINITY, INFINITY, INFINITY]);
            assert_eq!(outcome.stats.settled, 2);
            assert_eq!(outcome.stats.idle_rounds, 1);
            assert_eq!(outcome.stats.rounds, 3);
        }
    }

    /// Wraps a real handle but lies about the round budget it computed
    struct SkewedBudget {
        inner: LocalCollective,
        skew: bool,
    }

    #[async_trait]
    impl Collective for SkewedBudget {
        fn topology(&self) -> Topology {
            self.inner.topology()
        }

        async fn barrier(&self) -> Result<()> {
            self.inner.barrier().await
        }

        async fn all_reduce_min_loc(&self, local: Candidate) -> Result<Candidate> {
            self.inner.all_reduce_min_loc(local).await
        }

        async fn all_reduce_min(&self, values: &mut [Distance]) -> Result<()> {
            if self.skew && values.len() == 2 {
                values[0] += 1;
                values[1] -= 1;
            }
            self.inner.all_reduce_min(values).await
        }
    }

    #[tokio::test]
    async fn test_budget_divergence_detected_everywhere() {
        let graph = Graph::new(4);
        let config = config(2);
        let world: Vec<_> = LocalCollective::world(2)
            .unwrap()
            .into_iter()
            .map(|inner| {
                let skew = inner.rank() == 1;
                SkewedBudget { inner, skew }
            })
            .collect();

        let graph = &graph;
        let config = &config;
        let outcomes = join_all(world.iter().map(|comm| async move {
            DistributedDijkstra::new(graph, comm, config).run(0).await
        }))
        .await;

        for outcome in outcomes {
            assert!(matches!(
                outcome,
                Err(DijkstraError::Divergence { min: 3, max: 4, .. })
            ));
        }
    }
}
