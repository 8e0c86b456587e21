//! One round of the distributed extraction loop
//!
//! Every worker runs the same round: scan its share of the vertices for the
//! closest unvisited one, agree on the global minimum with its peers, then
//! settle that vertex and relax its out-edges locally. Because the graph and
//! the pre-round state are identical everywhere, the post-round state is
//! identical everywhere too, without any further communication.

use std::ops::Range;

use tracing::{debug, trace};

use crate::collective::Collective;
use crate::coord::partition::{Partition, RoundBudget};
use crate::coord::state::DistanceState;
use crate::coord::types::{Candidate, RoundOutcome, Topology, INFINITY};
use crate::core::config::ScanStrategy;
use crate::core::errors::Result;
use crate::graph::{Graph, VertexId};

/// Which vertices a worker looks at during the local scan
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanPlan {
    /// The same block of vertices every round
    Block(Range<VertexId>),
    /// `rank + round * size`, stepping by `step`
    Strided {
        rank: usize,
        size: usize,
        step: usize,
    },
}

impl ScanPlan {
    pub fn new(
        strategy: ScanStrategy,
        vertex_count: usize,
        topology: Topology,
        budget: &RoundBudget,
    ) -> Result<Self> {
        Ok(match strategy {
            ScanStrategy::Contiguous => {
                Self::Block(Partition::new(vertex_count, topology.size)?.range(topology.rank))
            }
            ScanStrategy::Strided => Self::Strided {
                rank: topology.rank,
                size: topology.size,
                step: (topology.size * budget.rounds_per_worker).max(1),
            },
        })
    }

    /// Vertex indices scanned in `round`, clipped to `[0, vertex_count)`
    pub fn vertices(
        &self,
        round: usize,
        vertex_count: usize,
    ) -> Box<dyn Iterator<Item = VertexId> + '_> {
        match self {
            Self::Block(range) => {
                Box::new(range.start.min(vertex_count)..range.end.min(vertex_count))
            }
            Self::Strided { rank, size, step } => {
                let start = rank.saturating_add(round.saturating_mul(*size));
                Box::new((start.min(vertex_count)..vertex_count).step_by(*step))
            }
        }
    }
}

/// Drives rounds for one worker against its private state
pub struct RoundCoordinator<'a, C: Collective + ?Sized> {
    graph: &'a Graph,
    collective: &'a C,
    plan: ScanPlan,
}

impl<'a, C: Collective + ?Sized> RoundCoordinator<'a, C> {
    pub fn new(graph: &'a Graph, collective: &'a C, plan: ScanPlan) -> Self {
        Self {
            graph,
            collective,
            plan,
        }
    }

    /// Closest unvisited, reachable vertex in this worker's scan set.
    ///
    /// Vertices are visited in ascending order with a strict comparison, so
    /// the lowest index wins among equal distances.
    pub fn local_candidate(&self, state: &DistanceState, round: usize) -> Candidate {
        let mut best = Candidate::NONE;
        for vertex in self.plan.vertices(round, state.len()) {
            let distance = state.distance(vertex);
            if !state.is_visited(vertex) && distance != INFINITY && distance < best.distance {
                best = Candidate::new(vertex, distance);
            }
        }
        best
    }

    /// Settle `candidate` and relax its out-edges; returns how many entries dropped
    pub fn settle_and_relax(&self, state: &mut DistanceState, candidate: Candidate) -> usize {
        let Some(vertex) = candidate.vertex else {
            return 0;
        };
        state.settle(vertex);

        let mut relaxed = 0;
        for edge in self.graph.edges(vertex) {
            let through = candidate.distance.saturating_add(u64::from(edge.weight));
            if state.relax(edge.dst, through) {
                relaxed += 1;
            }
        }
        relaxed
    }

    /// Run one full round: local scan, agreement, settle, relax
    pub async fn step(&self, state: &mut DistanceState, round: usize) -> Result<RoundOutcome> {
        let local = self.local_candidate(state, round);
        let global = self.collective.all_reduce_min_loc(local).await?;

        let Some(vertex) = global.vertex else {
            trace!(rank = self.collective.rank(), round, "no candidate this round");
            return Ok(RoundOutcome::Idle);
        };

        let relaxed = self.settle_and_relax(state, global);
        debug!(
            rank = self.collective.rank(),
            round,
            vertex,
            distance = global.distance,
            relaxed,
            "settled"
        );
        Ok(RoundOutcome::Settled {
            vertex,
            distance: global.distance,
            relaxed,
        })
    }
}
