// Core infrastructure modules
pub mod core {
    pub mod config;
    pub mod errors;
    pub mod metrics;
}

pub mod collective; // Barrier and reductions between lockstep workers
pub mod coord; // Partitioned scan, agreement, settle, relax
pub mod graph; // Edge arena, text format, generators
pub mod harness;
pub mod reference;
pub mod report;

// Re-exports for convenience
pub use collective::{Collective, LocalCollective};
pub use coord::{
    Candidate, DijkstraOutcome, DistanceState, Distance, DistributedDijkstra, Partition,
    RoundBudget, RoundCoordinator, RoundOutcome, ScanPlan, Topology, INFINITY,
};
pub use crate::core::config::{RoundPolicy, RunConfig, RunConfigBuilder, ScanStrategy};
pub use crate::core::errors::{DijkstraError, Result};
pub use crate::core::metrics::{CollectiveMetrics, CollectiveSnapshot, RunStats};
pub use graph::{Edge, Graph, VertexId, Weight};
pub use harness::{Harness, RunReport, TimingSummary};
