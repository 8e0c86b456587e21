//! Run metrics
//!
//! `CollectiveMetrics` is shared by every worker of a collective world and
//! counts collective calls; `RunStats` is the per-worker summary of one run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Counters for collective operations, updated by every worker
#[derive(Debug, Default)]
pub struct CollectiveMetrics {
    /// Barrier calls completed, summed over workers
    pub barriers: AtomicU64,
    /// Minimum-with-location reductions, summed over workers
    pub min_loc_reductions: AtomicU64,
    /// Element-wise vector reductions, summed over workers
    pub vector_reductions: AtomicU64,
    /// Elements contributed to vector reductions, summed over workers
    pub vector_elements: AtomicU64,
}

impl CollectiveMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_barrier(&self) {
        self.barriers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_min_loc(&self) {
        self.min_loc_reductions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_vector(&self, elements: usize) {
        self.vector_reductions.fetch_add(1, Ordering::Relaxed);
        self.vector_elements
            .fetch_add(elements as u64, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> CollectiveSnapshot {
        CollectiveSnapshot {
            barriers: self.barriers.load(Ordering::Relaxed),
            min_loc_reductions: self.min_loc_reductions.load(Ordering::Relaxed),
            vector_reductions: self.vector_reductions.load(Ordering::Relaxed),
            vector_elements: self.vector_elements.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.barriers.store(0, Ordering::Relaxed);
        self.min_loc_reductions.store(0, Ordering::Relaxed);
        self.vector_reductions.store(0, Ordering::Relaxed);
        self.vector_elements.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of collective counters at a point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectiveSnapshot {
    pub barriers: u64,
    pub min_loc_reductions: u64,
    pub vector_reductions: u64,
    pub vector_elements: u64,
}

/// Per-worker summary of one shortest-path run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub rank: usize,
    /// Rounds executed, idle ones included
    pub rounds: usize,
    /// Rounds that settled a vertex
    pub settled: usize,
    /// Rounds whose agreement found no candidate
    pub idle_rounds: usize,
    /// Distance entries lowered by relaxation
    pub relaxations: usize,
    pub elapsed: Duration,
}

impl RunStats {
    pub fn new(rank: usize) -> Self {
        Self {
            rank,
            ..Default::default()
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}
