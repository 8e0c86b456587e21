//! Near-equal range partition of a count across a worker set
//!
//! Worker `i` of `N` gets `floor(total / N)` units, plus one more when
//! `i < total % N`. Displacements are the prefix sums of the counts, so the
//! ranges tile `[0, total)` without gaps.

use std::ops::Range;

use crate::core::config::RoundPolicy;
use crate::core::errors::{DijkstraError, Result};
use crate::coord::types::Topology;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    total: usize,
    counts: Vec<usize>,
    displacements: Vec<usize>,
}

impl Partition {
    pub fn new(total: usize, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(DijkstraError::configuration_field(
                "cannot partition across zero workers",
                "workers",
            ));
        }

        let base = total / workers;
        let remainder = total % workers;
        let counts: Vec<usize> = (0..workers)
            .map(|i| base + usize::from(i < remainder))
            .collect();
        let displacements = counts
            .iter()
            .scan(0, |offset, &count| {
                let start = *offset;
                *offset += count;
                Some(start)
            })
            .collect();

        Ok(Self {
            total,
            counts,
            displacements,
        })
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn workers(&self) -> usize {
        self.counts.len()
    }

    /// Units assigned to `worker`; zero for an unknown worker
    pub fn count(&self, worker: usize) -> usize {
        self.counts.get(worker).copied().unwrap_or(0)
    }

    /// Exclusive starting offset of `worker`'s range
    pub fn displacement(&self, worker: usize) -> usize {
        self.displacements
            .get(worker)
            .copied()
            .unwrap_or(self.total)
    }

    pub fn range(&self, worker: usize) -> Range<usize> {
        let start = self.displacement(worker);
        start..start + self.count(worker)
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn displacements(&self) -> &[usize] {
        &self.displacements
    }

    /// Worker whose range contains `index`
    pub fn owner_of(&self, index: usize) -> Option<usize> {
        if index >= self.total {
            return None;
        }
        // Last worker whose displacement is <= index and whose range is non-empty.
        let upper = self.displacements.partition_point(|&d| d <= index);
        (0..upper).rev().find(|&w| self.range(w).contains(&index))
    }
}

/// Rounds a worker runs for a graph of `vertex_count` vertices
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundBudget {
    /// Rounds this worker executes
    pub rounds: usize,
    /// `floor((V - 1) / N)`, the stride factor of the strided scan
    pub rounds_per_worker: usize,
    /// Partition of the `V - 1` extractions across workers
    pub extractions: Partition,
}

impl RoundBudget {
    pub fn for_topology(
        vertex_count: usize,
        topology: Topology,
        policy: RoundPolicy,
    ) -> Result<Self> {
        let total = vertex_count.saturating_sub(1);
        let extractions = Partition::new(total, topology.size)?;
        let rounds_per_worker = total / topology.size;

        // Collectives need every worker in every round, so the exact policy
        // runs the full extraction total everywhere rather than c_i.
        let rounds = match policy {
            RoundPolicy::Exact => extractions.counts().iter().sum(),
            RoundPolicy::Truncated => rounds_per_worker,
        };

        Ok(Self {
            rounds,
            rounds_per_worker,
            extractions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_uneven_split() {
        let partition = Partition::new(10, 4).unwrap();
        assert_eq!(partition.counts(), &[3, 3, 2, 2]);
        assert_eq!(partition.displacements(), &[0, 3, 6, 8]);
        assert_eq!(partition.range(2), 6..8);
        assert_eq!(partition.owner_of(0), Some(0));
        assert_eq!(partition.owner_of(5), Some(1));
        assert_eq!(partition.owner_of(9), Some(3));
        assert_eq!(partition.owner_of(10), None);
    }

    #[test]
    fn test_more_workers_than_units() {
        let partition = Partition::new(2, 5).unwrap();
        assert_eq!(partition.counts(), &[1, 1, 0, 0, 0]);
        assert_eq!(partition.displacements(), &[0, 1, 2, 2, 2]);
        assert!(partition.range(4).is_empty());
        assert_eq!(partition.owner_of(1), Some(1));
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(Partition::new(4, 0).is_err());
    }

    #[test]
    fn test_round_budget_policies() {
        let topology = Topology::new(1, 2).unwrap();
        let exact = RoundBudget::for_topology(4, topology, RoundPolicy::Exact).unwrap();
        assert_eq!(exact.rounds, 3);
        assert_eq!(exact.extractions.counts(), &[2, 1]);

        let truncated = RoundBudget::for_topology(4, topology, RoundPolicy::Truncated).unwrap();
        assert_eq!(truncated.rounds, 1);
        assert_eq!(truncated.rounds_per_worker, 1);
    }

    #[test]
    fn test_single_vertex_has_no_rounds() {
        let topology = Topology::new(0, 3).unwrap();
        let budget = RoundBudget::for_topology(1, topology, RoundPolicy::Exact).unwrap();
        assert_eq!(budget.rounds, 0);
    }

    proptest! {
        #[test]
        fn prop_counts_cover_total(total in 0usize..5_000, workers in 1usize..64) {
            let partition = Partition::new(total, workers).unwrap();
            prop_assert_eq!(partition.counts().iter().sum::<usize>(), total);

            for w in 1..workers {
                prop_assert_eq!(
                    partition.displacement(w),
                    partition.displacement(w - 1) + partition.count(w - 1)
                );
                prop_assert!(partition.count(w - 1) >= partition.count(w));
                prop_assert!(partition.count(w - 1) - partition.count(w) <= 1);
            }
        }

        #[test]
        fn prop_exact_budget_is_vertex_count_minus_one(vertices in 1usize..2_000, workers in 1usize..16) {
            let topology = Topology::new(workers - 1, workers).unwrap();
            let budget = RoundBudget::for_topology(vertices, topology, RoundPolicy::Exact).unwrap();
            prop_assert_eq!(budget.rounds, vertices - 1);
        }
    }
}
