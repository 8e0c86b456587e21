//! In-process collective world
//!
//! Each worker is a tokio task holding one `LocalCollective`. A reduction is
//! two barrier phases: every worker writes its contribution into its own
//! slot, waits, folds all slots in rank order, then waits again so no slot
//! is overwritten while a slower peer is still reading it.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::Barrier;
use tracing::trace;

use super::Collective;
use crate::coord::types::{Candidate, Distance, Topology};
use crate::core::errors::{DijkstraError, Result};
use crate::core::metrics::CollectiveMetrics;

struct World {
    size: usize,
    barrier: Barrier,
    candidates: Mutex<Vec<Candidate>>,
    vectors: Mutex<Vec<Vec<Distance>>>,
    metrics: Arc<CollectiveMetrics>,
}

impl World {
    fn candidates(&self) -> Result<MutexGuard<'_, Vec<Candidate>>> {
        self.candidates
            .lock()
            .map_err(|_| DijkstraError::collective("all_reduce_min_loc", "slot lock poisoned"))
    }

    fn vectors(&self) -> Result<MutexGuard<'_, Vec<Vec<Distance>>>> {
        self.vectors
            .lock()
            .map_err(|_| DijkstraError::collective("all_reduce_min", "slot lock poisoned"))
    }
}

/// One worker's handle on an in-process collective world
#[derive(Clone)]
pub struct LocalCollective {
    rank: usize,
    world: Arc<World>,
}

impl LocalCollective {
    /// Create a world of `size` workers; handle `i` has rank `i`
    pub fn world(size: usize) -> Result<Vec<LocalCollective>> {
        Self::world_with_metrics(size, Arc::new(CollectiveMetrics::new()))
    }

    pub fn world_with_metrics(
        size: usize,
        metrics: Arc<CollectiveMetrics>,
    ) -> Result<Vec<LocalCollective>> {
        if size == 0 {
            return Err(DijkstraError::configuration_field(
                "collective world needs at least one worker",
                "workers",
            ));
        }

        let world = Arc::new(World {
            size,
            barrier: Barrier::new(size),
            candidates: Mutex::new(vec![Candidate::NONE; size]),
            vectors: Mutex::new(vec![Vec::new(); size]),
            metrics,
        });
        Ok((0..size)
            .map(|rank| LocalCollective {
                rank,
                world: world.clone(),
            })
            .collect())
    }

    pub fn metrics(&self) -> Arc<CollectiveMetrics> {
        self.world.metrics.clone()
    }
}

#[async_trait]
impl Collective for LocalCollective {
    fn topology(&self) -> Topology {
        Topology {
            rank: self.rank,
            size: self.world.size,
        }
    }

    async fn barrier(&self) -> Result<()> {
        self.world.barrier.wait().await;
        self.world.metrics.record_barrier();
        Ok(())
    }

    async fn all_reduce_min_loc(&self, local: Candidate) -> Result<Candidate> {
        self.world.candidates()?[self.rank] = local;
        self.world.barrier.wait().await;

        let global = self
            .world
            .candidates()
            .map(|slots| slots.iter().fold(Candidate::NONE, |acc, &c| acc.min_loc(c)));

        self.world.barrier.wait().await;
        self.world.metrics.record_min_loc();
        trace!(rank = self.rank, ?local, "min-loc reduction");
        global
    }

    async fn all_reduce_min(&self, values: &mut [Distance]) -> Result<()> {
        {
            let mut slots = self.world.vectors()?;
            let slot = &mut slots[self.rank];
            slot.clear();
            slot.extend_from_slice(values);
        }
        self.world.barrier.wait().await;

        let reduced = self.world.vectors().and_then(|slots| {
            if let Some((rank, slot)) = slots
                .iter()
                .enumerate()
                .find(|(_, slot)| slot.len() != values.len())
            {
                return Err(DijkstraError::divergence(
                    format!("all_reduce_min length (rank {})", rank),
                    values.len() as u64,
                    values.len().min(slot.len()) as u64,
                    values.len().max(slot.len()) as u64,
                ));
            }
            for slot in slots.iter() {
                for (value, &other) in values.iter_mut().zip(slot) {
                    *value = (*value).min(other);
                }
            }
            Ok(())
        });

        self.world.barrier.wait().await;
        self.world.metrics.record_vector(values.len());
        reduced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;

    #[tokio::test]
    async fn test_world_ranks() {
        let world = LocalCollective::world(3).unwrap();
        let ranks: Vec<_> = world.iter().map(|c| c.topology()).collect();
        assert_eq!(
            ranks,
            vec![
                Topology { rank: 0, size: 3 },
                Topology { rank: 1, size: 3 },
                Topology { rank: 2, size: 3 },
            ]
        );
        assert!(LocalCollective::world(0).is_err());
    }

    #[tokio::test]
    async fn test_min_loc_agrees_everywhere() {
        let world = LocalCollective::world(4).unwrap();
        let contributions = [
            Candidate::new(7, 5),
            Candidate::NONE,
            Candidate::new(3, 5),
            Candidate::new(1, 6),
        ];

        let results = join_all(
            world
                .into_iter()
                .zip(contributions)
                .map(|(comm, local)| async move { comm.all_reduce_min_loc(local).await }),
        )
        .await;

        for result in results {
            assert_eq!(result.unwrap(), Candidate::new(3, 5));
        }
    }

    #[tokio::test]
    async fn test_min_loc_all_none() {
        let world = LocalCollective::world(2).unwrap();
        let results = join_all(
            world
                .into_iter()
                .map(|comm| async move { comm.all_reduce_min_loc(Candidate::NONE).await }),
        )
        .await;
        assert!(results.into_iter().all(|r| r.unwrap().is_none()));
    }

    #[tokio::test]
    async fn test_vector_min_and_repeated_use() {
        let world = LocalCollective::world(3).unwrap();
        let metrics = world[0].metrics();

        let handles: Vec<_> = world
            .into_iter()
            .map(|comm| {
                tokio::spawn(async move {
                    let rank = comm.rank() as u64;
                    let mut first = vec![10 - rank, rank, 7];
                    comm.all_reduce_min(&mut first).await.unwrap();
                    comm.barrier().await.unwrap();
                    let mut second = vec![rank * 2];
                    comm.all_reduce_min(&mut second).await.unwrap();
                    (first, second)
                })
            })
            .collect();

        for handle in join_all(handles).await {
            let (first, second) = handle.unwrap();
            assert_eq!(first, vec![8, 0, 7]);
            assert_eq!(second, vec![0]);
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.barriers, 3);
        assert_eq!(snapshot.vector_reductions, 6);
        assert_eq!(snapshot.vector_elements, 3 * 3 + 3);
    }

    #[tokio::test]
    async fn test_vector_length_mismatch_detected_by_all() {
        let world = LocalCollective::world(2).unwrap();
        let results = join_all(world.into_iter().map(|comm| async move {
            let mut values = vec![1; comm.rank() + 1];
            comm.all_reduce_min(&mut values).await
        }))
        .await;
        assert!(results
            .iter()
            .all(|r| matches!(r, Err(DijkstraError::Divergence { .. }))));
    }
}
