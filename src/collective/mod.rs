//! Collective runtime for a fixed set of lockstep workers
//!
//! Workers communicate only through collective calls. Every call blocks
//! until all workers of the world have made the same call, and every worker
//! receives the same combined result. A worker that never arrives stalls the
//! whole world; there is no timeout.

mod local;

pub use local::LocalCollective;

use async_trait::async_trait;

use crate::coord::types::{Candidate, Distance, Topology};
use crate::core::errors::Result;

/// Collective operations available to a worker
#[async_trait]
pub trait Collective: Send + Sync {
    /// This worker's rank and the world size
    fn topology(&self) -> Topology;

    /// Wait until every worker reaches this point
    async fn barrier(&self) -> Result<()>;

    /// Combine one candidate per worker; smaller distance wins, then smaller vertex
    async fn all_reduce_min_loc(&self, local: Candidate) -> Result<Candidate>;

    /// Replace `values` with the element-wise minimum over all workers' vectors
    async fn all_reduce_min(&self, values: &mut [Distance]) -> Result<()>;

    fn rank(&self) -> usize {
        self.topology().rank
    }

    fn size(&self) -> usize {
        self.topology().size
    }
}
