//! Core types shared by the round loop and the collective runtime

use serde::{Deserialize, Serialize};

use crate::core::errors::{DijkstraError, Result};
use crate::graph::VertexId;

/// Tentative or final shortest-path distance
pub type Distance = u64;

/// Distance sentinel for vertices not (yet) reached
pub const INFINITY: Distance = Distance::MAX;

/// A worker's identity within the fixed worker set
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub rank: usize,
    pub size: usize,
}

impl Topology {
    pub fn new(rank: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(DijkstraError::configuration_field(
                "worker count must be greater than 0",
                "workers",
            ));
        }
        if rank >= size {
            return Err(DijkstraError::configuration_field(
                format!("rank {} outside worker set of size {}", rank, size),
                "rank",
            ));
        }
        Ok(Self { rank, size })
    }
}

/// Payload of the minimum-with-location agreement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub distance: Distance,
    pub vertex: Option<VertexId>,
}

impl Candidate {
    /// "No candidate": loses against every real candidate
    pub const NONE: Candidate = Candidate {
        distance: Distance::MAX,
        vertex: None,
    };

    pub fn new(vertex: VertexId, distance: Distance) -> Self {
        Self {
            distance,
            vertex: Some(vertex),
        }
    }

    pub fn is_none(&self) -> bool {
        self.vertex.is_none()
    }

    fn key(&self) -> (Distance, usize) {
        (self.distance, self.vertex.unwrap_or(usize::MAX))
    }

    /// Smaller distance wins; on equal distance the smaller vertex index wins
    pub fn min_loc(self, other: Candidate) -> Candidate {
        if other.key() < self.key() {
            other
        } else {
            self
        }
    }
}

impl Default for Candidate {
    fn default() -> Self {
        Self::NONE
    }
}

/// Result of a single round as seen by one worker
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    /// The agreed vertex was settled and its out-edges relaxed
    Settled {
        vertex: VertexId,
        distance: Distance,
        relaxed: usize,
    },
    /// No worker had a candidate; settle and relax were skipped
    Idle,
}

impl RoundOutcome {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_loc_prefers_smaller_distance() {
        let a = Candidate::new(5, 3);
        let b = Candidate::new(1, 7);
        assert_eq!(a.min_loc(b), a);
        assert_eq!(b.min_loc(a), a);
    }

    #[test]
    fn test_min_loc_tie_breaks_on_lower_vertex() {
        let low = Candidate::new(2, 9);
        let high = Candidate::new(6, 9);
        assert_eq!(low.min_loc(high), low);
        assert_eq!(high.min_loc(low), low);
    }

    #[test]
    fn test_none_never_wins() {
        let real = Candidate::new(usize::MAX - 1, Distance::MAX - 1);
        assert_eq!(Candidate::NONE.min_loc(real), real);
        assert_eq!(real.min_loc(Candidate::NONE), real);
        assert!(Candidate::NONE.min_loc(Candidate::NONE).is_none());
    }

    #[test]
    fn test_topology_validation() {
        assert_eq!(Topology::new(0, 1).unwrap(), Topology { rank: 0, size: 1 });
        assert!(Topology::new(2, 2).is_err());
        assert!(Topology::new(0, 0).is_err());
    }
}
