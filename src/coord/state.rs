//! Per-worker distance vector and visited set

use crate::coord::types::{Distance, INFINITY};
use crate::graph::VertexId;

/// A worker's private replica of the shortest-path state.
///
/// Distances only ever decrease and visited flags only ever go from false to
/// true; both hold for every method below.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceState {
    distances: Vec<Distance>,
    visited: Vec<bool>,
}

impl DistanceState {
    /// Every vertex at `INFINITY` and unvisited, except `source` at 0.
    ///
    /// The caller guarantees `source < vertex_count`.
    pub fn new(vertex_count: usize, source: VertexId) -> Self {
        let mut distances = vec![INFINITY; vertex_count];
        if let Some(slot) = distances.get_mut(source) {
            *slot = 0;
        }
        Self {
            distances,
            visited: vec![false; vertex_count],
        }
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn distance(&self, vertex: VertexId) -> Distance {
        self.distances.get(vertex).copied().unwrap_or(INFINITY)
    }

    pub fn is_visited(&self, vertex: VertexId) -> bool {
        self.visited.get(vertex).copied().unwrap_or(false)
    }

    pub fn distances(&self) -> &[Distance] {
        &self.distances
    }

    pub fn visited(&self) -> &[bool] {
        &self.visited
    }

    pub fn settled_count(&self) -> usize {
        self.visited.iter().filter(|&&v| v).count()
    }

    /// Mark `vertex` visited; returns true only on the first call for it
    pub fn settle(&mut self, vertex: VertexId) -> bool {
        match self.visited.get_mut(vertex) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    /// Lower the distance of an unvisited `vertex` to `candidate` if smaller.
    /// Returns whether the entry changed.
    pub fn relax(&mut self, vertex: VertexId, candidate: Distance) -> bool {
        if self.is_visited(vertex) {
            return false;
        }
        match self.distances.get_mut(vertex) {
            Some(current) if candidate < *current => {
                *current = candidate;
                true
            }
            _ => false,
        }
    }

    /// Element-wise minimum with another replica's distances
    pub fn merge_min(&mut self, other: &[Distance]) {
        for (mine, &theirs) in self.distances.iter_mut().zip(other) {
            *mine = (*mine).min(theirs);
        }
    }

    pub(crate) fn distances_mut(&mut self) -> &mut [Distance] {
        &mut self.distances
    }

    pub fn into_distances(self) -> Vec<Distance> {
        self.distances
    }
}
