//! Adjacency-list graph backed by an edge arena
//!
//! Each vertex holds the index of its most recently added edge; every edge
//! record links to the edge added before it. Traversal therefore walks a
//! vertex's edges in reverse-insertion order.

use serde::{Deserialize, Serialize};

use crate::core::errors::{DijkstraError, Result};

/// Vertex identifier, always in `[0, V)` for a valid graph
pub type VertexId = usize;

/// Edge weight
pub type Weight = u32;

/// A directed weighted edge as seen by callers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub dst: VertexId,
    pub weight: Weight,
}

#[derive(Clone, Debug)]
struct EdgeRecord {
    edge: Edge,
    next: Option<usize>,
}

/// Directed weighted graph with a fixed vertex count
#[derive(Clone, Debug, Default)]
pub struct Graph {
    heads: Vec<Option<usize>>,
    arena: Vec<EdgeRecord>,
}

impl Graph {
    /// Create a graph with `vertex_count` vertices and no edges
    pub fn new(vertex_count: usize) -> Self {
        Self {
            heads: vec![None; vertex_count],
            arena: Vec::new(),
        }
    }

    /// Like [`Graph::new`], but reports a failed allocation instead of aborting
    pub fn try_new(vertex_count: usize) -> Result<Self> {
        let mut heads = Vec::new();
        heads.try_reserve_exact(vertex_count).map_err(|err| {
            DijkstraError::configuration_field(
                format!("cannot allocate {} vertices: {}", vertex_count, err),
                "max_vertices",
            )
        })?;
        heads.resize(vertex_count, None);
        Ok(Self {
            heads,
            arena: Vec::new(),
        })
    }

    /// Create a graph with room for `edges` edge records
    pub fn with_capacity(vertex_count: usize, edges: usize) -> Self {
        Self {
            heads: vec![None; vertex_count],
            arena: Vec::with_capacity(edges),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.heads.len()
    }

    pub fn edge_count(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }

    /// Prepend a directed edge to `src`'s list.
    ///
    /// Duplicate edges and self-loops are accepted as-is; only the endpoints
    /// are range-checked.
    pub fn add_edge(&mut self, src: VertexId, dst: VertexId, weight: Weight) -> Result<()> {
        let vertex_count = self.vertex_count();
        if src >= vertex_count {
            return Err(DijkstraError::vertex_out_of_range(src, vertex_count));
        }
        if dst >= vertex_count {
            return Err(DijkstraError::vertex_out_of_range(dst, vertex_count));
        }

        let index = self.arena.len();
        self.arena.push(EdgeRecord {
            edge: Edge { dst, weight },
            next: self.heads[src],
        });
        self.heads[src] = Some(index);
        Ok(())
    }

    /// Add the pair of directed edges `a -> b` and `b -> a`
    pub fn add_undirected_edge(&mut self, a: VertexId, b: VertexId, weight: Weight) -> Result<()> {
        self.add_edge(a, b, weight)?;
        self.add_edge(b, a, weight)
    }

    /// Outgoing edges of `vertex`, most recently added first.
    ///
    /// An out-of-range vertex has no edges.
    pub fn edges(&self, vertex: VertexId) -> Edges<'_> {
        Edges {
            arena: &self.arena,
            cursor: self.heads.get(vertex).copied().flatten(),
        }
    }

    pub fn out_degree(&self, vertex: VertexId) -> usize {
        self.edges(vertex).count()
    }

    /// Every edge as `(src, edge)`, grouped by source vertex in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, Edge)> + '_ {
        (0..self.vertex_count()).flat_map(move |src| self.edges(src).map(move |edge| (src, edge)))
    }
}

/// Lazy traversal of a single vertex's outgoing edges
#[derive(Clone)]
pub struct Edges<'a> {
    arena: &'a [EdgeRecord],
    cursor: Option<usize>,
}

impl<'a> Iterator for Edges<'a> {
    type Item = Edge;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.arena.get(self.cursor?)?;
        self.cursor = record.next;
        Some(record.edge)
    }
}
