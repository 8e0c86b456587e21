//! Sequential Dijkstra used to check distributed results

use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::coord::types::{Distance, INFINITY};
use crate::core::errors::{DijkstraError, Result};
use crate::graph::{Graph, VertexId};

/// Mirror `graph` into a petgraph `DiGraph` with the same vertex numbering
pub fn to_petgraph(graph: &Graph) -> DiGraph<(), Distance> {
    let mut mirror = DiGraph::with_capacity(graph.vertex_count(), graph.edge_count());
    for _ in 0..graph.vertex_count() {
        mirror.add_node(());
    }
    for (src, edge) in graph.iter() {
        mirror.add_edge(
            NodeIndex::new(src),
            NodeIndex::new(edge.dst),
            Distance::from(edge.weight),
        );
    }
    mirror
}

/// Shortest distances from `source`, `INFINITY` where unreachable
pub fn sequential_distances(graph: &Graph, source: VertexId) -> Result<Vec<Distance>> {
    if source >= graph.vertex_count() {
        return Err(DijkstraError::source_out_of_range(
            source,
            graph.vertex_count(),
        ));
    }

    let mirror = to_petgraph(graph);
    let found = dijkstra(&mirror, NodeIndex::new(source), None, |e| *e.weight());

    let mut distances = vec![INFINITY; graph.vertex_count()];
    for (node, distance) in found {
        distances[node.index()] = distance;
    }
    Ok(distances)
}

/// First vertex where `actual` and `expected` disagree
pub fn first_mismatch(actual: &[Distance], expected: &[Distance]) -> Option<VertexId> {
    if actual.len() != expected.len() {
        return Some(actual.len().min(expected.len()));
    }
    actual.iter().zip(expected).position(|(a, e)| a != e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_on_sample() {
        let mut graph = Graph::new(5);
        for (src, dst, weight) in [(0, 1, 4), (0, 2, 1), (2, 1, 2), (1, 3, 1), (2, 3, 5)] {
            graph.add_edge(src, dst, weight).unwrap();
        }
        let distances = sequential_distances(&graph, 0).unwrap();
        assert_eq!(distances, vec![0, 3, 1, 4, INFINITY]);
    }

    #[test]
    fn test_first_mismatch() {
        assert_eq!(first_mismatch(&[0, 1, 2], &[0, 1, 2]), None);
        assert_eq!(first_mismatch(&[0, 5, 2], &[0, 1, 2]), Some(1));
        assert_eq!(first_mismatch(&[0], &[0, 1]), Some(1));
    }

    #[test]
    fn test_source_out_of_range() {
        assert!(sequential_distances(&Graph::new(2), 2).is_err());
    }
}
