//! Synthetic graph builders for benchmarks and tests

use super::store::{Graph, Weight};
use crate::core::errors::{DijkstraError, Result};

/// Smallest weight produced by the generators
pub const MIN_WEIGHT: Weight = 1;
/// Largest weight produced by the generators
pub const MAX_WEIGHT: Weight = 21;

/// Number of undirected pairs in a complete graph on `vertices` vertices
pub fn complete_edge_count(vertices: usize) -> usize {
    vertices * vertices.saturating_sub(1) / 2
}

/// Undirected complete graph; pair weights cycle through `MIN_WEIGHT..=MAX_WEIGHT`
/// in row-major pair order.
pub fn complete_graph(vertices: usize) -> Result<Graph> {
    let mut graph = Graph::with_capacity(vertices, 2 * complete_edge_count(vertices));
    let span = MAX_WEIGHT - MIN_WEIGHT + 1;
    let mut pair = 0u64;
    for a in 0..vertices {
        for b in (a + 1)..vertices {
            let weight = MIN_WEIGHT + (pair % u64::from(span)) as Weight;
            graph.add_undirected_edge(a, b, weight)?;
            pair += 1;
        }
    }
    Ok(graph)
}

/// Directed graph where each ordered pair `(a, b)`, `a != b`, gets an edge
/// with probability `density`. Weights are uniform in `[MIN_WEIGHT, MAX_WEIGHT]`.
///
/// The same `seed` always produces the same graph.
pub fn random_graph(vertices: usize, density: f64, seed: u64) -> Result<Graph> {
    if !(0.0..=1.0).contains(&density) {
        return Err(DijkstraError::configuration_field(
            format!("density {} must be within [0, 1]", density),
            "density",
        ));
    }

    let mut rng = fastrand::Rng::with_seed(seed);
    let mut graph = Graph::new(vertices);
    for a in 0..vertices {
        for b in 0..vertices {
            if a != b && rng.f64() < density {
                graph.add_edge(a, b, rng.u32(MIN_WEIGHT..=MAX_WEIGHT))?;
            }
        }
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_edge_count() {
        assert_eq!(complete_edge_count(0), 0);
        assert_eq!(complete_edge_count(1), 0);
        assert_eq!(complete_edge_count(256), 32_640);
    }

    #[test]
    fn test_complete_graph_shape() {
        let graph = complete_graph(6).unwrap();
        assert_eq!(graph.edge_count(), 2 * complete_edge_count(6));
        for v in 0..6 {
            assert_eq!(graph.out_degree(v), 5);
        }
        assert!(graph
            .iter()
            .all(|(_, e)| (MIN_WEIGHT..=MAX_WEIGHT).contains(&e.weight)));
    }

    #[test]
    fn test_complete_graph_weights_cycle() {
        // 36 pairs: one full cycle, then the start of the next.
        let graph = complete_graph(9).unwrap();
        let weights: Vec<Weight> = (0..9)
            .flat_map(|a| ((a + 1)..9).map(move |b| (a, b)))
            .map(|(a, b)| {
                graph
                    .edges(a)
                    .find(|e| e.dst == b)
                    .map(|e| e.weight)
                    .unwrap()
            })
            .collect();
        let expected: Vec<Weight> = (1..=21).chain(1..=15).collect();
        assert_eq!(weights, expected);
    }

    #[test]
    fn test_random_graph_is_seeded() {
        let a = random_graph(12, 0.3, 42).unwrap();
        let b = random_graph(12, 0.3, 42).unwrap();
        let edges_a: Vec<_> = a.iter().collect();
        let edges_b: Vec<_> = b.iter().collect();
        assert_eq!(edges_a, edges_b);
        assert!(a.iter().all(|(src, e)| src != e.dst));
    }

    #[test]
    fn test_random_graph_rejects_bad_density() {
        assert!(random_graph(4, 1.5, 0).is_err());
    }
}
