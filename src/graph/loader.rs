//! Flat text format for graphs
//!
//! The first token is the vertex count; it is followed by whitespace
//! separated `src dst weight` triples, one directed edge each. Reading stops
//! at the first incomplete or non-numeric triple.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use super::store::{Graph, VertexId, Weight};
use crate::core::errors::{DijkstraError, Result};

/// Parse a graph from text, rejecting vertex counts above `max_vertices`
pub fn parse_graph(text: &str, max_vertices: usize) -> Result<Graph> {
    let mut tokens = text
        .lines()
        .enumerate()
        .flat_map(|(line, content)| content.split_whitespace().map(move |tok| (line + 1, tok)));

    let (header_line, header) = tokens
        .next()
        .ok_or_else(|| DijkstraError::missing_graph("graph text is empty"))?;
    let vertex_count: usize = header.parse().map_err(|_| {
        DijkstraError::parse(header_line, format!("invalid vertex count '{}'", header))
    })?;
    if vertex_count == 0 {
        return Err(DijkstraError::missing_graph("vertex count is zero"));
    }
    if vertex_count > max_vertices {
        return Err(DijkstraError::configuration_field(
            format!(
                "vertex count {} exceeds capacity {}",
                vertex_count, max_vertices
            ),
            "max_vertices",
        ));
    }

    let mut graph = Graph::try_new(vertex_count)?;
    while let Some((line, src)) = tokens.next() {
        let triple = (
            src.parse::<VertexId>(),
            tokens.next().map(|(_, t)| t.parse::<VertexId>()),
            tokens.next().map(|(_, t)| t.parse::<Weight>()),
        );
        match triple {
            (Ok(src), Some(Ok(dst)), Some(Ok(weight))) => {
                graph.add_edge(src, dst, weight).map_err(|err| {
                    DijkstraError::parse(line, format!("edge {} -> {}: {}", src, dst, err))
                })?;
            }
            _ => {
                warn!(line, "stopping at malformed edge triple");
                break;
            }
        }
    }

    debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "parsed graph"
    );
    Ok(graph)
}

/// Load a graph from a file in the flat text format
pub fn load_graph(path: impl AsRef<Path>, max_vertices: usize) -> Result<Graph> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|err| DijkstraError::io(format!("read {}", path.display()), err))?;
    let graph = parse_graph(&text, max_vertices)?;
    info!(
        path = %path.display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );
    Ok(graph)
}

/// Write a graph in the flat text format, edges in adjacency order
pub fn write_graph<W: Write>(graph: &Graph, mut out: W) -> Result<()> {
    writeln!(out, "{}", graph.vertex_count())?;
    for (src, edge) in graph.iter() {
        writeln!(out, "{} {} {}", src, edge.dst, edge.weight)?;
    }
    out.flush()?;
    Ok(())
}

/// Save a graph to a file in the flat text format
pub fn save_graph(graph: &Graph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|err| DijkstraError::io(format!("create {}", path.display()), err))?;
    write_graph(graph, BufWriter::new(file))?;
    info!(path = %path.display(), edges = graph.edge_count(), "graph saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;

    const SAMPLE: &str = "4\n0 1 4\n0 2 1\n2 1 2\n1 3 1\n2 3 5\n";

    #[test]
    fn test_parse_sample() {
        let graph = parse_graph(SAMPLE, 16).unwrap();
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 5);
        let from_zero: Vec<_> = graph.edges(0).collect();
        assert_eq!(
            from_zero,
            vec![Edge { dst: 2, weight: 1 }, Edge { dst: 1, weight: 4 }]
        );
    }

    #[test]
    fn test_trailing_garbage_stops_parsing() {
        let graph = parse_graph("3\n0 1 2\n1 2\nfoo", 16).unwrap();
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_malformed_header() {
        assert!(matches!(
            parse_graph("four\n0 1 1", 16),
            Err(DijkstraError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_graph("", 16),
            Err(DijkstraError::MissingGraph { .. })
        ));
        assert!(matches!(
            parse_graph("0", 16),
            Err(DijkstraError::MissingGraph { .. })
        ));
    }

    #[test]
    fn test_capacity_checked() {
        assert!(matches!(
            parse_graph("32\n", 16),
            Err(DijkstraError::Configuration { .. })
        ));
    }

    #[test]
    fn test_huge_header_fails_without_panic() {
        let err = parse_graph("18446744073709551615\n0 1 1\n", usize::MAX).unwrap_err();
        assert!(matches!(err, DijkstraError::Configuration { .. }));
        assert!(err.is_precondition());
    }

    #[test]
    fn test_out_of_range_edge_reports_line() {
        assert!(matches!(
            parse_graph("2\n0 1 1\n0 9 1\n", 16),
            Err(DijkstraError::Parse { line: 3, .. })
        ));
    }

    #[test]
    fn test_write_then_parse_is_stable() {
        let graph = parse_graph(SAMPLE, 16).unwrap();
        let mut first = Vec::new();
        write_graph(&graph, &mut first).unwrap();

        let reloaded = parse_graph(std::str::from_utf8(&first).unwrap(), 16).unwrap();
        let mut second = Vec::new();
        write_graph(&reloaded, &mut second).unwrap();
        let rereloaded = parse_graph(std::str::from_utf8(&second).unwrap(), 16).unwrap();
        let mut third = Vec::new();
        write_graph(&rereloaded, &mut third).unwrap();

        assert_eq!(reloaded.edge_count(), graph.edge_count());
        assert_eq!(first.len(), second.len());
        assert_eq!(first, third);
    }
}
