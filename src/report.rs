//! Console and JSON rendering of graphs, distances and timings

use std::fmt::Write as _;

use crate::coord::types::{Distance, INFINITY};
use crate::core::errors::Result;
use crate::graph::{Graph, VertexId};
use crate::harness::RunReport;

fn format_distance(distance: Distance) -> String {
    if distance == INFINITY {
        "inf".to_string()
    } else {
        distance.to_string()
    }
}

/// One `Vertex i: d` line per vertex, `inf` for unreachable vertices
pub fn render_distances(source: VertexId, distances: &[Distance]) -> String {
    let mut out = format!("Shortest distances from vertex {}:\n", source);
    for (vertex, &distance) in distances.iter().enumerate() {
        let _ = writeln!(out, "Vertex {}: {}", vertex, format_distance(distance));
    }
    out
}

/// Adjacency listing, edges in traversal order
pub fn render_graph(graph: &Graph) -> String {
    let mut out = String::from("Graph:\n");
    for vertex in 0..graph.vertex_count() {
        let _ = write!(out, "Vertex {}: ", vertex);
        for edge in graph.edges(vertex) {
            let _ = write!(out, "({},{}) -> ", edge.dst, edge.weight);
        }
        out.push_str("NULL\n");
    }
    out
}

/// Run header, per-repetition timings and a summary line
pub fn render_timings(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Vertices: {}  Edges: {}  Workers: {}",
        report.vertex_count, report.edge_count, report.workers
    );
    for (i, ms) in report.repetitions_ms.iter().enumerate() {
        let _ = writeln!(out, "Run {}: {:.5} ms", i + 1, ms);
    }
    if let Some(summary) = report.timing_summary() {
        let _ = writeln!(
            out,
            "min {:.5} ms  mean {:.5} ms  max {:.5} ms",
            summary.min_ms, summary.mean_ms, summary.max_ms
        );
    }
    if let Some(verified) = report.verified {
        let _ = writeln!(
            out,
            "Reference check: {}",
            if verified { "match" } else { "MISMATCH" }
        );
    }
    out
}

/// Full report as pretty JSON
pub fn render_json(report: &RunReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
