//! Graph storage, text format, and generators

pub mod generator;
pub mod loader;
pub mod store;

pub use generator::{complete_edge_count, complete_graph, random_graph, MAX_WEIGHT, MIN_WEIGHT};
pub use loader::{load_graph, parse_graph, save_graph, write_graph};
pub use store::{Edge, Edges, Graph, VertexId, Weight};
