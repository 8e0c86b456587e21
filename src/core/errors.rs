use thiserror::Error;

use crate::graph::VertexId;

/// Unified error type for the shortest-path library
#[derive(Debug, Error)]
pub enum DijkstraError {
    /// No usable graph was handed to the core
    #[error("No graph available: {reason}")]
    MissingGraph { reason: String },

    /// An edge endpoint or lookup referenced a vertex outside `[0, V)`
    #[error("Vertex {vertex} out of range (vertex count: {vertex_count})")]
    VertexOutOfRange {
        vertex: VertexId,
        vertex_count: usize,
    },

    /// The requested source vertex is outside `[0, V)`
    #[error("Source vertex {source_vertex} out of range (vertex count: {vertex_count})")]
    SourceOutOfRange {
        source_vertex: VertexId,
        vertex_count: usize,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// Graph text could not be parsed
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// IO errors
    #[error("IO operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization errors
    #[error("Serialization failed: {format}")]
    Serialization {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A collective operation could not complete
    #[error("Collective {operation} failed: {message}")]
    Collective { operation: String, message: String },

    /// Workers disagree on a value every worker must share
    #[error("Workers diverged on {operation}: local {local}, min {min}, max {max}")]
    Divergence {
        operation: String,
        local: u64,
        min: u64,
        max: u64,
    },

    /// A worker task ended abnormally
    #[error("Worker {rank} failed: {message}")]
    Worker { rank: usize, message: String },
}

impl DijkstraError {
    /// Create a missing-graph error
    pub fn missing_graph<S: Into<String>>(reason: S) -> Self {
        Self::MissingGraph {
            reason: reason.into(),
        }
    }

    /// Create a vertex range error
    pub fn vertex_out_of_range(vertex: VertexId, vertex_count: usize) -> Self {
        Self::VertexOutOfRange {
            vertex,
            vertex_count,
        }
    }

    /// Create a source range error
    pub fn source_out_of_range(source_vertex: VertexId, vertex_count: usize) -> Self {
        Self::SourceOutOfRange {
            source_vertex,
            vertex_count,
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            field: None,
        }
    }

    /// Create a configuration error naming the offending field
    pub fn configuration_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Configuration {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a parse error
    pub fn parse<S: Into<String>>(line: usize, message: S) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io<S: Into<String>>(operation: S, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        format: S,
        source: E,
    ) -> Self {
        Self::Serialization {
            format: format.into(),
            source: Box::new(source),
        }
    }

    /// Create a collective error
    pub fn collective<S: Into<String>, M: Into<String>>(operation: S, message: M) -> Self {
        Self::Collective {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a divergence error
    pub fn divergence<S: Into<String>>(operation: S, local: u64, min: u64, max: u64) -> Self {
        Self::Divergence {
            operation: operation.into(),
            local,
            min,
            max,
        }
    }

    /// Create a worker error
    pub fn worker<M: Into<String>>(rank: usize, message: M) -> Self {
        Self::Worker {
            rank,
            message: message.into(),
        }
    }

    /// True for failures raised before the round loop issues any collective call
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingGraph { .. }
                | Self::VertexOutOfRange { .. }
                | Self::SourceOutOfRange { .. }
                | Self::Configuration { .. }
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingGraph { .. } => "missing_graph",
            Self::VertexOutOfRange { .. } => "vertex_range",
            Self::SourceOutOfRange { .. } => "source_range",
            Self::Configuration { .. } => "configuration",
            Self::Parse { .. } => "parse",
            Self::Io { .. } => "io",
            Self::Serialization { .. } => "serialization",
            Self::Collective { .. } => "collective",
            Self::Divergence { .. } => "divergence",
            Self::Worker { .. } => "worker",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DijkstraError>;

impl From<std::io::Error> for DijkstraError {
    fn from(err: std::io::Error) -> Self {
        Self::io("io_operation", err)
    }
}

impl From<serde_json::Error> for DijkstraError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization("json", err)
    }
}

impl From<serde_yaml::Error> for DijkstraError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::serialization("yaml", err)
    }
}
