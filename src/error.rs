use crate::validate::Violation;
use thiserror::Error;

/// Errors raised by a rejected graph mutation. A rejected mutation leaves the graph untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("An edge with id '{edge_id}' already exists; delete it before connecting again")]
    DuplicateEdge { edge_id: String },

    #[error(
        "Handle '{handle}' of node '{source_node_id}' is already connected by edge '{existing_edge_id}'"
    )]
    HandleOccupied {
        source_node_id: String,
        handle: String,
        existing_edge_id: String,
    },

    #[error("Node '{node_id}' not found, which is required as the {role} of a connection")]
    NodeNotFound { node_id: String, role: EndpointRole },

    #[error("A node with id '{0}' already exists")]
    DuplicateNode(String),
}

/// Which end of a connection referenced a missing node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    Source,
    Target,
}

impl std::fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointRole::Source => write!(f, "source"),
            EndpointRole::Target => write!(f, "target"),
        }
    }
}

/// Errors that can occur when converting an external format into a `Workflow`.
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    #[error("Failed to parse workflow JSON: {0}")]
    Json(String),

    #[error("Node '{node_id}' has an unknown node type: '{type_name}'")]
    UnknownNodeType { node_id: String, type_name: String },

    #[error("Node '{node_id}' has an invalid payload: {message}")]
    InvalidPayload { node_id: String, message: String },

    #[error("Unsupported export document version '{0}'")]
    UnsupportedVersion(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors that can occur while producing an export document.
#[derive(Error, Debug, Clone)]
pub enum ExportError {
    #[error("Export blocked by {} guardrail violation(s)", .0.len())]
    Blocked(Vec<Violation>),

    #[error("Failed to serialize export document: {0}")]
    Serialization(String),
}
