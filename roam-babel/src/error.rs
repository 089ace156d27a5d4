//! Error types for graph construction, tree walks and format operations

use crate::model::{Uid, VertexType};
use crate::validation::ValidationFailure;
use thiserror::Error;

/// Errors raised while building, walking or serializing a PageDump graph.
///
/// Validation never raises: rule failures are collected as
/// [`ValidationFailure`] values. [`PublishError::Invalid`] only appears when a
/// caller asked for a validated conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PublishError {
    /// Record declares a different vertex type than the one requested
    #[error("record '{uid}' is {found}, expected {expected}")]
    Shape {
        uid: Uid,
        expected: VertexType,
        found: String,
    },
    /// Record declares a vertex type outside the known set
    #[error("unrecognized vertex-type: {0}")]
    UnknownVertexType(String),
    /// Required record field is absent
    #[error("record {} is missing required field '{field}'", .uid.as_deref().unwrap_or("<no uid>"))]
    MissingField {
        uid: Option<Uid>,
        field: &'static str,
    },
    /// Heading level outside what CommonMark can express
    #[error("heading '{uid}' has level {level}, expected 1 to {max}", max = crate::model::MAX_HEADING_LEVEL)]
    HeadingLevel { uid: Uid, level: usize },
    /// Media type outside the known set
    #[error("unrecognized media-type: {0}")]
    UnknownMediaType(String),
    /// A walk reached a vertex type it has no handler for
    #[error("no handler for {vertex_type} vertex '{uid}'")]
    TypeMismatch { uid: Uid, vertex_type: VertexType },
    /// A walk met an identifier that is not in the graph
    #[error("uid '{uid}' is not a vertex of the graph")]
    Lookup { uid: Uid },
    /// The graph has no vertex to start a walk from
    #[error("graph has no vertices")]
    EmptyGraph,
    /// A walk came back to one of its own ancestors
    #[error("children of '{uid}' loop back to an ancestor")]
    Cycle { uid: Uid },
    /// Input could not be decoded
    #[error("decode error: {0}")]
    Decode(String),
    /// Input could not be read
    #[error("io error: {0}")]
    Io(String),
    /// The graph failed validation
    #[error("graph failed validation with {} failure(s)", .0.len())]
    Invalid(Vec<ValidationFailure>),
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Format does not support the requested operation
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PublishError {
    fn from(err: serde_json::Error) -> Self {
        PublishError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for PublishError {
    fn from(err: std::io::Error) -> Self {
        PublishError::Io(err.to_string())
    }
}
