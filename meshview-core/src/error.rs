//! Error types for mesh loading

use crate::geometry::VertexId;
use thiserror::Error;

/// Failure modes of the mesh text format. Parsing is all-or-nothing: any of
/// these aborts the load and leaves the previously active mesh untouched.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("header must be `N,M`, got {0:?}")]
    MalformedHeader(String),

    #[error("line {line}: vertex record must be `id,x,y,z`")]
    MalformedVertexLine { line: usize },

    #[error("line {line}: face record must be `v1,v2,v3`")]
    MalformedFaceLine { line: usize },

    #[error("line {line}: cannot parse number from {field:?}")]
    BadNumber { line: usize, field: String },

    #[error("duplicate vertex id {0}")]
    DuplicateVertex(VertexId),

    #[error("face references unknown vertex id {0}")]
    UnknownVertex(VertexId),

    #[error("file ended after {got} of {want} expected records")]
    TruncatedFile { want: usize, got: usize },
}

/// Result type alias for mesh loading
pub type Result<T> = std::result::Result<T, ParseError>;
