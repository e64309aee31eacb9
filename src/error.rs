//! Error types for rippl.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while extracting or converting a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The element report for a dimension holds zero, several, or an
    /// unrecognized element type.
    #[error("unsupported topology in dimension {dim}: element type codes {codes:?}")]
    UnsupportedTopology {
        /// The spatial dimension that was queried.
        dim: u8,
        /// Every element type code found in the report.
        codes: Vec<i32>,
    },

    /// No cell type is known for this number of nodes per element.
    #[error("unsupported cell type with {nodes_per_element} nodes per element")]
    UnsupportedCellType {
        /// The offending node count.
        nodes_per_element: usize,
    },

    /// A node tag list cannot be split into whole elements.
    #[error("malformed element data: {len} node tags with {nodes_per_element} nodes per element")]
    MalformedElementData {
        /// Length of the node tag list.
        len: usize,
        /// Expected nodes per element.
        nodes_per_element: usize,
    },

    /// An element report has a different number of node tag lists than
    /// element type codes.
    #[error("element report has {codes} type codes but {tag_lists} node tag lists")]
    MismatchedElementReport {
        /// Number of type codes.
        codes: usize,
        /// Number of node tag lists.
        tag_lists: usize,
    },

    /// The node report is internally inconsistent.
    #[error("malformed node data: {reason}")]
    MalformedNodeData {
        /// What is inconsistent.
        reason: String,
    },

    /// Node tags do not form the contiguous range `1..=num_nodes`.
    #[error("node tag {tag} breaks the contiguous tag range 1..={num_nodes}")]
    NonContiguousNodeTags {
        /// The offending tag.
        tag: u64,
        /// Number of nodes in the report.
        num_nodes: usize,
    },

    /// An element references a node index outside the node array.
    #[error("element {element} references invalid node index {index} (mesh has {num_nodes} nodes)")]
    InvalidNodeIndex {
        /// The element index.
        element: usize,
        /// The invalid node index.
        index: usize,
        /// Number of nodes in the mesh.
        num_nodes: usize,
    },

    /// An element references a node tag that is not a 1-based tag.
    #[error("element {element} references node tag {tag}, tags start at 1")]
    InvalidNodeTag {
        /// The element index.
        element: usize,
        /// The offending tag.
        tag: u64,
    },

    /// An element row does not have the mesh's node count.
    #[error("element {element} has {found} nodes, expected {expected}")]
    ElementShapeMismatch {
        /// The element index.
        element: usize,
        /// The mesh's nodes per element.
        expected: usize,
        /// The row length found.
        found: usize,
    },

    /// A count-prefixed connectivity buffer could not be decoded.
    #[error("malformed connectivity at position {position}: {reason}")]
    MalformedConnectivity {
        /// Offset into the buffer.
        position: usize,
        /// What went wrong.
        reason: &'static str,
    },

    /// A kernel report was requested outside an active session.
    #[error("meshing kernel has no active session")]
    SessionInactive,

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML serialization error.
    #[error("XML error: {0}")]
    Xml(String),

    /// Syntax error in a mesh file.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Error message.
        message: String,
    },

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Whether this error reports unusable kernel output rather than an
    /// environment problem (I/O, configuration).
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            MeshError::UnsupportedTopology { .. }
                | MeshError::UnsupportedCellType { .. }
                | MeshError::MalformedElementData { .. }
                | MeshError::MismatchedElementReport { .. }
                | MeshError::MalformedNodeData { .. }
                | MeshError::NonContiguousNodeTags { .. }
                | MeshError::InvalidNodeIndex { .. }
                | MeshError::InvalidNodeTag { .. }
                | MeshError::ElementShapeMismatch { .. }
                | MeshError::MalformedConnectivity { .. }
        )
    }
}
