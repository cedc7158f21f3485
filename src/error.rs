//! Error types for postrender operations.

use thiserror::Error;

use crate::dom::NodeId;

/// Errors that can occur while resolving render parameters for a content tree.
///
/// Malformed attributes never produce an error; they soft-fail to absent
/// values inside [`LinkData`](crate::LinkData). The variants here signal that
/// the tree handed to us breaks a structural contract.
#[derive(Error, Debug)]
pub enum Error {
    #[error("table row containing cell {cell:?} has no cells")]
    EmptyTableRow { cell: NodeId },

    #[error("ancestor walk from {node:?} exceeded depth limit of {limit}")]
    DepthLimitExceeded { node: NodeId, limit: usize },

    #[error("node {0:?} is not part of the content tree")]
    UnknownNode(NodeId),

    #[error("content width must be a positive number, got {0}")]
    InvalidContentWidth(f32),

    #[error("invalid render option: {0}")]
    InvalidOption(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid render options: {0}")]
    Options(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a host callback.
///
/// These never escape the dispatcher: they are logged and dropped.
#[derive(Error, Debug)]
pub enum CallbackError {
    #[error("{0}")]
    Failed(String),

    #[error("callback panicked: {0}")]
    Panicked(String),
}

impl CallbackError {
    /// Convenience constructor for host implementations.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}
