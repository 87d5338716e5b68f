//! Error types for the property tree.

use thiserror::Error;

use crate::PropertyId;

/// Errors that can occur when mutating a property tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// The id does not refer to a live node.
    #[error("property not found: {0:?}")]
    NotFound(PropertyId),

    /// Attaching would make a node its own ancestor.
    #[error("attaching {node:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// Node being moved.
        node: PropertyId,
        /// Requested parent.
        parent: PropertyId,
    },

    /// The node is not a child of the given parent.
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Expected parent.
        parent: PropertyId,
        /// Node that was not found under it.
        child: PropertyId,
    },

    /// A UI write targeted a read-only node.
    #[error("property {0:?} is read-only")]
    ReadOnly(PropertyId),

    /// A write carried a value of the wrong kind for the node.
    #[error("property {id:?} expects a {expected} value")]
    TypeMismatch {
        /// Node that was written.
        id: PropertyId,
        /// Kind of value the node accepts.
        expected: &'static str,
    },
}

/// Result type for property tree operations.
pub type Result<T> = std::result::Result<T, PropertyError>;
