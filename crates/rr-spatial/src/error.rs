//! Spatial-subsystem error type.

use thiserror::Error;

use rr_core::NodeId;

/// Errors produced by `rr-spatial` routing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
