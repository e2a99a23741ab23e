//! Error types for the ring map.

use thiserror::Error;

/// Result type alias for the ring map.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or mutating a ring.
///
/// Lookups on absent keys and removal of unknown nodes are not errors; they
/// surface as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid ring configuration (weight or node count out of range)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// A physical node with this name is already on the ring
    #[error("Node already present: {0}")]
    NodeExists(String),
    /// Removing this node would leave the ring without virtual nodes
    #[error("Cannot remove {0}: it is the last node on the ring")]
    LastNode(String),
    /// Operation needs at least one virtual node
    #[error("Ring is empty")]
    EmptyRing,
    /// A structural invariant no longer holds
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}
