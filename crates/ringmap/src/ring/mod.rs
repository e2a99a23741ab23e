//! Consistent hash ring implementation.
//!
//! The ring keeps virtual nodes ordered by angle and answers "which vnode
//! owns this angle" with a successor search that wraps past the end.

pub mod position;
pub mod ring;

pub use position::RingKey;
pub use ring::Ring;
