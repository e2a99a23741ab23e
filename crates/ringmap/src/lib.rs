//! Consistent-hashing keyspace partitioner.
//!
//! This crate provides a key-value map whose entries are spread over
//! physical nodes through a ring of virtual nodes:
//! - Fixed-point ring angles and the hash-to-angle mapping
//! - Pluggable key hashers and vnode angle sources
//! - Interleaved vnode placement, one vnode per slice per node
//! - Node addition and removal with minimal key migration
//! - Topology checks and distribution statistics

pub mod angle;
pub mod bucket;
pub mod builder;
pub mod config;
pub mod error;
pub mod hasher;
pub mod map;
pub mod mapper;
pub mod node;
pub mod placement;
pub mod ring;
pub mod stats;
pub mod topology;
pub mod vnode;

pub use angle::{Angle, TURN};
pub use builder::RingMapBuilder;
pub use config::RingConfig;
pub use error::{Error, Result};
pub use hasher::{KeyHasher, SipKeyHasher, Xxh3KeyHasher};
pub use map::{Rebalance, RingMap};
pub use mapper::AngleMapper;
pub use node::NodeRegistry;
pub use placement::AngleSource;
pub use ring::{Ring, RingKey};
pub use stats::{relative_std_dev, NodeStats, RingStats};
pub use topology::OwnedArc;
pub use vnode::VirtualNode;
