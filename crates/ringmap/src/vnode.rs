//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Instead of each physical node having a single position on the ring, each
//! node has `node_weight` positions (virtual nodes). This provides:
//!
//! 1. **Better Load Distribution**: More vnodes = smoother distribution of keys
//! 2. **Gradual Rebalancing**: When nodes join/leave, only the arcs next to
//!    the changed vnodes move
//!
//! Weight controls granularity only. Every key is stored exactly once, in the
//! bucket of the vnode that owns its angle.
//!
//! # Performance Characteristics
//!
//! - **Lookup**: O(log n) where n = total vnodes
//! - **Rebalancing**: a joining vnode splits one successor bucket by angle
//!   range, O(log b + moved) where b = successor bucket size

use std::fmt;

use crate::angle::Angle;
use crate::bucket::Bucket;
use crate::ring::RingKey;

/// A virtual node on the ring.
///
/// Owns the arc `(predecessor.angle, self.angle]`; the first vnode on the
/// ring also owns the wraparound arc past the last vnode.
///
/// # Invariants
///
/// - `key` is unique within the ring
/// - `name` is `"<owner>-<weight index>"`
/// - every entry in `bucket` has an angle inside the vnode's arc
#[derive(Debug, Clone)]
pub struct VirtualNode<K, V> {
    key: RingKey,
    owner: String,
    name: String,
    bucket: Bucket<K, V>,
}

impl<K, V> VirtualNode<K, V> {
    /// Create an empty virtual node for `owner`'s replica `index`.
    pub fn new(key: RingKey, owner: &str, index: usize) -> Self {
        Self {
            key,
            owner: owner.to_string(),
            name: vnode_name(owner, index),
            bucket: Bucket::new(),
        }
    }

    /// Ring position and tiebreak.
    #[inline]
    pub fn key(&self) -> RingKey {
        self.key
    }

    /// Ring position.
    #[inline]
    pub fn angle(&self) -> Angle {
        self.key.angle()
    }

    /// Name of the physical node this vnode represents.
    #[inline]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Stable vnode identity, `"<owner>-<weight index>"`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of keys held.
    #[inline]
    pub fn len(&self) -> usize {
        self.bucket.len()
    }

    /// True if the vnode holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bucket.is_empty()
    }

    /// Keys held by this vnode.
    #[inline]
    pub fn bucket(&self) -> &Bucket<K, V> {
        &self.bucket
    }

    #[inline]
    pub(crate) fn bucket_mut(&mut self) -> &mut Bucket<K, V> {
        &mut self.bucket
    }

    pub(crate) fn into_bucket(self) -> Bucket<K, V> {
        self.bucket
    }
}

impl<K, V> fmt::Display for VirtualNode<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VNode(name={}, angle={}, keys={})",
            self.name,
            self.angle(),
            self.len()
        )
    }
}

/// Identity of replica `index` of physical node `owner`.
pub fn vnode_name(owner: &str, index: usize) -> String {
    format!("{}-{}", owner, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vnode_creation() {
        let key = RingKey::new(Angle::from_raw(100), 3);
        let vnode: VirtualNode<String, u32> = VirtualNode::new(key, "node-1", 7);
        assert_eq!(vnode.key(), key);
        assert_eq!(vnode.angle(), Angle::from_raw(100));
        assert_eq!(vnode.owner(), "node-1");
        assert_eq!(vnode.name(), "node-1-7");
        assert!(vnode.is_empty());
    }

    #[test]
    fn test_vnode_bucket() {
        let key = RingKey::new(Angle::from_raw(100), 0);
        let mut vnode = VirtualNode::new(key, "a", 0);
        vnode.bucket_mut().insert(Angle::from_raw(50), "k", 1);
        assert_eq!(vnode.len(), 1);
        assert_eq!(vnode.bucket().get(Angle::from_raw(50), &"k"), Some(&1));
        let bucket = vnode.into_bucket();
        assert_eq!(bucket.len(), 1);
    }

    #[test]
    fn test_vnode_display() {
        let key = RingKey::new(Angle::ZERO, 0);
        let vnode: VirtualNode<u8, u8> = VirtualNode::new(key, "a", 2);
        assert_eq!(vnode.to_string(), "VNode(name=a-2, angle=0.000000°, keys=0)");
    }
}
