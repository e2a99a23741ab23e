//! Hash ring data structure.
//!
//! Holds `BTreeMap<RingKey, VirtualNode>` and the ownership lookup.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included, Unbounded};

use crate::angle::Angle;
use crate::ring::RingKey;
use crate::vnode::VirtualNode;

/// Ordered index of virtual nodes, the sole authority on key ownership.
///
/// An angle is owned by the vnode with the smallest angle strictly greater
/// than it; past the last vnode, ownership wraps to the first. An angle equal
/// to a vnode's angle therefore belongs to that vnode's successor.
#[derive(Debug, Clone)]
pub struct Ring<K, V> {
    vnodes: BTreeMap<RingKey, VirtualNode<K, V>>,
    next_seq: u64,
}

impl<K, V> Default for Ring<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Ring<K, V> {
    /// Create an empty ring.
    pub fn new() -> Self {
        Self {
            vnodes: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Number of virtual nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.vnodes.len()
    }

    /// True if the ring has no virtual nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vnodes.is_empty()
    }

    /// Allocate the key for the next vnode placed at `angle`.
    pub fn next_key(&mut self, angle: Angle) -> RingKey {
        let key = RingKey::new(angle, self.next_seq);
        self.next_seq += 1;
        key
    }

    /// True if some vnode sits exactly at `angle`.
    pub fn contains_angle(&self, angle: Angle) -> bool {
        let lo = RingKey::new(angle, 0);
        let hi = RingKey::probe(angle);
        self.vnodes.range((Included(lo), Included(hi))).next().is_some()
    }

    /// Key of the globally first vnode.
    pub fn first_key(&self) -> Option<RingKey> {
        self.vnodes.keys().next().copied()
    }

    /// Key of the globally last vnode.
    pub fn last_key(&self) -> Option<RingKey> {
        self.vnodes.keys().next_back().copied()
    }

    /// The globally first vnode.
    pub fn first(&self) -> Option<&VirtualNode<K, V>> {
        self.vnodes.values().next()
    }

    /// The globally last vnode.
    pub fn last(&self) -> Option<&VirtualNode<K, V>> {
        self.vnodes.values().next_back()
    }

    /// First key strictly after `key`, wrapping to the first vnode.
    ///
    /// `key` itself need not be on the ring. Returns `None` only if the ring
    /// is empty.
    pub fn successor_key(&self, key: &RingKey) -> Option<RingKey> {
        self.vnodes
            .range((Excluded(*key), Unbounded))
            .next()
            .map(|(k, _)| *k)
            .or_else(|| self.first_key())
    }

    /// Key of the vnode owning `angle`.
    pub fn owner_key(&self, angle: Angle) -> Option<RingKey> {
        self.successor_key(&RingKey::probe(angle))
    }

    /// The vnode owning `angle`.
    pub fn owner(&self, angle: Angle) -> Option<&VirtualNode<K, V>> {
        let key = self.owner_key(angle)?;
        self.vnodes.get(&key)
    }

    /// The vnode owning `angle`, mutably.
    pub fn owner_mut(&mut self, angle: Angle) -> Option<&mut VirtualNode<K, V>> {
        let key = self.owner_key(angle)?;
        self.vnodes.get_mut(&key)
    }

    /// Vnode at `key`.
    pub fn get(&self, key: &RingKey) -> Option<&VirtualNode<K, V>> {
        self.vnodes.get(key)
    }

    /// Vnode at `key`, mutably.
    pub fn get_mut(&mut self, key: &RingKey) -> Option<&mut VirtualNode<K, V>> {
        self.vnodes.get_mut(key)
    }

    /// Insert a vnode at its key, returning any vnode it replaced.
    pub fn insert(&mut self, vnode: VirtualNode<K, V>) -> Option<VirtualNode<K, V>> {
        self.vnodes.insert(vnode.key(), vnode)
    }

    /// Remove the vnode at `key`.
    pub fn remove(&mut self, key: &RingKey) -> Option<VirtualNode<K, V>> {
        self.vnodes.remove(key)
    }

    /// Vnodes in ring order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &VirtualNode<K, V>> + '_ {
        self.vnodes.values()
    }

    /// Vnodes in ring order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut VirtualNode<K, V>> + '_ {
        self.vnodes.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_at(raws: &[u64]) -> Ring<String, u32> {
        let mut ring = Ring::new();
        for (i, &raw) in raws.iter().enumerate() {
            let key = ring.next_key(Angle::from_raw(raw));
            ring.insert(VirtualNode::new(key, "n", i));
        }
        ring
    }

    fn owner_raw(ring: &Ring<String, u32>, raw: u64) -> u64 {
        ring.owner(Angle::from_raw(raw)).unwrap().angle().raw()
    }

    #[test]
    fn test_empty_ring_lookup() {
        let ring: Ring<String, u32> = Ring::new();
        assert!(ring.owner(Angle::ZERO).is_none());
        assert!(ring.first_key().is_none());
        assert!(ring.is_empty());
    }

    #[test]
    fn test_owner_is_strict_successor() {
        let ring = ring_at(&[100, 200, 300]);
        assert_eq!(owner_raw(&ring, 150), 200);
        assert_eq!(owner_raw(&ring, 99), 100);
        // exact tie goes to the successor
        assert_eq!(owner_raw(&ring, 200), 300);
    }

    #[test]
    fn test_owner_wraps_to_first() {
        let ring = ring_at(&[100, 200, 300]);
        assert_eq!(owner_raw(&ring, 300), 100);
        assert_eq!(owner_raw(&ring, 301), 100);
        assert_eq!(owner_raw(&ring, 0), 100);
    }

    #[test]
    fn test_single_vnode_owns_everything() {
        let ring = ring_at(&[500]);
        for raw in [0, 499, 500, 501, crate::angle::TURN - 1] {
            assert_eq!(owner_raw(&ring, raw), 500);
        }
    }

    #[test]
    fn test_tied_angles_ordered_by_creation() {
        let ring = ring_at(&[100, 100, 200]);
        assert_eq!(ring.len(), 3);
        assert!(ring.contains_angle(Angle::from_raw(100)));
        assert!(!ring.contains_angle(Angle::from_raw(101)));
        // the earlier vnode at 100 owns the arc below it
        assert_eq!(ring.owner(Angle::from_raw(50)).unwrap().key().seq(), 0);
        let first = ring.first_key().unwrap();
        assert_eq!(ring.successor_key(&first).unwrap().seq(), 1);
    }

    #[test]
    fn test_first_last_and_remove() {
        let mut ring = ring_at(&[100, 200, 300]);
        assert_eq!(ring.first().unwrap().angle().raw(), 100);
        assert_eq!(ring.last().unwrap().angle().raw(), 300);
        let last = ring.last_key().unwrap();
        assert!(ring.remove(&last).is_some());
        assert_eq!(owner_raw(&ring, 250), 100);
        assert_eq!(ring.iter().count(), 2);
    }
}
