//! Physical node registry.
//!
//! Physical nodes exist only as names mapped to the ring keys of their
//! virtual nodes. The registry lets a whole node be removed without walking
//! the ring.

use std::collections::BTreeMap;

use crate::ring::RingKey;

/// Physical node name → ring keys of its virtual nodes, in weight-index order.
#[derive(Clone, Debug, Default)]
pub struct NodeRegistry {
    nodes: BTreeMap<String, Vec<RingKey>>,
}

impl NodeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of physical nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no physical node is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Register `name` with no vnodes yet. Returns false if already present.
    pub fn register(&mut self, name: &str) -> bool {
        if self.nodes.contains_key(name) {
            return false;
        }
        self.nodes.insert(name.to_string(), Vec::new());
        true
    }

    /// Record a vnode for `name`, registering the node if needed.
    pub fn push_vnode(&mut self, name: &str, key: RingKey) {
        if let Some(keys) = self.nodes.get_mut(name) {
            keys.push(key);
        } else {
            self.nodes.insert(name.to_string(), vec![key]);
        }
    }

    /// Ring keys of `name`'s vnodes.
    pub fn vnodes(&self, name: &str) -> Option<&[RingKey]> {
        self.nodes.get(name).map(Vec::as_slice)
    }

    /// Unregister `name`, returning its vnode keys.
    pub fn remove(&mut self, name: &str) -> Option<Vec<RingKey>> {
        self.nodes.remove(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.keys().map(String::as_str)
    }

    /// `(name, vnode keys)` pairs in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RingKey])> + '_ {
        self.nodes.iter().map(|(n, k)| (n.as_str(), k.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::Angle;

    fn key(raw: u64, seq: u64) -> RingKey {
        RingKey::new(Angle::from_raw(raw), seq)
    }

    #[test]
    fn test_register_and_push() {
        let mut registry = NodeRegistry::new();
        assert!(registry.register("node-1"));
        assert!(!registry.register("node-1"));
        registry.push_vnode("node-1", key(10, 0));
        registry.push_vnode("node-2", key(20, 1));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.vnodes("node-1"), Some(&[key(10, 0)][..]));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["node-1", "node-2"]);
    }

    #[test]
    fn test_remove() {
        let mut registry = NodeRegistry::new();
        registry.push_vnode("a", key(1, 0));
        registry.push_vnode("a", key(2, 1));
        assert_eq!(registry.remove("a"), Some(vec![key(1, 0), key(2, 1)]));
        assert!(registry.remove("a").is_none());
        assert!(registry.is_empty());
        assert!(!registry.contains("a"));
    }
}
