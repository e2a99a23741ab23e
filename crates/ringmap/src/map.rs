//! The ring map facade.
//!
//! [`RingMap`] combines the ring, the node registry, the angle mapper and a
//! key hasher into a map whose keys are sharded over virtual nodes. Adding or
//! removing a physical node only touches the buckets next to its vnodes.

use std::borrow::Borrow;
use std::fmt;

use tracing::{debug, info};

use crate::angle::Angle;
use crate::builder::RingMapBuilder;
use crate::config::RingConfig;
use crate::error::{Error, Result};
use crate::hasher::{KeyHasher, Xxh3KeyHasher};
use crate::mapper::AngleMapper;
use crate::node::NodeRegistry;
use crate::placement::{self, AngleSource};
use crate::ring::Ring;
use crate::vnode::{vnode_name, VirtualNode};

/// Outcome of a membership change.
///
/// Purely diagnostic; nothing in the ring reads it back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rebalance {
    /// Physical nodes added or removed.
    pub nodes: Vec<String>,
    /// Virtual nodes created or deleted.
    pub vnodes: usize,
    /// Keys handed from one bucket to another. On addition a key carved
    /// twice in the same call (first by one new vnode, then by a later one)
    /// counts twice.
    pub moved: usize,
    /// Live keys at the time of the change.
    pub total: usize,
}

impl Rebalance {
    /// Share of live keys that moved, in `[0, 1]`.
    pub fn moved_fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.moved as f64 / self.total as f64
        }
    }
}

/// A map sharded over a consistent hash ring with virtual nodes.
///
/// Single-owner: every mutation takes `&mut self`. Callers that need shared
/// access wrap the whole map in one lock.
///
/// # Example
///
/// ```rust
/// use ringmap::RingMap;
///
/// let mut map = RingMap::new(3, 16).unwrap();
/// map.put("user:1".to_string(), 10).unwrap();
/// map.add_node("cache-7").unwrap();
/// assert_eq!(map.get("user:1"), Some(&10));
/// ```
pub struct RingMap<K, V, H = Xxh3KeyHasher> {
    pub(crate) ring: Ring<K, V>,
    pub(crate) registry: NodeRegistry,
    pub(crate) node_weight: usize,
    pub(crate) hasher: H,
    pub(crate) source: Box<dyn AngleSource + Send>,
    pub(crate) len: usize,
    next_auto: usize,
}

impl<K: Eq, V> RingMap<K, V, Xxh3KeyHasher> {
    /// Build a ring with `initial_nodes` auto-named physical nodes of
    /// `node_weight` vnodes each, placed with OS randomness.
    pub fn new(initial_nodes: usize, node_weight: usize) -> Result<Self> {
        RingMapBuilder::new()
            .with_initial_nodes(initial_nodes)
            .with_node_weight(node_weight)
            .build()
    }

    /// Build a ring from a validated configuration.
    pub fn from_config(config: &RingConfig) -> Result<Self> {
        config.validate()?;
        RingMapBuilder::from_config(config).build()
    }
}

impl<K: Eq, V, H> RingMap<K, V, H> {
    /// Assemble a ring and place the initial nodes. Called by the builder
    /// once the configuration has been validated.
    pub(crate) fn assemble(
        names: Vec<String>,
        auto_nodes: usize,
        node_weight: usize,
        hasher: H,
        source: Box<dyn AngleSource + Send>,
    ) -> Result<Self> {
        let mut map = Self {
            ring: Ring::new(),
            registry: NodeRegistry::new(),
            node_weight,
            hasher,
            source,
            len: 0,
            next_auto: 0,
        };
        for name in names {
            if map.registry.contains(&name) {
                return Err(Error::NodeExists(name));
            }
            map.place_node(&name);
        }
        for _ in 0..auto_nodes {
            let name = map.next_auto_name();
            map.place_node(&name);
        }
        if map.ring.is_empty() {
            return Err(Error::InvalidConfig(
                "ring needs at least one node".to_string(),
            ));
        }
        info!(
            nodes = map.registry.len(),
            node_weight,
            vnodes = map.ring.len(),
            "built ring"
        );
        Ok(map)
    }

    /// Add `count` auto-named physical nodes (`node-<i>`).
    pub fn add_nodes(&mut self, count: usize) -> Result<Rebalance> {
        let names: Vec<String> = (0..count).map(|_| self.next_auto_name()).collect();
        Ok(self.add_named(names))
    }

    /// Add one physical node called `name`.
    ///
    /// Fails with [`Error::NodeExists`] if the name is already on the ring.
    pub fn add_node(&mut self, name: &str) -> Result<Rebalance> {
        if self.registry.contains(name) {
            return Err(Error::NodeExists(name.to_string()));
        }
        Ok(self.add_named(vec![name.to_string()]))
    }

    fn add_named(&mut self, names: Vec<String>) -> Rebalance {
        let mut moved = 0;
        for name in &names {
            moved += self.place_node(name);
        }
        let report = Rebalance {
            vnodes: names.len() * self.node_weight,
            nodes: names,
            moved,
            total: self.len,
        };
        info!(
            nodes = ?report.nodes,
            moved,
            "moved around {:.4}% of keys",
            report.moved_fraction() * 100.0
        );
        report
    }

    /// Remove physical node `name`, handing each of its vnodes' keys to the
    /// vnode's successor.
    ///
    /// Returns `Ok(None)` if the name is unknown. Fails with
    /// [`Error::LastNode`] rather than emptying the ring.
    pub fn remove_node(&mut self, name: &str) -> Result<Option<Rebalance>> {
        if !self.registry.contains(name) {
            return Ok(None);
        }
        if self.registry.len() == 1 {
            return Err(Error::LastNode(name.to_string()));
        }
        let keys = self.registry.remove(name).unwrap_or_default();
        let moved: usize = keys
            .iter()
            .filter_map(|k| self.ring.get(k))
            .map(VirtualNode::len)
            .sum();
        for key in &keys {
            let Some(successor) = self.ring.successor_key(key).filter(|s| s != key) else {
                continue;
            };
            let Some(vnode) = self.ring.remove(key) else {
                continue;
            };
            let bucket = vnode.into_bucket();
            if let Some(target) = self.ring.get_mut(&successor) {
                target.bucket_mut().absorb(bucket);
            }
        }
        let report = Rebalance {
            nodes: vec![name.to_string()],
            vnodes: keys.len(),
            moved,
            total: self.len,
        };
        info!(
            node = name,
            moved,
            "removed node, moved {:.4}% of keys",
            report.moved_fraction() * 100.0
        );
        Ok(Some(report))
    }

    /// Place every vnode of a new physical node, carving each one's arc out
    /// of its successor. Returns the number of keys moved.
    fn place_node(&mut self, name: &str) -> usize {
        self.registry.register(name);
        let mut moved = 0;
        for index in 0..self.node_weight {
            let ring = &self.ring;
            let angle = placement::draw_angle(
                self.source.as_mut(),
                index,
                self.node_weight,
                &vnode_name(name, index),
                |a| ring.contains_angle(a),
            );
            let key = self.ring.next_key(angle);
            let mut vnode = VirtualNode::new(key, name, index);
            moved += self.carve(&mut vnode);
            self.ring.insert(vnode);
            self.registry.push_vnode(name, key);
        }
        debug!(node = name, vnodes = self.node_weight, moved, "placed node");
        moved
    }

    /// Move into `vnode` (not yet on the ring) the keys its successor holds
    /// that `vnode` will own once inserted.
    fn carve(&mut self, vnode: &mut VirtualNode<K, V>) -> usize {
        let key = vnode.key();
        let Some(successor) = self.ring.successor_key(&key) else {
            return 0;
        };
        let is_first = self.ring.first_key() == Some(successor);
        let Some(target) = self.ring.get_mut(&successor) else {
            return 0;
        };
        let bucket = target.bucket_mut();
        let taken = if key < successor {
            let mut taken = bucket.split_below(key.angle());
            if is_first {
                // the new vnode becomes first and takes the wraparound arc
                taken.absorb(bucket.split_from(successor.angle()));
            }
            taken
        } else {
            // placed after the last vnode; the first vnode keeps its low arc
            bucket.split_range(successor.angle(), key.angle())
        };
        let moved = taken.len();
        vnode.bucket_mut().absorb(taken);
        moved
    }

    fn next_auto_name(&mut self) -> String {
        loop {
            let name = format!("node-{}", self.next_auto);
            self.next_auto += 1;
            if !self.registry.contains(&name) {
                return name;
            }
        }
    }

    /// Insert or overwrite `key`, returning the previous value.
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>>
    where
        H: KeyHasher<K>,
    {
        let angle = AngleMapper::angle_of(&self.hasher, &key);
        let vnode = self.ring.owner_mut(angle).ok_or(Error::EmptyRing)?;
        let previous = vnode.bucket_mut().insert(angle, key, value);
        if previous.is_none() {
            self.len += 1;
        }
        Ok(previous)
    }

    /// Insert every pair, returning how many keys were new.
    pub fn put_all<I>(&mut self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        H: KeyHasher<K>,
    {
        let before = self.len;
        for (key, value) in entries {
            self.put(key, value)?;
        }
        Ok(self.len - before)
    }

    /// Value stored for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: KeyHasher<Q>,
    {
        let angle = self.angle_of(key);
        self.ring.owner(angle)?.bucket().get(angle, key)
    }

    /// True if `key` is stored.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: KeyHasher<Q>,
    {
        self.get(key).is_some()
    }

    /// Remove `key`, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: KeyHasher<Q>,
    {
        let angle = self.angle_of(key);
        let removed = self.ring.owner_mut(angle)?.bucket_mut().remove(angle, key);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Empty every bucket. The ring layout is unchanged.
    pub fn clear(&mut self) {
        for vnode in self.ring.iter_mut() {
            vnode.bucket_mut().clear();
        }
        self.len = 0;
    }

    /// Ring position of `key`.
    pub fn angle_of<Q>(&self, key: &Q) -> Angle
    where
        Q: ?Sized,
        H: KeyHasher<Q>,
    {
        AngleMapper::angle_of(&self.hasher, key)
    }

    /// Physical node that owns `key`'s angle, whether or not `key` is stored.
    pub fn owner_of<Q>(&self, key: &Q) -> Option<&str>
    where
        Q: ?Sized,
        H: KeyHasher<Q>,
    {
        self.ring.owner(self.angle_of(key)).map(VirtualNode::owner)
    }
}

impl<K, V, H> RingMap<K, V, H> {
    /// Number of distinct live keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no key is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Vnodes per physical node.
    #[inline]
    pub fn node_weight(&self) -> usize {
        self.node_weight
    }

    /// Number of physical nodes.
    pub fn node_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of virtual nodes.
    pub fn vnode_count(&self) -> usize {
        self.ring.len()
    }

    /// Physical node names in sorted order.
    pub fn node_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.registry.names()
    }

    /// Virtual nodes in ring order.
    pub fn vnodes(&self) -> impl DoubleEndedIterator<Item = &VirtualNode<K, V>> + '_ {
        self.ring.iter()
    }

    /// Virtual nodes of physical node `name`, in weight-index order.
    pub fn vnodes_of(&self, name: &str) -> Option<Vec<&VirtualNode<K, V>>> {
        let keys = self.registry.vnodes(name)?;
        Some(keys.iter().filter_map(|k| self.ring.get(k)).collect())
    }

    /// The vnode with the smallest angle.
    pub fn first_vnode(&self) -> Option<&VirtualNode<K, V>> {
        self.ring.first()
    }

    /// The vnode with the largest angle.
    pub fn last_vnode(&self) -> Option<&VirtualNode<K, V>> {
        self.ring.last()
    }

    /// Stored `(key, value)` pairs, walking the ring in order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.ring
            .iter()
            .flat_map(|vnode| vnode.bucket().iter().map(|(_, k, v)| (k, v)))
    }

    /// Stored keys in ring order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Stored values in ring order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }
}

impl<K, V, H> fmt::Debug for RingMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingMap")
            .field("nodes", &self.registry.len())
            .field("node_weight", &self.node_weight)
            .field("vnodes", &self.ring.len())
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}
