//! Per-vnode key storage.
//!
//! A bucket indexes its entries by key angle, so the data a new vnode takes
//! over from its successor is a contiguous angle range and can be split off
//! without scanning the rest of the bucket. Keys that share an angle (hash
//! collisions) sit side by side in a small vector.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::mem;

use crate::angle::Angle;

#[derive(Debug, Clone)]
struct Slot<K, V> {
    key: K,
    value: V,
}

/// Key → (angle, value) mapping owned by one virtual node.
#[derive(Debug, Clone)]
pub struct Bucket<K, V> {
    slots: BTreeMap<Angle, Vec<Slot<K, V>>>,
    len: usize,
}

impl<K, V> Default for Bucket<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Bucket<K, V> {
    /// Create an empty bucket.
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
            len: 0,
        }
    }

    fn from_slots(slots: BTreeMap<Angle, Vec<Slot<K, V>>>) -> Self {
        let len = slots.values().map(Vec::len).sum();
        Self { slots, len }
    }

    /// Number of keys held.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the bucket holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.len = 0;
    }

    /// Iterate `(angle, key, value)` in angle order.
    pub fn iter(&self) -> impl Iterator<Item = (Angle, &K, &V)> + '_ {
        self.slots
            .iter()
            .flat_map(|(angle, slots)| slots.iter().map(move |s| (*angle, &s.key, &s.value)))
    }

    /// Smallest key angle held, if any.
    pub fn first_angle(&self) -> Option<Angle> {
        self.slots.keys().next().copied()
    }

    /// Largest key angle held, if any.
    pub fn last_angle(&self) -> Option<Angle> {
        self.slots.keys().next_back().copied()
    }

    /// Remove and return every entry with angle `< angle`.
    pub fn split_below(&mut self, angle: Angle) -> Self {
        let upper = self.slots.split_off(&angle);
        let lower = Self::from_slots(mem::replace(&mut self.slots, upper));
        self.len -= lower.len;
        lower
    }

    /// Remove and return every entry with angle `>= angle`.
    pub fn split_from(&mut self, angle: Angle) -> Self {
        let upper = Self::from_slots(self.slots.split_off(&angle));
        self.len -= upper.len;
        upper
    }

    /// Remove and return every entry with angle in `[start, end)`.
    pub fn split_range(&mut self, start: Angle, end: Angle) -> Self {
        let mut middle = self.slots.split_off(&start);
        let mut rest = middle.split_off(&end);
        self.slots.append(&mut rest);
        let middle = Self::from_slots(middle);
        self.len -= middle.len;
        middle
    }

    /// Move every entry of `other` into this bucket.
    pub fn absorb(&mut self, other: Self) {
        self.len += other.len;
        for (angle, mut slots) in other.slots {
            self.slots.entry(angle).or_default().append(&mut slots);
        }
    }
}

impl<K: Eq, V> Bucket<K, V> {
    /// Insert or overwrite `key` at `angle`, returning the previous value.
    pub fn insert(&mut self, angle: Angle, key: K, value: V) -> Option<V> {
        let slots = self.slots.entry(angle).or_default();
        if let Some(slot) = slots.iter_mut().find(|s| s.key == key) {
            return Some(mem::replace(&mut slot.value, value));
        }
        slots.push(Slot { key, value });
        self.len += 1;
        None
    }

    /// Value stored for `key`, which must hash to `angle`.
    pub fn get<Q>(&self, angle: Angle, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.slots
            .get(&angle)?
            .iter()
            .find(|s| s.key.borrow() == key)
            .map(|s| &s.value)
    }

    /// True if `key` is stored at `angle`.
    pub fn contains_key<Q>(&self, angle: Angle, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.get(angle, key).is_some()
    }

    /// Remove `key` from `angle`, returning its value.
    pub fn remove<Q>(&mut self, angle: Angle, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let slots = self.slots.get_mut(&angle)?;
        let index = slots.iter().position(|s| s.key.borrow() == key)?;
        let slot = slots.swap_remove(index);
        if slots.is_empty() {
            self.slots.remove(&angle);
        }
        self.len -= 1;
        Some(slot.value)
    }
}
