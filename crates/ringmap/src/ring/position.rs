//! Ring position implementation.

use std::cmp::Ordering;
use std::fmt;

use crate::angle::Angle;

/// Sequence value reserved for lookup probes; never given to a vnode.
const PROBE_SEQ: u64 = u64::MAX;

/// Position of a virtual node on the ring.
///
/// Ordered by angle, then by creation sequence, so two vnodes that drew the
/// same angle still have a strict order.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct RingKey {
    angle: Angle,
    seq: u64,
}

impl RingKey {
    /// Creates a key for a vnode created `seq`-th on its ring.
    pub fn new(angle: Angle, seq: u64) -> Self {
        debug_assert!(seq != PROBE_SEQ, "sequence reserved for probes");
        Self { angle, seq }
    }

    /// Lookup key for `angle`.
    ///
    /// Sorts after every vnode at the same angle, so the first vnode past a
    /// probe is the first one whose angle is strictly greater.
    pub(crate) fn probe(angle: Angle) -> Self {
        Self {
            angle,
            seq: PROBE_SEQ,
        }
    }

    /// Returns the angle.
    #[inline]
    pub fn angle(&self) -> Angle {
        self.angle
    }

    /// Returns the creation sequence number.
    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl PartialOrd for RingKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RingKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.angle
            .cmp(&other.angle)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl fmt::Debug for RingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingKey")
            .field("angle", &self.angle.raw())
            .field("seq", &self.seq)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_by_angle_then_seq() {
        let a = RingKey::new(Angle::from_raw(10), 5);
        let b = RingKey::new(Angle::from_raw(10), 6);
        let c = RingKey::new(Angle::from_raw(11), 0);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_probe_sorts_after_same_angle() {
        let vnode = RingKey::new(Angle::from_raw(10), 1_000);
        let probe = RingKey::probe(Angle::from_raw(10));
        assert!(vnode < probe);
        assert!(probe < RingKey::new(Angle::from_raw(11), 0));
    }
}
