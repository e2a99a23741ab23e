//! Ring topology views.
//!
//! Arc listings for reporting, and a full structural check of a ring map.

use crate::angle::{Angle, TURN};
use crate::error::{Error, Result};
use crate::map::RingMap;

/// The arc `(start, end]` owned by one virtual node.
///
/// For the first vnode `start` is the last vnode's angle, so the arc wraps
/// through 0°.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedArc {
    /// Vnode name, `"<owner>-<weight index>"`.
    pub vnode: String,
    /// Physical node name.
    pub owner: String,
    /// Exclusive start: the predecessor's angle.
    pub start: Angle,
    /// Inclusive end: the vnode's own angle.
    pub end: Angle,
    /// Keys held.
    pub keys: usize,
    width: u64,
}

impl OwnedArc {
    /// Arc length in fixed-point units. A lone vnode owns the full turn; a
    /// vnode tied with its predecessor owns nothing.
    pub fn width(&self) -> u64 {
        self.width
    }

    /// Arc length in degrees.
    pub fn degrees(&self) -> f64 {
        self.width() as f64 / TURN as f64 * 360.0
    }
}

fn violation(msg: String) -> Error {
    Error::InvariantViolation(msg)
}

impl<K, V, H> RingMap<K, V, H> {
    /// Arcs of every vnode, in ring order.
    pub fn arcs(&self) -> Vec<OwnedArc> {
        let Some(last) = self.ring.last() else {
            return Vec::new();
        };
        let lone = self.ring.len() == 1;
        let mut start = last.angle();
        self.ring
            .iter()
            .map(|vnode| {
                let arc = OwnedArc {
                    vnode: vnode.name().to_string(),
                    owner: vnode.owner().to_string(),
                    start,
                    end: vnode.angle(),
                    keys: vnode.len(),
                    width: if lone {
                        TURN
                    } else {
                        start.distance_to(&vnode.angle())
                    },
                };
                start = vnode.angle();
                arc
            })
            .collect()
    }

    /// Check every structural invariant of the ring.
    ///
    /// - the ring holds at least one vnode, so every angle has an owner
    /// - every stored key is held by the vnode that owns its angle
    /// - bucket sizes sum to `len()`
    /// - every physical node has exactly `node_weight` vnodes on the ring,
    ///   and no vnode is unaccounted for
    pub fn verify(&self) -> Result<()> {
        if self.ring.is_empty() {
            return Err(violation("ring has no virtual nodes".to_string()));
        }

        let mut total = 0;
        for vnode in self.ring.iter() {
            let mut held = 0;
            for (angle, _, _) in vnode.bucket().iter() {
                let owner = self.ring.owner_key(angle);
                if owner != Some(vnode.key()) {
                    return Err(violation(format!(
                        "key at {} held by {} but owned by {:?}",
                        angle,
                        vnode.name(),
                        owner.and_then(|k| self.ring.get(&k)).map(|v| v.name())
                    )));
                }
                held += 1;
            }
            if held != vnode.len() {
                return Err(violation(format!(
                    "{} counts {} keys but holds {}",
                    vnode.name(),
                    vnode.len(),
                    held
                )));
            }
            total += held;
        }
        if total != self.len {
            return Err(violation(format!(
                "buckets hold {} keys, map counts {}",
                total, self.len
            )));
        }

        let mut registered = 0;
        for (name, keys) in self.registry.iter() {
            if keys.len() != self.node_weight {
                return Err(violation(format!(
                    "{} has {} vnodes, weight is {}",
                    name,
                    keys.len(),
                    self.node_weight
                )));
            }
            for key in keys {
                match self.ring.get(key) {
                    Some(vnode) if vnode.owner() == name => {}
                    _ => {
                        return Err(violation(format!(
                            "{} lists vnode {:?} missing from the ring",
                            name, key
                        )))
                    }
                }
            }
            registered += keys.len();
        }
        if registered != self.ring.len() {
            return Err(violation(format!(
                "ring has {} vnodes, registry accounts for {}",
                self.ring.len(),
                registered
            )));
        }
        Ok(())
    }
}
