//! Virtual node placement.
//!
//! The ring is cut into `node_weight` equal slices and every physical node
//! gets exactly one vnode per slice, at a random angle inside that slice.
//! This keeps each node's vnodes spread over the whole circle no matter how
//! many other nodes exist.

use std::ops::Range;

use rand::{Rng, RngCore};
use tracing::warn;

use crate::angle::Angle;

/// Upper bound on vnodes per physical node.
pub const MAX_NODE_WEIGHT: usize = 1 << 20;

/// Redraws attempted when a drawn angle is already taken.
pub const MAX_REDRAWS: usize = 8;

/// Source of vnode angles.
///
/// Blanket-implemented for every [`RngCore`], so a seeded
/// `rand::rngs::StdRng` yields a reproducible layout.
pub trait AngleSource {
    /// Draw a raw position uniformly from the non-empty half-open `slice`.
    fn draw(&mut self, slice: Range<u64>) -> u64;
}

impl<R: RngCore> AngleSource for R {
    fn draw(&mut self, slice: Range<u64>) -> u64 {
        self.random_range(slice)
    }
}

/// Draw an angle for vnode `vnode` inside slice `index` of `weight`.
///
/// `is_taken` reports whether an angle is already used on the ring. Clashes
/// are redrawn up to [`MAX_REDRAWS`] times; after that the clashing angle is
/// returned and the ring orders the tie by creation sequence.
pub fn draw_angle<S, F>(source: &mut S, index: usize, weight: usize, vnode: &str, is_taken: F) -> Angle
where
    S: AngleSource + ?Sized,
    F: Fn(Angle) -> bool,
{
    let slice = Angle::slice(index, weight);
    let mut angle = Angle::from_raw(source.draw(slice.clone()));
    for _ in 0..MAX_REDRAWS {
        if !is_taken(angle) {
            return angle;
        }
        warn!(%vnode, %angle, "clash with angle, trying again");
        angle = Angle::from_raw(source.draw(slice.clone()));
    }
    if is_taken(angle) {
        warn!(%vnode, %angle, "keeping clashing angle, tie ordered by creation");
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Replays fixed positions.
    struct Scripted(Vec<u64>);

    impl AngleSource for Scripted {
        fn draw(&mut self, slice: Range<u64>) -> u64 {
            let next = self.0.remove(0);
            assert!(slice.contains(&next));
            next
        }
    }

    #[test]
    fn test_draw_stays_in_slice() {
        let mut rng = StdRng::seed_from_u64(7);
        for index in 0..10 {
            let slice = Angle::slice(index, 10);
            let angle = draw_angle(&mut rng, index, 10, "n-0", |_| false);
            assert!(slice.contains(&angle.raw()));
        }
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for index in 0..5 {
            assert_eq!(
                draw_angle(&mut a, index, 5, "n", |_| false),
                draw_angle(&mut b, index, 5, "n", |_| false)
            );
        }
    }

    #[test]
    fn test_clash_is_redrawn() {
        let mut source = Scripted(vec![10, 10, 11]);
        let taken = Angle::from_raw(10);
        let angle = draw_angle(&mut source, 0, 4, "n-0", |a| a == taken);
        assert_eq!(angle, Angle::from_raw(11));
    }

    #[test]
    fn test_clash_kept_after_redraws() {
        let mut source = Scripted(vec![5; MAX_REDRAWS + 1]);
        let angle = draw_angle(&mut source, 0, 2, "n-0", |_| true);
        assert_eq!(angle, Angle::from_raw(5));
        assert!(source.0.is_empty());
    }
}
