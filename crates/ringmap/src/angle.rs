//! Fixed-point angles on the ring.
//!
//! Positions are stored as integers in `[0, TURN)` where `TURN` is one full
//! revolution (360°). Integer positions give the ring a strict total order
//! that floating-point degrees cannot guarantee; degrees are only derived for
//! reporting.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// One full turn of the ring in fixed-point units (2^53).
pub const TURN: u64 = 1 << 53;

/// A position on the ring.
///
/// # Invariants
///
/// - The inner value is always `< TURN`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Angle(u64);

impl Angle {
    /// Angle 0°, the start of the ring.
    pub const ZERO: Angle = Angle(0);

    /// Largest representable angle, just below 360°.
    pub const MAX: Angle = Angle(TURN - 1);

    /// Build an angle from a raw fixed-point position, wrapping full turns.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Angle(raw % TURN)
    }

    /// Angle covering `num / den` of a full turn, rounded down.
    ///
    /// `num == den` is a full turn and wraps to zero.
    ///
    /// # Panics
    /// Panics if `den` is zero.
    pub fn from_fraction(num: u64, den: u64) -> Self {
        let scaled = (num as u128 * TURN as u128) / den as u128;
        Angle((scaled % TURN as u128) as u64)
    }

    /// Raw fixed-point position.
    #[inline]
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Position in degrees, in `[0, 360)`.
    #[inline]
    pub fn degrees(&self) -> f64 {
        self.0 as f64 / TURN as f64 * 360.0
    }

    /// True if this is angle 0.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Clockwise distance from `self` to `other`.
    ///
    /// The distance from an angle to itself is zero, not a full turn.
    pub fn distance_to(&self, other: &Self) -> u64 {
        if other.0 >= self.0 {
            other.0 - self.0
        } else {
            TURN - self.0 + other.0
        }
    }

    /// Raw bounds of slice `index` when the ring is cut into `count` equal
    /// slices.
    ///
    /// Slices are half-open and tile `[0, TURN)` exactly; the last slice ends
    /// at `TURN`.
    ///
    /// # Panics
    /// Panics if `count` is zero.
    pub fn slice(index: usize, count: usize) -> Range<u64> {
        let bound = |i: usize| ((i as u128 * TURN as u128) / count as u128) as u64;
        bound(index)..bound(index + 1)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}°", self.degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees() {
        assert_eq!(Angle::ZERO.degrees(), 0.0);
        assert_eq!(Angle::from_raw(TURN / 2).degrees(), 180.0);
        assert_eq!(Angle::from_raw(TURN / 4).degrees(), 90.0);
        assert!(Angle::MAX.degrees() < 360.0);
    }

    #[test]
    fn test_from_raw_wraps() {
        assert_eq!(Angle::from_raw(TURN), Angle::ZERO);
        assert_eq!(Angle::from_raw(TURN + 5), Angle::from_raw(5));
    }

    #[test]
    fn test_from_fraction() {
        assert_eq!(Angle::from_fraction(0, 7), Angle::ZERO);
        assert_eq!(Angle::from_fraction(1, 2).raw(), TURN / 2);
        // a full turn is the same point as zero
        assert_eq!(Angle::from_fraction(9, 9), Angle::ZERO);
    }

    #[test]
    fn test_distance_wraps() {
        let a = Angle::from_raw(100);
        let b = Angle::from_raw(200);
        assert_eq!(a.distance_to(&b), 100);
        assert_eq!(b.distance_to(&a), TURN - 100);
        assert_eq!(a.distance_to(&a), 0);
    }

    #[test]
    fn test_slices_tile_the_ring() {
        for count in [1usize, 3, 7, 500] {
            let mut expected_start = 0;
            for i in 0..count {
                let slice = Angle::slice(i, count);
                assert_eq!(slice.start, expected_start);
                assert!(slice.start < slice.end);
                expected_start = slice.end;
            }
            assert_eq!(expected_start, TURN);
        }
    }
}
