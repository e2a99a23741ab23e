//! Mapping from key hashes to ring angles.
//!
//! A signed 32-bit hash is folded into an unsigned window
//! `[0, HASH_WINDOW]` and scaled onto the circle:
//!
//! ```text
//! h == i32::MIN  ->  u = HASH_WINDOW          (top of the window)
//! h <  0         ->  u = i32::MAX + |h|
//! h >= 0         ->  u = h
//! angle = (u / HASH_WINDOW) * 360°
//! ```
//!
//! The fold is monotone and deterministic, not a uniform remap. The top of
//! the window is a full turn, i.e. the same point as 0°, so it is reported
//! as 0° to keep every angle in `[0, 360)`.

use crate::angle::Angle;
use crate::hasher::KeyHasher;

/// Width of the folded hash window: `2 * i32::MAX + 1`.
pub const HASH_WINDOW: u64 = i32::MAX as u64 + i32::MAX as u64 + 1;

/// Converts key hashes to ring positions.
#[derive(Clone, Copy, Debug, Default)]
pub struct AngleMapper;

impl AngleMapper {
    /// Fold a signed hash into `[0, HASH_WINDOW]`.
    #[inline]
    pub fn fold(hash: i32) -> u64 {
        if hash == i32::MIN {
            HASH_WINDOW
        } else if hash < 0 {
            i32::MAX as u64 + hash.unsigned_abs() as u64
        } else {
            hash as u64
        }
    }

    /// Fixed-point ring position of a hash.
    #[inline]
    pub fn angle_of_hash(hash: i32) -> Angle {
        Angle::from_fraction(Self::fold(hash), HASH_WINDOW)
    }

    /// Position of a hash in degrees, `(u / HASH_WINDOW) * 360` in `f64`.
    pub fn degrees_of_hash(hash: i32) -> f64 {
        let degrees = (Self::fold(hash) as f64 / HASH_WINDOW as f64) * 360.0;
        if degrees >= 360.0 {
            0.0
        } else {
            degrees
        }
    }

    /// Ring position of a key under the given hasher.
    #[inline]
    pub fn angle_of<K, H>(hasher: &H, key: &K) -> Angle
    where
        K: ?Sized,
        H: KeyHasher<K> + ?Sized,
    {
        Self::angle_of_hash(hasher.hash_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::TURN;

    #[test]
    fn test_window_is_u32_range() {
        assert_eq!(HASH_WINDOW, u32::MAX as u64);
    }

    #[test]
    fn test_fold() {
        assert_eq!(AngleMapper::fold(0), 0);
        assert_eq!(AngleMapper::fold(i32::MAX), i32::MAX as u64);
        assert_eq!(AngleMapper::fold(-1), i32::MAX as u64 + 1);
        assert_eq!(AngleMapper::fold(-i32::MAX), HASH_WINDOW - 1);
        assert_eq!(AngleMapper::fold(i32::MIN), HASH_WINDOW);
    }

    #[test]
    fn test_degrees_of_hash() {
        assert_eq!(AngleMapper::degrees_of_hash(0), 0.0);
        let half = AngleMapper::degrees_of_hash(-1);
        assert!((half - 180.0).abs() < 1e-6, "got {half}");
        assert!(AngleMapper::degrees_of_hash(-i32::MAX) < 360.0);
        assert_eq!(AngleMapper::degrees_of_hash(i32::MIN), 0.0);
    }

    #[test]
    fn test_angle_matches_degrees() {
        for hash in [0, 1, 12345, i32::MAX, -1, -98765, -i32::MAX, i32::MIN] {
            let fixed = AngleMapper::angle_of_hash(hash).degrees();
            let float = AngleMapper::degrees_of_hash(hash);
            assert!((fixed - float).abs() < 1e-6, "hash {hash}: {fixed} vs {float}");
        }
    }

    #[test]
    fn test_angle_is_monotone_in_fold() {
        let hashes = [0, 1, 2, i32::MAX - 1, i32::MAX, -1, -2, -i32::MAX];
        let mut folded: Vec<(u64, Angle)> = hashes
            .iter()
            .map(|&h| (AngleMapper::fold(h), AngleMapper::angle_of_hash(h)))
            .collect();
        folded.sort();
        for pair in folded.windows(2) {
            assert!(pair[0].1 < pair[1].1);
        }
        assert!(AngleMapper::angle_of_hash(-i32::MAX).raw() < TURN);
    }

    #[test]
    fn test_angle_of_key() {
        let hasher = |_: &str| -1;
        // 2^31 / (2^32 - 1) of a turn lands just past the half-way point
        assert_eq!(AngleMapper::angle_of(&hasher, "anything").raw(), TURN / 2 + (1 << 20));
    }
}
