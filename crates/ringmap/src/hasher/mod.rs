//! Key hashing for ring placement.
//!
//! A key hasher turns an arbitrary key into the signed 32-bit hash that the
//! [`AngleMapper`](crate::mapper::AngleMapper) folds onto the ring.

pub mod sip;
pub mod traits;
pub mod xxh3;

pub use sip::SipKeyHasher;
pub use traits::KeyHasher;
pub use xxh3::Xxh3KeyHasher;

/// Fold a 64-bit digest into a signed 32-bit hash, mixing both halves.
#[inline]
pub(crate) fn fold_digest(digest: u64) -> i32 {
    ((digest >> 32) ^ digest) as u32 as i32
}
