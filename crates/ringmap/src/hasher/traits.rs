//! Core key hasher trait definitions.

/// Produces the 32-bit signed hash used to place a key on the ring.
///
/// Implementations must be deterministic: the same key always hashes to the
/// same value for the lifetime of a ring, otherwise stored keys become
/// unreachable.
///
/// Any `Fn(&K) -> i32` closure is a key hasher, which is handy for pinning
/// exact hash values in tests.
pub trait KeyHasher<K: ?Sized> {
    /// Hash a key.
    fn hash_key(&self, key: &K) -> i32;
}

impl<K: ?Sized, F> KeyHasher<K> for F
where
    F: Fn(&K) -> i32,
{
    fn hash_key(&self, key: &K) -> i32 {
        self(key)
    }
}
