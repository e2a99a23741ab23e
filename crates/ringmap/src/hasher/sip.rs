//! SipHash-1-3 key hasher.

use std::hash::{Hash, Hasher};

use siphasher::sip::SipHasher13;

use super::{fold_digest, KeyHasher};

/// Hashes keys with keyed SipHash-1-3.
///
/// Useful when keys come from untrusted input and an adversary should not be
/// able to aim them at one vnode.
#[derive(Clone, Copy, Debug, Default)]
pub struct SipKeyHasher {
    k0: u64,
    k1: u64,
}

impl SipKeyHasher {
    /// Create a hasher with the given SipHash keys.
    pub fn new(k0: u64, k1: u64) -> Self {
        Self { k0, k1 }
    }
}

impl<K: Hash + ?Sized> KeyHasher<K> for SipKeyHasher {
    fn hash_key(&self, key: &K) -> i32 {
        let mut hasher = SipHasher13::new_with_keys(self.k0, self.k1);
        key.hash(&mut hasher);
        fold_digest(hasher.finish())
    }
}
