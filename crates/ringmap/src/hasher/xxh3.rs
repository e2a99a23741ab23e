//! xxh3 key hasher (default).

use std::hash::{Hash, Hasher};

use xxhash_rust::xxh3::Xxh3;

use super::{fold_digest, KeyHasher};

/// Hashes keys through their [`Hash`] impl with xxh3.
///
/// Unlike `std`'s `RandomState`, the output is stable across processes, so
/// a given key always lands on the same angle.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3KeyHasher;

impl<K: Hash + ?Sized> KeyHasher<K> for Xxh3KeyHasher {
    fn hash_key(&self, key: &K) -> i32 {
        let mut hasher = Xxh3::new();
        key.hash(&mut hasher);
        fold_digest(hasher.finish())
    }
}
