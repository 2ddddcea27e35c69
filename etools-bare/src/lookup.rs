//! The common interface of all tables.

use super::Key;

/// A static map from a fixed key set to dense indices `0..len()`.
///
/// Every table is built from an ordered list of distinct keys and maps the key at position `i` to
/// `i`. Keys outside the set map to the sentinel [`not_found`](Self::not_found), which equals
/// [`len`](Self::len), so the result can index a `len() + 1`-long array with a fallback element at
/// the end.
pub trait Lookup {
    /// The key type.
    type Key: Key;

    /// Get the dense index of a key, or [`not_found`](Self::not_found) for non-members.
    fn lookup(&self, key: Self::Key) -> usize;

    /// Number of keys.
    fn len(&self) -> usize;

    /// The sentinel for non-members.
    #[inline]
    fn not_found(&self) -> usize {
        self.len()
    }

    /// Always `false`, tables cannot be empty.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether a key is a member.
    #[inline]
    fn contains(&self, key: Self::Key) -> bool {
        self.lookup(key) != self.not_found()
    }
}

impl<T: Lookup + ?Sized> Lookup for &T {
    type Key = T::Key;

    #[inline]
    fn lookup(&self, key: Self::Key) -> usize {
        (**self).lookup(key)
    }

    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }
}
