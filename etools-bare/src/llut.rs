//! Linear lookup tables.

use super::{index::Indices, Key, Lookup};
use core::marker::PhantomData;

/// A direct-address table mapping keys to their dense indices.
///
/// The table has one entry per value in `0..=max_key`, so it is only worth using for dense key
/// sets. Lookup is a single bounds check and load. [`Mph`](crate::Mph) picks between this and
/// [`Fks`](crate::Fks) automatically.
#[cfg_attr(all(feature = "alloc", feature = "serde"), derive(serde::Deserialize))]
#[cfg_attr(
    all(feature = "alloc", feature = "serde"),
    serde(bound(deserialize = "K: Key"), try_from = "LlutInner<K>")
)]
#[derive(Debug)]
pub struct Llut<K> {
    /// The actual table.
    inner: LlutInner<K>,
}

/// The actual table, deserialized before validation.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(all(feature = "alloc", feature = "serde"), derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
#[derive(Debug)]
struct LlutInner<K> {
    /// Number of keys, also the sentinel.
    len: usize,

    /// Dense index of each key value, `len` for holes.
    table: Indices,

    /// The key type.
    #[cfg_attr(feature = "serde", serde(skip))]
    marker: PhantomData<fn(K) -> K>,
}

#[cfg(feature = "build")]
impl<K: Key> Llut<K> {
    /// Build a table over distinct keys.
    ///
    /// The dense index of a key is its position in `keys`.
    ///
    /// # Errors
    ///
    /// Fails if `keys` is empty or contains duplicates, or if the largest key is too large to
    /// address a table by.
    #[inline]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "every key is below the table size, which is a `usize`"
    )]
    pub fn try_from_keys(keys: &[K]) -> Result<Self, crate::BuildError> {
        use crate::BuildError;

        let Some(&max_key) = keys.iter().max() else {
            return Err(BuildError::Empty);
        };
        if let Some(index) = K::first_duplicate(keys) {
            return Err(BuildError::DuplicateKey { index });
        }

        let max_key = max_key.to_u64();
        let size = usize::try_from(max_key)
            .ok()
            .and_then(|max| max.checked_add(1))
            .filter(|&size| isize::try_from(size).is_ok())
            .ok_or(BuildError::TableTooLarge { max_key })?;

        let len = keys.len();
        let mut table = Indices::filled(len, size, len);
        for (index, key) in keys.iter().enumerate() {
            table.set(key.to_u64() as usize, index);
        }

        log::debug!(
            "built LLUT: {len} keys, {size} entries of {} bytes",
            table.width_bytes(),
        );

        Ok(Self {
            inner: LlutInner {
                len,
                table,
                marker: PhantomData,
            },
        })
    }
}

impl<K> Llut<K> {
    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn __from_raw_parts(len: usize, table: Indices) -> Self {
        Self {
            inner: LlutInner {
                len,
                table,
                marker: PhantomData,
            },
        }
    }

    /// Number of keys.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.inner.len
    }

    /// Always `false`, tables cannot be empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.inner.len == 0
    }

    /// The value [`lookup`](Self::lookup) returns for non-members. Equal to [`len`](Self::len).
    #[inline]
    #[must_use]
    pub const fn not_found(&self) -> usize {
        self.inner.len
    }

    /// Number of entries, i.e. the largest key plus one.
    #[inline]
    #[must_use]
    pub fn table_size(&self) -> usize {
        self.inner.table.len()
    }

    /// Width of a stored index in bytes.
    #[inline]
    #[must_use]
    pub const fn index_bytes(&self) -> usize {
        self.inner.table.width_bytes()
    }
}

impl<K: Key> Llut<K> {
    /// Get the dense index of a key, or [`not_found`](Self::not_found) for non-members.
    #[inline]
    #[must_use]
    pub fn lookup(&self, key: K) -> usize {
        usize::try_from(key.to_u64())
            .ok()
            .and_then(|key| self.inner.table.get(key))
            .unwrap_or(self.inner.len)
    }

    /// Check whether a key is a member.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.lookup(key) != self.not_found()
    }
}

#[allow(clippy::same_name_method, reason = "the trait mirrors the inherent API")]
impl<K: Key> Lookup for Llut<K> {
    type Key = K;

    #[inline]
    fn lookup(&self, key: K) -> usize {
        self.lookup(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.len()
    }
}

/// Scope for `serde`-related code.
#[cfg(feature = "serde")]
mod serde_support {
    use super::Llut;
    use serde::{Serialize, Serializer};

    // Serialized as the inner table, which is what deserialization validates.
    impl<K> Serialize for Llut<K> {
        #[inline]
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.inner.serialize(serializer)
        }
    }
}

/// Scope for `serde` validation.
#[cfg(all(feature = "alloc", feature = "serde"))]
mod serde_validation {
    use super::{Key, Llut, LlutInner};
    use displaydoc::Display;
    use thiserror::Error;

    /// Deserialization validation failures.
    #[derive(Debug, Display, Error)]
    #[non_exhaustive]
    pub enum Error {
        /// no keys
        Empty,

        /// table is longer than the key type allows
        TableTooLong,

        /// entry out of range
        IndexOutOfRange,

        /// wrong number of members
        WrongLen,

        /// an index is stored more than once
        RepeatedIndex,
    }

    impl<K: Key> TryFrom<LlutInner<K>> for Llut<K> {
        type Error = Error;

        #[inline]
        fn try_from(inner: LlutInner<K>) -> Result<Self, Error> {
            if inner.len == 0 || inner.table.is_empty() {
                return Err(Error::Empty);
            }

            let max_key = inner.table.len() - 1;
            if u64::try_from(max_key).map_or(true, |max_key| max_key > K::MAX.to_u64()) {
                return Err(Error::TableTooLong);
            }

            let mut seen = alloc::vec![false; inner.len];
            for index in inner.table.iter() {
                if index > inner.len {
                    return Err(Error::IndexOutOfRange);
                }
                if let Some(seen) = seen.get_mut(index) {
                    if core::mem::replace(seen, true) {
                        return Err(Error::RepeatedIndex);
                    }
                }
            }
            if !seen.iter().all(|&seen| seen) {
                return Err(Error::WrongLen);
            }

            Ok(Self { inner })
        }
    }
}

#[cfg(feature = "codegen")]
impl<K> super::codegen::Codegen for Llut<K> {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let llut = gen.item("Llut");
        let len = gen.piece(&self.inner.len);
        let table = gen.piece(&self.inner.table);
        quote::quote!(#llut::__from_raw_parts(#len, #table))
    }
}
