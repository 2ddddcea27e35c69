//! Minimal perfect hashing with automatic backend selection.
//!
//! [`Llut`] costs one entry per possible key up to the largest one; [`Fks`] costs a few words per
//! key. The selector estimates both in bytes and picks LLUT unless it is strictly more expensive.
//! `alpha` approximates the FKS second-level overhead in slots per key. It is a tuning knob, not a
//! correctness contract: both backends answer identically.

use super::{bits::Width, fks::Fks, index::index_bytes, llut::Llut, Key, Lookup};

/// Default FKS slots-per-key estimate.
pub const DEFAULT_ALPHA: usize = 3;

/// The table kind behind an [`Mph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Backend {
    /// [`Llut`].
    Llut,
    /// [`Fks`].
    Fks,
}

/// Estimated LLUT size in bytes.
#[inline]
#[must_use]
#[expect(clippy::arithmetic_side_effects, reason = "cannot overflow in u128")]
pub const fn llut_cost(max_key: u64, index_bytes: usize) -> u128 {
    (max_key as u128 + 1) * index_bytes as u128
}

/// Estimated FKS size in bytes.
#[inline]
#[must_use]
#[expect(clippy::arithmetic_side_effects, reason = "cannot overflow in u128")]
pub const fn fks_cost(
    n: usize,
    index_bytes: usize,
    key_bytes: usize,
    word_bytes: usize,
    alpha: usize,
) -> u128 {
    n as u128 * (alpha as u128 * index_bytes as u128 + 2 * word_bytes as u128 + 1 + key_bytes as u128)
}

/// Size of a key in bytes on a platform with pointers of `width`.
#[inline]
#[must_use]
pub const fn key_bytes<K: Key>(width: Width) -> usize {
    if K::POINTER_SIZED {
        width.bytes()
    } else {
        (K::BITS / 8) as usize
    }
}

/// Both cost estimates for a key set, LLUT first.
///
/// Returns `None` for an empty set.
#[inline]
#[must_use]
pub fn costs<K: Key>(keys: &[K], alpha: usize, width: Width) -> Option<(u128, u128)> {
    let max_key = keys.iter().max()?.to_u64();
    let index_bytes = index_bytes(keys.len());
    Some((
        llut_cost(max_key, index_bytes),
        fks_cost(
            keys.len(),
            index_bytes,
            key_bytes::<K>(width),
            width.bytes(),
            alpha,
        ),
    ))
}

/// Pick the cheaper backend for a key set. Empty sets get [`Backend::Llut`].
#[inline]
#[must_use]
pub fn select_backend<K: Key>(keys: &[K], alpha: usize, width: Width) -> Backend {
    match costs(keys, alpha, width) {
        Some((llut, fks)) if llut > fks => Backend::Fks,
        _ => Backend::Llut,
    }
}

/// A minimal perfect hash table over whichever backend is cheaper for its keys.
///
/// Behaves exactly like the chosen [`Llut`] or [`Fks`]. The choice is visible only through
/// [`backend`](Self::backend), for diagnostics.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(all(feature = "alloc", feature = "serde"), derive(serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        transparent,
        bound(
            serialize = "K: serde::Serialize",
            deserialize = "K: Key + serde::Deserialize<'de>"
        )
    )
)]
#[derive(Debug)]
pub struct Mph<K> {
    /// The chosen table.
    inner: MphInner<K>,
}

/// The chosen table.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(all(feature = "alloc", feature = "serde"), derive(serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "K: serde::Serialize",
        deserialize = "K: Key + serde::Deserialize<'de>"
    ))
)]
#[derive(Debug)]
enum MphInner<K> {
    /// Direct lookup.
    Llut(Llut<K>),
    /// Two-level hashing.
    Fks(Fks<K>),
}

#[cfg(feature = "build")]
impl<K: Key> Mph<K> {
    /// Build a table over distinct keys with the default selector.
    ///
    /// # Errors
    ///
    /// Fails if the chosen backend fails to build.
    #[inline]
    pub fn try_from_keys(keys: &[K]) -> Result<Self, crate::BuildError> {
        Self::try_from_keys_with_alpha(keys, DEFAULT_ALPHA)
    }

    /// Build a table over distinct keys with an explicit FKS overhead estimate.
    ///
    /// # Errors
    ///
    /// Fails if the chosen backend fails to build.
    #[inline]
    pub fn try_from_keys_with_alpha(keys: &[K], alpha: usize) -> Result<Self, crate::BuildError> {
        Self::try_from_keys_for_width(keys, alpha, Width::NATIVE)
    }

    /// Build a table for a platform with pointers of `width`.
    ///
    /// # Errors
    ///
    /// Fails if the chosen backend fails to build.
    #[inline]
    pub fn try_from_keys_for_width(
        keys: &[K],
        alpha: usize,
        width: Width,
    ) -> Result<Self, crate::BuildError> {
        let backend = select_backend(keys, alpha, width);
        if let Some((llut, fks)) = costs(keys, alpha, width) {
            log::debug!(
                "selected {backend:?} for {} keys: LLUT {llut} bytes, FKS {fks} bytes",
                keys.len(),
            );
        }

        let inner = match backend {
            Backend::Llut => MphInner::Llut(Llut::try_from_keys(keys)?),
            Backend::Fks => MphInner::Fks(Fks::try_from_keys_for_width(keys, width)?),
        };
        Ok(Self { inner })
    }
}

impl<K> Mph<K> {
    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn __from_llut(llut: Llut<K>) -> Self {
        Self {
            inner: MphInner::Llut(llut),
        }
    }

    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn __from_fks(fks: Fks<K>) -> Self {
        Self {
            inner: MphInner::Fks(fks),
        }
    }

    /// The backend the selector chose.
    #[inline]
    #[must_use]
    pub const fn backend(&self) -> Backend {
        match self.inner {
            MphInner::Llut(_) => Backend::Llut,
            MphInner::Fks(_) => Backend::Fks,
        }
    }

    /// Number of keys.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.inner {
            MphInner::Llut(llut) => llut.len(),
            MphInner::Fks(fks) => fks.len(),
        }
    }

    /// Always `false`, tables cannot be empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value [`lookup`](Self::lookup) returns for non-members. Equal to [`len`](Self::len).
    #[inline]
    #[must_use]
    pub fn not_found(&self) -> usize {
        self.len()
    }
}

impl<K: Key> Mph<K> {
    /// Get the dense index of a key, or [`not_found`](Self::not_found) for non-members.
    #[inline]
    #[must_use]
    pub fn lookup(&self, key: K) -> usize {
        match &self.inner {
            MphInner::Llut(llut) => llut.lookup(key),
            MphInner::Fks(fks) => fks.lookup(key),
        }
    }

    /// Check whether a key is a member.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.lookup(key) != self.not_found()
    }
}

#[allow(clippy::same_name_method, reason = "the trait mirrors the inherent API")]
impl<K: Key> Lookup for Mph<K> {
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

#[cfg(feature = "codegen")]
impl<K: super::codegen::Codegen> super::codegen::Codegen for Mph<K> {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let mph = gen.item("Mph");
        match &self.inner {
            MphInner::Llut(llut) => {
                let llut = gen.piece(llut);
                quote::quote!(#mph::__from_llut(#llut))
            }
            MphInner::Fks(fks) => {
                let fks = gen.piece(fks);
                quote::quote!(#mph::__from_fks(#fks))
            }
        }
    }
}
