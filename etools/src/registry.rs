//! Keyed object storage over a compile-time key set.

use super::{Key, Mph, Slot};
use core::fmt;

/// A closed set of object kinds, each identified by a key.
///
/// Implement this on an enum with one variant per kind. [`index`](Self::index) routes keys to
/// dense indices and [`construct`](Self::construct) is the single place objects are created.
///
/// ```rust
/// use etools::{Mph, Registry, Variants};
///
/// #[derive(Debug, PartialEq)]
/// enum Peripheral {
///     Uart { baud: u32 },
///     Spi { baud: u32 },
/// }
///
/// impl Variants for Peripheral {
///     type Key = u16;
///     type Args = u32;
///
///     fn index() -> &'static Mph<u16> {
///         etools::mph!(u16; 0x4000, 0x4400)
///     }
///
///     fn key(&self) -> u16 {
///         match self {
///             Self::Uart { .. } => 0x4000,
///             Self::Spi { .. } => 0x4400,
///         }
///     }
///
///     fn construct(key: u16, baud: u32) -> Self {
///         match key {
///             0x4000 => Self::Uart { baud },
///             _ => Self::Spi { baud },
///         }
///     }
/// }
///
/// let mut registry = Registry::<Peripheral, 2>::new();
/// registry.construct(0x4400, 1_000_000);
/// assert_eq!(registry.get(0x4400), Some(&Peripheral::Spi { baud: 1_000_000 }));
/// assert_eq!(registry.get(0x4000), None);
/// assert!(registry.construct(0x1234, 0).is_none());
/// ```
pub trait Variants: Sized {
    /// The key type.
    type Key: Key;

    /// Arguments passed to [`construct`](Self::construct).
    type Args;

    /// The table mapping every supported key to a dense index, usually built with
    /// [`mph!`](crate::mph!).
    fn index() -> &'static Mph<Self::Key>;

    /// The key of this object.
    fn key(&self) -> Self::Key;

    /// Create the object for a key.
    ///
    /// Only called with keys present in [`index`](Self::index). The result must report the same
    /// key from [`key`](Self::key).
    fn construct(key: Self::Key, args: Self::Args) -> Self;
}

/// One [`Slot`] per key of `E`, in dense index order.
///
/// `N` must equal the number of keys in [`E::index`](Variants::index). Dropping the registry drops
/// every constructed object, last slot first.
pub struct Registry<E, const N: usize> {
    /// Indexed by the dense index of the key.
    slots: [Slot<E>; N],
}

impl<E: Variants, const N: usize> Registry<E, N> {
    /// Create a registry with every slot empty.
    ///
    /// # Panics
    ///
    /// Panics if `N` differs from the number of keys.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        assert_eq!(
            E::index().len(),
            N,
            "registry capacity must match the number of keys",
        );
        Self {
            slots: core::array::from_fn(|_| Slot::new()),
        }
    }

    /// The slot of a key, or `None` for unknown keys.
    fn slot(&self, key: E::Key) -> Option<&Slot<E>> {
        self.slots.get(E::index().lookup(key))
    }

    /// The slot of a key, or `None` for unknown keys.
    fn slot_mut(&mut self, key: E::Key) -> Option<&mut Slot<E>> {
        self.slots.get_mut(E::index().lookup(key))
    }

    /// Create the object for a key unless it already exists.
    ///
    /// Returns `None` if the key is unknown. If the object is already constructed, it is returned
    /// as is and `args` are dropped. Use [`emplace`](Self::emplace) to replace it.
    #[inline]
    pub fn construct(&mut self, key: E::Key, args: E::Args) -> Option<&mut E> {
        let slot = self.slot_mut(key)?;
        let value = slot.get_or_construct_with(|| E::construct(key, args));
        debug_assert_eq!(value.key(), key, "constructed object reports a different key");
        Some(value)
    }

    /// Create the object for a key, dropping the existing one, if any.
    ///
    /// Returns `None` if the key is unknown.
    #[inline]
    pub fn emplace(&mut self, key: E::Key, args: E::Args) -> Option<&mut E> {
        let slot = self.slot_mut(key)?;
        // The old object goes away before the new one is created.
        slot.destroy();
        let value = slot.construct(E::construct(key, args));
        debug_assert_eq!(value.key(), key, "constructed object reports a different key");
        Some(value)
    }

    /// Store an already created object under its own key, dropping the existing one, if any.
    ///
    /// # Errors
    ///
    /// Gives the object back if its key is unknown.
    #[inline]
    pub fn insert(&mut self, value: E) -> Result<&mut E, E> {
        match self.slot_mut(value.key()) {
            Some(slot) => Ok(slot.emplace(value)),
            None => Err(value),
        }
    }

    /// The object for a key, if constructed.
    #[inline]
    #[must_use]
    pub fn get(&self, key: E::Key) -> Option<&E> {
        self.slot(key)?.get()
    }

    /// Mutable access to the object for a key, if constructed.
    #[inline]
    pub fn get_mut(&mut self, key: E::Key) -> Option<&mut E> {
        self.slot_mut(key)?.get_mut()
    }

    /// Check whether the object for a key is constructed.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: E::Key) -> bool {
        self.get(key).is_some()
    }

    /// Drop the object for a key. Does nothing for unknown keys and empty slots.
    #[inline]
    pub fn destroy(&mut self, key: E::Key) {
        if let Some(slot) = self.slot_mut(key) {
            slot.destroy();
        }
    }

    /// Move the object for a key out of the registry.
    #[inline]
    pub fn take(&mut self, key: E::Key) -> Option<E> {
        self.slot_mut(key)?.take()
    }
}

impl<E, const N: usize> Registry<E, N> {
    /// Drop every object, last slot first.
    #[inline]
    pub fn clear(&mut self) {
        self.slots.iter_mut().rev().for_each(Slot::destroy);
    }

    /// Iterate over constructed objects in dense index order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.slots.iter().filter_map(Slot::get)
    }

    /// Iterate mutably over constructed objects in dense index order.
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.slots.iter_mut().filter_map(Slot::get_mut)
    }

    /// Number of constructed objects.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_constructed()).count()
    }

    /// Number of keys.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Check whether no object is constructed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| !slot.is_constructed())
    }
}

impl<E: Variants, const N: usize> Default for Registry<E, N> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<E, const N: usize> Drop for Registry<E, N> {
    #[inline]
    fn drop(&mut self) {
        self.clear();
    }
}

impl<E: fmt::Debug, const N: usize> fmt::Debug for Registry<E, N> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
