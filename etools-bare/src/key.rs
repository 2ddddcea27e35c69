//! Integer key types.

use core::fmt::Debug;
use core::hash::Hash;

/// Sealing, so that only the unsigned primitive integers implement [`Key`].
mod sealed {
    /// Implemented for keys only.
    pub trait Sealed {}
}

/// An unsigned integer that can be used as a table key.
///
/// Keys are widened to `u64` for hashing, which is lossless for every implementor.
pub trait Key: sealed::Sealed + Copy + Ord + Hash + Debug + Send + Sync + 'static {
    /// Width in bits.
    const BITS: u32;

    /// The largest key.
    const MAX: Self;

    /// Whether the key is as wide as a pointer, i.e. changes size across platforms.
    const POINTER_SIZED: bool;

    /// Widen the key.
    fn to_u64(self) -> u64;

    /// Narrow a `u64` to a key, or return `None` if it doesn't fit.
    fn from_u64(value: u64) -> Option<Self>;

    /// Find the first key that repeats an earlier one, returning its position.
    ///
    /// The fastest checker for the key width is used: a bitmap for 8 and 16 bits, open addressing
    /// otherwise.
    #[cfg(feature = "alloc")]
    fn first_duplicate(keys: &[Self]) -> Option<usize>;

    /// Check that keys are pairwise distinct.
    #[cfg(feature = "alloc")]
    #[inline]
    fn all_distinct(keys: &[Self]) -> bool {
        Self::first_duplicate(keys).is_none()
    }
}

/// Implement [`Key`] for primitives.
macro_rules! key {
    ($($ty:ident => $pointer_sized:literal, |$keys:ident| $duplicate:expr;)*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Key for $ty {
                const BITS: u32 = $ty::BITS;
                const MAX: Self = $ty::MAX;
                const POINTER_SIZED: bool = $pointer_sized;

                #[inline]
                #[allow(
                    clippy::cast_lossless,
                    clippy::cast_possible_truncation,
                    reason = "keys are at most 64 bits wide"
                )]
                fn to_u64(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn from_u64(value: u64) -> Option<Self> {
                    Self::try_from(value).ok()
                }

                #[cfg(feature = "alloc")]
                #[inline]
                fn first_duplicate($keys: &[Self]) -> Option<usize> {
                    $duplicate
                }
            }
        )*
    };
}

key! {
    u8 => false, |keys| crate::distinct::bitmap_u8(keys);
    u16 => false, |keys| crate::distinct::bitmap_u16(keys);
    u32 => false, |keys| crate::distinct::probe_u32(
        keys,
        &mut alloc::vec![None; crate::distinct::probe_capacity(keys.len())],
    );
    u64 => false, |keys| crate::distinct::probe_u64(
        keys,
        &mut alloc::vec![None; crate::distinct::probe_capacity(keys.len())],
    );
    usize => true, |keys| crate::distinct::probe_usize(
        keys,
        &mut alloc::vec![None; crate::distinct::probe_capacity(keys.len())],
    );
}
