//! Compile-time distinctness checks.
//!
//! Every checker returns the position of the first key that repeats an earlier one, or `None` if
//! all keys are distinct. They are `const`, so a duplicate in a constant key list can be turned into
//! a compilation error with [`assert_distinct!`](crate::assert_distinct).
//!
//! 8- and 16-bit keys are checked with a bitmap covering the whole key space. Wider keys use linear
//! probing into a caller-provided scratch table, since `const fn`s cannot allocate.

use crate::bits::{ceil_pow2, mix_native};

/// Check 8-bit keys with a 256-bit bitmap.
#[inline]
#[must_use]
pub const fn bitmap_u8(keys: &[u8]) -> Option<usize> {
    let mut bitmap = [0u64; 4];
    let mut i = 0;
    while i < keys.len() {
        let key = keys[i] as usize;
        let bit = 1 << (key % 64);
        if bitmap[key / 64] & bit != 0 {
            return Some(i);
        }
        bitmap[key / 64] |= bit;
        i += 1;
    }
    None
}

/// Check 16-bit keys with a 65536-bit bitmap.
#[inline]
#[must_use]
pub const fn bitmap_u16(keys: &[u16]) -> Option<usize> {
    let mut bitmap = [0u64; 1024];
    let mut i = 0;
    while i < keys.len() {
        let key = keys[i] as usize;
        let bit = 1 << (key % 64);
        if bitmap[key / 64] & bit != 0 {
            return Some(i);
        }
        bitmap[key / 64] |= bit;
        i += 1;
    }
    None
}

/// Scratch capacity for probing `n` keys: the smallest power of two that is at least `2n`.
#[inline]
#[must_use]
pub const fn probe_capacity(n: usize) -> usize {
    ceil_pow2(n.saturating_mul(2))
}

/// Generate open-addressing checkers for wide keys.
macro_rules! probe {
    ($($ty:ident => $name:ident;)*) => {
        $(
            #[doc = concat!("Check `", stringify!($ty), "` keys by linear probing.")]
            ///
            /// `scratch` must be filled with `None` and its length must be a power of two no less
            /// than twice the number of keys; [`probe_capacity`] computes a suitable length.
            ///
            /// # Panics
            ///
            /// Panics if `scratch` is too short or not a power of two in length.
            #[inline]
            #[must_use]
            #[allow(clippy::cast_lossless, reason = "`u64::from` is not const")]
            pub const fn $name(keys: &[$ty], scratch: &mut [Option<$ty>]) -> Option<usize> {
                let capacity = scratch.len();
                assert!(
                    capacity.is_power_of_two() && capacity / 2 >= keys.len(),
                    "scratch table must be a power of two at least twice as long as the key list",
                );
                let mask = capacity - 1;
                let mut i = 0;
                while i < keys.len() {
                    let key = keys[i];
                    let mut slot = mix_native(key as u64) & mask;
                    loop {
                        match scratch[slot] {
                            None => {
                                scratch[slot] = Some(key);
                                break;
                            }
                            Some(other) if other == key => return Some(i),
                            Some(_) => slot = (slot + 1) & mask,
                        }
                    }
                    i += 1;
                }
                None
            }
        )*
    };
}

probe! {
    u8 => probe_u8;
    u16 => probe_u16;
    u32 => probe_u32;
    u64 => probe_u64;
    usize => probe_usize;
}

/// Fail compilation if a constant key list contains duplicates.
///
/// ```rust
/// # use etools_bare as etools;
/// etools::assert_distinct!(u16; 1, 2, 3, 0xffff);
/// etools::assert_distinct!(u64; 10, 20, u64::MAX);
/// ```
///
/// ```compile_fail
/// # use etools_bare as etools;
/// etools::assert_distinct!(u8; 2, 5, 2);
/// ```
///
/// ```compile_fail
/// # use etools_bare as etools;
/// etools::assert_distinct!(u32; 7, 100_000, 7);
/// ```
#[macro_export]
macro_rules! assert_distinct {
    (u8; $($key:expr),+ $(,)?) => {
        const _: () = ::core::assert!(
            $crate::distinct::bitmap_u8(&[$($key),+]).is_none(),
            "duplicate key",
        );
    };
    (u16; $($key:expr),+ $(,)?) => {
        const _: () = ::core::assert!(
            $crate::distinct::bitmap_u16(&[$($key),+]).is_none(),
            "duplicate key",
        );
    };
    (u32; $($key:expr),+ $(,)?) => {
        $crate::assert_distinct!(@probe u32, probe_u32; $($key),+);
    };
    (u64; $($key:expr),+ $(,)?) => {
        $crate::assert_distinct!(@probe u64, probe_u64; $($key),+);
    };
    (usize; $($key:expr),+ $(,)?) => {
        $crate::assert_distinct!(@probe usize, probe_usize; $($key),+);
    };
    (@probe $ty:ident, $checker:ident; $($key:expr),+) => {
        const _: () = {
            const KEYS: &[$ty] = &[$($key),+];
            let mut scratch: [::core::option::Option<$ty>; $crate::distinct::probe_capacity(KEYS.len())] =
                [::core::option::Option::None; $crate::distinct::probe_capacity(KEYS.len())];
            ::core::assert!(
                $crate::distinct::$checker(KEYS, &mut scratch).is_none(),
                "duplicate key",
            );
        };
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::assert_distinct!(u8; 0, 1, 255);
    crate::assert_distinct!(u16; 0, 0x100, 0xffff);
    crate::assert_distinct!(u32; 1, 2, 3, 4, 5, 6, 7, 8, 9);
    crate::assert_distinct!(usize; 0, usize::MAX);

    #[test]
    fn bitmaps() {
        assert_eq!(bitmap_u8(&[]), None);
        assert_eq!(bitmap_u8(&[2, 5, 7]), None);
        assert_eq!(bitmap_u8(&[2, 5, 7, 5]), Some(3));
        assert_eq!(bitmap_u16(&[0, 64, 65_535, 63]), None);
        assert_eq!(bitmap_u16(&[65_535, 1, 65_535]), Some(2));
    }

    #[test]
    fn probing() {
        let mut scratch = [None; 8];
        assert_eq!(probe_u32(&[3, 1, 4, 2], &mut scratch), None);
        let mut scratch = [None; 8];
        assert_eq!(probe_u64(&[3, 1, 4, 1], &mut scratch), Some(3));
        let mut scratch = [None; 1];
        assert_eq!(probe_usize(&[], &mut scratch), None);
        let mut scratch = [None; 16];
        assert_eq!(probe_u8(&[0, 255, 128, 255], &mut scratch), Some(3));
        let mut scratch = [None; 4];
        assert_eq!(probe_u16(&[0, 65_535], &mut scratch), None);
    }

    #[test]
    fn probing_dense() {
        let keys: [u32; 512] = core::array::from_fn(|i| u32::try_from(i).unwrap().wrapping_mul(0x9e37_79b9));
        let mut scratch = [None; 1024];
        assert_eq!(probe_u32(&keys, &mut scratch), None);
    }

    #[test]
    #[should_panic(expected = "scratch table must be a power of two")]
    fn probing_short_scratch() {
        let mut scratch = [None; 4];
        let _ = probe_u32(&[1, 2, 3], &mut scratch);
    }

    #[test]
    fn capacity() {
        assert_eq!(probe_capacity(0), 1);
        assert_eq!(probe_capacity(3), 8);
        assert_eq!(probe_capacity(4), 8);
        assert_eq!(probe_capacity(1000), 2048);
    }
}
