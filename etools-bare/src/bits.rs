//! Bit tricks and integer mixers.
//!
//! Everything here is `const`, so the same arithmetic runs inside the table builders, in generated
//! `static`s, and in compile-time assertions.
//!
//! The mixers are bijections on their width and map `0` to `0`. They are not cryptographic and are
//! only meant to spread keys across the buckets of a table.

/// Mix an 8-bit integer.
#[inline]
#[must_use]
pub const fn mix8(mut x: u8) -> u8 {
    x ^= x >> 4;
    x = x.wrapping_mul(0x1d);
    x ^= x >> 3;
    x = x.wrapping_mul(0xa7);
    x ^= x >> 4;
    x
}

/// Mix a 16-bit integer.
#[inline]
#[must_use]
pub const fn mix16(mut x: u16) -> u16 {
    x ^= x >> 8;
    x = x.wrapping_mul(0x88b5);
    x ^= x >> 7;
    x = x.wrapping_mul(0xdb2d);
    x ^= x >> 9;
    x
}

/// Mix a 32-bit integer with the MurmurHash3 finalizer.
#[inline]
#[must_use]
pub const fn mix32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x85eb_ca6b);
    x ^= x >> 13;
    x = x.wrapping_mul(0xc2b2_ae35);
    x ^= x >> 16;
    x
}

/// Mix a 64-bit integer with the SplitMix64 finalizer.
#[inline]
#[must_use]
pub const fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^= x >> 31;
    x
}

/// Integer width used for hashing.
///
/// Tables remember the width they were built for, so a table produced on one platform answers the
/// same way on any other. The macros build every table once per pointer width, which keeps
/// compile-time tables on [`Width::NATIVE`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Width {
    /// 8 bits.
    W8,
    /// 16 bits.
    W16,
    /// 32 bits.
    W32,
    /// 64 bits.
    W64,
}

impl Width {
    /// The width of `usize` on the current platform.
    pub const NATIVE: Self = match usize::BITS {
        16 => Self::W16,
        32 => Self::W32,
        _ => Self::W64,
    };

    /// All widths a pointer can have.
    pub const POINTER_WIDTHS: [Self; 3] = [Self::W16, Self::W32, Self::W64];

    /// Number of bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::W8 => 8,
            Self::W16 => 16,
            Self::W32 => 32,
            Self::W64 => 64,
        }
    }

    /// Number of bytes.
    #[inline]
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::W8 => 1,
            Self::W16 => 2,
            Self::W32 => 4,
            Self::W64 => 8,
        }
    }

    /// The largest value representable in this width.
    #[inline]
    #[must_use]
    pub const fn max(self) -> u64 {
        u64::MAX >> (64 - self.bits())
    }

    /// Mix `x`, truncated to this width.
    #[inline]
    #[must_use]
    #[expect(clippy::cast_possible_truncation, reason = "truncation is the point")]
    pub const fn mix(self, x: u64) -> u64 {
        match self {
            Self::W8 => mix8(x as u8) as u64,
            Self::W16 => mix16(x as u16) as u64,
            Self::W32 => mix32(x as u32) as u64,
            Self::W64 => mix64(x),
        }
    }

    /// Multiply modulo `2^bits`.
    #[inline]
    #[must_use]
    pub const fn wrapping_mul(self, a: u64, b: u64) -> u64 {
        a.wrapping_mul(b) & self.max()
    }

    /// Take the top `r` bits of `x`, truncated to this width.
    ///
    /// `r == 0` yields `0`. `r` must not exceed [`bits`](Self::bits).
    #[inline]
    #[must_use]
    pub const fn top_bits(self, x: u64, r: u32) -> u64 {
        debug_assert!(r <= self.bits(), "cannot take more bits than the width has");
        if r == 0 {
            0
        } else {
            (x & self.max()) >> (self.bits() - r)
        }
    }

    /// The width of a `target_pointer_width` value, as spelled in `cfg`.
    #[inline]
    #[must_use]
    pub const fn cfg_name(self) -> &'static str {
        match self {
            Self::W8 => "8",
            Self::W16 => "16",
            Self::W32 => "32",
            Self::W64 => "64",
        }
    }
}

#[cfg(feature = "codegen")]
impl super::codegen::Codegen for Width {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        match self {
            Self::W8 => gen.item("Width::W8"),
            Self::W16 => gen.item("Width::W16"),
            Self::W32 => gen.item("Width::W32"),
            Self::W64 => gen.item("Width::W64"),
        }
    }
}

/// Mix a key to an arbitrary width.
#[inline]
#[must_use]
pub const fn mix_to_width(key: u64, width: Width) -> u64 {
    width.mix(key)
}

/// Mix a key at the platform's native integer width.
#[inline]
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "the result fits in the native width"
)]
pub const fn mix_native(key: u64) -> usize {
    Width::NATIVE.mix(key) as usize
}

/// Take the top `r` bits of a native-width integer.
#[inline]
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "the result fits in the native width"
)]
pub const fn top_bits(x: usize, r: u32) -> usize {
    Width::NATIVE.top_bits(x as u64, r) as usize
}

/// Map a key to one of `bucket_count` buckets by the low bits of its native mix.
///
/// `bucket_count` must be a power of two.
#[inline]
#[must_use]
pub const fn bucket_of(key: u64, bucket_count: usize) -> usize {
    debug_assert!(
        bucket_count.is_power_of_two(),
        "bucket count must be a power of two"
    );
    mix_native(key) & bucket_count.wrapping_sub(1)
}

/// Generate `ceil_pow2`, `ceil_pow2_saturate`, `bit_width`, and `ceil_log2` for a type.
macro_rules! pow2 {
    ($($ty:ident => $ceil:ident, $saturate:ident, $bit_width:ident, $ceil_log2:ident;)*) => {
        $(
            #[doc = concat!("Round a `", stringify!($ty), "` up to a power of two.")]
            ///
            /// `0` and `1` map to `1`. Values above the largest representable power of two wrap to
            /// `0`.
            #[inline]
            #[must_use]
            pub const fn $ceil(x: $ty) -> $ty {
                if x <= 1 {
                    return 1;
                }
                let shift = $ty::BITS - (x - 1).leading_zeros();
                if shift >= $ty::BITS {
                    0
                } else {
                    1 << shift
                }
            }

            #[doc = concat!("Round a `", stringify!($ty), "` up to a power of two, saturating.")]
            ///
            /// Values above the largest representable power of two clamp to it.
            #[inline]
            #[must_use]
            pub const fn $saturate(x: $ty) -> $ty {
                match $ceil(x) {
                    0 => 1 << ($ty::BITS - 1),
                    y => y,
                }
            }

            #[doc = concat!("Number of bits needed to represent a `", stringify!($ty), "`.")]
            #[inline]
            #[must_use]
            pub const fn $bit_width(x: $ty) -> u32 {
                $ty::BITS - x.leading_zeros()
            }

            #[doc = concat!("Ceiling of the binary logarithm of a `", stringify!($ty), "`.")]
            ///
            /// `0` and `1` map to `0`.
            #[inline]
            #[must_use]
            pub const fn $ceil_log2(x: $ty) -> u32 {
                if x <= 1 {
                    0
                } else {
                    $bit_width(x - 1)
                }
            }
        )*
    };
}

pow2! {
    u8 => ceil_pow2_u8, ceil_pow2_saturate_u8, bit_width_u8, ceil_log2_u8;
    u16 => ceil_pow2_u16, ceil_pow2_saturate_u16, bit_width_u16, ceil_log2_u16;
    u32 => ceil_pow2_u32, ceil_pow2_saturate_u32, bit_width_u32, ceil_log2_u32;
    u64 => ceil_pow2_u64, ceil_pow2_saturate_u64, bit_width_u64, ceil_log2_u64;
    usize => ceil_pow2, ceil_pow2_saturate, bit_width, ceil_log2;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixers_fix_zero() {
        assert_eq!(mix8(0), 0);
        assert_eq!(mix16(0), 0);
        assert_eq!(mix32(0), 0);
        assert_eq!(mix64(0), 0);
        for width in [Width::W8, Width::W16, Width::W32, Width::W64] {
            assert_eq!(width.mix(0), 0);
        }
    }

    #[test]
    fn mixers_move_one() {
        assert_eq!(mix8(1), 155);
        assert_eq!(mix16(1), 32234);
        assert_eq!(mix32(1), 1_364_076_727);
        assert_eq!(mix64(1), 6_238_072_747_940_578_789);
    }

    #[test]
    fn small_mixers_are_bijective() {
        let mut seen = [false; 256];
        for x in 0..=u8::MAX {
            let y = usize::from(mix8(x));
            assert!(!seen[y], "mix8 collision at {x}");
            seen[y] = true;
        }

        let mut seen = [false; 1 << 16];
        for x in 0..=u16::MAX {
            let y = usize::from(mix16(x));
            assert!(!seen[y], "mix16 collision at {x}");
            seen[y] = true;
        }
    }

    #[test]
    fn width_truncates() {
        assert_eq!(Width::W16.mix(0x1_0001), u64::from(mix16(1)));
        assert_eq!(Width::W32.mix(0xffff_ffff_0000_0001), u64::from(mix32(1)));
        assert_eq!(mix_to_width(1, Width::W64), mix64(1));
        assert_eq!(Width::W16.wrapping_mul(0x8000, 2), 0);
        assert_eq!(Width::W16.top_bits(0xabcd, 4), 0xa);
        assert_eq!(Width::W64.top_bits(u64::MAX, 0), 0);
        assert_eq!(Width::W64.top_bits(u64::MAX, 64), u64::MAX);
    }

    #[test]
    fn native() {
        assert_eq!(Width::NATIVE.bits(), usize::BITS);
        assert_eq!(mix_native(0), 0);
        assert_eq!(top_bits(usize::MAX, 3), 7);
    }

    #[test]
    fn buckets_use_the_mixed_key() {
        for key in [0, 1, 2, 0b1011, 0xdead_beef, u64::MAX] {
            assert_eq!(bucket_of(key, 4), mix_native(key) & 3);
            assert_eq!(bucket_of(key, 1), 0);
        }
        // The key is mixed, not just masked.
        assert_ne!(bucket_of(1, 8), 1);
    }

    #[test]
    fn ceil_pow2_wraps() {
        assert_eq!(ceil_pow2_u8(0), 1);
        assert_eq!(ceil_pow2_u8(1), 1);
        assert_eq!(ceil_pow2_u8(3), 4);
        assert_eq!(ceil_pow2_u8(128), 128);
        assert_eq!(ceil_pow2_u8(129), 0);
        assert_eq!(ceil_pow2_u32(1 << 31), 1 << 31);
        assert_eq!(ceil_pow2_u32((1 << 31) + 1), 0);
        assert_eq!(ceil_pow2(1000), 1024);
    }

    #[test]
    fn ceil_pow2_saturates() {
        assert_eq!(ceil_pow2_saturate_u8(129), 128);
        assert_eq!(ceil_pow2_saturate_u8(u8::MAX), 128);
        assert_eq!(ceil_pow2_saturate_u8(5), 8);
        assert_eq!(ceil_pow2_saturate_u32(u32::MAX), 1 << 31);
        assert_eq!(ceil_pow2_saturate_u64(u64::MAX), 1 << 63);
    }

    #[test]
    fn logarithms() {
        assert_eq!(bit_width_u8(0), 0);
        assert_eq!(bit_width_u8(1), 1);
        assert_eq!(bit_width_u8(2), 2);
        assert_eq!(bit_width_u8(3), 2);
        assert_eq!(bit_width_u64(u64::MAX), 64);

        assert_eq!(ceil_log2_u8(0), 0);
        assert_eq!(ceil_log2_u8(1), 0);
        assert_eq!(ceil_log2_u8(2), 1);
        assert_eq!(ceil_log2_u8(3), 2);
        assert_eq!(ceil_log2_u8(129), 8);
        assert_eq!(ceil_log2(1024), 10);
        assert_eq!(ceil_log2(1025), 11);
    }
}
