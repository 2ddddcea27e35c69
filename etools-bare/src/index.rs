//! Dense index storage.
//!
//! Tables store positions in `0..=N`, where `N` is the number of keys and doubles as the "not
//! found" sentinel. Storing them at the narrowest width that fits `N` shrinks tables considerably:
//! a table over a hundred keys spends one byte per slot.

use super::const_vec::ConstVec;

/// Number of bytes in the smallest unsigned integer that can hold `n`.
#[inline]
#[must_use]
pub const fn index_bytes(n: usize) -> usize {
    if n <= u8::MAX as usize {
        1
    } else if n <= u16::MAX as usize {
        2
    } else if n as u64 <= u32::MAX as u64 {
        4
    } else {
        8
    }
}

/// A list of indices at the narrowest fitting width.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(all(feature = "alloc", feature = "serde"), derive(serde::Deserialize))]
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Indices {
    /// Up to `u8::MAX`.
    U8(ConstVec<u8>),
    /// Up to `u16::MAX`.
    U16(ConstVec<u16>),
    /// Up to `u32::MAX`.
    U32(ConstVec<u32>),
    /// Anything else.
    U64(ConstVec<u64>),
}

impl Indices {
    /// Allocate `len` indices set to `value`, wide enough to hold anything up to `max`.
    ///
    /// # Panics
    ///
    /// Panics if `value > max`.
    #[cfg(feature = "alloc")]
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "`value <= max`, and `max` fits the chosen width"
    )]
    pub fn filled(value: usize, len: usize, max: usize) -> Self {
        assert!(value <= max, "fill value exceeds the index range");
        match index_bytes(max) {
            1 => Self::U8(alloc::vec![value as u8; len].into()),
            2 => Self::U16(alloc::vec![value as u16; len].into()),
            4 => Self::U32(alloc::vec![value as u32; len].into()),
            _ => Self::U64(alloc::vec![value as u64; len].into()),
        }
    }

    /// Width of a single index in bytes.
    #[inline]
    #[must_use]
    pub const fn width_bytes(&self) -> usize {
        match self {
            Self::U8(_) => 1,
            Self::U16(_) => 2,
            Self::U32(_) => 4,
            Self::U64(_) => 8,
        }
    }

    /// Number of stored indices.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
            Self::U64(v) => v.len(),
        }
    }

    /// Whether there are no indices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the index at `position`.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "stored indices never exceed the number of keys, which is a `usize`"
    )]
    pub fn get(&self, position: usize) -> Option<usize> {
        match self {
            Self::U8(v) => v.get(position).map(|&i| usize::from(i)),
            Self::U16(v) => v.get(position).map(|&i| usize::from(i)),
            Self::U32(v) => v.get(position).map(|&i| i as usize),
            Self::U64(v) => v.get(position).map(|&i| i as usize),
        }
    }

    /// Overwrite the index at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of bounds, `value` does not fit, or the storage is static.
    #[inline]
    pub fn set(&mut self, position: usize, value: usize) {
        let fits = match self {
            Self::U8(v) => u8::try_from(value).map(|value| v[position] = value).is_ok(),
            Self::U16(v) => u16::try_from(value).map(|value| v[position] = value).is_ok(),
            Self::U32(v) => u32::try_from(value).map(|value| v[position] = value).is_ok(),
            Self::U64(v) => u64::try_from(value).map(|value| v[position] = value).is_ok(),
        };
        assert!(fits, "index {value} does not fit the storage width");
    }

    /// Iterate over all indices.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter_map(|position| self.get(position))
    }
}

#[cfg(feature = "codegen")]
impl super::codegen::Codegen for Indices {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let (variant, data) = match self {
            Self::U8(v) => (gen.item("low_level::Indices::U8"), gen.piece(v)),
            Self::U16(v) => (gen.item("low_level::Indices::U16"), gen.piece(v)),
            Self::U32(v) => (gen.item("low_level::Indices::U32"), gen.piece(v)),
            Self::U64(v) => (gen.item("low_level::Indices::U64"), gen.piece(v)),
        };
        quote::quote!(#variant(#data))
    }
}
