//! Two-level perfect hashing.
//!
//! Keys are spread over `ceil_pow2(N)` first-level buckets by their mixed value. Every bucket of
//! `s` keys owns a second-level range of `2^ceil_log2(s^2)` slots, addressed by the top bits of the
//! mixed value times a per-bucket odd multiplier. Quadratic space per bucket makes a collision-free
//! multiplier easy to find, while the expected total stays linear in `N`.
//!
//! The multiplier of every bucket is found by trying `mix(seed) | 1` for `seed = 1, 2, ...`, so
//! builds are deterministic.

use super::{bits::Width, const_vec::ConstVec, index::Indices, Key, Lookup};

/// How many seeds the multiplier search tries per bucket before giving up.
pub const MAX_MULTIPLIER_SEEDS: u64 = 1 << 20;

/// A bucket needing this many seeds gets a warning in the log.
#[cfg(feature = "build")]
const LONG_SEARCH: u64 = 1 << 12;

/// A static perfect hash table mapping keys to their dense indices.
///
/// Lookups cost two mixes and a handful of loads, and never probe. Members map to their position
/// in the key list the table was built from; everything else maps to [`not_found`](Self::not_found).
#[cfg_attr(all(feature = "alloc", feature = "serde"), derive(serde::Deserialize))]
#[cfg_attr(
    all(feature = "alloc", feature = "serde"),
    serde(
        bound(deserialize = "K: Key + serde::Deserialize<'de>"),
        try_from = "FksInner<K>"
    )
)]
#[derive(Debug)]
pub struct Fks<K> {
    /// The actual table.
    inner: FksInner<K>,
}

/// The actual table, deserialized before validation.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(all(feature = "alloc", feature = "serde"), derive(serde::Deserialize))]
#[derive(Debug)]
struct FksInner<K> {
    /// Width the keys were mixed at.
    width: Width,

    /// Second-level multiplier per bucket. Odd for non-empty buckets.
    multipliers: ConstVec<u64>,

    /// `log2` of the second-level size per bucket.
    bits: ConstVec<u8>,

    /// Start of each bucket's range in [`slots`](Self::slots).
    bases: ConstVec<usize>,

    /// Dense index per slot, `keys.len()` for empty slots.
    slots: Indices,

    /// Keys by dense index, to reject non-members that land on an occupied slot.
    keys: ConstVec<K>,
}

/// Group `0..len` by bucket with a counting sort.
///
/// Returns CSR offsets of length `bucket_count + 1` and the grouped items: bucket `b` holds
/// `items[offsets[b]..offsets[b + 1]]`, in increasing order.
#[cfg(feature = "build")]
#[expect(
    clippy::arithmetic_side_effects,
    reason = "counts are bounded by `len`, which is a valid allocation size"
)]
fn group_by_bucket(
    len: usize,
    bucket_count: usize,
    bucket_of: impl Fn(usize) -> usize,
) -> (alloc::vec::Vec<usize>, alloc::vec::Vec<usize>) {
    use alloc::vec;

    let mut offsets = vec![0; bucket_count + 1];
    for item in 0..len {
        offsets[bucket_of(item) + 1] += 1;
    }
    for bucket in 0..bucket_count {
        offsets[bucket + 1] += offsets[bucket];
    }

    let mut cursors = offsets.clone();
    let mut items = vec![0; len];
    for item in 0..len {
        let cursor = &mut cursors[bucket_of(item)];
        items[*cursor] = item;
        *cursor += 1;
    }

    (offsets, items)
}

/// Second-level size of a bucket with `size` keys, as a power of two.
#[cfg(feature = "build")]
fn second_level_bits(size: usize) -> Option<u32> {
    if size <= 1 {
        Some(0)
    } else {
        size.checked_mul(size).map(crate::bits::ceil_log2)
    }
}

/// Find the first seed whose multiplier places `mixed` keys without collisions.
///
/// Returns `(seed, multiplier)`.
#[cfg(feature = "build")]
fn find_multiplier(
    width: Width,
    mixed: &[u64],
    bits: u32,
    positions: &mut alloc::vec::Vec<u64>,
) -> Option<(u64, u64)> {
    // Equal mixed values land on the same slot under every multiplier.
    if mixed
        .iter()
        .enumerate()
        .any(|(i, value)| mixed[..i].contains(value))
    {
        return None;
    }

    (1..=MAX_MULTIPLIER_SEEDS).find_map(|seed| {
        let multiplier = width.mix(seed) | 1;
        positions.clear();
        for &value in mixed {
            let position = width.top_bits(width.wrapping_mul(value, multiplier), bits);
            if positions.contains(&position) {
                return None;
            }
            positions.push(position);
        }
        Some((seed, multiplier))
    })
}

#[cfg(feature = "build")]
impl<K: Key> Fks<K> {
    /// Build a table over distinct keys, hashing at the native width.
    ///
    /// The dense index of a key is its position in `keys`.
    ///
    /// # Errors
    ///
    /// Fails if `keys` is empty or contains duplicates. See
    /// [`try_from_keys_for_width`](Self::try_from_keys_for_width) for the other failure modes.
    #[inline]
    pub fn try_from_keys(keys: &[K]) -> Result<Self, crate::BuildError> {
        Self::try_from_keys_for_width(keys, Width::NATIVE)
    }

    /// Build a table over distinct keys, hashing at an explicit width.
    ///
    /// Tables built for a width answer identically on every platform, but lookups are cheapest
    /// when the width is [`Width::NATIVE`] of the platform the table is used on.
    ///
    /// # Errors
    ///
    /// Fails if `keys` is empty or contains duplicates, if the table doesn't fit in `width`-bit
    /// addressing, or if two keys are indistinguishable after mixing at `width` (only possible for
    /// keys wider than `width`).
    #[inline]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "bucket and slot numbers are checked to fit `usize` and `width`"
    )]
    #[expect(
        clippy::arithmetic_side_effects,
        reason = "sums are checked against `width`, which is at most 64 bits"
    )]
    pub fn try_from_keys_for_width(keys: &[K], width: Width) -> Result<Self, crate::BuildError> {
        use crate::BuildError;
        use alloc::vec::Vec;

        let Some(max_key) = keys.iter().max() else {
            return Err(BuildError::Empty);
        };
        let too_large = BuildError::TableTooLarge {
            max_key: max_key.to_u64(),
        };
        if let Some(index) = K::first_duplicate(keys) {
            return Err(BuildError::DuplicateKey { index });
        }

        let len = keys.len();
        let bucket_count = len
            .checked_next_power_of_two()
            .filter(|&count| count as u64 <= width.max())
            .ok_or(too_large)?;
        let mask = bucket_count as u64 - 1;

        let mixed: Vec<u64> = keys.iter().map(|key| width.mix(key.to_u64())).collect();
        let (offsets, items) = group_by_bucket(len, bucket_count, |item| {
            (mixed[item] & mask) as usize
        });

        let mut bits = Vec::with_capacity(bucket_count);
        let mut bases = Vec::with_capacity(bucket_count);
        let mut total_slots: usize = 0;
        for bucket in 0..bucket_count {
            let size = offsets[bucket + 1] - offsets[bucket];
            let r = second_level_bits(size)
                .filter(|&r| r < width.bits() && r < usize::BITS)
                .ok_or(too_large)?;
            bits.push(r as u8);
            bases.push(total_slots);
            total_slots = total_slots
                .checked_add(1 << r)
                .filter(|&total| total as u64 <= width.max())
                .ok_or(too_large)?;
        }

        let mut multipliers = alloc::vec![0; bucket_count];
        let mut slots = Indices::filled(len, total_slots, len);
        let mut bucket_mixed = Vec::new();
        let mut positions = Vec::new();
        for bucket in 0..bucket_count {
            let members = &items[offsets[bucket]..offsets[bucket + 1]];
            if members.is_empty() {
                continue;
            }

            bucket_mixed.clear();
            bucket_mixed.extend(members.iter().map(|&item| mixed[item]));
            let r = u32::from(bits[bucket]);
            let (seed, multiplier) = find_multiplier(width, &bucket_mixed, r, &mut positions)
                .ok_or(BuildError::MultiplierSearchExhausted { bucket })?;

            log::trace!(
                "bucket {bucket}: {} keys over 2^{r} slots, seed {seed}",
                members.len(),
            );
            if seed >= LONG_SEARCH {
                log::warn!(
                    "bucket {bucket} of {} keys needed {seed} multiplier seeds",
                    members.len(),
                );
            }

            multipliers[bucket] = multiplier;
            for (&item, &position) in members.iter().zip(&positions) {
                slots.set(bases[bucket] + position as usize, item);
            }
        }

        log::debug!(
            "built FKS table at {} bits: {len} keys, {bucket_count} buckets, {total_slots} slots",
            width.bits(),
        );

        Ok(Self {
            inner: FksInner {
                width,
                multipliers: multipliers.into(),
                bits: bits.into(),
                bases: bases.into(),
                slots,
                keys: keys.to_vec().into(),
            },
        })
    }
}

impl<K> Fks<K> {
    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn __from_raw_parts(
        width: Width,
        multipliers: ConstVec<u64>,
        bits: ConstVec<u8>,
        bases: ConstVec<usize>,
        slots: Indices,
        keys: ConstVec<K>,
    ) -> Self {
        Self {
            inner: FksInner {
                width,
                multipliers,
                bits,
                bases,
                slots,
                keys,
            },
        }
    }

    /// Number of keys.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.keys.len()
    }

    /// Always `false`, tables cannot be empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.keys.is_empty()
    }

    /// The value [`lookup`](Self::lookup) returns for non-members. Equal to [`len`](Self::len).
    #[inline]
    #[must_use]
    pub fn not_found(&self) -> usize {
        self.len()
    }

    /// Number of first-level buckets.
    #[inline]
    #[must_use]
    pub fn buckets(&self) -> usize {
        self.inner.multipliers.len()
    }

    /// Total number of second-level slots.
    #[inline]
    #[must_use]
    pub fn slots(&self) -> usize {
        self.inner.slots.len()
    }

    /// The keys, in dense index order.
    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[K] {
        &self.inner.keys
    }

    /// The width keys are mixed at.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> Width {
        self.inner.width
    }
}

impl<K: Key> Fks<K> {
    /// Get the dense index of a key, or [`not_found`](Self::not_found) for non-members.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "bucket and slot numbers fit `usize` by construction"
    )]
    pub fn lookup(&self, key: K) -> usize {
        let inner = &self.inner;
        let width = inner.width;
        let not_found = inner.keys.len();

        let mixed = width.mix(key.to_u64());
        let bucket = (mixed & (inner.multipliers.len() as u64).wrapping_sub(1)) as usize;
        let (Some(&multiplier), Some(&bits), Some(&base)) = (
            inner.multipliers.get(bucket),
            inner.bits.get(bucket),
            inner.bases.get(bucket),
        ) else {
            return not_found;
        };

        let position = width.top_bits(width.wrapping_mul(mixed, multiplier), u32::from(bits));
        match inner.slots.get(base.wrapping_add(position as usize)) {
            Some(candidate) if inner.keys.get(candidate) == Some(&key) => candidate,
            _ => not_found,
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
impl<K: Key> Lookup for Fks<K> {
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
    use super::Fks;
    use serde::{Serialize, Serializer};

    impl<K: Serialize> Serialize for Fks<K> {
        #[inline]
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.inner.serialize(serializer)
        }
    }
}

/// Scope for `serde` validation.
#[cfg(all(feature = "alloc", feature = "serde"))]
mod serde_validation {
    use super::{Fks, FksInner, Key};
    use displaydoc::Display;
    use thiserror::Error;

    /// Deserialization validation failures.
    #[derive(Debug, Display, Error)]
    #[non_exhaustive]
    pub enum Error {
        /// no keys
        Empty,

        /// bucket arrays disagree in length or are not a power of two long
        WrongBucketCount,

        /// second-level size exceeds the hashing width
        BitsTooWide,

        /// bucket offsets do not tile the slot array
        WrongOffsets,

        /// slot out of range
        IndexOutOfRange,

        /// wrong number of occupied slots
        WrongLen,

        /// key does not resolve to its own index
        MisplacedKey,
    }

    impl<K: Key> TryFrom<FksInner<K>> for Fks<K> {
        type Error = Error;

        #[inline]
        fn try_from(inner: FksInner<K>) -> Result<Self, Error> {
            let len = inner.keys.len();
            if len == 0 {
                return Err(Error::Empty);
            }

            let bucket_count = inner.multipliers.len();
            if !bucket_count.is_power_of_two()
                || inner.bits.len() != bucket_count
                || inner.bases.len() != bucket_count
            {
                return Err(Error::WrongBucketCount);
            }

            let mut total: usize = 0;
            for (&bits, &base) in inner.bits.iter().zip(&*inner.bases) {
                if u32::from(bits) >= inner.width.bits() {
                    return Err(Error::BitsTooWide);
                }
                if base != total {
                    return Err(Error::WrongOffsets);
                }
                total = 1usize
                    .checked_shl(u32::from(bits))
                    .and_then(|size| total.checked_add(size))
                    .ok_or(Error::WrongOffsets)?;
            }
            if total != inner.slots.len() {
                return Err(Error::WrongOffsets);
            }

            let mut occupied: usize = 0;
            for index in inner.slots.iter() {
                if index > len {
                    return Err(Error::IndexOutOfRange);
                }
                occupied += usize::from(index < len);
            }
            if occupied != len {
                return Err(Error::WrongLen);
            }

            let fks = Self { inner };
            for (index, &key) in fks.keys().iter().enumerate() {
                if fks.lookup(key) != index {
                    return Err(Error::MisplacedKey);
                }
            }

            Ok(fks)
        }
    }
}

#[cfg(feature = "codegen")]
impl<K: super::codegen::Codegen> super::codegen::Codegen for Fks<K> {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let fks = gen.item("Fks");
        let width = gen.piece(&self.inner.width);
        let multipliers = gen.piece(&self.inner.multipliers);
        let bits = gen.piece(&self.inner.bits);
        let bases = gen.piece(&self.inner.bases);
        let slots = gen.piece(&self.inner.slots);
        let keys = gen.piece(&self.inner.keys);
        quote::quote!(#fks::__from_raw_parts(#width, #multipliers, #bits, #bases, #slots, #keys))
    }
}
