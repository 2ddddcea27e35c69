//! Tables generated in `build.rs` and loaded with `include!`.

use etools::{Fks, Llut, Mph};

/// The keys of [`FKS`] and [`MPH`], in dense index order.
pub static KEYS: &[u32] = include!(concat!(env!("OUT_DIR"), "/keys.rs"));

/// Two-level table over [`KEYS`].
pub static FKS: Fks<u32> = include!(concat!(env!("OUT_DIR"), "/fks.rs"));

/// Backend-selected table over [`KEYS`].
pub static MPH: Mph<u32> = include!(concat!(env!("OUT_DIR"), "/mph.rs"));

/// Direct table over every third byte.
pub static LLUT: Llut<u8> = include!(concat!(env!("OUT_DIR"), "/llut.rs"));

/// The same table as [`FKS`], generated as heap-backed code.
#[must_use]
pub fn fks_heap() -> Fks<u32> {
    include!(concat!(env!("OUT_DIR"), "/fks_heap.rs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use etools::{Backend, Lookup, Width};

    fn check<T: Lookup<Key = u32>>(table: &T) {
        assert_eq!(table.len(), KEYS.len());
        for (index, &key) in KEYS.iter().enumerate() {
            assert_eq!(table.lookup(key), index);
        }
        let mut misses = 0;
        for key in (0..u32::MAX).step_by(1_000_003) {
            if !KEYS.contains(&key) {
                assert_eq!(table.lookup(key), KEYS.len());
                misses += 1;
            }
        }
        assert!(misses > 0);
    }

    #[test]
    fn fks() {
        check(&FKS);
        assert_eq!(FKS.width(), Width::NATIVE);
        assert_eq!(FKS.keys(), KEYS);
    }

    #[test]
    fn fks_heap() {
        check(&super::fks_heap());
    }

    #[test]
    fn mph() {
        assert_eq!(MPH.backend(), Backend::Fks);
        check(&MPH);
    }

    #[test]
    fn llut() {
        assert_eq!(LLUT.len(), 86);
        assert_eq!(LLUT.table_size(), 256);
        for key in 0..=u8::MAX {
            let expected = if key % 3 == 0 { usize::from(key / 3) } else { 86 };
            assert_eq!(LLUT.lookup(key), expected);
        }
    }
}
