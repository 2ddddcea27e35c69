use super::distinct::{bitmap_u16, bitmap_u8, probe_capacity, probe_u16, probe_u32, probe_u64};
use super::Key;
use alloc::{vec, vec::Vec};
use rapidhash::RapidRng;

/// Position of the first repeated key, the slow way.
fn reference_duplicate<T: Ord + Copy>(keys: &[T]) -> Option<usize> {
    (0..keys.len()).find(|&i| keys[..i].contains(&keys[i]))
}

/// Generate `n` keys below `bound`, then plant `duplicates` copies of earlier keys.
fn generate_keys(rng: &mut RapidRng, n: usize, bound: u64, duplicates: usize) -> Vec<u64> {
    let mut keys: Vec<u64> = Vec::with_capacity(n + duplicates);
    while keys.len() < n {
        let key = rng.next() % bound;
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    for _ in 0..duplicates {
        if keys.is_empty() {
            break;
        }
        let source = usize::try_from(rng.next()).unwrap() % keys.len();
        let target = usize::try_from(rng.next()).unwrap() % (keys.len() + 1);
        keys.insert(target, keys[source]);
    }
    keys
}

#[test]
fn checkers_agree_narrow() {
    let mut rng = RapidRng::new(0x1319_8a2e_0370_7344);
    for round in 0..300 {
        let n = round % 40;
        let duplicates = round % 3;

        let keys = generate_keys(&mut rng, n, 256, duplicates);
        let keys: Vec<u8> = keys.into_iter().map(|key| u8::try_from(key).unwrap()).collect();
        let expected = reference_duplicate(&keys);
        assert_eq!(bitmap_u8(&keys), expected, "{keys:?}");
        assert_eq!(u8::first_duplicate(&keys), expected, "{keys:?}");

        let keys = generate_keys(&mut rng, n, 1 << 16, duplicates);
        let keys: Vec<u16> = keys.into_iter().map(|key| u16::try_from(key).unwrap()).collect();
        let expected = reference_duplicate(&keys);
        assert_eq!(bitmap_u16(&keys), expected, "{keys:?}");
        let mut scratch = vec![None; probe_capacity(keys.len())];
        assert_eq!(probe_u16(&keys, &mut scratch), expected, "{keys:?}");
    }
}

#[test]
fn checkers_agree_wide() {
    let mut rng = RapidRng::new(0xa409_3822_299f_31d0);
    for round in 0..300 {
        let n = round % 100;
        let duplicates = round % 3;

        let keys = generate_keys(&mut rng, n, u64::MAX, duplicates);
        let expected = reference_duplicate(&keys);
        let mut scratch = vec![None; probe_capacity(keys.len())];
        assert_eq!(probe_u64(&keys, &mut scratch), expected, "{keys:?}");
        assert_eq!(u64::all_distinct(&keys), expected.is_none());

        // Few distinct values force long probe chains.
        let keys = generate_keys(&mut rng, n.min(16), 16, duplicates);
        let keys: Vec<u32> = keys.into_iter().map(|key| u32::try_from(key).unwrap()).collect();
        let expected = reference_duplicate(&keys);
        let mut scratch = vec![None; probe_capacity(keys.len())];
        assert_eq!(probe_u32(&keys, &mut scratch), expected, "{keys:?}");
    }
}

#[cfg(feature = "build")]
mod scenarios {
    use crate::{Backend, BuildError, Fks, Llut, Lookup, Mph, Width};
    use alloc::vec::Vec;

    /// Check that every member maps to its position and the given non-members to the sentinel.
    fn check<T: Lookup>(table: &T, keys: &[T::Key], non_members: impl IntoIterator<Item = T::Key>) {
        assert_eq!(table.len(), keys.len());
        assert_eq!(table.not_found(), keys.len());
        for (index, &key) in keys.iter().enumerate() {
            assert_eq!(table.lookup(key), index, "{key:?}");
            assert!(table.contains(key));
        }
        for key in non_members {
            assert_eq!(table.lookup(key), keys.len(), "{key:?}");
        }
    }

    #[test]
    fn trivial_sets() {
        check(&Fks::<u8>::try_from_keys(&[0]).unwrap(), &[0], [1, 255]);
        check(&Fks::<u8>::try_from_keys(&[1]).unwrap(), &[1], [0, 2]);
        check(&Fks::<u8>::try_from_keys(&[0, 1]).unwrap(), &[0, 1], [2, 3]);
        check(&Fks::<u8>::try_from_keys(&[1, 0]).unwrap(), &[1, 0], [2, 3]);
        check(&Llut::<u8>::try_from_keys(&[0]).unwrap(), &[0], [1, 255]);
    }

    #[test]
    fn dense_u16() {
        let keys: Vec<u16> = (0..1024).collect();
        let fks = Fks::try_from_keys(&keys).unwrap();
        check(&fks, &keys, 1024..1280);
        let llut = Llut::try_from_keys(&keys).unwrap();
        check(&llut, &keys, 1024..1280);
        assert_eq!(llut.table_size(), 1024);
    }

    #[test]
    fn affine_permutation() {
        let key = |i: u32| u16::try_from((25_173 * i + 13_849) % 65_536).unwrap();
        let keys: Vec<u16> = (0..2048).map(key).collect();
        let non_members: Vec<u16> = (2048..2304).map(key).collect();
        for width in Width::POINTER_WIDTHS {
            let fks = Fks::try_from_keys_for_width(&keys, width).unwrap();
            check(&fks, &keys, non_members.iter().copied());
        }
        let mph = Mph::try_from_keys(&keys).unwrap();
        check(&mph, &keys, non_members.iter().copied());
    }

    #[test]
    fn extremes() {
        check(
            &Fks::<u64>::try_from_keys(&[0, u64::MAX]).unwrap(),
            &[0, u64::MAX],
            [1, u64::MAX - 1],
        );
        check(
            &Fks::<usize>::try_from_keys(&[usize::MAX, 0, 1]).unwrap(),
            &[usize::MAX, 0, 1],
            [2, usize::MAX - 1],
        );
        check(
            &Llut::<u8>::try_from_keys(&[255, 0]).unwrap(),
            &[255, 0],
            [1, 254],
        );
    }

    #[test]
    fn selector() {
        let dense = Mph::<u8>::try_from_keys(&[2, 5, 7, 8, 9]).unwrap();
        assert_eq!(dense.backend(), Backend::Llut);
        check(&dense, &[2, 5, 7, 8, 9], [0, 1, 3, 4, 6, 10, 255]);

        let sparse = Mph::<u16>::try_from_keys(&[1, 10_000, 60_000]).unwrap();
        assert_eq!(sparse.backend(), Backend::Fks);
        check(&sparse, &[1, 10_000, 60_000], [0, 2, 9_999, 65_535]);
    }

    #[test]
    fn errors() {
        assert_eq!(Mph::<u32>::try_from_keys(&[]).unwrap_err(), BuildError::Empty);
        assert_eq!(
            Mph::<u32>::try_from_keys(&[5, 5]).unwrap_err(),
            BuildError::DuplicateKey { index: 1 }
        );
        assert_eq!(
            alloc::format!("{}", BuildError::DuplicateKey { index: 1 }),
            "key #1 repeats an earlier key"
        );
    }
}
