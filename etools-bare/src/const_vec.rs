//! Table storage that is either baked into the binary or allocated at run time.

use core::ops::{Deref, DerefMut};

/// A slice owned by a table.
///
/// Tables built by the macros or by `build.rs` point at `static` data. Tables built at run time own
/// a `Vec`. Lookups only ever see `&[T]`, so both kinds behave the same once built.
///
/// Writing through [`DerefMut`] is only possible for run-time storage, which the builders use while
/// filling in slots.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum ConstVec<T> {
    /// A `&'static [T]`, stored as a pointer so that `T` need not be `'static`.
    CompileTime(*const [T]),

    /// Storage owned by a table built at run time.
    #[cfg(feature = "alloc")]
    RunTime(alloc::vec::Vec<T>),
}

// SAFETY: `RunTime` is a `Vec<T>`. `CompileTime` is only built from a `&'static [T]` with `T: Sync`,
// which is `Send`.
unsafe impl<T: Send> Send for ConstVec<T> {}
// SAFETY: As above, `T: Sync` makes both a `Vec<T>` and a `&'static [T]` `Sync`.
unsafe impl<T: Sync> Sync for ConstVec<T> {}

impl<T> ConstVec<T> {
    /// Storage backed by `static` data.
    ///
    /// `T: Sync` because several tables may share one slice across threads.
    #[inline]
    pub const fn from_static_ref(arr: &'static [T]) -> Self
    where
        T: Sync,
    {
        Self::CompileTime(arr)
    }

    /// Storage owned by a run-time table.
    #[cfg(feature = "alloc")]
    #[inline]
    pub const fn from_vec(vec: alloc::vec::Vec<T>) -> Self {
        Self::RunTime(vec)
    }

    /// Fails to compile: run-time storage needs the `alloc` feature.
    #[cfg(not(feature = "alloc"))]
    #[inline]
    pub const fn from_vec(_vec: impl Deref<Target = [T]>) -> Self {
        const {
            panic!("`etools` feature `alloc` is not enabled");
        }
    }
}

#[cfg(feature = "alloc")]
impl<T> From<alloc::vec::Vec<T>> for ConstVec<T> {
    #[inline]
    fn from(vec: alloc::vec::Vec<T>) -> Self {
        Self::from_vec(vec)
    }
}

impl<T> Deref for ConstVec<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        match self {
            // SAFETY: Built from a `&'static [T]`.
            Self::CompileTime(ptr) => unsafe { &**ptr },
            #[cfg(feature = "alloc")]
            Self::RunTime(ref vec) => vec,
        }
    }
}

impl<T> DerefMut for ConstVec<T> {
    /// # Panics
    ///
    /// Panics on `static` storage.
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        match self {
            Self::CompileTime(_) => panic!("static table storage is read-only"),
            #[cfg(feature = "alloc")]
            Self::RunTime(ref mut vec) => vec,
        }
    }
}

#[cfg(feature = "codegen")]
impl<T: super::codegen::Codegen> super::codegen::Codegen for ConstVec<T> {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let const_vec = gen.item("low_level::ConstVec");
        if gen.heap() {
            let data = gen.heap_vec(self);
            quote::quote!(#const_vec::from_vec(#data))
        } else {
            let data = gen.static_slice(self);
            quote::quote!(#const_vec::from_static_ref(#data))
        }
    }
}

#[cfg(feature = "serde")]
mod serde_support {
    use super::ConstVec;
    use serde::ser::{Serialize, SerializeSeq, Serializer};

    impl<T: Serialize> Serialize for ConstVec<T> {
        #[inline]
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for e in &**self {
                seq.serialize_element(e)?;
            }
            seq.end()
        }
    }

    #[cfg(feature = "alloc")]
    impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for ConstVec<T> {
        #[inline]
        fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            alloc::vec::Vec::<T>::deserialize(deserializer).map(Into::into)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_slots() {
        static SLOTS: ConstVec<u16> = ConstVec::from_static_ref(&[3, 0, 2]);
        assert_eq!(SLOTS.get(0), Some(&3));
        assert_eq!(SLOTS.get(2), Some(&2));
        assert_eq!(SLOTS.get(3), None);
        assert_eq!(SLOTS.len(), 3);
    }

    #[test]
    #[should_panic(expected = "static table storage is read-only")]
    fn static_is_immutable() {
        let mut slots = const { ConstVec::from_static_ref(&[1u8, 2, 3]) };
        slots[1] = 0;
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn runtime_is_mutable() {
        let mut slots = ConstVec::from_vec(alloc::vec![7u32, 7, 7]);
        slots[1] = 0;
        assert_eq!(&*slots, &[7, 0, 7]);
    }

    #[cfg(all(feature = "serde", feature = "alloc"))]
    #[test]
    fn serde_reads_into_runtime_storage() {
        static SLOTS: ConstVec<u16> = ConstVec::from_static_ref(&[3, 0, 2]);
        let json = serde_json::to_string(&SLOTS).unwrap();
        assert_eq!(json, "[3,0,2]");
        let mut slots: ConstVec<u16> = serde_json::from_str(&json).unwrap();
        assert!(matches!(slots, ConstVec::RunTime(_)));
        slots[0] = 1;
        assert_eq!(&*slots, &[1, 0, 2]);
    }
}
