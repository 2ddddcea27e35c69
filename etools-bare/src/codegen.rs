#![cfg(feature = "codegen")]

//! Turning built tables back into Rust.
//!
//! Tables are expensive to build and cheap to describe, so `build.rs` scripts and the table macros
//! build them once on the host and emit an expression that rebuilds the same table from literal
//! data on the target. The expression has to be given a type at the use site, typically by
//! initializing a `static`.
//!
//! Storage is emitted as `static` slices by default, which makes the result usable in `static`
//! initializers. [`CodeGenerator::set_heap`] switches to `Vec`-backed storage instead. This needs
//! the `alloc` feature of `etools` at the use site.
//!
//! ```rust
//! # extern crate etools_bare as etools;
//! # fn main() -> Result<(), etools::BuildError> {
//! let table: etools::Fks<u32> = etools::Fks::try_from_keys(&[3, 1_000, 77_777])?;
//! let code = etools::codegen::CodeGenerator::new().generate(&table);
//! assert!(code.to_string().contains("__from_raw_parts"));
//!
//! // Write `code` to `$OUT_DIR/table.rs`, then:
//! // static TABLE: etools::Fks<u32> = include!(concat!(env!("OUT_DIR"), "/table.rs"));
//! # Ok(())
//! # }
//! ```

use alloc::collections::BTreeMap;
use proc_macro2::{Ident, Literal, TokenStream, TokenTree};
use quote::{format_ident, quote};

/// Emits expressions that rebuild tables.
///
/// The output has the shape
///
/// ```ignore
/// {
///     extern crate alloc as __alloc; // heap storage only
///     use ::etools::Fks as __Fks;
///     use ::etools::low_level::ConstVec as __low_level_ConstVec;
///     __Fks::__from_raw_parts(/* ... */)
/// }
/// ```
///
/// Every `etools` item is imported once under a mangled alias, so that the expression neither
/// depends on nor collides with names at the use site.
pub struct CodeGenerator {
    /// Path to the `etools` crate as seen from the use site.
    root: TokenStream,

    /// Items referenced so far, keyed by their path inside `etools`.
    items: BTreeMap<&'static str, Ident>,

    heap: bool,

    /// Whether heap storage has been emitted, so `alloc` must be linked.
    uses_alloc: bool,
}

impl CodeGenerator {
    /// A generator that emits `static` storage and reaches `etools` as `::etools`.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: quote!(::etools),
            items: BTreeMap::new(),
            heap: false,
            uses_alloc: false,
        }
    }

    /// Set the path the generated code uses to reach `etools`.
    ///
    /// The table macros pass `$crate` here, so that their output works wherever `etools` is
    /// re-exported from.
    #[inline]
    pub fn set_root(&mut self, root: TokenStream) {
        self.root = root;
    }

    /// Emit `Vec`-backed storage instead of `static` slices.
    #[inline]
    pub fn set_heap(&mut self, heap: bool) {
        self.heap = heap;
    }

    /// Whether storage is emitted on the heap.
    #[inline]
    #[must_use]
    pub const fn heap(&self) -> bool {
        self.heap
    }

    /// Turn a value into a complete expression.
    #[inline]
    pub fn generate<T: Codegen>(mut self, value: &T) -> TokenStream {
        let value = self.piece(value);
        let extern_alloc = self
            .uses_alloc
            .then(|| quote!(extern crate alloc as __alloc;));
        let root = &self.root;
        let uses = self.items.iter().map(|(path, alias)| {
            let segments = path.split("::").map(|segment| format_ident!("{segment}"));
            quote!(use #root #(:: #segments)* as #alias;)
        });
        quote!({
            #extern_alloc
            #(#uses)*
            #value
        })
    }

    /// Emit a value nested inside another one.
    #[inline]
    pub fn piece<T: Codegen>(&mut self, value: &T) -> TokenStream {
        value.generate_piece(self)
    }

    /// Reference an item of `etools` by its path from the crate root, e.g. `Width::W32`.
    #[inline]
    pub fn item(&mut self, path: &'static str) -> TokenStream {
        let alias = self
            .items
            .entry(path)
            .or_insert_with(|| format_ident!("__{}", path.replace("::", "_")));
        quote!(#alias)
    }

    /// Emit a `&'static [T]` with the given contents.
    ///
    /// Byte slices are emitted as byte string literals.
    #[inline]
    pub fn static_slice<T: Codegen>(&mut self, elements: &[T]) -> TokenStream {
        if let Some(bytes) = as_bytes(elements) {
            return TokenTree::Literal(Literal::byte_string(bytes)).into();
        }
        let elements = elements.iter().map(|element| self.piece(element));
        quote!(&[#(#elements),*])
    }

    /// Emit a `Vec<T>` with the given contents.
    #[inline]
    pub fn heap_vec<T: Codegen>(&mut self, elements: &[T]) -> TokenStream {
        self.uses_alloc = true;
        let elements = elements.iter().map(|element| self.piece(element));
        quote!(__alloc::vec![#(#elements),*])
    }
}

impl Default for CodeGenerator {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Values that can be turned into code.
///
/// Tables are rebuilt through `#[doc(hidden)]` constructors such as `Fks::__from_raw_parts`,
/// which take the internal state verbatim. They are not `unsafe`, but nothing outside generated
/// code should call them.
pub trait Codegen: Sized {
    /// Emit an expression evaluating to this value.
    ///
    /// Only called from other [`Codegen`] implementations. Use [`CodeGenerator::generate`] for a
    /// complete expression.
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream;
}

macro_rules! literal {
    ($($ty:ty => $method:ident,)*) => {
        $(
            impl Codegen for $ty {
                #[inline]
                fn generate_piece(&self, _gen: &mut CodeGenerator) -> TokenStream {
                    TokenTree::Literal(Literal::$method(*self)).into()
                }
            }
        )*
    };
}

literal! {
    u8 => u8_unsuffixed,
    u16 => u16_unsuffixed,
    u32 => u32_unsuffixed,
    u64 => u64_unsuffixed,
    usize => usize_unsuffixed,
}

/// `Some` if `T` is `u8`.
fn as_bytes<T>(elements: &[T]) -> Option<&[u8]> {
    if typeid::of::<T>() == typeid::of::<u8>() {
        // SAFETY: `T` is `u8`, which has no lifetimes, so the types are identical.
        Some(unsafe { core::slice::from_raw_parts(elements.as_ptr().cast::<u8>(), elements.len()) })
    } else {
        None
    }
}
