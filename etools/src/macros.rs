//! Macros for compile time generation.
//!
//! Unlike `try_from_keys` methods, these macros are zero-cost in runtime: the table is built while
//! your crate compiles and embedded as `static` data. Use them whenever the keys are known in
//! advance.
//!
//!
//! # Syntax
//!
//! Every macro takes the key type, a semicolon, and the keys in dense index order:
//!
//! ```rust
//! let table: &etools::Fks<u32> = etools::fks!(u32; 7, 1_000, 0x8000_0000);
//! assert_eq!(table.lookup(1_000), 1);
//! ```
//!
//! The key type is one of `u8`, `u16`, `u32`, `u64`, `usize`. Keys are:
//!
//! - Integer literals, possibly suffixed with the key type
//! - `MIN` and `MAX` of the key type, e.g. `u16::MAX`
//! - Ranges of the above, `a..b` or `a..=b`, expanded in order
//!
//! ```rust
//! let table = etools::llut!(u8; 0..4, 10, u8::MAX);
//! assert_eq!(table.lookup(3), 3);
//! assert_eq!(table.lookup(10), 4);
//! assert_eq!(table.lookup(255), 5);
//! assert_eq!(table.lookup(4), 6);
//! ```
//!
//! Other expressions, such as named constants, cannot be evaluated by a macro. If keys need to be
//! computed, build the table in `build.rs` and use [`codegen`](crate::codegen) instead.
//!
//!
//! # Errors
//!
//! Duplicate keys, empty key sets, and literals that don't fit the key type are compile errors:
//!
//! ```compile_fail
//! let table = etools::fks!(u16; 1, 2, 1);
//! ```
//!
//! ```compile_fail
//! let table = etools::fks!(u16;);
//! ```
//!
//! ```compile_fail
//! let table = etools::llut!(u8; 1, 256);
//! ```
//!
//!
//! # Identity
//!
//! Each macro call site expands to its own `static`, so evaluating it repeatedly returns the same
//! reference. Tables are built once per target pointer width, because hashing is performed on
//! native words.

#[doc(hidden)]
pub use etools_macros;

// Two reasons for `macro_rules!` instead of a direct reexport:
// 1. Document the accepted syntax.
// 2. Pass `$crate` to the macro.

/// Create an [`Llut`](crate::Llut) in compile time.
///
/// See [module-level documentation](self) for more information.
///
///
/// # Example
///
/// ```rust
/// static OPCODES: &etools::Llut<u8> = etools::llut!(u8; 0x01, 0x03, 0x05, 0x06);
///
/// assert_eq!(OPCODES.lookup(0x05), 2);
/// assert_eq!(OPCODES.lookup(0x02), OPCODES.not_found());
/// assert_eq!(OPCODES.table_size(), 7);
/// ```
#[cfg(doc)]
#[macro_export]
macro_rules! llut {
    // Not actually valid/usable macro rules, but close enough for docs.
    ($key_type:ty; $($key:expr),* $(,)?) => {
        // Doesn't need to typecheck, but needs to parse.
        ()
    };
}

/// Create an [`Fks`](crate::Fks) in compile time.
///
/// See [module-level documentation](self) for more information.
///
///
/// # Example
///
/// ```rust
/// static IDS: &etools::Fks<u64> = etools::fks!(u64; 0xdead_beef, 0, u64::MAX);
///
/// assert_eq!(IDS.lookup(0xdead_beef), 0);
/// assert_eq!(IDS.lookup(u64::MAX), 2);
/// assert!(!IDS.contains(1));
/// ```
#[cfg(doc)]
#[macro_export]
macro_rules! fks {
    // Not actually valid/usable macro rules, but close enough for docs.
    ($key_type:ty; $($key:expr),* $(,)?) => {
        // Doesn't need to typecheck, but needs to parse.
        ()
    };
}

/// Create an [`Mph`](crate::Mph) in compile time.
///
/// See [module-level documentation](self) for more information. `alpha` tunes the backend
/// selector, see [`mph`](crate::mph) for the cost model; it defaults to
/// [`DEFAULT_ALPHA`](crate::DEFAULT_ALPHA).
///
///
/// # Example
///
/// ```rust
/// use etools::Backend;
///
/// static DENSE: &etools::Mph<u8> = etools::mph!(u8; 2, 5, 7, 8, 9);
/// static SPARSE: &etools::Mph<u16> = etools::mph!(u16, alpha = 3; 1, 10_000, 60_000);
///
/// assert_eq!(DENSE.backend(), Backend::Llut);
/// assert_eq!(SPARSE.backend(), Backend::Fks);
/// assert_eq!(SPARSE.lookup(60_000), 2);
/// ```
#[cfg(doc)]
#[macro_export]
macro_rules! mph {
    // Not actually valid/usable macro rules, but close enough for docs.
    ($key_type:ty $(, alpha = $alpha:literal)?; $($key:expr),* $(,)?) => {
        // Doesn't need to typecheck, but needs to parse.
        ()
    };
}

#[cfg(not(doc))]
#[macro_export]
macro_rules! llut {
    ($($tt:tt)*) => {
        $crate::macros::etools_macros::llut!(crate $crate; $($tt)*)
    };
}

#[cfg(not(doc))]
#[macro_export]
macro_rules! fks {
    ($($tt:tt)*) => {
        $crate::macros::etools_macros::fks!(crate $crate; $($tt)*)
    };
}

#[cfg(not(doc))]
#[macro_export]
macro_rules! mph {
    ($($tt:tt)*) => {
        $crate::macros::etools_macros::mph!(crate $crate; $($tt)*)
    };
}

pub use fks;
pub use llut;
pub use mph;
