//! Allocation-free lookup structures over fixed integer key sets.
//!
//! This crate maps a fixed, ordered set of distinct unsigned integers to dense indices `0..N`, and
//! everything else to the sentinel `N`. The result can index a plain array, so the structures
//! double as static maps, sets, and dispatch tables, with no allocation at use time.
//!
//!
//! # Tables
//!
//! - [`Llut`] is a direct lookup table: one entry per possible key up to the largest one. Fastest,
//!   but only small for dense keys.
//! - [`Fks`] is a two-level perfect hash table: a few words per key, two multiplications per lookup,
//!   and a final comparison against the stored key.
//! - [`Mph`] picks whichever of the two is cheaper for the given keys.
//!
//! All of them implement [`Lookup`].
//!
//! Tables can be built in several ways:
//!
//! 1. In compile time with the macros [`llut!`], [`fks!`], and [`mph!`]. Zero-cost in runtime.
//! 2. In runtime with `try_from_keys` methods, under the `build` feature.
//! 3. In `build.rs` with `try_from_keys`, translated to code with [`codegen`] and then
//!    `include!`d. Zero-cost in runtime and supports programmatic generation.
//! 4. Built, saved with [`serde`](https://docs.rs/serde), and validated when loaded back.
//!
//! ```rust
//! static PORTS: &etools::Mph<u16> = etools::mph!(u16; 22, 80, 443, 8080);
//!
//! let names = ["ssh", "http", "https", "proxy", "unknown"];
//! assert_eq!(names[PORTS.lookup(443)], "https");
//! assert_eq!(names[PORTS.lookup(21)], "unknown");
//! ```
//!
//!
//! # Slots and registries
//!
//! [`Slot`] holds at most one object and can live in `static` storage. [`Registry`] combines a
//! table with one slot per key, forming a factory for a closed set of [`Variants`].

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod macros;
mod registry;
mod slot;

pub use etools_bare::{
    assert_distinct, bits, distinct, low_level, mph, Backend, Fks, Key, Llut, Lookup, Mph, Width,
    DEFAULT_ALPHA, MAX_MULTIPLIER_SEEDS,
};
#[cfg(feature = "build")]
pub use etools_bare::BuildError;
#[cfg(feature = "codegen")]
pub use etools_bare::codegen;
pub use registry::{Registry, Variants};
pub use slot::Slot;

#[cfg(test)]
mod tests;
