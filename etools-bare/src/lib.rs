//! This crate provides types for [`etools`](https://docs.rs/etools). Use that crate instead.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod bits;
pub mod codegen;
mod const_vec;
pub mod distinct;
mod error;
mod fks;
mod index;
mod key;
mod llut;
mod lookup;
pub mod mph;

pub use bits::Width;
#[cfg(feature = "build")]
pub use error::BuildError;
pub use fks::{Fks, MAX_MULTIPLIER_SEEDS};
pub use key::Key;
pub use llut::Llut;
pub use lookup::Lookup;
pub use mph::{Backend, Mph, DEFAULT_ALPHA};

/// Public (but hidden) reexports for codegen to access.
#[doc(hidden)]
pub mod low_level {
    pub use super::const_vec::ConstVec;
    pub use super::index::{index_bytes, Indices};
}

#[cfg(test)]
mod tests;
