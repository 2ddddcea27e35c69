//! Table construction errors.

#![cfg(feature = "build")]

use displaydoc::Display;
use thiserror::Error;

/// Why a table could not be built.
#[derive(Clone, Copy, Debug, Display, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BuildError {
    /// the key set is empty
    Empty,

    /// key #{index} repeats an earlier key
    DuplicateKey {
        /// Position of the repeated key in the input.
        index: usize,
    },

    /// a table over keys up to {max_key} does not fit in the address space
    TableTooLarge {
        /// The largest key of the set.
        max_key: u64,
    },

    /// no collision-free multiplier found for bucket #{bucket}
    MultiplierSearchExhausted {
        /// Index of the first-level bucket that failed.
        bucket: usize,
    },
}
