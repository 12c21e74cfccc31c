//! Bounded-memory sketches for large streams of discrete items.
//!
//! Two independent structures are provided:
//!
//! * [`BloomFilter`]: approximate set membership. Never reports a false
//!   negative; the false positive rate depends on the filter size, the
//!   number of hash derivations and the number of items added.
//! * [`HyperLogLog`]: approximate distinct counting, as described by
//!   P. Flajolet et al. in *HyperLogLog: the analysis of a near-optimal
//!   cardinality estimation algorithm*. The relative error depends only on
//!   the precision, not on the size of the stream.
//!
//! Both hash their input through a [`HashFamily`], a seeded 32-bit hash.
//! [`Murmur3`] is used unless another family is given.
//!
//! The [`password`] and [`count`] modules compose the structures into the
//! two classic uses: checking candidate passwords against a set of used ones
//! and counting unique addresses in an access log loaded by [`ingest`].

#![cfg_attr(feature = "bench-units", feature(test))]

use std::error;
use std::fmt;

mod bloom;
mod common;
pub mod count;
mod hash;
mod hyperloglog;
pub mod ingest;
pub mod password;

pub use crate::bloom::{BloomFilter, Item};
pub use crate::hash::{HashFamily, Murmur3};
pub use crate::hyperloglog::HyperLogLog;

/// The construction argument rejected by a [`SketchError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parameter {
    /// Bloom filter size in bits.
    Size,
    /// Number of Bloom filter hash derivations.
    NumHashes,
    /// HyperLogLog precision.
    Precision,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SketchError {
    InvalidParameter(Parameter),
}

impl fmt::Display for SketchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchError::InvalidParameter(Parameter::Size) => {
                "size must be a positive integer.".fmt(f)
            },
            SketchError::InvalidParameter(Parameter::NumHashes) => {
                "num_hashes must be a positive integer.".fmt(f)
            },
            SketchError::InvalidParameter(Parameter::Precision) => {
                "precision is out of bounds.".fmt(f)
            },
        }
    }
}

impl error::Error for SketchError {}
