//! Exact and approximate distinct counts over the same stream.
//!
//! [`exact_unique_count`] keeps every distinct item in memory and serves as
//! ground truth; [`hll_unique_count`] uses `2^precision` registers whatever
//! the stream size.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use crate::hyperloglog::HyperLogLog;
use crate::SketchError;

/// Returns the number of distinct items.
pub fn exact_unique_count<I>(items: I) -> usize
where
    I: IntoIterator,
    I::Item: Hash + Eq,
{
    items.into_iter().collect::<HashSet<_>>().len()
}

/// Estimates the number of distinct items with a fresh [`HyperLogLog`] of
/// the given `precision`.
pub fn hll_unique_count<I>(items: I, precision: u8) -> Result<f64, SketchError>
where
    I: IntoIterator,
    I::Item: fmt::Display,
{
    let mut hll = HyperLogLog::new(precision)?;

    for item in items {
        hll.add(&item);
    }

    Ok(hll.count())
}
