use core::fmt;

use tracing::debug;

use crate::common::*;
use crate::hash::{HashFamily, Murmur3};
use crate::{Parameter, SketchError};

/// Implements the original HyperLogLog algorithm for cardinality estimation.
///
/// This implementation is based on the original paper of P. Flajolet et al:
///
/// *HyperLogLog: the analysis of a near-optimal cardinality estimation
/// algorithm.*
///
/// - Hashes every value to 32 bits. The lower `precision` bits select a
///   register, the remaining bits give the rank stored in it.
/// - Uses 5-bit registers, packed in a 32-bit unsigned integer.
/// - Applies the small range correction (linear counting) but no large
///   range correction, so estimates approaching 2<sup>32</sup> are biased.
///
/// # Examples
///
/// ```
/// use streamsketch::HyperLogLog;
///
/// let mut hll = HyperLogLog::new(14).unwrap();
///
/// hll.add("10.0.0.1");
/// hll.add("10.0.0.2");
/// hll.add("10.0.0.1");
///
/// assert_eq!(hll.count().round() as u32, 2);
/// ```
///
/// # References
///
/// - ["HyperLogLog: the analysis of a near-optimal cardinality estimation
///   algorithm", Philippe Flajolet, Éric Fusy, Olivier Gandouet and Frédéric
///   Meunier.](http://algo.inria.fr/flajolet/Publications/FlFuGaMe07.pdf)
///
#[derive(Clone, Debug)]
pub struct HyperLogLog<F = Murmur3> {
    family:    F,
    count:     usize,
    precision: u8,
    alpha:     f64,
    registers: Registers,
}

impl HyperLogLog<Murmur3> {
    /// Creates a new HyperLogLog instance hashing with [`Murmur3`].
    ///
    /// Fails with [`SketchError::InvalidParameter`] unless
    /// `4 <= precision <= 16`.
    pub fn new(precision: u8) -> Result<Self, SketchError> {
        Self::with_hash_family(precision, Murmur3)
    }
}

impl<F> HyperLogLog<F>
where
    F: HashFamily,
{
    // Minimum precision allowed.
    const MIN_PRECISION: u8 = 4;
    // Maximum precision allowed.
    const MAX_PRECISION: u8 = 16;
    // Width of the hash values.
    const HASH_BITS: u8 = 32;
    // Seed of the single hash function.
    const SEED: u32 = 0;

    /// Creates a new HyperLogLog instance hashing with `family`.
    pub fn with_hash_family(
        precision: u8,
        family: F,
    ) -> Result<Self, SketchError> {
        // Ensure the specified precision is within bounds.
        if precision < Self::MIN_PRECISION || precision > Self::MAX_PRECISION {
            return Err(SketchError::InvalidParameter(Parameter::Precision));
        }

        // Calculate register count based on given precision.
        let count = Self::register_count(precision);

        debug!(precision, registers = count, "created hyperloglog");

        Ok(HyperLogLog {
            family:    family,
            count:     count,
            precision: precision,
            alpha:     Self::alpha(count),
            registers: Registers::with_count(count),
        })
    }

    /// Adds a new value to the multiset.
    ///
    /// The value is hashed through its string representation, so `42` and
    /// `"42"` are the same element.
    pub fn add<T>(&mut self, value: &T)
    where
        T: fmt::Display + ?Sized,
    {
        let hash = self.family.hash(value.to_string().as_bytes(), Self::SEED);

        self.add_hash(hash);
    }

    /// Estimates the cardinality of the multiset.
    pub fn count(&self) -> f64 {
        // Calculate the raw estimate.
        let (mut raw, zeros) =
            Self::estimate_raw(self.registers.iter(), self.count, self.alpha);

        if raw <= 2.5 * self.count as f64 && zeros != 0 {
            // Apply small range correction.
            raw = Self::linear_count(self.count, zeros);
        }

        raw
    }

    /// Returns the precision of the HyperLogLog instance.
    #[inline]
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Returns the number of registers, `2^precision`.
    #[inline]
    pub fn num_registers(&self) -> usize {
        self.count
    }

    /// Returns the bias correction constant in use.
    #[inline]
    pub fn bias_correction(&self) -> f64 {
        self.alpha
    }

    /// Returns an iterator over the register values.
    #[inline]
    pub fn registers(&self) -> impl Iterator<Item = u32> + '_ {
        self.registers.iter()
    }

    /// Returns the memory used by the registers in bytes.
    #[inline]
    pub fn size_in_bytes(&self) -> usize {
        self.registers.size_in_bytes()
    }

    #[inline] // Updates the register selected by `hash`.
    fn add_hash(&mut self, hash: u32) {
        // The lower `precision` bits select the register.
        let index = (hash & (self.count as u32 - 1)) as usize;

        // The remaining bits, right aligned.
        let remainder = hash >> self.precision;

        // The leftmost set bit position of the remainder field, counting
        // from 1 at its top. An all zero field yields HASH_BITS - p + 1.
        let rank = remainder.leading_zeros() + 1 - u32::from(self.precision);

        debug_assert!(rank <= u32::from(Self::HASH_BITS - self.precision) + 1);

        // Update the register with the max rank.
        self.registers.set_greater(index, rank);
    }
}

impl<F> HyperLogLogCommon for HyperLogLog<F> where F: HashFamily {}
