use tracing::debug;

use crate::hash::{HashFamily, Murmur3};
use crate::{Parameter, SketchError};

/// A value that may be offered to a [`BloomFilter`].
///
/// Only present, non-empty strings take part in the filter. An absent value
/// or an empty string is ignored by [`BloomFilter::add`] and is never
/// reported as contained.
pub trait Item {
    /// Returns the text to hash, or `None` if the value is absent.
    fn as_text(&self) -> Option<&str>;
}

impl Item for str {
    #[inline]
    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl Item for String {
    #[inline]
    fn as_text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T> Item for Option<T>
where
    T: Item,
{
    #[inline]
    fn as_text(&self) -> Option<&str> {
        self.as_ref().and_then(Item::as_text)
    }
}

impl<T> Item for &T
where
    T: Item + ?Sized,
{
    #[inline]
    fn as_text(&self) -> Option<&str> {
        (**self).as_text()
    }
}

/// A Bloom filter over strings with a fixed number of bits.
///
/// Each item sets `num_hashes` bits, the `i`-th chosen by hashing the item
/// with seed `i` modulo the filter size. Bits are stored in a `Vec<u64>` and
/// are never cleared, so an added item is always reported as contained.
///
/// # Examples
///
/// ```
/// use streamsketch::BloomFilter;
///
/// let mut bloom = BloomFilter::new(1000, 3).unwrap();
///
/// bloom.add("password123");
///
/// assert!(bloom.contains("password123"));
/// assert!(!bloom.contains(""));
/// ```
#[derive(Clone, Debug)]
pub struct BloomFilter<F = Murmur3> {
    family:     F,
    // The bit array, 64 bits per word.
    bit_vec:    Vec<u64>,
    // The number of addressable bits.
    size:       usize,
    // The number of hash derivations per item.
    num_hashes: u32,
}

impl BloomFilter<Murmur3> {
    /// Creates a new BloomFilter of `size` bits hashing with [`Murmur3`].
    ///
    /// Fails with [`SketchError::InvalidParameter`] if `size` or
    /// `num_hashes` is zero.
    pub fn new(size: usize, num_hashes: u32) -> Result<Self, SketchError> {
        Self::with_hash_family(size, num_hashes, Murmur3)
    }
}

impl<F> BloomFilter<F>
where
    F: HashFamily,
{
    /// Creates a new BloomFilter hashing with `family`.
    pub fn with_hash_family(
        size: usize,
        num_hashes: u32,
        family: F,
    ) -> Result<Self, SketchError> {
        if size == 0 {
            return Err(SketchError::InvalidParameter(Parameter::Size));
        }
        if num_hashes == 0 {
            return Err(SketchError::InvalidParameter(Parameter::NumHashes));
        }

        debug!(size, num_hashes, "created bloom filter");

        Ok(BloomFilter {
            family:     family,
            bit_vec:    vec![0; (size + 63) / 64],
            size:       size,
            num_hashes: num_hashes,
        })
    }

    /// Adds an item to the filter. Absent or empty items are skipped.
    pub fn add<T>(&mut self, item: &T)
    where
        T: Item + ?Sized,
    {
        let text = match item.as_text() {
            Some(text) if !text.is_empty() => text,
            _ => return,
        };

        for seed in 0..self.num_hashes {
            let (vec_index, mask) = self.get_bit(text, seed);
            self.bit_vec[vec_index] |= mask;
        }
    }

    /// Checks if an item might be in the filter.
    ///
    /// Returns `true` if the item might be present (with a probability of
    /// false positive) and `false` if it is definitely not present. Absent
    /// or empty items are never present.
    pub fn contains<T>(&self, item: &T) -> bool
    where
        T: Item + ?Sized,
    {
        let text = match item.as_text() {
            Some(text) if !text.is_empty() => text,
            _ => return false,
        };

        for seed in 0..self.num_hashes {
            let (vec_index, mask) = self.get_bit(text, seed);
            if (self.bit_vec[vec_index] & mask) == 0 {
                return false;
            }
        }
        true
    }

    /// Returns the number of bits in the filter.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of hash derivations per item.
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Returns the number of bits currently set.
    pub fn count_ones(&self) -> usize {
        self.bit_vec.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns whether the bit at `index` is set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= size`.
    pub fn bit(&self, index: usize) -> bool {
        assert!(index < self.size, "bit index out of range");

        self.bit_vec[index / 64] & (1u64 << (index % 64)) != 0
    }

    /// Returns the approximate memory usage of the bit vector in bytes.
    pub fn memory_usage_bytes(&self) -> usize {
        self.bit_vec.capacity() * 8
    }

    #[inline] // Returns the bit position selected by hash `seed`.
    fn position(&self, text: &str, seed: u32) -> usize {
        self.family.hash(text.as_bytes(), seed) as usize % self.size
    }

    #[inline] // Computes the vector index and bit mask for hash `seed`.
    fn get_bit(&self, text: &str, seed: u32) -> (usize, u64) {
        let bit_index = self.position(text, seed);

        (bit_index / 64, 1u64 << (bit_index % 64))
    }
}
