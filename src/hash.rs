const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// A family of seeded 32-bit hash functions.
///
/// For a fixed input, outputs obtained with different seeds must behave as
/// independent uniform draws. [`BloomFilter`](crate::BloomFilter) derives
/// its positions from seeds `0..num_hashes` and
/// [`HyperLogLog`](crate::HyperLogLog) hashes with seed `0`.
pub trait HashFamily {
    /// Hashes `bytes` with the function selected by `seed`.
    fn hash(&self, bytes: &[u8], seed: u32) -> u32;
}

/// MurmurHash3 x86 32-bit, keyed by its seed.
///
/// Produces the same values as the reference implementation, so hashing a
/// UTF-8 string matches other MurmurHash3 ports that hash the encoded bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Murmur3;

impl HashFamily for Murmur3 {
    fn hash(&self, bytes: &[u8], seed: u32) -> u32 {
        let mut h1 = seed;

        let mut blocks = bytes.chunks_exact(4);

        for block in &mut blocks {
            let k1 = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);

            h1 ^= mix_k1(k1);
            h1 = h1.rotate_left(13);
            h1 = h1.wrapping_mul(5).wrapping_add(0xe654_6b64);
        }

        // tail
        let tail = blocks.remainder();
        if !tail.is_empty() {
            let mut k1: u32 = 0;
            for (i, byte) in tail.iter().enumerate() {
                k1 ^= u32::from(*byte) << (8 * i);
            }
            h1 ^= mix_k1(k1);
        }

        h1 ^= bytes.len() as u32;

        fmix32(h1)
    }
}

#[inline]
fn mix_k1(mut k1: u32) -> u32 {
    k1 = k1.wrapping_mul(C1);
    k1 = k1.rotate_left(15);
    k1.wrapping_mul(C2)
}

// Finalization mix: force all bits of the hash to avalanche.
#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^ (h >> 16)
}
