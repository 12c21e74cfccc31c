use proptest::prelude::*;

use streamsketch::{BloomFilter, HyperLogLog};

fn set_bits(bloom: &BloomFilter) -> Vec<bool> {
    (0..bloom.size()).map(|i| bloom.bit(i)).collect()
}

proptest! {
    #[test]
    fn prop_no_false_negatives(
        items in prop::collection::vec("[a-z0-9]{1,16}", 1..64),
        size in 64usize..4096,
        num_hashes in 1u32..8,
    ) {
        let mut bloom = BloomFilter::new(size, num_hashes).unwrap();

        for (i, item) in items.iter().enumerate() {
            bloom.add(item);

            for added in &items[..=i] {
                prop_assert!(bloom.contains(added));
            }
        }
    }

    #[test]
    fn prop_bits_are_monotonic(
        items in prop::collection::vec(".{0,12}", 1..32),
        size in 8usize..512,
        num_hashes in 1u32..6,
    ) {
        let mut bloom = BloomFilter::new(size, num_hashes).unwrap();
        let mut before = set_bits(&bloom);

        for item in &items {
            bloom.add(item);

            let after = set_bits(&bloom);

            for (was, is) in before.iter().zip(after.iter()) {
                prop_assert!(!*was || *is);
            }
            if item.is_empty() {
                prop_assert_eq!(&before, &after);
            }

            before = after;
        }

        prop_assert!(!bloom.contains(""));
    }

    #[test]
    fn prop_bloom_add_is_idempotent(item in ".{1,32}") {
        let mut once = BloomFilter::new(256, 4).unwrap();
        once.add(&item);

        let mut twice = once.clone();
        twice.add(&item);

        prop_assert_eq!(set_bits(&once), set_bits(&twice));
    }

    #[test]
    fn prop_registers_are_monotonic(
        items in prop::collection::vec(any::<u64>(), 1..128),
        precision in 4u8..=16,
    ) {
        let mut hll = HyperLogLog::new(precision).unwrap();
        let max_rank = 32 - u32::from(precision) + 1;

        let mut before: Vec<u32> = hll.registers().collect();

        for item in &items {
            hll.add(item);

            let after: Vec<u32> = hll.registers().collect();

            for (was, is) in before.iter().zip(after.iter()) {
                prop_assert!(was <= is);
                prop_assert!(*is <= max_rank);
            }

            before = after;
        }
    }

    #[test]
    fn prop_hll_add_is_idempotent(item in ".{0,32}", precision in 4u8..=16) {
        let mut once = HyperLogLog::new(precision).unwrap();
        once.add(item.as_str());

        let mut twice = once.clone();
        twice.add(item.as_str());

        prop_assert!(once.registers().eq(twice.registers()));
        prop_assert_eq!(once.count(), twice.count());
    }
}
