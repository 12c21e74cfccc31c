use proptest::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand::Rng;

use streamsketch::HyperLogLog;

// Adds `count` distinct strings and returns the relative error.
fn relative_error(count: usize, precision: u8, seed: u64) -> f64 {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut hll = HyperLogLog::new(precision).unwrap();

    for i in 0..count {
        hll.add(&format!("- {} - {} -", i, rng.gen::<u64>()));
    }

    (hll.count() - count as f64).abs() / count as f64
}

#[test]
fn test_accuracy_p14() {
    for &count in &[1_000, 10_000, 100_000, 1_000_000] {
        let error = relative_error(count, 14, 0x5eed);

        assert!(error <= 0.05, "count {} error {}", count, error);
    }
}

#[test]
fn test_accuracy_ip_strings() {
    let mut hll = HyperLogLog::new(14).unwrap();

    for i in 0u32..200_000 {
        hll.add(&format!(
            "{}.{}.{}.{}",
            i >> 24,
            (i >> 16) & 0xff,
            (i >> 8) & 0xff,
            i & 0xff
        ));
    }

    let error = (hll.count() - 200_000.0).abs() / 200_000.0;

    assert!(error <= 0.05, "error {}", error);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn prop_accuracy_p14(
        count in prop_oneof![Just(1_000usize), Just(5_000), Just(20_000), Just(150_000)],
        seed in any::<u64>(),
    ) {
        let error = relative_error(count, 14, seed);

        prop_assert!(error <= 0.05, "count {} error {}", count, error);
    }
}
