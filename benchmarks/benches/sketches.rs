extern crate rand;
extern crate streamsketch;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;

use streamsketch::{BloomFilter, HyperLogLog};

fn generate_strings(count: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();

    let mut workload: Vec<String> = (0..count)
        .map(|_| format!("- {} - {} -", rng.gen::<u64>(), rng.gen::<u64>()))
        .collect();

    workload.shuffle(&mut rng);

    workload
}

fn bench_hyperloglog_add(c: &mut Criterion) {
    let workload = generate_strings(2000);

    macro_rules! bench_impls {
        ($testname:expr, $precision:expr) => {
            c.bench_function($testname, |b| {
                b.iter(|| {
                    let mut hll = HyperLogLog::new($precision).unwrap();

                    for val in &workload {
                        hll.add(val);
                    }
                })
            });
        };
    }

    bench_impls!["hyperloglog_add_p8", 8];
    bench_impls!["hyperloglog_add_p14", 14];
    bench_impls!["hyperloglog_add_p16", 16];
}

fn bench_hyperloglog_count(c: &mut Criterion) {
    macro_rules! bench_impls {
        ($testname:expr, $precision:expr, $count:expr) => {
            let workload = generate_strings($count);

            let mut hll = HyperLogLog::new($precision).unwrap();

            for val in &workload {
                hll.add(val);
            }

            c.bench_function($testname, |b| {
                b.iter(|| {
                    let val = hll.count();
                    black_box(val);
                })
            });
        };
    }

    bench_impls!["hyperloglog_count_p8", 8, 20_000];
    bench_impls!["hyperloglog_count_p14", 14, 100_000];
    bench_impls!["hyperloglog_count_p16", 16, 500_000];
}

fn bench_bloom(c: &mut Criterion) {
    let workload = generate_strings(2000);
    let probes = generate_strings(2000);

    c.bench_function("bloom_add_k3", |b| {
        b.iter(|| {
            let mut bloom = BloomFilter::new(1 << 16, 3).unwrap();

            for val in &workload {
                bloom.add(val);
            }
        })
    });

    let mut bloom = BloomFilter::new(1 << 16, 3).unwrap();

    for val in &workload {
        bloom.add(val);
    }

    c.bench_function("bloom_contains_k3", |b| {
        b.iter(|| {
            for val in workload.iter().chain(probes.iter()) {
                black_box(bloom.contains(val));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_hyperloglog_add,
    bench_hyperloglog_count,
    bench_bloom
);

criterion_main!(benches);
