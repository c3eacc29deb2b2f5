//! Trie Granularity Benchmarks
//!
//! Compares insert, lookup and remove throughput of the radix trie at bit,
//! byte and component granularity over the same synthetic name sets.
//!
//! To run the benchmarks:
//! ```bash
//! cargo bench --features benchmarking
//! ```

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, SamplingMode,
    Throughput,
};
use std::time::Duration;

use trie_granularity_lib::bench::synthetic_names;
use trie_granularity_lib::data_structures::radix_trie::{
    BitGranularity, ByteGranularity, ComponentGranularity, Granularity, LookupMode, RadixTrie,
};

const SIZES: [usize; 3] = [100, 1_000, 10_000];
const SEED: u64 = 0x5eed;

fn build<G: Granularity>(names: &[String]) -> RadixTrie<G> {
    let mut trie = RadixTrie::<G>::new();
    for name in names {
        let _ = trie.insert(name);
    }
    trie
}

fn bench_granularity<G: Granularity>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("radix_trie_{}", G::NAME));
    group.sampling_mode(SamplingMode::Flat);
    group.measurement_time(Duration::from_secs(2));
    group.warm_up_time(Duration::from_secs(1));

    for size in SIZES {
        let names = synthetic_names(size, SEED);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("insert", size), &names, |b, names| {
            b.iter(|| black_box(build::<G>(names)));
        });

        let trie = build::<G>(&names);
        group.bench_with_input(BenchmarkId::new("lookup_exact", size), &names, |b, names| {
            b.iter(|| {
                for name in names {
                    black_box(trie.lookup(name, LookupMode::Exact).ok());
                }
            });
        });

        group.bench_with_input(
            BenchmarkId::new("lookup_longest_prefix", size),
            &names,
            |b, names| {
                b.iter(|| {
                    for name in names {
                        let probe = format!("{name}/segment");
                        black_box(trie.lookup(&probe, LookupMode::LongestPrefix).ok());
                    }
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("remove", size), &names, |b, names| {
            b.iter_batched(
                || build::<G>(names),
                |mut trie| {
                    for name in names {
                        black_box(trie.remove(name).ok());
                    }
                    trie
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_bit(c: &mut Criterion) {
    bench_granularity::<BitGranularity>(c);
}

fn bench_byte(c: &mut Criterion) {
    bench_granularity::<ByteGranularity>(c);
}

fn bench_component(c: &mut Criterion) {
    bench_granularity::<ComponentGranularity>(c);
}

criterion_group!(benches, bench_bit, bench_byte, bench_component);
criterion_main!(benches);
