//! Benchmarks for version sorting, entropy and archive listing.

#![allow(clippy::unwrap_used)]

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use inspector_core::analysis::shannon_entropy;
use inspector_core::formats::NestedTarArchive;
use inspector_core::test_utils::create_test_gem;
use inspector_core::version::sort_newest_first;
use std::hint::black_box;

/// Mix of standard and legacy version strings, as a long-lived gem has.
fn version_list(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match i % 4 {
            0 => format!("{}.{}.{}", i / 100, i / 10 % 10, i % 10),
            1 => format!("{}.{}.0.rc{}", i / 100, i / 10 % 10, i % 3),
            2 => format!("{}.{}-beta-{}", i / 100, i % 10, i % 7),
            _ => format!("{}.{}.{}.pre", i / 100, i / 10 % 10, i % 10),
        })
        .collect()
}

fn bench_version_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("version_sort");
    for count in [100, 1000] {
        let versions = version_list(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &versions, |b, versions| {
            b.iter(|| {
                let mut sorted = versions.clone();
                sort_newest_first(&mut sorted, String::as_str);
                black_box(sorted)
            });
        });
    }
    group.finish();
}

fn bench_entropy(c: &mut Criterion) {
    let mut group = c.benchmark_group("entropy");
    for size in [4 * 1024, 1024 * 1024] {
        let data: Vec<u8> = (0..size).map(|i| (i * 31 % 251) as u8).collect();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| black_box(shannon_entropy(data)));
        });
    }
    group.finish();
}

fn bench_gem_listing(c: &mut Criterion) {
    let files: Vec<(String, Vec<u8>)> = (0..200)
        .map(|i| (format!("lib/file{i:03}.rb"), format!("# file {i}\n").into_bytes()))
        .collect();
    let gem = create_test_gem(
        b"name: bench\n",
        files.iter().map(|(p, d)| (p.as_str(), d.as_slice())).collect(),
    );

    c.bench_function("nested_tar_open_200", |b| {
        b.iter(|| black_box(NestedTarArchive::new(gem.clone()).unwrap()));
    });
}

criterion_group!(benches, bench_version_sort, bench_entropy, bench_gem_listing);
criterion_main!(benches);
