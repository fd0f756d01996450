//! Benchmarks for the find-mode sweeps

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mac_sweeper::sweep::{sweep, ExclusionSet, SweepTarget};
use std::fs::{self, File};
use std::path::Path;
use tempfile::TempDir;

/// `dir_count` directories holding `file_count` sparse files between them,
/// sized 1 KiB .. `file_count` KiB.
fn create_benchmark_dir(file_count: usize, dir_count: usize) -> TempDir {
    let dir = TempDir::new().unwrap();

    for f in 0..file_count {
        let subdir = dir.path().join(format!("dir{}", f % dir_count));
        fs::create_dir_all(&subdir).unwrap();
        File::create(subdir.join(format!("file{}.bin", f)))
            .unwrap()
            .set_len((f as u64 + 1) * 1024)
            .unwrap();
    }

    dir
}

fn benchmark_find_large(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_large");
    let exclusions = ExclusionSet::new(Path::new("/nonexistent-home"));

    for size in [100, 1000, 5000].iter() {
        let dir = create_benchmark_dir(*size, 20);

        group.bench_with_input(BenchmarkId::new("limit_20", size), size, |b, _| {
            let target = SweepTarget::find_large(dir.path(), 0).with_limit(20);
            b.iter(|| sweep(black_box(&target), &exclusions))
        });

        group.bench_with_input(BenchmarkId::new("unlimited", size), size, |b, _| {
            let target = SweepTarget::find_large(dir.path(), 0);
            b.iter(|| sweep(black_box(&target), &exclusions))
        });
    }

    group.finish();
}

fn benchmark_find_old(c: &mut Criterion) {
    let exclusions = ExclusionSet::new(Path::new("/nonexistent-home"));
    let dir = create_benchmark_dir(1000, 20);
    let target = SweepTarget::find_old(dir.path(), 0).with_limit(50);

    c.bench_function("find_old_1000", |b| {
        b.iter(|| sweep(black_box(&target), &exclusions))
    });
}

criterion_group!(benches, benchmark_find_large, benchmark_find_old);
criterion_main!(benches);
