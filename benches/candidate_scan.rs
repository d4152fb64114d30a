//! Candidate Scan Benchmarks
//!
//! Run with: cargo bench --bench candidate_scan

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use dockercli::plugins::{find_plugin, list_plugin_candidates};
use dockercli::PluginDirs;

/// `num_dirs` directories, each holding `per_dir` plugin candidates plus
/// the same number of unrelated files.
fn populate(num_dirs: usize, per_dir: usize) -> (TempDir, Vec<PathBuf>) {
    let tmp = TempDir::new().unwrap();
    let dirs: Vec<PathBuf> = (0..num_dirs)
        .map(|d| {
            let dir = tmp.path().join(format!("dir{}", d));
            fs::create_dir(&dir).unwrap();
            for i in 0..per_dir {
                fs::write(dir.join(format!("docker-plugin{}", i)), "").unwrap();
                fs::write(dir.join(format!("unrelated{}", i)), "").unwrap();
            }
            dir
        })
        .collect();
    (tmp, dirs)
}

fn benchmark_list_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_plugin_candidates");

    for per_dir in [10, 100, 1000].iter() {
        let (_tmp, dirs) = populate(4, *per_dir);
        group.throughput(Throughput::Elements((4 * per_dir) as u64));
        group.bench_with_input(format!("{}_per_dir", per_dir), &dirs, |b, dirs| {
            b.iter(|| list_plugin_candidates(black_box(dirs)).unwrap());
        });
    }

    group.finish();
}

fn benchmark_find_missing(c: &mut Criterion) {
    let (_tmp, dirs) = populate(8, 100);
    let dirs = PluginDirs::from_dirs(dirs);

    let mut group = c.benchmark_group("find_plugin");

    // Never spawns: every directory is probed and nothing matches
    group.bench_function("not_found", |b| {
        b.iter(|| find_plugin(black_box("nonexistent"), &dirs, &(), true).unwrap_err());
    });

    group.bench_function("invalid_name", |b| {
        b.iter(|| find_plugin(black_box("Not-Valid"), &dirs, &(), true).unwrap_err());
    });

    group.finish();
}

criterion_group!(benches, benchmark_list_candidates, benchmark_find_missing);
criterion_main!(benches);
