use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use garment_provenance::proof::{
    build_root_with_mode, leaf_hash, verify_proof, HashMode, MerkleTree,
};

fn evidence(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("process:facility-{}:{}", i, 1_700_000_000_000i64 + i as i64))
        .collect()
}

fn bench_root(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_root");
    for n in [3usize, 64, 1024] {
        let items = evidence(n);
        for mode in [HashMode::Compat, HashMode::DomainSeparated] {
            group.bench_with_input(BenchmarkId::new(mode.as_str(), n), &items, |b, items| {
                b.iter(|| build_root_with_mode(black_box(items), mode))
            });
        }
    }
    group.finish();
}

fn bench_proof(c: &mut Criterion) {
    let items = evidence(1024);
    let tree = MerkleTree::from_items(&items).expect("non-empty");
    let root = tree.root();
    let leaf = leaf_hash(items[517].as_bytes());

    c.bench_function("proof/generate_1024", |b| b.iter(|| tree.proof(black_box(517))));

    let proof = tree.proof(517).expect("in range");
    c.bench_function("proof/verify_1024", |b| {
        b.iter(|| verify_proof(black_box(&leaf), black_box(&proof), &root))
    });
}

criterion_group!(benches, bench_root, bench_proof);
criterion_main!(benches);
