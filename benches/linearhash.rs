use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use linearhash::Table;

fn filled(size: usize) -> Table<usize, usize> {
    let mut table = Table::with_initial_buckets(4);
    for n in 0..size {
        table.insert(n, n).unwrap();
    }
    table
}

fn bench(c: &mut Criterion) {
    const WORKING_SET_SIZES: &[usize] = &[3, 100, 1_000, 10_000];

    let mut group = c.benchmark_group("LinearHash");

    for &size in WORKING_SET_SIZES {
        {
            let table = filled(size);
            group.bench_with_input(BenchmarkId::new("get_hit", size), &table, |b, t| {
                b.iter(|| black_box(t.get(&(size / 2))))
            });
        }

        {
            let table = filled(size);
            group.bench_with_input(BenchmarkId::new("get_miss", size), &table, |b, t| {
                b.iter(|| black_box(t.try_get(&(size + 1))))
            });
        }

        {
            group.bench_function(BenchmarkId::new("insert_triggering_split", size), move |b| {
                b.iter_batched(
                    || filled(size),
                    |mut t| t.insert(size + 1, size + 1).unwrap(),
                    BatchSize::SmallInput,
                )
            });
        }

        {
            group.bench_function(BenchmarkId::new("remove_triggering_merge", size), move |b| {
                b.iter_batched(
                    || filled(size),
                    |mut t| t.remove(&0).unwrap(),
                    BatchSize::SmallInput,
                )
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench);
criterion_main!(benches);
