//! Sequential vs parallel CSR products on random matrices

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use csrmm::{multiply, multiply_parallel, CsrBuilder, CsrMatrix, ParallelConfig, WorkerKernel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_matrix(rng: &mut StdRng, n: usize, nnz_per_row: usize) -> CsrMatrix<f64> {
    let mut builder = CsrBuilder::new(n, n).expect("valid dimensions");
    for row in 0..n {
        for _ in 0..nnz_per_row {
            let col = rng.gen_range(0..n);
            builder
                .add_value(row, col, rng.gen_range(-1.0..1.0))
                .expect("in bounds");
        }
    }
    builder.finalize()
}

fn bench_multiply(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let mut group = c.benchmark_group("multiply");

    for n in [200, 1000] {
        let a = random_matrix(&mut rng, n, 8);
        let b = random_matrix(&mut rng, n, 8);

        group.bench_with_input(BenchmarkId::new("sequential", n), &n, |bench, _| {
            bench.iter(|| multiply(black_box(&a), black_box(&b)).expect("multiply"))
        });

        for kernel in [WorkerKernel::DenseScan, WorkerKernel::RowGather] {
            let config = ParallelConfig::default().with_kernel(kernel);
            let id = BenchmarkId::new(format!("parallel_{kernel:?}"), n);
            group.bench_with_input(id, &n, |bench, _| {
                bench.iter(|| {
                    multiply_parallel(black_box(&a), black_box(&b), &config).expect("multiply")
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_multiply);
criterion_main!(benches);
