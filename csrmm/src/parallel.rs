//! Row-partitioned parallel products
//!
//! The rows of `A` are split into contiguous ranges, one per worker. Each
//! worker owns the output slots of its rows exclusively, so no locking is
//! needed. A thread pool is built for every call and all workers are
//! joined before the single finalize step.

use std::num::NonZeroUsize;
use std::ops::Range;

use csrmm_core::{CsrError, CsrMatrix, MatrixElement, Result, SparseMatrix};

use crate::builder::CsrBuilder;
use crate::multiply::check_inner_dimensions;

/// How a worker computes the output rows it owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WorkerKernel {
    /// For every output column, scan the gathered rows of `B` for it.
    /// Cost grows with `B.ncols()` even when the product is sparse.
    #[default]
    DenseScan,
    /// Gather rows of `B` into a per-worker dense scratch accumulator
    RowGather,
}

/// Configuration for parallel multiplication
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParallelConfig {
    /// Worker count; `None` uses the host's available parallelism
    pub threads: Option<usize>,
    /// Per-worker row kernel
    pub kernel: WorkerKernel,
}

impl ParallelConfig {
    /// Config with a fixed worker count
    pub fn with_threads(threads: usize) -> Self {
        Self {
            threads: Some(threads),
            ..Self::default()
        }
    }

    /// Set the worker kernel
    pub fn with_kernel(mut self, kernel: WorkerKernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Number of workers to spawn for a left operand with `nrows` rows
    ///
    /// Zero is treated as one. More workers than rows would only receive
    /// empty ranges, so the count is capped at `nrows`.
    pub fn worker_count(&self, nrows: usize) -> usize {
        let requested = match self.threads {
            Some(threads) => {
                if threads > nrows {
                    log::warn!("Requested {threads} workers for {nrows} rows, using {nrows}");
                }
                threads
            }
            None => host_concurrency(),
        };
        requested.min(nrows).max(1)
    }
}

/// Hardware threads available to this process, at least one
///
/// Read from the OS rather than rayon so that only the per-call pool ever
/// spawns threads.
fn host_concurrency() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Split `0..nrows` into `workers` contiguous ranges
///
/// Every range holds `nrows / workers` rows except the last one, which
/// also takes the remainder.
pub fn partition_rows(nrows: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let rows_per_worker = nrows / workers;

    (0..workers)
        .map(|worker_id| {
            let start = worker_id * rows_per_worker;
            let end = if worker_id == workers - 1 {
                nrows
            } else {
                start + rows_per_worker
            };
            start..end
        })
        .collect()
}

/// Compute `a * b` with rows partitioned across worker threads
///
/// Same contract as [`crate::multiply`]: fails with
/// [`CsrError::DimensionMismatch`] before any thread is started, and the
/// stored entries are identical for every worker count and kernel.
/// Integer overflow behaves as in [`crate::multiply`].
pub fn multiply_parallel<A, B, T>(a: &A, b: &B, config: &ParallelConfig) -> Result<CsrMatrix<T>>
where
    A: SparseMatrix<Element = T> + Sync + ?Sized,
    B: SparseMatrix<Element = T> + Sync + ?Sized,
    T: MatrixElement,
{
    check_inner_dimensions(a, b)?;

    let nrows = a.nrows();
    let workers = config.worker_count(nrows);
    let ranges = partition_rows(nrows, workers);
    let kernel = config.kernel;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("csrmm-worker-{i}"))
        .build()
        .map_err(|err| {
            log::error!("Failed to build pool of {workers} workers: {err}");
            CsrError::WorkerPool
        })?;

    // one slot per output row; workers receive disjoint sub-slices
    let mut output: Vec<Vec<(usize, T)>> = vec![Vec::new(); nrows];

    pool.scope(|scope| {
        let mut remaining = output.as_mut_slice();
        for (worker_id, rows) in ranges.into_iter().enumerate() {
            let (slots, rest) = remaining.split_at_mut(rows.len());
            remaining = rest;

            scope.spawn(move |_| {
                log::debug!("Worker {worker_id} computing rows {rows:?} with {kernel:?}");
                match kernel {
                    WorkerKernel::DenseScan => dense_scan_rows(a, b, rows, slots),
                    WorkerKernel::RowGather => row_gather_rows(a, b, rows, slots),
                }
            });
        }
    });

    let mut product = CsrBuilder::new(nrows, b.ncols())?;
    for (row, entries) in output.into_iter().enumerate() {
        product.reserve_row(row, entries.len());
        for (col, value) in entries {
            product.add_value(row, col, value)?;
        }
    }

    Ok(product.finalize())
}

/// Brute-force triple loop: row of `a` x every output column x matching row of `b`
fn dense_scan_rows<A, B, T>(a: &A, b: &B, rows: Range<usize>, slots: &mut [Vec<(usize, T)>])
where
    A: SparseMatrix<Element = T> + ?Sized,
    B: SparseMatrix<Element = T> + ?Sized,
    T: MatrixElement,
{
    for (i, slot) in rows.zip(slots.iter_mut()) {
        for j in 0..b.ncols() {
            let mut sum = T::ZERO;
            for (k, a_ik) in a.row_entries(i) {
                for (col, b_kj) in b.row_entries(k) {
                    if col == j {
                        sum += a_ik * b_kj;
                    }
                }
            }
            if !sum.is_zero() {
                slot.push((j, sum));
            }
        }
    }
}

fn row_gather_rows<A, B, T>(a: &A, b: &B, rows: Range<usize>, slots: &mut [Vec<(usize, T)>])
where
    A: SparseMatrix<Element = T> + ?Sized,
    B: SparseMatrix<Element = T> + ?Sized,
    T: MatrixElement,
{
    let mut sums = vec![T::ZERO; b.ncols()];
    // marker[j] == i once column j is live in output row i
    let mut marker = vec![usize::MAX; b.ncols()];
    let mut touched = Vec::new();

    for (i, slot) in rows.zip(slots.iter_mut()) {
        for (k, a_ik) in a.row_entries(i) {
            for (j, b_kj) in b.row_entries(k) {
                if marker[j] != i {
                    marker[j] = i;
                    sums[j] = T::ZERO;
                    touched.push(j);
                }
                sums[j] += a_ik * b_kj;
            }
        }

        for j in touched.drain(..) {
            if !sums[j].is_zero() {
                slot.push((j, sums[j]));
            }
        }
    }
}
