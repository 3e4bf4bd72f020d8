//! csrmm - compressed sparse row matrix construction and multiplication
//!
//! This library builds CSR matrices either into fixed arena storage or
//! through an accumulating builder, and multiplies them sequentially or
//! with rows partitioned across worker threads.
//!
//! ## Architecture
//!
//! csrmm separates definitions from implementation:
//!
//! - **csrmm-core**: storage traits, element types, errors and validation (no_std)
//! - **csrmm**: arena, builders and multiply kernels
//!
//! ## Quick Start
//!
//! ```rust
//! use csrmm::{CsrBuilder, CsrMultiply, MatrixOperations, ParallelConfig};
//!
//! fn example() -> csrmm::Result<()> {
//!     let mut a = CsrBuilder::new(2, 2)?;
//!     a.add_value(0, 0, 1.0)?;
//!     a.add_value(1, 0, 2.0)?;
//!     a.add_value(1, 0, 1.0)?;
//!     let a = a.finalize();
//!
//!     let sequential = a.multiply(&a)?;
//!     let parallel = a.multiply_parallel(&a, &ParallelConfig::with_threads(2))?;
//!     assert_eq!(sequential.to_dense(), parallel.to_dense());
//!     println!("{}", sequential.dense_display());
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! ## Features
//!
//! - **Arena storage**: bounded builder backed by a single bump-allocated region
//! - **Accumulation**: duplicate positions summed, exact zeros never stored
//! - **Parallel multiply**: disjoint row ranges, no locks on the output
//! - **serde**: (de)serialize matrices and `ParallelConfig`

// Re-export core abstractions
pub use csrmm_core::{
    // Core traits
    MatrixElement, MatrixOperations, RowEntries, SparseMatrix,
    // Storage definitions
    CsrMatrix, DataType, DenseDisplay, DEFAULT_ARENA_CAPACITY,
    // Error handling
    CsrError, ErrorCategory, Result,
    // Validation utilities
    validate_csr,
};

// Implementation modules
pub mod arena;
pub mod bounded;
pub mod builder;
pub mod multiply;
pub mod parallel;

// Public exports
pub use arena::Arena;
pub use bounded::BoundedCsrBuilder;
pub use builder::CsrBuilder;
pub use multiply::{estimate_product_nnz, estimate_row_nnz, multiply, CsrMultiply};
pub use parallel::{multiply_parallel, partition_rows, ParallelConfig, WorkerKernel};
