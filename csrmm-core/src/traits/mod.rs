//! Abstract interfaces shared by all CSR storage types

pub mod element;
pub mod matrix;

pub use element::MatrixElement;
#[cfg(feature = "alloc")]
pub use matrix::MatrixOperations;
pub use matrix::{RowEntries, SparseMatrix};
