//! Core matrix abstraction traits
//!
//! Every CSR-shaped storage (owned matrices, arena-backed builders) exposes
//! its three arrays through [`SparseMatrix`]. Multiplication and dense
//! rendering are written against this trait only.

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "alloc")]
use alloc::{vec, vec::Vec};

use core::iter::{Copied, Zip};
use core::ops::Range;
use core::slice::Iter;

use super::element::MatrixElement;

/// Iterator over the `(column, value)` pairs stored for one row
pub type RowEntries<'a, T> = Zip<Copied<Iter<'a, usize>>, Copied<Iter<'a, T>>>;

/// Read access to a matrix in compressed sparse row form
///
/// Implementors guarantee that `row_pointer()` has `nrows() + 1` entries,
/// starts at zero, is non-decreasing, and that its last entry equals the
/// length of both `col_index()` and `values()`.
///
/// A row may hold the same column more than once (the bounded builder does
/// not deduplicate). Readers treat such entries as additive.
pub trait SparseMatrix {
    /// The element type stored in this matrix
    type Element: MatrixElement;

    fn nrows(&self) -> usize;

    fn ncols(&self) -> usize;

    fn row_pointer(&self) -> &[usize];

    fn col_index(&self) -> &[usize];

    fn values(&self) -> &[Self::Element];

    /// Get matrix dimensions as (rows, cols)
    fn dimensions(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    /// Number of stored entries
    fn nnz(&self) -> usize {
        self.row_pointer()[self.nrows()]
    }

    /// Offsets into `col_index()`/`values()` for `row`
    fn row_range(&self, row: usize) -> Range<usize> {
        let row_pointer = self.row_pointer();
        row_pointer[row]..row_pointer[row + 1]
    }

    /// Stored `(column, value)` pairs of `row`, in storage order
    fn row_entries(&self, row: usize) -> RowEntries<'_, Self::Element> {
        let range = self.row_range(row);
        self.col_index()[range.clone()]
            .iter()
            .copied()
            .zip(self.values()[range].iter().copied())
    }

    /// Get an element at the specified position
    ///
    /// Returns `None` if nothing is stored there or the position is out of
    /// bounds. Duplicate entries for the same position are summed.
    fn get_element(&self, row: usize, col: usize) -> Option<Self::Element> {
        if row >= self.nrows() || col >= self.ncols() {
            return None;
        }

        self.row_entries(row)
            .filter(|&(c, _)| c == col)
            .map(|(_, v)| v)
            .reduce(|acc, v| acc + v)
    }
}

/// Extension trait for row/column operations (requires alloc feature)
#[cfg(feature = "alloc")]
pub trait MatrixOperations: SparseMatrix {
    /// All stored `(column, value)` pairs in a row
    fn get_row(&self, row_index: usize) -> Vec<(usize, Self::Element)> {
        self.row_entries(row_index).collect()
    }

    /// All stored `(row, value)` pairs in a column, in row order
    fn get_col(&self, col_index: usize) -> Vec<(usize, Self::Element)> {
        (0..self.nrows())
            .flat_map(move |row| {
                self.row_entries(row)
                    .filter(move |&(c, _)| c == col_index)
                    .map(move |(_, v)| (row, v))
            })
            .collect()
    }

    /// Reconstruct the full grid, zeros included
    ///
    /// Each row starts as a zero-filled scratch buffer; stored entries are
    /// then added at their column, so duplicates accumulate.
    fn to_dense(&self) -> Vec<Vec<Self::Element>> {
        (0..self.nrows())
            .map(|row| {
                let mut scratch = vec![<Self::Element as MatrixElement>::ZERO; self.ncols()];
                for (col, value) in self.row_entries(row) {
                    scratch[col] += value;
                }
                scratch
            })
            .collect()
    }
}

#[cfg(feature = "alloc")]
impl<M: SparseMatrix + ?Sized> MatrixOperations for M {}
