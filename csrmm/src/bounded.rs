//! Fixed-capacity CSR construction over arena memory
//!
//! [`BoundedCsrBuilder`] takes its three arrays from an [`Arena`] once, at
//! creation, and never grows them. Row pointers are kept current on every
//! insert, so the builder is readable as a CSR matrix at any point.

use std::mem::align_of;

use csrmm_core::{
    array_byte_size, check_dimensions, check_position, CsrError, CsrMatrix, MatrixElement, Result,
    SparseMatrix,
};

use crate::arena::Arena;

/// Append-only CSR storage with a fixed nonzero capacity
///
/// Duplicate `(row, col)` insertions are kept as separate entries and read
/// back additively.
pub struct BoundedCsrBuilder<'a, T> {
    nrows: usize,
    ncols: usize,
    capacity: usize,
    nnz: usize,
    row_pointer: &'a mut [usize],
    col_index: &'a mut [usize],
    values: &'a mut [T],
}

impl<'a, T: MatrixElement> BoundedCsrBuilder<'a, T> {
    /// Arena bytes needed for a builder of this shape, including worst-case
    /// alignment padding
    pub fn required_bytes(nrows: usize, capacity: usize) -> Result<usize> {
        let overflow = CsrError::AllocatorExhausted {
            requested: usize::MAX,
            available: 0,
        };

        [
            (array_byte_size::<usize>(capacity)?, align_of::<usize>()),
            (array_byte_size::<usize>(nrows.saturating_add(1))?, align_of::<usize>()),
            (array_byte_size::<T>(capacity)?, align_of::<T>()),
        ]
        .into_iter()
        .try_fold(0usize, |total, (bytes, align)| {
            total.checked_add(bytes)?.checked_add(align - 1)
        })
        .ok_or(overflow)
    }

    /// Allocate storage for up to `capacity` entries from `arena`
    ///
    /// Fails with [`CsrError::AllocatorExhausted`] if the arena is too small.
    pub fn new(arena: &'a Arena, nrows: usize, ncols: usize, capacity: usize) -> Result<Self> {
        check_dimensions(nrows, ncols)?;

        let col_index = arena.alloc_slice::<usize>(capacity)?;
        let row_pointer = arena.alloc_slice::<usize>(nrows + 1)?;
        let values = arena.alloc_slice::<T>(capacity)?;

        log::debug!(
            "Bounded builder {nrows}x{ncols} with capacity {capacity} ({} arena bytes used)",
            arena.used()
        );

        Ok(Self {
            nrows,
            ncols,
            capacity,
            nnz: 0,
            row_pointer,
            col_index,
            values,
        })
    }

    /// Store one entry
    ///
    /// Entries inserted in non-decreasing row order are pure appends. An
    /// entry for an earlier row shifts the tail by one slot so rows stay
    /// contiguous. Every row pointer after `row` is bumped by one.
    ///
    /// Fails with [`CsrError::CapacityExceeded`] on exactly the insertion
    /// that would exceed the capacity, leaving the builder unchanged.
    pub fn insert(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        check_position(row, col, self.nrows, self.ncols)?;

        if self.nnz == self.capacity {
            return Err(CsrError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let pos = self.row_pointer[row + 1];
        if pos < self.nnz {
            self.col_index.copy_within(pos..self.nnz, pos + 1);
            self.values.copy_within(pos..self.nnz, pos + 1);
        }
        self.col_index[pos] = col;
        self.values[pos] = value;

        for count in self.row_pointer[row + 1..].iter_mut() {
            *count += 1;
        }
        self.nnz += 1;

        Ok(())
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.nnz == self.capacity
    }

    /// Copy the stored entries into an owned matrix
    ///
    /// Duplicate entries are copied as they are.
    pub fn to_matrix(&self) -> CsrMatrix<T> {
        CsrMatrix::from_raw_parts_unchecked(
            self.nrows,
            self.ncols,
            self.row_pointer.to_vec(),
            self.col_index().to_vec(),
            self.values().to_vec(),
        )
    }
}

impl<T: MatrixElement> SparseMatrix for BoundedCsrBuilder<'_, T> {
    type Element = T;

    fn nrows(&self) -> usize {
        self.nrows
    }

    fn ncols(&self) -> usize {
        self.ncols
    }

    fn row_pointer(&self) -> &[usize] {
        &*self.row_pointer
    }

    fn col_index(&self) -> &[usize] {
        &self.col_index[..self.nnz]
    }

    fn values(&self) -> &[T] {
        &self.values[..self.nnz]
    }
}

impl<T: MatrixElement> std::fmt::Debug for BoundedCsrBuilder<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedCsrBuilder")
            .field("nrows", &self.nrows)
            .field("ncols", &self.ncols)
            .field("capacity", &self.capacity)
            .field("row_pointer", &self.row_pointer)
            .field("col_index", &self.col_index())
            .field("values", &self.values())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csrmm_core::{validate_csr, MatrixOperations, DEFAULT_ARENA_CAPACITY};

    #[test]
    fn test_sequential_inserts_append() {
        let arena = Arena::new(DEFAULT_ARENA_CAPACITY).unwrap();
        let mut csr = BoundedCsrBuilder::new(&arena, 3, 3, 10).unwrap();
        csr.insert(0, 0, 3.5).unwrap();
        csr.insert(1, 1, 4.2).unwrap();
        csr.insert(2, 2, -1.0).unwrap();

        assert_eq!(csr.row_pointer(), &[0, 1, 2, 3]);
        assert_eq!(csr.col_index(), &[0, 1, 2]);
        assert_eq!(csr.values(), &[3.5, 4.2, -1.0]);
        assert_eq!(csr.nnz(), 3);
    }

    #[test]
    fn test_out_of_order_rows_stay_grouped() {
        let arena = Arena::new(1024).unwrap();
        let mut csr = BoundedCsrBuilder::new(&arena, 3, 4, 8).unwrap();
        csr.insert(2, 3, 1).unwrap();
        csr.insert(0, 1, 2).unwrap();
        csr.insert(1, 0, 3).unwrap();
        csr.insert(0, 2, 4).unwrap();

        assert_eq!(csr.row_pointer(), &[0, 2, 3, 4]);
        assert_eq!(csr.col_index(), &[1, 2, 0, 3]);
        assert_eq!(csr.values(), &[2, 4, 3, 1]);
        let (row_pointer, col_index) = (csr.row_pointer(), csr.col_index());
        assert!(validate_csr(3, 4, row_pointer, col_index, csr.values().len()).is_ok());
    }

    #[test]
    fn test_capacity_exceeded_on_exact_insert() {
        let arena = Arena::new(1024).unwrap();
        let mut csr = BoundedCsrBuilder::new(&arena, 2, 2, 2).unwrap();
        assert!(csr.insert(0, 0, 1.0f32).is_ok());
        assert!(csr.insert(1, 1, 2.0).is_ok());
        assert!(csr.is_full());

        assert_eq!(
            csr.insert(0, 1, 3.0),
            Err(CsrError::CapacityExceeded { capacity: 2 })
        );
        // failed insert leaves storage untouched
        assert_eq!(csr.row_pointer(), &[0, 1, 2]);
        assert_eq!(csr.values(), &[1.0, 2.0]);
    }

    #[test]
    fn test_duplicates_are_additive() {
        let arena = Arena::new(1024).unwrap();
        let mut csr = BoundedCsrBuilder::new(&arena, 2, 2, 4).unwrap();
        csr.insert(0, 1, 2.0).unwrap();
        csr.insert(0, 1, 5.0).unwrap();

        assert_eq!(csr.nnz(), 2);
        assert_eq!(csr.get_element(0, 1), Some(7.0));
        assert_eq!(csr.to_dense(), vec![vec![0.0, 7.0], vec![0.0, 0.0]]);
    }

    #[test]
    fn test_out_of_bounds_insert() {
        let arena = Arena::new(1024).unwrap();
        let mut csr = BoundedCsrBuilder::<f64>::new(&arena, 2, 2, 4).unwrap();
        assert!(matches!(
            csr.insert(2, 0, 1.0),
            Err(CsrError::IndexOutOfBounds { row: 2, .. })
        ));
        assert_eq!(csr.nnz(), 0);
    }

    #[test]
    fn test_arena_too_small() {
        let arena = Arena::new(16).unwrap();
        let result = BoundedCsrBuilder::<f64>::new(&arena, 3, 3, 10);
        assert!(matches!(result, Err(CsrError::AllocatorExhausted { .. })));
    }

    #[test]
    fn test_required_bytes_is_sufficient() {
        let bytes = BoundedCsrBuilder::<f64>::required_bytes(5, 7).unwrap();
        let arena = Arena::new(bytes).unwrap();
        let mut csr = BoundedCsrBuilder::<f64>::new(&arena, 5, 5, 7).unwrap();
        for i in 0..5 {
            csr.insert(i, i, 1.0).unwrap();
        }
        assert_eq!(csr.to_matrix(), CsrMatrix::identity(5).unwrap());
    }

    #[test]
    fn test_arena_reuse_after_reset() {
        let mut arena = Arena::new(1024).unwrap();
        {
            let mut csr = BoundedCsrBuilder::new(&arena, 2, 2, 2).unwrap();
            csr.insert(0, 0, 1u64).unwrap();
        }
        arena.reset();
        let csr = BoundedCsrBuilder::<u64>::new(&arena, 2, 2, 2).unwrap();
        assert_eq!(csr.row_pointer(), &[0, 0, 0]);
        assert_eq!(csr.nnz(), 0);
    }
}
