//! Owned compressed sparse row matrix
//!
//! CSR format stores:
//! - `values`: nonzero entries grouped by row
//! - `col_index`: column of each value
//! - `row_pointer`: where each row starts in `values`/`col_index`

extern crate alloc;
use alloc::{vec, vec::Vec};

use crate::error::{CsrError, Result};
use crate::traits::{MatrixElement, SparseMatrix};
use crate::validation::{check_dimensions, validate_csr};

use super::dense::DenseDisplay;

/// Compressed sparse row matrix
///
/// Dimensions are fixed at creation. Values are produced by a builder and
/// the matrix is treated as immutable afterwards; products always allocate
/// a new matrix.
///
/// Deserialized matrices go through the same validation as
/// [`CsrMatrix::from_raw_parts`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "RawCsr<T>",
        bound(deserialize = "T: MatrixElement + serde::Deserialize<'de>")
    )
)]
pub struct CsrMatrix<T> {
    nrows: usize,
    ncols: usize,
    /// `row_pointer[nrows]` == nnz
    row_pointer: Vec<usize>,
    col_index: Vec<usize>,
    values: Vec<T>,
}

impl<T: MatrixElement> CsrMatrix<T> {
    /// Create an empty matrix (all row pointers zero)
    pub fn new(nrows: usize, ncols: usize) -> Result<Self> {
        check_dimensions(nrows, ncols)?;
        Ok(Self {
            nrows,
            ncols,
            row_pointer: vec![0; nrows + 1],
            col_index: Vec::new(),
            values: Vec::new(),
        })
    }

    /// `n x n` identity
    pub fn identity(n: usize) -> Result<Self> {
        check_dimensions(n, n)?;
        Ok(Self {
            nrows: n,
            ncols: n,
            row_pointer: (0..=n).collect(),
            col_index: (0..n).collect(),
            values: vec![T::ONE; n],
        })
    }

    /// Create a matrix from raw components
    ///
    /// Fails with [`CsrError::CorruptedStructure`] if the arrays break the
    /// row-pointer or length invariants.
    pub fn from_raw_parts(
        nrows: usize,
        ncols: usize,
        row_pointer: Vec<usize>,
        col_index: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        check_dimensions(nrows, ncols)?;
        validate_csr(nrows, ncols, &row_pointer, &col_index, values.len())?;
        Ok(Self {
            nrows,
            ncols,
            row_pointer,
            col_index,
            values,
        })
    }

    /// Create a matrix from components the caller already knows to be valid
    ///
    /// Builders use this after producing the arrays themselves. The
    /// invariants are only re-checked in debug builds.
    pub fn from_raw_parts_unchecked(
        nrows: usize,
        ncols: usize,
        row_pointer: Vec<usize>,
        col_index: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        debug_assert!(
            validate_csr(nrows, ncols, &row_pointer, &col_index, values.len()).is_ok(),
            "builder produced inconsistent CSR arrays"
        );
        Self {
            nrows,
            ncols,
            row_pointer,
            col_index,
            values,
        }
    }

    /// Renders the full grid, one row per line
    pub fn dense_display(&self) -> DenseDisplay<'_, Self> {
        DenseDisplay::new(self)
    }

    /// Element type tag
    pub fn data_type(&self) -> crate::DataType {
        T::data_type()
    }
}

impl<T: MatrixElement> SparseMatrix for CsrMatrix<T> {
    type Element = T;

    fn nrows(&self) -> usize {
        self.nrows
    }

    fn ncols(&self) -> usize {
        self.ncols
    }

    fn row_pointer(&self) -> &[usize] {
        &self.row_pointer
    }

    fn col_index(&self) -> &[usize] {
        &self.col_index
    }

    fn values(&self) -> &[T] {
        &self.values
    }
}

impl<T: MatrixElement> core::fmt::Display for CsrMatrix<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "CSR {}x{} ({}), nnz={}",
            self.nrows,
            self.ncols,
            T::data_type(),
            self.nnz()
        )
    }
}

/// Unvalidated wire shape of a [`CsrMatrix`]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCsr<T> {
    nrows: usize,
    ncols: usize,
    row_pointer: Vec<usize>,
    col_index: Vec<usize>,
    values: Vec<T>,
}

#[cfg(feature = "serde")]
impl<T: MatrixElement> TryFrom<RawCsr<T>> for CsrMatrix<T> {
    type Error = CsrError;

    fn try_from(raw: RawCsr<T>) -> Result<Self> {
        Self::from_raw_parts(
            raw.nrows,
            raw.ncols,
            raw.row_pointer,
            raw.col_index,
            raw.values,
        )
    }
}

impl<T: MatrixElement> TryFrom<(usize, usize)> for CsrMatrix<T> {
    type Error = CsrError;

    fn try_from((nrows, ncols): (usize, usize)) -> Result<Self> {
        Self::new(nrows, ncols)
    }
}
