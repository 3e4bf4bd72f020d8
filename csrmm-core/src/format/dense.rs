//! Dense rendering for debugging and tests
//!
//! Not a serialization format.

extern crate alloc;
use alloc::vec;

use crate::traits::{MatrixElement, SparseMatrix};

/// `Display` adapter printing every cell of a sparse matrix
///
/// Cells are written with `{:6.2}` and separated by a single space.
pub struct DenseDisplay<'a, M: ?Sized> {
    matrix: &'a M,
}

impl<'a, M: SparseMatrix + ?Sized> DenseDisplay<'a, M> {
    pub fn new(matrix: &'a M) -> Self {
        Self { matrix }
    }
}

impl<M: SparseMatrix + ?Sized> core::fmt::Display for DenseDisplay<'_, M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let zero = <M::Element as MatrixElement>::ZERO;
        let mut scratch = vec![zero; self.matrix.ncols()];

        for row in 0..self.matrix.nrows() {
            scratch.fill(zero);
            for (col, value) in self.matrix.row_entries(row) {
                scratch[col] += value;
            }

            for (col, value) in scratch.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{value:6.2}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::CsrMatrix;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn test_dense_display() {
        let csr =
            CsrMatrix::from_raw_parts(2, 3, vec![0, 1, 2], vec![2, 0], vec![1.5, -2.0]).unwrap();
        assert_eq!(
            csr.dense_display().to_string(),
            "  0.00   0.00   1.50\n -2.00   0.00   0.00\n"
        );
    }
}
