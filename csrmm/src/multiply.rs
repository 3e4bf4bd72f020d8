//! Sparse-times-sparse products
//!
//! For each row `i` of `A`, every stored `(k, a_ik)` gathers row `k` of `B`
//! and accumulates `a_ik * b_kj` at `(i, j)`. Work is proportional to the
//! number of matching nonzero pairs, never to the dense shape.

use csrmm_core::{CsrError, CsrMatrix, MatrixElement, Result, SparseMatrix};

use crate::builder::CsrBuilder;
use crate::parallel::{multiply_parallel, ParallelConfig};

/// Check that `a * b` is defined
pub(crate) fn check_inner_dimensions<A, B>(a: &A, b: &B) -> Result<()>
where
    A: SparseMatrix + ?Sized,
    B: SparseMatrix + ?Sized,
{
    if a.ncols() != b.nrows() {
        return Err(CsrError::DimensionMismatch {
            left: a.dimensions(),
            right: b.dimensions(),
        });
    }
    Ok(())
}

/// Distinct output columns per row of `a * b`
///
/// An upper bound on the stored entries of each product row: positions
/// whose contributions cancel are still counted.
pub fn estimate_row_nnz<A, B>(a: &A, b: &B) -> Result<Vec<usize>>
where
    A: SparseMatrix + ?Sized,
    B: SparseMatrix + ?Sized,
{
    check_inner_dimensions(a, b)?;

    // mask[j] == i once column j has been seen in output row i
    let mut mask = vec![usize::MAX; b.ncols()];

    Ok((0..a.nrows())
        .map(|i| {
            let mut row_nnz = 0;
            for (k, _) in a.row_entries(i) {
                for (j, _) in b.row_entries(k) {
                    if mask[j] != i {
                        mask[j] = i;
                        row_nnz += 1;
                    }
                }
            }
            row_nnz
        })
        .collect())
}

/// Upper bound on the stored entries of `a * b`
pub fn estimate_product_nnz<A, B>(a: &A, b: &B) -> Result<usize>
where
    A: SparseMatrix + ?Sized,
    B: SparseMatrix + ?Sized,
{
    estimate_row_nnz(a, b)?
        .into_iter()
        .try_fold(0usize, |nnz, row_nnz| nnz.checked_add(row_nnz))
        .ok_or(CsrError::CapacityExceeded {
            capacity: usize::MAX,
        })
}

/// Compute `a * b` on the calling thread
///
/// Fails with [`CsrError::DimensionMismatch`] unless `a.ncols() == b.nrows()`.
/// The result is `a.nrows() x b.ncols()`; positions whose contributions sum
/// to exactly zero are not stored.
///
/// Integer element types use their native `*` and `+=`: a product or sum
/// that overflows panics in debug builds and wraps in release builds.
pub fn multiply<A, B, T>(a: &A, b: &B) -> Result<CsrMatrix<T>>
where
    A: SparseMatrix<Element = T> + ?Sized,
    B: SparseMatrix<Element = T> + ?Sized,
    T: MatrixElement,
{
    let row_estimates = estimate_row_nnz(a, b)?;

    let mut product = CsrBuilder::new(a.nrows(), b.ncols())?;
    for (i, estimate) in row_estimates.into_iter().enumerate() {
        product.reserve_row(i, estimate);

        for (k, a_ik) in a.row_entries(i) {
            for (j, b_kj) in b.row_entries(k) {
                product.add_value(i, j, a_ik * b_kj)?;
            }
        }
    }

    Ok(product.finalize())
}

/// Product methods for every CSR storage type
pub trait CsrMultiply: SparseMatrix {
    /// `self * other`, sequential row gather
    fn multiply<B>(&self, other: &B) -> Result<CsrMatrix<Self::Element>>
    where
        B: SparseMatrix<Element = Self::Element> + ?Sized,
    {
        multiply(self, other)
    }

    /// `self * other`, rows partitioned across worker threads
    fn multiply_parallel<B>(
        &self,
        other: &B,
        config: &ParallelConfig,
    ) -> Result<CsrMatrix<Self::Element>>
    where
        Self: Sync,
        B: SparseMatrix<Element = Self::Element> + Sync + ?Sized,
    {
        multiply_parallel(self, other, config)
    }
}

impl<M: SparseMatrix + ?Sized> CsrMultiply for M {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use csrmm_core::MatrixOperations;

    pub(crate) fn build(
        nrows: usize,
        ncols: usize,
        entries: &[(usize, usize, f64)],
    ) -> CsrMatrix<f64> {
        let mut builder = CsrBuilder::new(nrows, ncols).unwrap();
        for &(r, c, v) in entries {
            builder.add_value(r, c, v).unwrap();
        }
        builder.finalize()
    }

    pub(crate) fn example_a() -> CsrMatrix<f64> {
        build(3, 3, &[(0, 0, 1.0), (0, 1, 2.0), (1, 1, 3.0), (2, 2, 4.0)])
    }

    pub(crate) fn example_b() -> CsrMatrix<f64> {
        build(3, 3, &[(0, 0, 5.0), (1, 0, 6.0), (1, 2, 7.0), (2, 2, 8.0)])
    }

    #[test]
    fn test_multiply_example() {
        let c = example_a().multiply(&example_b()).unwrap();

        assert_eq!(c.dimensions(), (3, 3));
        assert_eq!(
            c.to_dense(),
            vec![
                vec![17.0, 0.0, 14.0],
                vec![18.0, 0.0, 21.0],
                vec![0.0, 0.0, 32.0],
            ]
        );
        // column 1 of B is empty, so nothing is stored there
        assert_eq!(c.nnz(), 5);
        assert_eq!(c.get_row(0), vec![(0, 17.0), (2, 14.0)]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = build(2, 3, &[(0, 0, 1.0)]);
        let b = build(2, 2, &[(0, 0, 1.0)]);
        assert_eq!(
            multiply(&a, &b),
            Err(CsrError::DimensionMismatch {
                left: (2, 3),
                right: (2, 2)
            })
        );
    }

    #[test]
    fn test_cancelling_contributions_are_not_stored() {
        // row 0 of A hits rows 0 and 1 of B, which cancel in every column
        let a = build(2, 2, &[(0, 0, 1.0), (0, 1, 1.0)]);
        let b = build(2, 3, &[(0, 0, 2.0), (0, 2, -1.0), (1, 0, -2.0), (1, 2, 1.0)]);

        let c = multiply(&a, &b).unwrap();
        assert_eq!(c.nnz(), 0);
        assert_eq!(c.row_pointer(), &[0, 0, 0]);
        assert_eq!(estimate_product_nnz(&a, &b).unwrap(), 2);
    }

    #[test]
    fn test_identity_is_neutral() {
        let a = example_a();
        let i = CsrMatrix::identity(3).unwrap();
        assert_eq!(multiply(&i, &a).unwrap().to_dense(), a.to_dense());
        assert_eq!(multiply(&a, &i).unwrap().to_dense(), a.to_dense());
    }

    #[test]
    fn test_rectangular_product() {
        let a = build(2, 3, &[(0, 2, 2.0), (1, 0, 1.0), (1, 1, 1.0)]);
        let b = build(3, 1, &[(0, 0, 4.0), (2, 0, 3.0)]);
        let c = multiply(&a, &b).unwrap();
        assert_eq!(c.dimensions(), (2, 1));
        assert_eq!(c.to_dense(), vec![vec![6.0], vec![4.0]]);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let a = example_a();
        let b = example_b();
        let before = (a.clone(), b.clone());
        let _ = a.multiply(&b).unwrap();
        assert_eq!((a, b), before);
    }

    #[test]
    fn test_integer_products_are_exact() {
        let mut a = CsrBuilder::<i64>::new(1, 2).unwrap();
        a.add_value(0, 0, 3_000_000).unwrap();
        a.add_value(0, 1, -2).unwrap();
        let a = a.finalize();
        let mut b = CsrBuilder::<i64>::new(2, 1).unwrap();
        b.add_value(0, 0, 3_000_000).unwrap();
        b.add_value(1, 0, 7).unwrap();
        let b = b.finalize();

        assert_eq!(multiply(&a, &b).unwrap().get_element(0, 0), Some(8_999_999_999_986));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "overflow")]
    fn test_integer_overflow_panics_in_debug() {
        let mut a = CsrBuilder::<u32>::new(1, 1).unwrap();
        a.add_value(0, 0, u32::MAX).unwrap();
        let a = a.finalize();
        let _ = multiply(&a, &a);
    }

    #[test]
    fn test_estimate_row_nnz() {
        assert_eq!(
            estimate_row_nnz(&example_a(), &example_b()).unwrap(),
            vec![2, 2, 1]
        );
    }
}
