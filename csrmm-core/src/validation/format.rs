//! Alignment arithmetic and CSR structure validation

use crate::CsrError;

/// Align an offset to a specific boundary
///
/// `boundary` must be a power of two.
pub const fn align_to_boundary(offset: usize, boundary: usize) -> usize {
    (offset + boundary - 1) & !(boundary - 1)
}

/// Calculate padding needed to reach alignment boundary
pub const fn calculate_padding(offset: usize, boundary: usize) -> usize {
    let aligned = align_to_boundary(offset, boundary);
    aligned - offset
}

/// Validate raw CSR arrays against the storage invariants
///
/// Checks that `row_pointer` has `nrows + 1` entries, starts at zero, never
/// decreases and ends at the common length of `col_index` and `values`, and
/// that every column index is below `ncols`.
pub fn validate_csr(
    nrows: usize,
    ncols: usize,
    row_pointer: &[usize],
    col_index: &[usize],
    values_len: usize,
) -> Result<(), CsrError> {
    let expected_len = nrows.checked_add(1).ok_or(CsrError::CorruptedStructure)?;
    if row_pointer.len() != expected_len || row_pointer[0] != 0 {
        return Err(CsrError::CorruptedStructure);
    }

    if row_pointer.windows(2).any(|w| w[0] > w[1]) {
        return Err(CsrError::CorruptedStructure);
    }

    let nnz = row_pointer[nrows];
    if col_index.len() != nnz || values_len != nnz {
        return Err(CsrError::CorruptedStructure);
    }

    if col_index.iter().any(|&c| c >= ncols) {
        return Err(CsrError::CorruptedStructure);
    }

    Ok(())
}
