//! Shape and size validation

use crate::CsrError;

/// Reject zero-sized matrices
pub const fn check_dimensions(nrows: usize, ncols: usize) -> Result<(), CsrError> {
    if nrows == 0 || ncols == 0 {
        return Err(CsrError::InvalidDimensions { nrows, ncols });
    }
    Ok(())
}

/// Check that `(row, col)` lies inside an `nrows x ncols` matrix
pub const fn check_position(
    row: usize,
    col: usize,
    nrows: usize,
    ncols: usize,
) -> Result<(), CsrError> {
    if row >= nrows || col >= ncols {
        return Err(CsrError::IndexOutOfBounds {
            row,
            col,
            nrows,
            ncols,
        });
    }
    Ok(())
}

/// Byte size of an array of `len` elements of `T`, with overflow protection
///
/// Overflow is reported as an exhausted allocator: no region could ever
/// hold such an array.
pub const fn array_byte_size<T>(len: usize) -> Result<usize, CsrError> {
    match len.checked_mul(core::mem::size_of::<T>()) {
        Some(bytes) => Ok(bytes),
        None => Err(CsrError::AllocatorExhausted {
            requested: usize::MAX,
            available: 0,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_position() {
        assert_eq!(check_position(0, 0, 3, 3), Ok(()));
        assert_eq!(check_position(2, 2, 3, 3), Ok(()));
        assert_eq!(
            check_position(3, 0, 3, 3),
            Err(CsrError::IndexOutOfBounds {
                row: 3,
                col: 0,
                nrows: 3,
                ncols: 3
            })
        );
        assert!(check_position(0, 5, 3, 3).is_err());
    }

    #[test]
    fn test_check_dimensions() {
        assert_eq!(check_dimensions(1, 1), Ok(()));
        assert_eq!(
            check_dimensions(0, 4),
            Err(CsrError::InvalidDimensions { nrows: 0, ncols: 4 })
        );
    }

    #[test]
    fn test_array_byte_size() {
        assert_eq!(array_byte_size::<u32>(4), Ok(16));
        assert_eq!(array_byte_size::<f64>(0), Ok(0));
        assert!(array_byte_size::<u64>(usize::MAX / 2).is_err());
    }
}
