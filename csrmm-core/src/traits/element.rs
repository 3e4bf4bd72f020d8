//! Matrix element type constraints
//!
//! This module defines the trait that constrains what types can be
//! stored as nonzero values in a CSR matrix.

use core::fmt::{Debug, Display};
use core::ops::{Add, AddAssign, Mul};

use crate::format::DataType;

/// Trait for types that can be stored as matrix elements
///
/// All matrix element types must be:
/// - Pod: Can live in raw arena memory and be viewed through byte casts
/// - Send + Sync: Can be read by parallel multiply workers
/// - Add/Mul: Support the accumulate step of a sparse product
///
/// Products and sums use the type's own operators. For the integer types
/// that means an overflowing product or accumulation panics in debug
/// builds and wraps in release builds; callers keep values in range.
pub trait MatrixElement:
    bytemuck::Pod
    + PartialEq
    + Debug
    + Display
    + Send
    + Sync
    + Add<Output = Self>
    + Mul<Output = Self>
    + AddAssign
{
    /// Additive identity
    const ZERO: Self;

    /// Multiplicative identity
    const ONE: Self;

    /// Get the DataType tag for this element type
    fn data_type() -> DataType;

    /// Exact comparison against zero; `-0.0` counts as zero
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

macro_rules! impl_matrix_element {
    ($type:ty, $variant:ident, $zero:expr, $one:expr) => {
        impl MatrixElement for $type {
            const ZERO: Self = $zero;
            const ONE: Self = $one;

            fn data_type() -> DataType {
                DataType::$variant
            }
        }
    };
}

impl_matrix_element!(f32, F32, 0.0, 1.0);
impl_matrix_element!(f64, F64, 0.0, 1.0);
impl_matrix_element!(i32, I32, 0, 1);
impl_matrix_element!(i64, I64, 0, 1);
impl_matrix_element!(u32, U32, 0, 1);
impl_matrix_element!(u64, U64, 0, 1);
