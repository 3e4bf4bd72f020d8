//! Validation utilities
//!
//! Pure functions over shapes, offsets and raw CSR arrays. Nothing here
//! allocates.

pub mod bounds;
pub mod format;

pub use bounds::{array_byte_size, check_dimensions, check_position};
pub use format::{align_to_boundary, calculate_padding, validate_csr};
