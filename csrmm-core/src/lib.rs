#![no_std]

//! csrmm core - compressed sparse row matrix definitions
//!
//! This crate provides the storage traits, element types, error taxonomy and
//! validation helpers shared by every CSR builder and multiply kernel. The
//! owned [`CsrMatrix`] is available with the `alloc` feature.

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod format;
pub mod traits;
pub mod validation;

pub use error::*;
pub use format::*;
pub use traits::*;
pub use validation::{
    align_to_boundary, array_byte_size, calculate_padding, check_dimensions, check_position,
    validate_csr,
};
