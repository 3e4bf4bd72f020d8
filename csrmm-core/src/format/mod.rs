//! CSR storage definitions
//!
//! The owned [`CsrMatrix`] and its dense rendering need `alloc`; the element
//! tags and layout constants do not.

pub mod constants;
pub mod data_type;
#[cfg(feature = "alloc")]
pub mod csr;
#[cfg(feature = "alloc")]
pub mod dense;

pub use constants::{ALIGNMENT_BOUNDARY, DEFAULT_ARENA_CAPACITY};
pub use data_type::DataType;
#[cfg(feature = "alloc")]
pub use csr::CsrMatrix;
#[cfg(feature = "alloc")]
pub use dense::DenseDisplay;
