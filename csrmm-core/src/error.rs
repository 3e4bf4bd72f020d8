//! Error types for CSR matrix operations

/// Errors that can occur while building or multiplying CSR matrices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrError {
    /// A matrix was requested with a zero row or column count
    InvalidDimensions { nrows: usize, ncols: usize },
    /// A row/column position outside the declared shape
    IndexOutOfBounds {
        row: usize,
        col: usize,
        nrows: usize,
        ncols: usize,
    },
    /// Bounded builder is full
    CapacityExceeded { capacity: usize },
    /// Inner dimensions of a product do not agree
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    /// Arena region cannot satisfy a request
    AllocatorExhausted { requested: usize, available: usize },
    /// Backing memory for an arena could not be reserved
    ArenaInit { capacity: usize },
    /// Raw CSR arrays violate the row-pointer/length invariants
    CorruptedStructure,
    /// Worker threads for a parallel multiply could not be started
    WorkerPool,
}

/// Broad classes of failure, used by callers that only care about the kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Capacity,
    Dimension,
    Allocation,
    Precondition,
    Internal,
}

impl CsrError {
    /// Classify this error
    pub const fn category(&self) -> ErrorCategory {
        match self {
            CsrError::CapacityExceeded { .. } => ErrorCategory::Capacity,
            CsrError::DimensionMismatch { .. } => ErrorCategory::Dimension,
            CsrError::AllocatorExhausted { .. } | CsrError::ArenaInit { .. } => {
                ErrorCategory::Allocation
            }
            CsrError::InvalidDimensions { .. }
            | CsrError::IndexOutOfBounds { .. }
            | CsrError::CorruptedStructure => ErrorCategory::Precondition,
            CsrError::WorkerPool => ErrorCategory::Internal,
        }
    }
}

impl core::fmt::Display for CsrError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CsrError::InvalidDimensions { nrows, ncols } => {
                write!(f, "Invalid matrix dimensions {nrows}x{ncols}")
            }
            CsrError::IndexOutOfBounds {
                row,
                col,
                nrows,
                ncols,
            } => write!(
                f,
                "Index ({row}, {col}) out of bounds for {nrows}x{ncols} matrix"
            ),
            CsrError::CapacityExceeded { capacity } => {
                write!(f, "CSR storage is full (capacity {capacity})")
            }
            CsrError::DimensionMismatch { left, right } => write!(
                f,
                "Cannot multiply {}x{} by {}x{}",
                left.0, left.1, right.0, right.1
            ),
            CsrError::AllocatorExhausted {
                requested,
                available,
            } => write!(
                f,
                "Arena out of memory: requested {requested} bytes, {available} available"
            ),
            CsrError::ArenaInit { capacity } => {
                write!(f, "Failed to reserve {capacity} byte arena")
            }
            CsrError::CorruptedStructure => write!(f, "CSR arrays are inconsistent"),
            CsrError::WorkerPool => write!(f, "Failed to start worker threads"),
        }
    }
}

impl core::error::Error for CsrError {}

/// Result type for CSR operations
pub type Result<T> = core::result::Result<T, CsrError>;
