//! Layout constants

/// Default alignment boundary for arena allocations
pub const ALIGNMENT_BOUNDARY: usize = 8;

/// Default arena size (1 MiB)
pub const DEFAULT_ARENA_CAPACITY: usize = 1024 * 1024;
