//! Bump-allocated memory region for fixed-capacity CSR storage
//!
//! An [`Arena`] reserves one contiguous byte buffer up front and hands out
//! disjoint pieces of it by advancing an offset. Pieces are never freed
//! individually; the whole region is rewound with [`Arena::reset`] or
//! released with [`Arena::destroy`].
//!
//! Allocations borrow the arena immutably while `reset` needs a mutable
//! borrow, so nothing handed out before a reset can be used after it.

use std::alloc::{self, Layout};
use std::cell::Cell;
use std::ptr::NonNull;

use csrmm_core::{array_byte_size, calculate_padding, CsrError, Result, ALIGNMENT_BOUNDARY};

/// Single-threaded bump allocator over a pre-sized region
pub struct Arena {
    buffer: NonNull<u8>,
    layout: Layout,
    capacity: usize,
    offset: Cell<usize>,
}

// SAFETY: the arena exclusively owns its buffer; moving it to another thread
// moves that ownership. `Cell` keeps it `!Sync`.
unsafe impl Send for Arena {}

impl Arena {
    /// Reserve a zero-filled region of `capacity` bytes
    pub fn new(capacity: usize) -> Result<Self> {
        // zero-sized layouts cannot be passed to the global allocator
        let layout = Layout::from_size_align(capacity.max(1), ALIGNMENT_BOUNDARY)
            .map_err(|_| CsrError::ArenaInit { capacity })?;

        // SAFETY: layout has non-zero size
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let buffer = NonNull::new(raw).ok_or(CsrError::ArenaInit { capacity })?;

        log::info!("Created arena with {capacity} bytes");

        Ok(Self {
            buffer,
            layout,
            capacity,
            offset: Cell::new(0),
        })
    }

    /// Total size of the region in bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes handed out since creation or the last reset
    pub fn used(&self) -> usize {
        self.offset.get()
    }

    /// Bytes still available
    pub fn remaining(&self) -> usize {
        self.capacity - self.offset.get()
    }

    /// Carve `size` raw bytes off the region
    ///
    /// Returns `None` when `offset + size` would exceed the capacity; the
    /// arena is left untouched in that case.
    #[allow(clippy::mut_from_ref)]
    pub fn allocate(&self, size: usize) -> Option<&mut [u8]> {
        let start = self.offset.get();
        self.carve(start, size)
    }

    /// Allocate a zero-initialized slice of `len` elements, aligned for `T`
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_slice<T: bytemuck::Pod>(&self, len: usize) -> Result<&mut [T]> {
        let bytes = array_byte_size::<T>(len)?;

        // pad against the real address; the buffer itself is only 8-aligned
        let offset = self.offset.get();
        let current = self.buffer.as_ptr() as usize + offset;
        let start = offset + calculate_padding(current, std::mem::align_of::<T>());

        let region = self
            .carve(start, bytes)
            .ok_or(CsrError::AllocatorExhausted {
                requested: bytes,
                available: self.remaining(),
            })?;
        region.fill(0);

        bytemuck::try_cast_slice_mut(region).map_err(|_| CsrError::AllocatorExhausted {
            requested: bytes,
            available: self.remaining(),
        })
    }

    /// Rewind to an empty region without releasing memory
    pub fn reset(&mut self) {
        log::debug!("Resetting arena ({} of {} bytes used)", self.used(), self.capacity);
        self.offset.set(0);
    }

    /// Release the region
    pub fn destroy(self) {
        log::info!("Destroying arena with {} bytes", self.capacity);
        drop(self);
    }

    #[allow(clippy::mut_from_ref)]
    fn carve(&self, start: usize, size: usize) -> Option<&mut [u8]> {
        let end = start.checked_add(size)?;
        if end > self.capacity {
            log::debug!(
                "Arena out of memory: requested {size} bytes at offset {start}, capacity {}",
                self.capacity
            );
            return None;
        }

        self.offset.set(end);

        // SAFETY:
        // 1. start..end lies inside the allocation (end <= capacity <= layout size)
        // 2. the offset only grows between resets, so this range is disjoint
        //    from every slice previously handed out
        // 3. reset needs &mut self, so no handed-out slice survives it
        // 4. the buffer was zero-initialized at creation
        Some(unsafe { std::slice::from_raw_parts_mut(self.buffer.as_ptr().add(start), size) })
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        // SAFETY: buffer was allocated in `new` with exactly this layout
        unsafe { alloc::dealloc(self.buffer.as_ptr(), self.layout) };
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity)
            .field("used", &self.used())
            .finish()
    }
}
