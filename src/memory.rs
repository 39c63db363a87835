use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use crate::ArrayError;

/// Uniquely owned block of raw storage with room for `capacity` values of `T`.
///
/// The buffer knows nothing about which slots hold live values. It never
/// initializes a slot and never runs a destructor: dropping a `RawBuffer` only
/// returns the bytes to the global allocator. Whoever writes values into the
/// slots must drop them (or move them out) before the buffer goes away.
///
/// A zero capacity buffer holds no allocation. Zero-sized `T` never allocates
/// either, but still reports the capacity it was asked for.
pub struct RawBuffer<T> {
    ptr: NonNull<T>,
    capacity: usize,
    _owns: PhantomData<T>,
}

// SAFETY: the buffer is uniquely owned raw storage for `T`, same as `Box<[T]>`.
unsafe impl<T: Send> Send for RawBuffer<T> {}
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    /// Buffer with no allocation and zero capacity.
    pub const fn empty() -> RawBuffer<T> {
        RawBuffer {
            ptr: NonNull::dangling(),
            capacity: 0,
            _owns: PhantomData,
        }
    }

    /// Allocates uninitialized storage for exactly `capacity` slots.
    ///
    /// Aborts through `handle_alloc_error` if the allocator fails, and panics if
    /// the byte size overflows.
    pub fn allocate(capacity: usize) -> RawBuffer<T> {
        match RawBuffer::try_allocate(capacity) {
            Ok(buffer) => buffer,
            Err(ArrayError::AllocFailed { size, align }) => {
                // SAFETY: the same size and align already formed a valid `Layout`.
                alloc::handle_alloc_error(unsafe { Layout::from_size_align_unchecked(size, align) })
            }
            Err(e) => capacity_overflow(e),
        }
    }

    /// Fallible counterpart of `allocate`.
    pub fn try_allocate(capacity: usize) -> Result<RawBuffer<T>, ArrayError> {
        if capacity == 0 {
            return Ok(RawBuffer::empty());
        }
        if mem::size_of::<T>() == 0 {
            return Ok(RawBuffer {
                ptr: NonNull::dangling(),
                capacity,
                _owns: PhantomData,
            });
        }

        let layout = Self::layout_for(capacity)?;
        // SAFETY: layout has a non-zero size, checked above.
        let ptr = unsafe { alloc::alloc(layout) } as *mut T;
        let ptr = NonNull::new(ptr).ok_or(ArrayError::AllocFailed {
            size: layout.size(),
            align: layout.align(),
        })?;

        trace!(target: "memvec::memory", "allocate {} slots ({} bytes)", capacity, layout.size());

        Ok(RawBuffer {
            ptr,
            capacity,
            _owns: PhantomData,
        })
    }

    fn layout_for(capacity: usize) -> Result<Layout, ArrayError> {
        Layout::array::<T>(capacity).map_err(|_| ArrayError::CapacityOverflow { requested: capacity })
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True if this buffer owns memory obtained from the allocator.
    #[inline(always)]
    pub fn is_allocated(&self) -> bool {
        self.capacity != 0 && mem::size_of::<T>() != 0
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Pointer to slot `index`.
    ///
    /// # Safety
    ///
    /// `index` must not exceed `capacity` (one-past-the-end is allowed).
    #[inline(always)]
    pub unsafe fn slot(&mut self, index: usize) -> *mut T {
        debug_assert!(index <= self.capacity, "slot {} past capacity {}", index, self.capacity);
        self.ptr.as_ptr().add(index)
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if !self.is_allocated() {
            return;
        }
        if let Ok(layout) = Self::layout_for(self.capacity) {
            trace!(target: "memvec::memory", "release {} slots ({} bytes)", self.capacity, layout.size());
            // SAFETY: allocated in `try_allocate` with this very layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr() as *mut u8, layout) };
        }
    }
}

#[cold]
#[inline(never)]
pub(crate) fn capacity_overflow(e: ArrayError) -> ! {
    panic!("{}", e)
}
