/*!

Placement construction and explicit destruction of items in raw slots.

Nothing here knows about lengths or capacities: every function takes a slot
pointer and an item count and trusts the caller about which slots are live.
A slot is *live* if it holds a constructed value that has not been dropped or
moved out, and *unconstructed* otherwise.

Ranges are given as a start pointer plus a count. Pointer pairs would not
work for zero-sized items, where every slot has the same address.

Relocation is a bitwise move. It ends the lifetime of the source without
running its destructor, so relocated sources must never be finalized.

*/

use std::ptr;

/// Constructs `value` in an unconstructed slot.
///
/// # Safety
///
/// `slot` must be valid for writes and must not hold a live value (it would be
/// overwritten without being dropped).
#[inline(always)]
pub unsafe fn construct_at<T>(slot: *mut T, value: T) {
    ptr::write(slot, value);
}

/// Constructs `count` items starting at `begin`, asking `make` for each one.
///
/// `make` receives the offset of the slot it is constructing. If it panics,
/// items constructed so far are leaked.
///
/// # Safety
///
/// All `count` slots must be valid for writes and unconstructed.
pub unsafe fn construct_range<T, F>(begin: *mut T, count: usize, mut make: F)
    where F: FnMut(usize) -> T
{
    for offset in 0..count {
        construct_at(begin.add(offset), make(offset));
    }
}

/// Moves `count` items from `src` to `dst`, lowest address first.
///
/// Afterwards the source slots are unconstructed and the destination slots
/// are live. Use when `dst` is in another buffer or below `src`.
///
/// # Safety
///
/// Source slots must be live, destination slots unconstructed (or already
/// relocated-from earlier in this same call), and `dst` must not be above `src`
/// when the ranges overlap.
pub unsafe fn relocate_range<T>(dst: *mut T, src: *const T, count: usize) {
    for offset in 0..count {
        ptr::write(dst.add(offset), ptr::read(src.add(offset)));
    }
}

/// Moves `count` items from `src` to `dst`, highest address first.
///
/// Use when the ranges overlap and `dst` is above `src`, such as when opening
/// a gap in the middle of an array.
///
/// # Safety
///
/// Same as `relocate_range`, with `dst` not below `src` when the ranges overlap.
pub unsafe fn relocate_range_backward<T>(dst: *mut T, src: *const T, count: usize) {
    for offset in (0..count).rev() {
        ptr::write(dst.add(offset), ptr::read(src.add(offset)));
    }
}

/// Drops the live item in `slot`, leaving it unconstructed.
///
/// # Safety
///
/// `slot` must hold a live value.
#[inline(always)]
pub unsafe fn finalize_at<T>(slot: *mut T) {
    ptr::drop_in_place(slot);
}

/// Drops `count` live items starting at `begin`.
///
/// If one destructor panics, the remaining ones still run.
///
/// # Safety
///
/// All `count` slots must hold live values.
#[inline]
pub unsafe fn finalize_range<T>(begin: *mut T, count: usize) {
    if count == 1 {
        finalize_at(begin);
    } else {
        ptr::drop_in_place(ptr::slice_from_raw_parts_mut(begin, count));
    }
}

/// Overwrites live items at `dst` with clones of `src`, using `clone_from`.
///
/// # Safety
///
/// `src.len()` slots starting at `dst` must hold live values and must not
/// overlap `src`.
pub unsafe fn assign_clone_range<T: Clone>(dst: *mut T, src: &[T]) {
    for (offset, value) in src.iter().enumerate() {
        (*dst.add(offset)).clone_from(value);
    }
}

/// Overwrites live items at `dst` by moving `count` items out of `src`,
/// lowest address first.
///
/// The previous destination values are dropped by the assignment; the source
/// slots become unconstructed.
///
/// # Safety
///
/// Destination slots must hold live values and no destination slot may be one
/// of the source slots. Source slots must be live.
pub unsafe fn assign_move_range<T>(dst: *mut T, src: *const T, count: usize) {
    for offset in 0..count {
        *dst.add(offset) = ptr::read(src.add(offset));
    }
}
