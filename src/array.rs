use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::{Bound, Deref, DerefMut, Range, RangeBounds};
use std::slice;

use crate::lifecycle;
use crate::memory::{self, RawBuffer};
use crate::ArrayError;

/// Capacity multiplier applied when a push, insert or resize runs out of room.
const GROWTH_FACTOR: usize = 2;

/// Capacity of the first allocation of an array that grows from nothing.
const MIN_NON_ZERO_CAPACITY: usize = 1;

/// Growable contiguous array that owns a single `RawBuffer`.
///
/// Slots `[0, len)` hold live items, slots `[len, capacity)` are allocated but
/// unconstructed. When an operation needs more room than the buffer has, a new
/// buffer is allocated with double the capacity (or exactly the required
/// capacity if that is larger), the items are relocated into it, and the old
/// buffer is released. Removing items never gives memory back.
///
/// Read access goes through `Deref<Target = [T]>`, so indexing, iteration and
/// the rest of the slice API are available. `at` is the checked accessor that
/// reports `ArrayError::OutOfRange` instead of panicking.
///
/// ```
/// use memvec::{Array, ArrayError};
///
/// let mut items: Array<i32> = (1..=5).collect();
/// items.erase(2);
/// assert_eq!(items, [1, 2, 4, 5]);
/// assert_eq!(Err(ArrayError::OutOfRange { index: 10, len: 4 }), items.at(10));
/// ```
pub struct Array<T> {
    buf: RawBuffer<T>,
    len: usize,
}

impl<T> Array<T> {
    /// Creates an empty array without allocating.
    pub const fn new() -> Array<T> {
        Array {
            buf: RawBuffer::empty(),
            len: 0,
        }
    }

    /// Creates an empty array with room for exactly `capacity` items.
    pub fn with_capacity(capacity: usize) -> Array<T> {
        Array {
            buf: RawBuffer::allocate(capacity),
            len: 0,
        }
    }

    /// Creates an array of `len` default-constructed items, with capacity `len`.
    pub fn with_len(len: usize) -> Array<T> where T: Default {
        let mut array = Array::with_capacity(len);
        array.resize_with(len, T::default);
        array
    }

    /// Creates an array holding clones of `values`, with capacity `values.len()`.
    pub fn from_slice(values: &[T]) -> Array<T> where T: Clone {
        let mut array = Array::with_capacity(values.len());
        array.insert_from_slice(0, values);
        array
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pointer to the first slot. Dangling (but non-null) when nothing is allocated.
    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr()
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [0, len) is live and the pointer is aligned and non-null.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above, and `&mut self` guarantees exclusive access.
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len) }
    }

    /// Returns the item at `index`, or `ArrayError::OutOfRange` if `index >= len`.
    pub fn at(&self, index: usize) -> Result<&T, ArrayError> {
        let len = self.len;
        self.as_slice().get(index).ok_or(ArrayError::OutOfRange { index, len })
    }

    /// Mutable counterpart of `at`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, ArrayError> {
        let len = self.len;
        self.as_mut_slice().get_mut(index).ok_or(ArrayError::OutOfRange { index, len })
    }

    /// Returns the item at `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than `len()`.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len, "get_unchecked({}) on length {}", index, self.len);
        &*self.buf.as_ptr().add(index)
    }

    /// Returns the item at `index` mutably without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than `len()`.
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len, "get_unchecked_mut({}) on length {}", index, self.len);
        &mut *self.buf.slot(index)
    }

    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Makes sure the array can hold `min_capacity` items without reallocating.
    ///
    /// Allocates exactly `min_capacity` slots if the current buffer is smaller;
    /// does nothing otherwise.
    pub fn reserve(&mut self, min_capacity: usize) {
        if self.capacity() >= min_capacity {
            return;
        }
        debug!(target: "memvec::array", "reserve {} (capacity {})", min_capacity, self.capacity());
        self.adopt_relocated(RawBuffer::allocate(min_capacity));
    }

    /// Fallible counterpart of `reserve`. On error the array is unchanged.
    pub fn try_reserve(&mut self, min_capacity: usize) -> Result<(), ArrayError> {
        if self.capacity() >= min_capacity {
            return Ok(());
        }
        debug!(target: "memvec::array", "try_reserve {} (capacity {})", min_capacity, self.capacity());
        self.adopt_relocated(RawBuffer::try_allocate(min_capacity)?);
        Ok(())
    }

    /// Appends `value`, growing the buffer if it is full.
    pub fn push_back(&mut self, value: T) {
        self.emplace_back_with(move || value);
    }

    /// Appends a clone of `value`.
    pub fn push_back_cloned(&mut self, value: &T) where T: Clone {
        self.push_back(value.clone());
    }

    /// Appends an item converted from `args` and returns a reference to it.
    ///
    /// ```
    /// use memvec::Array;
    ///
    /// let mut names: Array<String> = Array::new();
    /// names.emplace_back("memvec").push_str("!");
    /// assert_eq!(names, ["memvec!"]);
    /// ```
    pub fn emplace_back<A>(&mut self, args: A) -> &mut T where T: From<A> {
        self.emplace_back_with(move || T::from(args))
    }

    /// Appends the item returned by `make` and returns a reference to it.
    ///
    /// The buffer grows before `make` runs, so the item is constructed directly
    /// in its final slot.
    pub fn emplace_back_with<F>(&mut self, make: F) -> &mut T where F: FnOnce() -> T {
        if self.len == self.capacity() {
            self.grow_for("push", self.required(1));
        }
        let index = self.len;
        // SAFETY: index < capacity, and the slot past the live prefix is unconstructed.
        unsafe {
            let slot = self.buf.slot(index);
            lifecycle::construct_at(slot, make());
            self.len = index + 1;
            &mut *slot
        }
    }

    /// Removes the last item and returns it.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot was live and is now outside the live prefix.
        Some(unsafe { self.buf.slot(self.len).read() })
    }

    /// Inserts `value` before `index`, shifting everything after it one slot up.
    ///
    /// # Panics
    ///
    /// If `index > len`.
    pub fn insert(&mut self, index: usize, value: T) {
        let mut value = Some(value);
        self.insert_with(index, 1, |_| match value.take() {
            Some(value) => value,
            None => unreachable!("single insert constructs one item"),
        });
    }

    /// Inserts clones of `values` before `index`.
    ///
    /// ```
    /// use memvec::array;
    ///
    /// let mut items = array!['a', 'b', 'c'];
    /// items.insert_from_slice(1, &['x', 'y']);
    /// assert_eq!(items, ['a', 'x', 'y', 'b', 'c']);
    /// ```
    ///
    /// # Panics
    ///
    /// If `index > len`.
    pub fn insert_from_slice(&mut self, index: usize, values: &[T]) where T: Clone {
        self.insert_with(index, values.len(), |offset| values[offset].clone());
    }

    /// Opens a gap of `count` slots before `index` and fills it with `make`.
    ///
    /// Without enough capacity, the front is relocated into a fresh buffer, the
    /// gap is filled there, the tail is relocated behind it, and only then the
    /// old buffer is released. With enough capacity, the tail is shifted up in
    /// place (backward, so nothing is overwritten) before the gap is filled.
    ///
    /// The length is lowered while user code runs in `make`, so a panic leaks
    /// the items past the insertion point instead of dropping moved-out slots.
    fn insert_with<F>(&mut self, index: usize, count: usize, make: F)
        where F: FnMut(usize) -> T
    {
        let len = self.len;
        assert!(index <= len, "insertion index {} is out of range for array of length {}", index, len);
        if count == 0 {
            return;
        }
        let new_len = self.required(count);

        if new_len > self.capacity() {
            let new_capacity = self.grown_capacity(new_len);
            trace_realloc!("insert", self.capacity(), new_capacity, len);
            let mut fresh = RawBuffer::allocate(new_capacity);
            self.len = 0;
            // SAFETY: `fresh` has room for new_len items; the live prefix of the old
            // buffer is relocated exactly once, front part first, tail part last.
            unsafe {
                let src = self.buf.as_ptr();
                let dst = fresh.as_mut_ptr();
                lifecycle::relocate_range(dst, src, index);
                lifecycle::construct_range(dst.add(index), count, make);
                lifecycle::relocate_range(dst.add(index + count), src.add(index), len - index);
            }
            self.buf = fresh;
        } else {
            self.len = index;
            // SAFETY: new_len <= capacity; the tail moves up into [index + count, new_len)
            // and leaves [index, index + count) unconstructed for the new items.
            unsafe {
                let at = self.buf.slot(index);
                lifecycle::relocate_range_backward(at.add(count), at, len - index);
                lifecycle::construct_range(at, count, make);
            }
        }
        self.len = new_len;
    }

    /// Removes the item at `index`, shifting everything after it one slot down.
    ///
    /// # Panics
    ///
    /// If `index >= len`.
    pub fn erase(&mut self, index: usize) {
        assert!(index < self.len, "erase index {} is out of range for array of length {}", index, self.len);
        self.erase_range(index..index + 1);
    }

    /// Removes the items in `range`, shifting the tail down to close the gap.
    ///
    /// Capacity is kept.
    ///
    /// # Panics
    ///
    /// If the range is decreasing or ends past `len`.
    pub fn erase_range<R: RangeBounds<usize>>(&mut self, range: R) {
        let Range { start, end } = self.bounds(range);
        let removed = end - start;
        if removed == 0 {
            return;
        }
        let len = self.len;
        let tail = len - end;
        let assigned = removed.min(tail);

        self.len = start;
        // SAFETY: [start, end) and [end, len) are live. The first `assigned` tail items
        // are moved onto removed slots that are still live (dropping what they held);
        // any remaining tail items land in slots that those moves just vacated, and
        // any removed slots that received nothing are dropped explicitly.
        unsafe {
            let base = self.buf.as_mut_ptr();
            lifecycle::assign_move_range(base.add(start), base.add(end), assigned);
            if tail > removed {
                lifecycle::relocate_range(base.add(end), base.add(end + removed), tail - removed);
            } else {
                lifecycle::finalize_range(base.add(start + tail), removed - tail);
            }
        }
        self.len = len - removed;
    }

    /// Shortens the array to `new_len` items, dropping the rest. Capacity is kept.
    pub fn truncate(&mut self, new_len: usize) {
        let len = self.len;
        if new_len >= len {
            return;
        }
        self.len = new_len;
        // SAFETY: [new_len, len) was live and is now outside the live prefix.
        unsafe { lifecycle::finalize_range(self.buf.slot(new_len), len - new_len) };
    }

    /// Drops all items. Capacity is kept for reuse.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes to `new_len`, filling new slots with `T::default()`.
    pub fn resize(&mut self, new_len: usize) where T: Default {
        self.resize_with(new_len, T::default);
    }

    /// Resizes to `new_len`, filling new slots with clones of `value`.
    pub fn resize_with_value(&mut self, new_len: usize, value: &T) where T: Clone {
        self.resize_with(new_len, || value.clone());
    }

    /// Resizes to `new_len`, filling new slots with items returned by `make`.
    ///
    /// Growing past capacity relocates the existing items into the new buffer
    /// first and constructs the new items there. Shrinking drops the excess and
    /// keeps the capacity.
    pub fn resize_with<F>(&mut self, new_len: usize, mut make: F) where F: FnMut() -> T {
        let len = self.len;
        if new_len <= len {
            self.truncate(new_len);
            return;
        }
        if new_len > self.capacity() {
            self.grow_for("resize", new_len);
        }
        // SAFETY: [len, new_len) is within capacity and unconstructed.
        unsafe { lifecycle::construct_range(self.buf.slot(len), new_len - len, |_| make()) };
        self.len = new_len;
    }

    /// Replaces the contents with clones of `values`.
    ///
    /// Items that already exist are overwritten with `clone_from`, surplus items
    /// are dropped and missing ones are appended.
    pub fn assign_from_slice(&mut self, values: &[T]) where T: Clone {
        let shared = self.len.min(values.len());
        // SAFETY: [0, shared) is live, and `values` can not borrow from `self`.
        unsafe { lifecycle::assign_clone_range(self.buf.as_mut_ptr(), &values[..shared]) };
        if values.len() < self.len {
            self.truncate(values.len());
        } else {
            self.insert_from_slice(shared, &values[shared..]);
        }
    }

    /// Exchanges buffers with `other`. No item is touched.
    pub fn swap(&mut self, other: &mut Array<T>) {
        mem::swap(&mut self.buf, &mut other.buf);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Drops the current items and takes over the buffer of `source`, which is
    /// left empty with zero capacity.
    pub fn move_assign(&mut self, source: &mut Array<T>) {
        self.clear();
        self.buf = mem::replace(&mut source.buf, RawBuffer::empty());
        self.len = mem::replace(&mut source.len, 0);
    }

    /// Moves the contents out, leaving this array empty with zero capacity.
    pub fn take(&mut self) -> Array<T> {
        let mut taken = Array::new();
        taken.move_assign(self);
        taken
    }

    /// Hands the buffer and live length over to the caller, who becomes
    /// responsible for dropping the live items.
    pub(crate) fn into_raw_parts(mut self) -> (RawBuffer<T>, usize) {
        let len = mem::replace(&mut self.len, 0);
        (mem::replace(&mut self.buf, RawBuffer::empty()), len)
    }

    /// Length after adding `additional` items, panicking on overflow.
    fn required(&self, additional: usize) -> usize {
        match self.len.checked_add(additional) {
            Some(required) => required,
            None => memory::capacity_overflow(ArrayError::CapacityOverflow { requested: usize::MAX }),
        }
    }

    fn grown_capacity(&self, required: usize) -> usize {
        let doubled = match self.capacity() {
            0 => MIN_NON_ZERO_CAPACITY,
            capacity => capacity.saturating_mul(GROWTH_FACTOR),
        };
        doubled.max(required)
    }

    #[cfg_attr(not(feature = "logging"), allow(unused_variables))]
    fn grow_for(&mut self, what: &str, required: usize) {
        let new_capacity = self.grown_capacity(required);
        trace_realloc!(what, self.capacity(), new_capacity, self.len);
        self.adopt_relocated(RawBuffer::allocate(new_capacity));
    }

    /// Relocates all live items into `fresh` and releases the old buffer.
    fn adopt_relocated(&mut self, mut fresh: RawBuffer<T>) {
        debug_assert!(fresh.capacity() >= self.len);
        // SAFETY: the buffers are distinct and `fresh` has room for the live prefix.
        // The old slots are left unconstructed, so releasing the old buffer
        // without running destructors is exactly right.
        unsafe { lifecycle::relocate_range(fresh.as_mut_ptr(), self.buf.as_ptr(), self.len) };
        self.buf = fresh;
    }

    fn bounds<R: RangeBounds<usize>>(&self, range: R) -> Range<usize> {
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => match start.checked_add(1) {
                Some(start) => start,
                None => panic!("range start {} is out of range for array of length {}", start, self.len),
            },
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => match end.checked_add(1) {
                Some(end) => end,
                None => panic!("range end {} is out of range for array of length {}", end, self.len),
            },
            Bound::Excluded(&end) => end,
            Bound::Unbounded => self.len,
        };
        assert!(start <= end, "range start {} is past range end {}", start, end);
        assert!(end <= self.len, "range end {} is out of range for array of length {}", end, self.len);
        start..end
    }
}

impl<T> Drop for Array<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for Array<T> {
    fn default() -> Array<T> {
        Array::new()
    }
}

impl<T: Clone> Clone for Array<T> {
    fn clone(&self) -> Array<T> {
        let mut copy = Array::new();
        copy.clone_from(self);
        copy
    }

    /// Clones `source` into a fresh buffer of the same capacity, then drops the
    /// current items and releases the current buffer.
    fn clone_from(&mut self, source: &Array<T>) {
        let mut fresh = RawBuffer::allocate(source.capacity());
        let items = source.as_slice();
        // SAFETY: `fresh` has room for source.len() items and nothing else sees it yet.
        unsafe { lifecycle::construct_range(fresh.as_mut_ptr(), items.len(), |i| items[i].clone()) };
        self.clear();
        self.buf = fresh;
        self.len = items.len();
    }
}

impl<T> Deref for Array<T> {
    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for Array<T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for Array<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for Array<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> fmt::Debug for Array<T> where T: fmt::Debug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, U> PartialEq<Array<U>> for Array<T> where T: PartialEq<U> {
    fn eq(&self, other: &Array<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U> PartialEq<[U]> for Array<T> where T: PartialEq<U> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<'a, T, U> PartialEq<&'a [U]> for Array<T> where T: PartialEq<U> {
    fn eq(&self, other: &&'a [U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for Array<T> where T: PartialEq<U> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == &other[..]
    }
}

impl<T, U> PartialEq<Vec<U>> for Array<T> where T: PartialEq<U> {
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Array<T> {}

impl<T: Hash> Hash for Array<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<T> Extend<T> for Array<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if lower > self.capacity() - self.len {
            self.grow_for("extend", self.required(lower));
        }
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for Array<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied())
    }
}

impl<T: Clone> From<&[T]> for Array<T> {
    fn from(values: &[T]) -> Array<T> {
        Array::from_slice(values)
    }
}

impl<T, const N: usize> From<[T; N]> for Array<T> {
    fn from(values: [T; N]) -> Array<T> {
        let mut array = Array::with_capacity(N);
        array.extend(values);
        array
    }
}

impl<T> From<Vec<T>> for Array<T> {
    fn from(values: Vec<T>) -> Array<T> {
        let mut array = Array::with_capacity(values.len());
        array.extend(values);
        array
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Array<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.iter_mut()
    }
}

/// Creates an `Array` from a list of items, or from `value; count` clones.
#[macro_export]
macro_rules! array {
    () => (
        $crate::Array::new()
    );
    ($value:expr; $count:expr) => ({
        let mut array = $crate::Array::new();
        array.resize_with_value($count, &$value);
        array
    });
    ($($item:expr),+ $(,)?) => (
        $crate::Array::from([$($item),+])
    );
}
