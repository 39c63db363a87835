use std::fmt;
use std::iter::FusedIterator;
use std::slice;

use crate::lifecycle;
use crate::memory::RawBuffer;
use crate::Array;

/// Owning iterator over the items of an `Array`.
///
/// Items not yet yielded are dropped together with the iterator, then the
/// buffer is released.
pub struct IntoIter<T> {
    buf: RawBuffer<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    /// Items that have not been yielded yet.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [start, end) is still live.
        unsafe { slice::from_raw_parts(self.buf.as_ptr().add(self.start), self.end - self.start) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let index = self.start;
        self.start += 1;
        // SAFETY: the slot was live and is now outside [start, end).
        Some(unsafe { self.buf.slot(index).read() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: as in `next`.
        Some(unsafe { self.buf.slot(self.end).read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining = self.end - self.start;
        self.end = self.start;
        if remaining > 0 {
            // SAFETY: these slots were never yielded.
            unsafe { lifecycle::finalize_range(self.buf.slot(self.start), remaining) };
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> IntoIterator for Array<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let (buf, len) = self.into_raw_parts();
        IntoIter { buf, start: 0, end: len }
    }
}
