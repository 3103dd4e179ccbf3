//! Draining iterator for [`Header`] (and thus for
//! [`SmallVec`](crate::SmallVec)).

use core::iter::FusedIterator;
use core::ops::{Range, RangeBounds};
use core::{fmt, ptr, slice};

use super::Header;
use crate::common::{self, RangeError};

/// A draining iterator, see [`Header::drain`].
///
/// The vector's length is clamped below the drained range for the whole
/// lifetime of the iterator, so leaking it (with [`core::mem::forget`])
/// loses elements but never exposes moved-out slots.
pub struct Drain<'a, T> {
    header: &'a mut Header<T>,
    start: usize,
    end: usize,
    tail_start: usize,
    tail_len: usize,
}

impl<'a, T> Drain<'a, T> {
    pub(crate) fn new(
        header: &'a mut Header<T>,
        range: impl RangeBounds<usize>,
    ) -> Result<Self, RangeError> {
        let len = header.len();
        let Range { start, end } = common::range(range, len)?;

        // leak safety: everything at or above `start` is now untracked
        // SAFETY: `start <= len`, lowering the length is always allowed.
        unsafe { header.set_len(start) };

        Ok(Self {
            header,
            start,
            end,
            tail_start: end,
            tail_len: len - end,
        })
    }

    /// Returns the remaining elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the elements in `start..end` are initialized and not yet
        // moved out.
        unsafe {
            slice::from_raw_parts(self.header.as_ptr().add(self.start), self.end - self.start)
        }
    }
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start` is in the untracked drained range, initialized
        // and read exactly once.
        let value = unsafe { self.header.as_ptr().add(self.start).read() };
        self.start += 1;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for Drain<'_, T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: same as `next`.
        Some(unsafe { self.header.as_ptr().add(self.end).read() })
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

impl<T> FusedIterator for Drain<'_, T> {}

impl<T> Drop for Drain<'_, T> {
    fn drop(&mut self) {
        // SAFETY: drops the undrained elements, then moves the tail down
        // next to the kept prefix; all slots are within capacity.
        unsafe {
            let base = self.header.as_mut_ptr();
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                base.add(self.start),
                self.end - self.start,
            ));

            let len = self.header.len();
            ptr::copy(base.add(self.tail_start), base.add(len), self.tail_len);
            self.header.set_len(len + self.tail_len);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Drain<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Drain").field(&self.as_slice()).finish()
    }
}
