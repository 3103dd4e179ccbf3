//! Size-erased vector header.
//!
//! [`Header<T>`] is the unsized common prefix of every
//! [`SmallVec<T, N>`](crate::SmallVec): the heap pointer, the capacity, the
//! length, and the inline buffer viewed as a slice whose length is the
//! (erased) inline capacity `N`. A `SmallVec<T, N>` dereferences to
//! `Header<T>`, so code written against `&mut Header<T>` works with any
//! inline capacity without allocation, copies, or virtual dispatch.
//!
//! All the mutating operations live here; `SmallVec` itself only adds the
//! constructors and the owned conversions.

use core::cmp::Ordering;
use core::hash::{Hash, Hasher};
use core::mem::{size_of, MaybeUninit};
use core::ops::{Deref, DerefMut, RangeBounds};
use core::ptr::NonNull;
use core::{fmt, mem, ptr, slice};

use crate::alloc::vec::Vec;

use crate::common::panic_display;
use crate::macros::{slice_eq, slice_ord};
use crate::raw::{self, ReserveError};

mod drain;

#[cfg(test)]
mod tests;

pub use drain::Drain;

/// Size-erased small vector.
///
/// This type is unsized and cannot be created directly: it is obtained by
/// dereferencing a [`SmallVec<T, N>`](crate::SmallVec), which erases the
/// const parameter `N` behind the pointer metadata.
///
/// A header is in one of two states:
///
/// * **inline**: the elements live in the buffer embedded in the `SmallVec`,
///   right after the header fields;
/// * **heap**: the elements live in a separate allocation.
///
/// The state is observable with [`is_inline`](Self::is_inline) but does not
/// change any operation's behavior.
///
/// # Examples
///
/// ```
/// use sbvec::{Header, SmallVec};
///
/// fn dedup_push(v: &mut Header<i32>, value: i32) {
///     if v.last() != Some(&value) {
///         v.push(value);
///     }
/// }
///
/// let mut v = SmallVec::<i32, 4>::new();
/// dedup_push(&mut v, 1);
/// dedup_push(&mut v, 1);
/// dedup_push(&mut v, 2);
/// assert_eq!(v, [1, 2]);
/// ```
#[repr(C)]
pub struct Header<T> {
    ptr: *mut T,
    cap: usize,
    len: usize,
    buf: [MaybeUninit<T>],
}

// SAFETY: the raw pointer is owned storage, never shared.
unsafe impl<T: Send> Send for Header<T> {}

// SAFETY: same as above, `&Header<T>` exposes only `&T` access.
unsafe impl<T: Sync> Sync for Header<T> {}

impl<T> Header<T> {
    /// Returns the number of elements in the vector.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the vector can hold without
    /// reallocating.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.cap
    }

    /// Returns the inline capacity, that is, the const parameter `N` of the
    /// [`SmallVec<T, N>`](crate::SmallVec) this header belongs to.
    ///
    /// This is the one place where the erased size resurfaces: it is read
    /// back from the pointer metadata.
    #[inline]
    #[must_use]
    pub const fn inline_capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the maximum number of elements a vector of `T` can hold.
    #[inline]
    #[must_use]
    pub const fn max_len(&self) -> usize {
        if size_of::<T>() == 0 {
            usize::MAX
        } else {
            isize::MAX as usize / size_of::<T>()
        }
    }

    /// Returns `true` if the elements are stored in the inline buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbvec::SmallVec;
    ///
    /// let mut v: SmallVec<i32, 2> = SmallVec::new();
    /// assert!(v.is_inline());
    /// v.extend_from_slice(&[1, 2, 3]);
    /// assert!(!v.is_inline());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.ptr.is_null()
    }

    /// Returns a raw pointer to the vector's storage.
    #[inline]
    #[must_use]
    pub const fn as_ptr(&self) -> *const T {
        if self.ptr.is_null() {
            self.buf.as_ptr().cast()
        } else {
            self.ptr
        }
    }

    /// Returns a mutable raw pointer to the vector's storage.
    #[inline]
    #[must_use]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        if self.ptr.is_null() {
            self.buf.as_mut_ptr().cast()
        } else {
            self.ptr
        }
    }

    /// Extracts a slice containing the entire vector.
    #[inline]
    #[must_use]
    pub const fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` elements are initialized (type invariant).
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// Extracts a mutable slice containing the entire vector.
    #[inline]
    #[must_use]
    pub const fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len;
        // SAFETY: the first `len` elements are initialized (type invariant).
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), len) }
    }

    /// Returns the remaining spare capacity as a slice of `MaybeUninit<T>`.
    ///
    /// Useful to fill a vector with data before marking it as initialized
    /// with [`set_len`](Self::set_len).
    #[inline]
    pub const fn spare_capacity_mut(&mut self) -> &mut [MaybeUninit<T>] {
        let spare = self.cap - self.len;
        let len = self.len;
        // SAFETY: storage is valid for `cap` elements, spare part included.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr().add(len).cast(), spare) }
    }

    /// Forces the length of the vector to `new_len`.
    ///
    /// # Safety
    ///
    /// * `new_len` must be less than or equal to [`capacity`](Self::capacity);
    /// * the first `new_len` elements must be initialized.
    #[inline]
    pub const unsafe fn set_len(&mut self, new_len: usize) {
        debug_assert!(new_len <= self.cap);
        self.len = new_len;
    }

    /// Reserves capacity for at least `additional` more elements.
    ///
    /// Grows the capacity following the amortized doubling policy, so
    /// repeated pushes stay O(1) amortized.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity overflows, and aborts if the allocator
    /// refuses the request.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbvec::SmallVec;
    ///
    /// let mut v = SmallVec::<i32, 4>::new();
    /// v.reserve(10);
    /// assert!(v.capacity() >= 10);
    /// ```
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        if let Err(err) = self.try_reserve(additional) {
            err.bail();
        }
    }

    /// Reserves capacity for at least `additional` more elements.
    ///
    /// # Errors
    ///
    /// Returns a [`ReserveError`] if the capacity overflows or the
    /// allocation fails; the vector is left untouched.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), ReserveError> {
        let Some(needed) = self.len.checked_add(additional) else {
            return Err(ReserveError::CapacityOverflow);
        };
        if needed <= self.cap {
            return Ok(());
        }
        let max_len = self.max_len();
        if needed > max_len {
            return Err(ReserveError::CapacityOverflow);
        }
        // the doubling may overshoot the representable length, the request
        // itself cannot
        let new_cap = raw::next_capacity(self.cap, needed);
        self.grow_to(if new_cap > max_len { max_len } else { new_cap })
    }

    /// Grows the storage to exactly `new_cap` elements.
    fn grow_to(&mut self, new_cap: usize) -> Result<(), ReserveError> {
        debug_assert!(new_cap > self.cap);

        if size_of::<T>() == 0 {
            // zero-sized elements never hit the allocator
            self.ptr = NonNull::dangling().as_ptr();
            self.cap = usize::MAX;
            return Ok(());
        }

        let new_ptr = raw::try_alloc_array::<T>(new_cap)?;
        // SAFETY: both regions are valid for `len` elements and distinct
        // (the new allocation is fresh).
        unsafe {
            raw::relocate(self.as_ptr(), new_ptr, self.len);
        }
        if !self.ptr.is_null() {
            // SAFETY: heap state, `ptr` was allocated with capacity `cap`.
            unsafe { raw::dealloc_array(self.ptr, self.cap) };
        }
        self.ptr = new_ptr;
        self.cap = new_cap;
        Ok(())
    }

    /// Shrinks the heap allocation to fit the current length.
    ///
    /// Inline vectors are left untouched. An empty heap vector goes back to
    /// the inline state, releasing its allocation. Otherwise the elements
    /// are relocated into an exact-sized allocation; if that allocation
    /// fails the current storage is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbvec::SmallVec;
    ///
    /// let mut v = SmallVec::<i32, 2>::from_slice(&[1, 2, 3, 4, 5]);
    /// v.truncate(0);
    /// v.shrink_to_fit();
    /// assert!(v.is_inline());
    /// ```
    pub fn shrink_to_fit(&mut self) {
        if self.is_inline() {
            return;
        }
        if size_of::<T>() == 0 {
            if self.len == 0 {
                self.ptr = ptr::null_mut();
                self.cap = self.inline_capacity();
            }
            return;
        }
        if self.len == 0 {
            // SAFETY: heap state, nothing left to relocate.
            unsafe { raw::dealloc_array(self.ptr, self.cap) };
            self.ptr = ptr::null_mut();
            self.cap = self.inline_capacity();
            return;
        }
        if self.len == self.cap {
            return;
        }
        let new_ptr = match raw::try_alloc_array::<T>(self.len) {
            Ok(new_ptr) => new_ptr,
            Err(err) => err.bail(),
        };
        // SAFETY: distinct regions, both valid for `len` elements.
        unsafe {
            raw::relocate(self.ptr, new_ptr, self.len);
            raw::dealloc_array(self.ptr, self.cap);
        }
        self.ptr = new_ptr;
        self.cap = self.len;
    }

    /// Appends an element to the back of the vector.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbvec::{small_vec, SmallVec};
    ///
    /// let mut v: SmallVec<i32, 4> = small_vec![1, 2];
    /// v.push(3);
    /// assert_eq!(v, [1, 2, 3]);
    /// ```
    #[inline]
    pub fn push(&mut self, value: T) {
        if self.len == self.cap {
            self.reserve(1);
        }
        // SAFETY: the slot at `len` is within capacity and uninitialized.
        unsafe {
            self.as_mut_ptr().add(self.len).write(value);
            self.len += 1;
        }
    }

    /// Removes the last element and returns it, or `None` if empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            // SAFETY: slot `len` was the last initialized element; the
            // length is already decremented so it will not be dropped twice.
            Some(unsafe { self.as_ptr().add(self.len).read() })
        }
    }

    /// Inserts an element at position `index`, shifting everything after it
    /// to the right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbvec::{small_vec, SmallVec};
    ///
    /// let mut v: SmallVec<i32, 4> = small_vec![1, 3];
    /// v.insert(1, 2);
    /// assert_eq!(v, [1, 2, 3]);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) {
        let len = self.len;
        assert!(index <= len, "index out of bounds");

        if len == self.cap {
            self.reserve(1);
        }
        // SAFETY: `index <= len < cap`, the shift stays within capacity.
        unsafe {
            let p = self.as_mut_ptr().add(index);
            ptr::copy(p, p.add(1), len - index);
            p.write(value);
            self.len = len + 1;
        }
    }

    /// Inserts the clones of a slice at position `index`.
    ///
    /// If a clone panics, already-inserted elements stay in the vector and
    /// the tail is moved back into place.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_from_slice(&mut self, index: usize, slice: &[T])
    where
        T: Clone,
    {
        let len = self.len;
        assert!(index <= len, "index out of bounds");

        let count = slice.len();
        self.reserve(count);
        let mut gap = GapGuard::open(self, index, count);
        for item in slice {
            gap.fill(item.clone());
        }
    }

    /// Inserts `count` copies of `value` at position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_fill(&mut self, index: usize, count: usize, value: T)
    where
        T: Clone,
    {
        let len = self.len;
        assert!(index <= len, "index out of bounds");

        if count == 0 {
            return;
        }
        self.reserve(count);
        let mut gap = GapGuard::open(self, index, count);
        for _ in 1..count {
            gap.fill(value.clone());
        }
        gap.fill(value);
    }

    /// Inserts the elements of an iterator at position `index`, in order.
    ///
    /// The iterator is consumed in a single pass, so it may be of unknown
    /// length. The tail of the vector is parked aside while the new
    /// elements are appended, then moved back.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbvec::{small_vec, SmallVec};
    ///
    /// let mut v: SmallVec<i32, 4> = small_vec![1, 5];
    /// v.insert_many(1, 2..5);
    /// assert_eq!(v, [1, 2, 3, 4, 5]);
    /// ```
    pub fn insert_many(&mut self, index: usize, iter: impl IntoIterator<Item = T>) {
        let len = self.len;
        assert!(index <= len, "index out of bounds");

        let tail_len = len - index;
        let mut tail: Vec<T> = Vec::with_capacity(tail_len);
        // SAFETY: moves the tail out; lengths are fixed up immediately so a
        // panic in the iterator leaves every element owned exactly once.
        unsafe {
            raw::relocate(self.as_ptr().add(index), tail.as_mut_ptr(), tail_len);
            self.set_len(index);
            tail.set_len(tail_len);
        }
        for item in iter {
            self.push(item);
        }
        self.reserve(tail.len());
        // SAFETY: room was just reserved; the tail vector gives up
        // ownership and is emptied before it drops.
        unsafe {
            raw::relocate(tail.as_ptr(), self.as_mut_ptr().add(self.len), tail.len());
            self.set_len(self.len + tail.len());
            tail.set_len(0);
        }
    }

    /// Removes and returns the element at position `index`, shifting
    /// everything after it to the left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbvec::{small_vec, SmallVec};
    ///
    /// let mut v: SmallVec<i32, 4> = small_vec![1, 2, 3];
    /// assert_eq!(v.remove(1), 2);
    /// assert_eq!(v, [1, 3]);
    /// ```
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.len;
        assert!(index < len, "index out of bounds");

        // SAFETY: `index < len`, the element is initialized; the shift
        // copies initialized elements only.
        unsafe {
            let p = self.as_mut_ptr().add(index);
            let value = p.read();
            ptr::copy(p.add(1), p, len - index - 1);
            self.len = len - 1;
            value
        }
    }

    /// Removes and returns the element at position `index`, replacing it
    /// with the last element.
    ///
    /// O(1) but does not preserve ordering.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn swap_remove(&mut self, index: usize) -> T {
        let len = self.len;
        assert!(index < len, "index out of bounds");

        // SAFETY: both `index` and `len - 1` are initialized; when they
        // coincide the overwrite is a no-op on an already-moved-out slot.
        unsafe {
            let base = self.as_mut_ptr();
            let value = base.add(index).read();
            let last = base.add(len - 1).read();
            base.add(index).write(last);
            self.len = len - 1;
            value
        }
    }

    /// Shortens the vector to `new_len`, dropping the excess elements.
    ///
    /// Does nothing if `new_len >= len`. The capacity is unchanged.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail_len = self.len - new_len;
        // length is lowered before the drops so a panicking `Drop` cannot
        // expose dropped elements
        // SAFETY: the dropped slice covers initialized elements only.
        unsafe {
            let tail =
                ptr::slice_from_raw_parts_mut(self.as_mut_ptr().add(new_len), tail_len);
            self.len = new_len;
            ptr::drop_in_place(tail);
        }
    }

    /// Removes all elements. The capacity is unchanged.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes the vector to `new_len` elements, cloning `value` to fill
    /// new slots or dropping the excess.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbvec::{small_vec, SmallVec};
    ///
    /// let mut v: SmallVec<i32, 4> = small_vec![1, 2];
    /// v.resize(4, 0);
    /// assert_eq!(v, [1, 2, 0, 0]);
    /// v.resize(1, 0);
    /// assert_eq!(v, [1]);
    /// ```
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }
        self.reserve(new_len - self.len);
        // the last slot moves `value` instead of cloning it
        for _ in 1..new_len - self.len {
            // SAFETY: within the freshly reserved capacity; the length is
            // bumped per element so a panicking clone loses nothing.
            unsafe {
                self.as_mut_ptr().add(self.len).write(value.clone());
                self.len += 1;
            }
        }
        // SAFETY: same as above.
        unsafe {
            self.as_mut_ptr().add(self.len).write(value);
            self.len += 1;
        }
    }

    /// Resizes the vector to `new_len` elements, filling new slots with
    /// the results of calling `f`, in order.
    pub fn resize_with(&mut self, new_len: usize, mut f: impl FnMut() -> T) {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }
        self.reserve(new_len - self.len);
        while self.len < new_len {
            // SAFETY: within the freshly reserved capacity; the length is
            // bumped per element so a panicking `f` loses nothing.
            unsafe {
                self.as_mut_ptr().add(self.len).write(f());
                self.len += 1;
            }
        }
    }

    /// Appends the clones of a slice to the back of the vector.
    pub fn extend_from_slice(&mut self, slice: &[T])
    where
        T: Clone,
    {
        self.reserve(slice.len());
        for item in slice {
            // SAFETY: within the freshly reserved capacity; length bumped
            // per element for panic safety.
            unsafe {
                self.as_mut_ptr().add(self.len).write(item.clone());
                self.len += 1;
            }
        }
    }

    /// Replaces the contents with a clone of `other`'s contents.
    ///
    /// Already-present elements are cloned into rather than dropped and
    /// recreated, like `Vec::clone_from`. Works across different inline
    /// capacities.
    pub fn assign(&mut self, other: &Self)
    where
        T: Clone,
    {
        self.truncate(other.len);
        let shared = self.len;
        self.as_mut_slice().clone_from_slice(&other[..shared]);
        self.extend_from_slice(&other[shared..]);
    }

    /// Replaces the contents with `count` copies of `value`.
    pub fn assign_fill(&mut self, count: usize, value: T)
    where
        T: Clone,
    {
        self.clear();
        self.resize(count, value);
    }

    /// Replaces the contents with the clones of a slice.
    pub fn assign_from_slice(&mut self, slice: &[T])
    where
        T: Clone,
    {
        self.clear();
        self.extend_from_slice(slice);
    }

    /// Replaces the contents with the elements of an iterator.
    pub fn assign_from_iter(&mut self, iter: impl IntoIterator<Item = T>) {
        self.clear();
        self.extend(iter);
    }

    /// Swaps the contents of two vectors, possibly of different inline
    /// capacities.
    ///
    /// When both vectors are on the heap only the headers are exchanged,
    /// in O(1) and without touching the elements. Otherwise the elements
    /// are swapped pairwise and the surplus relocated, in O(len).
    ///
    /// # Examples
    ///
    /// ```
    /// use sbvec::SmallVec;
    ///
    /// let mut a = SmallVec::<i32, 2>::from_slice(&[1, 2, 3]);
    /// let mut b = SmallVec::<i32, 8>::from_slice(&[9]);
    /// a.swap(&mut b);
    /// assert_eq!(a, [9]);
    /// assert_eq!(b, [1, 2, 3]);
    /// ```
    pub fn swap(&mut self, other: &mut Self) {
        if !self.is_inline() && !other.is_inline() {
            mem::swap(&mut self.ptr, &mut other.ptr);
            mem::swap(&mut self.cap, &mut other.cap);
            mem::swap(&mut self.len, &mut other.len);
            return;
        }
        if self.len >= other.len {
            Self::swap_slow(self, other);
        } else {
            Self::swap_slow(other, self);
        }
    }

    /// Element-wise swap, `long` having at least as many elements as
    /// `short`.
    fn swap_slow(long: &mut Self, short: &mut Self) {
        let long_len = long.len;
        let short_len = short.len;
        debug_assert!(long_len >= short_len);

        short.reserve(long_len - short_len);
        for (a, b) in long.as_mut_slice().iter_mut().zip(short.as_mut_slice()) {
            mem::swap(a, b);
        }
        // SAFETY: `short` has room for `long_len` elements; the surplus
        // moves over and both lengths are fixed up.
        unsafe {
            raw::relocate(
                long.as_ptr().add(short_len),
                short.as_mut_ptr().add(short_len),
                long_len - short_len,
            );
            long.set_len(short_len);
            short.set_len(long_len);
        }
    }

    /// Moves the contents of `other` into `self`, leaving `other` empty.
    ///
    /// When `other` is on the heap its allocation is stolen wholesale, in
    /// O(1) plus the drop of `self`'s previous contents. Otherwise the
    /// elements are relocated. Works across different inline capacities.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbvec::SmallVec;
    ///
    /// let mut a = SmallVec::<i32, 4>::from_slice(&[1, 2]);
    /// let mut b = SmallVec::<i32, 2>::from_slice(&[7, 8, 9]);
    /// a.take_from(&mut b);
    /// assert_eq!(a, [7, 8, 9]);
    /// assert!(b.is_empty());
    /// ```
    pub fn take_from(&mut self, other: &mut Self) {
        if !other.is_inline() && size_of::<T>() != 0 {
            self.clear();
            if !self.ptr.is_null() {
                // SAFETY: heap state, allocated with capacity `cap`.
                unsafe { raw::dealloc_array(self.ptr, self.cap) };
            }
            self.ptr = other.ptr;
            self.cap = other.cap;
            self.len = other.len;
            other.ptr = ptr::null_mut();
            other.cap = other.inline_capacity();
            other.len = 0;
            return;
        }
        self.clear();
        self.reserve(other.len);
        // SAFETY: room reserved; `other` gives up ownership of its
        // elements before anything can observe them again.
        unsafe {
            raw::relocate(other.as_ptr(), self.as_mut_ptr(), other.len);
            self.set_len(other.len);
            other.set_len(0);
        }
    }

    /// Removes the given range from the vector, returning an iterator over
    /// the removed elements.
    ///
    /// The remaining tail is moved down when the iterator is dropped. If
    /// the iterator is leaked, the drained elements and the tail are lost
    /// but the vector stays valid.
    ///
    /// # Panics
    ///
    /// Panics if the range is invalid or out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbvec::{small_vec, SmallVec};
    ///
    /// let mut v: SmallVec<i32, 4> = small_vec![1, 2, 3, 4, 5];
    /// let drained: Vec<i32> = v.drain(1..4).collect();
    /// assert_eq!(drained, [2, 3, 4]);
    /// assert_eq!(v, [1, 5]);
    /// ```
    pub fn drain(&mut self, range: impl RangeBounds<usize>) -> Drain<'_, T> {
        Drain::new(self, range).unwrap_or_else(panic_display)
    }

    /// Fallible version of [`drain`](Self::drain).
    ///
    /// # Errors
    ///
    /// Returns a [`RangeError`](crate::RangeError) if the range is invalid
    /// or out of bounds.
    pub fn try_drain(
        &mut self,
        range: impl RangeBounds<usize>,
    ) -> Result<Drain<'_, T>, crate::RangeError> {
        Drain::new(self, range)
    }
}

/// Completion guard for gap-filling inserts.
///
/// Opening the guard shifts the tail out of the way and clamps the length
/// to the gap start. Dropping it, normally or during unwinding, moves the
/// tail next to the last filled slot and restores a coherent length.
struct GapGuard<'a, T> {
    header: &'a mut Header<T>,
    gap_start: usize,
    gap_len: usize,
    filled: usize,
    tail_len: usize,
}

impl<'a, T> GapGuard<'a, T> {
    /// Opens a gap of `gap_len` slots at `gap_start`.
    ///
    /// The header must have capacity for `len + gap_len` elements and
    /// `gap_start <= len`.
    fn open(header: &'a mut Header<T>, gap_start: usize, gap_len: usize) -> Self {
        let len = header.len;
        debug_assert!(gap_start <= len && len + gap_len <= header.cap);

        let tail_len = len - gap_start;
        // SAFETY: the shift stays within capacity; clamping the length
        // keeps the gap unobservable.
        unsafe {
            let base = header.as_mut_ptr();
            ptr::copy(
                base.add(gap_start),
                base.add(gap_start + gap_len),
                tail_len,
            );
            header.set_len(gap_start);
        }
        Self {
            header,
            gap_start,
            gap_len,
            filled: 0,
            tail_len,
        }
    }

    /// Writes the next gap slot.
    fn fill(&mut self, value: T) {
        debug_assert!(self.filled < self.gap_len);
        // SAFETY: slot within the open gap, uninitialized.
        unsafe {
            self.header
                .as_mut_ptr()
                .add(self.gap_start + self.filled)
                .write(value);
        }
        self.filled += 1;
    }
}

impl<T> Drop for GapGuard<'_, T> {
    fn drop(&mut self) {
        // SAFETY: moves the parked tail next to the filled prefix; all
        // involved slots are within capacity.
        unsafe {
            let base = self.header.as_mut_ptr();
            ptr::copy(
                base.add(self.gap_start + self.gap_len),
                base.add(self.gap_start + self.filled),
                self.tail_len,
            );
            self.header
                .set_len(self.gap_start + self.filled + self.tail_len);
        }
    }
}

impl<T> Deref for Header<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for Header<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for Header<T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for Header<T> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug> fmt::Debug for Header<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: Hash> Hash for Header<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

slice_eq! {
    (Header<T>, Header<U>);
    (Header<T>, [U]);
    (Header<T>, &[U]);
    [const M: usize] (Header<T>, [U; M]);
    (Header<T>, Vec<U>);
}

impl<T: Eq> Eq for Header<T> {}

slice_ord! {
    (Header<T>, Header<T>);
    (Header<T>, [T]);
}

impl<T: Ord> Ord for Header<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T> Extend<T> for Header<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for Header<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<'a, T> IntoIterator for &'a Header<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Header<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}
