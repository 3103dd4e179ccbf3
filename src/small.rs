//! Small-buffer vector with a const-generic inline capacity.

use core::cmp::Ordering;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::mem::{ManuallyDrop, MaybeUninit};
use core::ops::{Deref, DerefMut};
use core::{fmt, mem, ptr, slice};

use crate::alloc::vec::Vec;

use crate::header::Header;
use crate::macros::{slice_eq, slice_ord};
use crate::raw;

#[cfg(feature = "serde")]
mod serde;


/// A vector storing its first `N` elements inline.
///
/// `SmallVec<T, N>` starts with its elements in a buffer embedded in the
/// struct itself and only allocates once the length exceeds `N`. Past that
/// point it behaves like a `Vec<T>` with amortized doubling growth.
///
/// The whole mutating API lives on [`Header<T>`], the size-erased view this
/// type dereferences to; see the [crate documentation](crate) for how the
/// erasure works.
///
/// # Examples
///
/// ```
/// use sbvec::SmallVec;
///
/// let mut v: SmallVec<i32, 4> = SmallVec::new();
/// v.push(1);
/// v.push(2);
/// assert!(v.is_inline());
/// assert_eq!(v.capacity(), 4);
/// assert_eq!(v, [1, 2]);
/// ```
#[repr(C)]
pub struct SmallVec<T, const N: usize = 4> {
    // layout mirrors `Header<T>`, whose tail slice erases `N` into the
    // pointer metadata
    ptr: *mut T,
    cap: usize,
    len: usize,
    buf: [MaybeUninit<T>; N],
}

// SAFETY: the raw pointer is owned storage, never shared.
unsafe impl<T: Send, const N: usize> Send for SmallVec<T, N> {}

// SAFETY: same as above.
unsafe impl<T: Sync, const N: usize> Sync for SmallVec<T, N> {}

impl<T, const N: usize> SmallVec<T, N> {
    /// Creates a new, empty, inline vector.
    ///
    /// No allocation occurs until the length exceeds `N`.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ptr: ptr::null_mut(),
            cap: N,
            len: 0,
            buf: [const { MaybeUninit::uninit() }; N],
        }
    }

    /// Creates a new, empty vector with room for at least `capacity`
    /// elements.
    ///
    /// Stays inline if `capacity <= N`.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut vec = Self::new();
        if capacity > N {
            vec.reserve(capacity);
        }
        vec
    }

    /// Creates a vector from an array of any length, moving the elements.
    ///
    /// Spills to the heap immediately if `M > N`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbvec::SmallVec;
    ///
    /// let v: SmallVec<i32, 2> = SmallVec::from_array([1, 2, 3]);
    /// assert!(!v.is_inline());
    /// assert_eq!(v, [1, 2, 3]);
    /// ```
    #[must_use]
    pub fn from_array<const M: usize>(array: [T; M]) -> Self {
        let mut vec = Self::with_capacity(M);
        // SAFETY: room for `M` elements; the array gives up ownership and
        // is forgotten, not dropped.
        unsafe {
            raw::relocate(array.as_ptr(), vec.as_mut_ptr(), M);
            vec.set_len(M);
        }
        mem::forget(array);
        vec
    }

    /// Creates a vector with the clones of a slice's elements.
    #[must_use]
    pub fn from_slice(slice: &[T]) -> Self
    where
        T: Clone,
    {
        let mut vec = Self::new();
        vec.extend_from_slice(slice);
        vec
    }

    /// Creates a vector with `count` copies of `value`.
    #[must_use]
    pub fn from_elem(value: T, count: usize) -> Self
    where
        T: Clone,
    {
        let mut vec = Self::new();
        vec.resize(count, value);
        vec
    }

    /// Creates a vector with the clones of a size-erased vector's
    /// elements, regardless of its inline capacity.
    #[must_use]
    pub fn from_header(header: &Header<T>) -> Self
    where
        T: Clone,
    {
        Self::from_slice(header.as_slice())
    }

    /// Converts the vector into a `Vec<T>`.
    ///
    /// Heap vectors hand over their allocation without copying; inline
    /// vectors relocate their elements into a fresh allocation.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbvec::SmallVec;
    ///
    /// let v: SmallVec<i32, 4> = SmallVec::from_array([1, 2, 3]);
    /// assert_eq!(v.into_vec(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        let this = ManuallyDrop::new(self);
        if this.ptr.is_null() {
            let len = this.len;
            let mut vec = Vec::with_capacity(len);
            // SAFETY: `vec` has room for `len` elements; `this` is
            // manually dropped so ownership moves exactly once.
            unsafe {
                raw::relocate(this.as_ptr(), vec.as_mut_ptr(), len);
                vec.set_len(len);
            }
            vec
        } else {
            // SAFETY: heap state, the allocation was made with the global
            // allocator for `cap` elements (or is the dangling marker for
            // zero-sized `T`, which `Vec` uses identically).
            unsafe { Vec::from_raw_parts(this.ptr, this.len, this.cap) }
        }
    }
}

impl<T, const N: usize> Deref for SmallVec<T, N> {
    type Target = Header<T>;

    #[inline]
    fn deref(&self) -> &Header<T> {
        let ptr = ptr::slice_from_raw_parts(ptr::from_ref(self).cast::<()>(), N)
            as *const Header<T>;
        // SAFETY: `repr(C)` layouts match and the metadata is `N`, the
        // actual length of the inline buffer.
        unsafe { &*ptr }
    }
}

impl<T, const N: usize> DerefMut for SmallVec<T, N> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Header<T> {
        let ptr = ptr::slice_from_raw_parts_mut(ptr::from_mut(self).cast::<()>(), N)
            as *mut Header<T>;
        // SAFETY: same as `deref`.
        unsafe { &mut *ptr }
    }
}

impl<T, const N: usize> Drop for SmallVec<T, N> {
    fn drop(&mut self) {
        // SAFETY: drops the initialized elements, then the heap block if
        // the vector spilled.
        unsafe {
            ptr::drop_in_place(self.as_mut_slice());
            if !self.ptr.is_null() {
                raw::dealloc_array(self.ptr, self.cap);
            }
        }
    }
}

impl<T: Clone, const N: usize> Clone for SmallVec<T, N> {
    fn clone(&self) -> Self {
        Self::from_slice(self.as_slice())
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source);
    }
}

impl<T, const N: usize> Default for SmallVec<T, N> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize, const M: usize> From<[T; M]> for SmallVec<T, N> {
    #[inline]
    fn from(array: [T; M]) -> Self {
        Self::from_array(array)
    }
}

impl<T: Clone, const N: usize> From<&[T]> for SmallVec<T, N> {
    #[inline]
    fn from(slice: &[T]) -> Self {
        Self::from_slice(slice)
    }
}

impl<T: Clone, const N: usize> From<&Header<T>> for SmallVec<T, N> {
    #[inline]
    fn from(header: &Header<T>) -> Self {
        Self::from_header(header)
    }
}

impl<T, const N: usize> From<Vec<T>> for SmallVec<T, N> {
    /// Adopts a `Vec`'s allocation without copying.
    ///
    /// An unallocated `Vec` becomes an inline vector.
    fn from(vec: Vec<T>) -> Self {
        if vec.capacity() == 0 {
            return Self::new();
        }
        let mut vec = ManuallyDrop::new(vec);
        Self {
            ptr: vec.as_mut_ptr(),
            cap: vec.capacity(),
            len: vec.len(),
            buf: [const { MaybeUninit::uninit() }; N],
        }
    }
}

impl<T, const N: usize> From<SmallVec<T, N>> for Vec<T> {
    #[inline]
    fn from(vec: SmallVec<T, N>) -> Self {
        vec.into_vec()
    }
}

impl<T, const N: usize> FromIterator<T> for SmallVec<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Self::new();
        vec.extend(iter);
        vec
    }
}

impl<T, const N: usize> Extend<T> for SmallVec<T, N> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        Header::extend(self, iter);
    }
}

impl<'a, T: Copy + 'a, const N: usize> Extend<&'a T> for SmallVec<T, N> {
    #[inline]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        Header::extend(self, iter.into_iter().copied());
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for SmallVec<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: Hash, const N: usize> Hash for SmallVec<T, N> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

slice_eq! {
    [const N: usize, const M: usize] (SmallVec<T, N>, SmallVec<U, M>);
    [const N: usize] (SmallVec<T, N>, Header<U>);
    [const N: usize] (SmallVec<T, N>, [U]);
    [const N: usize] (SmallVec<T, N>, &[U]);
    [const N: usize] (SmallVec<T, N>, &mut [U]);
    [const N: usize, const M: usize] (SmallVec<T, N>, [U; M]);
    [const N: usize, const M: usize] (SmallVec<T, N>, &[U; M]);
    [const N: usize] (SmallVec<T, N>, Vec<U>);
}

impl<T: Eq, const N: usize> Eq for SmallVec<T, N> {}

slice_ord! {
    [const N: usize, const M: usize] (SmallVec<T, N>, SmallVec<T, M>);
    [const N: usize] (SmallVec<T, N>, Header<T>);
    [const N: usize] (SmallVec<T, N>, [T]);
    [const N: usize] (SmallVec<T, N>, &[T]);
    [const N: usize, const M: usize] (SmallVec<T, N>, [T; M]);
}

impl<T: Ord, const N: usize> Ord for SmallVec<T, N> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a SmallVec<T, N> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a mut SmallVec<T, N> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T, const N: usize> IntoIterator for SmallVec<T, N> {
    type Item = T;
    type IntoIter = IntoIter<T, N>;

    fn into_iter(self) -> Self::IntoIter {
        let end = self.len;
        IntoIter {
            vec: ManuallyDrop::new(self),
            start: 0,
            end,
        }
    }
}

/// An owning iterator, see [`SmallVec::into_iter`].
pub struct IntoIter<T, const N: usize> {
    vec: ManuallyDrop<SmallVec<T, N>>,
    start: usize,
    end: usize,
}

impl<T, const N: usize> IntoIter<T, N> {
    /// Returns the remaining elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the elements in `start..end` are initialized and not yet
        // moved out.
        unsafe {
            slice::from_raw_parts(self.vec.as_ptr().add(self.start), self.end - self.start)
        }
    }
}

impl<T, const N: usize> Iterator for IntoIter<T, N> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start` is initialized and read exactly once; the
        // vector's length is zeroed before it drops.
        let value = unsafe { self.vec.as_ptr().add(self.start).read() };
        self.start += 1;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T, const N: usize> DoubleEndedIterator for IntoIter<T, N> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: same as `next`.
        Some(unsafe { self.vec.as_ptr().add(self.end).read() })
    }
}

impl<T, const N: usize> ExactSizeIterator for IntoIter<T, N> {}

impl<T, const N: usize> FusedIterator for IntoIter<T, N> {}

impl<T, const N: usize> Drop for IntoIter<T, N> {
    fn drop(&mut self) {
        // SAFETY: drops the elements not yet yielded, then the vector's
        // storage with its length zeroed.
        unsafe {
            let base = self.vec.as_mut_ptr();
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                base.add(self.start),
                self.end - self.start,
            ));
            self.vec.set_len(0);
            ManuallyDrop::drop(&mut self.vec);
        }
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for IntoIter<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

/// Creates a [`SmallVec`] containing the given elements, like [`vec!`].
///
/// The inline capacity is taken from the expected type.
///
/// # Examples
///
/// ```
/// use sbvec::{small_vec, SmallVec};
///
/// let v: SmallVec<i32, 4> = small_vec![1, 2, 3];
/// assert_eq!(v, [1, 2, 3]);
///
/// let v: SmallVec<i32, 4> = small_vec![0; 6];
/// assert_eq!(v, [0; 6]);
/// ```
#[macro_export]
macro_rules! small_vec {
    () => {
        $crate::SmallVec::new()
    };
    ($value:expr; $count:expr) => {
        $crate::SmallVec::from_elem($value, $count)
    };
    ($($value:expr),+ $(,)?) => {
        $crate::SmallVec::from_array([$($value),+])
    };
}
