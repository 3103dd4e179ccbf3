//! Raw allocation and relocation primitives.
//!
//! Everything here works on bare pointers and counts; the callers in
//! [`crate::header`] and [`crate::small`] are responsible for length and
//! capacity bookkeeping.

use core::fmt;
use core::mem::size_of;
use core::ptr;

use crate::alloc::alloc::{alloc, dealloc, handle_alloc_error, Layout};

/// Error occurring when a capacity request cannot be satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReserveError {
    /// The requested capacity overflows the maximum vector length.
    CapacityOverflow,

    /// The allocator refused the request.
    AllocError {
        /// Layout of the failed allocation.
        layout: Layout,
    },
}

impl fmt::Display for ReserveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::CapacityOverflow => f.write_str("capacity overflow"),
            Self::AllocError { layout } => {
                write!(f, "allocation of {} bytes failed", layout.size())
            }
        }
    }
}

impl core::error::Error for ReserveError {}

impl ReserveError {
    /// Aborts or panics the way the infallible reserve entry points expect.
    pub(crate) fn bail(&self) -> ! {
        match self {
            Self::CapacityOverflow => panic!("capacity overflow"),
            Self::AllocError { layout } => handle_alloc_error(*layout),
        }
    }
}

/// Allocates an uninitialized array of `cap` elements of `T`.
///
/// `T` must not be zero-sized and `cap` must be non-zero; the caller checks
/// both before calling.
pub(crate) fn try_alloc_array<T>(cap: usize) -> Result<*mut T, ReserveError> {
    debug_assert!(size_of::<T>() != 0);
    debug_assert!(cap != 0);

    let layout = Layout::array::<T>(cap).map_err(|_| ReserveError::CapacityOverflow)?;
    if layout.size() > isize::MAX as usize {
        return Err(ReserveError::CapacityOverflow);
    }

    // SAFETY: layout has non-zero size (checked above via T and cap).
    let ptr = unsafe { alloc(layout) };
    if ptr.is_null() {
        return Err(ReserveError::AllocError { layout });
    }
    Ok(ptr.cast())
}

/// Deallocates an array previously obtained from [`try_alloc_array`].
///
/// # Safety
///
/// `ptr` must come from [`try_alloc_array::<T>`] with the same `cap`, and
/// must not be used afterwards.
pub(crate) unsafe fn dealloc_array<T>(ptr: *mut T, cap: usize) {
    if size_of::<T>() == 0 || cap == 0 {
        return;
    }
    // SAFETY: the layout computation succeeded at allocation time.
    let layout = unsafe { Layout::array::<T>(cap).unwrap_unchecked() };
    // SAFETY: same allocation, same layout, per this function's contract.
    unsafe { dealloc(ptr.cast(), layout) };
}

/// Computes the next capacity for a growth to at least `min` elements.
///
/// Doubles the current capacity by rounding `cap + 1` up to a power of two,
/// and never returns less than `min`. On overflow of the power-of-two round
/// up, `min` itself is returned and the subsequent layout computation
/// reports the overflow.
pub(crate) const fn next_capacity(cap: usize, min: usize) -> usize {
    let doubled = match (cap + 1).checked_next_power_of_two() {
        Some(doubled) => doubled,
        None => min,
    };
    if doubled > min {
        doubled
    } else {
        min
    }
}

/// Relocates `count` elements from `src` to `dst`.
///
/// The source elements must not be used (nor dropped) afterwards: ownership
/// moves to the destination. Every Rust type relocates with a plain byte
/// copy, see [`crate::trivial`].
///
/// # Safety
///
/// `src` must be valid for reads of `count` elements, `dst` for writes of
/// `count` elements, and the two regions must not overlap.
pub(crate) unsafe fn relocate<T>(src: *const T, dst: *mut T, count: usize) {
    // SAFETY: per this function's contract.
    unsafe { ptr::copy_nonoverlapping(src, dst, count) };
}

#[cfg(test)]
mod tests {
    use crate::alloc::format;

    use super::*;

    #[test]
    fn next_capacities() {
        assert_eq!(next_capacity(0, 1), 1);
        assert_eq!(next_capacity(1, 2), 2);
        assert_eq!(next_capacity(2, 3), 4);
        assert_eq!(next_capacity(4, 5), 8);
        assert_eq!(next_capacity(8, 9), 16);

        // explicit reserves beyond the doubling win
        assert_eq!(next_capacity(4, 100), 100);

        // near-overflow falls back to the requested minimum
        let huge = usize::MAX - 1;
        assert_eq!(next_capacity(huge, usize::MAX), usize::MAX);
    }

    #[test]
    fn alloc_roundtrip() {
        let ptr = try_alloc_array::<u64>(16).unwrap();
        unsafe {
            ptr.write(42);
            assert_eq!(ptr.read(), 42);
            dealloc_array(ptr, 16);
        }
    }

    #[test]
    fn overflowing_layout() {
        let err = try_alloc_array::<u64>(usize::MAX / 2).unwrap_err();
        assert_eq!(err, ReserveError::CapacityOverflow);
        assert_eq!(format!("{err}"), "capacity overflow");
    }
}
