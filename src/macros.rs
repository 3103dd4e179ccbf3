//! Internal macros for comparison impls.

/// Implements `PartialEq` between a vector type and another slice-shaped
/// type, in the given direction. Both sides must index with `..` down to a
/// plain slice.
macro_rules! slice_eq {
    () => {};

    ($([ $($gen:tt)* ])? ($lhs:ty, $rhs:ty); $($rest:tt)*) => {
        impl<T, U, $($($gen)*)?> core::cmp::PartialEq<$rhs> for $lhs
        where
            T: core::cmp::PartialEq<U>,
        {
            #[inline]
            fn eq(&self, other: &$rhs) -> bool {
                self[..] == other[..]
            }
        }

        $crate::macros::slice_eq!($($rest)*);
    };
}

/// Implements `PartialOrd` between a vector type and another slice-shaped
/// type over the same element type (slices only order against themselves).
macro_rules! slice_ord {
    () => {};

    ($([ $($gen:tt)* ])? ($lhs:ty, $rhs:ty); $($rest:tt)*) => {
        impl<T, $($($gen)*)?> core::cmp::PartialOrd<$rhs> for $lhs
        where
            T: core::cmp::PartialOrd,
        {
            #[inline]
            fn partial_cmp(&self, other: &$rhs) -> Option<core::cmp::Ordering> {
                core::cmp::PartialOrd::partial_cmp(&self[..], &other[..])
            }
        }

        $crate::macros::slice_ord!($($rest)*);
    };
}

pub(crate) use {slice_eq, slice_ord};
