//! Common functions and types.

use core::ops::{Bound, Range, RangeBounds};
use core::{error, fmt};

/// Panics with the provided displayable error message.
///
/// # Panics
///
/// Always panics with the provided error message.
#[track_caller]
pub(crate) fn panic_display<T>(e: impl fmt::Display) -> T {
    panic!("{e}");
}

/// Converts any generic range into a concrete `Range<usize>` given a length.
///
/// # Errors
///
/// Returns a `RangeError` if the range is invalid for the given length.
pub(crate) fn range(
    range: impl RangeBounds<usize>,
    len: usize,
) -> Result<Range<usize>, RangeError> {
    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.checked_add(1).ok_or(RangeError::StartOverflows)?,
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end.checked_add(1).ok_or(RangeError::EndOverflows)?,
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };
    if start > end {
        Err(RangeError::StartGreaterThanEnd { start, end })
    } else if end > len {
        Err(RangeError::EndOutOfBounds { end, len })
    } else {
        Ok(Range { start, end })
    }
}

/// Represents errors that can occur when resolving a range over a vector.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RangeError {
    /// The start index overflows.
    StartOverflows,
    /// The end index overflows.
    EndOverflows,
    /// The start index is greater than the end index.
    StartGreaterThanEnd {
        /// Resolved start index.
        start: usize,
        /// Resolved end index.
        end: usize,
    },
    /// The end index is out of bounds.
    EndOutOfBounds {
        /// Resolved end index.
        end: usize,
        /// Length of the vector.
        len: usize,
    },
}

impl error::Error for RangeError {}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::StartOverflows => f.write_str("start index overflows"),
            Self::EndOverflows => f.write_str("end index overflows"),
            Self::StartGreaterThanEnd { start, end } => {
                write!(f, "start index {start} is greater than end index {end}")
            }
            Self::EndOutOfBounds { end, len } => {
                write!(f, "end index {end} is out of bounds for length {len}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::alloc::format;

    use super::*;

    #[test]
    fn ranges() {
        assert_eq!(range(1..4, 10).unwrap(), 1..4);
        assert_eq!(range(1..=4, 10).unwrap(), 1..5);
        assert_eq!(range(..4, 10).unwrap(), 0..4);
        assert_eq!(range(3.., 10).unwrap(), 3..10);
        assert_eq!(range(.., 10).unwrap(), 0..10);

        assert_eq!(range(..=usize::MAX, 1), Err(RangeError::EndOverflows));
        assert_eq!(
            range((Bound::Excluded(usize::MAX), Bound::Unbounded), 1),
            Err(RangeError::StartOverflows)
        );
        assert_eq!(
            range(5..2, 10),
            Err(RangeError::StartGreaterThanEnd { start: 5, end: 2 })
        );
        assert_eq!(
            range(2..7, 5),
            Err(RangeError::EndOutOfBounds { end: 7, len: 5 })
        );

        let err = range(2..7, 5).unwrap_err();
        assert_eq!(format!("{err}"), "end index 7 is out of bounds for length 5");
    }
}
