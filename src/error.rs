use std::fmt::{self, Display};

/// Failures reported by the fallible `Array` and `RawBuffer` APIs.
///
/// The infallible paths (`push_back`, `reserve`, ...) do not return this type:
/// they panic with the `CapacityOverflow` message or abort through
/// `std::alloc::handle_alloc_error`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// Checked access at an index that is not less than the current length.
    OutOfRange {
        /// The requested index.
        index: usize,
        /// Length of the array at the time of the access.
        len: usize,
    },
    /// The byte size of the requested slot count does not fit in `isize`.
    CapacityOverflow {
        /// Requested number of slots.
        requested: usize,
    },
    /// The global allocator returned null.
    AllocFailed {
        /// Requested allocation size in bytes.
        size: usize,
        /// Requested alignment in bytes.
        align: usize,
    },
}

impl Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayError::OutOfRange { index, len } => {
                write!(f, "index {} is out of range for array of length {}", index, len)
            }
            ArrayError::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: {} slots exceed the addressable size", requested)
            }
            ArrayError::AllocFailed { size, align } => {
                write!(f, "allocation of {} bytes (align {}) failed", size, align)
            }
        }
    }
}

impl std::error::Error for ArrayError {}
