//! Growable contiguous array built from explicit raw storage and element lifecycle steps.
//!
//! * `RawBuffer` acquires and releases untyped storage for N items.
//! * `lifecycle` constructs, relocates, assigns and drops items in raw slots.
//! * `Array` owns one buffer at a time and composes the two into push, insert,
//!   erase, resize, reserve, assignment and swap.

#[macro_use]
mod logging;
mod error;
mod memory;
pub mod lifecycle;
mod array;
mod iter;
mod traits;

pub use error::ArrayError;
pub use memory::RawBuffer;
pub use array::Array;
pub use iter::IntoIter;
pub use traits::ArrayIterator;

#[cfg(test)]
pub mod dropflag;
