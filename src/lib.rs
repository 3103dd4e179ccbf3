//! Small-buffer **vector type** for Rust 🦀
//!
//! * first `N` elements stored **inline**, no heap allocation until the
//!   sequence outgrows them
//! * transparent **spill to the heap** with amortized growth
//! * a size-erased [`Header`] handle that mutates any `SmallVec<T, N>`
//!   regardless of `N`, without allocation or virtual dispatch
//! * **zero dependency**, except for optional `serde` support
//!
//! # Examples
//!
//! ```rust
//! use sbvec::{small_vec, SmallVec};
//!
//! let mut v: SmallVec<i32, 4> = small_vec![1, 2, 3, 4];
//! assert!(v.is_inline());
//!
//! v.push(5); // exceeds the inline capacity, moves to the heap
//! assert!(!v.is_inline());
//! assert_eq!(v, [1, 2, 3, 4, 5]);
//! ```
//!
//! # Size erasure
//!
//! Every `SmallVec<T, N>` dereferences to a [`Header<T>`], an unsized view
//! that carries the full mutating API. A function taking `&mut Header<T>`
//! accepts any inline capacity:
//!
//! ```rust
//! use sbvec::{Header, SmallVec};
//!
//! fn tag(v: &mut Header<&'static str>) {
//!     v.push("tagged");
//! }
//!
//! let mut a = SmallVec::<_, 2>::new();
//! let mut b = SmallVec::<_, 8>::new();
//! tag(&mut a);
//! tag(&mut b);
//! assert_eq!(a, b);
//! ```
//!
//! # Two states
//!
//! A vector is either *inline* (backed by the buffer embedded in the
//! `SmallVec` itself) or *heap* (backed by a separate allocation). The state
//! is observable through [`Header::is_inline`] but never changes the API.
//! Once spilled, a vector stays on the heap until it is dropped or emptied
//! and shrunk with [`Header::shrink_to_fit`].
//!
//! # Platform notes
//!
//! The crate is `no_std` (requires `alloc`). References and iterators into a
//! vector are raw views of its storage: any growing mutation invalidates
//! them, exactly like with `std::vec::Vec`.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(clippy::pedantic, clippy::nursery, clippy::cargo)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(not(feature = "std"))]
pub(crate) extern crate alloc;

#[cfg(feature = "std")]
pub(crate) use std as alloc;

mod common;
pub mod header;
mod macros;
mod raw;
pub mod small;
pub mod trivial;

pub use common::RangeError;
pub use header::{Drain, Header};
pub use raw::ReserveError;
pub use small::{IntoIter, SmallVec};
pub use trivial::TriviallyRelocatable;
