// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(
	clippy::alloc_instead_of_core,
	clippy::as_underscore,
	clippy::assertions_on_result_states,
	clippy::clone_on_ref_ptr,
	clippy::deref_by_slicing,
	clippy::else_if_without_else,
	clippy::empty_drop,
	clippy::empty_structs_with_brackets,
	clippy::error_impl_error,
	clippy::exhaustive_enums,
	clippy::if_then_some_else_none,
	clippy::impl_trait_in_params,
	clippy::infinite_loop,
	clippy::map_err_ignore,
	clippy::mem_forget,
	clippy::missing_assert_message,
	clippy::missing_errors_doc,
	clippy::missing_panics_doc,
	clippy::missing_safety_doc,
	clippy::partial_pub_fields,
	clippy::redundant_type_annotations,
	clippy::ref_patterns,
	clippy::std_instead_of_alloc,
	clippy::std_instead_of_core,
	clippy::undocumented_unsafe_blocks,
	clippy::unwrap_used,
)]

//! # `blockdeque`
//!
//! `blockdeque` provides [`Deque`], a double-ended queue stored as a sequence of fixed-size
//! blocks indexed through a growable directory. Unlike a ring buffer such as
//! [`VecDeque`](alloc::collections::VecDeque), growing the deque never moves existing elements:
//! only the directory of block pointers is reallocated. References to elements therefore stay
//! valid across pushes at either end.
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | [`push_back`]/[`push_front`] | *O*(1) amortized |
//! | [`pop_back`]/[`pop_front`]   | *O*(1) |
//! | [`get`]/indexing             | *O*(1) |
//! | [`insert`]/[`remove`]        | *O*(min(*i*, *n* - *i*)) |
//! | [`Clone`]                    | *O*(*n*) |
//!
//! # Failure Guarantees
//!
//! Every operation that constructs elements through user code (a [`Clone`] implementation, a
//! constructor closure) either completes or leaves the deque exactly as it was before the call.
//! Panics propagate unchanged after the partially constructed elements are dropped. Allocation
//! failure is reported by the `try_*` methods before any element is moved.
//!
//! # Allocators
//!
//! The deque is generic over an [`ElementAlloc`], an [`Allocator`] which also controls how
//! elements are constructed and destroyed in their slots, and whether the allocator follows the
//! contents on [`Clone::clone_from`].
//!
//! [`push_back`]: Deque::push_back
//! [`push_front`]: Deque::push_front
//! [`pop_back`]: Deque::pop_back
//! [`pop_front`]: Deque::pop_front
//! [`get`]: Deque::get
//! [`insert`]: Deque::insert
//! [`remove`]: Deque::remove
//! [`Allocator`]: allocator_api2::alloc::Allocator

extern crate alloc;

pub mod alloc_strategy;
pub mod deque;
pub mod error;
mod internal;
mod macros;
mod raw;

pub use alloc_strategy::ElementAlloc;
pub use deque::Deque;

/// The type used for lengths and indices.
pub type SizeType = usize;
/// The type produced by subtracting two cursors.
pub type DifferenceType = isize;

pub mod prelude {
	pub use crate::alloc_strategy::ElementAlloc;
	pub use crate::deque::{Cursor, CursorMut, Deque, Position, RevCursor, ViewMut};
	pub use crate::error::{OutOfRange, PushError, TryReserveError};
	pub use crate::deque;
}
