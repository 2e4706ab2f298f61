// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

//! The allocation strategy injected into a [`Deque`](crate::Deque).

use core::ptr::{self, NonNull};
use allocator_api2::alloc::{Allocator, Global};

/// An [`Allocator`] which also decides how elements are placed into and removed from their slots,
/// and how the allocator itself follows the contents of a deque when it is copied.
///
/// Every element the deque constructs in a block goes through [`construct_at`], and every element
/// it drops in place goes through [`destroy_at`]. Elements moved *out* of the deque (by popping,
/// removing or consuming iteration) are handed to the caller without a call to [`destroy_at`].
///
/// The defaults write and drop in place, clone the allocator for copies, and keep the target's
/// own allocator on [`Clone::clone_from`].
///
/// # Examples
///
/// ```
/// use core::alloc::Layout;
/// use core::ptr::NonNull;
/// use allocator_api2::alloc::{AllocError, Allocator, Global};
/// use blockdeque::{Deque, ElementAlloc};
///
/// #[derive(Copy, Clone, Default)]
/// struct Propagating;
///
/// unsafe impl Allocator for Propagating {
///     fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
///         Global.allocate(layout)
///     }
///
///     unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
///         Global.deallocate(ptr, layout)
///     }
/// }
///
/// impl ElementAlloc for Propagating {
///     const PROPAGATE_ON_CLONE_FROM: bool = true;
/// }
///
/// let deque = Deque::from_fn_in(3, |i| i, Propagating);
/// assert_eq!(deque, [0, 1, 2]);
/// ```
///
/// [`construct_at`]: ElementAlloc::construct_at
/// [`destroy_at`]: ElementAlloc::destroy_at
pub trait ElementAlloc: Allocator + Clone {
	/// Whether [`Clone::clone_from`] replaces the target's allocator with a copy of the source's.
	const PROPAGATE_ON_CLONE_FROM: bool = false;

	/// Moves `value` into the uninitialized slot.
	///
	/// # Safety
	///
	/// `slot` must be valid for writes, properly aligned, and must not hold a live element.
	unsafe fn construct_at<T>(&self, slot: NonNull<T>, value: T) {
		// Safety: the caller promises the slot is valid for writes.
		unsafe {
			slot.as_ptr().write(value);
		}
	}

	/// Drops the element in `slot` in place, leaving the slot uninitialized.
	///
	/// # Safety
	///
	/// `slot` must hold a live element, which must not be used after this call.
	unsafe fn destroy_at<T>(&self, slot: NonNull<T>) {
		// Safety: the caller promises the slot holds a live element.
		unsafe {
			ptr::drop_in_place(slot.as_ptr());
		}
	}

	/// Returns the allocator used by a copy of a deque holding this allocator.
	fn select_on_clone(&self) -> Self {
		self.clone()
	}
}

impl ElementAlloc for Global { }
