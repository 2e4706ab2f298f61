// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use core::alloc::Layout;
use core::fmt::{self, Debug, Formatter};
use core::ptr::NonNull;
use allocator_api2::alloc::Allocator;
use log::trace;
use crate::internal::TypeSize;
use super::{check_size, AllocError};

/// A fixed-capacity run of [`T::BLOCK_CAPACITY`](TypeSize::BLOCK_CAPACITY) uninitialized slots.
///
/// A block never tracks which of its slots are live; the owning deque does. Its address is fixed
/// from allocation until deallocation.
#[repr(transparent)]
pub struct RawBlock<T> {
	ptr: NonNull<T>,
}

impl<T> Copy for RawBlock<T> { }
impl<T> Clone for RawBlock<T> {
	#[inline(always)] fn clone(&self) -> Self { *self }
}

impl<T> Debug for RawBlock<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("RawBlock")
		 .field(&self.ptr)
		 .finish()
	}
}

impl<T> RawBlock<T> {
	pub const CAPACITY: usize = T::BLOCK_CAPACITY;

	fn layout() -> Result<Layout, AllocError> {
		let layout = Layout::array::<T>(Self::CAPACITY)?;
		check_size(layout.size())?;
		Ok(layout)
	}

	/// Allocates a block. Zero-sized element types get a dangling block without allocating.
	pub fn allocate<A: Allocator>(alloc: &A) -> Result<Self, AllocError> {
		if T::IS_ZST {
			return Ok(Self { ptr: NonNull::dangling() })
		}

		let layout = Self::layout()?;
		let ptr = alloc.allocate(layout)
					   .map_err(|_| AllocError::Alloc { layout })?
					   .cast::<T>();
		trace!("allocated block of {} slots at {ptr:p}", Self::CAPACITY);
		Ok(Self { ptr })
	}

	/// Deallocates the block.
	///
	/// # Safety
	///
	/// The block must have been allocated by [`allocate`](Self::allocate) with an equivalent
	/// allocator, and none of its slots may hold a live element.
	pub unsafe fn deallocate<A: Allocator>(self, alloc: &A) {
		if T::IS_ZST { return }

		// Safety: the layout was valid when the block was allocated.
		let layout = unsafe {
			Layout::array::<T>(Self::CAPACITY).unwrap_unchecked()
		};
		trace!("releasing block at {:p}", self.ptr);
		// Safety: the caller promises the block was allocated in `alloc` with this layout.
		unsafe {
			alloc.deallocate(self.ptr.cast(), layout);
		}
	}

	/// Returns a pointer to the slot at `offset`.
	///
	/// # Safety
	///
	/// `offset` must be less than or equal to the block capacity.
	#[inline]
	pub unsafe fn slot(self, offset: usize) -> NonNull<T> {
		debug_assert!(offset <= Self::CAPACITY, "slot offset should be within the block");
		// Safety: the offset stays within (or one past) the block allocation.
		unsafe {
			self.ptr.add(offset)
		}
	}
}

#[cfg(test)]
mod test {
	use allocator_api2::alloc::Global;
	use super::RawBlock;

	#[test]
	fn slots_are_contiguous() {
		let Ok(block) = RawBlock::<u64>::allocate(&Global) else {
			unreachable!("allocation should succeed")
		};

		// Safety: offsets are within the block, and the slots are written before being read.
		unsafe {
			for i in 0..RawBlock::<u64>::CAPACITY {
				block.slot(i).write(i as u64);
			}
			assert_eq!(block.slot(1).as_ptr(), block.slot(0).as_ptr().add(1));
			assert_eq!(block.slot(5).read(), 5);
			block.deallocate(&Global);
		}
	}

	#[test]
	fn zero_sized_blocks_dangle() {
		let Ok(block) = RawBlock::<()>::allocate(&Global) else {
			unreachable!("zero-sized allocation should succeed")
		};
		// Safety: zero-sized blocks never allocate.
		unsafe {
			assert_eq!(block.slot(0), block.slot(RawBlock::<()>::CAPACITY));
			block.deallocate(&Global);
		}
	}
}
