// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use core::alloc::Layout;
use core::{cmp, ptr};
use core::ptr::NonNull;
use allocator_api2::alloc::Allocator;
use log::debug;
use super::{check_size, AllocError, RawBlock};

/// The fewest block slots a directory allocates.
const MIN_MAP_CAP: usize = 8;

/// The block directory: an array of block pointers with free slots reserved at both ends.
///
/// Slots in `first..last` hold allocated blocks, in logical order. All other slots are
/// uninitialized and never read. Growing or recentering the directory moves the block *pointers*
/// only, so element addresses never change while their block is listed.
///
/// Element positions are expressed as *flattened* indices, `slot * CAPACITY + offset`. Since the
/// slot of a block changes when the directory is rebuilt, every rebuild reports its shift in
/// slots and bumps the [generation](Self::generation).
pub struct RawMap<T, A: Allocator> {
	slots: NonNull<RawBlock<T>>,
	cap: usize,
	first: usize,
	last: usize,
	generation: u64,
	alloc: A,
}

impl<T, A: Allocator> RawMap<T, A> {
	pub const fn new(alloc: A) -> Self {
		Self {
			slots: NonNull::dangling(),
			cap: 0,
			first: 0,
			last: 0,
			generation: 0,
			alloc,
		}
	}

	pub fn allocator(&self) -> &A {
		&self.alloc
	}

	/// Returns the number of block slots in the directory.
	#[cfg(test)]
	pub fn capacity(&self) -> usize { self.cap }

	/// Returns the slot of the first allocated block.
	pub fn first(&self) -> usize { self.first }

	/// Returns the slot one past the last allocated block.
	pub fn last(&self) -> usize { self.last }

	pub fn block_count(&self) -> usize {
		self.last - self.first
	}

	/// Returns the flattened index of the first slot in the first block.
	pub fn start(&self) -> usize {
		self.first * RawBlock::<T>::CAPACITY
	}

	/// Returns the flattened index one past the last slot in the last block.
	pub fn end(&self) -> usize {
		self.last * RawBlock::<T>::CAPACITY
	}

	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Bumps the generation without moving any block, for callers which reassign elements to
	/// slots.
	pub fn invalidate(&mut self) {
		self.generation = self.generation.wrapping_add(1);
	}

	/// Returns a pointer to the block slot array, for iterators walking blocks in order.
	pub fn slots(&self) -> NonNull<RawBlock<T>> {
		self.slots
	}

	/// Returns the block at `slot`.
	///
	/// # Safety
	///
	/// `slot` must be within `first..last`.
	#[inline]
	pub unsafe fn block(&self, slot: usize) -> RawBlock<T> {
		debug_assert!(
			(self.first..self.last).contains(&slot),
			"block slot {slot} should be allocated ({}..{})",
			self.first,
			self.last
		);
		// Safety: allocated slots are initialized.
		unsafe {
			self.slots.add(slot).read()
		}
	}

	/// Returns a pointer to the element slot at flattened index `index`.
	///
	/// # Safety
	///
	/// `index` must be within `start()..end()`.
	#[inline]
	pub unsafe fn elem(&self, index: usize) -> NonNull<T> {
		let cap = RawBlock::<T>::CAPACITY;
		// Safety: the caller promises the index lies in an allocated block.
		unsafe {
			self.block(index / cap).slot(index % cap)
		}
	}

	/// Ensures at least `additional` free slots after the last block, returning the shift applied
	/// to all block slots.
	pub fn reserve_back(&mut self, additional: usize) -> Result<isize, AllocError> {
		if self.cap - self.last >= additional {
			Ok(0)
		} else {
			self.rebuild(0, additional)
		}
	}

	/// Ensures at least `additional` free slots before the first block, returning the shift
	/// applied to all block slots.
	pub fn reserve_front(&mut self, additional: usize) -> Result<isize, AllocError> {
		if self.first >= additional {
			Ok(0)
		} else {
			self.rebuild(additional, 0)
		}
	}

	/// Allocates a block after the last one. On failure, the directory is unchanged.
	pub fn push_block_back(&mut self) -> Result<isize, AllocError> {
		let block = RawBlock::allocate(&self.alloc)?;
		let shift = match self.reserve_back(1) {
			Ok(shift) => shift,
			Err(err) => {
				// Safety: the block was just allocated and holds no elements.
				unsafe {
					block.deallocate(&self.alloc);
				}
				return Err(err)
			}
		};

		// Safety: a free slot was reserved at `last`.
		unsafe {
			self.slots.add(self.last).write(block);
		}
		self.last += 1;
		Ok(shift)
	}

	/// Allocates a block before the first one. On failure, the directory is unchanged.
	pub fn push_block_front(&mut self) -> Result<isize, AllocError> {
		let block = RawBlock::allocate(&self.alloc)?;
		let shift = match self.reserve_front(1) {
			Ok(shift) => shift,
			Err(err) => {
				// Safety: the block was just allocated and holds no elements.
				unsafe {
					block.deallocate(&self.alloc);
				}
				return Err(err)
			}
		};

		self.first -= 1;
		// Safety: a free slot was reserved before `first`.
		unsafe {
			self.slots.add(self.first).write(block);
		}
		Ok(shift)
	}

	/// Deallocates the last block.
	///
	/// # Safety
	///
	/// At least one block must be allocated, and the last block must hold no live elements.
	pub unsafe fn pop_block_back(&mut self) {
		self.last -= 1;
		// Safety: the slot was allocated, and the caller promises the block is empty.
		unsafe {
			self.slots.add(self.last).read().deallocate(&self.alloc);
		}
	}

	/// Deallocates the first block.
	///
	/// # Safety
	///
	/// At least one block must be allocated, and the first block must hold no live elements.
	pub unsafe fn pop_block_front(&mut self) {
		// Safety: the slot was allocated, and the caller promises the block is empty.
		unsafe {
			self.slots.add(self.first).read().deallocate(&self.alloc);
		}
		self.first += 1;
	}

	/// Deallocates every block, keeping the slot array, and moves the empty block range to the
	/// middle of the directory. Returns the new start index.
	///
	/// # Safety
	///
	/// No block may hold live elements.
	pub unsafe fn release_blocks(&mut self) -> usize {
		// Safety: the caller promises all blocks are empty.
		unsafe {
			self.deallocate_blocks();
		}
		let mid = self.cap / 2;
		self.generation += 1;
		self.first = mid;
		self.last = mid;
		self.start()
	}

	/// Reallocates the slot array to exactly fit the allocated blocks, returning the shift applied
	/// to all block slots.
	pub fn shrink_to_fit(&mut self) -> Result<isize, AllocError> {
		let count = self.block_count();
		if count == self.cap {
			return Ok(0)
		}

		if count == 0 {
			// Safety: no blocks are allocated, so nothing is read from the old array.
			unsafe {
				self.deallocate_slots();
			}
			let shift = -(self.first as isize);
			self.slots = NonNull::dangling();
			self.cap = 0;
			self.first = 0;
			self.last = 0;
			self.generation += 1;
			return Ok(shift)
		}

		let slots = self.allocate_slots(count)?;
		// Safety: the new array holds `count` slots and cannot overlap the old one.
		unsafe {
			ptr::copy_nonoverlapping(self.slots.add(self.first).as_ptr(), slots.as_ptr(), count);
			self.deallocate_slots();
		}
		debug!("shrank block directory from {} to {count} slots", self.cap);

		let shift = -(self.first as isize);
		self.slots = slots;
		self.cap = count;
		self.first = 0;
		self.last = count;
		if shift != 0 {
			self.generation += 1;
		}
		Ok(shift)
	}

	/// Moves the blocks so that at least `front` free slots precede them and `back` free slots
	/// follow them, reallocating the slot array if it is more than half full.
	#[cold]
	fn rebuild(&mut self, front: usize, back: usize) -> Result<isize, AllocError> {
		let count = self.block_count();
		let required = count
			.checked_add(front)
			.and_then(|n| n.checked_add(back))
			.ok_or(AllocError::CapacityOverflow)?;

		let old_first = self.first;
		if required.saturating_mul(2) <= self.cap {
			let first = front + (self.cap - required) / 2;
			// Safety: both ranges are within the slot array; `ptr::copy` handles the overlap.
			unsafe {
				ptr::copy(
					self.slots.add(old_first).as_ptr(),
					self.slots.add(first).as_ptr(),
					count
				);
			}
			debug!("recentered block directory of {} slots, first block at {first}", self.cap);
			self.first = first;
		} else {
			let cap = cmp::max(cmp::max(self.cap.saturating_mul(2), required), MIN_MAP_CAP);
			let slots = self.allocate_slots(cap)?;
			let first = front + (cap - required) / 2;
			// Safety: the new array holds `cap` slots and cannot overlap the old one.
			unsafe {
				ptr::copy_nonoverlapping(
					self.slots.add(old_first).as_ptr(),
					slots.add(first).as_ptr(),
					count
				);
				self.deallocate_slots();
			}
			debug!("grew block directory from {} to {cap} slots", self.cap);
			self.slots = slots;
			self.cap = cap;
			self.first = first;
		}

		self.last = self.first + count;
		if self.first != old_first {
			self.generation += 1;
		}
		Ok(self.first as isize - old_first as isize)
	}

	fn slots_layout(cap: usize) -> Result<Layout, AllocError> {
		// Every element in every listed block must have a flattened index fitting `isize`.
		cap.checked_mul(RawBlock::<T>::CAPACITY)
		   .filter(|&n| n <= isize::MAX as usize)
		   .ok_or(AllocError::CapacityOverflow)?;
		let layout = Layout::array::<RawBlock<T>>(cap)?;
		check_size(layout.size())?;
		Ok(layout)
	}

	fn allocate_slots(&self, cap: usize) -> Result<NonNull<RawBlock<T>>, AllocError> {
		let layout = Self::slots_layout(cap)?;
		self.alloc
			.allocate(layout)
			.map(NonNull::cast)
			.map_err(|_| AllocError::Alloc { layout })
	}

	/// # Safety
	///
	/// The slot array must not be used after this call.
	unsafe fn deallocate_slots(&mut self) {
		if self.cap == 0 { return }
		// Safety: the layout was valid when the array was allocated.
		let layout = unsafe {
			Layout::array::<RawBlock<T>>(self.cap).unwrap_unchecked()
		};
		// Safety: the array was allocated in `alloc` with this layout.
		unsafe {
			self.alloc.deallocate(self.slots.cast(), layout);
		}
	}

	/// # Safety
	///
	/// No block may hold live elements, and the block slots must not be read afterward.
	unsafe fn deallocate_blocks(&mut self) {
		for slot in self.first..self.last {
			// Safety: the slot holds an allocated, empty block.
			unsafe {
				self.slots.add(slot).read().deallocate(&self.alloc);
			}
		}
	}
}

impl<T, A: Allocator> Drop for RawMap<T, A> {
	/// Deallocates the blocks and the slot array. The owner must have dropped the elements.
	fn drop(&mut self) {
		// Safety: the owning deque drops its elements before the directory.
		unsafe {
			self.deallocate_blocks();
			self.deallocate_slots();
		}
	}
}

#[cfg(test)]
mod test {
	use allocator_api2::alloc::Global;
	use super::{RawBlock, RawMap};

	type Map = RawMap<u32, Global>;

	#[test]
	fn new_does_not_allocate() {
		let map = Map::new(Global);
		assert_eq!(map.capacity(), 0);
		assert_eq!(map.block_count(), 0);
	}

	#[test]
	fn first_block_is_centered() {
		let mut map = Map::new(Global);
		assert_eq!(map.push_block_back(), Ok(3));
		assert_eq!(map.capacity(), 8);
		assert_eq!((map.first(), map.last()), (3, 4));
		assert_eq!(map.generation(), 1);
	}

	#[test]
	fn growth_keeps_block_addresses() {
		let mut map = Map::new(Global);
		for _ in 0..4 {
			map.push_block_back().unwrap_or_else(|e| e.handle());
		}
		// Safety: the slot is within the allocated range.
		let first = unsafe { map.block(map.first()).slot(0) };

		for _ in 0..40 {
			map.push_block_front().unwrap_or_else(|e| e.handle());
			map.push_block_back().unwrap_or_else(|e| e.handle());
		}

		assert_eq!(map.block_count(), 84);
		assert!(map.capacity() >= 84);
		// Safety: the 41st block from the front is the original first block.
		let moved = unsafe { map.block(map.first() + 40).slot(0) };
		assert_eq!(first, moved);
	}

	#[test]
	fn recenters_before_reallocating() {
		let mut map = Map::new(Global);
		for _ in 0..2 {
			map.push_block_back().unwrap_or_else(|e| e.handle());
		}
		// Drain the front so the blocks drift toward the back.
		for _ in 0..3 {
			map.push_block_back().unwrap_or_else(|e| e.handle());
			// Safety: the first block is empty.
			unsafe { map.pop_block_front(); }
		}
		let cap = map.capacity();
		map.push_block_back().unwrap_or_else(|e| e.handle());
		assert_eq!(map.capacity(), cap, "a half-empty directory should recenter in place");
	}

	#[test]
	fn shrink_to_fit_drops_slack() {
		let mut map = Map::new(Global);
		for _ in 0..3 {
			map.push_block_back().unwrap_or_else(|e| e.handle());
		}
		let start = map.start();
		let shift = map.shrink_to_fit().unwrap_or_else(|e| e.handle());
		assert_eq!(map.capacity(), 3);
		assert_eq!((map.first(), map.last()), (0, 3));
		assert_eq!(start as isize + shift * RawBlock::<u32>::CAPACITY as isize, 0);
	}

	#[test]
	fn release_blocks_keeps_directory() {
		let mut map = Map::new(Global);
		for _ in 0..5 {
			map.push_block_back().unwrap_or_else(|e| e.handle());
		}
		let cap = map.capacity();
		// Safety: no elements were written.
		let start = unsafe { map.release_blocks() };
		assert_eq!(map.capacity(), cap);
		assert_eq!(map.block_count(), 0);
		assert_eq!(start, cap / 2 * RawBlock::<u32>::CAPACITY);
	}
}
