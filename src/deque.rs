// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

//! # Internal Layout
//!
//! Elements live in fixed-size blocks of `B` slots, listed in order by a directory of block
//! pointers with free slots kept at both ends. Positions are *flattened*: slot `s`, offset `o`
//! is index `s * B + o`. The deque stores the flattened index of its first element and its
//! length:
//!
//! ```text
//!  directory   |  -  |  -  | b0  | b1  | b2  |  -  |  -  |
//!                           |     |     |
//!  blocks               [..xx] [xxxx] [x...]
//!                          ^              ^
//!                        head        head + len
//! ```
//!
//! A push which crosses a block edge allocates one block. A pop which leaves two empty blocks
//! past an end releases the outer one, so at most one spare block is retained at each end.

use alloc::vec::Vec;
use core::cmp;
use core::fmt::{self, Debug, Formatter};
use core::marker::PhantomData;
use core::mem;
use core::ops::{Bound, Index, IndexMut, Range, RangeBounds};
use core::ptr::{self, NonNull};
use allocator_api2::alloc::Global;
use crate::alloc_strategy::ElementAlloc;
use crate::error::{OutOfRange, PushError, Result, TryReserveError};
use crate::internal::TypeSize;
use crate::raw::{AllocError, RawMap};

pub use cursor::{Cursor, CursorMut, Position, RevCursor};
use cursor::Vacancy;
pub use into_iter::IntoIter;
pub use iter::{Iter, IterMut};
pub use view::ViewMut;

mod cursor;
mod eq;
mod into_iter;
mod iter;
mod view;

/// A double-ended queue stored in fixed-size blocks.
///
/// Pushing to either end never moves existing elements, so references obtained through raw
/// pointers stay valid until their element is popped, removed, or dropped. Indexing, pushing and
/// popping at both ends are *O*(1).
///
/// # Examples
///
/// ```
/// use blockdeque::Deque;
///
/// let mut deque = Deque::new();
/// deque.push_back(2);
/// deque.push_back(3);
/// deque.push_front(1);
///
/// assert_eq!(deque, [1, 2, 3]);
/// assert_eq!(deque.pop_front(), Some(1));
/// assert_eq!(deque[1], 3);
/// ```
pub struct Deque<T, A: ElementAlloc = Global> {
	map: RawMap<T, A>,
	head: usize,
	len: usize,
	front_vacancy: Vacancy,
	back_vacancy: Vacancy,
	_t: PhantomData<T>,
}

// Safety: the deque owns its elements and allocator like `VecDeque` does.
unsafe impl<T: Send, A: ElementAlloc + Send> Send for Deque<T, A> { }
// Safety: shared access only hands out shared references to elements.
unsafe impl<T: Sync, A: ElementAlloc + Sync> Sync for Deque<T, A> { }

impl<T> Deque<T> {
	/// Creates a new, empty deque.
	///
	/// No memory is allocated until elements are pushed to the deque.
	///
	/// # Examples
	///
	/// ```
	/// use blockdeque::Deque;
	///
	/// let deque: Deque<i32> = Deque::new();
	/// assert!(deque.is_empty());
	/// assert_eq!(deque.capacity(), 0);
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self::new_in(Global)
	}

	/// Creates a deque of `len` default values.
	///
	/// If a call to [`Default::default`] panics, the elements created so far are dropped and the
	/// panic propagates.
	///
	/// # Panics
	///
	/// Panics if the allocator reports an allocation failure, or the capacity overflows.
	///
	/// # Examples
	///
	/// ```
	/// use blockdeque::Deque;
	///
	/// let deque: Deque<String> = Deque::with_len(3);
	/// assert_eq!(deque, ["", "", ""]);
	/// ```
	#[track_caller]
	pub fn with_len(len: usize) -> Self
	where
		T: Default
	{
		Self::from_fn(len, |_| T::default())
	}

	/// Creates a deque of `len` clones of `value`.
	///
	/// # Panics
	///
	/// Panics if the allocator reports an allocation failure, or the capacity overflows. A panic
	/// in [`Clone::clone`] propagates after the clones made so far are dropped.
	///
	/// # Examples
	///
	/// ```
	/// use blockdeque::Deque;
	///
	/// let deque = Deque::from_elem(4, 'x');
	/// assert_eq!(deque, ['x'; 4]);
	/// ```
	#[track_caller]
	pub fn from_elem(len: usize, value: T) -> Self
	where
		T: Clone
	{
		Self::from_elem_in(len, value, Global)
	}

	/// Creates a deque of `len` elements, each returned by `f` called with its index.
	///
	/// # Panics
	///
	/// Panics if the allocator reports an allocation failure, or the capacity overflows. A panic
	/// in `f` propagates after the elements created so far are dropped.
	///
	/// # Examples
	///
	/// ```
	/// use blockdeque::Deque;
	///
	/// let squares = Deque::from_fn(4, |i| i * i);
	/// assert_eq!(squares, [0, 1, 4, 9]);
	/// ```
	#[track_caller]
	pub fn from_fn<F: FnMut(usize) -> T>(len: usize, f: F) -> Self {
		Self::from_fn_in(len, f, Global)
	}

	/// Creates a deque of `len` elements from a fallible constructor. Construction stops at the
	/// first error; every element created so far is dropped and the error is returned.
	///
	/// # Errors
	///
	/// Returns the first error returned by `f`.
	///
	/// # Panics
	///
	/// Panics if the allocator reports an allocation failure, or the capacity overflows.
	///
	/// # Examples
	///
	/// ```
	/// use blockdeque::Deque;
	///
	/// let parsed = Deque::try_from_fn(3, |i| ["1", "2", "3"][i].parse::<u8>());
	/// assert_eq!(parsed, Ok(Deque::from([1, 2, 3])));
	///
	/// let failed = Deque::try_from_fn(3, |i| ["1", "x", "3"][i].parse::<u8>());
	/// assert!(failed.is_err());
	/// ```
	#[track_caller]
	pub fn try_from_fn<E, F>(len: usize, f: F) -> Result<Self, E>
	where
		F: FnMut(usize) -> Result<T, E>
	{
		Self::try_from_fn_in(len, f, Global)
	}
}

impl<T, A: ElementAlloc> Deque<T, A> {
	const BLOCK: usize = T::BLOCK_CAPACITY;

	/// Creates a new, empty deque in the given allocator. No memory is allocated until elements
	/// are pushed.
	#[must_use]
	pub const fn new_in(alloc: A) -> Self {
		Self {
			map: RawMap::new(alloc),
			head: 0,
			len: 0,
			front_vacancy: Vacancy::new(),
			back_vacancy: Vacancy::new(),
			_t: PhantomData,
		}
	}

	/// Creates a deque of `len` clones of `value` in the given allocator. `value` itself is
	/// dropped after the last clone.
	///
	/// # Panics
	///
	/// Panics if the allocator reports an allocation failure, or the capacity overflows.
	#[track_caller]
	pub fn from_elem_in(len: usize, value: T, alloc: A) -> Self
	where
		T: Clone
	{
		Self::from_fn_in(len, |_| value.clone(), alloc)
	}

	/// Creates a deque of `len` elements returned by `f`, in the given allocator.
	///
	/// # Panics
	///
	/// Panics if the allocator reports an allocation failure, or the capacity overflows.
	#[track_caller]
	pub fn from_fn_in<F: FnMut(usize) -> T>(len: usize, mut f: F, alloc: A) -> Self {
		let mut deque = Self::new_in(alloc);
		deque.reserve(len);
		for i in 0..len {
			deque.push_back(f(i));
		}
		deque
	}

	/// Creates a deque of `len` elements from a fallible constructor, in the given allocator.
	///
	/// # Errors
	///
	/// Returns the first error returned by `f`, after dropping the elements created so far.
	///
	/// # Panics
	///
	/// Panics if the allocator reports an allocation failure, or the capacity overflows.
	#[track_caller]
	pub fn try_from_fn_in<E, F>(len: usize, mut f: F, alloc: A) -> Result<Self, E>
	where
		F: FnMut(usize) -> Result<T, E>
	{
		let mut deque = Self::new_in(alloc);
		deque.reserve(len);
		for i in 0..len {
			deque.push_back(f(i)?);
		}
		Ok(deque)
	}

	/// Returns a reference to the underlying allocator.
	pub fn allocator(&self) -> &A {
		self.map.allocator()
	}

	/// Returns the number of elements in the deque.
	pub const fn len(&self) -> usize {
		self.len
	}

	/// Returns `true` if the deque contains no elements.
	pub const fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Returns the number of element slots in the allocated blocks. Pushing at either end may
	/// still allocate a block when the spare slots are all on the other end.
	///
	/// # Examples
	///
	/// ```
	/// use blockdeque::Deque;
	///
	/// let mut deque = Deque::new();
	/// deque.push_back(1u32);
	/// assert_eq!(deque.capacity(), Deque::<u32>::block_capacity());
	/// ```
	pub fn capacity(&self) -> usize {
		(self.map.last() - self.map.first()) * Self::BLOCK
	}

	/// Returns the number of element slots in each block.
	pub const fn block_capacity() -> usize {
		Self::BLOCK
	}

	/// Returns the number of allocated blocks.
	pub fn block_count(&self) -> usize {
		self.map.block_count()
	}

	/// Returns a reference to the element at `index`, or `None` if out of bounds.
	pub fn get(&self, index: usize) -> Option<&T> {
		// Safety: the index is checked to be in bounds.
		(index < self.len).then(|| unsafe { self.get_unchecked(index) })
	}

	/// Returns a mutable reference to the element at `index`, or `None` if out of bounds.
	pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
		// Safety: the index is checked to be in bounds.
		(index < self.len).then(|| unsafe { self.get_unchecked_mut(index) })
	}

	/// Returns a reference to the element at `index`, without bounds checking.
	///
	/// # Safety
	///
	/// `index` must be less than [`len`](Self::len).
	pub unsafe fn get_unchecked(&self, index: usize) -> &T {
		debug_assert!(index < self.len, "index should be in bounds");
		// Safety: the caller promises the element is live.
		unsafe {
			self.map.elem(self.head + index).as_ref()
		}
	}

	/// Returns a mutable reference to the element at `index`, without bounds checking.
	///
	/// # Safety
	///
	/// `index` must be less than [`len`](Self::len).
	pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
		debug_assert!(index < self.len, "index should be in bounds");
		// Safety: the caller promises the element is live.
		unsafe {
			self.map.elem(self.head + index).as_mut()
		}
	}

	/// Returns a reference to the element at `index`.
	///
	/// # Errors
	///
	/// Returns [`OutOfRange`] if `index` is not less than the length, including indices wrapped
	/// around from negative values.
	///
	/// # Examples
	///
	/// ```
	/// use blockdeque::Deque;
	///
	/// let deque = Deque::from([1, 2, 3]);
	/// assert_eq!(deque.at(2), Ok(&3));
	/// assert!(deque.at(3).is_err());
	/// assert!(deque.at(0usize.wrapping_sub(1)).is_err());
	/// ```
	pub fn at(&self, index: usize) -> Result<&T> {
		let len = self.len;
		self.get(index).ok_or(OutOfRange::new(index, len))
	}

	/// Returns a mutable reference to the element at `index`.
	///
	/// # Errors
	///
	/// Returns [`OutOfRange`] if `index` is not less than the length.
	pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
		let len = self.len;
		self.get_mut(index).ok_or(OutOfRange::new(index, len))
	}

	/// Returns the first element, or `None` if the deque is empty.
	pub fn front(&self) -> Option<&T> {
		self.get(0)
	}

	/// Returns a mutable reference to the first element, or `None` if the deque is empty.
	pub fn front_mut(&mut self) -> Option<&mut T> {
		self.get_mut(0)
	}

	/// Returns the last element, or `None` if the deque is empty.
	pub fn back(&self) -> Option<&T> {
		self.get(self.len.wrapping_sub(1))
	}

	/// Returns a mutable reference to the last element, or `None` if the deque is empty.
	pub fn back_mut(&mut self) -> Option<&mut T> {
		self.get_mut(self.len.wrapping_sub(1))
	}

	/// Returns `true` if the deque contains an element equal to `value`.
	pub fn contains(&self, value: &T) -> bool
	where
		T: PartialEq
	{
		self.iter().any(|elem| elem == value)
	}

	/// Appends an element to the back of the deque.
	///
	/// Existing elements are never moved, so pointers to them remain valid.
	///
	/// # Panics
	///
	/// Panics if the allocator reports an allocation failure, or the capacity overflows.
	///
	/// # Examples
	///
	/// ```
	/// use blockdeque::Deque;
	///
	/// let mut deque = Deque::new();
	/// deque.push_back(1);
	/// let first: *const i32 = &deque[0];
	///
	/// for i in 2..10_000 {
	///     deque.push_back(i);
	/// }
	/// assert_eq!(first, &deque[0] as *const i32);
	/// ```
	#[track_caller]
	pub fn push_back(&mut self, value: T) {
		if let Err(err) = self.grow_back() {
			err.handle()
		}
		// Safety: the slot at the end was just ensured to be allocated, and is not live.
		unsafe {
			self.construct(self.head + self.len, value);
		}
		self.len += 1;
	}

	/// Prepends an element to the front of the deque.
	///
	/// Existing elements are never moved, so pointers to them remain valid.
	///
	/// # Panics
	///
	/// Panics if the allocator reports an allocation failure, or the capacity overflows.
	#[track_caller]
	pub fn push_front(&mut self, value: T) {
		if let Err(err) = self.grow_front() {
			err.handle()
		}
		self.head -= 1;
		// Safety: the slot before the old head was just ensured to be allocated, and is not live.
		unsafe {
			self.construct(self.head, value);
		}
		self.len += 1;
	}

	/// Appends an element to the back of the deque, returning it back if memory could not be
	/// allocated. The deque is unchanged on failure.
	///
	/// # Errors
	///
	/// Returns [`PushError`] holding the value if the allocator reports an allocation failure, or
	/// the capacity overflows.
	pub fn try_push_back(&mut self, value: T) -> Result<(), PushError<T>> {
		if let Err(err) = self.grow_back() {
			return Err(PushError::new(value, err))
		}
		// Safety: the slot at the end was just ensured to be allocated, and is not live.
		unsafe {
			self.construct(self.head + self.len, value);
		}
		self.len += 1;
		Ok(())
	}

	/// Prepends an element to the front of the deque, returning it back if memory could not be
	/// allocated. The deque is unchanged on failure.
	///
	/// # Errors
	///
	/// Returns [`PushError`] holding the value if the allocator reports an allocation failure, or
	/// the capacity overflows.
	pub fn try_push_front(&mut self, value: T) -> Result<(), PushError<T>> {
		if let Err(err) = self.grow_front() {
			return Err(PushError::new(value, err))
		}
		self.head -= 1;
		// Safety: the slot before the old head was just ensured to be allocated, and is not live.
		unsafe {
			self.construct(self.head, value);
		}
		self.len += 1;
		Ok(())
	}

	/// Removes the last element and returns it, or `None` if the deque is empty.
	///
	/// # Examples
	///
	/// ```
	/// use blockdeque::Deque;
	///
	/// let mut deque = Deque::from([1, 2]);
	/// assert_eq!(deque.pop_back(), Some(2));
	/// assert_eq!(deque.pop_back(), Some(1));
	/// assert_eq!(deque.pop_back(), None);
	/// ```
	pub fn pop_back(&mut self) -> Option<T> {
		if self.len == 0 {
			return None
		}

		self.len -= 1;
		self.back_vacancy.vacate();
		// Safety: the slot held the last live element, which is no longer counted.
		let value = unsafe {
			self.map.elem(self.head + self.len).read()
		};
		self.trim_back();
		Some(value)
	}

	/// Removes the first element and returns it, or `None` if the deque is empty.
	pub fn pop_front(&mut self) -> Option<T> {
		if self.len == 0 {
			return None
		}

		// Safety: the slot held the first live element, which is no longer counted.
		let value = unsafe {
			self.map.elem(self.head).read()
		};
		self.head += 1;
		self.len -= 1;
		self.front_vacancy.vacate();
		self.trim_front();
		Some(value)
	}

	/// Inserts an element at `index`, shifting whichever side of the deque is shorter by one
	/// slot. When both sides are equal, the back side is shifted.
	///
	/// # Panics
	///
	/// Panics if `index` is greater than the length, if the allocator reports an allocation
	/// failure, or the capacity overflows.
	///
	/// # Examples
	///
	/// ```
	/// use blockdeque::Deque;
	///
	/// let mut deque = Deque::from(['a', 'c']);
	/// deque.insert(1, 'b');
	/// assert_eq!(deque, ['a', 'b', 'c']);
	/// ```
	#[track_caller]
	pub fn insert(&mut self, index: usize, value: T) {
		if let Err((err, _)) = self.insert_inner(index, value) {
			err.handle()
		}
	}

	/// Inserts an element at `index`, returning it back if memory could not be allocated. Memory
	/// for the extra slot is reserved before any element is moved, so the deque is unchanged on
	/// failure.
	///
	/// # Errors
	///
	/// Returns [`PushError`] holding the value if the allocator reports an allocation failure, or
	/// the capacity overflows.
	///
	/// # Panics
	///
	/// Panics if `index` is greater than the length.
	#[track_caller]
	pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), PushError<T>> {
		self.insert_inner(index, value)
			.map_err(|(err, value)| PushError::new(value, err))
	}

	#[track_caller]
	fn insert_inner(&mut self, index: usize, value: T) -> Result<(), (AllocError, T)> {
		assert!(
			index <= self.len,
			"insertion index (is {index}) should be <= len (is {})",
			self.len
		);

		if index < self.len - index {
			if let Err(err) = self.grow_front() {
				return Err((err, value))
			}
			// Safety: a free slot precedes the head. The first `index` elements shift into it,
			//  leaving the slot at `index` uninitialized.
			unsafe {
				self.copy(self.head, self.head - 1, index);
				self.head -= 1;
				self.construct(self.head + index, value);
			}
		} else {
			if let Err(err) = self.grow_back() {
				return Err((err, value))
			}
			let at = self.head + index;
			// Safety: a free slot follows the end. The last `len - index` elements shift into it,
			//  leaving the slot at `index` uninitialized.
			unsafe {
				self.copy(at, at + 1, self.len - index);
				self.construct(at, value);
			}
		}
		self.len += 1;
		self.map.invalidate();
		Ok(())
	}

	/// Removes and returns the element at `index`, shifting whichever side of the deque is
	/// shorter to close the gap. Returns `None` if `index` is out of bounds.
	///
	/// # Examples
	///
	/// ```
	/// use blockdeque::Deque;
	///
	/// let mut deque = Deque::from([1, 2, 3, 4]);
	/// assert_eq!(deque.remove(1), Some(2));
	/// assert_eq!(deque.remove(9), None);
	/// assert_eq!(deque, [1, 3, 4]);
	/// ```
	pub fn remove(&mut self, index: usize) -> Option<T> {
		if index >= self.len {
			return None
		}

		let at = self.head + index;
		// Safety: the element is live; the slot is overwritten or released below.
		let value = unsafe { self.map.elem(at).read() };
		let after = self.len - index - 1;
		if index < after {
			// Safety: the `index` elements before the gap shift back into it.
			unsafe {
				self.copy(self.head, self.head + 1, index);
			}
			self.head += 1;
			self.len -= 1;
			self.trim_front();
		} else {
			// Safety: the `after` elements following the gap shift forward into it.
			unsafe {
				self.copy(at + 1, at, after);
			}
			self.len -= 1;
			self.trim_back();
		}
		self.map.invalidate();
		Some(value)
	}

	/// Swaps the elements at indices `i` and `j`.
	///
	/// # Panics
	///
	/// Panics if either index is out of bounds.
	#[track_caller]
	pub fn swap(&mut self, i: usize, j: usize) {
		assert!(i < self.len, "index {i} should be less than the length {}", self.len);
		assert!(j < self.len, "index {j} should be less than the length {}", self.len);
		// Safety: both indices are in bounds. `ptr::swap` allows `i == j`.
		unsafe {
			ptr::swap(
				self.map.elem(self.head + i).as_ptr(),
				self.map.elem(self.head + j).as_ptr(),
			);
		}
	}

	/// Exchanges the contents and allocators of two deques in *O*(1), without moving any
	/// element.
	pub fn swap_with(&mut self, other: &mut Self) {
		mem::swap(self, other);
	}

	/// Reserves capacity for at least `additional` more elements at the back of the deque.
	///
	/// # Panics
	///
	/// Panics if the allocator reports an allocation failure, or the capacity overflows.
	#[track_caller]
	pub fn reserve(&mut self, additional: usize) {
		if let Err(err) = self.reserve_inner(additional) {
			err.handle()
		}
	}

	/// Tries to reserve capacity for at least `additional` more elements at the back of the
	/// deque. The elements are unchanged on failure.
	///
	/// # Errors
	///
	/// Returns an error if the allocator reports an allocation failure, or the capacity
	/// overflows.
	pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
		self.reserve_inner(additional).map_err(Into::into)
	}

	/// Shortens the deque to `len` elements, dropping the rest from the back. Does nothing if
	/// `len` is not less than the current length.
	pub fn truncate(&mut self, len: usize) {
		if len >= self.len {
			return
		}

		let end = self.head + self.len;
		// Set the length first, so a panicking destructor leaks the rest rather than dropping
		// elements twice.
		self.len = len;
		self.back_vacancy.vacate();
		// Safety: the elements past the new length are live and no longer counted.
		unsafe {
			self.destroy(self.head + len..end);
		}
		self.trim_back();
	}

	/// Resizes the deque to `new_len`, cloning `value` into new slots or dropping elements from
	/// the back.
	///
	/// If a clone panics, the elements added so far are dropped and the deque is left as it was.
	///
	/// # Panics
	///
	/// Panics if the allocator reports an allocation failure, or the capacity overflows.
	///
	/// # Examples
	///
	/// ```
	/// use blockdeque::Deque;
	///
	/// let mut deque = Deque::from([1, 2]);
	/// deque.resize(4, 0);
	/// assert_eq!(deque, [1, 2, 0, 0]);
	/// deque.resize(1, 0);
	/// assert_eq!(deque, [1]);
	/// ```
	#[track_caller]
	pub fn resize(&mut self, new_len: usize, value: T)
	where
		T: Clone
	{
		if new_len <= self.len {
			self.truncate(new_len);
			return
		}

		self.reserve(new_len - self.len);
		let mut guard = TruncateGuard::new(self);
		while guard.deque.len + 1 < new_len {
			guard.deque.push_back(value.clone());
		}
		guard.deque.push_back(value);
		guard.commit();
	}

	/// Resizes the deque to `new_len`, calling `f` to fill new slots or dropping elements from the
	/// back.
	///
	/// If `f` panics, the elements added so far are dropped and the deque is left as it was.
	///
	/// # Panics
	///
	/// Panics if the allocator reports an allocation failure, or the capacity overflows.
	#[track_caller]
	pub fn resize_with<F: FnMut() -> T>(&mut self, new_len: usize, mut f: F) {
		if new_len <= self.len {
			self.truncate(new_len);
			return
		}

		self.reserve(new_len - self.len);
		let mut guard = TruncateGuard::new(self);
		while guard.deque.len < new_len {
			guard.deque.push_back(f());
		}
		guard.commit();
	}

	/// Drops all elements and releases every block. The block directory is kept.
	pub fn clear(&mut self) {
		self.truncate(0);
		// Safety: no elements are live.
		self.head = unsafe { self.map.release_blocks() };
	}

	/// Releases spare blocks on both ends and shrinks the block directory to fit the remaining
	/// blocks. If the directory cannot be reallocated, it is left as is.
	pub fn shrink_to_fit(&mut self) {
		if self.len == 0 {
			// Safety: no elements are live.
			self.head = unsafe { self.map.release_blocks() };
		} else {
			while self.map.end() - (self.head + self.len) >= Self::BLOCK {
				// Safety: the last block holds no live elements.
				unsafe { self.map.pop_block_back(); }
			}
			while self.head - self.map.start() >= Self::BLOCK {
				// Safety: the first block holds no live elements.
				unsafe { self.map.pop_block_front(); }
			}
		}

		if let Ok(shift) = self.map.shrink_to_fit() {
			self.rebase(shift);
		}
	}

	/// Moves all elements of `other` to the back of this deque, leaving `other` empty.
	///
	/// # Panics
	///
	/// Panics if the allocator reports an allocation failure, or the capacity overflows.
	#[track_caller]
	pub fn append(&mut self, other: &mut Self) {
		self.reserve(other.len);
		while let Some(value) = other.pop_front() {
			self.push_back(value);
		}
		other.clear();
	}

	/// Retains only the elements for which `f` returns `true`, preserving their order.
	pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut f: F) {
		self.retain_mut(|elem| f(elem));
	}

	/// Retains only the elements for which `f` returns `true`, preserving their order.
	///
	/// If `f` panics, the deque holds every original element, in an unspecified order.
	pub fn retain_mut<F: FnMut(&mut T) -> bool>(&mut self, mut f: F) {
		let mut kept = 0;
		for i in 0..self.len {
			// Safety: `i` is in bounds.
			if f(unsafe { self.get_unchecked_mut(i) }) {
				if i != kept {
					self.swap(i, kept);
				}
				kept += 1;
			}
		}
		self.truncate(kept);
	}

	/// Returns a front-to-back iterator.
	pub fn iter(&self) -> Iter<'_, T> {
		self.range(..)
	}

	/// Returns a front-to-back iterator of mutable references.
	pub fn iter_mut(&mut self) -> IterMut<'_, T> {
		self.range_mut(..)
	}

	/// Returns an iterator over `range`.
	///
	/// # Panics
	///
	/// Panics if the range is out of bounds or decreasing.
	///
	/// # Examples
	///
	/// ```
	/// use blockdeque::Deque;
	///
	/// let deque: Deque<_> = (0..10).collect();
	/// assert!(deque.range(2..5).eq([2, 3, 4].iter()));
	/// ```
	#[track_caller]
	pub fn range<R: RangeBounds<usize>>(&self, range: R) -> Iter<'_, T> {
		let Range { start, end } = to_range(range, self.len);
		// Safety: the range is within the live elements, borrowed shared for the lifetime.
		unsafe {
			Iter::new(&self.map, self.head + start, self.head + end)
		}
	}

	/// Returns an iterator of mutable references over `range`.
	///
	/// # Panics
	///
	/// Panics if the range is out of bounds or decreasing.
	#[track_caller]
	pub fn range_mut<R: RangeBounds<usize>>(&mut self, range: R) -> IterMut<'_, T> {
		let Range { start, end } = to_range(range, self.len);
		// Safety: the range is within the live elements, borrowed uniquely for the lifetime.
		unsafe {
			IterMut::new(&self.map, self.head + start, self.head + end)
		}
	}

	fn reserve_inner(&mut self, additional: usize) -> Result<(), AllocError> {
		let end = self.head + self.len;
		let free = self.map.end() - end;
		if free >= additional {
			return Ok(())
		}

		let blocks = (additional - free).div_ceil(Self::BLOCK);
		let shift = self.map.reserve_back(blocks)?;
		self.rebase(shift);
		for _ in 0..blocks {
			let shift = self.map.push_block_back()?;
			self.rebase(shift);
		}
		Ok(())
	}

	/// Ensures the slot at the end is allocated, ahead of a push there.
	fn grow_back(&mut self) -> Result<(), AllocError> {
		if self.head + self.len == self.map.end() {
			let shift = self.map.push_block_back()?;
			self.rebase(shift);
		}
		self.back_vacancy.refill();
		Ok(())
	}

	/// Ensures the slot before the head is allocated, ahead of a push there.
	fn grow_front(&mut self) -> Result<(), AllocError> {
		if self.head == self.map.start() {
			let shift = self.map.push_block_front()?;
			self.rebase(shift);
		}
		self.front_vacancy.refill();
		Ok(())
	}

	/// Releases empty blocks past the end, keeping at most one spare.
	fn trim_back(&mut self) {
		while self.map.end() - (self.head + self.len) >= 2 * Self::BLOCK {
			// Safety: the last block lies entirely past the end, so holds no live elements.
			unsafe { self.map.pop_block_back(); }
		}
	}

	/// Releases empty blocks before the head, keeping at most one spare.
	fn trim_front(&mut self) {
		while self.head - self.map.start() >= 2 * Self::BLOCK {
			// Safety: the first block lies entirely before the head, so holds no live elements.
			unsafe { self.map.pop_block_front(); }
		}
	}

	/// Applies a directory shift, in block slots, to the head index.
	fn rebase(&mut self, shift: isize) {
		self.head = self.head.wrapping_add_signed(shift * Self::BLOCK as isize);
	}

	/// Constructs `value` at a flattened index.
	///
	/// # Safety
	///
	/// The slot must be allocated and must not hold a live element.
	unsafe fn construct(&self, index: usize, value: T) {
		// Safety: the caller promises the slot is allocated and free.
		unsafe {
			self.map.allocator().construct_at(self.map.elem(index), value);
		}
	}

	/// Destroys the elements in a range of flattened indices.
	///
	/// # Safety
	///
	/// Every slot in the range must hold a live element, which must no longer be counted.
	unsafe fn destroy(&self, range: Range<usize>) {
		let alloc = self.map.allocator();
		for index in range {
			// Safety: the caller promises the slot holds a live element.
			unsafe {
				alloc.destroy_at(self.map.elem(index));
			}
		}
	}

	/// Moves `count` elements from flattened index `src` to `dst`, one run of contiguous slots at
	/// a time. The ranges may overlap.
	///
	/// # Safety
	///
	/// Both ranges must lie within allocated blocks. The source elements are moved bitwise; slots
	/// left behind are logically uninitialized.
	unsafe fn copy(&self, src: usize, dst: usize, count: usize) {
		let block = Self::BLOCK;
		if src == dst || count == 0 {
			return
		}

		if dst < src {
			// Copy forward, so each run is read before the following runs are written.
			let mut done = 0;
			while done < count {
				let (s, d) = (src + done, dst + done);
				let run = cmp::min(count - done, cmp::min(block - s % block, block - d % block));
				// Safety: both runs lie within single allocated blocks.
				unsafe {
					ptr::copy(self.map.elem(s).as_ptr(), self.map.elem(d).as_ptr(), run);
				}
				done += run;
			}
		} else {
			// Copy backward, from the last run down.
			let mut left = count;
			while left > 0 {
				let (s_end, d_end) = (src + left, dst + left);
				let run = cmp::min(
					left,
					cmp::min((s_end - 1) % block + 1, (d_end - 1) % block + 1)
				);
				// Safety: both runs lie within single allocated blocks.
				unsafe {
					ptr::copy(
						self.map.elem(s_end - run).as_ptr(),
						self.map.elem(d_end - run).as_ptr(),
						run
					);
				}
				left -= run;
			}
		}
	}

	/// Returns a pointer to the element at logical `index`, for cursors and views.
	///
	/// # Safety
	///
	/// `index` must be less than the length.
	unsafe fn elem_ptr(&self, index: usize) -> NonNull<T> {
		// Safety: the caller promises the element is live.
		unsafe {
			self.map.elem(self.head + index)
		}
	}
}

/// Truncates the deque back to its original length on unwind.
struct TruncateGuard<'a, T, A: ElementAlloc> {
	deque: &'a mut Deque<T, A>,
	len: usize,
	committed: bool,
}

impl<'a, T, A: ElementAlloc> TruncateGuard<'a, T, A> {
	fn new(deque: &'a mut Deque<T, A>) -> Self {
		let len = deque.len;
		Self { deque, len, committed: false }
	}

	fn commit(mut self) {
		self.committed = true;
	}
}

impl<T, A: ElementAlloc> Drop for TruncateGuard<'_, T, A> {
	fn drop(&mut self) {
		if !self.committed {
			self.deque.truncate(self.len);
		}
	}
}

#[track_caller]
fn to_range<R: RangeBounds<usize>>(range: R, len: usize) -> Range<usize> {
	let start = match range.start_bound() {
		Bound::Included(&start) => start,
		Bound::Excluded(&start) => start.checked_add(1).unwrap_or(usize::MAX),
		Bound::Unbounded => 0,
	};
	let end = match range.end_bound() {
		Bound::Included(&end) => end.checked_add(1).unwrap_or(usize::MAX),
		Bound::Excluded(&end) => end,
		Bound::Unbounded => len,
	};
	assert!(start <= end, "range start (is {start}) should be <= range end (is {end})");
	assert!(end <= len, "range end (is {end}) should be <= length (is {len})");
	start..end
}

impl<T, A: ElementAlloc> Drop for Deque<T, A> {
	fn drop(&mut self) {
		let live = self.head..self.head + self.len;
		self.len = 0;
		// Safety: the elements are live and no longer counted. The directory releases the blocks
		//  when it is dropped after this.
		unsafe {
			self.destroy(live);
		}
	}
}

impl<T> Default for Deque<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: Clone, A: ElementAlloc> Clone for Deque<T, A> {
	fn clone(&self) -> Self {
		let mut deque = Self::new_in(self.allocator().select_on_clone());
		deque.extend(self.iter().cloned());
		deque
	}

	/// Replaces the contents with clones of `source`'s. The clones are built in fresh storage
	/// first, so if a clone panics this deque is left untouched.
	fn clone_from(&mut self, source: &Self) {
		let alloc = if A::PROPAGATE_ON_CLONE_FROM {
			source.allocator().clone()
		} else {
			self.allocator().clone()
		};
		let mut deque = Self::new_in(alloc);
		deque.extend(source.iter().cloned());
		*self = deque;
	}
}

impl<T: Debug, A: ElementAlloc> Debug for Deque<T, A> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.iter()).finish()
	}
}

impl<T, A: ElementAlloc> Index<usize> for Deque<T, A> {
	type Output = T;

	#[track_caller]
	fn index(&self, index: usize) -> &T {
		assert!(index < self.len, "index (is {index}) should be < len (is {})", self.len);
		// Safety: the index was just checked.
		unsafe { self.get_unchecked(index) }
	}
}

impl<T, A: ElementAlloc> IndexMut<usize> for Deque<T, A> {
	#[track_caller]
	fn index_mut(&mut self, index: usize) -> &mut T {
		assert!(index < self.len, "index (is {index}) should be < len (is {})", self.len);
		// Safety: the index was just checked.
		unsafe { self.get_unchecked_mut(index) }
	}
}

impl<T, A: ElementAlloc> Extend<T> for Deque<T, A> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		let iter = iter.into_iter();
		self.reserve(iter.size_hint().0);
		for value in iter {
			self.push_back(value);
		}
	}
}

impl<'a, T: Copy + 'a, A: ElementAlloc> Extend<&'a T> for Deque<T, A> {
	fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
		self.extend(iter.into_iter().copied());
	}
}

impl<T> FromIterator<T> for Deque<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		let mut deque = Self::new();
		deque.extend(iter);
		deque
	}
}

impl<T, const N: usize> From<[T; N]> for Deque<T> {
	/// Creates a deque from an array, in order.
	///
	/// ```
	/// use blockdeque::Deque;
	///
	/// let deque = Deque::from([1, 2, 3]);
	/// assert_eq!(deque.len(), 3);
	/// assert_eq!(deque[0], 1);
	/// ```
	fn from(value: [T; N]) -> Self {
		value.into_iter().collect()
	}
}

impl<T> From<Vec<T>> for Deque<T> {
	fn from(value: Vec<T>) -> Self {
		value.into_iter().collect()
	}
}

impl<T, A: ElementAlloc> From<Deque<T, A>> for Vec<T> {
	fn from(value: Deque<T, A>) -> Self {
		value.into_iter().collect()
	}
}

impl<T, A: ElementAlloc> IntoIterator for Deque<T, A> {
	type Item = T;
	type IntoIter = IntoIter<T, A>;

	fn into_iter(self) -> IntoIter<T, A> {
		IntoIter::new(self)
	}
}

impl<'a, T, A: ElementAlloc> IntoIterator for &'a Deque<T, A> {
	type Item = &'a T;
	type IntoIter = Iter<'a, T>;

	fn into_iter(self) -> Iter<'a, T> {
		self.iter()
	}
}

impl<'a, T, A: ElementAlloc> IntoIterator for &'a mut Deque<T, A> {
	type Item = &'a mut T;
	type IntoIter = IterMut<'a, T>;

	fn into_iter(self) -> IterMut<'a, T> {
		self.iter_mut()
	}
}

#[cfg(test)]
mod test {
	use alloc::vec;
	use alloc::vec::Vec;
	use super::Deque;

	fn block() -> usize {
		Deque::<u32>::block_capacity()
	}

	#[test]
	fn mixed_pushes_index_in_logical_order() {
		let n = 1000u32;
		let mut deque = Deque::new();
		for i in 0..n {
			deque.push_back(i);
		}
		for i in n..2 * n {
			deque.push_front(i);
		}

		assert_eq!(deque.len(), 2 * n as usize);
		for i in 0..n as usize {
			assert_eq!(deque[i], 2 * n - 1 - i as u32);
		}
		for i in n as usize..2 * n as usize {
			assert_eq!(deque[i], i as u32 - n);
		}
	}

	#[test]
	fn alternating_pop_keeps_spare_blocks_bounded() {
		let mut deque = Deque::new();
		for i in 0..10 * block() as u32 {
			deque.push_back(i);
		}
		for _ in 0..9 * block() {
			deque.pop_front();
		}
		assert!(deque.block_count() <= 3, "blocks: {}", deque.block_count());

		for i in 0..100_000 {
			deque.push_back(i);
			deque.push_front(i);
			deque.pop_back();
			deque.pop_front();
		}
		assert_eq!(deque.len(), block());
		assert!(deque.block_count() <= 3, "blocks: {}", deque.block_count());
	}

	#[test]
	fn insert_shifts_shorter_side() {
		let mut deque: Deque<u32> = (0..10).collect();
		let front = deque.head;
		deque.insert(2, 100);
		assert_eq!(deque.head, front - 1, "inserting near the front should shift the front");
		deque.insert(10, 200);
		assert_eq!(deque.head, front - 1, "inserting near the back should shift the back");
		assert_eq!(deque, [0, 1, 100, 2, 3, 4, 5, 6, 7, 8, 200, 9]);
	}

	#[test]
	fn insert_across_blocks() {
		let len = 5 * block() as u32;
		let mut deque: Deque<u32> = (0..len).collect();
		deque.insert(len as usize / 2, u32::MAX);
		deque.insert(block() + 1, u32::MAX - 1);

		let mut expected: Vec<u32> = (0..len).collect();
		expected.insert(len as usize / 2, u32::MAX);
		expected.insert(block() + 1, u32::MAX - 1);
		assert_eq!(deque, expected[..]);
	}

	#[test]
	fn remove_across_blocks() {
		let len = 5 * block() as u32;
		let mut deque: Deque<u32> = (0..len).collect();
		let mut expected: Vec<u32> = (0..len).collect();
		for index in [len as usize / 2 - 1, 3, 4 * block(), 0, block()] {
			assert_eq!(deque.remove(index), Some(expected.remove(index)));
		}
		assert_eq!(deque, expected[..]);
		assert_eq!(deque.remove(deque.len()), None);
	}

	#[test]
	fn insert_into_empty() {
		let mut deque = Deque::new();
		deque.insert(0, 'b');
		deque.insert(0, 'a');
		deque.insert(2, 'c');
		assert_eq!(deque, ['a', 'b', 'c']);
	}

	#[test]
	#[should_panic]
	fn insert_past_end_panics() {
		let mut deque = Deque::from([1]);
		deque.insert(2, 0);
	}

	#[test]
	fn at_rejects_out_of_range() {
		let empty: Deque<u8> = Deque::new();
		let full = Deque::from([1u8, 2, 3]);
		for deque in [&empty, &full] {
			let len = deque.len();
			for index in [len, len + 100, usize::MAX] {
				let err = deque.at(index).err();
				assert_eq!(err.map(|e| (e.index(), e.len())), Some((index, len)));
			}
		}
		assert_eq!(full.at(1), Ok(&2));
	}

	#[test]
	fn truncate_and_clear_release_blocks() {
		let mut deque: Deque<u32> = (0..10 * block() as u32).collect();
		deque.truncate(block());
		assert!(deque.block_count() <= 3);
		deque.clear();
		assert!(deque.is_empty());
		assert_eq!(deque.block_count(), 0);

		deque.push_front(1);
		deque.push_back(2);
		assert_eq!(deque, [1, 2]);
	}

	#[test]
	fn shrink_to_fit_keeps_contents() {
		let mut deque: Deque<u32> = (0..3 * block() as u32).collect();
		for _ in 0..block() + 3 {
			deque.pop_front();
		}
		deque.shrink_to_fit();
		assert_eq!(deque.block_count(), 2);
		assert!(deque.iter().copied().eq(block() as u32 + 3..3 * block() as u32));

		deque.clear();
		deque.shrink_to_fit();
		assert_eq!(deque.capacity(), 0);
		deque.push_back(7);
		assert_eq!(deque, [7]);
	}

	#[test]
	fn resize_both_ways() {
		let mut deque = Deque::from_elem(3, 1);
		deque.resize(block() + 5, 2);
		assert_eq!(deque.len(), block() + 5);
		assert_eq!(deque[2], 1);
		assert_eq!(deque[block() + 4], 2);
		deque.resize(2, 0);
		assert_eq!(deque, [1, 1]);

		let mut counter = 0;
		deque.resize_with(5, || { counter += 1; counter });
		assert_eq!(deque, [1, 1, 1, 2, 3]);
	}

	#[test]
	fn retain_preserves_order() {
		let mut deque: Deque<u32> = (0..3 * block() as u32).collect();
		deque.retain(|&x| x % 3 == 0);
		assert!(deque.iter().copied().eq((0..3 * block() as u32).filter(|x| x % 3 == 0)));
	}

	#[test]
	fn append_moves_everything() {
		let mut a = Deque::from([1, 2]);
		let mut b = Deque::from([3, 4, 5]);
		a.append(&mut b);
		assert_eq!(a, [1, 2, 3, 4, 5]);
		assert!(b.is_empty());
	}

	#[test]
	fn clone_is_independent() {
		let original: Deque<Vec<u32>> = (0..100).map(|i| vec![i]).collect();
		let mut copy = original.clone();
		copy[0].push(9);
		copy.push_front(vec![]);
		assert_eq!(original[0], [0]);
		assert_eq!(copy[1], [0, 9]);
		assert_ne!(&original[5] as *const _, &copy[6] as *const _);
	}

	#[test]
	fn swap_with_exchanges_storage() {
		let mut a = Deque::from([1, 2, 3]);
		let mut b = Deque::from([4]);
		let first: *const i32 = &a[0];
		a.swap_with(&mut b);
		assert_eq!(a, [4]);
		assert_eq!(b, [1, 2, 3]);
		assert_eq!(first, &b[0] as *const i32);
	}

	#[test]
	fn zero_sized_elements() {
		let mut deque = Deque::new();
		for _ in 0..1000 {
			deque.push_back(());
			deque.push_front(());
		}
		deque.insert(500, ());
		assert_eq!(deque.len(), 2001);
		assert_eq!(deque.remove(3), Some(()));
		assert_eq!(deque.iter().count(), 2000);
	}

	#[test]
	fn extend_from_references() {
		let mut deque = Deque::from([1]);
		deque.extend(&[2, 3]);
		assert_eq!(deque, [1, 2, 3]);
		assert!(deque.contains(&3));
		assert!(!deque.contains(&4));
		assert_eq!(Vec::from(deque), [1, 2, 3]);
	}
}
