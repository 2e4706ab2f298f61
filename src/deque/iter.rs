// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use core::fmt;
use core::fmt::{Debug, Formatter};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr::NonNull;
use allocator_api2::alloc::Allocator;
use crate::internal::TypeSize;
use crate::raw::{RawBlock, RawMap};

/// A pair of flattened indices walking a block directory from both ends.
struct RawIter<T> {
	slots: NonNull<RawBlock<T>>,
	front: usize,
	back: usize,
}

impl<T> Clone for RawIter<T> {
	fn clone(&self) -> Self { *self }
}

impl<T> Copy for RawIter<T> { }

impl<T> RawIter<T> {
	/// # Safety
	///
	/// `front..back` must be a range of live elements in `map`, and the directory must not be
	/// reallocated while the iterator is in use.
	unsafe fn new<A: Allocator>(map: &RawMap<T, A>, front: usize, back: usize) -> Self {
		debug_assert!(front <= back, "iterator range should not be decreasing");
		Self { slots: map.slots(), front, back }
	}

	fn len(&self) -> usize {
		self.back - self.front
	}

	/// # Safety
	///
	/// `index` must be within the initial range of the iterator.
	unsafe fn elem(&self, index: usize) -> NonNull<T> {
		let block = T::BLOCK_CAPACITY;
		// Safety: the index is in a live range, so its directory slot holds an allocated block.
		unsafe {
			self.slots.add(index / block).read().slot(index % block)
		}
	}

	fn next(&mut self) -> Option<NonNull<T>> {
		if self.front == self.back {
			return None
		}

		// Safety: front is before back, within the range.
		let elem = unsafe { self.elem(self.front) };
		self.front += 1;
		Some(elem)
	}

	fn next_back(&mut self) -> Option<NonNull<T>> {
		if self.front == self.back {
			return None
		}

		self.back -= 1;
		// Safety: back was after front, within the range.
		Some(unsafe { self.elem(self.back) })
	}

	fn nth(&mut self, n: usize) -> Option<NonNull<T>> {
		if n >= self.len() {
			self.front = self.back;
			return None
		}

		self.front += n;
		self.next()
	}

	fn nth_back(&mut self, n: usize) -> Option<NonNull<T>> {
		if n >= self.len() {
			self.back = self.front;
			return None
		}

		self.back -= n;
		self.next_back()
	}
}

/// An iterator over references to the elements of a [`Deque`](super::Deque).
///
/// Created by [`Deque::iter`](super::Deque::iter) and [`Deque::range`](super::Deque::range).
/// Skipping with [`nth`](Iterator::nth) is *O*(1).
pub struct Iter<'a, T: 'a> {
	raw: RawIter<T>,
	_ref: PhantomData<&'a T>,
}

// Safety: the iterator only hands out shared references.
unsafe impl<T: Sync> Send for Iter<'_, T> { }
// Safety: as above.
unsafe impl<T: Sync> Sync for Iter<'_, T> { }

impl<'a, T: 'a> Iter<'a, T> {
	/// # Safety
	///
	/// `front..back` must be a range of live elements in `map`, borrowed shared for `'a`.
	pub(super) unsafe fn new<A: Allocator>(map: &'a RawMap<T, A>, front: usize, back: usize) -> Self {
		Self {
			// Safety: upheld by the caller.
			raw: unsafe { RawIter::new(map, front, back) },
			_ref: PhantomData,
		}
	}
}

impl<T> Clone for Iter<'_, T> {
	fn clone(&self) -> Self {
		Self { raw: self.raw, _ref: PhantomData }
	}
}

impl<T: Debug> Debug for Iter<'_, T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Iter")
		 .field(&self.clone().collect::<alloc::vec::Vec<_>>())
		 .finish()
	}
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
	type Item = &'a T;

	fn next(&mut self) -> Option<&'a T> {
		// Safety: the element is live and shared for 'a.
		self.raw.next().map(|elem| unsafe { elem.as_ref() })
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let len = self.raw.len();
		(len, Some(len))
	}

	fn count(self) -> usize {
		self.raw.len()
	}

	fn nth(&mut self, n: usize) -> Option<&'a T> {
		// Safety: as in `next`.
		self.raw.nth(n).map(|elem| unsafe { elem.as_ref() })
	}

	fn last(mut self) -> Option<&'a T> {
		self.next_back()
	}
}

impl<'a, T: 'a> DoubleEndedIterator for Iter<'a, T> {
	fn next_back(&mut self) -> Option<&'a T> {
		// Safety: as in `next`.
		self.raw.next_back().map(|elem| unsafe { elem.as_ref() })
	}

	fn nth_back(&mut self, n: usize) -> Option<&'a T> {
		// Safety: as in `next`.
		self.raw.nth_back(n).map(|elem| unsafe { elem.as_ref() })
	}
}

impl<T> ExactSizeIterator for Iter<'_, T> {
	fn len(&self) -> usize {
		self.raw.len()
	}
}

impl<T> FusedIterator for Iter<'_, T> { }

/// An iterator over mutable references to the elements of a [`Deque`](super::Deque).
///
/// Created by [`Deque::iter_mut`](super::Deque::iter_mut) and
/// [`Deque::range_mut`](super::Deque::range_mut).
pub struct IterMut<'a, T: 'a> {
	raw: RawIter<T>,
	_ref: PhantomData<&'a mut T>,
}

// Safety: the iterator hands out unique references to distinct elements.
unsafe impl<T: Send> Send for IterMut<'_, T> { }
// Safety: shared access to the iterator gives no access to elements.
unsafe impl<T: Sync> Sync for IterMut<'_, T> { }

impl<'a, T: 'a> IterMut<'a, T> {
	/// # Safety
	///
	/// `front..back` must be a range of live elements in `map`, borrowed uniquely for `'a`.
	pub(super) unsafe fn new<A: Allocator>(map: &'a RawMap<T, A>, front: usize, back: usize) -> Self {
		Self {
			// Safety: upheld by the caller.
			raw: unsafe { RawIter::new(map, front, back) },
			_ref: PhantomData,
		}
	}
}

impl<T: Debug> Debug for IterMut<'_, T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		// Read-only view of the remaining elements, borrowed with the iterator.
		let remaining = Iter::<T> { raw: self.raw, _ref: PhantomData };
		f.debug_tuple("IterMut")
		 .field(&remaining.collect::<alloc::vec::Vec<_>>())
		 .finish()
	}
}

impl<'a, T: 'a> Iterator for IterMut<'a, T> {
	type Item = &'a mut T;

	fn next(&mut self) -> Option<&'a mut T> {
		// Safety: each element is yielded once, so the unique borrows never alias.
		self.raw.next().map(|mut elem| unsafe { elem.as_mut() })
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let len = self.raw.len();
		(len, Some(len))
	}

	fn count(self) -> usize {
		self.raw.len()
	}

	fn nth(&mut self, n: usize) -> Option<&'a mut T> {
		// Safety: as in `next`.
		self.raw.nth(n).map(|mut elem| unsafe { elem.as_mut() })
	}

	fn last(mut self) -> Option<&'a mut T> {
		self.next_back()
	}
}

impl<'a, T: 'a> DoubleEndedIterator for IterMut<'a, T> {
	fn next_back(&mut self) -> Option<&'a mut T> {
		// Safety: as in `next`.
		self.raw.next_back().map(|mut elem| unsafe { elem.as_mut() })
	}

	fn nth_back(&mut self, n: usize) -> Option<&'a mut T> {
		// Safety: as in `next`.
		self.raw.nth_back(n).map(|mut elem| unsafe { elem.as_mut() })
	}
}

impl<T> ExactSizeIterator for IterMut<'_, T> {
	fn len(&self) -> usize {
		self.raw.len()
	}
}

impl<T> FusedIterator for IterMut<'_, T> { }
