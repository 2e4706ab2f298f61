// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::fmt::{Debug, Formatter};
use core::ops::{Range, RangeBounds};
use core::ptr;
use allocator_api2::alloc::Global;
use crate::alloc_strategy::ElementAlloc;
use super::{to_range, Deque, Iter, IterMut};

/// Insertion sort is faster below this length.
const INSERTION_THRESHOLD: usize = 20;

/// A mutable view over a contiguous logical range of a [`Deque`], with in-place algorithms that
/// need random access: sorting, reversing, filling and shuffling.
///
/// The range may span any number of blocks. Indices into the view are relative to its start.
///
/// # Examples
///
/// ```
/// use blockdeque::Deque;
///
/// let mut deque = Deque::from([5, 4, 3, 2, 1, 0]);
/// deque.view_mut(1..5).sort_unstable();
/// assert_eq!(deque, [5, 1, 2, 3, 4, 0]);
///
/// deque.view_mut(..).reverse();
/// assert_eq!(deque, [0, 4, 3, 2, 1, 5]);
/// ```
pub struct ViewMut<'a, T, A: ElementAlloc = Global> {
	deque: &'a mut Deque<T, A>,
	start: usize,
	len: usize,
}

impl<T, A: ElementAlloc> Deque<T, A> {
	/// Returns a mutable view over `range`.
	///
	/// # Panics
	///
	/// Panics if the range is out of bounds or decreasing.
	#[track_caller]
	pub fn view_mut<R: RangeBounds<usize>>(&mut self, range: R) -> ViewMut<'_, T, A> {
		let Range { start, end } = to_range(range, self.len);
		ViewMut { deque: self, start, len: end - start }
	}
}

impl<'a, T, A: ElementAlloc> ViewMut<'a, T, A> {
	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn get(&self, index: usize) -> Option<&T> {
		if index < self.len {
			self.deque.get(self.start + index)
		} else {
			None
		}
	}

	pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
		if index < self.len {
			self.deque.get_mut(self.start + index)
		} else {
			None
		}
	}

	pub fn iter(&self) -> Iter<'_, T> {
		self.deque.range(self.start..self.start + self.len)
	}

	pub fn iter_mut(&mut self) -> IterMut<'_, T> {
		self.deque.range_mut(self.start..self.start + self.len)
	}

	/// Swaps two elements of the view.
	///
	/// # Panics
	///
	/// Panics if either index is out of bounds.
	#[track_caller]
	pub fn swap(&mut self, a: usize, b: usize) {
		assert!(a < self.len && b < self.len, "indices {a} and {b} should be < len (is {})", self.len);
		self.deque.swap(self.start + a, self.start + b);
	}

	/// Reverses the order of the elements in the view.
	pub fn reverse(&mut self) {
		let len = self.len;
		for i in 0..len / 2 {
			self.swap(i, len - 1 - i);
		}
	}

	/// Fills the view with clones of `value`.
	pub fn fill(&mut self, value: T)
	where
		T: Clone
	{
		for elem in self.iter_mut() {
			elem.clone_from(&value);
		}
	}

	/// Fills the view with values returned by `f`.
	pub fn fill_with<F: FnMut() -> T>(&mut self, mut f: F) {
		for elem in self.iter_mut() {
			*elem = f();
		}
	}

	/// Returns the length of the longest sorted prefix of the view.
	///
	/// ```
	/// use blockdeque::Deque;
	///
	/// let mut deque = Deque::from([1, 2, 2, 5, 3, 4]);
	/// assert_eq!(deque.view_mut(..).sorted_prefix_len(), 4);
	/// ```
	pub fn sorted_prefix_len(&self) -> usize
	where
		T: PartialOrd
	{
		let mut iter = self.iter();
		let Some(mut prev) = iter.next() else { return 0 };
		let mut len = 1;
		for next in iter {
			if next < prev {
				break
			}
			prev = next;
			len += 1;
		}
		len
	}

	/// Returns `true` if the view is sorted in ascending order.
	pub fn is_sorted(&self) -> bool
	where
		T: PartialOrd
	{
		self.sorted_prefix_len() == self.len
	}

	/// Sorts the view, preserving the order of equal elements.
	///
	/// The elements are moved into a temporary buffer for sorting and moved back after.
	pub fn sort(&mut self)
	where
		T: Ord
	{
		self.sort_by(Ord::cmp);
	}

	/// Sorts the view with a comparator, preserving the order of equal elements.
	///
	/// If `compare` panics, the view holds every original element in an unspecified order.
	pub fn sort_by<F: FnMut(&T, &T) -> Ordering>(&mut self, compare: F) {
		let mut buf = Buffer::take(self);
		buf.elements.sort_by(compare);
	}

	/// Sorts the view with a key extraction function, preserving the order of equal elements.
	pub fn sort_by_key<K: Ord, F: FnMut(&T) -> K>(&mut self, mut f: F) {
		self.sort_by(|a, b| f(a).cmp(&f(b)));
	}

	/// Sorts the view in place without allocating, but may reorder equal elements.
	///
	/// Short views are insertion sorted, longer views are heapsorted.
	pub fn sort_unstable(&mut self)
	where
		T: Ord
	{
		self.sort_unstable_by(Ord::cmp);
	}

	/// Sorts the view in place with a comparator, without allocating. Equal elements may be
	/// reordered.
	///
	/// If `compare` panics, the view holds every original element in an unspecified order.
	pub fn sort_unstable_by<F: FnMut(&T, &T) -> Ordering>(&mut self, mut compare: F) {
		if self.len <= INSERTION_THRESHOLD {
			self.insertion_sort(&mut compare);
		} else {
			self.heapsort(&mut compare);
		}
	}

	/// Sorts the view in place with a key extraction function. Equal elements may be reordered.
	pub fn sort_unstable_by_key<K: Ord, F: FnMut(&T) -> K>(&mut self, mut f: F) {
		self.sort_unstable_by(|a, b| f(a).cmp(&f(b)));
	}

	/// Shuffles the view uniformly with a Fisher-Yates shuffle.
	///
	/// ```
	/// use blockdeque::Deque;
	/// use rand::SeedableRng;
	/// use rand::rngs::StdRng;
	///
	/// let mut deque: Deque<u32> = (0..100).collect();
	/// deque.view_mut(..).shuffle(&mut StdRng::seed_from_u64(7));
	/// let mut sorted: Vec<u32> = deque.iter().copied().collect();
	/// sorted.sort();
	/// assert!(sorted.into_iter().eq(0..100));
	/// ```
	#[cfg(feature = "rand")]
	pub fn shuffle<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
		for i in (1..self.len).rev() {
			let j = rng.gen_range(0..=i);
			self.swap(i, j);
		}
	}

	fn compare<F: FnMut(&T, &T) -> Ordering>(&self, a: usize, b: usize, compare: &mut F) -> Ordering {
		// Safety: callers only pass indices within the view.
		unsafe {
			compare(
				self.deque.get_unchecked(self.start + a),
				self.deque.get_unchecked(self.start + b),
			)
		}
	}

	fn insertion_sort<F: FnMut(&T, &T) -> Ordering>(&mut self, compare: &mut F) {
		for i in 1..self.len {
			let mut j = i;
			while j > 0 && self.compare(j - 1, j, compare) == Ordering::Greater {
				self.swap(j - 1, j);
				j -= 1;
			}
		}
	}

	fn heapsort<F: FnMut(&T, &T) -> Ordering>(&mut self, compare: &mut F) {
		let len = self.len;
		for i in (0..len / 2).rev() {
			self.sift_down(i, len, compare);
		}
		for end in (1..len).rev() {
			self.swap(0, end);
			self.sift_down(0, end, compare);
		}
	}

	fn sift_down<F: FnMut(&T, &T) -> Ordering>(&mut self, mut root: usize, end: usize, compare: &mut F) {
		loop {
			let mut max = root;
			for child in [2 * root + 1, 2 * root + 2] {
				if child < end && self.compare(max, child, compare) == Ordering::Less {
					max = child;
				}
			}

			if max == root {
				return
			}

			self.swap(root, max);
			root = max;
		}
	}
}

impl<T: Debug, A: ElementAlloc> Debug for ViewMut<'_, T, A> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.iter()).finish()
	}
}

/// The elements of a view moved into a vector, moved back when dropped.
struct Buffer<'v, 'a, T, A: ElementAlloc> {
	view: &'v mut ViewMut<'a, T, A>,
	elements: Vec<T>,
}

impl<'v, 'a, T, A: ElementAlloc> Buffer<'v, 'a, T, A> {
	fn take(view: &'v mut ViewMut<'a, T, A>) -> Self {
		let mut elements = Vec::with_capacity(view.len);
		for i in 0..view.len {
			// Safety: the element is live. It is logically owned by the buffer until it is written
			//  back on drop, and the view is borrowed so the slot is not touched meanwhile.
			elements.push(unsafe { view.deque.elem_ptr(view.start + i).read() });
		}
		Self { view, elements }
	}
}

impl<T, A: ElementAlloc> Drop for Buffer<'_, '_, T, A> {
	fn drop(&mut self) {
		let deque = &*self.view.deque;
		let start = self.view.start;
		for (i, elem) in self.elements.iter().enumerate() {
			// Safety: each slot was read out in `take` and is rewritten exactly once.
			unsafe {
				ptr::copy_nonoverlapping(elem, deque.elem_ptr(start + i).as_ptr(), 1);
			}
		}
		// Safety: the elements were moved back into the deque.
		unsafe {
			self.elements.set_len(0);
		}
	}
}
