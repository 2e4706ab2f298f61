// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use core::fmt;
use core::fmt::{Debug, Formatter};
use core::iter::FusedIterator;
use crate::alloc_strategy::ElementAlloc;
use super::Deque;

/// An owning iterator over the elements of a [`Deque`].
///
/// Created by [`Deque::into_iter`](IntoIterator::into_iter). Blocks are released as the
/// iterator advances; any elements not yielded are dropped with the iterator.
pub struct IntoIter<T, A: ElementAlloc> {
	deque: Deque<T, A>,
}

impl<T, A: ElementAlloc> IntoIter<T, A> {
	pub(super) fn new(deque: Deque<T, A>) -> Self {
		Self { deque }
	}

	/// Returns an iterator over the remaining elements.
	pub fn as_iter(&self) -> super::Iter<'_, T> {
		self.deque.iter()
	}

	/// Returns the underlying allocator.
	pub fn allocator(&self) -> &A {
		self.deque.allocator()
	}
}

impl<T: Clone, A: ElementAlloc> Clone for IntoIter<T, A> {
	fn clone(&self) -> Self {
		Self::new(self.deque.clone())
	}
}

impl<T: Debug, A: ElementAlloc> Debug for IntoIter<T, A> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("IntoIter")
		 .field(&self.deque)
		 .finish()
	}
}

impl<T, A: ElementAlloc> Iterator for IntoIter<T, A> {
	type Item = T;

	fn next(&mut self) -> Option<T> {
		self.deque.pop_front()
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let len = self.deque.len();
		(len, Some(len))
	}

	fn count(self) -> usize {
		self.deque.len()
	}

	fn last(mut self) -> Option<T> {
		self.deque.pop_back()
	}
}

impl<T, A: ElementAlloc> DoubleEndedIterator for IntoIter<T, A> {
	fn next_back(&mut self) -> Option<T> {
		self.deque.pop_back()
	}
}

impl<T, A: ElementAlloc> ExactSizeIterator for IntoIter<T, A> {
	fn len(&self) -> usize {
		self.deque.len()
	}
}

impl<T, A: ElementAlloc> FusedIterator for IntoIter<T, A> { }

#[cfg(test)]
mod test {
	use alloc::rc::Rc;
	use alloc::vec::Vec;
	use crate::Deque;

	#[test]
	fn yields_from_both_ends() {
		let deque: Deque<u32> = (0..600).collect();
		let mut iter = deque.into_iter();
		assert_eq!(iter.next(), Some(0));
		assert_eq!(iter.next_back(), Some(599));
		assert_eq!(iter.len(), 598);
		assert_eq!(iter.as_iter().next(), Some(&1));
		assert_eq!(iter.collect::<Vec<_>>().len(), 598);
	}

	#[test]
	fn drops_remaining_elements() {
		let rc = Rc::new(());
		let deque: Deque<_> = (0..100).map(|_| Rc::clone(&rc)).collect();
		let mut iter = deque.into_iter();
		let taken = iter.next();
		drop(iter);
		assert_eq!(Rc::strong_count(&rc), 2);
		drop(taken);
		assert_eq!(Rc::strong_count(&rc), 1);
	}
}
