// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

//! Random-access cursors into a [`Deque`].
//!
//! A [`Cursor`] is a shared, copyable logical index in `0..=len`, where `len` is the past-the-end
//! position. Arithmetic on cursors is *O*(1) regardless of how many blocks it crosses. A
//! [`CursorMut`] holds the deque exclusively and can edit at its position. A [`RevCursor`] walks
//! backward over a forward cursor. A [`Position`] is detached from any borrow; it names a slot
//! and resolves to `None` once that slot no longer holds the element it was taken for.

use core::cmp::Ordering;
use core::fmt;
use core::fmt::{Debug, Formatter};
use core::ops::{Add, AddAssign, Sub, SubAssign};
use core::ptr;
use allocator_api2::alloc::Global;
use crate::alloc_strategy::ElementAlloc;
use crate::DifferenceType;
use super::Deque;

#[track_caller]
fn offset(index: usize, by: DifferenceType, len: usize) -> usize {
	match index.checked_add_signed(by) {
		Some(index) if index <= len => index,
		_ => out_of_bounds(index, by, len)
	}
}

#[allow(clippy::panic)]
#[cold]
#[inline(never)]
#[track_caller]
fn out_of_bounds(index: usize, by: DifferenceType, len: usize) -> ! {
	panic!("cursor at {index} moved by {by} leaves the deque bounds 0..={len}")
}

/// A shared random-access cursor into a [`Deque`].
///
/// # Examples
///
/// ```
/// use blockdeque::Deque;
///
/// let deque: Deque<_> = (0..1000).collect();
/// let begin = deque.cursor_front();
/// let end = deque.cursor_end();
///
/// assert_eq!(end - begin, 1000);
/// assert_eq!((begin + 600).get(), Some(&600));
/// assert_eq!(end.get(), None);
/// assert!(begin < end);
/// ```
pub struct Cursor<'a, T, A: ElementAlloc = Global> {
	deque: &'a Deque<T, A>,
	index: usize,
}

impl<T, A: ElementAlloc> Copy for Cursor<'_, T, A> { }
impl<T, A: ElementAlloc> Clone for Cursor<'_, T, A> {
	#[inline(always)] fn clone(&self) -> Self { *self }
}

impl<'a, T, A: ElementAlloc> Cursor<'a, T, A> {
	pub(super) fn new(deque: &'a Deque<T, A>, index: usize) -> Self {
		Self { deque, index }
	}

	/// Returns the logical index of the cursor, from `0` to `len` inclusive.
	pub fn index(&self) -> usize {
		self.index
	}

	/// Returns the element at the cursor, or `None` at the past-the-end position.
	pub fn get(&self) -> Option<&'a T> {
		self.deque.get(self.index)
	}

	/// Returns the element `by` positions from the cursor, or `None` outside the deque.
	pub fn peek(&self, by: DifferenceType) -> Option<&'a T> {
		self.deque.get(self.index.checked_add_signed(by)?)
	}

	/// Returns `true` at the past-the-end position.
	pub fn is_end(&self) -> bool {
		self.index == self.deque.len()
	}

	/// Returns a detached [`Position`] for the cursor's slot.
	pub fn position(&self) -> Position {
		self.deque.position(self.index)
	}

	/// Moves the cursor by `by` positions.
	///
	/// # Panics
	///
	/// Panics if the cursor would leave `0..=len`.
	#[track_caller]
	pub fn move_by(&mut self, by: DifferenceType) {
		self.index = offset(self.index, by, self.deque.len());
	}

	/// Returns a reverse cursor whose first element is the one before this cursor.
	pub fn reversed(self) -> RevCursor<'a, T, A> {
		RevCursor { base: self }
	}
}

impl<T: Debug, A: ElementAlloc> Debug for Cursor<'_, T, A> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Cursor")
		 .field("index", &self.index)
		 .field("element", &self.get())
		 .finish()
	}
}

impl<T, A: ElementAlloc> Add<DifferenceType> for Cursor<'_, T, A> {
	type Output = Self;

	#[track_caller]
	fn add(mut self, rhs: DifferenceType) -> Self {
		self.move_by(rhs);
		self
	}
}

impl<T, A: ElementAlloc> Sub<DifferenceType> for Cursor<'_, T, A> {
	type Output = Self;

	#[track_caller]
	fn sub(mut self, rhs: DifferenceType) -> Self {
		self.move_by(rhs.wrapping_neg());
		self
	}
}

impl<T, A: ElementAlloc> AddAssign<DifferenceType> for Cursor<'_, T, A> {
	#[track_caller]
	fn add_assign(&mut self, rhs: DifferenceType) {
		self.move_by(rhs);
	}
}

impl<T, A: ElementAlloc> SubAssign<DifferenceType> for Cursor<'_, T, A> {
	#[track_caller]
	fn sub_assign(&mut self, rhs: DifferenceType) {
		self.move_by(rhs.wrapping_neg());
	}
}

impl<T, A: ElementAlloc> Sub for Cursor<'_, T, A> {
	type Output = DifferenceType;

	/// Returns the signed distance between two cursors into the same deque.
	///
	/// # Panics
	///
	/// Panics if the cursors point into different deques.
	#[track_caller]
	fn sub(self, rhs: Self) -> DifferenceType {
		assert!(ptr::eq(self.deque, rhs.deque), "cursors should point into the same deque");
		self.index as DifferenceType - rhs.index as DifferenceType
	}
}

impl<T, A: ElementAlloc> PartialEq for Cursor<'_, T, A> {
	fn eq(&self, other: &Self) -> bool {
		ptr::eq(self.deque, other.deque) && self.index == other.index
	}
}

impl<T, A: ElementAlloc> Eq for Cursor<'_, T, A> { }

impl<T, A: ElementAlloc> PartialOrd for Cursor<'_, T, A> {
	/// Cursors into different deques are unordered.
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		ptr::eq(self.deque, other.deque).then(|| self.index.cmp(&other.index))
	}
}

/// A reverse cursor over a [`Deque`], adapting a forward [`Cursor`].
///
/// A reverse cursor with base `b` reads the element at `b - 1`, so the reverse cursor built from
/// the past-the-end position reads the last element.
///
/// # Examples
///
/// ```
/// use blockdeque::Deque;
///
/// let deque = Deque::from([1, 2, 3]);
/// let mut rev = deque.cursor_end().reversed();
/// assert_eq!(rev.get(), Some(&3));
/// rev += 2;
/// assert_eq!(rev.get(), Some(&1));
/// assert_eq!(rev.base().index(), 1);
/// ```
pub struct RevCursor<'a, T, A: ElementAlloc = Global> {
	base: Cursor<'a, T, A>,
}

impl<T, A: ElementAlloc> Copy for RevCursor<'_, T, A> { }
impl<T, A: ElementAlloc> Clone for RevCursor<'_, T, A> {
	#[inline(always)] fn clone(&self) -> Self { *self }
}

impl<'a, T, A: ElementAlloc> RevCursor<'a, T, A> {
	/// Returns the underlying forward cursor, one past the element this cursor reads.
	pub fn base(&self) -> Cursor<'a, T, A> {
		self.base
	}

	/// Returns the element before the base, or `None` if the base is at the front.
	pub fn get(&self) -> Option<&'a T> {
		self.base.peek(-1)
	}

	/// Moves the cursor by `by` positions toward the front of the deque.
	///
	/// # Panics
	///
	/// Panics if the base would leave `0..=len`.
	#[track_caller]
	pub fn move_by(&mut self, by: DifferenceType) {
		self.base.move_by(by.wrapping_neg());
	}
}

impl<T: Debug, A: ElementAlloc> Debug for RevCursor<'_, T, A> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("RevCursor")
		 .field("base", &self.base.index)
		 .field("element", &self.get())
		 .finish()
	}
}

impl<T, A: ElementAlloc> Add<DifferenceType> for RevCursor<'_, T, A> {
	type Output = Self;

	#[track_caller]
	fn add(mut self, rhs: DifferenceType) -> Self {
		self.move_by(rhs);
		self
	}
}

impl<T, A: ElementAlloc> Sub<DifferenceType> for RevCursor<'_, T, A> {
	type Output = Self;

	#[track_caller]
	fn sub(mut self, rhs: DifferenceType) -> Self {
		self.move_by(rhs.wrapping_neg());
		self
	}
}

impl<T, A: ElementAlloc> AddAssign<DifferenceType> for RevCursor<'_, T, A> {
	#[track_caller]
	fn add_assign(&mut self, rhs: DifferenceType) {
		self.move_by(rhs);
	}
}

impl<T, A: ElementAlloc> SubAssign<DifferenceType> for RevCursor<'_, T, A> {
	#[track_caller]
	fn sub_assign(&mut self, rhs: DifferenceType) {
		self.move_by(rhs.wrapping_neg());
	}
}

impl<T, A: ElementAlloc> Sub for RevCursor<'_, T, A> {
	type Output = DifferenceType;

	#[track_caller]
	fn sub(self, rhs: Self) -> DifferenceType {
		rhs.base - self.base
	}
}

impl<T, A: ElementAlloc> PartialEq for RevCursor<'_, T, A> {
	fn eq(&self, other: &Self) -> bool {
		self.base == other.base
	}
}

impl<T, A: ElementAlloc> Eq for RevCursor<'_, T, A> { }

impl<T, A: ElementAlloc> PartialOrd for RevCursor<'_, T, A> {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		other.base.partial_cmp(&self.base)
	}
}

/// An exclusive cursor into a [`Deque`], which can edit the deque at its position.
///
/// # Examples
///
/// ```
/// use blockdeque::Deque;
///
/// let mut deque = Deque::from([1, 2, 4]);
/// let mut cursor = deque.cursor_at_mut(2);
/// cursor.insert(3);
/// cursor.move_by(1);
/// if let Some(x) = cursor.get_mut() {
///     *x *= 10;
/// }
/// assert_eq!(deque, [1, 2, 3, 40]);
/// ```
pub struct CursorMut<'a, T, A: ElementAlloc = Global> {
	deque: &'a mut Deque<T, A>,
	index: usize,
}

impl<'a, T, A: ElementAlloc> CursorMut<'a, T, A> {
	pub fn index(&self) -> usize {
		self.index
	}

	pub fn get(&self) -> Option<&T> {
		self.deque.get(self.index)
	}

	pub fn get_mut(&mut self) -> Option<&mut T> {
		self.deque.get_mut(self.index)
	}

	/// Consumes the cursor, returning the element it points at for the cursor's lifetime.
	pub fn into_mut(self) -> Option<&'a mut T> {
		self.deque.get_mut(self.index)
	}

	/// Moves the cursor by `by` positions.
	///
	/// # Panics
	///
	/// Panics if the cursor would leave `0..=len`.
	#[track_caller]
	pub fn move_by(&mut self, by: DifferenceType) {
		self.index = offset(self.index, by, self.deque.len());
	}

	/// Moves the cursor to `index`.
	///
	/// # Panics
	///
	/// Panics if `index` is greater than the length.
	#[track_caller]
	pub fn seek(&mut self, index: usize) {
		assert!(
			index <= self.deque.len(),
			"cursor index (is {index}) should be <= len (is {})",
			self.deque.len()
		);
		self.index = index;
	}

	/// Returns a shared cursor at the same position, borrowing this one.
	pub fn as_cursor(&self) -> Cursor<'_, T, A> {
		Cursor::new(self.deque, self.index)
	}

	/// Returns the deque the cursor points into.
	pub fn deque(&self) -> &Deque<T, A> {
		self.deque
	}

	/// Inserts `value` before the cursor. The cursor then points at the inserted element.
	///
	/// # Panics
	///
	/// Panics if the allocator reports an allocation failure, or the capacity overflows.
	#[track_caller]
	pub fn insert(&mut self, value: T) {
		self.deque.insert(self.index, value);
	}

	/// Removes the element at the cursor and returns it. The cursor then points at the following
	/// element. Returns `None` at the past-the-end position.
	pub fn remove(&mut self) -> Option<T> {
		self.deque.remove(self.index)
	}
}

impl<'a, T, A: ElementAlloc> From<CursorMut<'a, T, A>> for Cursor<'a, T, A> {
	fn from(value: CursorMut<'a, T, A>) -> Self {
		Cursor::new(value.deque, value.index)
	}
}

impl<T: Debug, A: ElementAlloc> Debug for CursorMut<'_, T, A> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("CursorMut")
		 .field("index", &self.index)
		 .field("element", &self.get())
		 .finish()
	}
}

/// A detached handle to a slot of a [`Deque`].
///
/// A position holds no borrow, so the deque can be modified while it is held. It resolves back to
/// a logical index with [`Deque::resolve`] for as long as its slot holds the same element: pops
/// from either end keep it valid, re-indexed relative to the new front, unless they pop the
/// element itself. The first push to an end after pops from that end may refill a vacated slot,
/// so it invalidates every position taken before it. Inserting or removing in the middle
/// invalidates every position, as do clearing, shrinking and growth of the block directory.
///
/// # Examples
///
/// ```
/// use blockdeque::Deque;
///
/// let mut deque = Deque::from([1, 2, 3, 4]);
/// let pos = deque.position(2);
///
/// deque.pop_front();
/// assert_eq!(deque.resolve(pos), Some(1));
/// assert_eq!(deque.get_at(pos), Some(&3));
///
/// deque.push_back(5);
/// assert_eq!(deque.get_at(pos), Some(&3));
///
/// deque.pop_back();
/// deque.pop_back();
/// deque.pop_back();
/// assert_eq!(deque.resolve(pos), None);
///
/// deque.push_back(6);
/// assert_eq!(deque.resolve(pos), None);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Position {
	slot: usize,
	generation: u64,
	front: Vacancy,
	back: Vacancy,
	past_end: bool,
}

/// Tracks refills of slots vacated by pops at one end of a deque. The count is odd while slots
/// vacated since the last push at that end are waiting to be refilled.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(super) struct Vacancy(u64);

impl Vacancy {
	pub(super) const fn new() -> Self {
		Self(0)
	}

	/// Marks a slot at this end as vacated.
	pub(super) fn vacate(&mut self) {
		self.0 |= 1;
	}

	/// Marks the end as pushed to, refilling any vacated slot.
	pub(super) fn refill(&mut self) {
		if self.0 & 1 == 1 {
			self.0 += 1;
		}
	}

	/// Returns `true` if no refill happened since `taken` was recorded.
	fn admits(self, taken: Self) -> bool {
		self.0 <= taken.0 | 1
	}
}

impl<T, A: ElementAlloc> Deque<T, A> {
	/// Returns a cursor at the first element, or at the past-the-end position if empty.
	pub fn cursor_front(&self) -> Cursor<'_, T, A> {
		Cursor::new(self, 0)
	}

	/// Returns a cursor at the past-the-end position.
	pub fn cursor_end(&self) -> Cursor<'_, T, A> {
		Cursor::new(self, self.len)
	}

	/// Returns a cursor at `index`.
	///
	/// # Panics
	///
	/// Panics if `index` is greater than the length.
	#[track_caller]
	pub fn cursor_at(&self, index: usize) -> Cursor<'_, T, A> {
		assert!(index <= self.len, "cursor index (is {index}) should be <= len (is {})", self.len);
		Cursor::new(self, index)
	}

	/// Returns an exclusive cursor at the first element.
	pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T, A> {
		CursorMut { deque: self, index: 0 }
	}

	/// Returns an exclusive cursor at the past-the-end position.
	pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T, A> {
		let index = self.len;
		CursorMut { deque: self, index }
	}

	/// Returns an exclusive cursor at `index`.
	///
	/// # Panics
	///
	/// Panics if `index` is greater than the length.
	#[track_caller]
	pub fn cursor_at_mut(&mut self, index: usize) -> CursorMut<'_, T, A> {
		assert!(index <= self.len, "cursor index (is {index}) should be <= len (is {})", self.len);
		CursorMut { deque: self, index }
	}

	/// Returns a detached [`Position`] for `index`, which may be the past-the-end position.
	///
	/// # Panics
	///
	/// Panics if `index` is greater than the length.
	#[track_caller]
	pub fn position(&self, index: usize) -> Position {
		assert!(index <= self.len, "position index (is {index}) should be <= len (is {})", self.len);
		Position {
			slot: self.head + index,
			generation: self.map.generation(),
			front: self.front_vacancy,
			back: self.back_vacancy,
			past_end: index == self.len,
		}
	}

	/// Returns the current logical index of `pos`, or `None` if it has been invalidated or its
	/// element popped. A past-the-end position resolves until an element is popped from or pushed
	/// to the back.
	///
	/// ```
	/// use blockdeque::Deque;
	///
	/// let mut deque = Deque::from([1, 2, 3]);
	/// let pos = deque.position(0);
	/// deque.pop_front();
	/// deque.push_front(4);
	/// assert_eq!(deque.get_at(pos), None);
	/// ```
	pub fn resolve(&self, pos: Position) -> Option<usize> {
		let end = self.head + self.len;
		let in_bounds = if pos.past_end {
			pos.slot == end
		} else {
			(self.head..end).contains(&pos.slot)
		};
		let valid = in_bounds &&
			pos.generation == self.map.generation() &&
			self.front_vacancy.admits(pos.front) &&
			self.back_vacancy.admits(pos.back);
		valid.then(|| pos.slot - self.head)
	}

	/// Returns the element at `pos`, or `None` if it is invalid or past-the-end.
	pub fn get_at(&self, pos: Position) -> Option<&T> {
		self.get(self.resolve(pos)?)
	}

	/// Returns a mutable reference to the element at `pos`, or `None` if it is invalid or
	/// past-the-end.
	pub fn get_at_mut(&mut self, pos: Position) -> Option<&mut T> {
		let index = self.resolve(pos)?;
		self.get_mut(index)
	}

	/// Returns a cursor at `pos`, or `None` if it is invalid.
	pub fn cursor_at_position(&self, pos: Position) -> Option<Cursor<'_, T, A>> {
		Some(Cursor::new(self, self.resolve(pos)?))
	}
}

#[cfg(test)]
mod test {
	use crate::Deque;

	#[test]
	fn cursor_arithmetic() {
		let deque: Deque<u32> = (0..1000).collect();
		let begin = deque.cursor_front();
		let mut it = begin + 700;
		assert_eq!(it.get(), Some(&700));
		it -= 650;
		assert_eq!(it.index(), 50);
		assert_eq!(it - begin, 50);
		assert_eq!(begin - it, -50);
		assert_eq!(it.peek(-50), Some(&0));
		assert_eq!(it.peek(-51), None);
		assert!((begin + 1000).is_end());
	}

	#[test]
	#[should_panic]
	fn cursor_before_front_panics() {
		let deque = Deque::from([1, 2, 3]);
		let _ = deque.cursor_front() - 1;
	}

	#[test]
	#[should_panic]
	fn cursor_past_end_panics() {
		let deque = Deque::from([1, 2, 3]);
		let _ = deque.cursor_end() + 1;
	}

	#[test]
	fn cursors_into_different_deques_are_unordered() {
		let a = Deque::from([1]);
		let b = Deque::from([1]);
		assert_ne!(a.cursor_front(), b.cursor_front());
		assert_eq!(a.cursor_front().partial_cmp(&b.cursor_front()), None);
	}

	#[test]
	fn reverse_cursor_walks_backward() {
		let deque: Deque<u8> = (0..10).collect();
		let rbegin = deque.cursor_end().reversed();
		let rend = deque.cursor_front().reversed();
		assert_eq!(rend - rbegin, 10);
		assert!(rbegin < rend);

		let mut it = rbegin;
		let mut seen = alloc::vec::Vec::new();
		while it != rend {
			seen.extend(it.get().copied());
			it += 1;
		}
		assert!(seen.into_iter().eq((0..10).rev()));
		assert_eq!(rend.get(), None);
	}

	#[test]
	fn cursor_mut_edits_in_place() {
		let mut deque: Deque<u32> = (0..5).collect();
		let mut cursor = deque.cursor_front_mut();
		cursor.seek(1);
		assert_eq!(cursor.remove(), Some(1));
		assert_eq!(cursor.get(), Some(&2));
		cursor.move_by(3);
		assert_eq!(cursor.get(), None);
		cursor.insert(9);
		assert_eq!(cursor.as_cursor().get(), Some(&9));
		let shared: crate::deque::Cursor<'_, u32> = cursor.into();
		assert_eq!(shared.index(), 4);
		assert_eq!(deque, [0, 2, 3, 4, 9]);
	}

	#[test]
	fn positions_survive_pops_of_other_elements() {
		let mut deque: Deque<u32> = (0..1000).collect();
		let first = deque.position(0);
		let middle = deque.position(500);
		let end = deque.position(1000);

		for _ in 0..400 {
			deque.pop_front();
		}
		assert_eq!(deque.resolve(first), None);
		assert_eq!(deque.resolve(middle), Some(100));
		assert_eq!(deque.get_at(middle), Some(&500));
		assert_eq!(deque.resolve(end), Some(600));
		assert_eq!(deque.get_at(end), None);

		deque.pop_back();
		assert_eq!(deque.resolve(end), None);
		assert_eq!(deque.cursor_at_position(middle).map(|c| c.index()), Some(100));
	}

	#[test]
	fn positions_are_invalidated_by_reshaping() {
		let mut deque: Deque<u32> = (0..10).collect();
		let pos = deque.position(5);
		deque.insert(2, 0);
		assert_eq!(deque.resolve(pos), None);

		let pos = deque.position(5);
		deque.clear();
		deque.extend(0..10);
		assert_eq!(deque.resolve(pos), None);
	}

	#[test]
	fn positions_are_invalidated_by_directory_growth() {
		let mut deque: Deque<u32> = (0..10).collect();
		let pos = deque.position(5);
		for i in 0..10_000 {
			deque.push_front(i);
		}
		assert_eq!(deque[10_005], 5);
		assert_eq!(deque.resolve(pos), None);
	}

	#[test]
	fn positions_are_invalidated_by_shrink_to_fit() {
		let mut deque: Deque<u32> = (0..1000).collect();
		for _ in 0..600 {
			deque.pop_front();
		}
		let pos = deque.position(300);
		assert_eq!(deque.get_at(pos), Some(&900));

		deque.shrink_to_fit();
		assert_eq!(deque[300], 900);
		assert_eq!(deque.resolve(pos), None);
	}

	#[test]
	fn positions_survive_pushes_to_the_other_end() {
		let mut deque: Deque<u32> = (0..10).collect();
		let pos = deque.position(3);
		deque.pop_front();
		for i in 10..200 {
			deque.push_back(i);
		}
		assert_eq!(deque.get_at(pos), Some(&3));

		deque.pop_back();
		deque.push_front(0);
		assert_eq!(deque.resolve(pos), None);
	}
}
