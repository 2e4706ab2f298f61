// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use core::alloc::Layout;
use core::fmt::{self, Debug, Display, Formatter};
use crate::raw::AllocError;

pub type Result<T = (), E = OutOfRange> = core::result::Result<T, E>;

/// The error returned by bounds-checked access when the index is not less than the length.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OutOfRange {
	index: usize,
	len: usize,
}

impl OutOfRange {
	pub(crate) const fn new(index: usize, len: usize) -> Self {
		Self { index, len }
	}

	/// Returns the rejected index.
	pub const fn index(&self) -> usize { self.index }

	/// Returns the length of the deque at the time of access.
	pub const fn len(&self) -> usize { self.len }
}

impl Display for OutOfRange {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "index {} is out of range for deque of length {}", self.index, self.len)
	}
}

#[cfg(feature = "std")]
impl std::error::Error for OutOfRange { }

/// The error returned when reserving memory for the deque fails.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TryReserveError {
	kind: TryReserveErrorKind,
}

/// The cause of a [`TryReserveError`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum TryReserveErrorKind {
	/// The required capacity exceeded the maximum addressable number of slots.
	CapacityOverflow,
	/// The allocator returned an error for a block or directory allocation.
	AllocError {
		layout: Layout,
	},
}

impl TryReserveError {
	pub fn kind(&self) -> TryReserveErrorKind {
		self.kind
	}
}

impl From<AllocError> for TryReserveError {
	fn from(value: AllocError) -> Self {
		let kind = match value {
			AllocError::CapacityOverflow => TryReserveErrorKind::CapacityOverflow,
			AllocError::Alloc { layout } => TryReserveErrorKind::AllocError { layout },
		};
		Self { kind }
	}
}

impl From<TryReserveErrorKind> for TryReserveError {
	fn from(kind: TryReserveErrorKind) -> Self {
		Self { kind }
	}
}

impl Display for TryReserveError {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str("memory allocation failed")?;
		match self.kind {
			TryReserveErrorKind::CapacityOverflow =>
				f.write_str(" because the computed capacity exceeded the deque's maximum"),
			TryReserveErrorKind::AllocError { .. } =>
				f.write_str(" because the memory allocator returned an error"),
		}
	}
}

#[cfg(feature = "std")]
impl std::error::Error for TryReserveError { }

/// The error returned by [`try_push_back`] and [`try_push_front`], handing back the value which
/// could not be pushed.
///
/// [`try_push_back`]: crate::Deque::try_push_back
/// [`try_push_front`]: crate::Deque::try_push_front
#[derive(Clone, Eq, PartialEq)]
pub struct PushError<T> {
	value: T,
	error: TryReserveError,
}

impl<T> PushError<T> {
	pub(crate) fn new<E: Into<TryReserveError>>(value: T, error: E) -> Self {
		Self { value, error: error.into() }
	}

	/// Returns the value that was not pushed.
	pub fn into_inner(self) -> T {
		self.value
	}

	/// Returns the underlying reservation error.
	pub fn error(&self) -> &TryReserveError {
		&self.error
	}
}

// Hide the contained value
impl<T> Debug for PushError<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("PushError")
		 .field(&self.error)
		 .finish()
	}
}

impl<T> Display for PushError<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.error, f)
	}
}

#[cfg(feature = "std")]
impl<T> std::error::Error for PushError<T> {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		Some(&self.error)
	}
}
