// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::hash::{Hash, Hasher};
use crate::alloc_strategy::ElementAlloc;
use super::Deque;

macro_rules! gen_eq {
	() => { };
	($lhs:ty, $rhs:ty;$($next:tt)*) => {
		gen_eq! { $lhs, $rhs [A: ElementAlloc];$($next)* }
	};
    ($lhs:ty, $rhs:ty [$($params:tt)+];$($next:tt)*) => {
		impl<T: PartialEq<U>, U, $($params)+> PartialEq<$rhs> for $lhs {
			fn eq(&self, other: &$rhs) -> bool {
				self.len() == other.len() &&
				self.iter().zip(other.iter()).all(|(a, b)| a == b)
			}
		}
		gen_eq! { $($next)* }
	};
}

gen_eq! {
	Deque<T, A1>, Deque<U, A2> [A1: ElementAlloc, A2: ElementAlloc];
	Deque<T, A>, &[U];
	Deque<T, A>, &mut [U];
	&[T], Deque<U, A>;
	&mut [T], Deque<U, A>;
	Deque<T, A>, [U];
	[T], Deque<U, A>;
	Deque<T, A>, Vec<U>;
	Vec<T>, Deque<U, A>;
	Deque<T, A>, [U; N]           [A: ElementAlloc, const N: usize];
	Deque<T, A>, &[U; N]          [A: ElementAlloc, const N: usize];
	Deque<T, A>, &mut [U; N]      [A: ElementAlloc, const N: usize];
	[T; N], Deque<U, A>           [A: ElementAlloc, const N: usize];
	&[T; N], Deque<U, A>          [A: ElementAlloc, const N: usize];
	&mut [T; N], Deque<U, A>      [A: ElementAlloc, const N: usize];
}

impl<T: Eq, A: ElementAlloc> Eq for Deque<T, A> { }

impl<T: PartialOrd, A: ElementAlloc> PartialOrd for Deque<T, A> {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		self.iter().partial_cmp(other.iter())
	}
}

impl<T: Ord, A: ElementAlloc> Ord for Deque<T, A> {
	fn cmp(&self, other: &Self) -> Ordering {
		self.iter().cmp(other.iter())
	}
}

impl<T: Hash, A: ElementAlloc> Hash for Deque<T, A> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		state.write_usize(self.len());
		for elem in self {
			elem.hash(state);
		}
	}
}
