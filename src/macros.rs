// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

/// Creates a [`Deque`](crate::Deque) containing the arguments, like [`vec!`].
///
/// ```
/// use blockdeque::deque;
///
/// let empty: blockdeque::Deque<u8> = deque![];
/// assert!(empty.is_empty());
///
/// let listed = deque![1, 2, 3];
/// assert_eq!(listed, [1, 2, 3]);
///
/// let repeated = deque!["x"; 4];
/// assert_eq!(repeated, ["x"; 4]);
/// ```
#[macro_export]
macro_rules! deque {
	() => {
		$crate::Deque::new()
	};
	($elem:expr; $n:expr) => {
		$crate::Deque::from_elem($n, $elem)
	};
	($($x:expr),+ $(,)?) => {
		$crate::Deque::from([$($x),+])
	};
}
