// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use rand::rngs::StdRng;
use rand::SeedableRng;
use blockdeque::Deque;

fn sorted_prefix_len(values: &[i32]) -> usize {
	values.windows(2)
		  .position(|w| w[1] < w[0])
		  .map_or(values.len(), |i| i + 1)
}

#[test]
fn shuffle_sort_reverse() {
	let mut deque: Deque<i32> = Deque::with_len(1000);
	let mut next = 13;
	deque.view_mut(..).fill_with(|| { next += 1; next - 1 });
	assert_eq!(deque[0], 13);
	assert_eq!(deque[999], 1012);

	deque.view_mut(..).shuffle(&mut StdRng::seed_from_u64(31415));
	let mut mirror: Vec<i32> = deque.iter().copied().collect();
	assert_ne!(mirror, (13..1013).collect::<Vec<_>>());

	// The last 500 sorted in descending order, as a sort through reverse cursors would leave them.
	deque.view_mut(500..).sort_unstable_by(|a, b| b.cmp(a));
	deque.view_mut(..).reverse();
	mirror[500..].sort_unstable_by(|a, b| b.cmp(a));
	mirror.reverse();

	assert_eq!(deque, mirror);
	let prefix = deque.view_mut(..).sorted_prefix_len();
	assert_eq!(prefix, sorted_prefix_len(&mirror));
	assert!(prefix >= 500);
}

#[test]
fn sort_whole_deque_built_from_both_ends() {
	let mut deque = Deque::new();
	for i in 0..3000 {
		if i % 2 == 0 {
			deque.push_front((i * 37) % 1009);
		} else {
			deque.push_back((i * 53) % 1013);
		}
	}
	let mut expected: Vec<i32> = deque.iter().copied().collect();
	expected.sort_unstable();

	deque.view_mut(..).sort_unstable();
	assert_eq!(deque, expected);
	assert!(deque.view_mut(..).is_sorted());
}

#[test]
fn cursor_walk_matches_iteration() {
	let deque: Deque<i32> = (0..2500).collect();
	let mut cursor = deque.cursor_front();
	let end = deque.cursor_end();
	let mut sum = 0i64;
	while cursor != end {
		sum += i64::from(*cursor.get().unwrap_or(&0));
		cursor += 1;
	}
	assert_eq!(sum, deque.iter().map(|&x| i64::from(x)).sum());

	let rbegin = end.reversed();
	let rend = deque.cursor_front().reversed();
	assert_eq!(rend - rbegin, 2500);
	assert_eq!((rbegin + 10).get(), Some(&2489));
	assert_eq!((rbegin + 10).base() - deque.cursor_front(), 2490);
}

#[test]
fn empty_cursors() {
	let empty: Deque<u8> = Deque::new();
	assert_eq!(empty.cursor_end() - empty.cursor_front(), 0);
	assert_eq!(empty.cursor_front() + 0, empty.cursor_end());
	assert_eq!(empty.cursor_end() - 0, empty.cursor_front());

	let rbegin = empty.cursor_end().reversed();
	let rend = empty.cursor_front().reversed();
	assert_eq!(rend - rbegin, 0);
	assert_eq!(rbegin + 0, rend);
}
