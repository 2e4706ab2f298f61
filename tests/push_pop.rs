// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use blockdeque::{deque, Deque};

#[test]
fn many_pushes_and_pops() {
	let mut deque = Deque::new();
	for i in 0..1000 {
		for j in 0..1000 {
			if j % 3 == 2 {
				deque.pop_back();
			} else {
				deque.push_front(i * j);
			}
		}
	}
	assert_eq!(deque.len(), 334_000);

	for _ in 0..100_000 {
		deque.pop_front();
	}
	for _ in 0..233_990 {
		deque.pop_back();
	}

	assert_eq!(deque, [62050, 61200, 59500, 58650, 56950, 56100, 54400, 53550, 51850, 51000]);
}

#[test]
fn references_survive_pushes() {
	let mut deque: Deque<u64> = deque![1, 2, 3];
	let addresses: Vec<*const u64> = deque.iter().map(|x| x as *const u64).collect();

	for i in 0..50_000 {
		deque.push_back(i);
		deque.push_front(i);
	}

	for (i, &address) in addresses.iter().enumerate() {
		let elem = &deque[50_000 + i];
		assert_eq!(elem as *const u64, address);
		// Safety: the element at this address was never popped.
		assert_eq!(unsafe { *address }, i as u64 + 1);
	}
}

#[test]
fn front_and_back_track_pushes() {
	let mut deque = Deque::new();
	assert_eq!(deque.front(), None);
	assert_eq!(deque.back(), None);

	deque.push_back("b");
	deque.push_front("a");
	deque.push_back("c");
	assert_eq!(deque.front(), Some(&"a"));
	assert_eq!(deque.back(), Some(&"c"));

	if let Some(back) = deque.back_mut() {
		*back = "z";
	}
	assert_eq!(deque.pop_back(), Some("z"));
	assert_eq!(deque.pop_front(), Some("a"));
	assert_eq!(deque.pop_front(), Some("b"));
	assert_eq!(deque.pop_front(), None);
	assert!(deque.is_empty());
}

#[test]
fn bounds_are_checked() {
	let empty: Deque<i32> = Deque::new();
	let full: Deque<i32> = (0..1000).collect();

	for deque in [&empty, &full] {
		let len = deque.len();
		assert!(deque.at(len).is_err());
		assert!(deque.at(len + 100).is_err());
		assert!(deque.at(usize::MAX).is_err());
		assert_eq!(deque.get(len), None);
	}
	assert_eq!(full.at(999), Ok(&999));
}

#[test]
#[should_panic]
fn indexing_past_end_panics() {
	let deque: Deque<i32> = (0..10).collect();
	let _ = deque[10];
}

#[test]
fn pops_release_blocks() {
	let mut deque: Deque<[u8; 64]> = Deque::new();
	for _ in 0..10_000 {
		deque.push_back([0; 64]);
	}
	let grown = deque.block_count();
	while deque.len() > 1 {
		deque.pop_back();
	}
	assert!(deque.block_count() < grown);
	assert!(deque.block_count() <= 2);
	assert!(deque.capacity() <= 2 * Deque::<[u8; 64]>::block_capacity());
}

#[test]
fn positions_follow_pops() {
	let mut deque: Deque<usize> = (0..300).collect();
	let positions: Vec<_> = (0..=deque.len()).map(|i| deque.position(i)).collect();

	let (mut start, mut end) = (0, deque.len());
	while start < end {
		if start % 2 == 0 {
			deque.pop_front();
			start += 1;
		} else {
			deque.pop_back();
			end -= 1;
		}

		for (i, &pos) in positions.iter().enumerate() {
			if (start..end).contains(&i) {
				assert_eq!(deque.resolve(pos), Some(i - start));
				assert_eq!(deque.get_at(pos), Some(&i));
			} else {
				assert_eq!(deque.get_at(pos), None);
			}
		}
	}
}

#[test]
fn positions_do_not_follow_refilled_slots() {
	let mut deque: Deque<i32> = (0..10).collect();
	let first = deque.position(0);
	deque.pop_front();
	deque.push_front(999);
	assert_eq!(deque.get_at(first), None);
	assert_eq!(deque[0], 999);

	let mut deque: Deque<i32> = (0..10).collect();
	let ninth = deque.position(8);
	let kept = deque.position(2);
	deque.truncate(5);
	deque.extend([50, 60, 70, 80, 90]);
	assert_eq!(deque.get_at(ninth), None);
	assert_eq!(deque.get_at(kept), None);
	assert_eq!(deque[8], 80);

	let fresh = deque.position(8);
	deque.push_back(100);
	assert_eq!(deque.get_at(fresh), Some(&80));
}
