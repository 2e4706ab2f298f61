// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use std::collections::VecDeque;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blockdeque::Deque;

const N: usize = 100_000;

fn bench_push(c: &mut Criterion) {
	let mut group = c.benchmark_group("push both ends (100k)");
	group.bench_function("VecDeque", |b| {
		b.iter(|| {
			let mut d = VecDeque::new();
			for i in 0..N {
				if i % 2 == 0 { d.push_back(black_box(i)) } else { d.push_front(black_box(i)) }
			}
			d
		})
	});
	group.bench_function("Deque", |b| {
		b.iter(|| {
			let mut d = Deque::new();
			for i in 0..N {
				if i % 2 == 0 { d.push_back(black_box(i)) } else { d.push_front(black_box(i)) }
			}
			d
		})
	});
	group.finish();
}

fn bench_index(c: &mut Criterion) {
	let mut group = c.benchmark_group("random index (100k)");
	let d_std: VecDeque<usize> = (0..N).collect();
	let d_block: Deque<usize> = (0..N).collect();
	group.bench_function("VecDeque", |b| {
		b.iter(|| {
			let mut i = 0;
			for _ in 0..1000 {
				i = (i * 7919 + 13) % N;
				black_box(d_std[black_box(i)]);
			}
		})
	});
	group.bench_function("Deque", |b| {
		b.iter(|| {
			let mut i = 0;
			for _ in 0..1000 {
				i = (i * 7919 + 13) % N;
				black_box(d_block[black_box(i)]);
			}
		})
	});
	group.finish();
}

fn bench_iter(c: &mut Criterion) {
	let mut group = c.benchmark_group("iterate (100k)");
	let d_std: VecDeque<u64> = (0..N as u64).collect();
	let d_block: Deque<u64> = (0..N as u64).collect();
	group.bench_function("VecDeque", |b| b.iter(|| black_box(d_std.iter().sum::<u64>())));
	group.bench_function("Deque", |b| b.iter(|| black_box(d_block.iter().sum::<u64>())));
	group.finish();
}

fn bench_queue(c: &mut Criterion) {
	let mut group = c.benchmark_group("FIFO churn (100k)");
	group.bench_function("VecDeque", |b| {
		b.iter(|| {
			let mut d = VecDeque::new();
			for i in 0..N {
				d.push_back(black_box(i));
				if i % 3 == 0 {
					black_box(d.pop_front());
				}
			}
			d
		})
	});
	group.bench_function("Deque", |b| {
		b.iter(|| {
			let mut d = Deque::new();
			for i in 0..N {
				d.push_back(black_box(i));
				if i % 3 == 0 {
					black_box(d.pop_front());
				}
			}
			d
		})
	});
	group.finish();
}

criterion_group!(benches, bench_push, bench_index, bench_iter, bench_queue);
criterion_main!(benches);
