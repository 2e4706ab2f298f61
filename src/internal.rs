// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

/// Target size of one block, in bytes.
const BLOCK_BYTES: usize = 512;
/// The fewest slots a block holds, for large element types.
const MIN_BLOCK_SLOTS: usize = 16;
/// Slots per block for zero-sized types, which never allocate.
const ZST_BLOCK_SLOTS: usize = 64;

pub trait TypeSize: Sized {
	const IS_ZST: bool = size_of::<Self>() == 0;

	/// The number of element slots in one block.
	const BLOCK_CAPACITY: usize = block_capacity(size_of::<Self>());
}

impl<T> TypeSize for T { }

const fn block_capacity(size: usize) -> usize {
	if size == 0 {
		ZST_BLOCK_SLOTS
	} else if size < BLOCK_BYTES / MIN_BLOCK_SLOTS {
		BLOCK_BYTES / size
	} else {
		MIN_BLOCK_SLOTS
	}
}

#[cfg(test)]
mod test {
	use super::TypeSize;

	#[test]
	fn block_capacity_by_size() {
		assert_eq!(<()>::BLOCK_CAPACITY, 64);
		assert_eq!(u8::BLOCK_CAPACITY, 512);
		assert_eq!(u32::BLOCK_CAPACITY, 128);
		assert_eq!(<[u8; 24]>::BLOCK_CAPACITY, 21);
		assert_eq!(<[u64; 16]>::BLOCK_CAPACITY, 16);
		assert_eq!(<[u8; 4096]>::BLOCK_CAPACITY, 16);
	}
}
