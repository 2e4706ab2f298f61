// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use alloc::alloc::handle_alloc_error;
use core::alloc::{Layout, LayoutError};

pub use block::RawBlock;
pub use map::RawMap;

pub mod block;
pub mod map;

pub fn check_size(size: usize) -> Result<(), AllocError> {
	if usize::BITS < 64 && size > isize::MAX as usize {
		Err(AllocError::CapacityOverflow)
	} else {
		Ok(())
	}
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AllocError {
	CapacityOverflow,
	Alloc {
		layout: Layout
	}
}

impl AllocError {
	#[allow(clippy::panic)]
	#[cold]
	#[inline(never)]
	#[track_caller]
	pub fn handle(self) -> ! {
		match self {
			Self::CapacityOverflow => panic!("capacity overflow"),
			Self::Alloc { layout } => handle_alloc_error(layout)
		}
	}
}

impl From<LayoutError> for AllocError {
	fn from(_: LayoutError) -> Self {
		Self::CapacityOverflow
	}
}
