// This file is part of Substrate.

// Copyright (C) Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: Apache-2.0

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The guest heap.
//!
//! Contracts get scratch memory from a bump allocator: every growth request reserves space at the
//! current high-water mark and nothing is ever freed. The whole heap disappears together with the
//! memory image once the host finishes the invocation, so a fresh invocation always starts with
//! an empty heap.
//!
//! Two allocators implement [`Allocator`]:
//!
//! - [`Sbrk`] asks the host to map more memory with the PolkaVM `sbrk` instruction. It only exists
//!   on PolkaVM targets.
//! - [`Arena`] simulates the same contract in software over a statically sized buffer.

mod arena;
pub mod builtins;
#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
mod sbrk;

pub use arena::Arena;
pub use builtins::{copy_within, fill};
#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
pub use sbrk::Sbrk;

use crate::limits::WORD_SIZE;
use core::ptr::NonNull;

/// A growth request that could not be satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfMemory {
	/// The offset the request was made at.
	pub offset: u32,
	/// The number of bytes that were requested.
	pub size: u32,
	/// The size of the heap.
	pub ceiling: u32,
}

impl core::fmt::Display for OutOfMemory {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(
			f,
			"out of memory: {} bytes at offset {} exceed the heap of {} bytes",
			self.size, self.offset, self.ceiling
		)
	}
}

/// A heap that can only grow.
pub trait Allocator {
	/// Reserve `size` fresh bytes at the high-water mark.
	///
	/// Returns the address of the first reserved byte. The returned range `[ptr, ptr + size)` was
	/// never handed out before.
	fn grow(&mut self, size: u32) -> Result<NonNull<u8>, OutOfMemory>;

	/// The number of bytes reserved so far.
	fn current_size(&self) -> u32;
}

impl<A: Allocator + ?Sized> Allocator for &mut A {
	fn grow(&mut self, size: u32) -> Result<NonNull<u8>, OutOfMemory> {
		(**self).grow(size)
	}

	fn current_size(&self) -> u32 {
		(**self).current_size()
	}
}

/// Round `value` up to the next multiple of [`WORD_SIZE`].
///
/// Returns `None` on overflow.
pub const fn align_up(value: u32) -> Option<u32> {
	match value.checked_add(WORD_SIZE - 1) {
		Some(value) => Some(value & !(WORD_SIZE - 1)),
		None => None,
	}
}
