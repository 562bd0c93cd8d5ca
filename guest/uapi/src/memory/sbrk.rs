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

//! Heap growth through the PolkaVM `sbrk` instruction.

use super::{Allocator, OutOfMemory};
use crate::LOG_TARGET;
use core::ptr::NonNull;

/// Grows the heap by asking the host to map more memory.
///
/// The host enforces its own memory limit and may trap the whole invocation instead of answering.
/// Addresses are only valid for the current invocation.
#[derive(Debug, Default)]
pub struct Sbrk {
	granted: u32,
}

impl Sbrk {
	/// An allocator that has not asked the host for anything yet.
	pub const fn new() -> Self {
		Self { granted: 0 }
	}
}

/// Issue the `sbrk` instruction: extend the heap by `size` bytes and return the old heap end.
///
/// The host answers with `0` when it declines to map more memory.
#[inline(always)]
fn sbrk(size: u32) -> usize {
	let address: usize;
	unsafe {
		core::arch::asm!(
			".insn r 0xb, 1, 0, {dst}, {size}, zero",
			dst = out(reg) address,
			size = in(reg) size as usize,
			options(nostack, preserves_flags),
		);
	}
	address
}

impl Allocator for Sbrk {
	fn grow(&mut self, size: u32) -> Result<NonNull<u8>, OutOfMemory> {
		let err = OutOfMemory { offset: self.granted, size, ceiling: self.granted };
		let granted = self.granted.checked_add(size).ok_or(err)?;
		let Some(ptr) = NonNull::new(sbrk(size) as *mut u8) else {
			log::debug!(target: LOG_TARGET, "sbrk declined: size={size} granted={}", self.granted);
			return Err(err)
		};
		self.granted = granted;
		Ok(ptr)
	}

	fn current_size(&self) -> u32 {
		self.granted
	}
}
