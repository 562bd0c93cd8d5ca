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

//! Bump allocation over a statically sized buffer.

use super::{align_up, builtins, Allocator, OutOfMemory};
use crate::LOG_TARGET;
use core::ptr::NonNull;

/// A heap of `L` bytes owned by a single invocation.
///
/// The arena tracks a high-water mark that separates reserved from unreserved bytes. The mark
/// only ever moves up, is always a multiple of [`WORD_SIZE`](crate::limits::WORD_SIZE) and never
/// exceeds `L`.
///
/// Pointers handed out by the arena point into the arena itself and are invalidated when the
/// arena is moved or dropped.
pub struct Arena<const L: usize> {
	buffer: [u8; L],
	high_water: u32,
}

impl<const L: usize> Arena<L> {
	const CEILING: u32 = {
		assert!(L <= u32::MAX as usize, "the heap must be addressable with 32 bit offsets");
		L as u32
	};

	/// A fresh arena with nothing reserved.
	pub const fn new() -> Self {
		Self { buffer: [0; L], high_water: 0 }
	}

	/// The size of the arena in bytes.
	pub const fn ceiling(&self) -> u32 {
		Self::CEILING
	}

	/// Make sure the heap covers `[offset, offset + size)`.
	///
	/// The high-water mark is raised to `offset + size` rounded up to the next word. Requests that
	/// are already covered leave the mark untouched. A request is rejected, again without touching
	/// the mark, if `offset` lies outside of the arena, `size` is larger than the arena or the
	/// rounded end exceeds the arena.
	///
	/// Returns a pointer to `offset`, so the whole range `[offset, offset + size)` lies below the
	/// new mark. For bump use with `offset` at the mark this is the start of the freshly reserved
	/// range. Empty requests always succeed and point at most one past the end of the arena.
	pub fn grow_at(&mut self, offset: u32, size: u32) -> Result<NonNull<u8>, OutOfMemory> {
		if size == 0 {
			return self.pointer_at(offset.min(Self::CEILING), size)
		}

		let err = OutOfMemory { offset, size, ceiling: Self::CEILING };
		if offset >= Self::CEILING || size > Self::CEILING {
			log::debug!(
				target: LOG_TARGET,
				"heap request out of bounds: offset={offset} size={size}",
			);
			return Err(err)
		}

		let new_size = offset.checked_add(size).and_then(align_up).ok_or(err)?;
		if new_size > Self::CEILING {
			log::debug!(
				target: LOG_TARGET,
				"heap exhausted: offset={offset} size={size} new_size={new_size} ceiling={}",
				Self::CEILING,
			);
			return Err(err)
		}

		if new_size > self.high_water {
			log::trace!(target: LOG_TARGET, "heap grows from {} to {new_size}", self.high_water);
			self.high_water = new_size;
		}

		self.pointer_at(offset, size)
	}

	/// Return the arena to the state of a freshly mapped memory image.
	pub fn reset(&mut self) {
		builtins::fill(&mut self.buffer[..self.high_water as usize], 0);
		self.high_water = 0;
	}

	/// The base address of the arena.
	pub fn as_ptr(&self) -> *const u8 {
		self.buffer.as_ptr()
	}

	/// The bytes reserved so far.
	pub fn as_slice(&self) -> &[u8] {
		&self.buffer[..self.high_water as usize]
	}

	/// The offset of `ptr` into the arena, if it points into the arena.
	pub fn offset_of(&self, ptr: NonNull<u8>) -> Option<u32> {
		let offset = (ptr.as_ptr() as usize).checked_sub(self.as_ptr() as usize)?;
		(offset <= L).then_some(offset as u32)
	}

	/// A mutable view of `len` reserved bytes starting at `offset`.
	///
	/// Returns `None` if any part of the range was not reserved yet.
	pub fn region_mut(&mut self, offset: u32, len: u32) -> Option<&mut [u8]> {
		let end = offset.checked_add(len)?;
		if end > self.high_water {
			return None
		}
		self.buffer.get_mut(offset as usize..end as usize)
	}

	fn pointer_at(&mut self, offset: u32, size: u32) -> Result<NonNull<u8>, OutOfMemory> {
		NonNull::new(self.buffer.as_mut_ptr().wrapping_add(offset as usize))
			.ok_or(OutOfMemory { offset, size, ceiling: Self::CEILING })
	}
}

impl<const L: usize> Default for Arena<L> {
	fn default() -> Self {
		Self::new()
	}
}

impl<const L: usize> Allocator for Arena<L> {
	fn grow(&mut self, size: u32) -> Result<NonNull<u8>, OutOfMemory> {
		self.grow_at(self.high_water, size)
	}

	fn current_size(&self) -> u32 {
		self.high_water
	}
}

impl<const L: usize> core::fmt::Debug for Arena<L> {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Arena")
			.field("ceiling", &Self::CEILING)
			.field("high_water", &self.high_water)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	type SmallArena = Arena<1024>;

	fn offset(arena: &SmallArena, ptr: NonNull<u8>) -> u32 {
		arena.offset_of(ptr).expect("pointer into the arena")
	}

	#[test]
	fn grow_aligns_the_high_water_mark() {
		let mut arena = SmallArena::new();

		let ptr = arena.grow_at(0, 40).unwrap();
		assert_eq!(offset(&arena, ptr), 0);
		assert_eq!(arena.current_size(), 64);

		let err = arena.grow_at(64, 1000).unwrap_err();
		assert_eq!(err, OutOfMemory { offset: 64, size: 1000, ceiling: 1024 });
		assert_eq!(arena.current_size(), 64);
	}

	#[test]
	fn returned_pointer_is_the_old_mark() {
		let mut arena = SmallArena::new();

		let first = arena.grow(10).unwrap();
		let second = arena.grow(10).unwrap();
		assert_eq!(offset(&arena, first), 0);
		assert_eq!(offset(&arena, second), 32);
		assert_eq!(arena.current_size(), 64);
	}

	#[test]
	fn covered_requests_keep_the_mark() {
		let mut arena = SmallArena::new();
		arena.grow_at(0, 200).unwrap();
		assert_eq!(arena.current_size(), 224);

		let ptr = arena.grow_at(0, 10).unwrap();
		assert_eq!(offset(&arena, ptr), 0);
		let ptr = arena.grow_at(100, 100).unwrap();
		assert_eq!(offset(&arena, ptr), 100);
		assert_eq!(arena.current_size(), 224);
	}

	#[test]
	fn requests_below_the_mark_point_at_their_offset() {
		let mut arena = SmallArena::new();
		arena.grow_at(0, 64).unwrap();

		let ptr = arena.grow_at(32, 64).unwrap();
		assert_eq!(offset(&arena, ptr), 32);
		assert_eq!(arena.current_size(), 96);

		// The next bump allocation must not hand out `[32, 96)` again.
		let next = arena.grow(1).unwrap();
		assert_eq!(offset(&arena, next), 96);
		assert_eq!(arena.current_size(), 128);
	}

	#[test]
	fn rejects_out_of_bounds_requests() {
		let mut arena = SmallArena::new();
		assert!(arena.grow_at(1024, 1).is_err());
		assert!(arena.grow_at(0, 1025).is_err());
		assert!(arena.grow_at(1000, 30).is_err());
		assert!(arena.grow_at(u32::MAX, u32::MAX).is_err());
		assert_eq!(arena.current_size(), 0);
	}

	#[test]
	fn fills_up_to_the_ceiling() {
		let mut arena = SmallArena::new();
		arena.grow(1024).unwrap();
		assert_eq!(arena.current_size(), 1024);
		assert!(arena.grow(1).is_err());

		let ptr = arena.grow(0).unwrap();
		assert_eq!(offset(&arena, ptr), 1024);
	}

	#[test]
	fn empty_requests_do_not_move_the_mark() {
		let mut arena = SmallArena::new();
		arena.grow(0).unwrap();
		assert_eq!(arena.current_size(), 0);
	}

	#[test]
	fn reset_returns_to_a_fresh_image() {
		let mut arena = SmallArena::new();
		arena.grow(100).unwrap();
		arena.region_mut(0, 100).unwrap().fill(0xAA);

		arena.reset();
		assert_eq!(arena.current_size(), 0);
		assert!(arena.as_slice().is_empty());

		arena.grow(100).unwrap();
		assert!(arena.as_slice().iter().all(|b| *b == 0));
	}

	#[test]
	fn region_must_be_reserved() {
		let mut arena = SmallArena::new();
		assert!(arena.region_mut(0, 1).is_none());

		arena.grow(1).unwrap();
		assert_eq!(arena.region_mut(0, 32).map(|region| region.len()), Some(32));
		assert!(arena.region_mut(0, 33).is_none());
	}

	proptest! {
		#[test]
		fn bump_allocations_never_overlap(sizes in prop::collection::vec(0u32..300, 1..20)) {
			let mut arena = SmallArena::new();
			let mut reserved = 0u32;
			for size in sizes {
				match arena.grow(size) {
					Ok(ptr) => {
						let start = offset(&arena, ptr);
						prop_assert!(start >= reserved);
						prop_assert!(start + size <= arena.current_size());
						reserved = arena.current_size();
					},
					Err(_) => prop_assert_eq!(arena.current_size(), reserved),
				}
			}
		}

		#[test]
		fn returned_ranges_lie_below_the_mark(
			requests in prop::collection::vec((0u32..1100, 0u32..1100), 1..30),
		) {
			let mut arena = SmallArena::new();
			for (requested, size) in requests {
				if let Ok(ptr) = arena.grow_at(requested, size) {
					let start = offset(&arena, ptr);
					prop_assert!(start <= arena.ceiling());
					if size > 0 {
						prop_assert_eq!(start, requested);
						prop_assert!(start + size <= arena.current_size());
					}
				}
			}
		}

		#[test]
		fn high_water_mark_is_the_maximum_aligned_end(
			requests in prop::collection::vec((0u32..1100, 0u32..1100), 1..30),
		) {
			let mut arena = SmallArena::new();
			let mut expected = 0u32;
			for (offset, size) in requests {
				let before = arena.current_size();
				let aligned = align_up(offset + size).unwrap();
				match arena.grow_at(offset, size) {
					Ok(_) if size > 0 => expected = expected.max(aligned),
					Ok(_) => {},
					Err(_) => {
						prop_assert!(size > 0 && (offset >= 1024 || aligned > 1024));
						prop_assert_eq!(arena.current_size(), before);
					},
				}
				prop_assert_eq!(arena.current_size(), expected);
				prop_assert!(arena.current_size() <= arena.ceiling());
			}
		}
	}
}
