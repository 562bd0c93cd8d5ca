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

//! Byte fill and copy primitives.
//!
//! The freestanding guest has no libc, yet the compiler lowers struct copies and zeroing to
//! `memset`, `memcpy` and `memmove` calls. With the `builtins` feature these functions are
//! exported under their C names on PolkaVM targets.
//!
//! The loops write through `write_volatile` so they are not themselves lowered back into calls to
//! the very functions they implement.

use core::ops::Range;

/// Fill `n` bytes starting at `dst` with the low byte of `value`.
///
/// # Safety
///
/// `dst` must be valid for `n` bytes of writes.
#[cfg_attr(
	all(feature = "builtins", any(target_arch = "riscv32", target_arch = "riscv64")),
	no_mangle
)]
pub unsafe extern "C" fn memset(dst: *mut u8, value: i32, n: usize) -> *mut u8 {
	let byte = value as u8;
	for i in 0..n {
		dst.add(i).write_volatile(byte);
	}
	dst
}

/// Copy `n` bytes from `src` to `dst` front to back.
///
/// # Safety
///
/// Both ranges must be valid for `n` bytes and must not overlap.
#[cfg_attr(
	all(feature = "builtins", any(target_arch = "riscv32", target_arch = "riscv64")),
	no_mangle
)]
pub unsafe extern "C" fn memcpy(dst: *mut u8, src: *const u8, n: usize) -> *mut u8 {
	for i in 0..n {
		dst.add(i).write_volatile(src.add(i).read());
	}
	dst
}

/// Copy `n` bytes from `src` to `dst` where the ranges may overlap.
///
/// Ranges at least `n` bytes apart are copied front to back. Overlapping ranges are copied front
/// to back when `dst` lies below `src` and back to front otherwise, so every source byte is read
/// before it is overwritten.
///
/// # Safety
///
/// Both ranges must be valid for `n` bytes.
#[cfg_attr(
	all(feature = "builtins", any(target_arch = "riscv32", target_arch = "riscv64")),
	no_mangle
)]
pub unsafe extern "C" fn memmove(dst: *mut u8, src: *const u8, n: usize) -> *mut u8 {
	if dst as *const u8 == src {
		return dst
	}

	// `src - dst - n <= -2n` in wrapping arithmetic holds exactly when `|src - dst| >= n`.
	let distance = (src as usize).wrapping_sub(dst as usize).wrapping_sub(n);
	if distance <= n.wrapping_mul(2).wrapping_neg() {
		return memcpy(dst, src, n)
	}

	if (dst as usize) < (src as usize) {
		for i in 0..n {
			dst.add(i).write_volatile(src.add(i).read());
		}
	} else {
		let mut i = n;
		while i > 0 {
			i -= 1;
			dst.add(i).write_volatile(src.add(i).read());
		}
	}
	dst
}

/// Set every byte of `dst` to `value`.
pub fn fill(dst: &mut [u8], value: u8) {
	unsafe {
		memset(dst.as_mut_ptr(), value as i32, dst.len());
	}
}

/// Copy `src` to `dst` within the same buffer. The ranges may overlap.
///
/// # Panics
///
/// Panics if either range is out of bounds.
pub fn copy_within(buffer: &mut [u8], src: Range<usize>, dst: usize) {
	let Range { start, end } = src;
	assert!(start <= end, "source range starts at {start} but ends at {end}");
	assert!(end <= buffer.len(), "source range end {end} out of range for {}", buffer.len());
	let n = end - start;
	assert!(dst <= buffer.len() - n, "destination out of range for {}", buffer.len());

	let base = buffer.as_mut_ptr();
	unsafe {
		memmove(base.add(dst), base.add(start), n);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use proptest::prelude::*;

	#[test]
	fn fill_sets_every_byte() {
		let mut buffer = [1u8; 17];
		fill(&mut buffer[3..], 0xAB);
		assert_eq!(&buffer[..3], &[1, 1, 1]);
		assert!(buffer[3..].iter().all(|b| *b == 0xAB));
	}

	#[test]
	fn fill_of_nothing_is_a_noop() {
		let mut buffer = [7u8; 4];
		fill(&mut buffer[2..2], 0);
		assert_eq!(buffer, [7u8; 4]);
	}

	#[test]
	fn memset_truncates_the_value() {
		let mut buffer = [0u8; 3];
		unsafe { memset(buffer.as_mut_ptr(), 0x1FF, buffer.len()) };
		assert_eq!(buffer, [0xFF; 3]);
	}

	#[test]
	fn overlapping_copy_towards_the_front() {
		let mut buffer = *b"HelloWorld";
		copy_within(&mut buffer, 5..10, 2);
		assert_eq!(&buffer, b"HeWorldrld");
	}

	#[test]
	fn overlapping_copy_towards_the_back() {
		let mut buffer = *b"HelloWorld";
		copy_within(&mut buffer, 0..5, 3);
		assert_eq!(&buffer, b"HelHellold");
	}

	#[test]
	fn disjoint_copy() {
		let mut buffer = *b"abc___";
		copy_within(&mut buffer, 0..3, 3);
		assert_eq!(&buffer, b"abcabc");
	}

	#[test]
	#[should_panic]
	fn copy_out_of_bounds_panics() {
		let mut buffer = [0u8; 4];
		copy_within(&mut buffer, 2..4, 3);
	}

	proptest! {
		#[test]
		fn fill_matches_slice_fill(len in 0usize..200, value: u8) {
			let mut buffer = vec![0x5Au8; len];
			fill(&mut buffer, value);
			prop_assert!(buffer.iter().all(|b| *b == value));
		}

		#[test]
		fn move_round_trips_through_scratch(
			original in prop::collection::vec(any::<u8>(), 1..64),
			shift in 0usize..64,
			backwards: bool,
		) {
			let n = original.len();
			// Overlap by anything between `0` and `n - 1` bytes.
			let shift = 1 + shift % n;
			let (src, dst) = if backwards { (shift, 0) } else { (0, shift) };

			let mut buffer = vec![0u8; n + shift];
			buffer[src..src + n].copy_from_slice(&original);
			let mut expected = buffer.clone();
			expected.copy_within(src..src + n, dst);

			copy_within(&mut buffer, src..src + n, dst);
			prop_assert_eq!(&buffer, &expected);
			prop_assert_eq!(&buffer[dst..dst + n], &original[..]);

			let mut scratch = vec![0u8; n];
			unsafe { memcpy(scratch.as_mut_ptr(), buffer[dst..].as_ptr(), n) };
			prop_assert_eq!(&scratch, &original);

			copy_within(&mut buffer, dst..dst + n, src);
			prop_assert_eq!(&buffer[src..src + n], &original[..]);
		}
	}
}
