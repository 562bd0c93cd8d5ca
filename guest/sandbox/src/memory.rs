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

//! Guest memory as seen by the simulated host.
//!
//! The guest runs natively inside the host process, so its memory is mapped into the host and a
//! guest pointer is a plain host address. There is no way to bounds check such an address; the
//! host only rejects null and the [`SENTINEL`].

use crate::SandboxError;
use revive_guest_uapi::SENTINEL;

/// Read and write access to guest memory.
pub trait Memory {
	/// Read designated chunk from the guest memory into the supplied buffer.
	fn read_into_buf(&self, ptr: usize, buf: &mut [u8]) -> Result<(), SandboxError>;

	/// Write the given buffer to the designated location in the guest memory.
	fn write(&mut self, ptr: usize, buf: &[u8]) -> Result<(), SandboxError>;

	/// Read designated chunk from the guest memory.
	fn read(&self, ptr: usize, len: u32) -> Result<Vec<u8>, SandboxError> {
		let mut buf = vec![0u8; len as usize];
		self.read_into_buf(ptr, buf.as_mut_slice())?;
		Ok(buf)
	}

	/// Same as `read` but reads into a fixed size buffer.
	fn read_array<const N: usize>(&self, ptr: usize) -> Result<[u8; N], SandboxError> {
		let mut buf = [0u8; N];
		self.read_into_buf(ptr, &mut buf)?;
		Ok(buf)
	}

	/// Read a `u32` from the guest memory.
	fn read_u32(&self, ptr: usize) -> Result<u32, SandboxError> {
		let buf: [u8; 4] = self.read_array(ptr)?;
		Ok(u32::from_le_bytes(buf))
	}

	/// Read a `U256` balance. Values beyond `u128::MAX` saturate.
	fn read_balance(&self, ptr: usize) -> Result<u128, SandboxError> {
		let buf: [u8; 32] = self.read_array(ptr)?;
		if buf[16..].iter().any(|b| *b != 0) {
			return Ok(u128::MAX)
		}
		let mut low = [0u8; 16];
		low.copy_from_slice(&buf[..16]);
		Ok(u128::from_le_bytes(low))
	}

	/// Write `buf` to `out_ptr`, truncated to the capacity found at `out_len_ptr`, and write the
	/// number of bytes copied back to `out_len_ptr`.
	///
	/// With `allow_skip` an `out_ptr` of [`SENTINEL`] skips the copy.
	fn write_sandbox_output(
		&mut self,
		out_ptr: usize,
		out_len_ptr: usize,
		buf: &[u8],
		allow_skip: bool,
	) -> Result<(), SandboxError> {
		if allow_skip && out_ptr == SENTINEL as usize {
			return Ok(())
		}

		let len = self.read_u32(out_len_ptr)?;
		let buf_len = len.min(buf.len() as u32);
		self.write(out_ptr, &buf[..buf_len as usize])?;
		self.write(out_len_ptr, &buf_len.to_le_bytes())
	}

	/// Same as `write_sandbox_output` but for static size output.
	fn write_fixed_sandbox_output(
		&mut self,
		out_ptr: usize,
		buf: &[u8],
		allow_skip: bool,
	) -> Result<(), SandboxError> {
		if buf.is_empty() || (allow_skip && out_ptr == SENTINEL as usize) {
			return Ok(())
		}
		self.write(out_ptr, buf)
	}

	/// Write `buf` to `out_ptr` truncated to `capacity` and return the number of bytes copied.
	///
	/// With `allow_skip` an `out_ptr` of [`SENTINEL`] skips the copy.
	fn write_capped_output(
		&mut self,
		out_ptr: usize,
		capacity: u32,
		buf: &[u8],
		allow_skip: bool,
	) -> Result<u32, SandboxError> {
		if allow_skip && out_ptr == SENTINEL as usize {
			return Ok(0)
		}
		let buf_len = capacity.min(buf.len() as u32);
		self.write(out_ptr, &buf[..buf_len as usize])?;
		Ok(buf_len)
	}
}

/// Guest memory that is directly mapped into the host.
#[derive(Debug)]
pub struct Mapped(());

impl Mapped {
	/// Access the memory of a guest running in this process.
	///
	/// # Safety
	///
	/// Every address later handed to the accessors must be valid for the access, which is what
	/// the raw import tables demand of their callers.
	pub unsafe fn new() -> Self {
		Self(())
	}

	/// Read a `T` the guest placed at `ptr`, such as the arguments of `call`.
	pub fn read_struct<T: Copy>(&self, ptr: usize) -> Result<T, SandboxError> {
		Self::check(ptr, core::mem::size_of::<T>())?;
		Ok(unsafe { core::ptr::read_unaligned(ptr as *const T) })
	}

	fn check(ptr: usize, len: usize) -> Result<(), SandboxError> {
		if ptr == 0 || ptr == SENTINEL as usize || ptr.checked_add(len).is_none() {
			return Err(SandboxError::OutOfBounds(ptr))
		}
		Ok(())
	}
}

impl Memory for Mapped {
	fn read_into_buf(&self, ptr: usize, buf: &mut [u8]) -> Result<(), SandboxError> {
		if buf.is_empty() {
			return Ok(())
		}
		Self::check(ptr, buf.len())?;
		unsafe { core::ptr::copy(ptr as *const u8, buf.as_mut_ptr(), buf.len()) };
		Ok(())
	}

	fn write(&mut self, ptr: usize, buf: &[u8]) -> Result<(), SandboxError> {
		if buf.is_empty() {
			return Ok(())
		}
		Self::check(ptr, buf.len())?;
		unsafe { core::ptr::copy(buf.as_ptr(), ptr as *mut u8, buf.len()) };
		Ok(())
	}
}
