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

//! Guest side runtime shim for contracts running on PolkaVM.
//!
//! A contract blob exports `call` and `deploy` and talks to `pallet-revive` exclusively
//! through a fixed table of imported host functions. This crate provides:
//!
//! - [`memory`]: the bump allocator handing out scratch space from the guest heap, either through
//!   the PolkaVM `sbrk` instruction or from a statically sized [`memory::Arena`].
//! - [`abi`]: the raw import tables of the two ABI revisions ([`abi::seal`] with 32-bit words and
//!   [`abi::v1`] with 64-bit words) together with a static descriptor of every host function.
//! - [`HostFn`]: a typed interface with one method per host function. The marshalling of pointers,
//!   lengths and status codes happens once per revision in [`host::seal::Api`] and
//!   [`host::v1::Api`].
//! - [`entry`]: the `deploy`/`call` dispatch and the [`entry_points!`] macro.
#![cfg_attr(not(test), no_std)]

pub mod abi;
pub mod entry;
mod flags;
pub mod host;
pub mod limits;
pub mod memory;

pub use entry::{EntryPoint, Invocation, State};
pub use flags::*;
pub use host::HostFn;
pub use memory::{Allocator, Arena, OutOfMemory};

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
pub use memory::Sbrk;

#[doc(hidden)]
#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
pub use polkavm_derive;

/// The host function implementation for the current target.
///
/// 32-bit targets speak the [`abi::seal`] revision, 64-bit targets the [`abi::v1`] revision.
#[cfg(target_arch = "riscv32")]
pub type HostFnImpl = host::seal::Api<host::PolkaVm>;

/// The host function implementation for the current target.
///
/// 32-bit targets speak the [`abi::seal`] revision, 64-bit targets the [`abi::v1`] revision.
#[cfg(target_arch = "riscv64")]
pub type HostFnImpl = host::v1::Api<host::PolkaVm>;

/// The target that is used for the log output emitted by this crate.
pub const LOG_TARGET: &str = "runtime::revive::guest";

/// Used as a sentinel value when passing optional pointers and lengths over the ABI.
///
/// A contract can never own a buffer this large, so the value is free to signal `None`.
pub const SENTINEL: u32 = u32::MAX;

macro_rules! define_error_codes {
	(
		$(
			$( #[$attr:meta] )*
			$name:ident = $discr:literal,
		)*
	) => {
		/// Every error that can be returned to a contract when it calls any of the host functions.
		#[derive(Debug, Clone, Copy, PartialEq, Eq)]
		#[repr(u32)]
		pub enum ReturnErrorCode {
			/// API call successful.
			Success = 0,
			$(
				$( #[$attr] )*
				$name = $discr,
			)*
			/// Returns if an unknown error was received from the host module.
			Unknown,
		}

		impl From<ReturnCode> for Result {
			fn from(return_code: ReturnCode) -> Self {
				match return_code.0 {
					0 => Ok(()),
					$(
						$discr => Err(ReturnErrorCode::$name),
					)*
					_ => Err(ReturnErrorCode::Unknown),
				}
			}
		}
	};
}

define_error_codes! {
	/// The called function trapped and has its state changes reverted.
	/// In this case no output buffer is returned.
	CalleeTrapped = 1,
	/// The called function ran to completion but decided to revert its state.
	/// An output buffer is returned when one was supplied.
	CalleeReverted = 2,
	/// The passed key does not exist in storage.
	KeyNotFound = 3,
	/// Transfer failed for other not further specified reason. Most probably
	/// reserved or locked balance of the sender that was preventing the transfer.
	TransferFailed = 4,
	/// No code could be found at the supplied code hash.
	CodeNotFound = 5,
	/// The account that was called is no contract.
	NotCallable = 6,
	/// The call to `debug_message` had no effect because debug message
	/// recording was disabled.
	LoggingDisabled = 7,
	/// The host ran out of a resource that was reserved for the callee.
	OutOfResources = 8,
}

impl From<ReturnErrorCode> for u32 {
	fn from(code: ReturnErrorCode) -> u32 {
		code as u32
	}
}

impl core::fmt::Display for ReturnErrorCode {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let msg = match self {
			Self::Success => "success",
			Self::CalleeTrapped => "callee trapped",
			Self::CalleeReverted => "callee reverted",
			Self::KeyNotFound => "key not found",
			Self::TransferFailed => "transfer failed",
			Self::CodeNotFound => "code not found",
			Self::NotCallable => "account is not callable",
			Self::LoggingDisabled => "debug message recording disabled",
			Self::OutOfResources => "out of resources",
			Self::Unknown => "unknown error",
		};
		f.write_str(msg)
	}
}

/// The raw status word a host function hands back to the guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnCode(u32);

impl ReturnCode {
	/// Wrap a raw status word.
	pub const fn new(code: u32) -> Self {
		Self(code)
	}

	/// Returns the raw underlying `u32` representation.
	pub fn into_u32(self) -> u32 {
		self.0
	}

	/// Returns the underlying `u32` converted into `bool`.
	pub fn into_bool(self) -> bool {
		self.0.ne(&0)
	}
}

impl From<ReturnCode> for Option<u32> {
	fn from(code: ReturnCode) -> Self {
		(code.0 < SENTINEL).then_some(code.0)
	}
}

/// The result type of host functions that can fail.
pub type Result = core::result::Result<(), ReturnErrorCode>;

/// Errors surfaced by the guest shim to contract code.
///
/// Host traps are not part of this type: once the host decides to trap, no further guest code
/// runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
	/// The allocator could not satisfy a growth request.
	OutOfMemory(OutOfMemory),
	/// A host function refused the operation.
	HostRejected(ReturnErrorCode),
}

impl From<OutOfMemory> for Error {
	fn from(err: OutOfMemory) -> Self {
		Self::OutOfMemory(err)
	}
}

impl From<ReturnErrorCode> for Error {
	fn from(code: ReturnErrorCode) -> Self {
		Self::HostRejected(code)
	}
}

impl core::fmt::Display for Error {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			Self::OutOfMemory(err) => write!(f, "{err}"),
			Self::HostRejected(code) => write!(f, "host rejected the call: {code}"),
		}
	}
}

/// Converts a `u64` into the little endian 32 byte representation of a `U256`.
pub fn u256_bytes(value: u64) -> [u8; 32] {
	let mut buffer = [0u8; 32];
	buffer[..8].copy_from_slice(&value.to_le_bytes());
	buffer
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn return_code_decodes_into_result() {
		assert_eq!(Result::from(ReturnCode::new(0)), Ok(()));
		assert_eq!(Result::from(ReturnCode::new(2)), Err(ReturnErrorCode::CalleeReverted));
		assert_eq!(Result::from(ReturnCode::new(3)), Err(ReturnErrorCode::KeyNotFound));
		assert_eq!(Result::from(ReturnCode::new(8)), Err(ReturnErrorCode::OutOfResources));
		assert_eq!(Result::from(ReturnCode::new(1234)), Err(ReturnErrorCode::Unknown));
	}

	#[test]
	fn error_codes_round_trip_through_the_wire() {
		for code in [
			ReturnErrorCode::CalleeTrapped,
			ReturnErrorCode::TransferFailed,
			ReturnErrorCode::NotCallable,
			ReturnErrorCode::LoggingDisabled,
		] {
			assert_eq!(Result::from(ReturnCode::new(code.into())), Err(code));
		}
	}

	#[test]
	fn sentinel_decodes_to_none() {
		assert_eq!(Option::<u32>::from(ReturnCode::new(SENTINEL)), None);
		assert_eq!(Option::<u32>::from(ReturnCode::new(0)), Some(0));
		assert_eq!(Option::<u32>::from(ReturnCode::new(42)), Some(42));
	}

	#[test]
	fn u256_bytes_is_little_endian() {
		let bytes = u256_bytes(0x0102);
		assert_eq!(&bytes[..2], &[0x02, 0x01]);
		assert!(bytes[2..].iter().all(|b| *b == 0));
	}
}
