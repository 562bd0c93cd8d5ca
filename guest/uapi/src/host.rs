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

//! The typed host interface.
//!
//! [`HostFn`] has one safe method per host function. It is implemented once per ABI revision by
//! [`seal::Api`] and [`v1::Api`], which turn slices and arrays into the pointer, length and
//! packed words of their [`abi`](crate::abi) table and decode whatever comes back. Both are
//! generic over the raw import table so the same marshalling runs against the real host on
//! PolkaVM and against a simulated host everywhere else.

use crate::{CallFlags, Result, ReturnFlags, StorageFlags};

pub mod seal;
pub mod v1;

#[cfg(target_arch = "riscv32")]
mod riscv32;
#[cfg(target_arch = "riscv64")]
mod riscv64;

/// The import block of the PolkaVM host.
///
/// Implements the raw table of the revision the current target speaks: [`crate::abi::seal`] on
/// `riscv32` and [`crate::abi::v1`] on `riscv64`.
#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct PolkaVm;

/// Implements the host functions a contract can call.
pub trait HostFn {
	/// Stores the input passed by the caller into the supplied buffer.
	///
	/// # Note
	///
	/// The input is truncated to the length of `output` and `output` is shrunk to the number of
	/// bytes written.
	fn input(&mut self, output: &mut &mut [u8]);

	/// Cease contract execution and save a data buffer as a result of the execution.
	///
	/// This function never returns as it stops execution of the caller. Passing
	/// [`ReturnFlags::REVERT`] rolls back every state change of this invocation.
	fn return_value(&mut self, flags: ReturnFlags, return_value: &[u8]) -> !;

	/// Set the value at the given key in the contract storage.
	///
	/// Returns the size of the pre-existing value at the specified key if any.
	fn set_storage(&mut self, flags: StorageFlags, key: &[u8], value: &[u8]) -> Option<u32>;

	/// Clear the value at the given key in the contract storage.
	///
	/// Returns the size of the pre-existing value at the specified key if any.
	fn clear_storage(&mut self, flags: StorageFlags, key: &[u8]) -> Option<u32>;

	/// Retrieve the value under the given key from storage.
	///
	/// # Errors
	///
	/// [`KeyNotFound`][`crate::ReturnErrorCode::KeyNotFound`]
	fn get_storage(&mut self, flags: StorageFlags, key: &[u8], output: &mut &mut [u8]) -> Result;

	/// Checks whether there is a value stored under the given key.
	///
	/// Returns the size of the value if any.
	fn contains_storage(&mut self, flags: StorageFlags, key: &[u8]) -> Option<u32>;

	/// Retrieve and remove the value under the given key from storage.
	///
	/// # Errors
	///
	/// [`KeyNotFound`][`crate::ReturnErrorCode::KeyNotFound`]
	fn take_storage(&mut self, flags: StorageFlags, key: &[u8], output: &mut &mut [u8])
		-> Result;

	/// Transfer some amount of funds into the specified account.
	///
	/// # Errors
	///
	/// [`TransferFailed`][`crate::ReturnErrorCode::TransferFailed`]
	fn transfer(&mut self, address: &[u8; 20], value: &[u8; 32]) -> Result;

	/// Call (possibly transferring some amount of funds) into the specified account.
	///
	/// # Parameters
	///
	/// - `flags`: See [`CallFlags`] for a documentation of the supported flags.
	/// - `callee`: The address of the callee.
	/// - `ref_time_limit` and `proof_size_limit`: The weight the callee may consume. `0` means
	///   all remaining.
	/// - `deposit_limit`: The storage deposit limit. `None` means no limit.
	/// - `value`: The value to transfer into the callee.
	/// - `input`: The input data passed to the callee.
	/// - `output`: A reference to the output data buffer to write the call output buffer. If
	///   `None` is provided then the output buffer is not copied.
	///
	/// # Errors
	///
	/// - [`CalleeReverted`][`crate::ReturnErrorCode::CalleeReverted`]: Output buffer is returned.
	/// - [`CalleeTrapped`][`crate::ReturnErrorCode::CalleeTrapped`]
	/// - [`TransferFailed`][`crate::ReturnErrorCode::TransferFailed`]
	/// - [`NotCallable`][`crate::ReturnErrorCode::NotCallable`]
	/// - [`OutOfResources`][`crate::ReturnErrorCode::OutOfResources`]
	fn call(
		&mut self,
		flags: CallFlags,
		callee: &[u8; 20],
		ref_time_limit: u64,
		proof_size_limit: u64,
		deposit_limit: Option<&[u8; 32]>,
		value: &[u8; 32],
		input: &[u8],
		output: Option<&mut &mut [u8]>,
	) -> Result;

	/// Execute code in the context (storage, caller, value) of the current contract.
	///
	/// # Errors
	///
	/// - [`CalleeReverted`][`crate::ReturnErrorCode::CalleeReverted`]: Output buffer is returned.
	/// - [`CalleeTrapped`][`crate::ReturnErrorCode::CalleeTrapped`]
	/// - [`CodeNotFound`][`crate::ReturnErrorCode::CodeNotFound`]
	fn delegate_call(
		&mut self,
		flags: CallFlags,
		code_hash: &[u8; 32],
		input: &[u8],
		output: Option<&mut &mut [u8]>,
	) -> Result;

	/// Instantiate a contract with the specified code hash.
	///
	/// The address of the new contract is written to `address` and its constructor output to
	/// `output`, if supplied. A `salt` makes the address deterministic.
	///
	/// # Errors
	///
	/// - [`CalleeReverted`][`crate::ReturnErrorCode::CalleeReverted`]: Output buffer is returned.
	/// - [`CalleeTrapped`][`crate::ReturnErrorCode::CalleeTrapped`]
	/// - [`TransferFailed`][`crate::ReturnErrorCode::TransferFailed`]
	/// - [`CodeNotFound`][`crate::ReturnErrorCode::CodeNotFound`]
	fn instantiate(
		&mut self,
		code_hash: &[u8; 32],
		ref_time_limit: u64,
		proof_size_limit: u64,
		deposit_limit: Option<&[u8; 32]>,
		value: &[u8; 32],
		input: &[u8],
		address: Option<&mut [u8; 20]>,
		output: Option<&mut &mut [u8]>,
		salt: Option<&[u8; 32]>,
	) -> Result;

	/// Remove the calling account and transfer remaining **free** balance.
	///
	/// This function never returns.
	fn terminate(&mut self, beneficiary: &[u8; 20]) -> !;

	/// Stores the address of the caller into the supplied buffer.
	fn caller(&mut self, output: &mut [u8; 20]);

	/// Stores the origin address (initiator of the call stack) into the supplied buffer.
	fn origin(&mut self, output: &mut [u8; 20]);

	/// Stores the address of the current contract into the supplied buffer.
	fn address(&mut self, output: &mut [u8; 20]);

	/// Stores the free balance of the current account into the supplied buffer.
	fn balance(&mut self, output: &mut [u8; 32]);

	/// Stores the free balance of the account at `address` into the supplied buffer.
	fn balance_of(&mut self, address: &[u8; 20], output: &mut [u8; 32]);

	/// Stores the value transferred along with this call/instantiate into the supplied buffer.
	fn value_transferred(&mut self, output: &mut [u8; 32]);

	/// Stores the minimum balance (a.k.a. existential deposit) into the supplied buffer.
	fn minimum_balance(&mut self, output: &mut [u8; 32]);

	/// Stores the price for the specified amount of weight into the supplied buffer.
	fn weight_to_fee(&mut self, ref_time_limit: u64, proof_size_limit: u64, output: &mut [u8; 32]);

	/// The gas left for the current invocation.
	fn gas_left(&mut self) -> u64;

	/// The timestamp of the current block.
	fn now(&mut self) -> u64;

	/// The current block number.
	fn block_number(&mut self) -> u64;

	/// Stores the hash of the block at `block_number` into the supplied buffer.
	///
	/// Only the 256 most recent blocks before the current one are available. The hash of any
	/// other block reads as zero.
	fn block_hash(&mut self, block_number: u64, output: &mut [u8; 32]);

	/// The chain id.
	fn chain_id(&mut self) -> u64;

	/// Deposit a contract event with the data buffer and optional list of topics.
	fn deposit_event(&mut self, topics: &[[u8; 32]], data: &[u8]);

	/// Computes the SHA2 256-bit hash on the given input buffer.
	fn hash_sha2_256(&mut self, input: &[u8], output: &mut [u8; 32]);

	/// Computes the KECCAK 256-bit hash on the given input buffer.
	fn hash_keccak_256(&mut self, input: &[u8], output: &mut [u8; 32]);

	/// Computes the BLAKE2 256-bit hash on the given input buffer.
	fn hash_blake2_256(&mut self, input: &[u8], output: &mut [u8; 32]);

	/// Computes the BLAKE2 128-bit hash on the given input buffer.
	fn hash_blake2_128(&mut self, input: &[u8], output: &mut [u8; 16]);

	/// The size of the data returned by the last call or instantiation.
	fn return_data_size(&mut self) -> u64;

	/// Stores the data returned by the last call or instantiation, starting at `offset`, into
	/// `output`. `output` is shrunk to the number of bytes copied.
	fn return_data_copy(&mut self, output: &mut &mut [u8], offset: u32);

	/// Set the immutable data of the contract. Only allowed once, during `deploy`.
	fn set_immutable_data(&mut self, data: &[u8]);

	/// Stores the immutable data of the contract into the supplied buffer.
	fn get_immutable_data(&mut self, output: &mut &mut [u8]);

	/// Checks whether a specified address belongs to a contract.
	fn is_contract(&mut self, address: &[u8; 20]) -> bool;

	/// Stores the code hash of the contract at `address` into the supplied buffer.
	fn code_hash(&mut self, address: &[u8; 20], output: &mut [u8; 32]);

	/// The size of the code of the contract at `address`. Zero for accounts without code.
	fn code_size(&mut self, address: &[u8; 20]) -> u64;

	/// Stores the code hash of the current contract into the supplied buffer.
	fn own_code_hash(&mut self, output: &mut [u8; 32]);

	/// Replace the code of the current contract with the code at `code_hash`.
	///
	/// The current invocation keeps running the old code. Every later call runs the new one.
	///
	/// # Errors
	///
	/// [`CodeNotFound`][`crate::ReturnErrorCode::CodeNotFound`]
	fn set_code_hash(&mut self, code_hash: &[u8; 32]) -> Result;

	/// Checks whether the caller of the current contract is the origin of the whole call stack.
	fn caller_is_origin(&mut self) -> bool;

	/// Checks whether the caller of the current contract is root.
	///
	/// Only an origin can be root, so this implies [`HostFn::caller_is_origin`].
	fn caller_is_root(&mut self) -> bool;

	/// Call into the chain extension provided by the chain if any.
	///
	/// The upper 16 bits of `func_id` select the extension and the lower 16 bits the function
	/// inside of it. The output is written to `output` if supplied. Returns whatever the
	/// extension returned, which is not necessarily a [`ReturnErrorCode`](crate::ReturnErrorCode).
	fn call_chain_extension(
		&mut self,
		func_id: u32,
		input: &[u8],
		output: Option<&mut &mut [u8]>,
	) -> u32;

	/// Emit a custom debug message.
	///
	/// # Errors
	///
	/// [`LoggingDisabled`][`crate::ReturnErrorCode::LoggingDisabled`]
	fn debug_message(&mut self, message: &[u8]) -> Result;

	/// A nonce that is incremented with every instantiation.
	fn instantiation_nonce(&mut self) -> u64;
}

/// Shrink `output` to its first `new_len` bytes.
#[inline(always)]
fn extract_from_slice(output: &mut &mut [u8], new_len: usize) {
	debug_assert!(new_len <= output.len());
	let tmp = core::mem::take(output);
	*output = &mut tmp[..new_len];
}

#[inline(always)]
fn ptr_len_or_sentinel(data: &mut Option<&mut &mut [u8]>) -> (*mut u8, u32) {
	match data {
		Some(ref mut data) => (data.as_mut_ptr(), data.len() as _),
		None => (crate::SENTINEL as _, 0),
	}
}

#[inline(always)]
fn ptr_or_sentinel(data: &Option<&[u8; 32]>) -> *const u8 {
	match data {
		Some(ref data) => data.as_ptr(),
		None => crate::SENTINEL as _,
	}
}

/// Whether the host wrote the callee output for the given status.
#[inline(always)]
fn output_returned(result: &Result) -> bool {
	matches!(result, Ok(()) | Err(crate::ReturnErrorCode::CalleeReverted))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ReturnErrorCode;

	#[test]
	fn extract_shrinks_to_the_produced_length() {
		let mut buffer = [1u8, 2, 3, 4];
		let mut output = &mut buffer[..];
		extract_from_slice(&mut output, 2);
		assert_eq!(output, &[1, 2]);
		extract_from_slice(&mut output, 0);
		assert!(output.is_empty());
	}

	#[test]
	fn missing_buffers_become_sentinels() {
		let (ptr, len) = ptr_len_or_sentinel(&mut None);
		assert_eq!(ptr as usize, crate::SENTINEL as usize);
		assert_eq!(len, 0);
		assert_eq!(ptr_or_sentinel(&None) as usize, crate::SENTINEL as usize);

		let mut buffer = [0u8; 8];
		let mut output = &mut buffer[..];
		let (ptr, len) = ptr_len_or_sentinel(&mut Some(&mut output));
		assert_eq!(len, 8);
		assert_ne!(ptr as usize, crate::SENTINEL as usize);
	}

	#[test]
	fn output_is_only_returned_on_success_or_revert() {
		assert!(output_returned(&Ok(())));
		assert!(output_returned(&Err(ReturnErrorCode::CalleeReverted)));
		assert!(!output_returned(&Err(ReturnErrorCode::CalleeTrapped)));
		assert!(!output_returned(&Err(ReturnErrorCode::NotCallable)));
	}
}
