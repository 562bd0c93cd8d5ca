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

//! Marshalling for the 64-bit [`abi::v1`](crate::abi::v1) revision.
//!
//! Capacities travel [`pack`]ed into a single word and results come back as
//! `pack(status, produced_len)`, so unlike `seal` nothing is written through a length pointer.

use super::{extract_from_slice, output_returned, ptr_len_or_sentinel, ptr_or_sentinel, HostFn};
use crate::{
	abi::{
		pack, unpack,
		v1::{CallArgs, Imports, InstantiateArgs},
	},
	CallFlags, Result, ReturnCode, ReturnFlags, StorageFlags,
};

/// [`HostFn`] over the `v1` import table `I`.
#[derive(Debug, Default, Clone)]
pub struct Api<I> {
	imports: I,
}

impl<I: Imports> Api<I> {
	/// Speak the `v1` revision through `imports`.
	pub const fn new(imports: I) -> Self {
		Self { imports }
	}

	pub fn imports(&self) -> &I {
		&self.imports
	}

	pub fn imports_mut(&mut self) -> &mut I {
		&mut self.imports
	}

	pub fn into_inner(self) -> I {
		self.imports
	}
}

/// A pointer as an argument word.
#[inline(always)]
fn word<T>(ptr: *const T) -> u64 {
	ptr as usize as u64
}

/// Split a packed result into its status and the produced length or value.
#[inline(always)]
fn status_and_len(ret: u64) -> (Result, u32) {
	let (status, len) = unpack(ret);
	(ReturnCode::new(status).into(), len)
}

/// Implements all host functions with a signature of `fn(&mut [u8; n])`.
macro_rules! impl_wrapper_for {
	(@impl_fn $name:ident, $n: literal) => {
		fn $name(&mut self, output: &mut [u8; $n]) {
			unsafe { self.imports.$name(word(output.as_mut_ptr())) }
		}
	};

	() => {};

	([u8; $n: literal] => $($name:ident),*; $($tail:tt)*) => {
		$(impl_wrapper_for!(@impl_fn $name, $n);)*
		impl_wrapper_for!($($tail)*);
	};
}

macro_rules! impl_hash_fn {
	( $name:ident, $bytes_result:literal ) => {
		paste::item! {
			fn [<hash_ $name>](&mut self, input: &[u8], output: &mut [u8; $bytes_result]) {
				unsafe {
					self.imports.[<hash_ $name>](
						word(input.as_ptr()),
						input.len() as u64,
						word(output.as_mut_ptr()),
					)
				}
			}
		}
	};
}

/// Decode the length of the previous value, or the sentinel, of a storage access.
#[inline(always)]
fn previous_len(ret: u64) -> Option<u32> {
	ReturnCode::new(unpack(ret).1).into()
}

/// Shrink `output` to what the host produced, unless the host reported a failure.
#[inline(always)]
fn read_into(output: &mut &mut [u8], ret: u64) -> Result {
	let (result, len) = status_and_len(ret);
	if result.is_ok() {
		extract_from_slice(output, len as usize);
	}
	result
}

impl<I: Imports> HostFn for Api<I> {
	fn input(&mut self, output: &mut &mut [u8]) {
		let ret = unsafe {
			self.imports.input(word(output.as_mut_ptr()), pack(0, output.len() as u32))
		};
		let _ = read_into(output, ret);
	}

	fn return_value(&mut self, flags: ReturnFlags, return_value: &[u8]) -> ! {
		unsafe {
			self.imports.seal_return(
				flags.bits() as u64,
				word(return_value.as_ptr()),
				return_value.len() as u64,
			)
		}
		panic!("seal_return does not return");
	}

	fn set_storage(&mut self, flags: StorageFlags, key: &[u8], value: &[u8]) -> Option<u32> {
		let ret = unsafe {
			self.imports.set_storage(
				flags.bits() as u64,
				word(key.as_ptr()),
				key.len() as u64,
				word(value.as_ptr()),
				value.len() as u64,
			)
		};
		previous_len(ret)
	}

	fn clear_storage(&mut self, flags: StorageFlags, key: &[u8]) -> Option<u32> {
		let ret = unsafe {
			self.imports.clear_storage(flags.bits() as u64, word(key.as_ptr()), key.len() as u64)
		};
		previous_len(ret)
	}

	fn get_storage(&mut self, flags: StorageFlags, key: &[u8], output: &mut &mut [u8]) -> Result {
		let ret = unsafe {
			self.imports.get_storage(
				flags.bits() as u64,
				word(key.as_ptr()),
				key.len() as u64,
				word(output.as_mut_ptr()),
				output.len() as u64,
			)
		};
		read_into(output, ret)
	}

	fn contains_storage(&mut self, flags: StorageFlags, key: &[u8]) -> Option<u32> {
		let ret = unsafe {
			self.imports.contains_storage(
				flags.bits() as u64,
				word(key.as_ptr()),
				key.len() as u64,
			)
		};
		previous_len(ret)
	}

	fn take_storage(
		&mut self,
		flags: StorageFlags,
		key: &[u8],
		output: &mut &mut [u8],
	) -> Result {
		let ret = unsafe {
			self.imports.take_storage(
				flags.bits() as u64,
				word(key.as_ptr()),
				key.len() as u64,
				word(output.as_mut_ptr()),
				output.len() as u64,
			)
		};
		read_into(output, ret)
	}

	fn transfer(&mut self, address: &[u8; 20], value: &[u8; 32]) -> Result {
		let ret = unsafe { self.imports.transfer(word(address.as_ptr()), word(value.as_ptr())) };
		status_and_len(ret).0
	}

	fn call(
		&mut self,
		flags: CallFlags,
		callee: &[u8; 20],
		ref_time_limit: u64,
		proof_size_limit: u64,
		deposit_limit: Option<&[u8; 32]>,
		value: &[u8; 32],
		input: &[u8],
		mut output: Option<&mut &mut [u8]>,
	) -> Result {
		let (output_ptr, output_capacity) = ptr_len_or_sentinel(&mut output);
		let args = CallArgs {
			flags: flags.bits() as u64,
			callee: word(callee.as_ptr()),
			ref_time_limit,
			proof_size_limit,
			deposit_limit: word(ptr_or_sentinel(&deposit_limit)),
			value: word(value.as_ptr()),
			input: word(input.as_ptr()),
			input_len: input.len() as u64,
			output: word(output_ptr),
			output_capacity: output_capacity as u64,
		};

		let (ret_code, output_len) =
			status_and_len(unsafe { self.imports.call(word(&args as *const CallArgs)) });

		if let Some(ref mut output) = output {
			if output_returned(&ret_code) {
				extract_from_slice(output, output_len as usize);
			}
		}

		ret_code
	}

	fn delegate_call(
		&mut self,
		flags: CallFlags,
		code_hash: &[u8; 32],
		input: &[u8],
		mut output: Option<&mut &mut [u8]>,
	) -> Result {
		let (output_ptr, output_capacity) = ptr_len_or_sentinel(&mut output);
		let ret = unsafe {
			self.imports.delegate_call(
				flags.bits() as u64,
				word(code_hash.as_ptr()),
				word(input.as_ptr()),
				input.len() as u64,
				word(output_ptr),
				output_capacity as u64,
			)
		};
		let (ret_code, output_len) = status_and_len(ret);

		if let Some(ref mut output) = output {
			if output_returned(&ret_code) {
				extract_from_slice(output, output_len as usize);
			}
		}

		ret_code
	}

	fn instantiate(
		&mut self,
		code_hash: &[u8; 32],
		ref_time_limit: u64,
		proof_size_limit: u64,
		deposit_limit: Option<&[u8; 32]>,
		value: &[u8; 32],
		input: &[u8],
		address: Option<&mut [u8; 20]>,
		mut output: Option<&mut &mut [u8]>,
		salt: Option<&[u8; 32]>,
	) -> Result {
		let address = match address {
			Some(data) => word(data.as_mut_ptr()),
			None => crate::SENTINEL as u64,
		};
		let (output_ptr, output_capacity) = ptr_len_or_sentinel(&mut output);
		let args = InstantiateArgs {
			code_hash: word(code_hash.as_ptr()),
			ref_time_limit,
			proof_size_limit,
			deposit_limit: word(ptr_or_sentinel(&deposit_limit)),
			value: word(value.as_ptr()),
			input: word(input.as_ptr()),
			input_len: input.len() as u64,
			address,
			output: word(output_ptr),
			output_capacity: output_capacity as u64,
			salt: word(ptr_or_sentinel(&salt)),
		};

		let (ret_code, output_len) = status_and_len(unsafe {
			self.imports.instantiate(word(&args as *const InstantiateArgs))
		});

		if let Some(ref mut output) = output {
			if output_returned(&ret_code) {
				extract_from_slice(output, output_len as usize);
			}
		}

		ret_code
	}

	fn terminate(&mut self, beneficiary: &[u8; 20]) -> ! {
		unsafe { self.imports.terminate(word(beneficiary.as_ptr())) }
		panic!("terminate does not return");
	}

	impl_wrapper_for! {
		[u8; 32] => balance, value_transferred, minimum_balance, own_code_hash;
		[u8; 20] => address, caller, origin;
	}

	fn balance_of(&mut self, address: &[u8; 20], output: &mut [u8; 32]) {
		unsafe { self.imports.balance_of(word(address.as_ptr()), word(output.as_mut_ptr())) }
	}

	fn weight_to_fee(&mut self, ref_time_limit: u64, proof_size_limit: u64, output: &mut [u8; 32]) {
		unsafe {
			self.imports.weight_to_fee(ref_time_limit, proof_size_limit, word(output.as_mut_ptr()))
		};
	}

	fn gas_left(&mut self) -> u64 {
		unsafe { self.imports.gas_left() }
	}

	fn now(&mut self) -> u64 {
		unsafe { self.imports.now() }
	}

	fn block_number(&mut self) -> u64 {
		unsafe { self.imports.block_number() }
	}

	fn block_hash(&mut self, block_number: u64, output: &mut [u8; 32]) {
		unsafe { self.imports.block_hash(block_number, word(output.as_mut_ptr())) }
	}

	fn chain_id(&mut self) -> u64 {
		unsafe { self.imports.chain_id() }
	}

	fn deposit_event(&mut self, topics: &[[u8; 32]], data: &[u8]) {
		unsafe {
			self.imports.deposit_event(
				word(topics.as_ptr()),
				topics.len() as u64,
				word(data.as_ptr()),
				data.len() as u64,
			)
		}
	}

	impl_hash_fn!(sha2_256, 32);
	impl_hash_fn!(keccak_256, 32);
	impl_hash_fn!(blake2_256, 32);
	impl_hash_fn!(blake2_128, 16);

	fn return_data_size(&mut self) -> u64 {
		unsafe { self.imports.return_data_size() }
	}

	fn return_data_copy(&mut self, output: &mut &mut [u8], offset: u32) {
		let ret = unsafe {
			self.imports
				.return_data_copy(word(output.as_mut_ptr()), pack(offset, output.len() as u32))
		};
		let _ = read_into(output, ret);
	}

	fn set_immutable_data(&mut self, data: &[u8]) {
		unsafe { self.imports.set_immutable_data(word(data.as_ptr()), data.len() as u64) }
	}

	fn get_immutable_data(&mut self, output: &mut &mut [u8]) {
		let ret = unsafe {
			self.imports.get_immutable_data(word(output.as_mut_ptr()), output.len() as u64)
		};
		let _ = read_into(output, ret);
	}

	fn is_contract(&mut self, address: &[u8; 20]) -> bool {
		unsafe { self.imports.is_contract(word(address.as_ptr())) != 0 }
	}

	fn code_hash(&mut self, address: &[u8; 20], output: &mut [u8; 32]) {
		unsafe { self.imports.code_hash(word(address.as_ptr()), word(output.as_mut_ptr())) }
	}

	fn code_size(&mut self, address: &[u8; 20]) -> u64 {
		unsafe { self.imports.code_size(word(address.as_ptr())) }
	}

	fn set_code_hash(&mut self, code_hash: &[u8; 32]) -> Result {
		let ret = unsafe { self.imports.set_code_hash(word(code_hash.as_ptr())) };
		status_and_len(ret).0
	}

	fn caller_is_origin(&mut self) -> bool {
		unsafe { self.imports.caller_is_origin() != 0 }
	}

	fn caller_is_root(&mut self) -> bool {
		unsafe { self.imports.caller_is_root() != 0 }
	}

	/// The extension result travels in the upper half of the return word, the produced length in
	/// the lower half.
	fn call_chain_extension(
		&mut self,
		func_id: u32,
		input: &[u8],
		mut output: Option<&mut &mut [u8]>,
	) -> u32 {
		let (output_ptr, output_capacity) = ptr_len_or_sentinel(&mut output);
		let ret = unsafe {
			self.imports.call_chain_extension(
				func_id as u64,
				word(input.as_ptr()),
				input.len() as u64,
				word(output_ptr),
				output_capacity as u64,
			)
		};
		let (ret_val, output_len) = unpack(ret);

		if let Some(ref mut output) = output {
			extract_from_slice(output, output_len as usize);
		}
		ret_val
	}

	fn debug_message(&mut self, message: &[u8]) -> Result {
		let ret =
			unsafe { self.imports.debug_message(word(message.as_ptr()), message.len() as u64) };
		status_and_len(ret).0
	}

	fn instantiation_nonce(&mut self) -> u64 {
		unsafe { self.imports.instantiation_nonce() }
	}
}
