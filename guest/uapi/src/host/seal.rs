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

//! Marshalling for the 32-bit [`abi::seal`](crate::abi::seal) revision.

use super::{extract_from_slice, output_returned, ptr_len_or_sentinel, ptr_or_sentinel, HostFn};
use crate::{
	abi::{
		self,
		seal::{CallArgs, Imports, InstantiateArgs},
	},
	CallFlags, Result, ReturnCode, ReturnFlags, StorageFlags,
};

/// [`HostFn`] over the `seal` import table `I`.
#[derive(Debug, Default, Clone)]
pub struct Api<I> {
	imports: I,
}

impl<I: Imports> Api<I> {
	/// Speak the `seal` revision through `imports`.
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

	/// Read a `U256` the host wrote as 32 little endian bytes and keep the low 64 bits.
	fn u256_word(&mut self, f: unsafe fn(&mut I, *mut u8)) -> u64 {
		let mut output = [0u8; 32];
		unsafe { f(&mut self.imports, output.as_mut_ptr()) };
		let mut word = [0u8; 8];
		word.copy_from_slice(&output[..8]);
		u64::from_le_bytes(word)
	}
}

/// Implements all host functions with a signature of `fn(&mut [u8; n])`.
macro_rules! impl_wrapper_for {
	(@impl_fn $name:ident, $n: literal) => {
		fn $name(&mut self, output: &mut [u8; $n]) {
			unsafe { self.imports.$name(output.as_mut_ptr()) }
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
						input.as_ptr(),
						input.len() as u32,
						output.as_mut_ptr(),
					)
				}
			}
		}
	};
}

impl<I: Imports> HostFn for Api<I> {
	fn input(&mut self, output: &mut &mut [u8]) {
		let mut output_len = output.len() as u32;
		unsafe { self.imports.input(output.as_mut_ptr(), &mut output_len) };
		extract_from_slice(output, output_len as usize);
	}

	fn return_value(&mut self, flags: ReturnFlags, return_value: &[u8]) -> ! {
		unsafe {
			self.imports.seal_return(
				flags.bits(),
				return_value.as_ptr(),
				return_value.len() as u32,
			)
		}
		panic!("seal_return does not return");
	}

	fn set_storage(&mut self, flags: StorageFlags, key: &[u8], value: &[u8]) -> Option<u32> {
		let ret_code = unsafe {
			self.imports.set_storage(
				flags.bits(),
				key.as_ptr(),
				key.len() as u32,
				value.as_ptr(),
				value.len() as u32,
			)
		};
		ReturnCode::new(ret_code).into()
	}

	fn clear_storage(&mut self, flags: StorageFlags, key: &[u8]) -> Option<u32> {
		let ret_code =
			unsafe { self.imports.clear_storage(flags.bits(), key.as_ptr(), key.len() as u32) };
		ReturnCode::new(ret_code).into()
	}

	fn get_storage(&mut self, flags: StorageFlags, key: &[u8], output: &mut &mut [u8]) -> Result {
		let mut output_len = output.len() as u32;
		let ret_code = unsafe {
			self.imports.get_storage(
				flags.bits(),
				key.as_ptr(),
				key.len() as u32,
				output.as_mut_ptr(),
				&mut output_len,
			)
		};
		extract_from_slice(output, output_len as usize);
		ReturnCode::new(ret_code).into()
	}

	fn contains_storage(&mut self, flags: StorageFlags, key: &[u8]) -> Option<u32> {
		let ret_code =
			unsafe { self.imports.contains_storage(flags.bits(), key.as_ptr(), key.len() as u32) };
		ReturnCode::new(ret_code).into()
	}

	fn take_storage(
		&mut self,
		flags: StorageFlags,
		key: &[u8],
		output: &mut &mut [u8],
	) -> Result {
		let mut output_len = output.len() as u32;
		let ret_code = unsafe {
			self.imports.take_storage(
				flags.bits(),
				key.as_ptr(),
				key.len() as u32,
				output.as_mut_ptr(),
				&mut output_len,
			)
		};
		extract_from_slice(output, output_len as usize);
		ReturnCode::new(ret_code).into()
	}

	fn transfer(&mut self, address: &[u8; 20], value: &[u8; 32]) -> Result {
		let ret_code = unsafe { self.imports.transfer(address.as_ptr(), value.as_ptr()) };
		ReturnCode::new(ret_code).into()
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
		let (output_ptr, mut output_len) = ptr_len_or_sentinel(&mut output);
		let (ref_time_limit_lo, ref_time_limit_hi) = abi::split(ref_time_limit);
		let (proof_size_limit_lo, proof_size_limit_hi) = abi::split(proof_size_limit);
		let args = CallArgs {
			flags: flags.bits(),
			callee: callee.as_ptr(),
			ref_time_limit_lo,
			ref_time_limit_hi,
			proof_size_limit_lo,
			proof_size_limit_hi,
			deposit_limit: ptr_or_sentinel(&deposit_limit),
			value: value.as_ptr(),
			input: input.as_ptr(),
			input_len: input.len() as _,
			output: output_ptr,
			output_len: &mut output_len as *mut _,
		};

		let ret_code: Result = ReturnCode::new(unsafe { self.imports.call(&args) }).into();

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
		let (output_ptr, mut output_len) = ptr_len_or_sentinel(&mut output);
		let ret_code = unsafe {
			self.imports.delegate_call(
				flags.bits(),
				code_hash.as_ptr(),
				input.as_ptr(),
				input.len() as u32,
				output_ptr,
				&mut output_len,
			)
		};
		let ret_code: Result = ReturnCode::new(ret_code).into();

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
		mut address: Option<&mut [u8; 20]>,
		mut output: Option<&mut &mut [u8]>,
		salt: Option<&[u8; 32]>,
	) -> Result {
		let address = match address {
			Some(ref mut data) => data.as_mut_ptr(),
			None => crate::SENTINEL as _,
		};
		let (output_ptr, mut output_len) = ptr_len_or_sentinel(&mut output);
		let (ref_time_limit_lo, ref_time_limit_hi) = abi::split(ref_time_limit);
		let (proof_size_limit_lo, proof_size_limit_hi) = abi::split(proof_size_limit);
		let args = InstantiateArgs {
			code_hash: code_hash.as_ptr(),
			ref_time_limit_lo,
			ref_time_limit_hi,
			proof_size_limit_lo,
			proof_size_limit_hi,
			deposit_limit: ptr_or_sentinel(&deposit_limit),
			value: value.as_ptr(),
			input: input.as_ptr(),
			input_len: input.len() as _,
			address,
			output: output_ptr,
			output_len: &mut output_len as *mut _,
			salt: ptr_or_sentinel(&salt),
		};

		let ret_code: Result = ReturnCode::new(unsafe { self.imports.instantiate(&args) }).into();

		if let Some(ref mut output) = output {
			if output_returned(&ret_code) {
				extract_from_slice(output, output_len as usize);
			}
		}

		ret_code
	}

	fn terminate(&mut self, beneficiary: &[u8; 20]) -> ! {
		unsafe { self.imports.terminate(beneficiary.as_ptr()) }
		panic!("terminate does not return");
	}

	impl_wrapper_for! {
		[u8; 32] => balance, value_transferred, minimum_balance, own_code_hash;
		[u8; 20] => address, caller, origin;
	}

	fn balance_of(&mut self, address: &[u8; 20], output: &mut [u8; 32]) {
		unsafe { self.imports.balance_of(address.as_ptr(), output.as_mut_ptr()) }
	}

	fn weight_to_fee(&mut self, ref_time_limit: u64, proof_size_limit: u64, output: &mut [u8; 32]) {
		let (ref_time_lo, ref_time_hi) = abi::split(ref_time_limit);
		let (proof_size_lo, proof_size_hi) = abi::split(proof_size_limit);
		unsafe {
			self.imports.weight_to_fee(
				ref_time_lo,
				ref_time_hi,
				proof_size_lo,
				proof_size_hi,
				output.as_mut_ptr(),
			)
		};
	}

	fn gas_left(&mut self) -> u64 {
		let mut output = [0u8; 8];
		let mut output_len = output.len() as u32;
		unsafe { self.imports.gas_left(output.as_mut_ptr(), &mut output_len) };
		let mut word = [0u8; 8];
		let len = (output_len as usize).min(word.len());
		word[..len].copy_from_slice(&output[..len]);
		u64::from_le_bytes(word)
	}

	fn now(&mut self) -> u64 {
		self.u256_word(I::now)
	}

	fn block_number(&mut self) -> u64 {
		self.u256_word(I::block_number)
	}

	fn block_hash(&mut self, block_number: u64, output: &mut [u8; 32]) {
		let block_number = crate::u256_bytes(block_number);
		unsafe { self.imports.block_hash(block_number.as_ptr(), output.as_mut_ptr()) }
	}

	fn chain_id(&mut self) -> u64 {
		self.u256_word(I::chain_id)
	}

	fn deposit_event(&mut self, topics: &[[u8; 32]], data: &[u8]) {
		unsafe {
			self.imports.deposit_event(
				topics.as_ptr(),
				topics.len() as u32,
				data.as_ptr(),
				data.len() as u32,
			)
		}
	}

	impl_hash_fn!(sha2_256, 32);
	impl_hash_fn!(keccak_256, 32);
	impl_hash_fn!(blake2_256, 32);
	impl_hash_fn!(blake2_128, 16);

	fn return_data_size(&mut self) -> u64 {
		self.u256_word(I::return_data_size)
	}

	fn return_data_copy(&mut self, output: &mut &mut [u8], offset: u32) {
		let mut output_len = output.len() as u32;
		unsafe { self.imports.return_data_copy(output.as_mut_ptr(), &mut output_len, offset) };
		extract_from_slice(output, output_len as usize);
	}

	fn set_immutable_data(&mut self, data: &[u8]) {
		unsafe { self.imports.set_immutable_data(data.as_ptr(), data.len() as u32) }
	}

	fn get_immutable_data(&mut self, output: &mut &mut [u8]) {
		let mut output_len = output.len() as u32;
		unsafe { self.imports.get_immutable_data(output.as_mut_ptr(), &mut output_len) };
		extract_from_slice(output, output_len as usize);
	}

	fn is_contract(&mut self, address: &[u8; 20]) -> bool {
		let ret_val = unsafe { self.imports.is_contract(address.as_ptr()) };
		ReturnCode::new(ret_val).into_bool()
	}

	fn code_hash(&mut self, address: &[u8; 20], output: &mut [u8; 32]) {
		unsafe { self.imports.code_hash(address.as_ptr(), output.as_mut_ptr()) }
	}

	fn code_size(&mut self, address: &[u8; 20]) -> u64 {
		unsafe { self.imports.code_size(address.as_ptr()) }.into()
	}

	fn set_code_hash(&mut self, code_hash: &[u8; 32]) -> Result {
		let ret_val = unsafe { self.imports.set_code_hash(code_hash.as_ptr()) };
		ReturnCode::new(ret_val).into()
	}

	fn caller_is_origin(&mut self) -> bool {
		let ret_val = unsafe { self.imports.caller_is_origin() };
		ReturnCode::new(ret_val).into_bool()
	}

	fn caller_is_root(&mut self) -> bool {
		let ret_val = unsafe { self.imports.caller_is_root() };
		ReturnCode::new(ret_val).into_bool()
	}

	fn call_chain_extension(
		&mut self,
		func_id: u32,
		input: &[u8],
		mut output: Option<&mut &mut [u8]>,
	) -> u32 {
		let (output_ptr, mut output_len) = ptr_len_or_sentinel(&mut output);
		let ret_code = unsafe {
			self.imports.call_chain_extension(
				func_id,
				input.as_ptr(),
				input.len() as u32,
				output_ptr,
				&mut output_len,
			)
		};

		if let Some(ref mut output) = output {
			extract_from_slice(output, output_len as usize);
		}
		ReturnCode::new(ret_code).into_u32()
	}

	fn debug_message(&mut self, message: &[u8]) -> Result {
		let ret_code =
			unsafe { self.imports.debug_message(message.as_ptr(), message.len() as u32) };
		ReturnCode::new(ret_code).into()
	}

	fn instantiation_nonce(&mut self) -> u64 {
		unsafe { self.imports.instantiation_nonce() }
	}
}
