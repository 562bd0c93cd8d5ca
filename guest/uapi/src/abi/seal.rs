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

//! The `seal` revision: every word is 32 bits wide.
//!
//! Variable sized results are written to an output buffer whose capacity is read from, and whose
//! produced length is written back to, a `u32` behind a length pointer. Status codes come back as
//! the plain return value. 64-bit limits are split into `(lo, hi)` halves.

use super::{host_calls, HostCall};

/// The raw import table of the `seal` revision.
///
/// On PolkaVM targets this is implemented by [`crate::host::PolkaVm`]. A host simulation can
/// implement it to run guest code natively, in which case guest memory is mapped into the host
/// and every pointer is a plain host address.
///
/// # Safety
///
/// Every method is unsafe to call: pointers must be valid for the lengths passed along (or be the
/// [`SENTINEL`](crate::SENTINEL) where a call accepts it) and a length pointer must hold the
/// capacity of the buffer it belongs to.
pub trait Imports {
	unsafe fn input(&mut self, out_ptr: *mut u8, out_len_ptr: *mut u32);
	unsafe fn seal_return(&mut self, flags: u32, data_ptr: *const u8, data_len: u32);
	unsafe fn set_storage(
		&mut self,
		flags: u32,
		key_ptr: *const u8,
		key_len: u32,
		value_ptr: *const u8,
		value_len: u32,
	) -> u32;
	unsafe fn clear_storage(&mut self, flags: u32, key_ptr: *const u8, key_len: u32) -> u32;
	unsafe fn get_storage(
		&mut self,
		flags: u32,
		key_ptr: *const u8,
		key_len: u32,
		out_ptr: *mut u8,
		out_len_ptr: *mut u32,
	) -> u32;
	unsafe fn contains_storage(&mut self, flags: u32, key_ptr: *const u8, key_len: u32) -> u32;
	unsafe fn take_storage(
		&mut self,
		flags: u32,
		key_ptr: *const u8,
		key_len: u32,
		out_ptr: *mut u8,
		out_len_ptr: *mut u32,
	) -> u32;
	unsafe fn transfer(&mut self, address_ptr: *const u8, value_ptr: *const u8) -> u32;
	unsafe fn call(&mut self, args_ptr: *const CallArgs) -> u32;
	unsafe fn delegate_call(
		&mut self,
		flags: u32,
		code_hash_ptr: *const u8,
		input_data_ptr: *const u8,
		input_data_len: u32,
		out_ptr: *mut u8,
		out_len_ptr: *mut u32,
	) -> u32;
	unsafe fn instantiate(&mut self, args_ptr: *const InstantiateArgs) -> u32;
	unsafe fn terminate(&mut self, beneficiary_ptr: *const u8);
	unsafe fn caller(&mut self, out_ptr: *mut u8);
	unsafe fn origin(&mut self, out_ptr: *mut u8);
	unsafe fn address(&mut self, out_ptr: *mut u8);
	unsafe fn balance(&mut self, out_ptr: *mut u8);
	unsafe fn balance_of(&mut self, address_ptr: *const u8, out_ptr: *mut u8);
	unsafe fn value_transferred(&mut self, out_ptr: *mut u8);
	unsafe fn minimum_balance(&mut self, out_ptr: *mut u8);
	unsafe fn weight_to_fee(
		&mut self,
		ref_time_lo: u32,
		ref_time_hi: u32,
		proof_size_lo: u32,
		proof_size_hi: u32,
		out_ptr: *mut u8,
	);
	unsafe fn gas_left(&mut self, out_ptr: *mut u8, out_len_ptr: *mut u32);
	unsafe fn now(&mut self, out_ptr: *mut u8);
	unsafe fn block_number(&mut self, out_ptr: *mut u8);
	unsafe fn block_hash(&mut self, block_number_ptr: *const u8, out_ptr: *mut u8);
	unsafe fn chain_id(&mut self, out_ptr: *mut u8);
	unsafe fn deposit_event(
		&mut self,
		topics_ptr: *const [u8; 32],
		num_topics: u32,
		data_ptr: *const u8,
		data_len: u32,
	);
	unsafe fn hash_sha2_256(&mut self, input_ptr: *const u8, input_len: u32, out_ptr: *mut u8);
	unsafe fn hash_keccak_256(&mut self, input_ptr: *const u8, input_len: u32, out_ptr: *mut u8);
	unsafe fn hash_blake2_256(&mut self, input_ptr: *const u8, input_len: u32, out_ptr: *mut u8);
	unsafe fn hash_blake2_128(&mut self, input_ptr: *const u8, input_len: u32, out_ptr: *mut u8);
	unsafe fn return_data_size(&mut self, out_ptr: *mut u8);
	unsafe fn return_data_copy(&mut self, out_ptr: *mut u8, out_len_ptr: *mut u32, offset: u32);
	unsafe fn set_immutable_data(&mut self, ptr: *const u8, len: u32);
	unsafe fn get_immutable_data(&mut self, out_ptr: *mut u8, out_len_ptr: *mut u32);
	unsafe fn is_contract(&mut self, address_ptr: *const u8) -> u32;
	unsafe fn code_hash(&mut self, address_ptr: *const u8, out_ptr: *mut u8);
	unsafe fn code_size(&mut self, address_ptr: *const u8) -> u32;
	unsafe fn own_code_hash(&mut self, out_ptr: *mut u8);
	unsafe fn set_code_hash(&mut self, code_hash_ptr: *const u8) -> u32;
	unsafe fn caller_is_origin(&mut self) -> u32;
	unsafe fn caller_is_root(&mut self) -> u32;
	unsafe fn call_chain_extension(
		&mut self,
		id: u32,
		input_ptr: *const u8,
		input_len: u32,
		out_ptr: *mut u8,
		out_len_ptr: *mut u32,
	) -> u32;
	unsafe fn debug_message(&mut self, str_ptr: *const u8, str_len: u32) -> u32;
	unsafe fn instantiation_nonce(&mut self) -> u64;
}

/// The arguments of `call`, passed by pointer because they exceed the argument registers.
#[repr(C, packed)]
#[derive(Clone, Copy)]
pub struct CallArgs {
	pub flags: u32,
	pub callee: *const u8,
	pub ref_time_limit_lo: u32,
	pub ref_time_limit_hi: u32,
	pub proof_size_limit_lo: u32,
	pub proof_size_limit_hi: u32,
	pub deposit_limit: *const u8,
	pub value: *const u8,
	pub input: *const u8,
	pub input_len: u32,
	pub output: *mut u8,
	pub output_len: *mut u32,
}

/// The arguments of `instantiate`, passed by pointer because they exceed the argument registers.
#[repr(C, packed)]
#[derive(Clone, Copy)]
pub struct InstantiateArgs {
	pub code_hash: *const u8,
	pub ref_time_limit_lo: u32,
	pub ref_time_limit_hi: u32,
	pub proof_size_limit_lo: u32,
	pub proof_size_limit_hi: u32,
	pub deposit_limit: *const u8,
	pub value: *const u8,
	pub input: *const u8,
	pub input_len: u32,
	pub address: *mut u8,
	pub output: *mut u8,
	pub output_len: *mut u32,
	pub salt: *const u8,
}

/// Descriptors of every function in [`Imports`].
pub const IMPORTS: [HostCall; 44] = host_calls! {
	input(OutPtr, LenPtr) -> Void, Read;
	seal_return(Scalar, Ptr, Len) -> Diverges, Control;
	set_storage(Scalar, Ptr, Len, Ptr, Len) -> Status, Mutate;
	clear_storage(Scalar, Ptr, Len) -> Status, Mutate;
	get_storage(Scalar, Ptr, Len, OutPtr, LenPtr) -> Status, Read;
	contains_storage(Scalar, Ptr, Len) -> Status, Read;
	take_storage(Scalar, Ptr, Len, OutPtr, LenPtr) -> Status, Mutate;
	transfer(Ptr, Ptr) -> Status, Mutate;
	call(Ptr) -> Status, Control;
	delegate_call(Scalar, Ptr, Ptr, Len, OutPtr, LenPtr) -> Status, Control;
	instantiate(Ptr) -> Status, Control;
	terminate(Ptr) -> Diverges, Control;
	caller(OutPtr) -> Void, Read;
	origin(OutPtr) -> Void, Read;
	address(OutPtr) -> Void, Read;
	balance(OutPtr) -> Void, Read;
	balance_of(Ptr, OutPtr) -> Void, Read;
	value_transferred(OutPtr) -> Void, Read;
	minimum_balance(OutPtr) -> Void, Read;
	weight_to_fee(Scalar, Scalar, Scalar, Scalar, OutPtr) -> Void, Read;
	gas_left(OutPtr, LenPtr) -> Void, Read;
	now(OutPtr) -> Void, Read;
	block_number(OutPtr) -> Void, Read;
	block_hash(Ptr, OutPtr) -> Void, Read;
	chain_id(OutPtr) -> Void, Read;
	deposit_event(Ptr, Scalar, Ptr, Len) -> Void, Mutate;
	hash_sha2_256(Ptr, Len, OutPtr) -> Void, Read;
	hash_keccak_256(Ptr, Len, OutPtr) -> Void, Read;
	hash_blake2_256(Ptr, Len, OutPtr) -> Void, Read;
	hash_blake2_128(Ptr, Len, OutPtr) -> Void, Read;
	return_data_size(OutPtr) -> Void, Read;
	return_data_copy(OutPtr, LenPtr, Scalar) -> Void, Read;
	set_immutable_data(Ptr, Len) -> Void, Mutate;
	get_immutable_data(OutPtr, LenPtr) -> Void, Read;
	is_contract(Ptr) -> Status, Read;
	code_hash(Ptr, OutPtr) -> Void, Read;
	code_size(Ptr) -> Scalar, Read;
	own_code_hash(OutPtr) -> Void, Read;
	set_code_hash(Ptr) -> Status, Mutate;
	caller_is_origin() -> Status, Read;
	caller_is_root() -> Status, Read;
	call_chain_extension(Scalar, Ptr, Len, OutPtr, LenPtr) -> Status, Mutate;
	debug_message(Ptr, Len) -> Status, Mutate;
	instantiation_nonce() -> Scalar, Read;
};
