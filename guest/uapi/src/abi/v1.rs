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

//! The `v1` revision: every word is 64 bits wide.
//!
//! Offsets and capacities travel [`pack`](super::pack)ed into a single word and variable sized
//! results report their status and produced length packed into the return word, so no length
//! pointers are involved. Scalars such as the block number come back directly.

use super::{host_calls, HostCall};

/// The raw import table of the `v1` revision.
///
/// Pointers are passed as plain words. Where a pointer is optional the
/// [`SENTINEL`](crate::SENTINEL) widened to 64 bits signals its absence.
///
/// # Safety
///
/// Every method is unsafe to call: pointer words must address memory that is valid for the
/// lengths and capacities passed along.
pub trait Imports {
	unsafe fn input(&mut self, out_ptr: u64, offset_and_capacity: u64) -> u64;
	unsafe fn seal_return(&mut self, flags: u64, data_ptr: u64, data_len: u64);
	unsafe fn set_storage(
		&mut self,
		flags: u64,
		key_ptr: u64,
		key_len: u64,
		value_ptr: u64,
		value_len: u64,
	) -> u64;
	unsafe fn clear_storage(&mut self, flags: u64, key_ptr: u64, key_len: u64) -> u64;
	unsafe fn get_storage(
		&mut self,
		flags: u64,
		key_ptr: u64,
		key_len: u64,
		out_ptr: u64,
		out_capacity: u64,
	) -> u64;
	unsafe fn contains_storage(&mut self, flags: u64, key_ptr: u64, key_len: u64) -> u64;
	unsafe fn take_storage(
		&mut self,
		flags: u64,
		key_ptr: u64,
		key_len: u64,
		out_ptr: u64,
		out_capacity: u64,
	) -> u64;
	unsafe fn transfer(&mut self, address_ptr: u64, value_ptr: u64) -> u64;
	unsafe fn call(&mut self, args_ptr: u64) -> u64;
	unsafe fn delegate_call(
		&mut self,
		flags: u64,
		code_hash_ptr: u64,
		input_data_ptr: u64,
		input_data_len: u64,
		out_ptr: u64,
		out_capacity: u64,
	) -> u64;
	unsafe fn instantiate(&mut self, args_ptr: u64) -> u64;
	unsafe fn terminate(&mut self, beneficiary_ptr: u64);
	unsafe fn caller(&mut self, out_ptr: u64);
	unsafe fn origin(&mut self, out_ptr: u64);
	unsafe fn address(&mut self, out_ptr: u64);
	unsafe fn balance(&mut self, out_ptr: u64);
	unsafe fn balance_of(&mut self, address_ptr: u64, out_ptr: u64);
	unsafe fn value_transferred(&mut self, out_ptr: u64);
	unsafe fn minimum_balance(&mut self, out_ptr: u64);
	unsafe fn weight_to_fee(&mut self, ref_time: u64, proof_size: u64, out_ptr: u64);
	unsafe fn gas_left(&mut self) -> u64;
	unsafe fn now(&mut self) -> u64;
	unsafe fn block_number(&mut self) -> u64;
	unsafe fn block_hash(&mut self, block_number: u64, out_ptr: u64);
	unsafe fn chain_id(&mut self) -> u64;
	unsafe fn deposit_event(
		&mut self,
		topics_ptr: u64,
		num_topics: u64,
		data_ptr: u64,
		data_len: u64,
	);
	unsafe fn hash_sha2_256(&mut self, input_ptr: u64, input_len: u64, out_ptr: u64);
	unsafe fn hash_keccak_256(&mut self, input_ptr: u64, input_len: u64, out_ptr: u64);
	unsafe fn hash_blake2_256(&mut self, input_ptr: u64, input_len: u64, out_ptr: u64);
	unsafe fn hash_blake2_128(&mut self, input_ptr: u64, input_len: u64, out_ptr: u64);
	unsafe fn return_data_size(&mut self) -> u64;
	unsafe fn return_data_copy(&mut self, out_ptr: u64, offset_and_capacity: u64) -> u64;
	unsafe fn set_immutable_data(&mut self, ptr: u64, len: u64);
	unsafe fn get_immutable_data(&mut self, out_ptr: u64, out_capacity: u64) -> u64;
	unsafe fn is_contract(&mut self, address_ptr: u64) -> u64;
	unsafe fn code_hash(&mut self, address_ptr: u64, out_ptr: u64);
	unsafe fn code_size(&mut self, address_ptr: u64) -> u64;
	unsafe fn own_code_hash(&mut self, out_ptr: u64);
	unsafe fn set_code_hash(&mut self, code_hash_ptr: u64) -> u64;
	unsafe fn caller_is_origin(&mut self) -> u64;
	unsafe fn caller_is_root(&mut self) -> u64;
	unsafe fn call_chain_extension(
		&mut self,
		id: u64,
		input_ptr: u64,
		input_len: u64,
		out_ptr: u64,
		out_capacity: u64,
	) -> u64;
	unsafe fn debug_message(&mut self, str_ptr: u64, str_len: u64) -> u64;
	unsafe fn instantiation_nonce(&mut self) -> u64;
}

/// The arguments of `call`, passed by pointer because they exceed the argument registers.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CallArgs {
	pub flags: u64,
	pub callee: u64,
	pub ref_time_limit: u64,
	pub proof_size_limit: u64,
	pub deposit_limit: u64,
	pub value: u64,
	pub input: u64,
	pub input_len: u64,
	pub output: u64,
	pub output_capacity: u64,
}

/// The arguments of `instantiate`, passed by pointer because they exceed the argument registers.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct InstantiateArgs {
	pub code_hash: u64,
	pub ref_time_limit: u64,
	pub proof_size_limit: u64,
	pub deposit_limit: u64,
	pub value: u64,
	pub input: u64,
	pub input_len: u64,
	pub address: u64,
	pub output: u64,
	pub output_capacity: u64,
	pub salt: u64,
}

/// Descriptors of every function in [`Imports`].
pub const IMPORTS: [HostCall; 44] = host_calls! {
	input(OutPtr, Packed) -> Packed, Read;
	seal_return(Scalar, Ptr, Len) -> Diverges, Control;
	set_storage(Scalar, Ptr, Len, Ptr, Len) -> Packed, Mutate;
	clear_storage(Scalar, Ptr, Len) -> Packed, Mutate;
	get_storage(Scalar, Ptr, Len, OutPtr, Scalar) -> Packed, Read;
	contains_storage(Scalar, Ptr, Len) -> Packed, Read;
	take_storage(Scalar, Ptr, Len, OutPtr, Scalar) -> Packed, Mutate;
	transfer(Ptr, Ptr) -> Packed, Mutate;
	call(Ptr) -> Packed, Control;
	delegate_call(Scalar, Ptr, Ptr, Len, OutPtr, Scalar) -> Packed, Control;
	instantiate(Ptr) -> Packed, Control;
	terminate(Ptr) -> Diverges, Control;
	caller(OutPtr) -> Void, Read;
	origin(OutPtr) -> Void, Read;
	address(OutPtr) -> Void, Read;
	balance(OutPtr) -> Void, Read;
	balance_of(Ptr, OutPtr) -> Void, Read;
	value_transferred(OutPtr) -> Void, Read;
	minimum_balance(OutPtr) -> Void, Read;
	weight_to_fee(Scalar, Scalar, OutPtr) -> Void, Read;
	gas_left() -> Scalar, Read;
	now() -> Scalar, Read;
	block_number() -> Scalar, Read;
	block_hash(Scalar, OutPtr) -> Void, Read;
	chain_id() -> Scalar, Read;
	deposit_event(Ptr, Scalar, Ptr, Len) -> Void, Mutate;
	hash_sha2_256(Ptr, Len, OutPtr) -> Void, Read;
	hash_keccak_256(Ptr, Len, OutPtr) -> Void, Read;
	hash_blake2_256(Ptr, Len, OutPtr) -> Void, Read;
	hash_blake2_128(Ptr, Len, OutPtr) -> Void, Read;
	return_data_size() -> Scalar, Read;
	return_data_copy(OutPtr, Packed) -> Packed, Read;
	set_immutable_data(Ptr, Len) -> Void, Mutate;
	get_immutable_data(OutPtr, Scalar) -> Packed, Read;
	is_contract(Ptr) -> Scalar, Read;
	code_hash(Ptr, OutPtr) -> Void, Read;
	code_size(Ptr) -> Scalar, Read;
	own_code_hash(OutPtr) -> Void, Read;
	set_code_hash(Ptr) -> Packed, Mutate;
	caller_is_origin() -> Scalar, Read;
	caller_is_root() -> Scalar, Read;
	call_chain_extension(Scalar, Ptr, Len, OutPtr, Scalar) -> Packed, Mutate;
	debug_message(Ptr, Len) -> Packed, Mutate;
	instantiation_nonce() -> Scalar, Read;
};
