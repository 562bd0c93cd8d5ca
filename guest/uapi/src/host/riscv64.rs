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

//! The `v1` import block of the PolkaVM host on 64-bit targets.

use super::PolkaVm;
use crate::abi::v1::Imports;

mod sys {
	#[polkavm_derive::polkavm_define_abi]
	mod abi {}

	#[polkavm_derive::polkavm_import(abi = self::abi)]
	extern "C" {
		pub fn input(out_ptr: u64, offset_and_capacity: u64) -> u64;
		pub fn seal_return(flags: u64, data_ptr: u64, data_len: u64);
		pub fn set_storage(
			flags: u64,
			key_ptr: u64,
			key_len: u64,
			value_ptr: u64,
			value_len: u64,
		) -> u64;
		pub fn clear_storage(flags: u64, key_ptr: u64, key_len: u64) -> u64;
		pub fn get_storage(
			flags: u64,
			key_ptr: u64,
			key_len: u64,
			out_ptr: u64,
			out_capacity: u64,
		) -> u64;
		pub fn contains_storage(flags: u64, key_ptr: u64, key_len: u64) -> u64;
		pub fn take_storage(
			flags: u64,
			key_ptr: u64,
			key_len: u64,
			out_ptr: u64,
			out_capacity: u64,
		) -> u64;
		pub fn transfer(address_ptr: u64, value_ptr: u64) -> u64;
		pub fn call(args_ptr: u64) -> u64;
		pub fn delegate_call(
			flags: u64,
			code_hash_ptr: u64,
			input_data_ptr: u64,
			input_data_len: u64,
			out_ptr: u64,
			out_capacity: u64,
		) -> u64;
		pub fn instantiate(args_ptr: u64) -> u64;
		pub fn terminate(beneficiary_ptr: u64);
		pub fn caller(out_ptr: u64);
		pub fn origin(out_ptr: u64);
		pub fn address(out_ptr: u64);
		pub fn balance(out_ptr: u64);
		pub fn balance_of(address_ptr: u64, out_ptr: u64);
		pub fn value_transferred(out_ptr: u64);
		pub fn minimum_balance(out_ptr: u64);
		pub fn weight_to_fee(ref_time: u64, proof_size: u64, out_ptr: u64);
		pub fn gas_left() -> u64;
		pub fn now() -> u64;
		pub fn block_number() -> u64;
		pub fn block_hash(block_number: u64, out_ptr: u64);
		pub fn chain_id() -> u64;
		pub fn deposit_event(topics_ptr: u64, num_topics: u64, data_ptr: u64, data_len: u64);
		pub fn hash_sha2_256(input_ptr: u64, input_len: u64, out_ptr: u64);
		pub fn hash_keccak_256(input_ptr: u64, input_len: u64, out_ptr: u64);
		pub fn hash_blake2_256(input_ptr: u64, input_len: u64, out_ptr: u64);
		pub fn hash_blake2_128(input_ptr: u64, input_len: u64, out_ptr: u64);
		pub fn return_data_size() -> u64;
		pub fn return_data_copy(out_ptr: u64, offset_and_capacity: u64) -> u64;
		pub fn set_immutable_data(ptr: u64, len: u64);
		pub fn get_immutable_data(out_ptr: u64, out_capacity: u64) -> u64;
		pub fn is_contract(address_ptr: u64) -> u64;
		pub fn code_hash(address_ptr: u64, out_ptr: u64);
		pub fn code_size(address_ptr: u64) -> u64;
		pub fn own_code_hash(out_ptr: u64);
		pub fn set_code_hash(code_hash_ptr: u64) -> u64;
		pub fn caller_is_origin() -> u64;
		pub fn caller_is_root() -> u64;
		pub fn call_chain_extension(
			id: u64,
			input_ptr: u64,
			input_len: u64,
			out_ptr: u64,
			out_capacity: u64,
		) -> u64;
		pub fn debug_message(str_ptr: u64, str_len: u64) -> u64;
		pub fn instantiation_nonce() -> u64;
	}
}

impl Imports for PolkaVm {
	unsafe fn input(&mut self, out_ptr: u64, offset_and_capacity: u64) -> u64 {
		sys::input(out_ptr, offset_and_capacity)
	}

	unsafe fn seal_return(&mut self, flags: u64, data_ptr: u64, data_len: u64) {
		sys::seal_return(flags, data_ptr, data_len)
	}

	unsafe fn set_storage(
		&mut self,
		flags: u64,
		key_ptr: u64,
		key_len: u64,
		value_ptr: u64,
		value_len: u64,
	) -> u64 {
		sys::set_storage(flags, key_ptr, key_len, value_ptr, value_len)
	}

	unsafe fn clear_storage(&mut self, flags: u64, key_ptr: u64, key_len: u64) -> u64 {
		sys::clear_storage(flags, key_ptr, key_len)
	}

	unsafe fn get_storage(
		&mut self,
		flags: u64,
		key_ptr: u64,
		key_len: u64,
		out_ptr: u64,
		out_capacity: u64,
	) -> u64 {
		sys::get_storage(flags, key_ptr, key_len, out_ptr, out_capacity)
	}

	unsafe fn contains_storage(&mut self, flags: u64, key_ptr: u64, key_len: u64) -> u64 {
		sys::contains_storage(flags, key_ptr, key_len)
	}

	unsafe fn take_storage(
		&mut self,
		flags: u64,
		key_ptr: u64,
		key_len: u64,
		out_ptr: u64,
		out_capacity: u64,
	) -> u64 {
		sys::take_storage(flags, key_ptr, key_len, out_ptr, out_capacity)
	}

	unsafe fn transfer(&mut self, address_ptr: u64, value_ptr: u64) -> u64 {
		sys::transfer(address_ptr, value_ptr)
	}

	unsafe fn call(&mut self, args_ptr: u64) -> u64 {
		sys::call(args_ptr)
	}

	unsafe fn delegate_call(
		&mut self,
		flags: u64,
		code_hash_ptr: u64,
		input_data_ptr: u64,
		input_data_len: u64,
		out_ptr: u64,
		out_capacity: u64,
	) -> u64 {
		sys::delegate_call(
			flags,
			code_hash_ptr,
			input_data_ptr,
			input_data_len,
			out_ptr,
			out_capacity,
		)
	}

	unsafe fn instantiate(&mut self, args_ptr: u64) -> u64 {
		sys::instantiate(args_ptr)
	}

	unsafe fn terminate(&mut self, beneficiary_ptr: u64) {
		sys::terminate(beneficiary_ptr)
	}

	unsafe fn caller(&mut self, out_ptr: u64) {
		sys::caller(out_ptr)
	}

	unsafe fn origin(&mut self, out_ptr: u64) {
		sys::origin(out_ptr)
	}

	unsafe fn address(&mut self, out_ptr: u64) {
		sys::address(out_ptr)
	}

	unsafe fn balance(&mut self, out_ptr: u64) {
		sys::balance(out_ptr)
	}

	unsafe fn balance_of(&mut self, address_ptr: u64, out_ptr: u64) {
		sys::balance_of(address_ptr, out_ptr)
	}

	unsafe fn value_transferred(&mut self, out_ptr: u64) {
		sys::value_transferred(out_ptr)
	}

	unsafe fn minimum_balance(&mut self, out_ptr: u64) {
		sys::minimum_balance(out_ptr)
	}

	unsafe fn weight_to_fee(&mut self, ref_time: u64, proof_size: u64, out_ptr: u64) {
		sys::weight_to_fee(ref_time, proof_size, out_ptr)
	}

	unsafe fn gas_left(&mut self) -> u64 {
		sys::gas_left()
	}

	unsafe fn now(&mut self) -> u64 {
		sys::now()
	}

	unsafe fn block_number(&mut self) -> u64 {
		sys::block_number()
	}

	unsafe fn block_hash(&mut self, block_number: u64, out_ptr: u64) {
		sys::block_hash(block_number, out_ptr)
	}

	unsafe fn chain_id(&mut self) -> u64 {
		sys::chain_id()
	}

	unsafe fn deposit_event(
		&mut self,
		topics_ptr: u64,
		num_topics: u64,
		data_ptr: u64,
		data_len: u64,
	) {
		sys::deposit_event(topics_ptr, num_topics, data_ptr, data_len)
	}

	unsafe fn hash_sha2_256(&mut self, input_ptr: u64, input_len: u64, out_ptr: u64) {
		sys::hash_sha2_256(input_ptr, input_len, out_ptr)
	}

	unsafe fn hash_keccak_256(&mut self, input_ptr: u64, input_len: u64, out_ptr: u64) {
		sys::hash_keccak_256(input_ptr, input_len, out_ptr)
	}

	unsafe fn hash_blake2_256(&mut self, input_ptr: u64, input_len: u64, out_ptr: u64) {
		sys::hash_blake2_256(input_ptr, input_len, out_ptr)
	}

	unsafe fn hash_blake2_128(&mut self, input_ptr: u64, input_len: u64, out_ptr: u64) {
		sys::hash_blake2_128(input_ptr, input_len, out_ptr)
	}

	unsafe fn return_data_size(&mut self) -> u64 {
		sys::return_data_size()
	}

	unsafe fn return_data_copy(&mut self, out_ptr: u64, offset_and_capacity: u64) -> u64 {
		sys::return_data_copy(out_ptr, offset_and_capacity)
	}

	unsafe fn set_immutable_data(&mut self, ptr: u64, len: u64) {
		sys::set_immutable_data(ptr, len)
	}

	unsafe fn get_immutable_data(&mut self, out_ptr: u64, out_capacity: u64) -> u64 {
		sys::get_immutable_data(out_ptr, out_capacity)
	}

	unsafe fn is_contract(&mut self, address_ptr: u64) -> u64 {
		sys::is_contract(address_ptr)
	}

	unsafe fn code_hash(&mut self, address_ptr: u64, out_ptr: u64) {
		sys::code_hash(address_ptr, out_ptr)
	}

	unsafe fn code_size(&mut self, address_ptr: u64) -> u64 {
		sys::code_size(address_ptr)
	}

	unsafe fn own_code_hash(&mut self, out_ptr: u64) {
		sys::own_code_hash(out_ptr)
	}

	unsafe fn set_code_hash(&mut self, code_hash_ptr: u64) -> u64 {
		sys::set_code_hash(code_hash_ptr)
	}

	unsafe fn caller_is_origin(&mut self) -> u64 {
		sys::caller_is_origin()
	}

	unsafe fn caller_is_root(&mut self) -> u64 {
		sys::caller_is_root()
	}

	unsafe fn call_chain_extension(
		&mut self,
		id: u64,
		input_ptr: u64,
		input_len: u64,
		out_ptr: u64,
		out_capacity: u64,
	) -> u64 {
		sys::call_chain_extension(id, input_ptr, input_len, out_ptr, out_capacity)
	}

	unsafe fn debug_message(&mut self, str_ptr: u64, str_len: u64) -> u64 {
		sys::debug_message(str_ptr, str_len)
	}

	unsafe fn instantiation_nonce(&mut self) -> u64 {
		sys::instantiation_nonce()
	}
}
