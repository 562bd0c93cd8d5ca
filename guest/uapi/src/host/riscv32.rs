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

//! The `seal` import block of the PolkaVM host on 32-bit targets.

use super::PolkaVm;
use crate::abi::seal::{CallArgs, Imports, InstantiateArgs};

mod sys {
	#[polkavm_derive::polkavm_define_abi]
	mod abi {}

	#[polkavm_derive::polkavm_import(abi = self::abi)]
	extern "C" {
		pub fn input(out_ptr: *mut u8, out_len_ptr: *mut u32);
		pub fn seal_return(flags: u32, data_ptr: *const u8, data_len: u32);
		pub fn set_storage(
			flags: u32,
			key_ptr: *const u8,
			key_len: u32,
			value_ptr: *const u8,
			value_len: u32,
		) -> u32;
		pub fn clear_storage(flags: u32, key_ptr: *const u8, key_len: u32) -> u32;
		pub fn get_storage(
			flags: u32,
			key_ptr: *const u8,
			key_len: u32,
			out_ptr: *mut u8,
			out_len_ptr: *mut u32,
		) -> u32;
		pub fn contains_storage(flags: u32, key_ptr: *const u8, key_len: u32) -> u32;
		pub fn take_storage(
			flags: u32,
			key_ptr: *const u8,
			key_len: u32,
			out_ptr: *mut u8,
			out_len_ptr: *mut u32,
		) -> u32;
		pub fn transfer(address_ptr: *const u8, value_ptr: *const u8) -> u32;
		pub fn call(args_ptr: *const u8) -> u32;
		pub fn delegate_call(
			flags: u32,
			code_hash_ptr: *const u8,
			input_data_ptr: *const u8,
			input_data_len: u32,
			out_ptr: *mut u8,
			out_len_ptr: *mut u32,
		) -> u32;
		pub fn instantiate(args_ptr: *const u8) -> u32;
		pub fn terminate(beneficiary_ptr: *const u8);
		pub fn caller(out_ptr: *mut u8);
		pub fn origin(out_ptr: *mut u8);
		pub fn address(out_ptr: *mut u8);
		pub fn balance(out_ptr: *mut u8);
		pub fn balance_of(address_ptr: *const u8, out_ptr: *mut u8);
		pub fn value_transferred(out_ptr: *mut u8);
		pub fn minimum_balance(out_ptr: *mut u8);
		pub fn weight_to_fee(
			ref_time_lo: u32,
			ref_time_hi: u32,
			proof_size_lo: u32,
			proof_size_hi: u32,
			out_ptr: *mut u8,
		);
		pub fn gas_left(out_ptr: *mut u8, out_len_ptr: *mut u32);
		pub fn now(out_ptr: *mut u8);
		pub fn block_number(out_ptr: *mut u8);
		pub fn block_hash(block_number_ptr: *const u8, out_ptr: *mut u8);
		pub fn chain_id(out_ptr: *mut u8);
		pub fn deposit_event(
			topics_ptr: *const [u8; 32],
			num_topics: u32,
			data_ptr: *const u8,
			data_len: u32,
		);
		pub fn hash_sha2_256(input_ptr: *const u8, input_len: u32, out_ptr: *mut u8);
		pub fn hash_keccak_256(input_ptr: *const u8, input_len: u32, out_ptr: *mut u8);
		pub fn hash_blake2_256(input_ptr: *const u8, input_len: u32, out_ptr: *mut u8);
		pub fn hash_blake2_128(input_ptr: *const u8, input_len: u32, out_ptr: *mut u8);
		pub fn return_data_size(out_ptr: *mut u8);
		pub fn return_data_copy(out_ptr: *mut u8, out_len_ptr: *mut u32, offset: u32);
		pub fn set_immutable_data(ptr: *const u8, len: u32);
		pub fn get_immutable_data(out_ptr: *mut u8, out_len_ptr: *mut u32);
		pub fn is_contract(address_ptr: *const u8) -> u32;
		pub fn code_hash(address_ptr: *const u8, out_ptr: *mut u8);
		pub fn code_size(address_ptr: *const u8) -> u32;
		pub fn own_code_hash(out_ptr: *mut u8);
		pub fn set_code_hash(code_hash_ptr: *const u8) -> u32;
		pub fn caller_is_origin() -> u32;
		pub fn caller_is_root() -> u32;
		pub fn call_chain_extension(
			id: u32,
			input_ptr: *const u8,
			input_len: u32,
			out_ptr: *mut u8,
			out_len_ptr: *mut u32,
		) -> u32;
		pub fn debug_message(str_ptr: *const u8, str_len: u32) -> u32;
		pub fn instantiation_nonce() -> u64;
	}
}

impl Imports for PolkaVm {
	unsafe fn input(&mut self, out_ptr: *mut u8, out_len_ptr: *mut u32) {
		sys::input(out_ptr, out_len_ptr)
	}

	unsafe fn seal_return(&mut self, flags: u32, data_ptr: *const u8, data_len: u32) {
		sys::seal_return(flags, data_ptr, data_len)
	}

	unsafe fn set_storage(
		&mut self,
		flags: u32,
		key_ptr: *const u8,
		key_len: u32,
		value_ptr: *const u8,
		value_len: u32,
	) -> u32 {
		sys::set_storage(flags, key_ptr, key_len, value_ptr, value_len)
	}

	unsafe fn clear_storage(&mut self, flags: u32, key_ptr: *const u8, key_len: u32) -> u32 {
		sys::clear_storage(flags, key_ptr, key_len)
	}

	unsafe fn get_storage(
		&mut self,
		flags: u32,
		key_ptr: *const u8,
		key_len: u32,
		out_ptr: *mut u8,
		out_len_ptr: *mut u32,
	) -> u32 {
		sys::get_storage(flags, key_ptr, key_len, out_ptr, out_len_ptr)
	}

	unsafe fn contains_storage(&mut self, flags: u32, key_ptr: *const u8, key_len: u32) -> u32 {
		sys::contains_storage(flags, key_ptr, key_len)
	}

	unsafe fn take_storage(
		&mut self,
		flags: u32,
		key_ptr: *const u8,
		key_len: u32,
		out_ptr: *mut u8,
		out_len_ptr: *mut u32,
	) -> u32 {
		sys::take_storage(flags, key_ptr, key_len, out_ptr, out_len_ptr)
	}

	unsafe fn transfer(&mut self, address_ptr: *const u8, value_ptr: *const u8) -> u32 {
		sys::transfer(address_ptr, value_ptr)
	}

	unsafe fn call(&mut self, args_ptr: *const CallArgs) -> u32 {
		sys::call(args_ptr as *const u8)
	}

	unsafe fn delegate_call(
		&mut self,
		flags: u32,
		code_hash_ptr: *const u8,
		input_data_ptr: *const u8,
		input_data_len: u32,
		out_ptr: *mut u8,
		out_len_ptr: *mut u32,
	) -> u32 {
		sys::delegate_call(
			flags,
			code_hash_ptr,
			input_data_ptr,
			input_data_len,
			out_ptr,
			out_len_ptr,
		)
	}

	unsafe fn instantiate(&mut self, args_ptr: *const InstantiateArgs) -> u32 {
		sys::instantiate(args_ptr as *const u8)
	}

	unsafe fn terminate(&mut self, beneficiary_ptr: *const u8) {
		sys::terminate(beneficiary_ptr)
	}

	unsafe fn caller(&mut self, out_ptr: *mut u8) {
		sys::caller(out_ptr)
	}

	unsafe fn origin(&mut self, out_ptr: *mut u8) {
		sys::origin(out_ptr)
	}

	unsafe fn address(&mut self, out_ptr: *mut u8) {
		sys::address(out_ptr)
	}

	unsafe fn balance(&mut self, out_ptr: *mut u8) {
		sys::balance(out_ptr)
	}

	unsafe fn balance_of(&mut self, address_ptr: *const u8, out_ptr: *mut u8) {
		sys::balance_of(address_ptr, out_ptr)
	}

	unsafe fn value_transferred(&mut self, out_ptr: *mut u8) {
		sys::value_transferred(out_ptr)
	}

	unsafe fn minimum_balance(&mut self, out_ptr: *mut u8) {
		sys::minimum_balance(out_ptr)
	}

	unsafe fn weight_to_fee(
		&mut self,
		ref_time_lo: u32,
		ref_time_hi: u32,
		proof_size_lo: u32,
		proof_size_hi: u32,
		out_ptr: *mut u8,
	) {
		sys::weight_to_fee(ref_time_lo, ref_time_hi, proof_size_lo, proof_size_hi, out_ptr)
	}

	unsafe fn gas_left(&mut self, out_ptr: *mut u8, out_len_ptr: *mut u32) {
		sys::gas_left(out_ptr, out_len_ptr)
	}

	unsafe fn now(&mut self, out_ptr: *mut u8) {
		sys::now(out_ptr)
	}

	unsafe fn block_number(&mut self, out_ptr: *mut u8) {
		sys::block_number(out_ptr)
	}

	unsafe fn block_hash(&mut self, block_number_ptr: *const u8, out_ptr: *mut u8) {
		sys::block_hash(block_number_ptr, out_ptr)
	}

	unsafe fn chain_id(&mut self, out_ptr: *mut u8) {
		sys::chain_id(out_ptr)
	}

	unsafe fn deposit_event(
		&mut self,
		topics_ptr: *const [u8; 32],
		num_topics: u32,
		data_ptr: *const u8,
		data_len: u32,
	) {
		sys::deposit_event(topics_ptr, num_topics, data_ptr, data_len)
	}

	unsafe fn hash_sha2_256(&mut self, input_ptr: *const u8, input_len: u32, out_ptr: *mut u8) {
		sys::hash_sha2_256(input_ptr, input_len, out_ptr)
	}

	unsafe fn hash_keccak_256(&mut self, input_ptr: *const u8, input_len: u32, out_ptr: *mut u8) {
		sys::hash_keccak_256(input_ptr, input_len, out_ptr)
	}

	unsafe fn hash_blake2_256(&mut self, input_ptr: *const u8, input_len: u32, out_ptr: *mut u8) {
		sys::hash_blake2_256(input_ptr, input_len, out_ptr)
	}

	unsafe fn hash_blake2_128(&mut self, input_ptr: *const u8, input_len: u32, out_ptr: *mut u8) {
		sys::hash_blake2_128(input_ptr, input_len, out_ptr)
	}

	unsafe fn return_data_size(&mut self, out_ptr: *mut u8) {
		sys::return_data_size(out_ptr)
	}

	unsafe fn return_data_copy(&mut self, out_ptr: *mut u8, out_len_ptr: *mut u32, offset: u32) {
		sys::return_data_copy(out_ptr, out_len_ptr, offset)
	}

	unsafe fn set_immutable_data(&mut self, ptr: *const u8, len: u32) {
		sys::set_immutable_data(ptr, len)
	}

	unsafe fn get_immutable_data(&mut self, out_ptr: *mut u8, out_len_ptr: *mut u32) {
		sys::get_immutable_data(out_ptr, out_len_ptr)
	}

	unsafe fn is_contract(&mut self, address_ptr: *const u8) -> u32 {
		sys::is_contract(address_ptr)
	}

	unsafe fn code_hash(&mut self, address_ptr: *const u8, out_ptr: *mut u8) {
		sys::code_hash(address_ptr, out_ptr)
	}

	unsafe fn code_size(&mut self, address_ptr: *const u8) -> u32 {
		sys::code_size(address_ptr)
	}

	unsafe fn own_code_hash(&mut self, out_ptr: *mut u8) {
		sys::own_code_hash(out_ptr)
	}

	unsafe fn set_code_hash(&mut self, code_hash_ptr: *const u8) -> u32 {
		sys::set_code_hash(code_hash_ptr)
	}

	unsafe fn caller_is_origin(&mut self) -> u32 {
		sys::caller_is_origin()
	}

	unsafe fn caller_is_root(&mut self) -> u32 {
		sys::caller_is_root()
	}

	unsafe fn call_chain_extension(
		&mut self,
		id: u32,
		input_ptr: *const u8,
		input_len: u32,
		out_ptr: *mut u8,
		out_len_ptr: *mut u32,
	) -> u32 {
		sys::call_chain_extension(id, input_ptr, input_len, out_ptr, out_len_ptr)
	}

	unsafe fn debug_message(&mut self, str_ptr: *const u8, str_len: u32) -> u32 {
		sys::debug_message(str_ptr, str_len)
	}

	unsafe fn instantiation_nonce(&mut self) -> u64 {
		sys::instantiation_nonce()
	}
}
