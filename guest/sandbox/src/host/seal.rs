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

//! The `seal` import table of the simulated host.

use super::{u256_bytes, HostState, MockHost};
use crate::memory::Memory;
use revive_guest_uapi::{
	abi::{
		self,
		seal::{CallArgs, Imports, InstantiateArgs},
	},
	ReturnErrorCode,
};

/// Whether the callee output is copied back for `code`.
fn returns_output(code: ReturnErrorCode) -> bool {
	matches!(code, ReturnErrorCode::Success | ReturnErrorCode::CalleeReverted)
}

impl Imports for MockHost {
	unsafe fn input(&mut self, out_ptr: *mut u8, out_len_ptr: *mut u32) {
		self.with("input", |state, memory| {
			let input = state.input()?;
			memory.write_sandbox_output(out_ptr as _, out_len_ptr as _, &input, false)?;
			Ok(())
		})
	}

	unsafe fn seal_return(&mut self, flags: u32, data_ptr: *const u8, data_len: u32) {
		match self.with("seal_return", |state, memory| {
			state.seal_return(memory, flags, data_ptr as _, data_len)
		}) {}
	}

	unsafe fn set_storage(
		&mut self,
		flags: u32,
		key_ptr: *const u8,
		key_len: u32,
		value_ptr: *const u8,
		value_len: u32,
	) -> u32 {
		self.with("set_storage", |state, memory| {
			state.set_storage(memory, flags, key_ptr as _, key_len, value_ptr as _, value_len)
		})
	}

	unsafe fn clear_storage(&mut self, flags: u32, key_ptr: *const u8, key_len: u32) -> u32 {
		self.with("clear_storage", |state, memory| {
			state.clear_storage(memory, flags, key_ptr as _, key_len)
		})
	}

	unsafe fn get_storage(
		&mut self,
		flags: u32,
		key_ptr: *const u8,
		key_len: u32,
		out_ptr: *mut u8,
		out_len_ptr: *mut u32,
	) -> u32 {
		self.with("get_storage", |state, memory| {
			let Some(value) = state.get_storage(memory, flags, key_ptr as _, key_len)? else {
				return Ok(ReturnErrorCode::KeyNotFound.into())
			};
			memory.write_sandbox_output(out_ptr as _, out_len_ptr as _, &value, false)?;
			Ok(ReturnErrorCode::Success.into())
		})
	}

	unsafe fn contains_storage(&mut self, flags: u32, key_ptr: *const u8, key_len: u32) -> u32 {
		self.with("contains_storage", |state, memory| {
			state.contains_storage(memory, flags, key_ptr as _, key_len)
		})
	}

	unsafe fn take_storage(
		&mut self,
		flags: u32,
		key_ptr: *const u8,
		key_len: u32,
		out_ptr: *mut u8,
		out_len_ptr: *mut u32,
	) -> u32 {
		self.with("take_storage", |state, memory| {
			let Some(value) = state.take_storage(memory, flags, key_ptr as _, key_len)? else {
				return Ok(ReturnErrorCode::KeyNotFound.into())
			};
			memory.write_sandbox_output(out_ptr as _, out_len_ptr as _, &value, false)?;
			Ok(ReturnErrorCode::Success.into())
		})
	}

	unsafe fn transfer(&mut self, address_ptr: *const u8, value_ptr: *const u8) -> u32 {
		self.with("transfer", |state, memory| {
			Ok(state.transfer(memory, address_ptr as _, value_ptr as _)?.into())
		})
	}

	unsafe fn call(&mut self, args_ptr: *const CallArgs) -> u32 {
		self.with("call", |state, memory| {
			let args: CallArgs = memory.read_struct(args_ptr as _)?;
			let (code, output) = state.call(
				memory,
				args.flags,
				args.callee as _,
				args.deposit_limit as _,
				args.value as _,
				args.input as _,
				args.input_len,
			)?;
			if returns_output(code) {
				memory.write_sandbox_output(args.output as _, args.output_len as _, &output, true)?;
			}
			Ok(code.into())
		})
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
		self.with("delegate_call", |state, memory| {
			let (code, output) = state.delegate_call(
				memory,
				flags,
				code_hash_ptr as _,
				input_data_ptr as _,
				input_data_len,
			)?;
			if returns_output(code) {
				memory.write_sandbox_output(out_ptr as _, out_len_ptr as _, &output, true)?;
			}
			Ok(code.into())
		})
	}

	unsafe fn instantiate(&mut self, args_ptr: *const InstantiateArgs) -> u32 {
		self.with("instantiate", |state, memory| {
			let args: InstantiateArgs = memory.read_struct(args_ptr as _)?;
			let (code, address, output) = state.instantiate(
				memory,
				args.code_hash as _,
				args.deposit_limit as _,
				args.value as _,
				args.input as _,
				args.input_len,
				args.salt as _,
			)?;
			if let Some(address) = address {
				memory.write_fixed_sandbox_output(args.address as _, &address, true)?;
			}
			if returns_output(code) {
				memory.write_sandbox_output(args.output as _, args.output_len as _, &output, true)?;
			}
			Ok(code.into())
		})
	}

	unsafe fn terminate(&mut self, beneficiary_ptr: *const u8) {
		match self.with("terminate", |state, memory| {
			state.terminate(memory, beneficiary_ptr as _)
		}) {}
	}

	unsafe fn caller(&mut self, out_ptr: *mut u8) {
		self.with("caller", |state, memory| {
			Ok(memory.write_fixed_sandbox_output(out_ptr as _, &state.config.caller, false)?)
		})
	}

	unsafe fn address(&mut self, out_ptr: *mut u8) {
		self.with("address", |state, memory| {
			Ok(memory.write_fixed_sandbox_output(out_ptr as _, &state.config.address, false)?)
		})
	}

	unsafe fn origin(&mut self, out_ptr: *mut u8) {
		self.with("origin", |state, memory| {
			Ok(memory.write_fixed_sandbox_output(out_ptr as _, &state.config.origin, false)?)
		})
	}

	unsafe fn balance(&mut self, out_ptr: *mut u8) {
		self.with("balance", |state, memory| {
			Ok(memory.write_fixed_sandbox_output(out_ptr as _, &state.balance(), false)?)
		})
	}

	unsafe fn balance_of(&mut self, address_ptr: *const u8, out_ptr: *mut u8) {
		self.with("balance_of", |state, memory| {
			let balance = state.balance_of(memory, address_ptr as _)?;
			Ok(memory.write_fixed_sandbox_output(out_ptr as _, &balance, false)?)
		})
	}

	unsafe fn value_transferred(&mut self, out_ptr: *mut u8) {
		self.with("value_transferred", |state, memory| {
			Ok(memory.write_fixed_sandbox_output(out_ptr as _, &state.value_transferred(), false)?)
		})
	}

	unsafe fn minimum_balance(&mut self, out_ptr: *mut u8) {
		self.with("minimum_balance", |state, memory| {
			Ok(memory.write_fixed_sandbox_output(out_ptr as _, &state.minimum_balance(), false)?)
		})
	}

	unsafe fn weight_to_fee(
		&mut self,
		ref_time_lo: u32,
		ref_time_hi: u32,
		proof_size_lo: u32,
		proof_size_hi: u32,
		out_ptr: *mut u8,
	) {
		let ref_time = abi::join(ref_time_lo, ref_time_hi);
		let proof_size = abi::join(proof_size_lo, proof_size_hi);
		self.with("weight_to_fee", |state, memory| {
			let fee = state.weight_to_fee(ref_time, proof_size);
			Ok(memory.write_fixed_sandbox_output(out_ptr as _, &fee, false)?)
		})
	}

	unsafe fn gas_left(&mut self, out_ptr: *mut u8, out_len_ptr: *mut u32) {
		self.with("gas_left", |state, memory| {
			let gas = state.config.gas_limit.to_le_bytes();
			Ok(memory.write_sandbox_output(out_ptr as _, out_len_ptr as _, &gas, false)?)
		})
	}

	unsafe fn now(&mut self, out_ptr: *mut u8) {
		self.with("now", |state, memory| {
			let now = u256_bytes(state.config.timestamp.into());
			Ok(memory.write_fixed_sandbox_output(out_ptr as _, &now, false)?)
		})
	}

	unsafe fn block_number(&mut self, out_ptr: *mut u8) {
		self.with("block_number", |state, memory| {
			let block_number = u256_bytes(state.config.block_number.into());
			Ok(memory.write_fixed_sandbox_output(out_ptr as _, &block_number, false)?)
		})
	}

	unsafe fn block_hash(&mut self, block_number_ptr: *const u8, out_ptr: *mut u8) {
		self.with("block_hash", |state, memory| {
			let number: [u8; 32] = memory.read_array(block_number_ptr as _)?;
			let mut low = [0u8; 8];
			low.copy_from_slice(&number[..8]);
			let block_number =
				number[8..].iter().all(|b| *b == 0).then(|| u64::from_le_bytes(low));
			Ok(memory.write_fixed_sandbox_output(
				out_ptr as _,
				&state.block_hash(block_number),
				false,
			)?)
		})
	}

	unsafe fn chain_id(&mut self, out_ptr: *mut u8) {
		self.with("chain_id", |state, memory| {
			let chain_id = u256_bytes(state.config.chain_id.into());
			Ok(memory.write_fixed_sandbox_output(out_ptr as _, &chain_id, false)?)
		})
	}

	unsafe fn deposit_event(
		&mut self,
		topics_ptr: *const [u8; 32],
		num_topics: u32,
		data_ptr: *const u8,
		data_len: u32,
	) {
		self.with("deposit_event", |state, memory| {
			state.deposit_event(memory, topics_ptr as _, num_topics, data_ptr as _, data_len)
		})
	}

	unsafe fn hash_sha2_256(&mut self, input_ptr: *const u8, input_len: u32, out_ptr: *mut u8) {
		self.with("hash_sha2_256", |_, memory| {
			HostState::compute_hash_on_intermediate_buffer(
				memory,
				sp_crypto_hashing::sha2_256,
				input_ptr as _,
				input_len,
				out_ptr as _,
			)
		})
	}

	unsafe fn hash_keccak_256(&mut self, input_ptr: *const u8, input_len: u32, out_ptr: *mut u8) {
		self.with("hash_keccak_256", |_, memory| {
			HostState::compute_hash_on_intermediate_buffer(
				memory,
				sp_crypto_hashing::keccak_256,
				input_ptr as _,
				input_len,
				out_ptr as _,
			)
		})
	}

	unsafe fn hash_blake2_256(&mut self, input_ptr: *const u8, input_len: u32, out_ptr: *mut u8) {
		self.with("hash_blake2_256", |_, memory| {
			HostState::compute_hash_on_intermediate_buffer(
				memory,
				sp_crypto_hashing::blake2_256,
				input_ptr as _,
				input_len,
				out_ptr as _,
			)
		})
	}

	unsafe fn hash_blake2_128(&mut self, input_ptr: *const u8, input_len: u32, out_ptr: *mut u8) {
		self.with("hash_blake2_128", |_, memory| {
			HostState::compute_hash_on_intermediate_buffer(
				memory,
				sp_crypto_hashing::blake2_128,
				input_ptr as _,
				input_len,
				out_ptr as _,
			)
		})
	}

	unsafe fn return_data_size(&mut self, out_ptr: *mut u8) {
		self.with("return_data_size", |state, memory| {
			let size = u256_bytes(state.frame.return_data.len() as u128);
			Ok(memory.write_fixed_sandbox_output(out_ptr as _, &size, false)?)
		})
	}

	unsafe fn return_data_copy(&mut self, out_ptr: *mut u8, out_len_ptr: *mut u32, offset: u32) {
		self.with("return_data_copy", |state, memory| {
			let data = state.return_data_copy(offset)?;
			Ok(memory.write_sandbox_output(out_ptr as _, out_len_ptr as _, data, false)?)
		})
	}

	unsafe fn set_immutable_data(&mut self, ptr: *const u8, len: u32) {
		self.with("set_immutable_data", |state, memory| {
			state.set_immutable_data(memory, ptr as _, len)
		})
	}

	unsafe fn get_immutable_data(&mut self, out_ptr: *mut u8, out_len_ptr: *mut u32) {
		self.with("get_immutable_data", |state, memory| {
			let data = state.get_immutable_data()?;
			Ok(memory.write_sandbox_output(out_ptr as _, out_len_ptr as _, &data, false)?)
		})
	}

	unsafe fn is_contract(&mut self, address_ptr: *const u8) -> u32 {
		self.with("is_contract", |state, memory| {
			Ok(state.is_contract(memory, address_ptr as _)? as u32)
		})
	}

	unsafe fn code_hash(&mut self, address_ptr: *const u8, out_ptr: *mut u8) {
		self.with("code_hash", |state, memory| {
			let code_hash = state.code_hash(memory, address_ptr as _)?;
			Ok(memory.write_fixed_sandbox_output(out_ptr as _, &code_hash, false)?)
		})
	}

	unsafe fn code_size(&mut self, address_ptr: *const u8) -> u32 {
		self.with("code_size", |state, memory| state.code_size(memory, address_ptr as _))
	}

	unsafe fn own_code_hash(&mut self, out_ptr: *mut u8) {
		self.with("own_code_hash", |state, memory| {
			Ok(memory.write_fixed_sandbox_output(out_ptr as _, &state.own_code_hash(), false)?)
		})
	}

	unsafe fn set_code_hash(&mut self, code_hash_ptr: *const u8) -> u32 {
		self.with("set_code_hash", |state, memory| {
			Ok(state.set_code_hash(memory, code_hash_ptr as _)?.into())
		})
	}

	unsafe fn caller_is_origin(&mut self) -> u32 {
		self.with("caller_is_origin", |state, _| Ok(state.caller_is_origin() as u32))
	}

	unsafe fn caller_is_root(&mut self) -> u32 {
		self.with("caller_is_root", |state, _| Ok(state.caller_is_root() as u32))
	}

	unsafe fn call_chain_extension(
		&mut self,
		id: u32,
		input_ptr: *const u8,
		input_len: u32,
		out_ptr: *mut u8,
		out_len_ptr: *mut u32,
	) -> u32 {
		self.with("call_chain_extension", |state, memory| {
			let (ret, output) = state.call_chain_extension(memory, id, input_ptr as _, input_len)?;
			memory.write_sandbox_output(out_ptr as _, out_len_ptr as _, &output, true)?;
			Ok(ret)
		})
	}

	unsafe fn debug_message(&mut self, str_ptr: *const u8, str_len: u32) -> u32 {
		self.with("debug_message", |state, memory| {
			Ok(state.debug_message(memory, str_ptr as _, str_len)?.into())
		})
	}

	unsafe fn instantiation_nonce(&mut self) -> u64 {
		self.with("instantiation_nonce", |state, _| Ok(state.world.nonce))
	}
}
