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

//! The `v1` import table of the simulated host.
//!
//! Every word is 64 bits wide. Pointers are host addresses and lengths have to fit into 32 bits,
//! anything larger traps with [`SandboxError::ArgumentOverflow`].

use super::{HostState, MockHost};
use crate::{memory::Memory, SandboxError};
use revive_guest_uapi::{
	abi::{
		pack, unpack,
		v1::{CallArgs, Imports, InstantiateArgs},
	},
	ReturnErrorCode,
};

/// Narrow a length or flag word to the 32 bits the handlers work with.
fn narrow(value: u64) -> Result<u32, SandboxError> {
	u32::try_from(value).map_err(|_| SandboxError::ArgumentOverflow(value))
}

/// A guest pointer as a host address.
fn addr(ptr: u64) -> Result<usize, SandboxError> {
	usize::try_from(ptr).map_err(|_| SandboxError::ArgumentOverflow(ptr))
}

/// A status word without a length.
fn status(code: ReturnErrorCode) -> u64 {
	pack(code.into(), 0)
}

/// Whether the callee output is copied back for `code`.
fn returns_output(code: ReturnErrorCode) -> bool {
	matches!(code, ReturnErrorCode::Success | ReturnErrorCode::CalleeReverted)
}

/// Copy the part of `data` that starts at the offset packed into `offset_and_capacity`.
fn copy_from_offset(
	memory: &mut impl Memory,
	data: &[u8],
	out_ptr: u64,
	offset_and_capacity: u64,
) -> Result<u64, SandboxError> {
	let (offset, capacity) = unpack(offset_and_capacity);
	let tail = data.get(offset as usize..).ok_or(SandboxError::OffsetOutOfBounds(offset))?;
	let written = memory.write_capped_output(addr(out_ptr)?, capacity, tail, false)?;
	Ok(pack(ReturnErrorCode::Success.into(), written))
}

impl Imports for MockHost {
	unsafe fn input(&mut self, out_ptr: u64, offset_and_capacity: u64) -> u64 {
		self.with("input", |state, memory| {
			let input = state.input()?;
			Ok(copy_from_offset(memory, &input, out_ptr, offset_and_capacity)?)
		})
	}

	unsafe fn seal_return(&mut self, flags: u64, data_ptr: u64, data_len: u64) {
		match self.with("seal_return", |state, memory| {
			state.seal_return(memory, narrow(flags)?, addr(data_ptr)?, narrow(data_len)?)
		}) {}
	}

	unsafe fn set_storage(
		&mut self,
		flags: u64,
		key_ptr: u64,
		key_len: u64,
		value_ptr: u64,
		value_len: u64,
	) -> u64 {
		self.with("set_storage", |state, memory| {
			let previous = state.set_storage(
				memory,
				narrow(flags)?,
				addr(key_ptr)?,
				narrow(key_len)?,
				addr(value_ptr)?,
				narrow(value_len)?,
			)?;
			Ok(pack(0, previous))
		})
	}

	unsafe fn clear_storage(&mut self, flags: u64, key_ptr: u64, key_len: u64) -> u64 {
		self.with("clear_storage", |state, memory| {
			let previous =
				state.clear_storage(memory, narrow(flags)?, addr(key_ptr)?, narrow(key_len)?)?;
			Ok(pack(0, previous))
		})
	}

	unsafe fn get_storage(
		&mut self,
		flags: u64,
		key_ptr: u64,
		key_len: u64,
		out_ptr: u64,
		out_capacity: u64,
	) -> u64 {
		self.with("get_storage", |state, memory| {
			let value =
				state.get_storage(memory, narrow(flags)?, addr(key_ptr)?, narrow(key_len)?)?;
			let Some(value) = value else { return Ok(status(ReturnErrorCode::KeyNotFound)) };
			let written =
				memory.write_capped_output(addr(out_ptr)?, narrow(out_capacity)?, &value, false)?;
			Ok(pack(ReturnErrorCode::Success.into(), written))
		})
	}

	unsafe fn contains_storage(&mut self, flags: u64, key_ptr: u64, key_len: u64) -> u64 {
		self.with("contains_storage", |state, memory| {
			let len =
				state.contains_storage(memory, narrow(flags)?, addr(key_ptr)?, narrow(key_len)?)?;
			Ok(pack(0, len))
		})
	}

	unsafe fn take_storage(
		&mut self,
		flags: u64,
		key_ptr: u64,
		key_len: u64,
		out_ptr: u64,
		out_capacity: u64,
	) -> u64 {
		self.with("take_storage", |state, memory| {
			let value =
				state.take_storage(memory, narrow(flags)?, addr(key_ptr)?, narrow(key_len)?)?;
			let Some(value) = value else { return Ok(status(ReturnErrorCode::KeyNotFound)) };
			let written =
				memory.write_capped_output(addr(out_ptr)?, narrow(out_capacity)?, &value, false)?;
			Ok(pack(ReturnErrorCode::Success.into(), written))
		})
	}

	unsafe fn transfer(&mut self, address_ptr: u64, value_ptr: u64) -> u64 {
		self.with("transfer", |state, memory| {
			Ok(status(state.transfer(memory, addr(address_ptr)?, addr(value_ptr)?)?))
		})
	}

	unsafe fn call(&mut self, args_ptr: u64) -> u64 {
		self.with("call", |state, memory| {
			let args: CallArgs = memory.read_struct(addr(args_ptr)?)?;
			let (code, output) = state.call(
				memory,
				narrow(args.flags)?,
				addr(args.callee)?,
				addr(args.deposit_limit)?,
				addr(args.value)?,
				addr(args.input)?,
				narrow(args.input_len)?,
			)?;
			let written = if returns_output(code) {
				memory.write_capped_output(
					addr(args.output)?,
					narrow(args.output_capacity)?,
					&output,
					true,
				)?
			} else {
				0
			};
			Ok(pack(code.into(), written))
		})
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
		self.with("delegate_call", |state, memory| {
			let (code, output) = state.delegate_call(
				memory,
				narrow(flags)?,
				addr(code_hash_ptr)?,
				addr(input_data_ptr)?,
				narrow(input_data_len)?,
			)?;
			let written = if returns_output(code) {
				memory.write_capped_output(
					addr(out_ptr)?,
					narrow(out_capacity)?,
					&output,
					true,
				)?
			} else {
				0
			};
			Ok(pack(code.into(), written))
		})
	}

	unsafe fn instantiate(&mut self, args_ptr: u64) -> u64 {
		self.with("instantiate", |state, memory| {
			let args: InstantiateArgs = memory.read_struct(addr(args_ptr)?)?;
			let (code, address, output) = state.instantiate(
				memory,
				addr(args.code_hash)?,
				addr(args.deposit_limit)?,
				addr(args.value)?,
				addr(args.input)?,
				narrow(args.input_len)?,
				addr(args.salt)?,
			)?;
			if let Some(address) = address {
				memory.write_fixed_sandbox_output(addr(args.address)?, &address, true)?;
			}
			let written = if returns_output(code) {
				memory.write_capped_output(
					addr(args.output)?,
					narrow(args.output_capacity)?,
					&output,
					true,
				)?
			} else {
				0
			};
			Ok(pack(code.into(), written))
		})
	}

	unsafe fn terminate(&mut self, beneficiary_ptr: u64) {
		match self.with("terminate", |state, memory| {
			state.terminate(memory, addr(beneficiary_ptr)?)
		}) {}
	}

	unsafe fn caller(&mut self, out_ptr: u64) {
		self.with("caller", |state, memory| {
			Ok(memory.write_fixed_sandbox_output(addr(out_ptr)?, &state.config.caller, false)?)
		})
	}

	unsafe fn address(&mut self, out_ptr: u64) {
		self.with("address", |state, memory| {
			Ok(memory.write_fixed_sandbox_output(addr(out_ptr)?, &state.config.address, false)?)
		})
	}

	unsafe fn origin(&mut self, out_ptr: u64) {
		self.with("origin", |state, memory| {
			Ok(memory.write_fixed_sandbox_output(addr(out_ptr)?, &state.config.origin, false)?)
		})
	}

	unsafe fn balance(&mut self, out_ptr: u64) {
		self.with("balance", |state, memory| {
			Ok(memory.write_fixed_sandbox_output(addr(out_ptr)?, &state.balance(), false)?)
		})
	}

	unsafe fn balance_of(&mut self, address_ptr: u64, out_ptr: u64) {
		self.with("balance_of", |state, memory| {
			let balance = state.balance_of(memory, addr(address_ptr)?)?;
			Ok(memory.write_fixed_sandbox_output(addr(out_ptr)?, &balance, false)?)
		})
	}

	unsafe fn value_transferred(&mut self, out_ptr: u64) {
		self.with("value_transferred", |state, memory| {
			let value = state.value_transferred();
			Ok(memory.write_fixed_sandbox_output(addr(out_ptr)?, &value, false)?)
		})
	}

	unsafe fn minimum_balance(&mut self, out_ptr: u64) {
		self.with("minimum_balance", |state, memory| {
			Ok(memory.write_fixed_sandbox_output(addr(out_ptr)?, &state.minimum_balance(), false)?)
		})
	}

	unsafe fn weight_to_fee(&mut self, ref_time: u64, proof_size: u64, out_ptr: u64) {
		self.with("weight_to_fee", |state, memory| {
			let fee = state.weight_to_fee(ref_time, proof_size);
			Ok(memory.write_fixed_sandbox_output(addr(out_ptr)?, &fee, false)?)
		})
	}

	unsafe fn gas_left(&mut self) -> u64 {
		self.with("gas_left", |state, _| Ok(state.config.gas_limit))
	}

	unsafe fn now(&mut self) -> u64 {
		self.with("now", |state, _| Ok(state.config.timestamp))
	}

	unsafe fn block_number(&mut self) -> u64 {
		self.with("block_number", |state, _| Ok(state.config.block_number))
	}

	unsafe fn block_hash(&mut self, block_number: u64, out_ptr: u64) {
		self.with("block_hash", |state, memory| {
			let hash = state.block_hash(Some(block_number));
			Ok(memory.write_fixed_sandbox_output(addr(out_ptr)?, &hash, false)?)
		})
	}

	unsafe fn chain_id(&mut self) -> u64 {
		self.with("chain_id", |state, _| Ok(state.config.chain_id))
	}

	unsafe fn deposit_event(
		&mut self,
		topics_ptr: u64,
		num_topics: u64,
		data_ptr: u64,
		data_len: u64,
	) {
		self.with("deposit_event", |state, memory| {
			state.deposit_event(
				memory,
				addr(topics_ptr)?,
				narrow(num_topics)?,
				addr(data_ptr)?,
				narrow(data_len)?,
			)
		})
	}

	unsafe fn hash_sha2_256(&mut self, input_ptr: u64, input_len: u64, out_ptr: u64) {
		self.with("hash_sha2_256", |_, memory| {
			HostState::compute_hash_on_intermediate_buffer(
				memory,
				sp_crypto_hashing::sha2_256,
				addr(input_ptr)?,
				narrow(input_len)?,
				addr(out_ptr)?,
			)
		})
	}

	unsafe fn hash_keccak_256(&mut self, input_ptr: u64, input_len: u64, out_ptr: u64) {
		self.with("hash_keccak_256", |_, memory| {
			HostState::compute_hash_on_intermediate_buffer(
				memory,
				sp_crypto_hashing::keccak_256,
				addr(input_ptr)?,
				narrow(input_len)?,
				addr(out_ptr)?,
			)
		})
	}

	unsafe fn hash_blake2_256(&mut self, input_ptr: u64, input_len: u64, out_ptr: u64) {
		self.with("hash_blake2_256", |_, memory| {
			HostState::compute_hash_on_intermediate_buffer(
				memory,
				sp_crypto_hashing::blake2_256,
				addr(input_ptr)?,
				narrow(input_len)?,
				addr(out_ptr)?,
			)
		})
	}

	unsafe fn hash_blake2_128(&mut self, input_ptr: u64, input_len: u64, out_ptr: u64) {
		self.with("hash_blake2_128", |_, memory| {
			HostState::compute_hash_on_intermediate_buffer(
				memory,
				sp_crypto_hashing::blake2_128,
				addr(input_ptr)?,
				narrow(input_len)?,
				addr(out_ptr)?,
			)
		})
	}

	unsafe fn return_data_size(&mut self) -> u64 {
		self.with("return_data_size", |state, _| Ok(state.frame.return_data.len() as u64))
	}

	unsafe fn return_data_copy(&mut self, out_ptr: u64, offset_and_capacity: u64) -> u64 {
		self.with("return_data_copy", |state, memory| {
			Ok(copy_from_offset(memory, &state.frame.return_data, out_ptr, offset_and_capacity)?)
		})
	}

	unsafe fn set_immutable_data(&mut self, ptr: u64, len: u64) {
		self.with("set_immutable_data", |state, memory| {
			state.set_immutable_data(memory, addr(ptr)?, narrow(len)?)
		})
	}

	unsafe fn get_immutable_data(&mut self, out_ptr: u64, out_capacity: u64) -> u64 {
		self.with("get_immutable_data", |state, memory| {
			let data = state.get_immutable_data()?;
			let written =
				memory.write_capped_output(addr(out_ptr)?, narrow(out_capacity)?, &data, false)?;
			Ok(pack(ReturnErrorCode::Success.into(), written))
		})
	}

	unsafe fn is_contract(&mut self, address_ptr: u64) -> u64 {
		self.with("is_contract", |state, memory| {
			Ok(state.is_contract(memory, addr(address_ptr)?)? as u64)
		})
	}

	unsafe fn code_hash(&mut self, address_ptr: u64, out_ptr: u64) {
		self.with("code_hash", |state, memory| {
			let code_hash = state.code_hash(memory, addr(address_ptr)?)?;
			Ok(memory.write_fixed_sandbox_output(addr(out_ptr)?, &code_hash, false)?)
		})
	}

	unsafe fn code_size(&mut self, address_ptr: u64) -> u64 {
		self.with("code_size", |state, memory| {
			Ok(state.code_size(memory, addr(address_ptr)?)?.into())
		})
	}

	unsafe fn own_code_hash(&mut self, out_ptr: u64) {
		self.with("own_code_hash", |state, memory| {
			Ok(memory.write_fixed_sandbox_output(addr(out_ptr)?, &state.own_code_hash(), false)?)
		})
	}

	unsafe fn set_code_hash(&mut self, code_hash_ptr: u64) -> u64 {
		self.with("set_code_hash", |state, memory| {
			Ok(status(state.set_code_hash(memory, addr(code_hash_ptr)?)?))
		})
	}

	unsafe fn caller_is_origin(&mut self) -> u64 {
		self.with("caller_is_origin", |state, _| Ok(state.caller_is_origin() as u64))
	}

	unsafe fn caller_is_root(&mut self) -> u64 {
		self.with("caller_is_root", |state, _| Ok(state.caller_is_root() as u64))
	}

	unsafe fn call_chain_extension(
		&mut self,
		id: u64,
		input_ptr: u64,
		input_len: u64,
		out_ptr: u64,
		out_capacity: u64,
	) -> u64 {
		self.with("call_chain_extension", |state, memory| {
			let (id, input_len) = (narrow(id)?, narrow(input_len)?);
			let (ret, output) =
				state.call_chain_extension(memory, id, addr(input_ptr)?, input_len)?;
			let written =
				memory.write_capped_output(addr(out_ptr)?, narrow(out_capacity)?, &output, true)?;
			Ok(pack(ret, written))
		})
	}

	unsafe fn debug_message(&mut self, str_ptr: u64, str_len: u64) -> u64 {
		self.with("debug_message", |state, memory| {
			Ok(status(state.debug_message(memory, addr(str_ptr)?, narrow(str_len)?)?))
		})
	}

	unsafe fn instantiation_nonce(&mut self) -> u64 {
		self.with("instantiation_nonce", |state, _| Ok(state.world.nonce))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn oversized_words_are_rejected() {
		assert_eq!(narrow(u32::MAX as u64), Ok(u32::MAX));
		assert_eq!(narrow(1 << 32), Err(SandboxError::ArgumentOverflow(1 << 32)));
	}

	#[test]
	fn the_sentinel_survives_as_an_address() {
		let sentinel = revive_guest_uapi::SENTINEL;
		assert_eq!(addr(sentinel as u64), Ok(sentinel as usize));
	}

	#[test]
	fn statuses_carry_no_length() {
		assert_eq!(status(ReturnErrorCode::KeyNotFound), 3 << 32);
		assert_eq!(status(ReturnErrorCode::Success), 0);
	}
}
