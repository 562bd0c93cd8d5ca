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

//! The simulated host.
//!
//! [`MockHost`] implements the raw import tables of both ABI revisions. The revision specific
//! modules only convert argument words and encode results. Everything else lives in the
//! handlers of [`HostState`], which read their inputs straight from guest memory.

mod seal;
mod v1;

use crate::{
	memory::{Mapped, Memory},
	Config, HostExit, Outcome, SandboxError, LOG_TARGET,
};
use revive_guest_uapi::{
	CallFlags, EntryPoint, ReturnErrorCode, ReturnFlags, StorageFlags, SENTINEL,
};
use std::{cell::RefCell, collections::BTreeMap, convert::Infallible, rc::Rc};

/// The result of a host function: a value for the guest or the end of the invocation.
pub type HostResult<T> = Result<T, HostExit>;

/// An event emitted by `deposit_event`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
	pub topics: Vec<[u8; 32]>,
	pub data: Vec<u8>,
}

/// How a registered callee answers a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
	Return(Vec<u8>),
	Revert(Vec<u8>),
	Trap,
}

/// The code of a callee. Maps the call input to a [`Reply`].
pub type Code = Rc<dyn Fn(&[u8]) -> Reply>;

/// A chain extension. Maps the function id and the input to a return value and an output.
pub type ChainExtension = Rc<dyn Fn(u32, &[u8]) -> (u32, Vec<u8>)>;

/// The number of past blocks whose hash is available to contracts.
const BLOCK_HASH_COUNT: u64 = 256;

/// State that outlives an invocation. Trapped and reverted invocations roll it back.
#[derive(Debug, Clone, Default)]
struct World {
	storage: BTreeMap<Vec<u8>, Vec<u8>>,
	balances: BTreeMap<[u8; 20], u128>,
	contracts: BTreeMap<[u8; 20], [u8; 32]>,
	events: Vec<Event>,
	immutable_data: Option<Vec<u8>>,
	nonce: u64,
	deployed: bool,
	terminated: bool,
}

impl World {
	fn balance_of(&self, address: &[u8; 20]) -> u128 {
		self.balances.get(address).copied().unwrap_or_default()
	}
}

/// State of the running invocation.
#[derive(Debug, Default)]
struct Frame {
	entry: Option<EntryPoint>,
	input: Option<Vec<u8>>,
	transient_storage: BTreeMap<Vec<u8>, Vec<u8>>,
	return_data: Vec<u8>,
}

pub(crate) struct HostState {
	config: Config,
	world: World,
	snapshot: Option<World>,
	frame: Frame,
	codes: BTreeMap<[u8; 32], Code>,
	code_sizes: BTreeMap<[u8; 32], u32>,
	chain_extension: Option<ChainExtension>,
	debug_buffer: String,
}

/// A handle to the simulated host. Clones share the same state.
///
/// The hash of a past block is simulated as the `keccak_256` of its little endian number.
#[derive(Clone)]
pub struct MockHost(Rc<RefCell<HostState>>);

impl MockHost {
	pub fn new(config: Config) -> Self {
		Self(Rc::new(RefCell::new(HostState::new(config))))
	}

	pub fn config(&self) -> Config {
		self.0.borrow().config.clone()
	}

	/// The persistent storage value under `key`.
	pub fn storage(&self, key: &[u8]) -> Option<Vec<u8>> {
		self.0.borrow().world.storage.get(key).cloned()
	}

	/// Place `value` under `key` in persistent storage.
	pub fn insert_storage(&self, key: &[u8], value: &[u8]) {
		self.0.borrow_mut().world.storage.insert(key.to_vec(), value.to_vec());
	}

	pub fn balance_of(&self, address: &[u8; 20]) -> u128 {
		self.0.borrow().world.balance_of(address)
	}

	pub fn events(&self) -> Vec<Event> {
		self.0.borrow().world.events.clone()
	}

	pub fn immutable_data(&self) -> Option<Vec<u8>> {
		self.0.borrow().world.immutable_data.clone()
	}

	/// Everything the contract passed to `debug_message` so far.
	pub fn debug_buffer(&self) -> String {
		self.0.borrow().debug_buffer.clone()
	}

	pub fn instantiation_nonce(&self) -> u64 {
		self.0.borrow().world.nonce
	}

	pub fn is_deployed(&self) -> bool {
		self.0.borrow().world.deployed
	}

	pub fn is_terminated(&self) -> bool {
		self.0.borrow().world.terminated
	}

	/// The code hash of the contract at `address`.
	pub fn contract_at(&self, address: &[u8; 20]) -> Option<[u8; 32]> {
		self.0.borrow().world.contracts.get(address).copied()
	}

	/// Make `code` available under `code_hash` for `delegate_call` and `instantiate`.
	pub fn add_code(&self, code_hash: [u8; 32], code: impl Fn(&[u8]) -> Reply + 'static) {
		self.0.borrow_mut().codes.insert(code_hash, Rc::new(code));
	}

	/// Place a contract running `code_hash` at `address`.
	pub fn add_contract(&self, address: [u8; 20], code_hash: [u8; 32]) {
		self.0.borrow_mut().world.contracts.insert(address, code_hash);
	}

	/// Report `size` as the code size of every contract running `code_hash`.
	pub fn set_code_size(&self, code_hash: [u8; 32], size: u32) {
		self.0.borrow_mut().code_sizes.insert(code_hash, size);
	}

	/// Serve `call_chain_extension` with `extension`. Without one the call traps.
	pub fn set_chain_extension(&self, extension: impl Fn(u32, &[u8]) -> (u32, Vec<u8>) + 'static) {
		self.0.borrow_mut().chain_extension = Some(Rc::new(extension));
	}

	/// Prepare an invocation of `entry` with `input`.
	pub(crate) fn begin(&self, entry: EntryPoint, input: Vec<u8>) -> Result<(), SandboxError> {
		let mut state = self.0.borrow_mut();
		if state.world.terminated {
			return Err(SandboxError::Terminated)
		}
		if entry.is_deploy() && state.world.deployed {
			return Err(SandboxError::AlreadyDeployed)
		}

		log::debug!(
			target: LOG_TARGET,
			"begin {} with {} bytes of input",
			entry.symbol(),
			input.len()
		);
		state.snapshot = Some(state.world.clone());
		state.frame = Frame { entry: Some(entry), input: Some(input), ..Default::default() };
		Ok(())
	}

	/// Commit or roll back the invocation depending on how it ended.
	pub(crate) fn finish(&self, outcome: &Outcome) {
		let mut state = self.0.borrow_mut();
		let frame = core::mem::take(&mut state.frame);
		let snapshot = state.snapshot.take();

		if outcome.is_reverted() {
			log::debug!(target: LOG_TARGET, "rolling back: {outcome:?}");
			if let Some(world) = snapshot {
				state.world = world;
			}
			return
		}

		if frame.entry == Some(EntryPoint::Deploy) && !state.world.terminated {
			state.world.deployed = true;
		}
	}

	/// Run a host function against the state.
	///
	/// Ending the invocation unwinds the guest with the [`HostExit`] as payload.
	///
	/// # Safety
	///
	/// Only to be called while serving a raw import call, whose pointers are valid.
	unsafe fn with<R>(
		&self,
		name: &'static str,
		f: impl FnOnce(&mut HostState, &mut Mapped) -> HostResult<R>,
	) -> R {
		log::trace!(target: LOG_TARGET, "host call: {name}");
		let result = {
			let mut state = self.0.borrow_mut();
			f(&mut *state, &mut Mapped::new())
		};
		match result {
			Ok(value) => value,
			Err(exit) => {
				if let HostExit::Trap(ref err) = exit {
					log::debug!(target: LOG_TARGET, "{name} trapped: {err}");
				}
				std::panic::resume_unwind(Box::new(exit))
			},
		}
	}
}

fn hex(bytes: &[u8]) -> String {
	bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// A balance as the 32 byte little endian `U256` the guest expects.
fn u256_bytes(value: u128) -> [u8; 32] {
	let mut buffer = [0u8; 32];
	buffer[..16].copy_from_slice(&value.to_le_bytes());
	buffer
}

impl HostState {
	fn new(config: Config) -> Self {
		let mut world = World::default();
		world.balances.insert(config.caller, config.caller_balance);
		world.balances.insert(config.address, config.balance);
		world.contracts.insert(config.address, config.code_hash);
		if let Some(data) = config.immutable_data.clone() {
			world.immutable_data = Some(data);
			world.deployed = true;
		}

		let code_sizes = BTreeMap::from([(config.code_hash, config.code_size)]);
		Self {
			config,
			world,
			snapshot: None,
			frame: Frame::default(),
			codes: BTreeMap::new(),
			code_sizes,
			chain_extension: None,
			debug_buffer: String::new(),
		}
	}

	fn is_deploy(&self) -> bool {
		self.frame.entry == Some(EntryPoint::Deploy)
	}

	fn ensure_mutable(&self) -> Result<(), SandboxError> {
		if self.config.read_only {
			return Err(SandboxError::StateChangeDenied)
		}
		Ok(())
	}

	fn is_transient(flags: u32) -> Result<bool, SandboxError> {
		StorageFlags::from_bits(flags)
			.ok_or(SandboxError::InvalidStorageFlags(flags))
			.map(|flags| flags.contains(StorageFlags::TRANSIENT))
	}

	fn storage_mut(&mut self, transient: bool) -> &mut BTreeMap<Vec<u8>, Vec<u8>> {
		if transient {
			&mut self.frame.transient_storage
		} else {
			&mut self.world.storage
		}
	}

	/// A key length of [`SENTINEL`] denotes a fixed 32 byte key.
	fn decode_key(
		&self,
		memory: &impl Memory,
		key_ptr: usize,
		key_len: u32,
	) -> Result<Vec<u8>, SandboxError> {
		match key_len {
			SENTINEL => memory.read(key_ptr, 32),
			len if len > self.config.max_storage_key_len => Err(SandboxError::KeyTooLarge(len)),
			len => memory.read(key_ptr, len),
		}
	}

	fn input(&mut self) -> HostResult<Vec<u8>> {
		Ok(self.frame.input.clone().ok_or(SandboxError::InputForwarded)?)
	}

	fn seal_return(
		&mut self,
		memory: &impl Memory,
		flags: u32,
		data_ptr: usize,
		data_len: u32,
	) -> HostResult<Infallible> {
		let flags = ReturnFlags::from_bits(flags).ok_or(SandboxError::InvalidReturnFlags(flags))?;
		let data = memory.read(data_ptr, data_len)?;
		Err(HostExit::Return { flags, data })
	}

	/// Returns the length of the previous value or the [`SENTINEL`].
	fn set_storage(
		&mut self,
		memory: &impl Memory,
		flags: u32,
		key_ptr: usize,
		key_len: u32,
		value_ptr: usize,
		value_len: u32,
	) -> HostResult<u32> {
		let transient = Self::is_transient(flags)?;
		self.ensure_mutable()?;
		if value_len > self.config.max_value_len {
			return Err(SandboxError::ValueTooLarge(value_len).into())
		}

		let key = self.decode_key(memory, key_ptr, key_len)?;
		let value = memory.read(value_ptr, value_len)?;
		let old = self.storage_mut(transient).insert(key, value);
		Ok(old.map_or(SENTINEL, |old| old.len() as u32))
	}

	fn clear_storage(
		&mut self,
		memory: &impl Memory,
		flags: u32,
		key_ptr: usize,
		key_len: u32,
	) -> HostResult<u32> {
		let transient = Self::is_transient(flags)?;
		self.ensure_mutable()?;
		let key = self.decode_key(memory, key_ptr, key_len)?;
		let old = self.storage_mut(transient).remove(&key);
		Ok(old.map_or(SENTINEL, |old| old.len() as u32))
	}

	fn get_storage(
		&mut self,
		memory: &impl Memory,
		flags: u32,
		key_ptr: usize,
		key_len: u32,
	) -> HostResult<Option<Vec<u8>>> {
		let transient = Self::is_transient(flags)?;
		let key = self.decode_key(memory, key_ptr, key_len)?;
		Ok(self.storage_mut(transient).get(&key).cloned())
	}

	fn contains_storage(
		&mut self,
		memory: &impl Memory,
		flags: u32,
		key_ptr: usize,
		key_len: u32,
	) -> HostResult<u32> {
		let transient = Self::is_transient(flags)?;
		let key = self.decode_key(memory, key_ptr, key_len)?;
		Ok(self.storage_mut(transient).get(&key).map_or(SENTINEL, |value| value.len() as u32))
	}

	fn take_storage(
		&mut self,
		memory: &impl Memory,
		flags: u32,
		key_ptr: usize,
		key_len: u32,
	) -> HostResult<Option<Vec<u8>>> {
		let transient = Self::is_transient(flags)?;
		self.ensure_mutable()?;
		let key = self.decode_key(memory, key_ptr, key_len)?;
		Ok(self.storage_mut(transient).remove(&key))
	}

	fn transfer(
		&mut self,
		memory: &impl Memory,
		address_ptr: usize,
		value_ptr: usize,
	) -> HostResult<ReturnErrorCode> {
		self.ensure_mutable()?;
		let to = memory.read_array(address_ptr)?;
		let value = memory.read_balance(value_ptr)?;
		Ok(self.transfer_balance(&to, value))
	}

	/// Move `value` from the contract to `to`. Neither side may end up below the minimum balance.
	fn transfer_balance(&mut self, to: &[u8; 20], value: u128) -> ReturnErrorCode {
		if value == 0 {
			return ReturnErrorCode::Success
		}

		let from = self.config.address;
		let minimum = self.config.minimum_balance;
		let Some(remaining) = self.world.balance_of(&from).checked_sub(value) else {
			return ReturnErrorCode::TransferFailed
		};
		if remaining < minimum {
			return ReturnErrorCode::TransferFailed
		}
		if *to == from {
			return ReturnErrorCode::Success
		}
		let Some(received) = self.world.balance_of(to).checked_add(value) else {
			return ReturnErrorCode::TransferFailed
		};
		if received < minimum {
			return ReturnErrorCode::TransferFailed
		}

		self.world.balances.insert(from, remaining);
		self.world.balances.insert(*to, received);
		ReturnErrorCode::Success
	}

	fn call_input(
		&mut self,
		memory: &impl Memory,
		flags: CallFlags,
		input_ptr: usize,
		input_len: u32,
	) -> Result<Vec<u8>, SandboxError> {
		if flags.contains(CallFlags::CLONE_INPUT) {
			self.frame.input.clone().ok_or(SandboxError::InputForwarded)
		} else if flags.contains(CallFlags::FORWARD_INPUT) {
			self.frame.input.take().ok_or(SandboxError::InputForwarded)
		} else {
			memory.read(input_ptr, input_len)
		}
	}

	/// Run `code` after moving `value` to `to`. Reverts and traps undo the transfer.
	fn run_callee(
		&mut self,
		code: &Code,
		to: Option<[u8; 20]>,
		value: u128,
		input: &[u8],
	) -> (ReturnErrorCode, Vec<u8>) {
		let balances = self.world.balances.clone();
		if let Some(to) = to {
			let code = self.transfer_balance(&to, value);
			if code != ReturnErrorCode::Success {
				self.frame.return_data.clear();
				return (code, Vec::new())
			}
		}

		let (code, output) = match code(input) {
			Reply::Return(data) => (ReturnErrorCode::Success, data),
			Reply::Revert(data) => (ReturnErrorCode::CalleeReverted, data),
			Reply::Trap => (ReturnErrorCode::CalleeTrapped, Vec::new()),
		};
		if code != ReturnErrorCode::Success {
			self.world.balances = balances;
		}
		self.frame.return_data = output.clone();
		(code, output)
	}

	/// With `TAIL_CALL` the callee output becomes the output of the current invocation.
	fn finish_call(
		flags: CallFlags,
		code: ReturnErrorCode,
		output: Vec<u8>,
	) -> HostResult<(ReturnErrorCode, Vec<u8>)> {
		if !flags.contains(CallFlags::TAIL_CALL) {
			return Ok((code, output))
		}
		match code {
			ReturnErrorCode::Success =>
				Err(HostExit::Return { flags: ReturnFlags::empty(), data: output }),
			ReturnErrorCode::CalleeReverted =>
				Err(HostExit::Return { flags: ReturnFlags::REVERT, data: output }),
			_ => Err(SandboxError::CalleeTrapped.into()),
		}
	}

	/// Returns the status and the output of the callee.
	fn call(
		&mut self,
		memory: &impl Memory,
		flags: u32,
		callee_ptr: usize,
		deposit_limit_ptr: usize,
		value_ptr: usize,
		input_ptr: usize,
		input_len: u32,
	) -> HostResult<(ReturnErrorCode, Vec<u8>)> {
		let flags = CallFlags::from_bits(flags).ok_or(SandboxError::InvalidCallFlags(flags))?;
		let callee: [u8; 20] = memory.read_array(callee_ptr)?;
		if deposit_limit_ptr != SENTINEL as usize {
			memory.read_balance(deposit_limit_ptr)?;
		}
		let value = memory.read_balance(value_ptr)?;
		if value != 0 && (self.config.read_only || flags.contains(CallFlags::READ_ONLY)) {
			return Err(SandboxError::StateChangeDenied.into())
		}
		if callee == self.config.address && !flags.contains(CallFlags::ALLOW_REENTRY) {
			return Err(SandboxError::ReentranceDenied.into())
		}
		let input = self.call_input(memory, flags, input_ptr, input_len)?;

		let code = self.world.contracts.get(&callee).and_then(|hash| self.codes.get(hash)).cloned();
		let Some(code) = code else {
			self.frame.return_data.clear();
			return Self::finish_call(flags, ReturnErrorCode::NotCallable, Vec::new())
		};

		let (code, output) = self.run_callee(&code, Some(callee), value, &input);
		Self::finish_call(flags, code, output)
	}

	fn delegate_call(
		&mut self,
		memory: &impl Memory,
		flags: u32,
		code_hash_ptr: usize,
		input_ptr: usize,
		input_len: u32,
	) -> HostResult<(ReturnErrorCode, Vec<u8>)> {
		let flags = CallFlags::from_bits(flags)
			.filter(|flags| !flags.intersects(CallFlags::ALLOW_REENTRY | CallFlags::READ_ONLY))
			.ok_or(SandboxError::InvalidCallFlags(flags))?;
		let code_hash: [u8; 32] = memory.read_array(code_hash_ptr)?;
		let input = self.call_input(memory, flags, input_ptr, input_len)?;

		let Some(code) = self.codes.get(&code_hash).cloned() else {
			self.frame.return_data.clear();
			return Self::finish_call(flags, ReturnErrorCode::CodeNotFound, Vec::new())
		};

		let (code, output) = self.run_callee(&code, None, 0, &input);
		Self::finish_call(flags, code, output)
	}

	/// The address of a contract instantiated by this one.
	fn derive_address(&self, code_hash: &[u8; 32], salt: Option<&[u8; 32]>) -> [u8; 20] {
		let mut preimage = self.config.address.to_vec();
		preimage.extend_from_slice(code_hash);
		match salt {
			Some(salt) => preimage.extend_from_slice(salt),
			None => preimage.extend_from_slice(&self.world.nonce.to_le_bytes()),
		}
		let hash = sp_crypto_hashing::keccak_256(&preimage);
		let mut address = [0u8; 20];
		address.copy_from_slice(&hash[12..]);
		address
	}

	/// Returns the status, the address of the new contract and the output of its constructor.
	fn instantiate(
		&mut self,
		memory: &impl Memory,
		code_hash_ptr: usize,
		deposit_limit_ptr: usize,
		value_ptr: usize,
		input_ptr: usize,
		input_len: u32,
		salt_ptr: usize,
	) -> HostResult<(ReturnErrorCode, Option<[u8; 20]>, Vec<u8>)> {
		self.ensure_mutable()?;
		let code_hash: [u8; 32] = memory.read_array(code_hash_ptr)?;
		if deposit_limit_ptr != SENTINEL as usize {
			memory.read_balance(deposit_limit_ptr)?;
		}
		let value = memory.read_balance(value_ptr)?;
		let input = memory.read(input_ptr, input_len)?;
		let salt: Option<[u8; 32]> = match salt_ptr {
			ptr if ptr == SENTINEL as usize => None,
			ptr => Some(memory.read_array(ptr)?),
		};

		let Some(code) = self.codes.get(&code_hash).cloned() else {
			self.frame.return_data.clear();
			return Ok((ReturnErrorCode::CodeNotFound, None, Vec::new()))
		};

		let address = self.derive_address(&code_hash, salt.as_ref());
		if self.world.contracts.contains_key(&address) {
			return Err(SandboxError::DuplicateContract.into())
		}

		let (code, output) = self.run_callee(&code, Some(address), value, &input);
		if code != ReturnErrorCode::Success {
			return Ok((code, None, output))
		}

		self.world.contracts.insert(address, code_hash);
		self.world.nonce += 1;
		Ok((code, Some(address), output))
	}

	fn terminate(
		&mut self,
		memory: &impl Memory,
		beneficiary_ptr: usize,
	) -> HostResult<Infallible> {
		self.ensure_mutable()?;
		let beneficiary: [u8; 20] = memory.read_array(beneficiary_ptr)?;
		let own = self.config.address;
		let balance = self.world.balances.remove(&own).unwrap_or_default();
		let entry = self.world.balances.entry(beneficiary).or_default();
		*entry = entry.saturating_add(balance);
		self.world.contracts.remove(&own);
		self.world.storage.clear();
		self.world.terminated = true;
		Err(HostExit::Termination { beneficiary })
	}

	fn balance(&self) -> [u8; 32] {
		u256_bytes(self.world.balance_of(&self.config.address))
	}

	fn balance_of(&self, memory: &impl Memory, address_ptr: usize) -> HostResult<[u8; 32]> {
		let address: [u8; 20] = memory.read_array(address_ptr)?;
		Ok(u256_bytes(self.world.balance_of(&address)))
	}

	/// Only the [`BLOCK_HASH_COUNT`] blocks before the current one have a hash. Every other block
	/// reads as zero.
	fn block_hash(&self, block_number: Option<u64>) -> [u8; 32] {
		let current = self.config.block_number;
		match block_number {
			Some(number)
				if number < current && number >= current.saturating_sub(BLOCK_HASH_COUNT) =>
				sp_crypto_hashing::keccak_256(&number.to_le_bytes()),
			_ => [0u8; 32],
		}
	}

	fn value_transferred(&self) -> [u8; 32] {
		u256_bytes(self.config.value_transferred)
	}

	fn minimum_balance(&self) -> [u8; 32] {
		u256_bytes(self.config.minimum_balance)
	}

	fn weight_to_fee(&self, ref_time: u64, proof_size: u64) -> [u8; 32] {
		let weight = (ref_time as u128).saturating_add(proof_size as u128);
		u256_bytes(weight.saturating_mul(self.config.weight_price))
	}

	fn deposit_event(
		&mut self,
		memory: &impl Memory,
		topics_ptr: usize,
		num_topics: u32,
		data_ptr: usize,
		data_len: u32,
	) -> HostResult<()> {
		self.ensure_mutable()?;
		if num_topics > self.config.max_topics {
			return Err(SandboxError::TooManyTopics(num_topics).into())
		}
		if data_len > self.config.max_value_len {
			return Err(SandboxError::ValueTooLarge(data_len).into())
		}

		let topics = (0..num_topics as usize)
			.map(|i| memory.read_array::<32>(topics_ptr + i * 32))
			.collect::<Result<Vec<_>, _>>()?;
		let data = memory.read(data_ptr, data_len)?;
		self.world.events.push(Event { topics, data });
		Ok(())
	}

	/// Computes the given hash function on the supplied input.
	///
	/// The `input` and `output` buffers may overlap.
	fn compute_hash_on_intermediate_buffer<F, R>(
		memory: &mut impl Memory,
		hash_fn: F,
		input_ptr: usize,
		input_len: u32,
		output_ptr: usize,
	) -> HostResult<()>
	where
		F: FnOnce(&[u8]) -> R,
		R: AsRef<[u8]>,
	{
		let input = memory.read(input_ptr, input_len)?;
		let hash = hash_fn(&input);
		memory.write(output_ptr, hash.as_ref())?;
		Ok(())
	}

	fn return_data_copy(&self, offset: u32) -> HostResult<&[u8]> {
		self.frame
			.return_data
			.get(offset as usize..)
			.ok_or_else(|| SandboxError::OffsetOutOfBounds(offset).into())
	}

	fn set_immutable_data(&mut self, memory: &impl Memory, ptr: usize, len: u32) -> HostResult<()> {
		if !self.is_deploy() {
			return Err(SandboxError::InvalidImmutableAccess.into())
		}
		if self.world.immutable_data.is_some() {
			return Err(SandboxError::ImmutableDataAlreadySet.into())
		}
		if len > self.config.max_immutable_data_len {
			return Err(SandboxError::ImmutableDataTooLarge(len).into())
		}
		self.world.immutable_data = Some(memory.read(ptr, len)?);
		Ok(())
	}

	fn get_immutable_data(&self) -> HostResult<Vec<u8>> {
		if self.is_deploy() {
			return Err(SandboxError::InvalidImmutableAccess.into())
		}
		Ok(self.world.immutable_data.clone().unwrap_or_default())
	}

	fn is_contract(&self, memory: &impl Memory, address_ptr: usize) -> HostResult<bool> {
		let address: [u8; 20] = memory.read_array(address_ptr)?;
		Ok(self.world.contracts.contains_key(&address))
	}

	/// Accounts without code report a zero hash.
	fn code_hash(&self, memory: &impl Memory, address_ptr: usize) -> HostResult<[u8; 32]> {
		let address: [u8; 20] = memory.read_array(address_ptr)?;
		Ok(self.world.contracts.get(&address).copied().unwrap_or_default())
	}

	/// Accounts without code report zero.
	fn code_size(&self, memory: &impl Memory, address_ptr: usize) -> HostResult<u32> {
		let address: [u8; 20] = memory.read_array(address_ptr)?;
		Ok(self
			.world
			.contracts
			.get(&address)
			.and_then(|code_hash| self.code_sizes.get(code_hash))
			.copied()
			.unwrap_or_default())
	}

	fn own_code_hash(&self) -> [u8; 32] {
		self.world.contracts.get(&self.config.address).copied().unwrap_or(self.config.code_hash)
	}

	fn set_code_hash(
		&mut self,
		memory: &impl Memory,
		code_hash_ptr: usize,
	) -> HostResult<ReturnErrorCode> {
		self.ensure_mutable()?;
		let code_hash: [u8; 32] = memory.read_array(code_hash_ptr)?;
		if code_hash != self.config.code_hash && !self.codes.contains_key(&code_hash) {
			return Ok(ReturnErrorCode::CodeNotFound)
		}
		log::debug!(target: LOG_TARGET, "code hash set to 0x{}", hex(&code_hash));
		self.world.contracts.insert(self.config.address, code_hash);
		Ok(ReturnErrorCode::Success)
	}

	fn caller_is_origin(&self) -> bool {
		self.config.caller == self.config.origin
	}

	fn caller_is_root(&self) -> bool {
		self.caller_is_origin() && self.config.root_origin
	}

	/// Returns what the extension returned and its output.
	fn call_chain_extension(
		&mut self,
		memory: &impl Memory,
		id: u32,
		input_ptr: usize,
		input_len: u32,
	) -> HostResult<(u32, Vec<u8>)> {
		let extension = self.chain_extension.clone().ok_or(SandboxError::NoChainExtension)?;
		let input = memory.read(input_ptr, input_len)?;
		log::trace!(target: LOG_TARGET, "chain extension {:#x} with {} bytes", id, input.len());
		Ok(extension(id, &input))
	}

	fn debug_message(
		&mut self,
		memory: &impl Memory,
		str_ptr: usize,
		str_len: u32,
	) -> HostResult<ReturnErrorCode> {
		if !self.config.debug_messages {
			return Ok(ReturnErrorCode::LoggingDisabled)
		}
		let message = memory.read(str_ptr, str_len)?;
		let message = String::from_utf8_lossy(&message);
		log::debug!(target: LOG_TARGET, "contract: {message}");
		self.debug_buffer.push_str(&message);
		Ok(ReturnErrorCode::Success)
	}
}
