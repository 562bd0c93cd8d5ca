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

//! The environment the simulated host presents to a contract.

use revive_guest_uapi::limits;

pub const ALICE_ADDR: [u8; 20] = [1u8; 20];
pub const BOB_ADDR: [u8; 20] = [2u8; 20];
pub const CHARLIE_ADDR: [u8; 20] = [3u8; 20];

/// Settings of a [`Sandbox`](crate::Sandbox).
///
/// Start from [`Config::default`] and adjust with the builder methods:
///
/// ```
/// use revive_guest_sandbox::Config;
///
/// let config = Config::default().balance(1_000).block_number(42).debug_messages(true);
/// assert_eq!(config.block_number, 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// The address of the contract under test.
	pub address: [u8; 20],
	/// The code hash of the contract under test.
	pub code_hash: [u8; 32],
	/// Reported by `code_size` for the contract under test.
	pub code_size: u32,
	/// The immediate caller.
	pub caller: [u8; 20],
	/// The origin of the whole call stack.
	pub origin: [u8; 20],
	/// Whether the origin is root. Only honoured while the caller is the origin.
	pub root_origin: bool,
	/// The free balance of the contract.
	pub balance: u128,
	/// The free balance of the caller.
	pub caller_balance: u128,
	/// Reported by `value_transferred`. Already part of `balance`.
	pub value_transferred: u128,
	/// The existential deposit.
	pub minimum_balance: u128,
	/// The price of one unit of weight.
	pub weight_price: u128,
	pub block_number: u64,
	/// Reported by `now`, in milliseconds.
	pub timestamp: u64,
	pub chain_id: u64,
	/// Reported by `gas_left`. The sandbox does not meter.
	pub gas_limit: u64,
	pub max_storage_key_len: u32,
	pub max_value_len: u32,
	pub max_topics: u32,
	pub max_immutable_data_len: u32,
	/// Immutable data as if a previous `deploy` had set it.
	pub immutable_data: Option<Vec<u8>>,
	/// Record `debug_message` output instead of answering `LoggingDisabled`.
	pub debug_messages: bool,
	/// Run every invocation as if called with `READ_ONLY`.
	pub read_only: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			address: BOB_ADDR,
			code_hash: [0xB0; 32],
			code_size: 0,
			caller: ALICE_ADDR,
			origin: ALICE_ADDR,
			root_origin: false,
			balance: 1_000_000,
			caller_balance: 1_000_000,
			value_transferred: 0,
			minimum_balance: 1,
			weight_price: 1,
			block_number: 1,
			timestamp: 1_000,
			chain_id: 420_420_420,
			gas_limit: 10_000_000_000,
			max_storage_key_len: limits::STORAGE_KEY_BYTES,
			max_value_len: limits::PAYLOAD_BYTES,
			max_topics: limits::NUM_EVENT_TOPICS,
			max_immutable_data_len: limits::IMMUTABLE_DATA_BYTES,
			immutable_data: None,
			debug_messages: false,
			read_only: false,
		}
	}
}

impl Config {
	pub fn address(mut self, address: [u8; 20]) -> Self {
		self.address = address;
		self
	}
	pub fn code_hash(mut self, code_hash: [u8; 32]) -> Self {
		self.code_hash = code_hash;
		self
	}
	pub fn code_size(mut self, code_size: u32) -> Self {
		self.code_size = code_size;
		self
	}
	pub fn caller(mut self, caller: [u8; 20]) -> Self {
		self.caller = caller;
		self
	}
	pub fn origin(mut self, origin: [u8; 20]) -> Self {
		self.origin = origin;
		self
	}
	pub fn root_origin(mut self, root_origin: bool) -> Self {
		self.root_origin = root_origin;
		self
	}
	pub fn balance(mut self, balance: u128) -> Self {
		self.balance = balance;
		self
	}
	pub fn caller_balance(mut self, caller_balance: u128) -> Self {
		self.caller_balance = caller_balance;
		self
	}
	pub fn value_transferred(mut self, value_transferred: u128) -> Self {
		self.value_transferred = value_transferred;
		self
	}
	pub fn minimum_balance(mut self, minimum_balance: u128) -> Self {
		self.minimum_balance = minimum_balance;
		self
	}
	pub fn weight_price(mut self, weight_price: u128) -> Self {
		self.weight_price = weight_price;
		self
	}
	pub fn block_number(mut self, block_number: u64) -> Self {
		self.block_number = block_number;
		self
	}
	pub fn timestamp(mut self, timestamp: u64) -> Self {
		self.timestamp = timestamp;
		self
	}
	pub fn chain_id(mut self, chain_id: u64) -> Self {
		self.chain_id = chain_id;
		self
	}
	pub fn gas_limit(mut self, gas_limit: u64) -> Self {
		self.gas_limit = gas_limit;
		self
	}
	pub fn max_value_len(mut self, max_value_len: u32) -> Self {
		self.max_value_len = max_value_len;
		self
	}
	pub fn immutable_data(mut self, immutable_data: Vec<u8>) -> Self {
		self.immutable_data = Some(immutable_data);
		self
	}
	pub fn debug_messages(mut self, enabled: bool) -> Self {
		self.debug_messages = enabled;
		self
	}
	pub fn read_only(mut self, read_only: bool) -> Self {
		self.read_only = read_only;
		self
	}
}
