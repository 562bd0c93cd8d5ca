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

//! Calls into other contracts, delegate calls and instantiation.

mod common;

use assert_matches::assert_matches;
use common::value;
use pretty_assertions::assert_eq;
use revive_guest_sandbox::{
	Config, MockHost, Outcome, Reply, Revision, SandboxError, Seal, V1, BOB_ADDR, CHARLIE_ADDR,
};
use revive_guest_uapi::{CallFlags, HostFn, ReturnErrorCode, ReturnFlags};

const REVERSE: [u8; 32] = [0xAA; 32];
const REVERT: [u8; 32] = [0xBB; 32];
const TRAP: [u8; 32] = [0xCC; 32];

/// Registers three callees: one reversing its input, one reverting and one trapping.
fn register_callees(host: &MockHost) {
	host.add_code(REVERSE, |input| Reply::Return(input.iter().rev().copied().collect()));
	host.add_code(REVERT, |input| Reply::Revert([&b"no:"[..], input].concat()));
	host.add_code(TRAP, |_| Reply::Trap);
	host.add_contract(CHARLIE_ADDR, REVERSE);
	host.add_contract([4; 20], REVERT);
	host.add_contract([5; 20], TRAP);
}

fn call_results<R: Revision>() {
	let mut sandbox = common::deployed::<R>(Config::default());
	register_callees(sandbox.host());

	let execution = sandbox
		.call::<R, _>(&[], |invocation| {
			let api = invocation.api();
			let zero = value(0);

			let mut buffer = [0u8; 16];
			let mut output = &mut buffer[..];
			let flags = CallFlags::empty();
			api.call(flags, &CHARLIE_ADDR, 0, 0, None, &zero, b"abc", Some(&mut output))?;
			assert_eq!(&output[..], b"cba");
			assert_eq!(api.return_data_size(), 3);

			let mut buffer = [0u8; 16];
			let mut output = &mut buffer[..];
			api.return_data_copy(&mut output, 1);
			assert_eq!(&output[..], b"ba");

			let mut buffer = [0u8; 16];
			let mut output = &mut buffer[..];
			let result = api.call(flags, &[4; 20], 0, 0, None, &zero, b"x", Some(&mut output));
			assert_eq!(result, Err(ReturnErrorCode::CalleeReverted));
			assert_eq!(&output[..], b"no:x");

			let mut buffer = [7u8; 4];
			let mut output = &mut buffer[..];
			let result = api.call(flags, &[5; 20], 0, 0, None, &zero, b"", Some(&mut output));
			assert_eq!(result, Err(ReturnErrorCode::CalleeTrapped));
			assert_eq!(&output[..], &[7u8; 4]);
			assert_eq!(api.return_data_size(), 0);

			let result = api.call(flags, &[9; 20], 0, 0, None, &zero, b"", None);
			assert_eq!(result, Err(ReturnErrorCode::NotCallable));

			// Without an output buffer the output is only available as return data.
			api.call(flags, &CHARLIE_ADDR, 0, 0, Some(&zero), &zero, b"xyz", None)?;
			assert_eq!(api.return_data_size(), 3);
			Ok(())
		})
		.unwrap();

	assert_eq!(execution.outcome, Outcome::Completed);
}

#[test]
fn call_results_seal() {
	call_results::<Seal>();
}

#[test]
fn call_results_v1() {
	call_results::<V1>();
}

fn value_moves_with_successful_calls_only<R: Revision>() {
	let mut sandbox = common::deployed::<R>(Config::default());
	register_callees(sandbox.host());

	let execution = sandbox
		.call::<R, _>(&[], |invocation| {
			let api = invocation.api();
			api.call(CallFlags::empty(), &CHARLIE_ADDR, 0, 0, None, &value(100), b"", None)?;
			let result = api.call(CallFlags::empty(), &[4; 20], 0, 0, None, &value(50), b"", None);
			assert_eq!(result, Err(ReturnErrorCode::CalleeReverted));
			let result = api.call(CallFlags::empty(), &[5; 20], 0, 0, None, &value(50), b"", None);
			assert_eq!(result, Err(ReturnErrorCode::CalleeTrapped));

			let mut balance = [0u8; 32];
			api.balance(&mut balance);
			assert_eq!(balance, value(1_000_000 - 100));
			Ok(())
		})
		.unwrap();

	assert_eq!(execution.outcome, Outcome::Completed);
	assert_eq!(sandbox.host().balance_of(&CHARLIE_ADDR), 100);
	assert_eq!(sandbox.host().balance_of(&[4; 20]), 0);
	assert_eq!(sandbox.host().balance_of(&BOB_ADDR), 1_000_000 - 100);
}

#[test]
fn value_moves_with_successful_calls_only_seal() {
	value_moves_with_successful_calls_only::<Seal>();
}

#[test]
fn value_moves_with_successful_calls_only_v1() {
	value_moves_with_successful_calls_only::<V1>();
}

#[test]
fn transfers_keep_the_minimum_balance() {
	let config = Config::default().balance(1_000).minimum_balance(10);
	let mut sandbox = common::deployed::<Seal>(config);
	let execution = sandbox
		.call::<Seal, _>(&[], |invocation| {
			let api = invocation.api();
			let failed = Err(ReturnErrorCode::TransferFailed);
			// The receiver would end up below the minimum.
			assert_eq!(api.transfer(&CHARLIE_ADDR, &value(5)), failed);
			// The sender would end up below the minimum.
			assert_eq!(api.transfer(&CHARLIE_ADDR, &value(995)), failed);
			assert_eq!(api.transfer(&CHARLIE_ADDR, &value(2_000)), failed);
			api.transfer(&CHARLIE_ADDR, &value(990))?;
			Ok(())
		})
		.unwrap();

	assert_eq!(execution.outcome, Outcome::Completed);
	assert_eq!(sandbox.host().balance_of(&CHARLIE_ADDR), 990);
	assert_eq!(sandbox.host().balance_of(&BOB_ADDR), 10);
}

#[test]
fn reentrance_needs_permission() {
	let mut sandbox = common::deployed::<V1>(Config::default());
	let execution = sandbox
		.call::<V1, _>(&[], |invocation| {
			let api = invocation.api();
			let flags = CallFlags::ALLOW_REENTRY;
			let result = api.call(flags, &BOB_ADDR, 0, 0, None, &value(0), b"", None);
			// The contract under test has no code registered.
			assert_eq!(result, Err(ReturnErrorCode::NotCallable));
			let _ = api.call(CallFlags::empty(), &BOB_ADDR, 0, 0, None, &value(0), b"", None);
			Ok(())
		})
		.unwrap();
	assert_eq!(execution.outcome, Outcome::Trapped(SandboxError::ReentranceDenied));
}

#[test]
fn read_only_calls_cannot_transfer() {
	let mut sandbox = common::deployed::<Seal>(Config::default());
	register_callees(sandbox.host());
	let execution = sandbox
		.call::<Seal, _>(&[], |invocation| {
			let api = invocation.api();
			api.call(CallFlags::READ_ONLY, &CHARLIE_ADDR, 0, 0, None, &value(0), b"", None)?;
			let _ = api.call(CallFlags::READ_ONLY, &CHARLIE_ADDR, 0, 0, None, &value(1), b"", None);
			Ok(())
		})
		.unwrap();
	assert_eq!(execution.outcome, Outcome::Trapped(SandboxError::StateChangeDenied));
}

fn tail_calls_end_the_invocation<R: Revision>() {
	let mut sandbox = common::deployed::<R>(Config::default());
	register_callees(sandbox.host());

	let execution = sandbox
		.call::<R, _>(&[], |invocation| {
			let _ = invocation.api().call(
				CallFlags::TAIL_CALL,
				&CHARLIE_ADDR,
				0,
				0,
				None,
				&value(0),
				b"tail",
				None,
			);
			unreachable!("tail calls do not return");
		})
		.unwrap();
	assert_eq!(
		execution.outcome,
		Outcome::Returned { flags: ReturnFlags::empty(), data: b"liat".to_vec() }
	);

	let execution = sandbox
		.call::<R, _>(&[], |invocation| {
			let _ = invocation.api().call(
				CallFlags::TAIL_CALL,
				&[4; 20],
				0,
				0,
				None,
				&value(0),
				b"tail",
				None,
			);
			unreachable!("tail calls do not return");
		})
		.unwrap();
	assert_eq!(
		execution.outcome,
		Outcome::Returned { flags: ReturnFlags::REVERT, data: b"no:tail".to_vec() }
	);
}

#[test]
fn tail_calls_end_the_invocation_seal() {
	tail_calls_end_the_invocation::<Seal>();
}

#[test]
fn tail_calls_end_the_invocation_v1() {
	tail_calls_end_the_invocation::<V1>();
}

#[test]
fn forwarded_input_is_consumed() {
	let mut sandbox = common::deployed::<Seal>(Config::default());
	register_callees(sandbox.host());
	let execution = sandbox
		.call::<Seal, _>(b"input", |invocation| {
			let api = invocation.api();
			let mut buffer = [0u8; 16];
			let mut output = &mut buffer[..];
			let flags = CallFlags::CLONE_INPUT;
			api.call(flags, &CHARLIE_ADDR, 0, 0, None, &value(0), b"", Some(&mut output))?;
			assert_eq!(&output[..], b"tupni");
			assert_eq!(common::read_input(api), b"input");

			api.call(CallFlags::FORWARD_INPUT, &CHARLIE_ADDR, 0, 0, None, &value(0), b"", None)?;
			common::read_input(api);
			Ok(())
		})
		.unwrap();
	assert_eq!(execution.outcome, Outcome::Trapped(SandboxError::InputForwarded));
}

fn delegate_calls_run_code_by_hash<R: Revision>() {
	let mut sandbox = common::deployed::<R>(Config::default());
	register_callees(sandbox.host());

	let execution = sandbox
		.call::<R, _>(&[], |invocation| {
			let api = invocation.api();
			let mut buffer = [0u8; 16];
			let mut output = &mut buffer[..];
			api.delegate_call(CallFlags::empty(), &REVERSE, b"abc", Some(&mut output))?;
			assert_eq!(&output[..], b"cba");

			let result = api.delegate_call(CallFlags::empty(), &[0xEE; 32], b"abc", None);
			assert_eq!(result, Err(ReturnErrorCode::CodeNotFound));

			let _ = api.delegate_call(CallFlags::READ_ONLY, &REVERSE, b"abc", None);
			Ok(())
		})
		.unwrap();
	assert_eq!(
		execution.outcome,
		Outcome::Trapped(SandboxError::InvalidCallFlags(CallFlags::READ_ONLY.bits()))
	);
}

#[test]
fn delegate_calls_run_code_by_hash_seal() {
	delegate_calls_run_code_by_hash::<Seal>();
}

#[test]
fn delegate_calls_run_code_by_hash_v1() {
	delegate_calls_run_code_by_hash::<V1>();
}

fn expected_address(code_hash: &[u8; 32], salt: &[u8]) -> [u8; 20] {
	let preimage = [&BOB_ADDR[..], &code_hash[..], salt].concat();
	let hash = sp_crypto_hashing::keccak_256(&preimage);
	let mut address = [0u8; 20];
	address.copy_from_slice(&hash[12..]);
	address
}

fn instantiate_places_a_contract<R: Revision>() {
	let mut sandbox = common::deployed::<R>(Config::default());
	register_callees(sandbox.host());

	let salt = [5u8; 32];
	let with_salt = expected_address(&REVERSE, &salt);
	let with_nonce = expected_address(&REVERSE, &1u64.to_le_bytes());

	let execution = sandbox
		.call::<R, _>(&[], |invocation| {
			let api = invocation.api();
			assert_eq!(api.instantiation_nonce(), 0);

			let mut address = [0u8; 20];
			let mut buffer = [0u8; 16];
			let mut output = &mut buffer[..];
			api.instantiate(
				&REVERSE,
				0,
				0,
				None,
				&value(10),
				b"ctor",
				Some(&mut address),
				Some(&mut output),
				Some(&salt),
			)?;
			assert_eq!(address, with_salt);
			assert_eq!(&output[..], b"rotc");
			assert!(api.is_contract(&address));
			assert_eq!(api.instantiation_nonce(), 1);

			let mut address = [0u8; 20];
			api.instantiate(&REVERSE, 0, 0, None, &value(0), b"", Some(&mut address), None, None)?;
			assert_eq!(address, with_nonce);

			let mut address = [0u8; 20];
			let zero = value(0);
			let result =
				api.instantiate(&REVERT, 0, 0, None, &zero, b"", Some(&mut address), None, None);
			assert_eq!(result, Err(ReturnErrorCode::CalleeReverted));
			assert_eq!(address, [0u8; 20]);

			let result =
				api.instantiate(&[0xEE; 32], 0, 0, None, &value(0), b"", None, None, None);
			assert_eq!(result, Err(ReturnErrorCode::CodeNotFound));
			Ok(())
		})
		.unwrap();

	assert_eq!(execution.outcome, Outcome::Completed);
	assert_eq!(sandbox.host().contract_at(&with_salt), Some(REVERSE));
	assert_eq!(sandbox.host().balance_of(&with_salt), 10);
	assert_eq!(sandbox.host().instantiation_nonce(), 2);
}

#[test]
fn instantiate_places_a_contract_seal() {
	instantiate_places_a_contract::<Seal>();
}

#[test]
fn instantiate_places_a_contract_v1() {
	instantiate_places_a_contract::<V1>();
}

#[test]
fn instantiating_twice_at_one_address_traps() {
	let mut sandbox = common::deployed::<V1>(Config::default());
	register_callees(sandbox.host());
	let execution = sandbox
		.call::<V1, _>(&[], |invocation| {
			let api = invocation.api();
			let salt = [1u8; 32];
			api.instantiate(&REVERSE, 0, 0, None, &value(0), b"", None, None, Some(&salt))?;
			let _ = api.instantiate(&REVERSE, 0, 0, None, &value(0), b"", None, None, Some(&salt));
			Ok(())
		})
		.unwrap();
	assert_matches!(execution.outcome, Outcome::Trapped(SandboxError::DuplicateContract));
	// The trap rolls back the first instantiation too.
	assert_eq!(sandbox.host().instantiation_nonce(), 0);
}
