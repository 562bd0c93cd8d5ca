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

//! Deploy and call, termination, immutable data and the heap of an invocation.

mod common;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use revive_guest_sandbox::{
	Config, Outcome, Revision, Sandbox, SandboxError, Seal, V1, CHARLIE_ADDR,
};
use revive_guest_uapi::{Error, HostFn, OutOfMemory, ReturnErrorCode, ReturnFlags, State};

fn input_is_echoed<R: Revision>() {
	let mut sandbox = common::deployed::<R>(Config::default());
	let execution = sandbox
		.call::<R, _>(b"hello", |invocation| {
			let input = common::read_input(invocation.api());
			invocation.return_value(ReturnFlags::empty(), &input)
		})
		.unwrap();

	assert_eq!(
		execution.outcome,
		Outcome::Returned { flags: ReturnFlags::empty(), data: b"hello".to_vec() }
	);
	assert_eq!(execution.state, State::ReturnedWithData);
}

#[test]
fn input_is_echoed_seal() {
	input_is_echoed::<Seal>();
}

#[test]
fn input_is_echoed_v1() {
	input_is_echoed::<V1>();
}

fn short_buffers_truncate_the_input<R: Revision>() {
	let mut sandbox = common::deployed::<R>(Config::default());
	let execution = sandbox
		.call::<R, _>(b"hello", |invocation| {
			let mut buffer = [0u8; 3];
			let mut input = &mut buffer[..];
			invocation.api().input(&mut input);
			let input = input.to_vec();
			invocation.return_value(ReturnFlags::empty(), &input)
		})
		.unwrap();
	assert_eq!(execution.outcome.data(), b"hel");
}

#[test]
fn short_buffers_truncate_the_input_seal() {
	short_buffers_truncate_the_input::<Seal>();
}

#[test]
fn short_buffers_truncate_the_input_v1() {
	short_buffers_truncate_the_input::<V1>();
}

#[test]
fn entries_see_which_export_runs() {
	common::init_logger();
	let mut sandbox = Sandbox::new(Config::default());

	let execution = sandbox
		.deploy::<Seal, _>(&[], |invocation| {
			assert!(invocation.is_deploy());
			assert_eq!(invocation.state(), State::Executing);
			Ok(())
		})
		.unwrap();
	assert_eq!(execution.outcome, Outcome::Completed);
	assert_eq!(execution.state, State::Returned);
	assert!(sandbox.host().is_deployed());

	let execution = sandbox
		.call::<Seal, _>(&[], |invocation| {
			assert!(!invocation.is_deploy());
			Ok(())
		})
		.unwrap();
	assert_eq!(execution.outcome, Outcome::Completed);

	let err = sandbox.deploy::<Seal, _>(&[], |_| Ok(())).unwrap_err();
	assert_eq!(err, SandboxError::AlreadyDeployed);
}

#[test]
fn trapped_deploys_can_be_retried() {
	common::init_logger();
	let mut sandbox = Sandbox::new(Config::default());

	let execution = sandbox
		.deploy::<V1, _>(&[], |invocation| {
			invocation.api().set_immutable_data(b"first");
			Err(Error::HostRejected(ReturnErrorCode::Unknown))
		})
		.unwrap();
	assert_matches!(execution.outcome, Outcome::Trapped(SandboxError::EntryFailed(_)));
	assert_eq!(execution.state, State::Trapped);
	assert!(!sandbox.host().is_deployed());
	assert_eq!(sandbox.host().immutable_data(), None);

	let execution = sandbox
		.deploy::<V1, _>(&[], |invocation| {
			invocation.api().set_immutable_data(b"second");
			Ok(())
		})
		.unwrap();
	assert_eq!(execution.outcome, Outcome::Completed);
	assert_eq!(sandbox.host().immutable_data(), Some(b"second".to_vec()));
}

fn immutable_data_is_set_once_during_deploy<R: Revision>() {
	common::init_logger();
	let mut sandbox = Sandbox::new(Config::default());
	sandbox
		.deploy::<R, _>(&[], |invocation| {
			invocation.api().set_immutable_data(b"immutable");
			Ok(())
		})
		.unwrap();

	let execution = sandbox
		.call::<R, _>(&[], |invocation| {
			let mut buffer = [0u8; 32];
			let mut output = &mut buffer[..];
			invocation.api().get_immutable_data(&mut output);
			let output = output.to_vec();
			invocation.return_value(ReturnFlags::empty(), &output)
		})
		.unwrap();
	assert_eq!(execution.outcome.data(), b"immutable");

	let execution = sandbox
		.call::<R, _>(&[], |invocation| {
			invocation.api().set_immutable_data(b"again");
			Ok(())
		})
		.unwrap();
	assert_eq!(execution.outcome, Outcome::Trapped(SandboxError::InvalidImmutableAccess));
}

#[test]
fn immutable_data_is_set_once_during_deploy_seal() {
	immutable_data_is_set_once_during_deploy::<Seal>();
}

#[test]
fn immutable_data_is_set_once_during_deploy_v1() {
	immutable_data_is_set_once_during_deploy::<V1>();
}

#[test]
fn immutable_data_rules() {
	common::init_logger();

	let mut sandbox = Sandbox::new(Config::default());
	let execution = sandbox
		.deploy::<Seal, _>(&[], |invocation| {
			let mut buffer = [0u8; 8];
			let mut output = &mut buffer[..];
			invocation.api().get_immutable_data(&mut output);
			Ok(())
		})
		.unwrap();
	assert_eq!(execution.outcome, Outcome::Trapped(SandboxError::InvalidImmutableAccess));

	let execution = sandbox
		.deploy::<Seal, _>(&[], |invocation| {
			invocation.api().set_immutable_data(b"a");
			invocation.api().set_immutable_data(b"b");
			Ok(())
		})
		.unwrap();
	assert_eq!(execution.outcome, Outcome::Trapped(SandboxError::ImmutableDataAlreadySet));

	let execution = sandbox
		.deploy::<Seal, _>(&[], |invocation| {
			invocation.api().set_immutable_data(&[0u8; 4097]);
			Ok(())
		})
		.unwrap();
	assert_eq!(execution.outcome, Outcome::Trapped(SandboxError::ImmutableDataTooLarge(4097)));

	// Preset immutable data marks the contract as deployed.
	let mut sandbox = Sandbox::new(Config::default().immutable_data(b"preset".to_vec()));
	assert!(sandbox.host().is_deployed());
	let execution = sandbox
		.call::<Seal, _>(&[], |invocation| {
			let mut buffer = [0u8; 8];
			let mut output = &mut buffer[..];
			invocation.api().get_immutable_data(&mut output);
			let output = output.to_vec();
			invocation.return_value(ReturnFlags::empty(), &output)
		})
		.unwrap();
	assert_eq!(execution.outcome.data(), b"preset");
}

fn terminate_removes_the_contract<R: Revision>() {
	let mut sandbox = common::deployed::<R>(Config::default());
	sandbox.host().insert_storage(b"key", b"value");

	let execution = sandbox
		.call::<R, _>(&[], |invocation| invocation.terminate(&CHARLIE_ADDR))
		.unwrap();

	assert_eq!(execution.outcome, Outcome::Terminated { beneficiary: CHARLIE_ADDR });
	assert_eq!(execution.state, State::Returned);
	let host = sandbox.host();
	assert!(host.is_terminated());
	assert_eq!(host.balance_of(&CHARLIE_ADDR), 1_000_000);
	assert_eq!(host.contract_at(&common::CONTRACT), None);
	assert_eq!(host.storage(b"key"), None);

	assert_eq!(sandbox.call::<R, _>(&[], |_| Ok(())).unwrap_err(), SandboxError::Terminated);
}

#[test]
fn terminate_removes_the_contract_seal() {
	terminate_removes_the_contract::<Seal>();
}

#[test]
fn terminate_removes_the_contract_v1() {
	terminate_removes_the_contract::<V1>();
}

#[test]
fn panics_trap() {
	let mut sandbox = common::deployed::<Seal>(Config::default());
	let execution = sandbox.call::<Seal, _>(&[], |_| panic!("boom")).unwrap();
	assert_eq!(execution.outcome, Outcome::Trapped(SandboxError::ContractPanicked("boom".into())));
}

#[test]
fn invalid_return_flags_trap() {
	let mut sandbox = common::deployed::<Seal>(Config::default());
	let execution = sandbox
		.call::<Seal, _>(&[], |invocation| {
			let flags = unsafe { ReturnFlags::from_bits_unchecked(0b10) };
			invocation.return_value(flags, b"")
		})
		.unwrap();
	assert_eq!(execution.outcome, Outcome::Trapped(SandboxError::InvalidReturnFlags(0b10)));
}

#[test]
fn every_invocation_starts_with_an_empty_heap() {
	common::init_logger();
	let mut sandbox = Sandbox::new(Config::default());

	let execution = sandbox
		.deploy::<Seal, _>(&[], |invocation| {
			let first = invocation.alloc(40)?;
			let second = invocation.alloc(1)?;
			assert_eq!(second.as_ptr() as usize - first.as_ptr() as usize, 64);
			Ok(())
		})
		.unwrap();
	assert_eq!(execution.high_water_mark, 96);

	let execution = sandbox.call::<Seal, _>(&[], |_| Ok(())).unwrap();
	assert_eq!(execution.high_water_mark, 0);

	let execution = sandbox
		.call::<Seal, _>(&[], |invocation| {
			let ptr = invocation.alloc(8)?;
			// Fresh memory is zeroed even though the previous invocation used it.
			assert_eq!(unsafe { ptr.as_ptr().read() }, 0);
			unsafe { ptr.as_ptr().write(0xFF) };
			Ok(())
		})
		.unwrap();
	assert_eq!(execution.high_water_mark, 32);

	let execution = sandbox
		.call::<Seal, _>(&[], |invocation| {
			let ptr = invocation.alloc(8)?;
			assert_eq!(unsafe { ptr.as_ptr().read() }, 0);
			Ok(())
		})
		.unwrap();
	assert_eq!(execution.outcome, Outcome::Completed);
}

#[test]
fn exhausting_the_heap_traps() {
	let mut sandbox = common::deployed::<V1>(Config::default());
	let execution = sandbox
		.call::<V1, _>(&[], |invocation| {
			invocation.alloc(64 * 1024 - 32)?;
			let err = OutOfMemory { offset: 64 * 1024 - 32, size: 33, ceiling: 64 * 1024 };
			assert_eq!(invocation.alloc(33).map(|_| ()), Err(err));
			invocation.alloc(32)?;
			invocation.alloc(1)?;
			Ok(())
		})
		.unwrap();
	assert_matches!(
		execution.outcome,
		Outcome::Trapped(SandboxError::EntryFailed(ref message)) if message.contains("out of memory")
	);
	assert_eq!(execution.high_water_mark, 64 * 1024);
}
