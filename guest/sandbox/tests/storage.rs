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

//! Persistent and transient storage as seen through both ABI revisions.

mod common;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use revive_guest_sandbox::{Config, Outcome, Revision, SandboxError, Seal, V1};
use revive_guest_uapi::{HostFn, ReturnErrorCode, ReturnFlags, StorageFlags};

fn set_get_take_clear<R: Revision>() {
	let mut sandbox = common::deployed::<R>(Config::default());
	let execution = sandbox
		.call::<R, _>(&[], |invocation| {
			let api = invocation.api();
			let flags = StorageFlags::empty();
			assert_eq!(api.set_storage(flags, b"key", b"value"), None);
			assert_eq!(api.set_storage(flags, b"key", b"longer value"), Some(5));
			assert_eq!(api.contains_storage(flags, b"key"), Some(12));
			assert_eq!(api.contains_storage(flags, b"other"), None);

			let mut buffer = [0u8; 32];
			let mut output = &mut buffer[..];
			api.get_storage(flags, b"key", &mut output)?;
			assert_eq!(&output[..], b"longer value");

			let mut buffer = [0u8; 32];
			let mut output = &mut buffer[..];
			let result = api.get_storage(flags, b"other", &mut output);
			assert_eq!(result, Err(ReturnErrorCode::KeyNotFound));
			assert_eq!(output.len(), 32);

			assert_eq!(api.set_storage(flags, b"gone", b"soon"), None);
			let mut buffer = [0u8; 32];
			let mut output = &mut buffer[..];
			api.take_storage(flags, b"gone", &mut output)?;
			assert_eq!(&output[..], b"soon");
			assert_eq!(api.contains_storage(flags, b"gone"), None);

			assert_eq!(api.set_storage(flags, b"empty", b""), None);
			assert_eq!(api.contains_storage(flags, b"empty"), Some(0));
			assert_eq!(api.clear_storage(flags, b"empty"), Some(0));
			assert_eq!(api.clear_storage(flags, b"empty"), None);
			Ok(())
		})
		.unwrap();

	assert_eq!(execution.outcome, Outcome::Completed);
	assert_eq!(sandbox.host().storage(b"key"), Some(b"longer value".to_vec()));
	assert_eq!(sandbox.host().storage(b"gone"), None);
}

#[test]
fn set_get_take_clear_seal() {
	set_get_take_clear::<Seal>();
}

#[test]
fn set_get_take_clear_v1() {
	set_get_take_clear::<V1>();
}

fn values_are_truncated_to_the_buffer<R: Revision>() {
	let mut sandbox = common::deployed::<R>(Config::default());
	sandbox.host().insert_storage(b"key", b"0123456789");
	let execution = sandbox
		.call::<R, _>(&[], |invocation| {
			let mut buffer = [0u8; 4];
			let mut output = &mut buffer[..];
			invocation.api().get_storage(StorageFlags::empty(), b"key", &mut output)?;
			let output = output.to_vec();
			invocation.return_value(ReturnFlags::empty(), &output)
		})
		.unwrap();
	assert_eq!(execution.outcome.data(), b"0123");
}

#[test]
fn values_are_truncated_to_the_buffer_seal() {
	values_are_truncated_to_the_buffer::<Seal>();
}

#[test]
fn values_are_truncated_to_the_buffer_v1() {
	values_are_truncated_to_the_buffer::<V1>();
}

fn transient_storage_lives_for_one_invocation<R: Revision>() {
	let mut sandbox = common::deployed::<R>(Config::default());
	let transient = StorageFlags::TRANSIENT;

	let execution = sandbox
		.call::<R, _>(&[], |invocation| {
			let api = invocation.api();
			assert_eq!(api.set_storage(transient, b"lock", b"1"), None);
			assert_eq!(api.contains_storage(transient, b"lock"), Some(1));
			assert_eq!(api.contains_storage(StorageFlags::empty(), b"lock"), None);
			Ok(())
		})
		.unwrap();
	assert_eq!(execution.outcome, Outcome::Completed);
	assert_eq!(sandbox.host().storage(b"lock"), None);

	let execution = sandbox
		.call::<R, _>(&[], |invocation| {
			assert_eq!(invocation.api().contains_storage(transient, b"lock"), None);
			Ok(())
		})
		.unwrap();
	assert_eq!(execution.outcome, Outcome::Completed);
}

#[test]
fn transient_storage_lives_for_one_invocation_seal() {
	transient_storage_lives_for_one_invocation::<Seal>();
}

#[test]
fn transient_storage_lives_for_one_invocation_v1() {
	transient_storage_lives_for_one_invocation::<V1>();
}

#[test]
fn oversized_keys_trap() {
	let mut sandbox = common::deployed::<Seal>(Config::default());
	let execution = sandbox
		.call::<Seal, _>(&[], |invocation| {
			invocation.api().set_storage(StorageFlags::empty(), &[0u8; 129], b"value");
			Ok(())
		})
		.unwrap();
	assert_eq!(execution.outcome, Outcome::Trapped(SandboxError::KeyTooLarge(129)));
}

#[test]
fn oversized_values_trap() {
	let mut sandbox = common::deployed::<V1>(Config::default().max_value_len(8));
	let execution = sandbox
		.call::<V1, _>(&[], |invocation| {
			invocation.api().set_storage(StorageFlags::empty(), b"key", &[0u8; 9]);
			Ok(())
		})
		.unwrap();
	assert_eq!(execution.outcome, Outcome::Trapped(SandboxError::ValueTooLarge(9)));
}

#[test]
fn read_only_contracts_cannot_write() {
	let mut sandbox = common::deployed::<Seal>(Config::default().read_only(true));
	let execution = sandbox
		.call::<Seal, _>(&[], |invocation| {
			let api = invocation.api();
			assert_eq!(api.contains_storage(StorageFlags::empty(), b"key"), None);
			api.set_storage(StorageFlags::empty(), b"key", b"value");
			Ok(())
		})
		.unwrap();
	assert_matches!(execution.outcome, Outcome::Trapped(SandboxError::StateChangeDenied));
}

#[test]
fn reverted_writes_are_discarded() {
	let mut sandbox = common::deployed::<V1>(Config::default());
	sandbox.host().insert_storage(b"key", b"old");

	let execution = sandbox
		.call::<V1, _>(&[], |invocation| {
			invocation.api().set_storage(StorageFlags::empty(), b"key", b"new");
			invocation.return_value(ReturnFlags::REVERT, b"nope")
		})
		.unwrap();
	assert_eq!(
		execution.outcome,
		Outcome::Returned { flags: ReturnFlags::REVERT, data: b"nope".to_vec() }
	);
	assert_eq!(sandbox.host().storage(b"key"), Some(b"old".to_vec()));

	let execution = sandbox
		.call::<V1, _>(&[], |invocation| {
			invocation.api().set_storage(StorageFlags::empty(), b"key", b"new");
			Err(ReturnErrorCode::TransferFailed.into())
		})
		.unwrap();
	assert_matches!(execution.outcome, Outcome::Trapped(SandboxError::EntryFailed(_)));
	assert_eq!(sandbox.host().storage(b"key"), Some(b"old".to_vec()));
}

fn store_and_load<R: Revision>(key: &[u8], value: &[u8]) -> (Outcome, Option<Vec<u8>>) {
	let mut sandbox = common::deployed::<R>(Config::default());
	let execution = sandbox
		.call::<R, _>(&[], |invocation| {
			let api = invocation.api();
			api.set_storage(StorageFlags::empty(), key, value);
			let mut buffer = [0u8; 512];
			let mut output = &mut buffer[..];
			api.get_storage(StorageFlags::empty(), key, &mut output)?;
			let output = output.to_vec();
			invocation.return_value(ReturnFlags::empty(), &output)
		})
		.unwrap();
	(execution.outcome, sandbox.host().storage(key))
}

proptest! {
	#[test]
	fn both_revisions_store_the_same(
		key in prop::collection::vec(any::<u8>(), 1..=128),
		value in prop::collection::vec(any::<u8>(), 0..=512),
	) {
		let expected = Outcome::Returned { flags: ReturnFlags::empty(), data: value.clone() };
		let seal = store_and_load::<Seal>(&key, &value);
		let v1 = store_and_load::<V1>(&key, &value);
		prop_assert_eq!(&seal, &(expected, Some(value.clone())));
		prop_assert_eq!(&seal, &v1);
	}
}
