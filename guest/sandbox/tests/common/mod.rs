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

#![allow(dead_code)]

use revive_guest_sandbox::{Config, Sandbox, BOB_ADDR};
use revive_guest_uapi::{u256_bytes, HostFn};

pub fn init_logger() {
	let _ = env_logger::builder().is_test(true).try_init();
}

/// A sandbox with the default configuration that already ran its `deploy` export.
pub fn deployed<R: revive_guest_sandbox::Revision>(config: Config) -> Sandbox {
	init_logger();
	let mut sandbox = Sandbox::new(config);
	sandbox.deploy::<R, _>(&[], |_| Ok(())).expect("fresh sandboxes deploy");
	sandbox
}

/// Read the whole input of the current invocation.
pub fn read_input(api: &mut impl HostFn) -> Vec<u8> {
	let mut buffer = [0u8; 512];
	let mut input = &mut buffer[..];
	api.input(&mut input);
	input.to_vec()
}

pub fn value(amount: u64) -> [u8; 32] {
	u256_bytes(amount)
}

pub const CONTRACT: [u8; 20] = BOB_ADDR;
