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

//! Runs revive guest entry points natively against a simulated host.
//!
//! The [`MockHost`] implements both raw import tables of `revive-guest-uapi`, so an entry function
//! written against [`HostFn`](revive_guest_uapi::HostFn) runs unchanged on the host machine with
//! either ABI revision. A [`Sandbox`] drives single invocations:
//!
//! ```
//! use revive_guest_sandbox::{Config, Outcome, Sandbox, Seal};
//! use revive_guest_uapi::{HostFn, ReturnFlags, StorageFlags};
//!
//! let mut sandbox = Sandbox::new(Config::default());
//! let execution = sandbox
//! 	.call::<Seal, _>(b"hello", |invocation| {
//! 		let mut buffer = [0u8; 16];
//! 		let mut input = &mut buffer[..];
//! 		invocation.api().input(&mut input);
//! 		let input = input.to_vec();
//! 		invocation.api().set_storage(StorageFlags::empty(), b"greeting", &input);
//! 		invocation.return_value(ReturnFlags::empty(), &input)
//! 	})
//! 	.unwrap();
//!
//! let expected = Outcome::Returned { flags: ReturnFlags::empty(), data: b"hello".to_vec() };
//! assert_eq!(execution.outcome, expected);
//! assert_eq!(sandbox.host().storage(b"greeting"), Some(b"hello".to_vec()));
//! ```
//!
//! Ending an invocation from inside a host function unwinds the guest. Contract code running in
//! the sandbox must therefore not catch panics.

mod config;
mod error;
mod host;
mod memory;
mod sandbox;

pub use config::{Config, ALICE_ADDR, BOB_ADDR, CHARLIE_ADDR};
pub use error::{HostExit, SandboxError};
pub use host::{ChainExtension, Code, Event, HostResult, MockHost, Reply};
pub use sandbox::{Execution, Heap, Outcome, Revision, Sandbox, SandboxInvocation, Seal, V1};

/// The target that is used for the log output emitted by this crate.
pub const LOG_TARGET: &str = "runtime::revive::sandbox";
