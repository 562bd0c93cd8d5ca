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

//! Running entry functions against the simulated host.

use crate::{HostExit, MockHost, SandboxError, LOG_TARGET};
use revive_guest_uapi::{
	host::{seal, v1},
	limits::HEAP_SIZE,
	Allocator, Arena, EntryPoint, Error, HostFn, Invocation, ReturnFlags, State,
};
use std::{
	any::Any,
	panic::{self, AssertUnwindSafe},
};

/// The heap every invocation in the sandbox allocates from.
pub type Heap = Arena<{ HEAP_SIZE as usize }>;

/// The invocation an entry function receives when run in the sandbox with revision `R`.
pub type SandboxInvocation<'a, R> = Invocation<&'a mut Heap, <R as Revision>::Api>;

/// An ABI revision the sandbox can speak.
pub trait Revision {
	/// The typed host API of the revision on top of the simulated host.
	type Api: HostFn;

	fn api(host: MockHost) -> Self::Api;
}

/// The 32-bit `seal` revision.
pub enum Seal {}

/// The 64-bit `v1` revision.
pub enum V1 {}

impl Revision for Seal {
	type Api = seal::Api<MockHost>;

	fn api(host: MockHost) -> Self::Api {
		seal::Api::new(host)
	}
}

impl Revision for V1 {
	type Api = v1::Api<MockHost>;

	fn api(host: MockHost) -> Self::Api {
		v1::Api::new(host)
	}
}

/// How an invocation ended, as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	/// The contract called `seal_return`.
	Returned { flags: ReturnFlags, data: Vec<u8> },
	/// The entry function ran to its end without returning data.
	Completed,
	/// The contract removed itself.
	Terminated { beneficiary: [u8; 20] },
	/// The invocation trapped.
	Trapped(SandboxError),
}

impl Outcome {
	/// Whether the state changes of the invocation are discarded.
	pub fn is_reverted(&self) -> bool {
		match self {
			Self::Returned { flags, .. } => flags.contains(ReturnFlags::REVERT),
			Self::Trapped(_) => true,
			Self::Completed | Self::Terminated { .. } => false,
		}
	}

	/// The data handed back to the host. Empty unless the contract returned data.
	pub fn data(&self) -> &[u8] {
		match self {
			Self::Returned { data, .. } => data,
			_ => &[],
		}
	}

	/// The final state of the invocation this outcome belongs to.
	pub fn state(&self) -> State {
		match self {
			Self::Returned { .. } => State::ReturnedWithData,
			Self::Completed | Self::Terminated { .. } => State::Returned,
			Self::Trapped(_) => State::Trapped,
		}
	}
}

/// The result of a single invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
	pub outcome: Outcome,
	/// Bytes of heap the invocation reserved.
	pub high_water_mark: u32,
	pub state: State,
}

/// A contract instance backed by a [`MockHost`].
///
/// Each invocation starts with an empty heap, just as a freshly mapped memory image would.
pub struct Sandbox {
	host: MockHost,
	heap: Box<Heap>,
}

impl Sandbox {
	pub fn new(config: crate::Config) -> Self {
		Self { host: MockHost::new(config), heap: Box::default() }
	}

	/// The host the contract talks to.
	pub fn host(&self) -> &MockHost {
		&self.host
	}

	/// Invoke the `deploy` export.
	///
	/// Fails without running `entry` if the contract is already deployed or was terminated.
	pub fn deploy<R, F>(&mut self, input: &[u8], entry: F) -> Result<Execution, SandboxError>
	where
		R: Revision,
		F: FnOnce(&mut SandboxInvocation<R>) -> Result<(), Error>,
	{
		self.invoke::<R, F>(EntryPoint::Deploy, input, entry)
	}

	/// Invoke the `call` export.
	///
	/// Fails without running `entry` if the contract was terminated.
	pub fn call<R, F>(&mut self, input: &[u8], entry: F) -> Result<Execution, SandboxError>
	where
		R: Revision,
		F: FnOnce(&mut SandboxInvocation<R>) -> Result<(), Error>,
	{
		self.invoke::<R, F>(EntryPoint::Call, input, entry)
	}

	fn invoke<R, F>(
		&mut self,
		entry: EntryPoint,
		input: &[u8],
		f: F,
	) -> Result<Execution, SandboxError>
	where
		R: Revision,
		F: FnOnce(&mut SandboxInvocation<R>) -> Result<(), Error>,
	{
		self.host.begin(entry, input.to_vec())?;
		self.heap.reset();

		let mut invocation = Invocation::new(entry, &mut *self.heap, R::api(self.host.clone()));
		let result = panic::catch_unwind(AssertUnwindSafe(|| invocation.run(f)));
		drop(invocation);

		let outcome = outcome_of(result);
		log::debug!(target: LOG_TARGET, "{} ended: {outcome:?}", entry.symbol());
		self.host.finish(&outcome);

		Ok(Execution {
			state: outcome.state(),
			outcome,
			high_water_mark: self.heap.current_size(),
		})
	}
}

fn outcome_of(result: std::thread::Result<Result<(), Error>>) -> Outcome {
	let payload = match result {
		Ok(Ok(())) => return Outcome::Completed,
		Ok(Err(err)) => return Outcome::Trapped(SandboxError::EntryFailed(err.to_string())),
		Err(payload) => payload,
	};

	match payload.downcast::<HostExit>() {
		Ok(exit) => match *exit {
			HostExit::Return { flags, data } => Outcome::Returned { flags, data },
			HostExit::Termination { beneficiary } => Outcome::Terminated { beneficiary },
			HostExit::Trap(err) => Outcome::Trapped(err),
		},
		Err(payload) => Outcome::Trapped(SandboxError::ContractPanicked(panic_message(&*payload))),
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		message.to_string()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"unknown panic".into()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn reverts_and_traps_are_reverted() {
		let revert = Outcome::Returned { flags: ReturnFlags::REVERT, data: vec![1] };
		let success = Outcome::Returned { flags: ReturnFlags::empty(), data: vec![1] };
		assert!(revert.is_reverted());
		assert!(!success.is_reverted());
		assert!(Outcome::Trapped(SandboxError::CalleeTrapped).is_reverted());
		assert!(!Outcome::Completed.is_reverted());
		assert!(!Outcome::Terminated { beneficiary: [0; 20] }.is_reverted());
	}

	#[test]
	fn outcomes_map_to_final_states() {
		assert_eq!(Outcome::Completed.state(), State::Returned);
		assert_eq!(Outcome::Terminated { beneficiary: [0; 20] }.state(), State::Returned);
		assert_eq!(
			Outcome::Returned { flags: ReturnFlags::empty(), data: vec![] }.state(),
			State::ReturnedWithData
		);
		assert_eq!(Outcome::Trapped(SandboxError::Terminated).state(), State::Trapped);
	}

	#[test]
	fn panic_payloads_become_traps() {
		let result = panic::catch_unwind(|| -> Result<(), Error> { panic!("boom") });
		assert_eq!(
			outcome_of(result),
			Outcome::Trapped(SandboxError::ContractPanicked("boom".into()))
		);

		let result = panic::catch_unwind(|| -> Result<(), Error> {
			panic::resume_unwind(Box::new(HostExit::Termination { beneficiary: [7; 20] }))
		});
		assert_eq!(outcome_of(result), Outcome::Terminated { beneficiary: [7; 20] });
	}
}
