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

use revive_guest_uapi::ReturnFlags;

/// Everything that makes the simulated host trap a contract or refuse to run one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SandboxError {
	/// A pointer handed to the host does not address guest memory.
	#[error("out of bounds access at {0:#x}")]
	OutOfBounds(usize),
	/// A length or offset does not fit into the word the host expects.
	#[error("argument {0} does not fit into 32 bits")]
	ArgumentOverflow(u64),
	#[error("storage key of {0} bytes exceeds the limit")]
	KeyTooLarge(u32),
	#[error("value of {0} bytes exceeds the limit")]
	ValueTooLarge(u32),
	#[error("event with {0} topics exceeds the limit")]
	TooManyTopics(u32),
	#[error("invalid storage flags {0:#x}")]
	InvalidStorageFlags(u32),
	#[error("invalid call flags {0:#x}")]
	InvalidCallFlags(u32),
	#[error("invalid return flags {0:#x}")]
	InvalidReturnFlags(u32),
	/// The input was already handed to a callee with `FORWARD_INPUT`.
	#[error("input was forwarded to a callee")]
	InputForwarded,
	/// `set_immutable_data` outside of `deploy` or `get_immutable_data` during `deploy`.
	#[error("immutable data accessed in the wrong entry point")]
	InvalidImmutableAccess,
	#[error("immutable data was already set")]
	ImmutableDataAlreadySet,
	#[error("immutable data of {0} bytes exceeds the limit")]
	ImmutableDataTooLarge(u32),
	/// A contract called itself without `ALLOW_REENTRY`.
	#[error("reentrancy denied")]
	ReentranceDenied,
	#[error("state change in a read-only call")]
	StateChangeDenied,
	#[error("a contract already exists at the derived address")]
	DuplicateContract,
	/// An offset into the input or the return data lies beyond its end.
	#[error("offset {0} lies beyond the buffer")]
	OffsetOutOfBounds(u32),
	/// A callee of a tail call trapped.
	#[error("tail call trapped")]
	CalleeTrapped,
	#[error("no chain extension is registered")]
	NoChainExtension,
	/// Contract code panicked.
	#[error("contract panicked: {0}")]
	ContractPanicked(String),
	/// The entry function returned an error.
	#[error("entry point failed: {0}")]
	EntryFailed(String),
	#[error("the contract is already deployed")]
	AlreadyDeployed,
	#[error("the contract was terminated")]
	Terminated,
}

/// Why the host ended an invocation before the entry function returned.
///
/// Carried as the unwind payload from the host function back to the sandbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostExit {
	/// The contract called `seal_return`.
	Return { flags: ReturnFlags, data: Vec<u8> },
	/// The contract called `terminate`.
	Termination { beneficiary: [u8; 20] },
	/// The host refused to carry on.
	Trap(SandboxError),
}

impl From<SandboxError> for HostExit {
	fn from(err: SandboxError) -> Self {
		Self::Trap(err)
	}
}
