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

//! Limits that are observeable by contract code.
//!
//! Guest and host both rely on these values, so they are part of the ABI revision. Never change
//! them without bumping the revision.

/// The word size the heap is aligned to.
///
/// It matches the 256 bit word the host uses for hashes, balances and storage values.
pub const WORD_SIZE: u32 = 32;

/// The default size of the statically allocated guest heap.
pub const HEAP_SIZE: u32 = 64 * 1024;

/// The maximum allowable length in bytes for (transient) storage keys.
pub const STORAGE_KEY_BYTES: u32 = 128;

/// Maximum size of events (including topics) and storage values.
pub const PAYLOAD_BYTES: u32 = 512;

/// The maximum number of topics a call to `deposit_event` can emit.
///
/// We set it to the same limit that ethereum has. It is unlikely to change.
pub const NUM_EVENT_TOPICS: u32 = 4;

/// The maximum size of the immutable data blob a contract can set during `deploy`.
pub const IMMUTABLE_DATA_BYTES: u32 = 4 * 1024;

/// The maximum number of arguments a host function may take.
///
/// PolkaVM passes host function arguments in registers `a0` to `a5`.
pub const HOST_FN_ARGS: usize = 6;
