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

//! The `deploy` and `call` exports.
//!
//! The host invokes exactly one of the two exports per external invocation. Both funnel into one
//! entry function that receives an [`Invocation`]: it owns the allocator and the host API for the
//! duration of the entry and tracks where the invocation stands.
//!
//! ```text
//! Unstarted -> Executing -> Returned | ReturnedWithData | Trapped
//! ```
//!
//! There is no way back. Every invocation starts from a freshly mapped memory image, which is why
//! the allocator is handed in rather than kept around.

use crate::{abi, Allocator, Error, HostFn, OutOfMemory, ReturnFlags, LOG_TARGET};
use core::ptr::NonNull;

/// Which export the host invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
	/// The contract is being instantiated.
	Deploy,
	/// The contract is being called.
	Call,
}

impl EntryPoint {
	pub const fn from_flag(is_deploy: bool) -> Self {
		if is_deploy {
			Self::Deploy
		} else {
			Self::Call
		}
	}

	pub const fn is_deploy(self) -> bool {
		matches!(self, Self::Deploy)
	}

	/// The name of the export.
	pub const fn symbol(self) -> &'static str {
		match self {
			Self::Deploy => abi::DEPLOY,
			Self::Call => abi::CALL,
		}
	}
}

/// Where an [`Invocation`] stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
	/// The entry function did not run yet.
	Unstarted,
	/// The entry function is running.
	Executing,
	/// The entry function ran to its end or the contract terminated itself.
	Returned,
	/// The contract handed data back to the host with `seal_return`.
	ReturnedWithData,
	/// The entry function failed. The host discards every state change of the invocation.
	Trapped,
}

impl State {
	/// Whether the invocation is over.
	pub const fn is_finished(self) -> bool {
		matches!(self, Self::Returned | Self::ReturnedWithData | Self::Trapped)
	}
}

/// One run of an entry function.
pub struct Invocation<A, H> {
	entry: EntryPoint,
	state: State,
	allocator: A,
	api: H,
}

impl<A: Allocator, H: HostFn> Invocation<A, H> {
	pub fn new(entry: EntryPoint, allocator: A, api: H) -> Self {
		Self { entry, state: State::Unstarted, allocator, api }
	}

	pub fn entry(&self) -> EntryPoint {
		self.entry
	}

	pub fn is_deploy(&self) -> bool {
		self.entry.is_deploy()
	}

	pub fn state(&self) -> State {
		self.state
	}

	pub fn allocator(&mut self) -> &mut A {
		&mut self.allocator
	}

	pub fn api(&mut self) -> &mut H {
		&mut self.api
	}

	/// Reserve `size` bytes of scratch memory for the rest of the invocation.
	pub fn alloc(&mut self, size: u32) -> Result<NonNull<u8>, OutOfMemory> {
		self.allocator.grow(size)
	}

	/// Run `f` as the entry function.
	///
	/// # Panics
	///
	/// Panics if the invocation already ran.
	pub fn run<F>(&mut self, f: F) -> Result<(), Error>
	where
		F: FnOnce(&mut Self) -> Result<(), Error>,
	{
		assert_eq!(self.state, State::Unstarted, "an invocation runs exactly once");
		self.state = State::Executing;
		log::trace!(target: LOG_TARGET, "entering {}", self.entry.symbol());

		let result = f(self);
		self.state = match result {
			Ok(()) => State::Returned,
			Err(ref err) => {
				log::debug!(target: LOG_TARGET, "{} trapped: {err}", self.entry.symbol());
				State::Trapped
			},
		};
		result
	}

	/// End the invocation handing `data` back to the host.
	pub fn return_value(&mut self, flags: ReturnFlags, data: &[u8]) -> ! {
		self.state = State::ReturnedWithData;
		self.api.return_value(flags, data)
	}

	/// End the invocation removing the contract. The remaining balance goes to `beneficiary`.
	pub fn terminate(&mut self, beneficiary: &[u8; 20]) -> ! {
		self.state = State::Returned;
		self.api.terminate(beneficiary)
	}

	pub fn into_parts(self) -> (A, H) {
		(self.allocator, self.api)
	}
}

/// Run `f` for the export selected by `is_deploy` and report how it ended along with what the
/// entry function returned.
///
/// An entry that returns normally ends in [`State::Returned`]. One that returns an error ends in
/// [`State::Trapped`] and the caller has to make the host trap.
pub fn dispatch<A, H, F>(
	is_deploy: bool,
	allocator: A,
	api: H,
	f: F,
) -> (State, Result<(), Error>)
where
	A: Allocator,
	H: HostFn,
	F: FnOnce(&mut Invocation<A, H>) -> Result<(), Error>,
{
	let mut invocation = Invocation::new(EntryPoint::from_flag(is_deploy), allocator, api);
	let result = invocation.run(f);
	(invocation.state(), result)
}

/// Generates the `deploy` and `call` exports around an entry function.
///
/// The entry function takes an `&mut Invocation<A, H>` and returns `Result<(), Error>`. By
/// default the heap is grown with the PolkaVM `sbrk` instruction. `heap = N` uses an
/// [`Arena`](crate::Arena) of `N` bytes on the stack of the export instead, so every invocation
/// starts with an empty one.
///
/// ```ignore
/// fn entry<A: Allocator, H: HostFn>(invocation: &mut Invocation<A, H>) -> Result<(), Error> {
///     if invocation.is_deploy() {
///         return Ok(())
///     }
///     let mut buffer = [0u8; 32];
///     let mut input = &mut buffer[..];
///     invocation.api().input(&mut input);
///     invocation.return_value(ReturnFlags::empty(), input)
/// }
///
/// entry_points!(entry);
/// ```
///
/// Erroring entries panic with the error, so the contract needs a panic handler that traps.
#[macro_export]
macro_rules! entry_points {
	($entry:path) => {
		$crate::entry_points!(@export $entry, $crate::Sbrk::new());
	};
	($entry:path, heap = $size:expr) => {
		$crate::entry_points!(@export $entry, $crate::Arena::<{ $size }>::new());
	};
	(@export $entry:path, $allocator:expr) => {
		#[inline(always)]
		fn __entry(is_deploy: bool) {
			let (_, result) = $crate::entry::dispatch(
				is_deploy,
				$allocator,
				$crate::HostFnImpl::new($crate::host::PolkaVm),
				$entry,
			);
			if let Err(err) = result {
				panic!("contract trapped: {err}");
			}
		}

		#[no_mangle]
		#[$crate::polkavm_derive::polkavm_export]
		pub extern "C" fn deploy() {
			__entry(true)
		}

		#[no_mangle]
		#[$crate::polkavm_derive::polkavm_export]
		pub extern "C" fn call() {
			__entry(false)
		}
	};
}
