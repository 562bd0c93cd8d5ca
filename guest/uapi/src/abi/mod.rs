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

//! The wire contract between guest and host.
//!
//! Every host function is an import with a fixed list of integer parameters. Guest and host have
//! to agree on name, order and width of every parameter; the host decodes registers positionally
//! and nothing but the linker checks the signature. This module holds the raw import tables of
//! both ABI revisions and a static description of each entry.
//!
//! - [`seal`]: 32-bit words. Pointers and lengths are separate words, variable sized results are
//!   reported through a length pointer, 64-bit scalars are split into low and high halves.
//! - [`v1`]: 64-bit words. Offsets and capacities are fused into one [`pack`]ed word and the status
//!   of a call is packed together with the produced length into the return value.
//!
//! A target uses exactly one revision. Mixing signatures of both corrupts the contract silently.

/// The contract call export.
pub const CALL: &str = "call";

/// The contract deploy export.
pub const DEPLOY: &str = "deploy";

/// All exported symbols. The host calls exactly one of them per invocation.
pub const EXPORTS: [&str; 2] = [CALL, DEPLOY];

/// What a parameter word carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
	/// Address of a buffer the host reads from.
	Ptr,
	/// Address of a buffer the host writes to.
	OutPtr,
	/// Length of the buffer passed in the preceding word.
	Len,
	/// Address of a `u32` that holds the capacity on entry and the produced length on exit.
	LenPtr,
	/// A plain value: flags, limits, offsets or halves of a 64-bit value.
	Scalar,
	/// Two 32-bit values fused into one 64-bit word, see [`pack`].
	Packed,
}

/// What a host function hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Returns {
	/// Nothing.
	Void,
	/// A status code, a length or the [`SENTINEL`](crate::SENTINEL).
	Status,
	/// A 64-bit word with the status in the high and a length or value in the low half.
	Packed,
	/// A plain scalar.
	Scalar,
	/// Control never comes back to the guest.
	Diverges,
}

/// The observable effect of calling a host function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
	/// Only reads state and writes the answer into guest memory.
	Read,
	/// Changes state that outlives the invocation.
	Mutate,
	/// Transfers control to another contract or ends the invocation.
	Control,
}

/// Describes one entry of an import table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCall {
	/// The symbol the host exports the function under.
	pub name: &'static str,
	/// Parameter words in order.
	pub params: &'static [Param],
	/// The return word.
	pub returns: Returns,
	/// The side effect class.
	pub effect: Effect,
}

impl HostCall {
	/// The number of argument registers the call occupies.
	pub const fn arity(&self) -> usize {
		self.params.len()
	}
}

/// Find the descriptor of `name` in `table`.
pub fn lookup<'a>(table: &'a [HostCall], name: &str) -> Option<&'a HostCall> {
	table.iter().find(|call| call.name == name)
}

macro_rules! host_calls {
	($( $name:ident ( $($param:ident),* ) -> $returns:ident, $effect:ident; )*) => {
		[
			$(
				$crate::abi::HostCall {
					name: stringify!($name),
					params: &[$($crate::abi::Param::$param),*],
					returns: $crate::abi::Returns::$returns,
					effect: $crate::abi::Effect::$effect,
				},
			)*
		]
	};
}
pub(crate) use host_calls;

pub mod seal;
pub mod v1;

/// Fuse two 32-bit values into one word: `hi` occupies bits 63..32, `lo` bits 31..0.
pub const fn pack(hi: u32, lo: u32) -> u64 {
	((hi as u64) << 32) | lo as u64
}

/// Split a word produced by [`pack`] into `(hi, lo)`.
pub const fn unpack(word: u64) -> (u32, u32) {
	((word >> 32) as u32, word as u32)
}

/// Split a 64-bit value into its `(lo, hi)` halves as passed by the [`seal`] revision.
pub const fn split(value: u64) -> (u32, u32) {
	(value as u32, (value >> 32) as u32)
}

/// Join `(lo, hi)` halves produced by [`split`].
pub const fn join(lo: u32, hi: u32) -> u64 {
	((hi as u64) << 32) | lo as u64
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::limits::HOST_FN_ARGS;

	fn names(table: &[HostCall]) -> Vec<&'static str> {
		let mut names: Vec<_> = table.iter().map(|call| call.name).collect();
		names.sort();
		names
	}

	#[test]
	fn packing_puts_hi_in_the_upper_half() {
		assert_eq!(pack(1, 2), 0x0000_0001_0000_0002);
		assert_eq!(unpack(0xFFFF_FFFF_0000_0010), (u32::MAX, 16));
		assert_eq!(unpack(pack(7, u32::MAX)), (7, u32::MAX));
	}

	#[test]
	fn split_and_join_are_inverse() {
		let value = 0x1234_5678_9ABC_DEF0;
		assert_eq!(split(value), (0x9ABC_DEF0, 0x1234_5678));
		let (lo, hi) = split(value);
		assert_eq!(join(lo, hi), value);
	}

	#[test]
	fn revisions_import_the_same_functions() {
		assert_eq!(names(&seal::IMPORTS), names(&v1::IMPORTS));
	}

	#[test]
	fn import_names_are_unique() {
		for table in [&seal::IMPORTS[..], &v1::IMPORTS[..]] {
			let mut names = names(table);
			let len = names.len();
			names.dedup();
			assert_eq!(names.len(), len);
		}
	}

	#[test]
	fn arguments_fit_into_registers() {
		for call in seal::IMPORTS.iter().chain(v1::IMPORTS.iter()) {
			assert!(call.arity() <= HOST_FN_ARGS, "{} takes too many arguments", call.name);
		}
	}

	#[test]
	fn length_pointers_only_exist_in_seal() {
		assert!(v1::IMPORTS.iter().all(|call| !call.params.contains(&Param::LenPtr)));
		assert!(seal::IMPORTS.iter().all(|call| !call.params.contains(&Param::Packed)));
		assert!(seal::IMPORTS.iter().all(|call| call.returns != Returns::Packed));
	}

	#[test]
	fn lengths_follow_pointers() {
		for call in seal::IMPORTS.iter().chain(v1::IMPORTS.iter()) {
			for (index, param) in call.params.iter().enumerate() {
				if *param == Param::Len {
					assert!(index > 0, "{} starts with a length", call.name);
					assert!(
						matches!(call.params[index - 1], Param::Ptr | Param::OutPtr),
						"{} passes a length without a pointer",
						call.name
					);
				}
			}
		}
	}

	#[test]
	fn the_revisions_differ_where_expected() {
		let seal = lookup(&seal::IMPORTS, "weight_to_fee").unwrap();
		let v1 = lookup(&v1::IMPORTS, "weight_to_fee").unwrap();
		assert_eq!(seal.arity(), 5);
		assert_eq!(v1.arity(), 3);

		let seal = lookup(&seal::IMPORTS, "get_storage").unwrap();
		let v1 = lookup(&v1::IMPORTS, "get_storage").unwrap();
		assert_eq!(seal.returns, Returns::Status);
		assert_eq!(v1.returns, Returns::Packed);
		assert_eq!(seal.params.last(), Some(&Param::LenPtr));
		assert_eq!(v1.params.last(), Some(&Param::Scalar));

		assert_eq!(lookup(&seal::IMPORTS, "seal_return").unwrap().returns, Returns::Diverges);
		assert_eq!(lookup(&v1::IMPORTS, "terminate").unwrap().effect, Effect::Control);
		assert!(lookup(&v1::IMPORTS, "sbrk").is_none());
	}

	#[test]
	fn block_hash_takes_the_number_by_value_only_in_v1() {
		let seal = lookup(&seal::IMPORTS, "block_hash").unwrap();
		let v1 = lookup(&v1::IMPORTS, "block_hash").unwrap();
		assert_eq!(seal.params, &[Param::Ptr, Param::OutPtr]);
		assert_eq!(v1.params, &[Param::Scalar, Param::OutPtr]);
	}

	#[test]
	fn code_and_origin_queries_are_imported() {
		for name in [
			"origin",
			"balance_of",
			"block_hash",
			"code_size",
			"own_code_hash",
			"set_code_hash",
			"caller_is_root",
			"call_chain_extension",
		] {
			assert!(lookup(&seal::IMPORTS, name).is_some(), "seal lacks {name}");
			assert!(lookup(&v1::IMPORTS, name).is_some(), "v1 lacks {name}");
		}
		assert_eq!(lookup(&seal::IMPORTS, "set_code_hash").unwrap().effect, Effect::Mutate);
		assert_eq!(seal::IMPORTS.len(), 44);
	}

	#[test]
	fn exports_are_call_and_deploy() {
		assert_eq!(EXPORTS, ["call", "deploy"]);
	}
}
