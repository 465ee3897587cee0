//! Call selectors: the 4-byte identifiers calls are routed by.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::literal::{ParseHexError, parse_fixed};
use crate::keccak::keccak256;

/// Fixed-width call identifier.
///
/// Derived as the first four bytes of `keccak256(signature)` where the
/// signature is the canonical `name(type,...)` form with no spaces. Distinct
/// signatures may collide; nothing here detects that.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector(pub [u8; 4]);

impl Selector {
	/// Byte width of a selector.
	pub const LEN: usize = 4;

	/// Derives the selector of a canonical function signature.
	pub fn from_signature(signature: &str) -> Self {
		let digest = keccak256(signature.as_bytes());
		Self([digest[0], digest[1], digest[2], digest[3]])
	}

	/// Splits calldata into its selector and argument bytes.
	///
	/// Returns `None` when fewer than four bytes are present.
	pub fn split_calldata(calldata: &[u8]) -> Option<(Self, &[u8])> {
		let (head, rest) = calldata.split_first_chunk::<4>()?;
		Some((Self(*head), rest))
	}

	/// Interprets the selector as a big-endian integer.
	#[inline]
	pub fn as_u32(&self) -> u32 {
		u32::from_be_bytes(self.0)
	}
}

/// Computes an ERC-165 interface id: the XOR of all selectors in the interface.
pub fn interface_id<'a>(selectors: impl IntoIterator<Item = &'a Selector>) -> Selector {
	let folded = selectors
		.into_iter()
		.fold(0u32, |acc, sel| acc ^ sel.as_u32());
	Selector(folded.to_be_bytes())
}

impl fmt::Display for Selector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(self.0))
	}
}

impl fmt::Debug for Selector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Selector({self})")
	}
}

impl FromStr for Selector {
	type Err = ParseHexError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse_fixed::<4>(s).map(Self)
	}
}

impl From<[u8; 4]> for Selector {
	fn from(bytes: [u8; 4]) -> Self {
		Self(bytes)
	}
}

impl Serialize for Selector {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		if serializer.is_human_readable() {
			serializer.collect_str(self)
		} else {
			self.0.serialize(serializer)
		}
	}
}

impl<'de> Deserialize<'de> for Selector {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		if deserializer.is_human_readable() {
			let s = String::deserialize(deserializer)?;
			s.parse().map_err(serde::de::Error::custom)
		} else {
			<[u8; 4]>::deserialize(deserializer).map(Self)
		}
	}
}
