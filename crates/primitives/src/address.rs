//! 20-byte code and principal addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::literal::{ParseHexError, parse_fixed};
use crate::keccak::keccak256;

/// Address of deployed code or of a calling principal.
///
/// [`Address::ZERO`] is the null address: it never holds code and is used by
/// remove cuts and "no initializer" arguments.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
	/// The null address.
	pub const ZERO: Address = Address([0u8; 20]);

	/// Byte width of an address.
	pub const LEN: usize = 20;

	/// Returns true for the null address.
	#[inline]
	pub fn is_zero(&self) -> bool {
		*self == Self::ZERO
	}

	/// Returns `None` for the null address, `Some(self)` otherwise.
	#[inline]
	pub fn non_zero(self) -> Option<Self> {
		(!self.is_zero()).then_some(self)
	}

	/// Derives a deterministic address from a deployer label and nonce.
	///
	/// Takes the low 20 bytes of `keccak256(label ‖ nonce_be)`, in the spirit of
	/// contract-creation addresses.
	pub fn derive(label: &str, nonce: u64) -> Self {
		let mut preimage = Vec::with_capacity(label.len() + 8);
		preimage.extend_from_slice(label.as_bytes());
		preimage.extend_from_slice(&nonce.to_be_bytes());
		let digest = keccak256(&preimage);
		let mut out = [0u8; 20];
		out.copy_from_slice(&digest[12..]);
		Self(out)
	}

	/// Builds an address whose final byte is `n`; handy for fixtures.
	pub const fn from_low_u8(n: u8) -> Self {
		let mut bytes = [0u8; 20];
		bytes[19] = n;
		Self(bytes)
	}

	/// Raw bytes.
	#[inline]
	pub fn as_bytes(&self) -> &[u8; 20] {
		&self.0
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(self.0))
	}
}

impl fmt::Debug for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Address({self})")
	}
}

impl FromStr for Address {
	type Err = ParseHexError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse_fixed::<20>(s).map(Self)
	}
}

impl From<[u8; 20]> for Address {
	fn from(bytes: [u8; 20]) -> Self {
		Self(bytes)
	}
}

impl Serialize for Address {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		if serializer.is_human_readable() {
			serializer.collect_str(self)
		} else {
			self.0.serialize(serializer)
		}
	}
}

impl<'de> Deserialize<'de> for Address {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		if deserializer.is_human_readable() {
			let s = String::deserialize(deserializer)?;
			s.parse().map_err(serde::de::Error::custom)
		} else {
			<[u8; 20]>::deserialize(deserializer).map(Self)
		}
	}
}
