//! Events emitted by calls and returned in receipts.

use lapis_primitives::{AbiError, Address, FacetCut};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// An observable record of something a call did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all_fields = "camelCase")]
pub enum Event {
	/// A cut was applied.
	DiamondCut {
		/// The applied batch.
		#[serde(rename = "diamondCut")]
		cuts: Vec<FacetCut>,
		/// Initializer target, null if none ran.
		init: Address,
		/// Initializer calldata.
		#[serde(with = "hex_bytes")]
		calldata: Vec<u8>,
	},
	/// Ownership changed hands.
	OwnershipTransferred {
		/// Owner before the transfer.
		previous_owner: Address,
		/// Owner after the transfer.
		new_owner: Address,
	},
	/// Facet-defined log.
	Log {
		/// Facet code that emitted the log.
		emitter: Address,
		/// Log name.
		name: String,
		/// Encoded payload.
		#[serde(with = "hex_bytes")]
		data: Vec<u8>,
	},
}

/// Result of a successful call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Receipt {
	/// Encoded return data.
	pub output: Vec<u8>,
	/// Events in emission order. Events of reverted nested frames are absent.
	pub events: Vec<Event>,
}

impl Receipt {
	/// Decodes the return data.
	pub fn decode<T: DeserializeOwned>(&self) -> Result<T, AbiError> {
		lapis_primitives::abi::decode_return(&self.output)
	}
}

mod hex_bytes {
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
		let s = String::deserialize(deserializer)?;
		let digits = s.strip_prefix("0x").unwrap_or(&s);
		hex::decode(digits).map_err(serde::de::Error::custom)
	}
}
