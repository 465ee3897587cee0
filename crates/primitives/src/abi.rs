//! Calldata framing: `selector ‖ postcard(args)`.
//!
//! Argument encoding belongs to the facets, not the router. This module is the
//! convention shared by the builtin facets, the sample facets and the CLI.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::Selector;

/// Encoding or decoding failure.
#[derive(Debug, Error)]
pub enum AbiError {
	/// Arguments failed to serialize.
	#[error("failed to encode arguments: {0}")]
	Encode(#[source] postcard::Error),
	/// Bytes did not decode to the expected argument type.
	#[error("failed to decode {what}: {source}")]
	Decode {
		/// What was being decoded (`"arguments"` or `"return data"`).
		what: &'static str,
		/// Underlying postcard error.
		#[source]
		source: postcard::Error,
	},
}

/// Encodes a call to `selector` with `args`.
pub fn encode_call<A: Serialize + ?Sized>(selector: Selector, args: &A) -> Result<Vec<u8>, AbiError> {
	let mut out = selector.0.to_vec();
	let body = postcard::to_stdvec(args).map_err(AbiError::Encode)?;
	out.extend_from_slice(&body);
	Ok(out)
}

/// Encodes a call to the function named by `signature`.
pub fn encode_signature_call<A: Serialize + ?Sized>(signature: &str, args: &A) -> Result<Vec<u8>, AbiError> {
	encode_call(Selector::from_signature(signature), args)
}

/// Decodes the argument bytes that follow a selector.
pub fn decode_args<T: DeserializeOwned>(input: &[u8]) -> Result<T, AbiError> {
	postcard::from_bytes(input).map_err(|source| AbiError::Decode {
		what: "arguments",
		source,
	})
}

/// Encodes a return value.
pub fn encode_return<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, AbiError> {
	postcard::to_stdvec(value).map_err(AbiError::Encode)
}

/// Decodes a return value.
pub fn decode_return<T: DeserializeOwned>(output: &[u8]) -> Result<T, AbiError> {
	postcard::from_bytes(output).map_err(|source| AbiError::Decode {
		what: "return data",
		source,
	})
}
