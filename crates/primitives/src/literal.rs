//! Fixed-width `0x`-prefixed hex literals shared by [`crate::Address`] and [`crate::Selector`].

use thiserror::Error;

/// Errors produced when parsing a fixed-width hex literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseHexError {
	/// The literal decoded to the wrong number of bytes.
	#[error("expected {expected} bytes of hex, got {actual} hex digits")]
	Length {
		/// Expected byte width.
		expected: usize,
		/// Number of hex digits seen (after the optional `0x` prefix).
		actual: usize,
	},
	/// The literal contained a non-hex character.
	#[error("invalid hex literal {literal:?}: {reason}")]
	Digits {
		/// The offending input.
		literal: String,
		/// Decoder message.
		reason: String,
	},
}

/// Parses `s` (optionally `0x`-prefixed) into exactly `N` bytes.
pub(crate) fn parse_fixed<const N: usize>(s: &str) -> Result<[u8; N], ParseHexError> {
	let digits = s
		.strip_prefix("0x")
		.or_else(|| s.strip_prefix("0X"))
		.unwrap_or(s);
	if digits.len() != N * 2 {
		return Err(ParseHexError::Length {
			expected: N,
			actual: digits.len(),
		});
	}
	let mut out = [0u8; N];
	hex::decode_to_slice(digits, &mut out).map_err(|e| ParseHexError::Digits {
		literal: s.to_string(),
		reason: e.to_string(),
	})?;
	Ok(out)
}
