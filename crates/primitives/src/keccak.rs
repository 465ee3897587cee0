//! Keccak-256 hashing.
//!
//! Every derived identifier in the workspace (selectors, storage namespaces,
//! deployment addresses) goes through [`keccak256`], so all of them agree with
//! the values an EVM toolchain would compute for the same inputs.

use sha3::{Digest, Keccak256};

/// A 32-byte Keccak-256 digest.
pub type Hash32 = [u8; 32];

/// Hashes `data` with Keccak-256 (the pre-standard SHA-3 padding used by the EVM).
pub fn keccak256(data: impl AsRef<[u8]>) -> Hash32 {
	let mut hasher = Keccak256::new();
	hasher.update(data.as_ref());
	hasher.finalize().into()
}
