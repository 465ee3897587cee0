//! Value types shared by every lapis crate: addresses, selectors, cut
//! instructions and the calldata convention.

/// Calldata framing helpers.
pub mod abi;
/// 20-byte addresses.
pub mod address;
/// Cut instructions.
pub mod cut;
mod literal;
/// Keccak-256.
pub mod keccak;
/// 4-byte call selectors.
pub mod selector;

pub use abi::AbiError;
pub use address::Address;
pub use cut::{FacetCut, FacetCutAction};
pub use literal::ParseHexError;
pub use keccak::{Hash32, keccak256};
pub use selector::{Selector, interface_id};
