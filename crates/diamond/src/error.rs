//! Error types surfaced by diamond calls.

use lapis_primitives::{AbiError, Address, Selector};
use lapis_registry::CutError;
use thiserror::Error;

pub use crate::ownership::OwnershipError;
pub use crate::storage::StorageError;

/// Why a call failed. Every failure unwinds the state changes of the frame it
/// happened in; a failure that reaches the outermost frame leaves the diamond untouched.
#[derive(Debug, Error)]
pub enum CallError {
	/// No facet answers the selector.
	#[error("no facet routes selector {selector}")]
	DispatchMiss {
		/// Unrouted selector.
		selector: Selector,
	},
	/// Calldata too short to carry a selector.
	#[error("calldata of {len} bytes carries no selector")]
	MalformedCalldata {
		/// Calldata length.
		len: usize,
	},
	/// Nested calls went deeper than [`crate::MAX_CALL_DEPTH`].
	#[error("call depth {depth} exceeded")]
	CallDepthExceeded {
		/// Depth at which the call was refused.
		depth: usize,
	},
	/// A route points at an address whose code does not implement the selector.
	#[error("facet {facet} does not implement {selector}")]
	UnsupportedSelector {
		/// Facet that received the call.
		facet: Address,
		/// Selector it does not implement.
		selector: Selector,
	},
	/// A route or initializer points at an address without code.
	#[error("no code deployed at {address}")]
	MissingCode {
		/// Address without code.
		address: Address,
	},
	/// The post-cut initializer failed; the whole cut was rolled back.
	#[error("initializer {target} failed: {source}")]
	InitializerFailed {
		/// Initializer address.
		target: Address,
		/// Initializer failure.
		#[source]
		source: Box<CallError>,
	},
	/// A cut was rejected.
	#[error(transparent)]
	Cut(#[from] CutError),
	/// An ownership operation was rejected.
	#[error(transparent)]
	Ownership(#[from] OwnershipError),
	/// Storage slice access failed.
	#[error(transparent)]
	Storage(#[from] StorageError),
	/// Arguments or return data did not (de)serialize.
	#[error(transparent)]
	Abi(#[from] AbiError),
	/// Facet-level revert with a reason.
	#[error("reverted: {0}")]
	Reverted(String),
}

impl CallError {
	/// Builds a facet-level revert.
	pub fn revert(reason: impl Into<String>) -> Self {
		Self::Reverted(reason.into())
	}

	/// The cut rejection behind this error, looking through initializer failures.
	pub fn as_cut(&self) -> Option<&CutError> {
		match self {
			Self::Cut(err) => Some(err),
			Self::InitializerFailed { source, .. } => source.as_cut(),
			_ => None,
		}
	}
}

/// Result alias for diamond calls.
pub type CallResult<T> = Result<T, CallError>;
