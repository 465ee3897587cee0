//! The diamond: committed state plus the code store it routes into.
//!
//! # Publication
//!
//! Committed state lives in an [`ArcSwap`]. Readers (`owner`, `loupe`,
//! `snapshot`) load it wait-free and never observe a partially applied call.
//! Each outermost call runs as a [`Transaction`] over a private copy of the
//! state it loaded; on success the result is published with compare-and-swap.
//! If another call committed in the meantime, the call is executed again on
//! top of the newer state, so concurrent callers are linearized without a
//! lock. On failure nothing is published.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use lapis_primitives::abi::encode_signature_call;
use lapis_primitives::{Address, FacetCut};
use serde::Serialize;

use crate::error::{CallResult, OwnershipError};
use crate::event::Receipt;
use crate::facet::Deployments;
use crate::loupe::LoupeView;
use crate::state::DiamondState;
use crate::transaction::Transaction;

/// Construction parameters.
#[derive(Debug, Clone, Default)]
pub struct DiamondArgs {
	/// Initial owner; must be non-null.
	pub owner: Address,
	/// Initializer run after the initial cut, null for none.
	pub init: Address,
	/// Initializer calldata.
	pub init_calldata: Vec<u8>,
}

impl DiamondArgs {
	/// Arguments with `owner` and no initializer.
	pub fn owned_by(owner: Address) -> Self {
		Self {
			owner,
			..Self::default()
		}
	}
}

/// An upgradeable diamond.
pub struct Diamond {
	address: Address,
	deployments: Arc<Deployments>,
	state: ArcSwap<DiamondState>,
}

impl fmt::Debug for Diamond {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Diamond")
			.field("address", &self.address)
			.field("state", &self.state.load())
			.finish_non_exhaustive()
	}
}

impl Diamond {
	/// Creates a diamond and applies `cuts` as its initial, unguarded cut.
	///
	/// Fails if the owner is null or the initial cut (or its initializer) fails.
	pub fn new(deployments: Arc<Deployments>, cuts: &[FacetCut], args: DiamondArgs) -> CallResult<Self> {
		if args.owner.is_zero() {
			return Err(OwnershipError::NullOwner.into());
		}
		let address = deployments.allocate();
		let mut tx = Transaction::new(address, deployments.snapshot(), DiamondState::genesis(args.owner)?);
		tx.cut_unguarded(args.owner, cuts, args.init, &args.init_calldata)?;
		let (state, _) = tx.finish();
		tracing::info!(
			%address,
			owner = %args.owner,
			facets = state.routes.facet_count(),
			selectors = state.routes.len(),
			"diamond constructed"
		);
		Ok(Self {
			address,
			deployments,
			state: ArcSwap::from_pointee(state),
		})
	}

	/// Address of the diamond.
	pub fn address(&self) -> Address {
		self.address
	}

	/// Code store the diamond routes into.
	pub fn deployments(&self) -> &Arc<Deployments> {
		&self.deployments
	}

	/// Dispatches `calldata` from `caller`.
	pub fn call(&self, caller: Address, calldata: &[u8]) -> CallResult<Receipt> {
		self.transact(|tx| tx.dispatch(caller, calldata))
	}

	/// Encodes and dispatches a call to `signature`.
	pub fn call_signature<A: Serialize + ?Sized>(
		&self,
		caller: Address,
		signature: &str,
		args: &A,
	) -> CallResult<Receipt> {
		let calldata = encode_signature_call(signature, args)?;
		self.call(caller, &calldata)
	}

	/// Applies a cut as `caller`. Same semantics as calling the routed
	/// `diamondCut`, but reachable even if that selector has been removed.
	pub fn diamond_cut(&self, caller: Address, cuts: &[FacetCut], init: Address, payload: &[u8]) -> CallResult<Receipt> {
		self.transact(|tx| tx.cut(caller, cuts, init, payload).map(|_| Vec::new()))
	}

	/// Current owner.
	pub fn owner(&self) -> Address {
		self.state.load().owner
	}

	/// Transfers ownership as `caller`.
	pub fn transfer_ownership(&self, caller: Address, new_owner: Address) -> CallResult<Receipt> {
		self.transact(|tx| tx.transfer_ownership(caller, new_owner).map(|()| Vec::new()))
	}

	/// Loupe over the current committed state.
	pub fn loupe(&self) -> LoupeView {
		LoupeView(self.state.load_full())
	}

	/// Current committed state.
	pub fn snapshot(&self) -> Arc<DiamondState> {
		self.state.load_full()
	}

	fn transact(&self, mut run: impl FnMut(&mut Transaction) -> CallResult<Vec<u8>>) -> CallResult<Receipt> {
		loop {
			let old = self.state.load_full();
			let mut tx = Transaction::new(self.address, self.deployments.snapshot(), DiamondState::clone(&old));
			let output = run(&mut tx).inspect_err(|err| {
				tracing::debug!(diamond = %self.address, %err, "call reverted");
			})?;
			let (state, events) = tx.finish();

			let prev = self.state.compare_and_swap(&old, Arc::new(state));
			if Arc::ptr_eq(&prev, &old) {
				return Ok(Receipt { output, events });
			}
			// Another call committed first; run again on its state.
			tracing::trace!(diamond = %self.address, "state moved during call, re-executing");
		}
	}
}
