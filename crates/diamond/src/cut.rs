//! Applying cuts inside a transaction.

use std::sync::Arc;

use lapis_primitives::{Address, FacetCut};
use lapis_registry::{CutEngine, CutError, CutOutcome, CutStats};

use crate::error::{CallError, CallResult};
use crate::event::Event;
use crate::transaction::Transaction;

impl Transaction {
	/// Owner-gated cut. A non-owner caller is rejected before any validation runs.
	pub(crate) fn cut(
		&mut self,
		caller: Address,
		cuts: &[FacetCut],
		init: Address,
		payload: &[u8],
	) -> CallResult<CutStats> {
		let owner = self.state.owner;
		if caller != owner {
			tracing::warn!(%caller, %owner, "cut rejected: caller is not the owner");
			return Err(CutError::Unauthorized { caller, owner }.into());
		}
		self.cut_unguarded(caller, cuts, init, payload)
	}

	/// Validates and applies `cuts`, then runs the initializer.
	///
	/// All or nothing: a rejected entry leaves the routes untouched, and a
	/// failing initializer rolls back the new routes together with whatever
	/// the initializer wrote before failing.
	pub(crate) fn cut_unguarded(
		&mut self,
		caller: Address,
		cuts: &[FacetCut],
		init: Address,
		payload: &[u8],
	) -> CallResult<CutStats> {
		let code = Arc::clone(&self.code);
		let engine = CutEngine::new(self.diamond, &*code);
		engine.check_initializer(init, payload)?;
		let CutOutcome { table, stats } = engine.apply(&self.state.routes, cuts).inspect_err(|err| {
			tracing::warn!(%err, "cut rejected");
		})?;

		let checkpoint = self.checkpoint();
		self.state.routes = Arc::new(table);
		if !init.is_zero()
			&& let Err(source) = self.delegate(caller, init, payload)
		{
			tracing::warn!(%init, err = %source, "initializer failed; cut rolled back");
			self.restore(checkpoint);
			return Err(CallError::InitializerFailed {
				target: init,
				source: Box::new(source),
			});
		}

		self.emit(Event::DiamondCut {
			cuts: cuts.to_vec(),
			init,
			calldata: payload.to_vec(),
		});
		tracing::info!(
			entries = cuts.len(),
			added = stats.added,
			replaced = stats.replaced,
			removed = stats.removed,
			%init,
			"cut applied"
		);
		Ok(stats)
	}
}
