//! Selector dispatch into facet code.

use lapis_primitives::{Address, Selector};

use crate::context::CallContext;
use crate::error::{CallError, CallResult};
use crate::transaction::{MAX_CALL_DEPTH, Transaction};

impl Transaction {
	/// Routes `calldata` by its selector and runs the owning facet.
	pub(crate) fn dispatch(&mut self, caller: Address, calldata: &[u8]) -> CallResult<Vec<u8>> {
		let (selector, args) = split(calldata)?;
		let facet = self
			.state
			.routes
			.resolve(selector)
			.ok_or(CallError::DispatchMiss { selector })?;
		tracing::trace!(%caller, %selector, %facet, depth = self.depth, "dispatch");
		self.enter(caller, facet, selector, args)
	}

	/// Runs the code at `target` against the diamond's state, bypassing routing.
	pub(crate) fn delegate(&mut self, caller: Address, target: Address, calldata: &[u8]) -> CallResult<Vec<u8>> {
		let (selector, args) = split(calldata)?;
		tracing::trace!(%caller, %selector, %target, depth = self.depth, "delegate");
		self.enter(caller, target, selector, args)
	}

	fn enter(&mut self, caller: Address, code_address: Address, selector: Selector, args: &[u8]) -> CallResult<Vec<u8>> {
		if self.depth >= MAX_CALL_DEPTH {
			return Err(CallError::CallDepthExceeded { depth: self.depth + 1 });
		}
		let code = self
			.code
			.get(code_address)
			.cloned()
			.ok_or(CallError::MissingCode { address: code_address })?;

		let checkpoint = self.checkpoint();
		self.depth += 1;
		let result = {
			let mut ctx = CallContext::new(self, caller, code_address);
			code.call(&mut ctx, selector, args)
		};
		self.depth -= 1;

		if let Err(err) = &result {
			tracing::debug!(facet = code.name(), %selector, depth = self.depth, %err, "frame reverted");
			self.restore(checkpoint);
		}
		result
	}
}

fn split(calldata: &[u8]) -> CallResult<(Selector, &[u8])> {
	Selector::split_calldata(calldata).ok_or(CallError::MalformedCalldata { len: calldata.len() })
}
