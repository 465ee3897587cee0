use lapis_primitives::abi::decode_args;
use lapis_primitives::{Address, FacetCut, Selector};

use super::{CUT_SIGNATURES, Handler, invoke};
use crate::context::CallContext;
use crate::error::CallResult;
use crate::facet::{Facet, FunctionTable};

/// Routes `diamondCut` to the owner-gated cut path.
///
/// Arguments: `(Vec<FacetCut>, Address, Vec<u8>)`, the batch, initializer
/// target and initializer calldata.
#[derive(Debug)]
pub struct DiamondCutFacet {
	functions: FunctionTable<Handler<Self>>,
}

impl Default for DiamondCutFacet {
	fn default() -> Self {
		Self {
			functions: FunctionTable::new(&[(CUT_SIGNATURES[0], Self::diamond_cut as Handler<Self>)]),
		}
	}
}

impl DiamondCutFacet {
	fn diamond_cut(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> CallResult<Vec<u8>> {
		let (cuts, init, payload): (Vec<FacetCut>, Address, Vec<u8>) = decode_args(args)?;
		let caller = ctx.caller();
		ctx.transaction().cut(caller, &cuts, init, &payload)?;
		Ok(Vec::new())
	}
}

impl Facet for DiamondCutFacet {
	fn name(&self) -> &str {
		"DiamondCutFacet"
	}

	fn signatures(&self) -> Vec<&'static str> {
		self.functions.signatures()
	}

	fn call(&self, ctx: &mut CallContext<'_>, selector: Selector, args: &[u8]) -> CallResult<Vec<u8>> {
		invoke(self, &self.functions, ctx, selector, args)
	}
}
