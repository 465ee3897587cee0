use lapis_primitives::abi::{decode_args, encode_return};
use lapis_primitives::{Address, Selector};

use super::{Handler, OWNERSHIP_SIGNATURES, invoke};
use crate::context::CallContext;
use crate::error::CallResult;
use crate::facet::{Facet, FunctionTable};

/// ERC-173 `owner()` and `transferOwnership(address)`.
#[derive(Debug)]
pub struct OwnershipFacet {
	functions: FunctionTable<Handler<Self>>,
}

impl Default for OwnershipFacet {
	fn default() -> Self {
		Self {
			functions: FunctionTable::new(&[
				(OWNERSHIP_SIGNATURES[0], Self::owner as Handler<Self>),
				(OWNERSHIP_SIGNATURES[1], Self::transfer_ownership),
			]),
		}
	}
}

impl OwnershipFacet {
	fn owner(&self, ctx: &mut CallContext<'_>, _: &[u8]) -> CallResult<Vec<u8>> {
		Ok(encode_return(&ctx.owner())?)
	}

	fn transfer_ownership(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> CallResult<Vec<u8>> {
		let new_owner: Address = decode_args(args)?;
		let caller = ctx.caller();
		ctx.transaction().transfer_ownership(caller, new_owner)?;
		Ok(Vec::new())
	}
}

impl Facet for OwnershipFacet {
	fn name(&self) -> &str {
		"OwnershipFacet"
	}

	fn signatures(&self) -> Vec<&'static str> {
		self.functions.signatures()
	}

	fn call(&self, ctx: &mut CallContext<'_>, selector: Selector, args: &[u8]) -> CallResult<Vec<u8>> {
		invoke(self, &self.functions, ctx, selector, args)
	}
}
