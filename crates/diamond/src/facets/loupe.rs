use lapis_primitives::abi::{decode_args, encode_return};
use lapis_primitives::{Address, Selector};
use lapis_registry::DiamondLoupe;

use super::{ERC165_SIGNATURES, Handler, LOUPE_SIGNATURES, invoke};
use crate::context::CallContext;
use crate::error::CallResult;
use crate::facet::{Facet, FunctionTable};
use crate::loupe::SupportedInterfaces;

/// Loupe and ERC-165 queries over the live routing table.
#[derive(Debug)]
pub struct DiamondLoupeFacet {
	functions: FunctionTable<Handler<Self>>,
}

impl Default for DiamondLoupeFacet {
	fn default() -> Self {
		let handlers: [Handler<Self>; 4] = [
			Self::facets,
			Self::facet_function_selectors,
			Self::facet_addresses,
			Self::facet_address,
		];
		let mut functions: Vec<(&'static str, Handler<Self>)> =
			LOUPE_SIGNATURES.iter().copied().zip(handlers).collect();
		functions.push((ERC165_SIGNATURES[0], Self::supports_interface as Handler<Self>));
		Self {
			functions: FunctionTable::new(&functions),
		}
	}
}

impl DiamondLoupeFacet {
	fn facets(&self, ctx: &mut CallContext<'_>, _: &[u8]) -> CallResult<Vec<u8>> {
		Ok(encode_return(&DiamondLoupe::facets(ctx.routes()))?)
	}

	fn facet_function_selectors(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> CallResult<Vec<u8>> {
		let facet: Address = decode_args(args)?;
		Ok(encode_return(ctx.routes().selectors_of(facet))?)
	}

	fn facet_addresses(&self, ctx: &mut CallContext<'_>, _: &[u8]) -> CallResult<Vec<u8>> {
		Ok(encode_return(&DiamondLoupe::facet_addresses(ctx.routes()))?)
	}

	fn facet_address(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> CallResult<Vec<u8>> {
		let selector: Selector = decode_args(args)?;
		let facet = ctx.routes().resolve(selector).unwrap_or(Address::ZERO);
		Ok(encode_return(&facet)?)
	}

	fn supports_interface(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> CallResult<Vec<u8>> {
		let id: Selector = decode_args(args)?;
		let supported = ctx.storage().get::<SupportedInterfaces>()?.is_some_and(|ifaces| ifaces.supports(id));
		Ok(encode_return(&supported)?)
	}
}

impl Facet for DiamondLoupeFacet {
	fn name(&self) -> &str {
		"DiamondLoupeFacet"
	}

	fn signatures(&self) -> Vec<&'static str> {
		self.functions.signatures()
	}

	fn call(&self, ctx: &mut CallContext<'_>, selector: Selector, args: &[u8]) -> CallResult<Vec<u8>> {
		invoke(self, &self.functions, ctx, selector, args)
	}
}
