//! Facets shipped with the crate.
//!
//! The builtin facets (cut, loupe, ownership) make up the standard diamond
//! surface. The sample facets exercise storage slices, initializers and
//! re-entrancy; the manifest catalogue can deploy all of them by name.

use lapis_primitives::{Address, FacetCut, Selector};

use crate::context::CallContext;
use crate::error::CallResult;
use crate::facet::{Deployments, FunctionTable};

mod cut;
mod loupe;
mod ownership;
mod sample;

pub use cut::DiamondCutFacet;
pub use loupe::DiamondLoupeFacet;
pub use ownership::OwnershipFacet;
pub use sample::{PoolFacet, PoolStorage, RelayFacet, RosterFacet, RosterStorage, TallyFacet, TallyStorage};

/// ERC-165 surface.
pub const ERC165_SIGNATURES: &[&str] = &["supportsInterface(bytes4)"];

/// Cut surface.
pub const CUT_SIGNATURES: &[&str] = &["diamondCut((address,uint8,bytes4[])[],address,bytes)"];

/// Loupe surface.
pub const LOUPE_SIGNATURES: &[&str] = &[
	"facets()",
	"facetFunctionSelectors(address)",
	"facetAddresses()",
	"facetAddress(bytes4)",
];

/// ERC-173 surface.
pub const OWNERSHIP_SIGNATURES: &[&str] = &["owner()", "transferOwnership(address)"];

/// Function handler of a facet of type `F`.
pub(crate) type Handler<F> = fn(&F, &mut CallContext<'_>, &[u8]) -> CallResult<Vec<u8>>;

/// Looks up and runs the handler for `selector`.
pub(crate) fn invoke<F>(
	facet: &F,
	functions: &FunctionTable<Handler<F>>,
	ctx: &mut CallContext<'_>,
	selector: Selector,
	args: &[u8],
) -> CallResult<Vec<u8>> {
	let handler = functions.get(selector).ok_or_else(|| ctx.unsupported(selector))?;
	handler(facet, ctx, args)
}

/// Addresses of the builtin facets deployed by [`deploy_standard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardFacets {
	/// [`DiamondCutFacet`] address.
	pub cut: Address,
	/// [`DiamondLoupeFacet`] address.
	pub loupe: Address,
	/// [`OwnershipFacet`] address.
	pub ownership: Address,
}

impl StandardFacets {
	/// Initial cut routing every builtin function.
	pub fn cuts(&self) -> Vec<FacetCut> {
		[
			(self.cut, CUT_SIGNATURES),
			(self.loupe, LOUPE_SIGNATURES),
			(self.loupe, ERC165_SIGNATURES),
			(self.ownership, OWNERSHIP_SIGNATURES),
		]
		.into_iter()
		.map(|(facet, signatures)| FacetCut::add(facet, signatures.iter().map(|sig| Selector::from_signature(sig))))
		.collect()
	}
}

/// Deploys the cut, loupe and ownership facets.
pub fn deploy_standard(deployments: &Deployments) -> StandardFacets {
	StandardFacets {
		cut: deployments.deploy(DiamondCutFacet::default()),
		loupe: deployments.deploy(DiamondLoupeFacet::default()),
		ownership: deployments.deploy(OwnershipFacet::default()),
	}
}
