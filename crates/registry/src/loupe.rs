//! Read-only introspection over a routing table.
//!
//! Unknown facets and selectors are "not found" (empty list or `None`), never errors.

use lapis_primitives::{Address, Selector};

use crate::table::{FacetEntry, RouteTable};

/// Introspection surface of a diamond.
pub trait DiamondLoupe {
	/// Every facet with the selectors it answers.
	fn facets(&self) -> Vec<FacetEntry>;

	/// Selectors answered by `facet`.
	fn facet_function_selectors(&self, facet: Address) -> Vec<Selector>;

	/// Addresses of every facet with at least one selector.
	fn facet_addresses(&self) -> Vec<Address>;

	/// Facet answering `selector`.
	fn facet_address(&self, selector: Selector) -> Option<Address>;
}

impl DiamondLoupe for RouteTable {
	fn facets(&self) -> Vec<FacetEntry> {
		RouteTable::facets(self)
	}

	fn facet_function_selectors(&self, facet: Address) -> Vec<Selector> {
		self.selectors_of(facet).to_vec()
	}

	fn facet_addresses(&self) -> Vec<Address> {
		RouteTable::facet_addresses(self).collect()
	}

	fn facet_address(&self, selector: Selector) -> Option<Address> {
		self.resolve(selector)
	}
}
