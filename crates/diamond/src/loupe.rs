//! Read-only views of a diamond and its ERC-165 interface registry.

use std::sync::Arc;

use lapis_primitives::{Address, Selector, interface_id};
use lapis_registry::{DiamondLoupe, FacetEntry};
use rustc_hash::FxHashSet;

use crate::facets::{CUT_SIGNATURES, ERC165_SIGNATURES, LOUPE_SIGNATURES, OWNERSHIP_SIGNATURES};
use crate::state::DiamondState;
use crate::storage::StorageSlice;

/// Interfaces the diamond reports through `supportsInterface`.
#[derive(Debug, Clone, Default)]
pub struct SupportedInterfaces {
	ids: FxHashSet<Selector>,
}

impl StorageSlice for SupportedInterfaces {
	const NAMESPACE: &'static str = "lapis.diamond.interfaces";
}

impl SupportedInterfaces {
	/// ERC-165 id of the given function signatures.
	pub fn id_of(signatures: &[&str]) -> Selector {
		let selectors: Vec<_> = signatures.iter().map(|sig| Selector::from_signature(sig)).collect();
		interface_id(&selectors)
	}

	/// Registers the ERC-165, cut, loupe and ERC-173 interfaces.
	pub(crate) fn register_builtin(&mut self) {
		for signatures in [ERC165_SIGNATURES, CUT_SIGNATURES, LOUPE_SIGNATURES, OWNERSHIP_SIGNATURES] {
			self.ids.insert(Self::id_of(signatures));
		}
	}

	/// Marks `id` as supported (or not).
	pub fn set(&mut self, id: Selector, supported: bool) {
		if supported {
			self.ids.insert(id);
		} else {
			self.ids.remove(&id);
		}
	}

	/// Returns true if `id` is supported. `0xffffffff` never is.
	pub fn supports(&self, id: Selector) -> bool {
		id != Selector([0xff; 4]) && self.ids.contains(&id)
	}
}

/// Pinned snapshot of a diamond, answering loupe queries.
///
/// The view does not move: calls committed after it was taken are not visible.
#[derive(Debug, Clone)]
pub struct LoupeView(pub(crate) Arc<DiamondState>);

impl LoupeView {
	/// ERC-165 query against the interface registry.
	pub fn supports_interface(&self, id: Selector) -> bool {
		self.0
			.storage()
			.get::<SupportedInterfaces>()
			.ok()
			.flatten()
			.is_some_and(|ifaces| ifaces.supports(id))
	}

	/// Owner at the time of the snapshot.
	pub fn owner(&self) -> Address {
		self.0.owner()
	}

	/// Number of routed selectors.
	pub fn selector_count(&self) -> usize {
		self.0.routes().len()
	}
}

impl DiamondLoupe for LoupeView {
	fn facets(&self) -> Vec<FacetEntry> {
		self.0.routes().facets()
	}

	fn facet_function_selectors(&self, facet: Address) -> Vec<Selector> {
		self.0.routes().facet_function_selectors(facet)
	}

	fn facet_addresses(&self) -> Vec<Address> {
		self.0.routes().facet_addresses().collect()
	}

	fn facet_address(&self, selector: Selector) -> Option<Address> {
		self.0.routes().resolve(selector)
	}
}
