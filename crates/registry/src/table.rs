//! The routing table: selector → facet, facet → selectors, ordered facet list.
//!
//! # Purpose
//!
//! [`RouteTable`] is the single source of truth for where a call goes. It keeps
//! three views that must always agree:
//!
//! | View | Shape | Meaning |
//! |---|---|---|
//! | forward | `Selector -> Route` | which facet answers a selector, and where it sits in that facet's list |
//! | reverse | `Address -> [Selector]` | the selectors a facet currently owns, in insertion order |
//! | facet list | ordered `Address`es | facets that own at least one selector |
//!
//! The reverse index and the facet list are one [`IndexMap`]: key order is the
//! facet list, values are the per-facet selector lists.
//!
//! # Invariants
//!
//! - `resolve(s) == Some(f)` iff `s ∈ selectors_of(f)`.
//! - `routes[s].position` is the index of `s` in `selectors_of(routes[s].facet)`.
//! - A facet is in the facet list iff it owns at least one selector.
//!   - Enforced in: `RouteTable::unbind` (prunes empty facets).
//!   - Tested by: `tests::removing_last_selector_prunes_facet`, `properties::random_cuts_keep_indices_consistent`.
//!
//! Removal is swap-remove at both levels: the last selector of a facet takes
//! the vacated slot, and the last facet takes a pruned facet's slot.
//!
//! # Mutation
//!
//! Tables are values. Published tables are never mutated; the cut engine
//! clones one, applies a batch to the clone and hands it back for publication.

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use lapis_primitives::{Address, Selector};

/// Per-facet selector list.
pub type FacetSelectors = SmallVec<[Selector; 8]>;

/// Forward-index entry for one selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Route {
	/// Facet that answers the selector.
	pub facet: Address,
	/// Index of the selector in the facet's selector list.
	pub position: usize,
}

/// A facet together with the selectors it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetEntry {
	/// Facet address.
	pub facet_address: Address,
	/// Owned selectors in table order.
	pub function_selectors: Vec<Selector>,
}

/// Disagreement between the table's views, reported by [`RouteTable::check_consistency`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Inconsistency {
	/// A forward route points at a facet that does not list the selector at that position.
	#[error("route {selector} -> {facet}@{position} not mirrored in reverse index")]
	DanglingRoute {
		/// Routed selector.
		selector: Selector,
		/// Facet named by the route.
		facet: Address,
		/// Position named by the route.
		position: usize,
	},
	/// A facet lists a selector the forward index does not route back to it.
	#[error("facet {facet} lists {selector} but it routes elsewhere")]
	OrphanSelector {
		/// Listing facet.
		facet: Address,
		/// Selector with no matching route.
		selector: Selector,
	},
	/// A facet with no selectors is still in the facet list.
	#[error("facet {0} owns no selectors but is still listed")]
	EmptyFacet(Address),
	/// Counts of forward and reverse entries differ.
	#[error("forward index has {forward} routes, reverse index lists {reverse}")]
	CountMismatch {
		/// Forward-index size.
		forward: usize,
		/// Total reverse-index size.
		reverse: usize,
	},
}

/// Immutable-by-convention routing table.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
	routes: FxHashMap<Selector, Route>,
	facets: IndexMap<Address, FacetSelectors, FxBuildHasher>,
}

impl PartialEq for RouteTable {
	fn eq(&self, other: &Self) -> bool {
		// IndexMap equality ignores order; the facet list order is observable.
		self.routes == other.routes && self.facets.iter().eq(other.facets.iter())
	}
}

impl Eq for RouteTable {}

impl RouteTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the facet answering `selector`.
	#[inline]
	pub fn resolve(&self, selector: Selector) -> Option<Address> {
		self.routes.get(&selector).map(|route| route.facet)
	}

	/// Returns the full forward entry for `selector`.
	#[inline]
	pub fn route(&self, selector: Selector) -> Option<Route> {
		self.routes.get(&selector).copied()
	}

	/// Selectors owned by `facet`; empty for unknown facets.
	pub fn selectors_of(&self, facet: Address) -> &[Selector] {
		self.facets.get(&facet).map(|list| list.as_slice()).unwrap_or(&[])
	}

	/// Facets owning at least one selector, in facet-list order.
	pub fn facet_addresses(&self) -> impl ExactSizeIterator<Item = Address> + '_ {
		self.facets.keys().copied()
	}

	/// Every facet with its selectors, in facet-list order.
	pub fn facets(&self) -> Vec<FacetEntry> {
		self.facets
			.iter()
			.map(|(facet, selectors)| FacetEntry {
				facet_address: *facet,
				function_selectors: selectors.to_vec(),
			})
			.collect()
	}

	/// Returns true if `facet` owns at least one selector.
	#[inline]
	pub fn contains_facet(&self, facet: Address) -> bool {
		self.facets.contains_key(&facet)
	}

	/// Number of routed selectors.
	#[inline]
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Returns true if nothing is routed.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}

	/// Number of facets in the facet list.
	#[inline]
	pub fn facet_count(&self) -> usize {
		self.facets.len()
	}

	/// Routes an unrouted selector to `facet`, appending the facet to the list if new.
	///
	/// Callers must have checked that `selector` is unrouted.
	pub(crate) fn bind(&mut self, selector: Selector, facet: Address) {
		debug_assert!(!self.routes.contains_key(&selector), "{selector} already routed");
		let list = self.facets.entry(facet).or_default();
		list.push(selector);
		let position = list.len() - 1;
		self.routes.insert(selector, Route { facet, position });
	}

	/// Unroutes `selector`, returning the facet that owned it.
	///
	/// Swap-removes the selector from its facet's list and prunes the facet
	/// once its list is empty.
	pub(crate) fn unbind(&mut self, selector: Selector) -> Option<Address> {
		let Route { facet, position } = self.routes.remove(&selector)?;
		let Some(list) = self.facets.get_mut(&facet) else {
			return Some(facet);
		};
		list.swap_remove(position);
		if let Some(&moved) = list.get(position)
			&& let Some(route) = self.routes.get_mut(&moved)
		{
			route.position = position;
		}
		if list.is_empty() {
			self.facets.swap_remove(&facet);
		}
		Some(facet)
	}

	/// Verifies that the forward index, reverse index and facet list agree.
	pub fn check_consistency(&self) -> Result<(), Inconsistency> {
		for (&selector, &Route { facet, position }) in &self.routes {
			let listed = self
				.facets
				.get(&facet)
				.and_then(|list| list.get(position))
				.copied();
			if listed != Some(selector) {
				return Err(Inconsistency::DanglingRoute {
					selector,
					facet,
					position,
				});
			}
		}
		let mut reverse = 0;
		for (&facet, list) in &self.facets {
			if list.is_empty() {
				return Err(Inconsistency::EmptyFacet(facet));
			}
			for &selector in list {
				if self.resolve(selector) != Some(facet) {
					return Err(Inconsistency::OrphanSelector { facet, selector });
				}
			}
			reverse += list.len();
		}
		if reverse != self.routes.len() {
			return Err(Inconsistency::CountMismatch {
				forward: self.routes.len(),
				reverse,
			});
		}
		Ok(())
	}
}
