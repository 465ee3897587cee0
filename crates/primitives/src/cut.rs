//! Cut instructions: the unit of change applied to a routing table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Address, Selector};

/// What a [`FacetCut`] does with its selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum FacetCutAction {
	/// Route currently unrouted selectors to the facet.
	Add = 0,
	/// Repoint routed selectors at a different facet.
	Replace = 1,
	/// Drop routed selectors. The cut's facet address must be null.
	Remove = 2,
}

impl fmt::Display for FacetCutAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Add => "add",
			Self::Replace => "replace",
			Self::Remove => "remove",
		})
	}
}

/// One entry of a cut batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetCut {
	/// Target facet; [`Address::ZERO`] for removals.
	pub facet_address: Address,
	/// Mutation kind.
	pub action: FacetCutAction,
	/// Selectors the mutation applies to, in order.
	pub function_selectors: Vec<Selector>,
}

impl FacetCut {
	/// Builds an add entry.
	pub fn add(facet: Address, selectors: impl IntoIterator<Item = Selector>) -> Self {
		Self {
			facet_address: facet,
			action: FacetCutAction::Add,
			function_selectors: selectors.into_iter().collect(),
		}
	}

	/// Builds a replace entry.
	pub fn replace(facet: Address, selectors: impl IntoIterator<Item = Selector>) -> Self {
		Self {
			facet_address: facet,
			action: FacetCutAction::Replace,
			function_selectors: selectors.into_iter().collect(),
		}
	}

	/// Builds a remove entry with the conventional null target.
	pub fn remove(selectors: impl IntoIterator<Item = Selector>) -> Self {
		Self {
			facet_address: Address::ZERO,
			action: FacetCutAction::Remove,
			function_selectors: selectors.into_iter().collect(),
		}
	}
}
