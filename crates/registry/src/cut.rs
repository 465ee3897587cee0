//! Cut validation and application over a [`RouteTable`].
//!
//! # Role
//!
//! [`CutEngine::apply`] takes a published table and a batch of [`FacetCut`]s,
//! and returns a *new* table with the batch applied, or the first error. The
//! input table is never touched, so a rejected batch has no observable effect
//! and the caller decides when (and whether) to publish the result.
//!
//! Entries are processed left to right and each selector is checked against
//! the table as modified by everything before it in the batch.
//!
//! The owner check and the post-cut initializer live with the diamond, which
//! owns the state they touch; [`CutEngine::check_initializer`] covers the
//! static half of initializer validation.

use lapis_primitives::{Address, FacetCut, FacetCutAction, Selector};
use thiserror::Error;

use crate::table::RouteTable;

/// Why a cut was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CutError {
	/// The caller is not the diamond's owner.
	#[error("caller {caller} is not the owner {owner}")]
	Unauthorized {
		/// Calling principal.
		caller: Address,
		/// Current owner.
		owner: Address,
	},
	/// An add or replace entry names the null address.
	#[error("cut #{index}: {action} requires a non-null facet address")]
	NullFacetAddress {
		/// Batch index of the entry.
		index: usize,
		/// Entry action.
		action: FacetCutAction,
	},
	/// A remove entry names a facet.
	#[error("cut #{index}: remove must target the null address, got {facet}")]
	NonNullRemoveTarget {
		/// Batch index of the entry.
		index: usize,
		/// Address supplied by the entry.
		facet: Address,
	},
	/// An add entry names a selector that is already routed (to any facet, including the target).
	#[error("cut #{index}: {selector} is already routed to {owner}")]
	IdentifierAlreadyRouted {
		/// Batch index of the entry.
		index: usize,
		/// Offending selector.
		selector: Selector,
		/// Facet currently answering it.
		owner: Address,
	},
	/// A replace or remove entry names a selector with no route.
	#[error("cut #{index}: {selector} is not routed")]
	IdentifierNotRouted {
		/// Batch index of the entry.
		index: usize,
		/// Offending selector.
		selector: Selector,
	},
	/// A replace entry names the selector's current owner.
	#[error("cut #{index}: {selector} is already routed to {facet}")]
	SelfReplace {
		/// Batch index of the entry.
		index: usize,
		/// Offending selector.
		selector: Selector,
		/// Facet named by the entry and currently answering the selector.
		facet: Address,
	},
	/// An entry carries no selectors.
	#[error("cut #{index}: no selectors given")]
	EmptySelectorList {
		/// Batch index of the entry.
		index: usize,
	},
	/// A replace or remove entry targets a selector answered by the diamond itself.
	#[error("cut #{index}: {selector} is immutable")]
	ImmutableFunction {
		/// Batch index of the entry.
		index: usize,
		/// Offending selector.
		selector: Selector,
	},
	/// An add or replace entry names an address with no deployed code.
	#[error("cut #{index}: no code deployed at {facet}")]
	FacetNotDeployed {
		/// Batch index of the entry.
		index: usize,
		/// Address without code.
		facet: Address,
	},
	/// Initializer payload given without an initializer target.
	#[error("initializer payload of {len} bytes given without a target")]
	InitializerPayloadWithoutTarget {
		/// Payload length.
		len: usize,
	},
	/// Initializer target given with an empty payload.
	#[error("initializer {target} given without a payload")]
	InitializerWithoutPayload {
		/// Initializer address.
		target: Address,
	},
	/// Initializer target has no deployed code.
	#[error("no code deployed at initializer {target}")]
	InitializerNotDeployed {
		/// Initializer address.
		target: Address,
	},
}

/// Answers whether code is deployed at an address.
pub trait CodeLookup {
	/// Returns true if `address` holds code.
	fn has_code(&self, address: Address) -> bool;
}

impl<F> CodeLookup for F
where
	F: Fn(Address) -> bool,
{
	fn has_code(&self, address: Address) -> bool {
		self(address)
	}
}

/// Counts of selectors touched by an applied batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CutStats {
	/// Selectors newly routed.
	pub added: usize,
	/// Selectors repointed.
	pub replaced: usize,
	/// Selectors unrouted.
	pub removed: usize,
}

/// A successfully applied batch, not yet published.
#[derive(Debug, Clone)]
pub struct CutOutcome {
	/// Table with the batch applied.
	pub table: RouteTable,
	/// What changed.
	pub stats: CutStats,
}

/// Validates and applies cut batches.
pub struct CutEngine<'a, C: CodeLookup + ?Sized> {
	/// Address of the diamond; selectors routed to it are immutable.
	diamond: Address,
	code: &'a C,
}

impl<'a, C: CodeLookup + ?Sized> CutEngine<'a, C> {
	/// Creates an engine for the diamond at `diamond`, checking code presence through `code`.
	pub fn new(diamond: Address, code: &'a C) -> Self {
		Self { diamond, code }
	}

	/// Applies `cuts` to a copy of `table`.
	pub fn apply(&self, table: &RouteTable, cuts: &[FacetCut]) -> Result<CutOutcome, CutError> {
		let mut staged = table.clone();
		let mut stats = CutStats::default();
		for (index, cut) in cuts.iter().enumerate() {
			if cut.function_selectors.is_empty() {
				return Err(CutError::EmptySelectorList { index });
			}
			match cut.action {
				FacetCutAction::Add => {
					self.require_facet(index, cut)?;
					for &selector in &cut.function_selectors {
						if let Some(owner) = staged.resolve(selector) {
							return Err(CutError::IdentifierAlreadyRouted {
								index,
								selector,
								owner,
							});
						}
						staged.bind(selector, cut.facet_address);
					}
					stats.added += cut.function_selectors.len();
				}
				FacetCutAction::Replace => {
					self.require_facet(index, cut)?;
					for &selector in &cut.function_selectors {
						let current = self.require_mutable(&staged, index, selector)?;
						if current == cut.facet_address {
							return Err(CutError::SelfReplace {
								index,
								selector,
								facet: current,
							});
						}
						staged.unbind(selector);
						staged.bind(selector, cut.facet_address);
					}
					stats.replaced += cut.function_selectors.len();
				}
				FacetCutAction::Remove => {
					if !cut.facet_address.is_zero() {
						return Err(CutError::NonNullRemoveTarget {
							index,
							facet: cut.facet_address,
						});
					}
					for &selector in &cut.function_selectors {
						self.require_mutable(&staged, index, selector)?;
						staged.unbind(selector);
					}
					stats.removed += cut.function_selectors.len();
				}
			}
			tracing::trace!(
				index,
				action = %cut.action,
				facet = %cut.facet_address,
				selectors = cut.function_selectors.len(),
				"cut entry staged"
			);
		}
		debug_assert_eq!(staged.check_consistency(), Ok(()));
		Ok(CutOutcome { table: staged, stats })
	}

	/// Checks the pairing of initializer target and payload, and that the target holds code.
	pub fn check_initializer(&self, init: Address, payload: &[u8]) -> Result<(), CutError> {
		match (init.is_zero(), payload.is_empty()) {
			(true, true) => Ok(()),
			(true, false) => Err(CutError::InitializerPayloadWithoutTarget { len: payload.len() }),
			(false, true) => Err(CutError::InitializerWithoutPayload { target: init }),
			(false, false) if !self.code.has_code(init) => {
				Err(CutError::InitializerNotDeployed { target: init })
			}
			(false, false) => Ok(()),
		}
	}

	fn require_facet(&self, index: usize, cut: &FacetCut) -> Result<(), CutError> {
		if cut.facet_address.is_zero() {
			return Err(CutError::NullFacetAddress {
				index,
				action: cut.action,
			});
		}
		if !self.code.has_code(cut.facet_address) {
			return Err(CutError::FacetNotDeployed {
				index,
				facet: cut.facet_address,
			});
		}
		Ok(())
	}

	fn require_mutable(&self, table: &RouteTable, index: usize, selector: Selector) -> Result<Address, CutError> {
		let current = table
			.resolve(selector)
			.ok_or(CutError::IdentifierNotRouted { index, selector })?;
		if current == self.diamond {
			return Err(CutError::ImmutableFunction { index, selector });
		}
		Ok(current)
	}
}
