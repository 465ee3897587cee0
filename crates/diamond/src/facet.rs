//! The facet contract and the code table facets are deployed into.
//!
//! # Mental model
//!
//! * A [`Facet`] is code: a name, a list of function signatures and a `call`
//!   entrypoint. It holds no diamond state; everything it persists goes
//!   through the [`CallContext`] it is handed.
//! * [`Deployments`] plays the role of the chain's code store. Deploying a
//!   facet assigns it a fresh deterministic address. Readers pin an
//!   immutable [`CodeTable`] snapshot; deployers publish a new snapshot with
//!   compare-and-swap and retry if another deployment won the race.
//! * A call in flight keeps the code table it started with; facets deployed
//!   meanwhile become visible to the next call.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use lapis_primitives::{Address, Selector};
use lapis_registry::CodeLookup;
use rustc_hash::FxHashMap;

use crate::context::CallContext;
use crate::error::CallResult;

/// Signature prefix of one-shot initializers, which are never routed.
pub const INITIALIZER_PREFIX: &str = "init(";

/// Deployable code answering a set of selectors.
pub trait Facet: Send + Sync + 'static {
	/// Human-readable name, used in logs and manifests.
	fn name(&self) -> &str;

	/// Canonical signatures of every function the facet implements, initializers included.
	fn signatures(&self) -> Vec<&'static str>;

	/// Selectors the facet exposes for routing: every signature except initializers.
	fn selectors(&self) -> Vec<Selector> {
		self.signatures()
			.into_iter()
			.filter(|sig| !sig.starts_with(INITIALIZER_PREFIX))
			.map(Selector::from_signature)
			.collect()
	}

	/// Executes `selector` with `args` against the diamond state held by `ctx`.
	fn call(&self, ctx: &mut CallContext<'_>, selector: Selector, args: &[u8]) -> CallResult<Vec<u8>>;
}

/// Selector → function lookup a facet builds once from its signature list.
#[derive(Debug, Clone)]
pub struct FunctionTable<F: Copy> {
	entries: Vec<(Selector, &'static str, F)>,
}

impl<F: Copy> FunctionTable<F> {
	/// Builds the table, hashing each signature.
	pub fn new(functions: &[(&'static str, F)]) -> Self {
		Self {
			entries: functions
				.iter()
				.map(|&(sig, f)| (Selector::from_signature(sig), sig, f))
				.collect(),
		}
	}

	/// Function answering `selector`.
	pub fn get(&self, selector: Selector) -> Option<F> {
		self.entries
			.iter()
			.find_map(|&(sel, _, f)| (sel == selector).then_some(f))
	}

	/// Signatures in declaration order.
	pub fn signatures(&self) -> Vec<&'static str> {
		self.entries.iter().map(|&(_, sig, _)| sig).collect()
	}

	/// Selector of `signature`, if the table declares it.
	pub fn selector_of(&self, signature: &str) -> Option<Selector> {
		self.entries
			.iter()
			.find_map(|&(sel, sig, _)| (sig == signature).then_some(sel))
	}
}

/// Immutable view of deployed code.
#[derive(Clone, Default)]
pub struct CodeTable {
	code: FxHashMap<Address, Arc<dyn Facet>>,
	next_nonce: u64,
}

impl CodeTable {
	/// Code deployed at `address`.
	pub fn get(&self, address: Address) -> Option<&Arc<dyn Facet>> {
		self.code.get(&address)
	}

	/// Number of deployed facets.
	pub fn len(&self) -> usize {
		self.code.len()
	}

	/// Returns true if nothing is deployed.
	pub fn is_empty(&self) -> bool {
		self.code.is_empty()
	}
}

impl CodeLookup for CodeTable {
	fn has_code(&self, address: Address) -> bool {
		self.code.contains_key(&address)
	}
}

impl fmt::Debug for CodeTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut entries: Vec<_> = self.code.iter().map(|(addr, facet)| (*addr, facet.name())).collect();
		entries.sort_unstable();
		f.debug_struct("CodeTable")
			.field("code", &entries)
			.field("next_nonce", &self.next_nonce)
			.finish()
	}
}

/// Code store with atomic publication.
pub struct Deployments {
	label: &'static str,
	table: ArcSwap<CodeTable>,
}

impl Default for Deployments {
	fn default() -> Self {
		Self::new("lapis")
	}
}

impl fmt::Debug for Deployments {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Deployments")
			.field("label", &self.label)
			.field("table", &self.table.load())
			.finish()
	}
}

impl Deployments {
	/// Creates an empty code store. `label` seeds address derivation.
	pub fn new(label: &'static str) -> Self {
		Self {
			label,
			table: ArcSwap::from_pointee(CodeTable::default()),
		}
	}

	/// Deploys `facet`, returning its new address.
	pub fn deploy(&self, facet: impl Facet) -> Address {
		self.deploy_arc(Arc::new(facet))
	}

	/// Deploys shared facet code, returning its new address.
	pub fn deploy_arc(&self, facet: Arc<dyn Facet>) -> Address {
		let address = self.publish(Some(facet.clone()));
		tracing::debug!(facet = facet.name(), %address, "facet deployed");
		address
	}

	/// Reserves a fresh address that holds no code (used for the diamond itself).
	pub fn allocate(&self) -> Address {
		self.publish(None)
	}

	/// Code deployed at `address`.
	pub fn code(&self, address: Address) -> Option<Arc<dyn Facet>> {
		self.table.load().get(address).cloned()
	}

	/// Pins the current code table.
	pub fn snapshot(&self) -> Arc<CodeTable> {
		self.table.load_full()
	}

	fn publish(&self, facet: Option<Arc<dyn Facet>>) -> Address {
		loop {
			let old = self.table.load_full();
			let mut next = CodeTable::clone(&old);
			let address = Address::derive(self.label, next.next_nonce);
			next.next_nonce += 1;
			if let Some(facet) = &facet {
				next.code.insert(address, facet.clone());
			}
			let next = Arc::new(next);
			let prev = self.table.compare_and_swap(&old, next);
			if Arc::ptr_eq(&prev, &old) {
				return address;
			}
			// Another deployment won; retry against its table.
		}
	}
}

impl CodeLookup for Deployments {
	fn has_code(&self, address: Address) -> bool {
		self.table.load().has_code(address)
	}
}
