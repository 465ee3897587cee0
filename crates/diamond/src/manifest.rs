//! Deployment manifests (`lapis.toml`).
//!
//! A manifest names the owner, the facets to deploy from the built-in
//! catalogue, the initial cut with its optional initializer, and any number
//! of follow-up upgrades:
//!
//! ```toml
//! owner = "0x00000000000000000000000000000000000000a1"
//!
//! [[facets]]
//! name = "cut"
//! kind = "diamond-cut"
//!
//! [[facets]]
//! name = "pool"
//! kind = "pool"
//!
//! [[cut]]
//! facet = "cut"
//! functions = ["*"]
//!
//! [[cut]]
//! facet = "pool"
//! functions = ["poolAddress()"]
//!
//! [init]
//! facet = "pool"
//! function = "init(address)"
//! args = ["0x00000000000000000000000000000000000000b0"]
//! ```
//!
//! `functions` lists signatures, `0x`-prefixed selectors, or `"*"` for every
//! routable function of the named facet. `action` defaults to `add`; remove
//! entries still name a facet when they use `"*"`, but always cut with the
//! null address.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;
use lapis_primitives::abi::encode_return;
use lapis_primitives::{AbiError, Address, FacetCut, FacetCutAction, ParseHexError, Selector};
use serde::Deserialize;
use thiserror::Error;

use crate::diamond::{Diamond, DiamondArgs};
use crate::error::CallError;
use crate::event::Receipt;
use crate::facet::{Deployments, Facet};
use crate::facets::{
	DiamondCutFacet, DiamondLoupeFacet, OwnershipFacet, PoolFacet, RelayFacet, RosterFacet, TallyFacet,
};

/// Wildcard standing for a facet's whole routable surface.
pub const WILDCARD: &str = "*";

/// Manifest loading or deployment failure.
#[derive(Debug, Error)]
pub enum ManifestError {
	/// The manifest file could not be read.
	#[error("failed to read {path}: {source}")]
	Read {
		/// Manifest path.
		path: PathBuf,
		/// I/O failure.
		#[source]
		source: std::io::Error,
	},
	/// The manifest is not valid TOML or does not match the schema.
	#[error("invalid manifest: {0}")]
	Parse(#[from] toml::de::Error),
	/// Two facets share a name.
	#[error("facet name {0:?} is declared twice")]
	DuplicateFacet(String),
	/// A cut or initializer names an undeclared facet.
	#[error("{field} names unknown facet {name:?}")]
	UnknownFacet {
		/// Where the name appeared.
		field: &'static str,
		/// Unknown name.
		name: String,
	},
	/// A wildcard cut entry does not name a facet.
	#[error("cut entry {index} uses \"*\" without naming a facet")]
	WildcardWithoutFacet {
		/// Entry index.
		index: usize,
	},
	/// An add or replace entry does not name a facet.
	#[error("cut entry {index} ({action}) does not name a facet")]
	MissingFacet {
		/// Entry index.
		index: usize,
		/// Entry action.
		action: FacetCutAction,
	},
	/// An initializer names a function its facet does not implement.
	#[error("facet {facet:?} has no function {signature:?}")]
	UnknownFunction {
		/// Facet name.
		facet: String,
		/// Requested signature.
		signature: String,
	},
	/// An argument literal is neither a boolean, an integer nor an address.
	#[error("bad argument literal {0:?}")]
	BadArgument(String),
	/// A `0x` selector literal is malformed.
	#[error("bad selector {literal:?}: {source}")]
	BadSelector {
		/// Offending literal.
		literal: String,
		/// Parse failure.
		#[source]
		source: ParseHexError,
	},
	/// Initializer arguments failed to encode.
	#[error(transparent)]
	Encode(#[from] AbiError),
	/// Construction or an upgrade failed.
	#[error("deployment failed: {0}")]
	Call(#[from] CallError),
}

/// Facets the manifest can deploy by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacetKind {
	/// [`DiamondCutFacet`].
	DiamondCut,
	/// [`DiamondLoupeFacet`].
	DiamondLoupe,
	/// [`OwnershipFacet`].
	Ownership,
	/// [`RosterFacet`].
	Roster,
	/// [`TallyFacet`].
	Tally,
	/// [`RelayFacet`].
	Relay,
	/// [`PoolFacet`].
	Pool,
}

impl FacetKind {
	/// Builds the facet code. `version` only affects the roster.
	pub fn instantiate(self, version: Option<u32>) -> Arc<dyn Facet> {
		match self {
			Self::DiamondCut => Arc::new(DiamondCutFacet::default()),
			Self::DiamondLoupe => Arc::new(DiamondLoupeFacet::default()),
			Self::Ownership => Arc::new(OwnershipFacet::default()),
			Self::Roster => Arc::new(RosterFacet::new(version.unwrap_or(1))),
			Self::Tally => Arc::new(TallyFacet::default()),
			Self::Relay => Arc::new(RelayFacet::default()),
			Self::Pool => Arc::new(PoolFacet::default()),
		}
	}
}

/// A facet to deploy.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FacetSpec {
	/// Name other sections refer to.
	pub name: String,
	/// Catalogue entry.
	pub kind: FacetKind,
	/// Roster version.
	#[serde(default)]
	pub version: Option<u32>,
}

/// One cut entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CutSpec {
	/// Facet name; optional for removals without a wildcard.
	#[serde(default)]
	pub facet: Option<String>,
	/// Cut action.
	#[serde(default = "default_action")]
	pub action: FacetCutAction,
	/// Signatures, selector literals or `"*"`.
	pub functions: Vec<String>,
}

fn default_action() -> FacetCutAction {
	FacetCutAction::Add
}

/// Initializer argument literal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
	/// Boolean.
	Bool(bool),
	/// Unsigned integer.
	Uint(u64),
	/// `0x`-prefixed address.
	Address(Address),
}

impl FromStr for ArgValue {
	type Err = ManifestError;

	/// Parses `true`/`false`, a decimal integer or a `0x` address.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"true" => return Ok(Self::Bool(true)),
			"false" => return Ok(Self::Bool(false)),
			_ => {}
		}
		if let Ok(v) = s.parse::<u64>() {
			return Ok(Self::Uint(v));
		}
		s.parse::<Address>()
			.map(Self::Address)
			.map_err(|_| ManifestError::BadArgument(s.to_owned()))
	}
}

/// Encodes `signature` called with `args`: selector followed by each argument in order.
pub fn encode_call(signature: &str, args: &[ArgValue]) -> Result<Vec<u8>, AbiError> {
	let mut calldata = Selector::from_signature(signature).0.to_vec();
	for arg in args {
		arg.encode_into(&mut calldata)?;
	}
	Ok(calldata)
}

impl ArgValue {
	fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), AbiError> {
		let bytes = match self {
			Self::Bool(v) => encode_return(v)?,
			Self::Uint(v) => encode_return(v)?,
			Self::Address(v) => encode_return(v)?,
		};
		out.extend_from_slice(&bytes);
		Ok(())
	}
}

/// Initializer call run after a cut.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitSpec {
	/// Facet whose code runs.
	pub facet: String,
	/// Function signature, e.g. `init(address)`.
	pub function: String,
	/// Arguments, encoded in order.
	#[serde(default)]
	pub args: Vec<ArgValue>,
}

/// A follow-up cut applied after construction.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpgradeSpec {
	/// Caller; defaults to the owner.
	#[serde(default)]
	pub caller: Option<Address>,
	/// Cut entries.
	pub cut: Vec<CutSpec>,
	/// Optional initializer.
	#[serde(default)]
	pub init: Option<InitSpec>,
}

/// A parsed deployment manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
	/// Diamond owner.
	pub owner: Address,
	/// Facets to deploy, in order.
	#[serde(default)]
	pub facets: Vec<FacetSpec>,
	/// Initial cut.
	#[serde(default)]
	pub cut: Vec<CutSpec>,
	/// Initializer of the initial cut.
	#[serde(default)]
	pub init: Option<InitSpec>,
	/// Upgrades applied in order after construction.
	#[serde(default)]
	pub upgrades: Vec<UpgradeSpec>,
}

/// A deployed manifest.
pub struct Deployment {
	/// The diamond.
	pub diamond: Diamond,
	/// Deployed facet addresses by manifest name.
	pub facets: IndexMap<String, Address>,
	/// Receipts of the upgrades, in order.
	pub upgrades: Vec<Receipt>,
}

impl fmt::Debug for Deployment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Deployment")
			.field("diamond", &self.diamond.address())
			.field("facets", &self.facets)
			.field("upgrades", &self.upgrades.len())
			.finish()
	}
}

impl FromStr for Manifest {
	type Err = ManifestError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(toml::from_str(s)?)
	}
}

impl Manifest {
	/// Reads and parses a manifest file.
	pub fn load(path: &Path) -> Result<Self, ManifestError> {
		let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		let manifest: Self = content.parse()?;
		tracing::debug!(path = %path.display(), facets = manifest.facets.len(), "manifest loaded");
		Ok(manifest)
	}

	/// Deploys the facets into a fresh code store, constructs the diamond and
	/// applies the upgrades.
	pub fn deploy(&self) -> Result<Deployment, ManifestError> {
		self.deploy_into(Arc::new(Deployments::default()))
	}

	/// Like [`deploy`](Self::deploy), into an existing code store.
	pub fn deploy_into(&self, deployments: Arc<Deployments>) -> Result<Deployment, ManifestError> {
		let mut code = Catalogue::default();
		for spec in &self.facets {
			if code.entries.contains_key(&spec.name) {
				return Err(ManifestError::DuplicateFacet(spec.name.clone()));
			}
			let facet = spec.kind.instantiate(spec.version);
			let address = deployments.deploy_arc(Arc::clone(&facet));
			code.entries.insert(spec.name.clone(), (address, facet));
		}

		let cuts = code.resolve_cuts(&self.cut)?;
		let (init, init_calldata) = code.resolve_init(self.init.as_ref())?;
		let diamond = Diamond::new(
			deployments,
			&cuts,
			DiamondArgs {
				owner: self.owner,
				init,
				init_calldata,
			},
		)?;

		let mut upgrades = Vec::with_capacity(self.upgrades.len());
		for upgrade in &self.upgrades {
			let cuts = code.resolve_cuts(&upgrade.cut)?;
			let (init, payload) = code.resolve_init(upgrade.init.as_ref())?;
			let caller = upgrade.caller.unwrap_or(self.owner);
			upgrades.push(diamond.diamond_cut(caller, &cuts, init, &payload)?);
		}

		let facets = code.entries.into_iter().map(|(name, (address, _))| (name, address)).collect();
		Ok(Deployment {
			diamond,
			facets,
			upgrades,
		})
	}
}

#[derive(Default)]
struct Catalogue {
	entries: IndexMap<String, (Address, Arc<dyn Facet>)>,
}

impl Catalogue {
	fn lookup(&self, field: &'static str, name: &str) -> Result<&(Address, Arc<dyn Facet>), ManifestError> {
		self.entries.get(name).ok_or_else(|| ManifestError::UnknownFacet {
			field,
			name: name.to_owned(),
		})
	}

	fn resolve_cuts(&self, specs: &[CutSpec]) -> Result<Vec<FacetCut>, ManifestError> {
		specs
			.iter()
			.enumerate()
			.map(|(index, spec)| self.resolve_cut(index, spec))
			.collect()
	}

	fn resolve_cut(&self, index: usize, spec: &CutSpec) -> Result<FacetCut, ManifestError> {
		let facet = spec.facet.as_deref().map(|name| self.lookup("cut", name)).transpose()?;
		let mut selectors = Vec::with_capacity(spec.functions.len());
		for function in &spec.functions {
			if function == WILDCARD {
				let (_, code) = facet.ok_or(ManifestError::WildcardWithoutFacet { index })?;
				selectors.extend(code.selectors());
			} else {
				selectors.push(parse_function(function)?);
			}
		}
		let facet_address = match spec.action {
			FacetCutAction::Remove => Address::ZERO,
			action => facet.map(|(address, _)| *address).ok_or(ManifestError::MissingFacet { index, action })?,
		};
		Ok(FacetCut {
			facet_address,
			action: spec.action,
			function_selectors: selectors,
		})
	}

	fn resolve_init(&self, spec: Option<&InitSpec>) -> Result<(Address, Vec<u8>), ManifestError> {
		let Some(spec) = spec else {
			return Ok((Address::ZERO, Vec::new()));
		};
		let (address, code) = self.lookup("init", &spec.facet)?;
		if !code.signatures().contains(&spec.function.as_str()) {
			return Err(ManifestError::UnknownFunction {
				facet: spec.facet.clone(),
				signature: spec.function.clone(),
			});
		}
		Ok((*address, encode_call(&spec.function, &spec.args)?))
	}
}

fn parse_function(function: &str) -> Result<Selector, ManifestError> {
	if function.starts_with("0x") {
		function.parse().map_err(|source| ManifestError::BadSelector {
			literal: function.to_owned(),
			source,
		})
	} else {
		Ok(Selector::from_signature(function))
	}
}
