//! Subcommand implementations. Each returns the text printed on stdout.

use std::path::Path;

use anyhow::{Context, Result};
use lapis_diamond::manifest::{ArgValue, encode_call};
use lapis_diamond::{Deployment, Event, Manifest, Receipt};
use lapis_primitives::{Address, Selector, interface_id};
use lapis_registry::{DiamondLoupe, FacetEntry};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::cli::{Command, Returns};

pub fn run(command: Command) -> Result<String> {
	match command {
		Command::Selector { signatures, interface } => Ok(selectors(&signatures, interface)),
		Command::Deploy { manifest } => deploy(&manifest),
		Command::Call {
			manifest,
			signature,
			args,
			caller,
			returns,
		} => call(&manifest, &signature, &args, caller, returns),
	}
}

fn selectors(signatures: &[String], interface: bool) -> String {
	let selectors: Vec<Selector> = signatures.iter().map(|sig| Selector::from_signature(sig)).collect();
	let mut lines: Vec<String> = selectors
		.iter()
		.zip(signatures)
		.map(|(selector, sig)| format!("{selector}  {sig}"))
		.collect();
	if interface {
		lines.push(format!("{}  interface", interface_id(&selectors)));
	}
	lines.join("\n")
}

fn load(path: &Path) -> Result<Deployment> {
	let manifest = Manifest::load(path)?;
	manifest
		.deploy()
		.with_context(|| format!("deploying {}", path.display()))
}

#[derive(Serialize)]
struct DeploySummary<'a> {
	diamond: Address,
	owner: Address,
	facets: Vec<NamedFacet<'a>>,
	loupe: Vec<FacetEntry>,
	upgrades: Vec<&'a [Event]>,
}

#[derive(Serialize)]
struct NamedFacet<'a> {
	name: &'a str,
	address: Address,
}

fn deploy(path: &Path) -> Result<String> {
	let deployment = load(path)?;
	let diamond = &deployment.diamond;
	let summary = DeploySummary {
		diamond: diamond.address(),
		owner: diamond.owner(),
		facets: deployment
			.facets
			.iter()
			.map(|(name, &address)| NamedFacet { name, address })
			.collect(),
		loupe: diamond.loupe().facets(),
		upgrades: deployment.upgrades.iter().map(|r| r.events.as_slice()).collect(),
	};
	Ok(serde_json::to_string_pretty(&summary)?)
}

fn call(path: &Path, signature: &str, args: &[String], caller: Option<Address>, returns: Returns) -> Result<String> {
	let args = args
		.iter()
		.map(|arg| arg.parse::<ArgValue>())
		.collect::<Result<Vec<_>, _>>()?;
	let deployment = load(path)?;
	let diamond = &deployment.diamond;
	let caller = caller.unwrap_or_else(|| diamond.owner());
	let calldata = encode_call(signature, &args)?;
	tracing::debug!(%caller, signature, len = calldata.len(), "calling");

	let receipt = diamond
		.call(caller, &calldata)
		.with_context(|| format!("calling {signature}"))?;
	let output = decode_output(&receipt, returns)?;
	Ok(serde_json::to_string_pretty(&json!({
		"output": output,
		"events": receipt.events,
	}))?)
}

fn decode_output(receipt: &Receipt, returns: Returns) -> Result<Value> {
	fn as_json<T: DeserializeOwned + Serialize>(receipt: &Receipt) -> Result<Value> {
		Ok(serde_json::to_value(receipt.decode::<T>()?)?)
	}

	match returns {
		Returns::Raw => Ok(Value::String(format!("0x{}", hex::encode(&receipt.output)))),
		Returns::Unit => Ok(Value::Null),
		Returns::Bool => as_json::<bool>(receipt),
		Returns::Uint => as_json::<u64>(receipt),
		Returns::Address => as_json::<Address>(receipt),
		Returns::Addresses => as_json::<Vec<Address>>(receipt),
		Returns::Selectors => as_json::<Vec<Selector>>(receipt),
		Returns::Facets => as_json::<Vec<FacetEntry>>(receipt),
	}
}
