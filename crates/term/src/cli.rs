use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use lapis_primitives::Address;

#[derive(Parser, Debug)]
#[command(name = "lapis")]
#[command(about = "Upgradeable diamond toolkit")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Debug logging (overridden by LAPIS_LOG)
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print the selector of each function signature
	Selector {
		/// Signatures such as `transfer(address,uint256)`
		#[arg(required = true)]
		signatures: Vec<String>,

		/// Also print the ERC-165 interface id of all signatures together
		#[arg(long)]
		interface: bool,
	},
	/// Deploy a manifest and print the resulting diamond as JSON
	Deploy {
		/// Path to the manifest (lapis.toml)
		manifest: PathBuf,
	},
	/// Deploy a manifest, then call one function on the diamond
	Call {
		/// Path to the manifest (lapis.toml)
		manifest: PathBuf,

		/// Function signature, e.g. `addPlayer(address)`
		signature: String,

		/// Arguments: `true`/`false`, decimal integers or `0x` addresses
		args: Vec<String>,

		/// Caller address (defaults to the manifest owner)
		#[arg(long)]
		caller: Option<Address>,

		/// How to decode the return data
		#[arg(long, value_enum, default_value_t = Returns::Raw)]
		returns: Returns,
	},
}

/// Return-data decodings understood by `call`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Returns {
	/// Hex-encoded bytes
	Raw,
	/// Nothing
	Unit,
	/// A boolean
	Bool,
	/// An unsigned integer
	Uint,
	/// An address
	Address,
	/// A list of addresses
	Addresses,
	/// A list of selectors
	Selectors,
	/// Loupe facet entries
	Facets,
}
