//! Sample facets used by tests, manifests and the CLI.

use lapis_primitives::abi::{decode_args, decode_return, encode_return};
use lapis_primitives::{Address, Selector};

use super::{Handler, invoke};
use crate::context::CallContext;
use crate::error::{CallError, CallResult};
use crate::facet::{Facet, FunctionTable};
use crate::storage::StorageSlice;

/// Players and a team counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterStorage {
	/// Registered players in insertion order.
	pub players: Vec<Address>,
	/// Value last set by `manipulateCount`.
	pub teams_count: u64,
}

impl StorageSlice for RosterStorage {
	const NAMESPACE: &'static str = "lapis.sample.roster";
}

/// Owners registered through the tally facet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TallyStorage {
	/// Registered owners.
	pub owners: Vec<Address>,
}

impl StorageSlice for TallyStorage {
	const NAMESPACE: &'static str = "lapis.sample.tally";
}

/// Pool address written once by the pool initializer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStorage {
	/// Configured pool.
	pub pool: Address,
	/// Set by `init`.
	pub initialized: bool,
}

impl StorageSlice for PoolStorage {
	const NAMESPACE: &'static str = "lapis.sample.pool";
}

macro_rules! facet_impl {
	($ty:ident, $name:literal) => {
		impl Facet for $ty {
			fn name(&self) -> &str {
				$name
			}

			fn signatures(&self) -> Vec<&'static str> {
				self.functions.signatures()
			}

			fn call(&self, ctx: &mut CallContext<'_>, selector: Selector, args: &[u8]) -> CallResult<Vec<u8>> {
				invoke(self, &self.functions, ctx, selector, args)
			}
		}
	};
}

/// Roster of players. `version` tells deployments apart in replace tests.
///
/// Also answers `supportsInterface(bytes4)` (always `false`), which collides
/// with the loupe facet when its whole surface is added.
#[derive(Debug)]
pub struct RosterFacet {
	version: u32,
	functions: FunctionTable<Handler<Self>>,
}

impl Default for RosterFacet {
	fn default() -> Self {
		Self::new(1)
	}
}

impl RosterFacet {
	/// Signatures in declaration order.
	pub const SIGNATURES: &'static [&'static str] = &[
		"addPlayer(address)",
		"manipulateCount(uint256)",
		"getTeamsCount()",
		"getPlayers()",
		"testFunc(address)",
		"supportsInterface(bytes4)",
		"version()",
	];

	/// Creates roster code reporting `version`.
	pub fn new(version: u32) -> Self {
		let handlers: [Handler<Self>; 7] = [
			Self::add_player,
			Self::manipulate_count,
			Self::teams_count,
			Self::players,
			Self::test_func,
			Self::supports_interface,
			Self::version,
		];
		let functions: Vec<_> = Self::SIGNATURES.iter().copied().zip(handlers).collect();
		Self {
			version,
			functions: FunctionTable::new(&functions),
		}
	}

	fn add_player(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> CallResult<Vec<u8>> {
		let player: Address = decode_args(args)?;
		ctx.slice_mut::<RosterStorage>()?.players.push(player);
		ctx.emit("PlayerAdded", &player)?;
		Ok(Vec::new())
	}

	fn manipulate_count(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> CallResult<Vec<u8>> {
		let count: u64 = decode_args(args)?;
		ctx.slice_mut::<RosterStorage>()?.teams_count = count;
		Ok(Vec::new())
	}

	fn teams_count(&self, ctx: &mut CallContext<'_>, _: &[u8]) -> CallResult<Vec<u8>> {
		Ok(encode_return(&ctx.slice::<RosterStorage>()?.teams_count)?)
	}

	fn players(&self, ctx: &mut CallContext<'_>, _: &[u8]) -> CallResult<Vec<u8>> {
		Ok(encode_return(&ctx.slice::<RosterStorage>()?.players)?)
	}

	fn test_func(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> CallResult<Vec<u8>> {
		let player: Address = decode_args(args)?;
		let roster = ctx.slice::<RosterStorage>()?;
		Ok(encode_return(&roster.players.contains(&player))?)
	}

	fn supports_interface(&self, _: &mut CallContext<'_>, _: &[u8]) -> CallResult<Vec<u8>> {
		Ok(encode_return(&false)?)
	}

	fn version(&self, _: &mut CallContext<'_>, _: &[u8]) -> CallResult<Vec<u8>> {
		Ok(encode_return(&self.version)?)
	}
}

facet_impl!(RosterFacet, "RosterFacet");

/// Registry of owners.
#[derive(Debug)]
pub struct TallyFacet {
	functions: FunctionTable<Handler<Self>>,
}

impl Default for TallyFacet {
	fn default() -> Self {
		Self {
			functions: FunctionTable::new(&[
				("addOwner(address)", Self::add_owner as Handler<Self>),
				("getTotalCount()", Self::total_count),
				("testFunc2(address)", Self::test_func2),
			]),
		}
	}
}

impl TallyFacet {
	fn add_owner(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> CallResult<Vec<u8>> {
		let owner: Address = decode_args(args)?;
		ctx.slice_mut::<TallyStorage>()?.owners.push(owner);
		Ok(Vec::new())
	}

	fn total_count(&self, ctx: &mut CallContext<'_>, _: &[u8]) -> CallResult<Vec<u8>> {
		let count = ctx.slice::<TallyStorage>()?.owners.len() as u64;
		Ok(encode_return(&count)?)
	}

	fn test_func2(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> CallResult<Vec<u8>> {
		let owner: Address = decode_args(args)?;
		Ok(encode_return(&ctx.slice::<TallyStorage>()?.owners.contains(&owner))?)
	}
}

facet_impl!(TallyFacet, "TallyFacet");

/// Calls back into the diamond. Holds no storage of its own; everything it
/// does goes through the routed roster functions.
#[derive(Debug)]
pub struct RelayFacet {
	functions: FunctionTable<Handler<Self>>,
}

impl Default for RelayFacet {
	fn default() -> Self {
		Self {
			functions: FunctionTable::new(&[
				("countPlayers()", Self::count_players as Handler<Self>),
				("enrollPlayer(address)", Self::enroll_player),
				("enrollThenRevert(address)", Self::enroll_then_revert),
				("tryCall(bytes)", Self::try_call),
				("recurse(uint256)", Self::recurse),
			]),
		}
	}
}

impl RelayFacet {
	fn player_count(ctx: &mut CallContext<'_>) -> CallResult<u64> {
		let output = ctx.reenter_signature("getPlayers()", &())?;
		let players: Vec<Address> = decode_return(&output)?;
		Ok(players.len() as u64)
	}

	fn count_players(&self, ctx: &mut CallContext<'_>, _: &[u8]) -> CallResult<Vec<u8>> {
		Ok(encode_return(&Self::player_count(ctx)?)?)
	}

	fn enroll_player(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> CallResult<Vec<u8>> {
		let player: Address = decode_args(args)?;
		ctx.reenter_signature("addPlayer(address)", &player)?;
		Ok(encode_return(&Self::player_count(ctx)?)?)
	}

	fn enroll_then_revert(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> CallResult<Vec<u8>> {
		let player: Address = decode_args(args)?;
		ctx.reenter_signature("addPlayer(address)", &player)?;
		Err(CallError::revert("enrollment rejected"))
	}

	fn try_call(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> CallResult<Vec<u8>> {
		let calldata: Vec<u8> = decode_args(args)?;
		let ok = ctx.reenter(&calldata).is_ok();
		Ok(encode_return(&ok)?)
	}

	fn recurse(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> CallResult<Vec<u8>> {
		let remaining: u64 = decode_args(args)?;
		if remaining == 0 {
			return Ok(encode_return(&(ctx.depth() as u64))?);
		}
		ctx.reenter_signature("recurse(uint256)", &(remaining - 1))
	}
}

facet_impl!(RelayFacet, "RelayFacet");

/// Stores a pool address through a one-shot initializer.
///
/// `init(address)` is not routable; it runs only as a cut initializer.
#[derive(Debug)]
pub struct PoolFacet {
	functions: FunctionTable<Handler<Self>>,
}

impl Default for PoolFacet {
	fn default() -> Self {
		Self {
			functions: FunctionTable::new(&[
				("init(address)", Self::init as Handler<Self>),
				("poolAddress()", Self::pool_address),
			]),
		}
	}
}

impl PoolFacet {
	fn init(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> CallResult<Vec<u8>> {
		let pool: Address = decode_args(args)?;
		if pool.is_zero() {
			return Err(CallError::revert("pool address is null"));
		}
		let slot = ctx.slice_mut::<PoolStorage>()?;
		if slot.initialized {
			return Err(CallError::revert("pool already initialized"));
		}
		slot.pool = pool;
		slot.initialized = true;
		ctx.emit("PoolInitialized", &pool)?;
		Ok(Vec::new())
	}

	fn pool_address(&self, ctx: &mut CallContext<'_>, _: &[u8]) -> CallResult<Vec<u8>> {
		Ok(encode_return(&ctx.slice::<PoolStorage>()?.pool)?)
	}
}

facet_impl!(PoolFacet, "PoolFacet");
