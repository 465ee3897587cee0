use std::sync::Arc;

use lapis_diamond::CallError;
use lapis_diamond::facets::RosterStorage;
use lapis_primitives::abi::encode_signature_call;
use lapis_primitives::{Address, FacetCut, Selector};
use lapis_registry::{CutError, DiamondLoupe};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::*;

#[test]
fn invalid_later_entry_discards_earlier_entries() {
	let fx = fixture();
	let before = fx.diamond.snapshot();
	let err = fx
		.cut(&[
			FacetCut::add(fx.tally, sels(&["addOwner(address)", "getTotalCount()"])),
			FacetCut::add(fx.roster, sels(&["getPlayers()", "owner()"])),
		])
		.unwrap_err();

	assert!(matches!(
		err.as_cut(),
		Some(CutError::IdentifierAlreadyRouted { index: 1, owner, .. }) if *owner == fx.standard.ownership
	));
	assert!(Arc::ptr_eq(&before, &fx.diamond.snapshot()));
	assert_eq!(fx.diamond.loupe().facet_address(sel("addOwner(address)")), None);
	assert_eq!(fx.diamond.loupe().facet_address(sel("getPlayers()")), None);
}

#[test]
fn failing_initializer_discards_the_add() {
	let fx = fixture();
	let payload = encode_signature_call("init(address)", &Address::ZERO).unwrap();
	let err = fx
		.diamond
		.diamond_cut(OWNER, &[FacetCut::add(fx.pool, sels(&["poolAddress()"]))], fx.pool, &payload)
		.unwrap_err();

	let CallError::InitializerFailed { target, source } = &err else {
		panic!("expected initializer failure, got {err:?}");
	};
	assert_eq!(*target, fx.pool);
	assert!(matches!(**source, CallError::Reverted(ref reason) if reason == "pool address is null"));
	assert_eq!(fx.diamond.loupe().facet_address(sel("poolAddress()")), None);
	assert!(!fx.diamond.loupe().facet_addresses().contains(&fx.pool));
}

#[test]
fn failing_initializer_keeps_earlier_initialization() {
	let fx = fixture();
	let first = encode_signature_call("init(address)", &POOL).unwrap();
	fx.diamond
		.diamond_cut(OWNER, &[FacetCut::add(fx.pool, sels(&["poolAddress()"]))], fx.pool, &first)
		.unwrap();

	let second = encode_signature_call("init(address)", &STRANGER).unwrap();
	let err = fx
		.diamond
		.diamond_cut(OWNER, &[FacetCut::add(fx.tally, sels(&["getTotalCount()"]))], fx.pool, &second)
		.unwrap_err();
	assert!(matches!(err, CallError::InitializerFailed { .. }));
	assert_eq!(fx.query::<Address, _>("poolAddress()", &()), POOL);
	assert_eq!(fx.diamond.loupe().facet_address(sel("getTotalCount()")), None);
}

#[test]
fn reverted_call_leaves_storage_untouched() {
	let fx = fixture().with_roster().with_relay();
	fx.call("addPlayer(address)", &PLAYER_1).unwrap();
	let before = fx.diamond.snapshot();

	let err = fx.call("enrollThenRevert(address)", &PLAYER_2).unwrap_err();
	assert!(matches!(err, CallError::Reverted(_)));
	assert!(Arc::ptr_eq(&before, &fx.diamond.snapshot()));
	assert_eq!(
		fx.diamond.snapshot().storage().read::<RosterStorage>().unwrap().players,
		vec![PLAYER_1]
	);
}

#[derive(Debug, Clone)]
enum Op {
	Add(usize, Vec<usize>),
	Replace(usize, Vec<usize>),
	Remove(Vec<usize>),
}

const SIGNATURES: &[&str] = &[
	"addPlayer(address)",
	"getPlayers()",
	"manipulateCount(uint256)",
	"getTeamsCount()",
	"testFunc(address)",
	"version()",
];

fn op() -> impl Strategy<Value = Op> {
	let picks = || prop::collection::vec(0..SIGNATURES.len(), 1..4);
	prop_oneof![
		(0..3usize, picks()).prop_map(|(f, s)| Op::Add(f, s)),
		(0..3usize, picks()).prop_map(|(f, s)| Op::Replace(f, s)),
		picks().prop_map(Op::Remove),
	]
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(64))]

	#[test]
	fn rejected_cuts_publish_nothing(ops in prop::collection::vec(op(), 1..24)) {
		let fx = fixture();
		let facets = [fx.roster, fx.roster_v2, fx.tally];
		let pick = |idx: &[usize]| idx.iter().map(|&i| Selector::from_signature(SIGNATURES[i])).collect::<Vec<_>>();

		for op in ops {
			let entry = match &op {
				Op::Add(f, s) => FacetCut::add(facets[*f], pick(s)),
				Op::Replace(f, s) => FacetCut::replace(facets[*f], pick(s)),
				Op::Remove(s) => FacetCut::remove(pick(s)),
			};
			let before = fx.diamond.snapshot();
			match fx.cut(&[entry]) {
				Ok(_) => prop_assert!(!Arc::ptr_eq(&before, &fx.diamond.snapshot())),
				Err(_) => prop_assert!(Arc::ptr_eq(&before, &fx.diamond.snapshot())),
			}
			let state = fx.diamond.snapshot();
			prop_assert_eq!(state.routes().check_consistency(), Ok(()));
			for facet in state.routes().facet_addresses() {
				prop_assert!(!state.routes().selectors_of(facet).is_empty());
			}
		}
	}
}
