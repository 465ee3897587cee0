use std::sync::Arc;

use lapis_diamond::{CallError, Event};
use lapis_primitives::abi::{encode_return, encode_signature_call};
use lapis_primitives::{Address, FacetCut};
use pretty_assertions::assert_eq;

use crate::common::*;

#[test]
fn routes_calls_to_owning_facet() {
	let fx = fixture().with_roster();
	fx.call("addPlayer(address)", &PLAYER_1).unwrap();
	fx.call("addPlayer(address)", &PLAYER_2).unwrap();
	assert_eq!(fx.players(), vec![PLAYER_1, PLAYER_2]);

	fx.call("manipulateCount(uint256)", &7u64).unwrap();
	assert_eq!(fx.query::<u64, _>("getTeamsCount()", &()), 7);
	assert!(fx.query::<bool, _>("testFunc(address)", &PLAYER_2));
	assert!(!fx.query::<bool, _>("testFunc(address)", &STRANGER));
}

#[test]
fn unrouted_selector_is_a_dispatch_miss() {
	let fx = fixture();
	let err = fx.call("getPlayers()", &()).unwrap_err();
	assert!(matches!(err, CallError::DispatchMiss { selector } if selector == sel("getPlayers()")));
}

#[test]
fn calldata_without_selector_is_malformed() {
	let fx = fixture();
	let err = fx.diamond.call(OWNER, &[0x7a, 0x0e]).unwrap_err();
	assert!(matches!(err, CallError::MalformedCalldata { len: 2 }));
}

#[test]
fn route_to_code_lacking_the_selector_fails() {
	let fx = fixture();
	fx.cut(&[FacetCut::add(fx.roster, sels(&["addOwner(address)"]))]).unwrap();
	let err = fx.call("addOwner(address)", &PLAYER_1).unwrap_err();
	assert!(matches!(
		err,
		CallError::UnsupportedSelector { facet, selector } if facet == fx.roster && selector == sel("addOwner(address)")
	));
}

#[test]
fn bad_arguments_revert_without_publishing() {
	let fx = fixture().with_roster();
	let before = fx.diamond.snapshot();
	let err = fx.diamond.call(OWNER, &sel("addPlayer(address)").0).unwrap_err();
	assert!(matches!(err, CallError::Abi(_)));
	assert!(Arc::ptr_eq(&before, &fx.diamond.snapshot()));
}

#[test]
fn storage_outlives_facet_replacement() {
	let fx = fixture().with_roster();
	fx.call("addPlayer(address)", &PLAYER_1).unwrap();
	assert_eq!(fx.query::<u32, _>("version()", &()), 1);

	fx.cut(&[FacetCut::replace(fx.roster_v2, roster_selectors())]).unwrap();
	assert_eq!(fx.query::<u32, _>("version()", &()), 2);
	assert_eq!(fx.players(), vec![PLAYER_1]);
}

#[test]
fn facets_keep_separate_slices() {
	let fx = fixture().with_roster();
	fx.cut(&[FacetCut::add(fx.tally, sels(&["addOwner(address)", "getTotalCount()", "testFunc2(address)"]))])
		.unwrap();
	fx.call("addOwner(address)", &PLAYER_1).unwrap();
	assert_eq!(fx.query::<u64, _>("getTotalCount()", &()), 1);
	assert!(fx.query::<bool, _>("testFunc2(address)", &PLAYER_1));
	assert_eq!(fx.players(), Vec::<Address>::new());
}

#[test]
fn receipt_carries_facet_logs() {
	let fx = fixture().with_roster();
	let receipt = fx.call("addPlayer(address)", &PLAYER_1).unwrap();
	assert_eq!(
		receipt.events,
		vec![Event::Log {
			emitter: fx.roster,
			name: "PlayerAdded".into(),
			data: encode_return(&PLAYER_1).unwrap(),
		}]
	);
	assert!(receipt.output.is_empty());
}

#[test]
fn raw_calldata_matches_signature_helper() {
	let fx = fixture().with_roster();
	let calldata = encode_signature_call("addPlayer(address)", &PLAYER_2).unwrap();
	assert_eq!(&calldata[..4], &sel("addPlayer(address)").0[..]);
	fx.diamond.call(STRANGER, &calldata).unwrap();
	assert_eq!(fx.players(), vec![PLAYER_2]);
}
