use lapis_diamond::{CallError, Event, MAX_CALL_DEPTH};
use lapis_primitives::Address;
use lapis_primitives::abi::{encode_return, encode_signature_call};
use pretty_assertions::assert_eq;

use crate::common::*;

#[test]
fn nested_call_reads_committed_state() {
	let fx = fixture().with_roster().with_relay();
	fx.call("addPlayer(address)", &PLAYER_1).unwrap();
	fx.call("addPlayer(address)", &PLAYER_2).unwrap();
	assert_eq!(fx.query::<u64, _>("countPlayers()", &()), 2);
}

#[test]
fn nested_call_sees_writes_of_the_same_transaction() {
	let fx = fixture().with_roster().with_relay();
	let receipt = fx.call("enrollPlayer(address)", &PLAYER_1).unwrap();
	assert_eq!(receipt.decode::<u64>().unwrap(), 1);
	assert_eq!(fx.players(), vec![PLAYER_1]);
	assert_eq!(
		receipt.events,
		vec![Event::Log {
			emitter: fx.roster,
			name: "PlayerAdded".into(),
			data: encode_return(&PLAYER_1).unwrap(),
		}]
	);
}

#[test]
fn outer_revert_unwinds_nested_success() {
	let fx = fixture().with_roster().with_relay();
	let err = fx.call("enrollThenRevert(address)", &PLAYER_1).unwrap_err();
	assert!(matches!(err, CallError::Reverted(ref reason) if reason == "enrollment rejected"));
	assert_eq!(fx.players(), Vec::<Address>::new());
}

#[test]
fn caught_nested_failure_rolls_back_only_its_frame() {
	let fx = fixture().with_roster().with_relay();
	fx.call("addPlayer(address)", &PLAYER_1).unwrap();

	let failing = encode_signature_call("enrollThenRevert(address)", &PLAYER_2).unwrap();
	let receipt = fx.call("tryCall(bytes)", &failing).unwrap();
	assert!(!receipt.decode::<bool>().unwrap());
	assert!(receipt.events.is_empty());
	assert_eq!(fx.players(), vec![PLAYER_1]);

	let succeeding = encode_signature_call("addPlayer(address)", &PLAYER_2).unwrap();
	assert!(fx.query::<bool, _>("tryCall(bytes)", &succeeding));
	assert_eq!(fx.players(), vec![PLAYER_1, PLAYER_2]);
}

#[test]
fn reentrant_caller_is_the_diamond() {
	let fx = fixture().with_roster().with_relay();
	let cut = encode_signature_call(
		lapis_diamond::facets::CUT_SIGNATURES[0],
		&(Vec::<lapis_primitives::FacetCut>::new(), Address::ZERO, Vec::<u8>::new()),
	)
	.unwrap();
	// The diamond is not the owner, so a re-entrant cut is refused.
	assert!(!fx.query::<bool, _>("tryCall(bytes)", &cut));

	fx.diamond.transfer_ownership(OWNER, fx.diamond.address()).unwrap();
	let receipt = fx.diamond.call_signature(STRANGER, "tryCall(bytes)", &cut).unwrap();
	assert!(receipt.decode::<bool>().unwrap());
}

#[test]
fn depth_counts_frames() {
	let fx = fixture().with_roster().with_relay();
	assert_eq!(fx.query::<u64, _>("recurse(uint256)", &0u64), 1);
	assert_eq!(fx.query::<u64, _>("recurse(uint256)", &5u64), 6);
}

#[test]
fn depth_limit_is_enforced() {
	// Every frame nests several Rust calls; give the deep chain room.
	std::thread::Builder::new()
		.stack_size(256 << 20)
		.spawn(|| {
			let fx = fixture().with_roster().with_relay();
			let deepest = (MAX_CALL_DEPTH - 1) as u64;
			assert_eq!(fx.query::<u64, _>("recurse(uint256)", &deepest), MAX_CALL_DEPTH as u64);

			let before = fx.diamond.snapshot();
			let err = fx.call("recurse(uint256)", &(deepest + 1)).unwrap_err();
			assert!(matches!(err, CallError::CallDepthExceeded { depth } if depth == MAX_CALL_DEPTH + 1));
			assert!(std::sync::Arc::ptr_eq(&before, &fx.diamond.snapshot()));
		})
		.unwrap()
		.join()
		.unwrap();
}
