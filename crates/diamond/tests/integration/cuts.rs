use lapis_diamond::facets::CUT_SIGNATURES;
use lapis_diamond::{CallError, Event};
use lapis_primitives::abi::encode_signature_call;
use lapis_primitives::{Address, FacetCut};
use lapis_registry::{CutError, DiamondLoupe};
use pretty_assertions::assert_eq;

use crate::common::*;

fn cut_error(err: CallError) -> CutError {
	match err {
		CallError::Cut(err) => err,
		other => panic!("expected a cut error, got {other:?}"),
	}
}

#[test]
fn replace_then_remove_prunes_facet() {
	let fx = fixture();
	let x = sel("addPlayer(address)");
	let y = sel("getPlayers()");
	fx.cut(&[FacetCut::add(fx.roster, [x, y])]).unwrap();

	fx.cut(&[FacetCut::replace(fx.roster_v2, [x])]).unwrap();
	let loupe = fx.diamond.loupe();
	assert_eq!(loupe.facet_address(x), Some(fx.roster_v2));
	assert_eq!(loupe.facet_function_selectors(fx.roster), vec![y]);
	assert!(loupe.facet_addresses().contains(&fx.roster));
	assert!(loupe.facet_addresses().contains(&fx.roster_v2));

	fx.cut(&[FacetCut::remove([y])]).unwrap();
	let loupe = fx.diamond.loupe();
	assert_eq!(loupe.facet_address(y), None);
	assert!(loupe.facet_function_selectors(fx.roster).is_empty());
	assert!(!loupe.facet_addresses().contains(&fx.roster));
	assert!(loupe.facet_addresses().contains(&fx.roster_v2));
}

#[test]
fn adding_routed_selector_fails_unchanged() {
	let fx = fixture().with_roster();
	let before = fx.diamond.loupe().facets();
	let err = fx.cut(&[FacetCut::add(fx.roster_v2, sels(&["getPlayers()"]))]).unwrap_err();
	assert_eq!(
		cut_error(err),
		CutError::IdentifierAlreadyRouted {
			index: 0,
			selector: sel("getPlayers()"),
			owner: fx.roster,
		}
	);
	assert_eq!(fx.diamond.loupe().facets(), before);
}

#[test]
fn replacing_unrouted_selector_fails() {
	let fx = fixture();
	let err = fx.cut(&[FacetCut::replace(fx.roster, sels(&["getPlayers()"]))]).unwrap_err();
	assert_eq!(
		cut_error(err),
		CutError::IdentifierNotRouted {
			index: 0,
			selector: sel("getPlayers()"),
		}
	);
}

#[test]
fn replacing_with_current_owner_fails() {
	let fx = fixture().with_roster();
	let err = fx.cut(&[FacetCut::replace(fx.roster, sels(&["getPlayers()"]))]).unwrap_err();
	assert_eq!(
		cut_error(err),
		CutError::SelfReplace {
			index: 0,
			selector: sel("getPlayers()"),
			facet: fx.roster,
		}
	);
}

#[test]
fn remove_with_target_fails_unchanged() {
	let fx = fixture().with_roster();
	let before = fx.diamond.snapshot();
	let mut entry = FacetCut::remove(sels(&["getPlayers()"]));
	entry.facet_address = fx.roster;
	let err = fx.cut(&[entry]).unwrap_err();
	assert_eq!(
		cut_error(err),
		CutError::NonNullRemoveTarget {
			index: 0,
			facet: fx.roster,
		}
	);
	assert_eq!(fx.diamond.snapshot().routes(), before.routes());
}

#[test]
fn stranger_is_rejected_before_validation() {
	let fx = fixture();
	let before = fx.diamond.snapshot();
	let invalid = FacetCut::add(Address::ZERO, sels(&["getPlayers()"]));
	let err = fx.diamond.diamond_cut(STRANGER, &[invalid], Address::ZERO, &[]).unwrap_err();
	assert_eq!(
		cut_error(err),
		CutError::Unauthorized {
			caller: STRANGER,
			owner: OWNER,
		}
	);
	assert_eq!(fx.diamond.snapshot().routes(), before.routes());
}

#[test]
fn undeployed_facet_is_rejected() {
	let fx = fixture();
	let ghost = Address::from_low_u8(0x99);
	let err = fx.cut(&[FacetCut::add(ghost, sels(&["getPlayers()"]))]).unwrap_err();
	assert_eq!(cut_error(err), CutError::FacetNotDeployed { index: 0, facet: ghost });
}

#[test]
fn routed_diamond_cut_is_owner_gated() {
	let fx = fixture();
	let cuts = vec![FacetCut::add(fx.roster, roster_selectors())];
	let calldata = encode_signature_call(CUT_SIGNATURES[0], &(cuts.clone(), Address::ZERO, Vec::<u8>::new())).unwrap();

	let err = fx.diamond.call(STRANGER, &calldata).unwrap_err();
	assert!(matches!(cut_error(err), CutError::Unauthorized { caller: STRANGER, .. }));

	let receipt = fx.diamond.call(OWNER, &calldata).unwrap();
	assert_eq!(
		receipt.events,
		vec![Event::DiamondCut {
			cuts,
			init: Address::ZERO,
			calldata: Vec::new(),
		}]
	);
	assert_eq!(fx.diamond.loupe().facet_function_selectors(fx.roster), roster_selectors());
}

#[test]
fn initializer_prepares_storage() {
	let fx = fixture();
	let payload = encode_signature_call("init(address)", &POOL).unwrap();
	let cuts = vec![FacetCut::add(fx.pool, sels(&["poolAddress()"]))];
	let receipt = fx.diamond.diamond_cut(OWNER, &cuts, fx.pool, &payload).unwrap();

	assert_eq!(fx.query::<Address, _>("poolAddress()", &()), POOL);
	assert!(matches!(&receipt.events[..], [Event::Log { name, .. }, Event::DiamondCut { init, .. }]
		if name == "PoolInitialized" && *init == fx.pool));
}

#[test]
fn initializer_target_without_code_is_rejected() {
	let fx = fixture();
	let ghost = Address::from_low_u8(0x99);
	let err = fx.diamond.diamond_cut(OWNER, &[], ghost, &[1, 2, 3, 4]).unwrap_err();
	assert_eq!(cut_error(err), CutError::InitializerNotDeployed { target: ghost });
}

#[test]
fn initializer_payload_needs_target() {
	let fx = fixture();
	let err = fx.diamond.diamond_cut(OWNER, &[], Address::ZERO, &[1, 2, 3, 4]).unwrap_err();
	assert_eq!(cut_error(err), CutError::InitializerPayloadWithoutTarget { len: 4 });
}

#[test]
fn removing_routed_cut_keeps_direct_path() {
	let fx = fixture();
	fx.cut(&[FacetCut::remove(sels(CUT_SIGNATURES))]).unwrap();

	let calldata =
		encode_signature_call(CUT_SIGNATURES[0], &(Vec::<FacetCut>::new(), Address::ZERO, Vec::<u8>::new())).unwrap();
	assert!(matches!(fx.diamond.call(OWNER, &calldata), Err(CallError::DispatchMiss { .. })));

	fx.cut(&[FacetCut::add(fx.roster, roster_selectors())]).unwrap();
	assert_eq!(fx.players(), Vec::<Address>::new());
}

#[test]
fn empty_selector_list_is_rejected() {
	let fx = fixture();
	let err = fx.cut(&[FacetCut::add(fx.roster, std::iter::empty())]).unwrap_err();
	assert_eq!(cut_error(err), CutError::EmptySelectorList { index: 0 });
}
