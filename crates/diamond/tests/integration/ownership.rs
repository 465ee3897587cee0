use std::sync::Arc;

use lapis_diamond::facets::deploy_standard;
use lapis_diamond::{CallError, Deployments, Diamond, DiamondArgs, Event, OwnershipError};
use lapis_primitives::{Address, FacetCut};
use lapis_registry::CutError;
use pretty_assertions::assert_eq;

use crate::common::*;

#[test]
fn transfer_moves_cut_rights() {
	let fx = fixture();
	assert_eq!(fx.diamond.owner(), OWNER);

	let receipt = fx.diamond.transfer_ownership(OWNER, STRANGER).unwrap();
	assert_eq!(
		receipt.events,
		vec![Event::OwnershipTransferred {
			previous_owner: OWNER,
			new_owner: STRANGER,
		}]
	);
	assert_eq!(fx.diamond.owner(), STRANGER);

	let entry = [FacetCut::add(fx.roster, roster_selectors())];
	let err = fx.diamond.diamond_cut(OWNER, &entry, Address::ZERO, &[]).unwrap_err();
	assert!(matches!(err.as_cut(), Some(CutError::Unauthorized { caller: OWNER, owner: STRANGER })));
	fx.diamond.diamond_cut(STRANGER, &entry, Address::ZERO, &[]).unwrap();
}

#[test]
fn stranger_cannot_transfer() {
	let fx = fixture();
	let err = fx.diamond.transfer_ownership(STRANGER, STRANGER).unwrap_err();
	assert!(matches!(
		err,
		CallError::Ownership(OwnershipError::Unauthorized {
			caller: STRANGER,
			owner: OWNER
		})
	));
	assert_eq!(fx.diamond.owner(), OWNER);
}

#[test]
fn null_owner_is_refused() {
	let fx = fixture();
	let err = fx.diamond.transfer_ownership(OWNER, Address::ZERO).unwrap_err();
	assert!(matches!(err, CallError::Ownership(OwnershipError::NullOwner)));
	assert_eq!(fx.diamond.owner(), OWNER);
}

#[test]
fn routed_ownership_functions() {
	let fx = fixture();
	assert_eq!(fx.query::<Address, _>("owner()", &()), OWNER);

	let err = fx.diamond.call_signature(STRANGER, "transferOwnership(address)", &STRANGER).unwrap_err();
	assert!(matches!(err, CallError::Ownership(OwnershipError::Unauthorized { .. })));

	fx.call("transferOwnership(address)", &PLAYER_1).unwrap();
	assert_eq!(fx.diamond.owner(), PLAYER_1);
	assert_eq!(fx.query::<Address, _>("owner()", &()), PLAYER_1);
}

#[test]
fn construction_requires_owner() {
	let deployments = Arc::new(Deployments::default());
	let cuts = deploy_standard(&deployments).cuts();
	let err = Diamond::new(deployments, &cuts, DiamondArgs::owned_by(Address::ZERO)).unwrap_err();
	assert!(matches!(err, CallError::Ownership(OwnershipError::NullOwner)));
}

#[test]
fn construction_cut_is_validated() {
	let deployments = Arc::new(Deployments::default());
	let standard = deploy_standard(&deployments);
	let mut cuts = standard.cuts();
	cuts.push(FacetCut::add(standard.cut, sels(&["owner()"])));
	let err = Diamond::new(deployments, &cuts, DiamondArgs::owned_by(OWNER)).unwrap_err();
	assert!(matches!(err.as_cut(), Some(CutError::IdentifierAlreadyRouted { index: 4, .. })));
}
