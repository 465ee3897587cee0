use lapis_diamond::facets::{
	CUT_SIGNATURES, ERC165_SIGNATURES, LOUPE_SIGNATURES, OWNERSHIP_SIGNATURES, RosterFacet,
};
use lapis_diamond::{Facet, SupportedInterfaces};
use lapis_primitives::{Address, FacetCut, Selector};
use lapis_registry::{CutError, DiamondLoupe, FacetEntry};
use pretty_assertions::assert_eq;

use crate::common::*;

#[test]
fn standard_surface_is_listed() {
	let fx = fixture();
	let loupe = fx.diamond.loupe();
	let mut loupe_selectors = sels(LOUPE_SIGNATURES);
	loupe_selectors.extend(sels(ERC165_SIGNATURES));
	assert_eq!(
		loupe.facets(),
		vec![
			FacetEntry {
				facet_address: fx.standard.cut,
				function_selectors: sels(CUT_SIGNATURES),
			},
			FacetEntry {
				facet_address: fx.standard.loupe,
				function_selectors: loupe_selectors,
			},
			FacetEntry {
				facet_address: fx.standard.ownership,
				function_selectors: sels(OWNERSHIP_SIGNATURES),
			},
		]
	);
	assert_eq!(loupe.selector_count(), 8);
	assert_eq!(loupe.owner(), OWNER);
}

#[test]
fn routed_queries_match_direct_view() {
	let fx = fixture().with_roster();
	let loupe = fx.diamond.loupe();

	assert_eq!(fx.query::<Vec<FacetEntry>, _>("facets()", &()), loupe.facets());
	assert_eq!(fx.query::<Vec<Address>, _>("facetAddresses()", &()), loupe.facet_addresses());
	assert_eq!(
		fx.query::<Vec<Selector>, _>("facetFunctionSelectors(address)", &fx.roster),
		roster_selectors()
	);
	assert_eq!(fx.query::<Address, _>("facetAddress(bytes4)", &sel("getPlayers()")), fx.roster);
}

#[test]
fn unknown_entries_are_not_found() {
	let fx = fixture();
	let loupe = fx.diamond.loupe();
	assert_eq!(loupe.facet_address(sel("nothing()")), None);
	assert!(loupe.facet_function_selectors(STRANGER).is_empty());
	assert_eq!(fx.query::<Address, _>("facetAddress(bytes4)", &sel("nothing()")), Address::ZERO);
	assert_eq!(fx.query::<Vec<Selector>, _>("facetFunctionSelectors(address)", &STRANGER), vec![]);
}

#[test]
fn supports_builtin_interfaces() {
	let fx = fixture();
	let loupe = fx.diamond.loupe();
	for id in [0x01ffc9a7u32, 0x1f931c1c, 0x48e2b093, 0x7f5828d0] {
		let id = Selector(id.to_be_bytes());
		assert!(loupe.supports_interface(id), "{id}");
		assert!(fx.query::<bool, _>("supportsInterface(bytes4)", &id), "{id}");
	}
	assert!(!loupe.supports_interface(Selector([0xff; 4])));
	assert!(!fx.query::<bool, _>("supportsInterface(bytes4)", &sel("getPlayers()")));
	assert_eq!(SupportedInterfaces::id_of(OWNERSHIP_SIGNATURES), Selector([0x7f, 0x58, 0x28, 0xd0]));
}

#[test]
fn view_is_pinned() {
	let fx = fixture();
	let pinned = fx.diamond.loupe();
	fx.cut(&[FacetCut::add(fx.roster, roster_selectors())]).unwrap();
	assert!(!pinned.facet_addresses().contains(&fx.roster));
	assert!(fx.diamond.loupe().facet_addresses().contains(&fx.roster));
}

#[test]
fn colliding_surface_is_refused() {
	let fx = fixture();
	let err = fx.cut(&[FacetCut::add(fx.roster, RosterFacet::new(1).selectors())]).unwrap_err();
	assert!(matches!(
		err.as_cut(),
		Some(CutError::IdentifierAlreadyRouted { selector, owner, .. })
			if *selector == sel("supportsInterface(bytes4)") && *owner == fx.standard.loupe
	));
}
