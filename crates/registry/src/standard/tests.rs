use diamond_primitives::{InterfaceId, Selector};

use super::*;
use crate::code::Facet;
use crate::storage::layout_slot_matches_namespace;

fn hex(signature: &str) -> String {
	Selector::of(signature).unwrap().to_string()
}

#[test]
fn standard_selectors_are_stable() {
	assert_eq!(hex(DIAMOND_CUT), "0x5f64940b");
	assert_eq!(hex(FACETS), "0x644fad82");
	assert_eq!(hex(FACET_FUNCTION_SELECTORS), "0x082294dd");
	assert_eq!(hex(FACET_ADDRESSES), "0xbd5f45d5");
	assert_eq!(hex(FACET_ADDRESS), "0x2bd71386");
	assert_eq!(hex(SUPPORTS_INTERFACE), "0x0e2b7fe2");
	assert_eq!(hex(OWNER), "0x3fc2bcdd");
	assert_eq!(hex(TRANSFER_OWNERSHIP), "0xf1dcac99");
	assert_eq!(hex(INIT), "0xc38ba39c");
}

#[test]
fn interface_ids_match_reference_values() {
	assert_eq!(InterfaceId::of(DIAMOND_LOUPE_INTERFACE).unwrap().to_string(), "0xfae56f0c");
	assert_eq!(InterfaceId::of(ERC173_INTERFACE).unwrap().to_string(), "0xce1e1044");
	assert_eq!(InterfaceId::of(ERC165_INTERFACE).unwrap().to_string(), hex(SUPPORTS_INTERFACE));
}

#[test]
fn modules_expose_their_interfaces() {
	let loupe = DiamondLoupeFacet::new();
	assert_eq!(loupe.functions().len(), 5);
	for signature in DIAMOND_LOUPE_INTERFACE.iter().chain(ERC165_INTERFACE) {
		assert!(loupe.implements(Selector::of(signature).unwrap()), "{signature}");
	}

	let ownership = OwnershipFacet::new();
	assert_eq!(ownership.functions().len(), 2);
	assert_eq!(DiamondCutFacet::new().functions().len(), 1);
	assert_eq!(DiamondInit::new().functions()[0].signature.as_str(), INIT);
}

#[test]
fn interface_slot_constant_matches_namespace() {
	assert!(layout_slot_matches_namespace::<InterfaceStorage>());
}
