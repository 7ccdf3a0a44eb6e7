//! Standard modules: the registry's own public entry points.
//!
//! | Module | Functions |
//! |---|---|
//! | [`DiamondCutFacet`] | `diamondCut` |
//! | [`DiamondLoupeFacet`] | `facets`, `facetFunctionSelectors`, `facetAddresses`, `facetAddress`, `supportsInterface` |
//! | [`OwnershipFacet`] | `owner`, `transferOwnership` |
//! | [`DiamondInit`] | `init` (initializer only, never bound) |

use std::collections::BTreeSet;

use diamond_primitives::{InterfaceId, StorageSlot};
use serde::{Deserialize, Serialize};

use crate::storage::StorageLayout;

mod cut;
mod init;
mod loupe;
mod ownership;

pub use cut::DiamondCutFacet;
pub use init::DiamondInit;
pub use loupe::DiamondLoupeFacet;
pub use ownership::OwnershipFacet;

pub const DIAMOND_CUT: &str = "diamondCut((address,uint8,bytes4[])[],address,bytes)";
pub const FACETS: &str = "facets()";
pub const FACET_FUNCTION_SELECTORS: &str = "facetFunctionSelectors(address)";
pub const FACET_ADDRESSES: &str = "facetAddresses()";
pub const FACET_ADDRESS: &str = "facetAddress(bytes4)";
pub const SUPPORTS_INTERFACE: &str = "supportsInterface(bytes4)";
pub const OWNER: &str = "owner()";
pub const TRANSFER_OWNERSHIP: &str = "transferOwnership(address)";
pub const INIT: &str = "init()";

/// Function sets whose XOR forms each standard interface id.
pub const ERC165_INTERFACE: &[&str] = &[SUPPORTS_INTERFACE];
pub const DIAMOND_CUT_INTERFACE: &[&str] = &[DIAMOND_CUT];
pub const DIAMOND_LOUPE_INTERFACE: &[&str] = &[FACETS, FACET_FUNCTION_SELECTORS, FACET_ADDRESSES, FACET_ADDRESS];
pub const ERC173_INTERFACE: &[&str] = &[OWNER, TRANSFER_OWNERSHIP];

/// Interfaces the registry reports through `supportsInterface`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceStorage {
	pub supported: BTreeSet<InterfaceId>,
}

impl StorageLayout for InterfaceStorage {
	const NAMESPACE: &'static str = "diamond.standard.interfaces.storage";
	const SLOT: StorageSlot = StorageSlot::from_bytes([
		0x0d, 0x6e, 0xcb, 0x5c, 0x6d, 0x53, 0x5b, 0x35, 0xc2, 0x30, 0x17, 0x9e, 0x8c, 0x81, 0xc8, 0x54, 0x83, 0x72, 0x55,
		0x62, 0x38, 0x91, 0x6a, 0x38, 0xfe, 0xf0, 0x76, 0x58, 0x5f, 0x61, 0x02, 0xc8,
	]);
}

#[cfg(test)]
mod tests;
