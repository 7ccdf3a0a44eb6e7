//! Access Guard.
//!
//! Single-owner capability check gating every mutating entry point. The owner
//! is an explicit field of the registry [`State`]; there is no ambient global.

use diamond_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::DiamondError;
use crate::event::Event;
use crate::state::State;

/// Emitted when ownership moves to a new identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipTransferred {
	pub previous_owner: Address,
	pub new_owner: Address,
}

impl Event for OwnershipTransferred {
	const SIGNATURE: &'static str = "OwnershipTransferred(address,address)";
}

/// Fails with [`DiamondError::Unauthorized`] unless `caller` is the owner.
pub fn require_owner(state: &State, caller: Address) -> Result<(), DiamondError> {
	if caller != state.owner {
		return Err(DiamondError::Unauthorized { caller });
	}
	Ok(())
}

/// Replaces the owner. Guarded by [`require_owner`]; the null identity is
/// never a valid owner.
pub(crate) fn transfer_ownership(
	state: &mut State,
	caller: Address,
	new_owner: Address,
) -> Result<OwnershipTransferred, DiamondError> {
	require_owner(state, caller)?;
	if new_owner.is_zero() {
		return Err(DiamondError::InvalidOwner);
	}
	let previous_owner = std::mem::replace(&mut state.owner, new_owner);
	tracing::info!(%previous_owner, %new_owner, "ownership transferred");
	Ok(OwnershipTransferred {
		previous_owner,
		new_owner,
	})
}
