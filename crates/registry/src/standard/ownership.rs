use diamond_primitives::{Address, Selector, decode, encode};

use super::{OWNER, TRANSFER_OWNERSHIP};
use crate::code::{Abi, Facet, FunctionSig};
use crate::context::CallContext;
use crate::error::DiamondError;

#[derive(Debug, Clone, Copy)]
enum Function {
	Owner,
	TransferOwnership,
}

/// ERC-173 style ownership queries and transfer.
pub struct OwnershipFacet {
	abi: Abi<Function>,
}

impl OwnershipFacet {
	pub fn new() -> Self {
		Self {
			abi: Abi::new(&[(OWNER, Function::Owner), (TRANSFER_OWNERSHIP, Function::TransferOwnership)]),
		}
	}
}

impl Default for OwnershipFacet {
	fn default() -> Self {
		Self::new()
	}
}

impl Facet for OwnershipFacet {
	fn name(&self) -> &'static str {
		"OwnershipFacet"
	}

	fn functions(&self) -> &[FunctionSig] {
		self.abi.functions()
	}

	fn invoke(&self, ctx: &mut CallContext<'_>, selector: Selector, input: &[u8]) -> Result<Vec<u8>, DiamondError> {
		match self.abi.resolve(selector) {
			Some(Function::Owner) => Ok(encode(&ctx.owner())?),
			Some(Function::TransferOwnership) => {
				let new_owner: Address = decode(input)?;
				ctx.transfer_ownership(new_owner)?;
				Ok(Vec::new())
			}
			None => Err(DiamondError::FunctionNotFound { selector }),
		}
	}
}
